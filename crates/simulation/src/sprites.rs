//! Roadside sprite catalog.
//!
//! One descriptor record per sprite kind carries everything a draw needs:
//! editor category, atlas frame, and display scale. Kinds outside the
//! catalog (including anything a track file names that this build does not
//! know) resolve to no descriptor and are skipped at draw time.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpriteKind {
    PalmTree,
    Tree,
    DeadTree,
    Bush,
    Cactus,
    Rock,
    BillboardFuel,
    BillboardMotel,
    /// Catch-all for kind strings this build does not know. Never drawn.
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpriteCategory {
    Vegetation,
    Obstacle,
    Billboard,
}

/// Pixel rectangle inside the shared sprite atlas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtlasRect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, Copy)]
pub struct SpriteDescriptor {
    pub kind: SpriteKind,
    pub category: SpriteCategory,
    pub frame: AtlasRect,
    /// Size multiplier applied on top of the projected segment scale.
    pub scale: f32,
}

const fn rect(x: u32, y: u32, w: u32, h: u32) -> AtlasRect {
    AtlasRect { x, y, w, h }
}

pub const CATALOG: &[SpriteDescriptor] = &[
    SpriteDescriptor {
        kind: SpriteKind::PalmTree,
        category: SpriteCategory::Vegetation,
        frame: rect(0, 0, 40, 96),
        scale: 1.5,
    },
    SpriteDescriptor {
        kind: SpriteKind::Tree,
        category: SpriteCategory::Vegetation,
        frame: rect(40, 0, 56, 88),
        scale: 1.4,
    },
    SpriteDescriptor {
        kind: SpriteKind::DeadTree,
        category: SpriteCategory::Vegetation,
        frame: rect(96, 0, 40, 80),
        scale: 1.2,
    },
    SpriteDescriptor {
        kind: SpriteKind::Bush,
        category: SpriteCategory::Vegetation,
        frame: rect(136, 0, 40, 32),
        scale: 0.8,
    },
    SpriteDescriptor {
        kind: SpriteKind::Cactus,
        category: SpriteCategory::Vegetation,
        frame: rect(176, 0, 32, 64),
        scale: 1.0,
    },
    SpriteDescriptor {
        kind: SpriteKind::Rock,
        category: SpriteCategory::Obstacle,
        frame: rect(208, 0, 44, 36),
        scale: 0.9,
    },
    SpriteDescriptor {
        kind: SpriteKind::BillboardFuel,
        category: SpriteCategory::Billboard,
        frame: rect(0, 96, 64, 32),
        scale: 1.3,
    },
    SpriteDescriptor {
        kind: SpriteKind::BillboardMotel,
        category: SpriteCategory::Billboard,
        frame: rect(64, 96, 64, 32),
        scale: 1.3,
    },
];

impl SpriteKind {
    /// Catalog lookup. `None` means "skip the draw", never an error.
    pub fn descriptor(self) -> Option<&'static SpriteDescriptor> {
        CATALOG.iter().find(|d| d.kind == self)
    }
}
