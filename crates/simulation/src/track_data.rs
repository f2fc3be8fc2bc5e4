//! Declarative track definition: the interchange format shared with the
//! external editor and the persistence layer.
//!
//! A track is a list of pieces (straight / curve / hill / combined) plus a
//! flat list of placed sprites. The same structs serialize to the JSON
//! track-file format, so field names follow the interchange convention
//! (`type`, `segmentIndex`).

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::sprites::SpriteKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PieceKind {
    Straight,
    Curve,
    Hill,
    /// Curve and hill envelopes running together over one length. Produced
    /// by the procedural generator; serialized with the extra `hill` field.
    Combined,
}

/// One declarative unit of track. `value` is curve intensity for
/// curve/combined pieces (conventionally [-10, 10]) and the elevation delta
/// for hill pieces (conventionally [-200, 200] world units).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPiece {
    pub id: u32,
    #[serde(rename = "type")]
    pub kind: PieceKind,
    /// Number of segments this piece emits.
    pub length: u32,
    pub value: f32,
    /// Elevation delta for combined pieces; omitted from JSON otherwise.
    #[serde(default, skip_serializing_if = "is_zero")]
    pub hill: f32,
}

fn is_zero(v: &f32) -> bool {
    *v == 0.0
}

impl TrackPiece {
    pub fn curve_amount(&self) -> f32 {
        match self.kind {
            PieceKind::Curve | PieceKind::Combined => self.value,
            PieceKind::Straight | PieceKind::Hill => 0.0,
        }
    }

    pub fn hill_amount(&self) -> f32 {
        match self.kind {
            PieceKind::Hill => self.value,
            PieceKind::Combined => self.hill,
            PieceKind::Straight | PieceKind::Curve => 0.0,
        }
    }
}

/// A roadside decoration attached to exactly one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlacedSprite {
    pub id: u32,
    pub segment_index: usize,
    #[serde(rename = "type")]
    pub kind: SpriteKind,
    /// Lateral position in road half-widths, [-2, 2]; negative is left.
    /// Magnitude beyond 1 is off the pavement.
    pub offset: f32,
}

/// The whole interchange document: ordered pieces plus placed sprites.
#[derive(Resource, Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackData {
    pub pieces: Vec<TrackPiece>,
    pub sprites: Vec<PlacedSprite>,
}

impl TrackData {
    /// The built-in circuit used when no track file is supplied.
    pub fn demo_circuit() -> Self {
        let layout: [(PieceKind, u32, f32, f32); 12] = [
            (PieceKind::Straight, 60, 0.0, 0.0),
            (PieceKind::Curve, 50, 4.0, 0.0),
            (PieceKind::Hill, 60, 70.0, 0.0),
            (PieceKind::Curve, 70, -6.0, 0.0),
            (PieceKind::Combined, 50, 5.0, -50.0),
            (PieceKind::Straight, 40, 0.0, 0.0),
            (PieceKind::Hill, 60, -90.0, 0.0),
            (PieceKind::Curve, 80, 7.0, 0.0),
            (PieceKind::Combined, 60, -5.0, 60.0),
            (PieceKind::Straight, 50, 0.0, 0.0),
            (PieceKind::Hill, 40, 10.0, 0.0),
            (PieceKind::Straight, 60, 0.0, 0.0),
        ];
        let pieces = layout
            .iter()
            .enumerate()
            .map(|(i, &(kind, length, value, hill))| TrackPiece {
                id: i as u32,
                kind,
                length,
                value,
                hill,
            })
            .collect::<Vec<_>>();

        let total_segments: usize = pieces.iter().map(|p| p.length as usize).sum();
        let mut sprites = Vec::new();
        let mut id = 0;

        // Palms line the opening straight, then vegetation alternates sides
        // down the rest of the lap.
        for segment_index in (8..total_segments - 10).step_by(9) {
            let side = if (segment_index / 9) % 2 == 0 { 1.0 } else { -1.0 };
            let kind = match (segment_index / 9) % 5 {
                0 => SpriteKind::PalmTree,
                1 => SpriteKind::Tree,
                2 => SpriteKind::Bush,
                3 => SpriteKind::Cactus,
                _ => SpriteKind::DeadTree,
            };
            sprites.push(PlacedSprite {
                id,
                segment_index,
                kind,
                offset: side * (1.25 + 0.05 * ((segment_index % 4) as f32)),
            });
            id += 1;
        }
        for (segment_index, kind) in [
            (45, SpriteKind::BillboardFuel),
            (220, SpriteKind::BillboardMotel),
            (400, SpriteKind::BillboardFuel),
            (560, SpriteKind::BillboardMotel),
        ] {
            sprites.push(PlacedSprite {
                id,
                segment_index,
                kind,
                offset: -1.2,
            });
            id += 1;
        }
        for (segment_index, offset) in [(170, 1.6), (305, -1.7), (480, 1.4)] {
            sprites.push(PlacedSprite {
                id,
                segment_index,
                kind: SpriteKind::Rock,
                offset,
            });
            id += 1;
        }

        Self { pieces, sprites }
    }
}
