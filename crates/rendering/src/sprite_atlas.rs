//! Procedural sprite atlas.
//!
//! All billboard art is painted into one RGBA atlas at startup: roadside
//! props in the top rows, billboards and the three player-car frames in
//! the bottom row. Painting happens at the positions the sprite catalog
//! declares, so catalog and art cannot drift apart. Alpha is a hard cut,
//! either fully opaque or fully transparent, and the sampler is nearest
//! so the upscale keeps its pixels.

use bevy::prelude::*;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat};
use bevy::sprite::AlphaMode2d;

use simulation::sprites::{AtlasRect, CATALOG, SpriteKind};

pub const ATLAS_WIDTH: u32 = 256;
pub const ATLAS_HEIGHT: u32 = 128;

/// Player car frames, one per steering state. They live in the atlas
/// next to the billboards but are not catalog sprites; nothing places a
/// player car on the roadside.
pub const CAR_LEFT: AtlasRect = AtlasRect {
    x: 128,
    y: 96,
    w: 40,
    h: 22,
};
pub const CAR_CENTER: AtlasRect = AtlasRect {
    x: 168,
    y: 96,
    w: 40,
    h: 22,
};
pub const CAR_RIGHT: AtlasRect = AtlasRect {
    x: 208,
    y: 96,
    w: 40,
    h: 22,
};

const TRUNK: [u8; 4] = [104, 74, 52, 255];
const FROND: [u8; 4] = [74, 138, 70, 255];
const FROND_DARK: [u8; 4] = [52, 112, 58, 255];
const CANOPY: [u8; 4] = [60, 124, 62, 255];
const CANOPY_DARK: [u8; 4] = [42, 102, 52, 255];
const DEAD_WOOD: [u8; 4] = [122, 104, 86, 255];
const BUSH: [u8; 4] = [96, 128, 62, 255];
const BUSH_DARK: [u8; 4] = [76, 108, 54, 255];
const CACTUS: [u8; 4] = [84, 140, 78, 255];
const ROCK: [u8; 4] = [128, 116, 112, 255];
const ROCK_LIGHT: [u8; 4] = [158, 146, 138, 255];
const POST: [u8; 4] = [90, 78, 66, 255];
const PANEL: [u8; 4] = [236, 232, 224, 255];
const FUEL_RED: [u8; 4] = [200, 54, 44, 255];
const MOTEL_BLUE: [u8; 4] = [52, 86, 160, 255];
const CAR_BODY: [u8; 4] = [206, 60, 50, 255];
const CAR_BODY_LIGHT: [u8; 4] = [232, 96, 80, 255];
const CAR_GLASS: [u8; 4] = [36, 40, 56, 255];
const CAR_WHEEL: [u8; 4] = [22, 22, 24, 255];
const CAR_TAIL: [u8; 4] = [255, 204, 92, 255];

#[derive(Resource)]
pub struct SpriteAtlas {
    pub image: Handle<Image>,
    pub material: Handle<ColorMaterial>,
}

pub fn setup_sprite_atlas(
    mut commands: Commands,
    mut images: ResMut<Assets<Image>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let image = images.add(generate_atlas());
    let material = materials.add(ColorMaterial {
        color: Color::WHITE,
        texture: Some(image.clone()),
        alpha_mode: AlphaMode2d::Blend,
        ..default()
    });
    commands.insert_resource(SpriteAtlas { image, material });
}

pub fn generate_atlas() -> Image {
    let mut pixels = vec![0u8; (ATLAS_WIDTH * ATLAS_HEIGHT * 4) as usize];

    for desc in CATALOG {
        match desc.kind {
            SpriteKind::PalmTree => paint_palm(&mut pixels, desc.frame),
            SpriteKind::Tree => paint_tree(&mut pixels, desc.frame),
            SpriteKind::DeadTree => paint_dead_tree(&mut pixels, desc.frame),
            SpriteKind::Bush => paint_bush(&mut pixels, desc.frame),
            SpriteKind::Cactus => paint_cactus(&mut pixels, desc.frame),
            SpriteKind::Rock => paint_rock(&mut pixels, desc.frame),
            SpriteKind::BillboardFuel => paint_billboard(&mut pixels, desc.frame, FUEL_RED),
            SpriteKind::BillboardMotel => paint_billboard(&mut pixels, desc.frame, MOTEL_BLUE),
            SpriteKind::Unknown => {}
        }
    }

    paint_car(&mut pixels, CAR_LEFT, -1);
    paint_car(&mut pixels, CAR_CENTER, 0);
    paint_car(&mut pixels, CAR_RIGHT, 1);

    let mut image = Image::new(
        Extent3d {
            width: ATLAS_WIDTH,
            height: ATLAS_HEIGHT,
            depth_or_array_layers: 1,
        },
        TextureDimension::D2,
        pixels,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.sampler = bevy::image::ImageSampler::nearest();
    image
}

// ---------------------------------------------------------------------------
// Painters
// ---------------------------------------------------------------------------

fn put(pixels: &mut [u8], x: i32, y: i32, color: [u8; 4]) {
    let i = ((y as u32 * ATLAS_WIDTH + x as u32) * 4) as usize;
    pixels[i..i + 4].copy_from_slice(&color);
}

fn fill_rect(pixels: &mut [u8], x: i32, y: i32, w: i32, h: i32, color: [u8; 4]) {
    for py in y.max(0)..(y + h).min(ATLAS_HEIGHT as i32) {
        for px in x.max(0)..(x + w).min(ATLAS_WIDTH as i32) {
            put(pixels, px, py, color);
        }
    }
}

fn fill_disc(pixels: &mut [u8], cx: i32, cy: i32, radius: i32, color: [u8; 4]) {
    for py in (cy - radius).max(0)..(cy + radius + 1).min(ATLAS_HEIGHT as i32) {
        for px in (cx - radius).max(0)..(cx + radius + 1).min(ATLAS_WIDTH as i32) {
            let dx = px - cx;
            let dy = py - cy;
            if dx * dx + dy * dy <= radius * radius {
                put(pixels, px, py, color);
            }
        }
    }
}

fn paint_palm(pixels: &mut [u8], r: AtlasRect) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_rect(pixels, x + 18, y + 40, 5, 56, TRUNK);
    fill_rect(pixels, x + 19, y + 24, 5, 16, TRUNK);
    fill_disc(pixels, x + 20, y + 18, 14, FROND_DARK);
    fill_disc(pixels, x + 11, y + 14, 8, FROND);
    fill_disc(pixels, x + 29, y + 14, 8, FROND);
    fill_disc(pixels, x + 20, y + 9, 8, FROND);
}

fn paint_tree(pixels: &mut [u8], r: AtlasRect) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_rect(pixels, x + 25, y + 52, 7, 36, TRUNK);
    fill_disc(pixels, x + 28, y + 32, 19, CANOPY_DARK);
    fill_disc(pixels, x + 16, y + 26, 11, CANOPY);
    fill_disc(pixels, x + 40, y + 27, 11, CANOPY);
    fill_disc(pixels, x + 28, y + 15, 12, CANOPY);
}

fn paint_dead_tree(pixels: &mut [u8], r: AtlasRect) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_rect(pixels, x + 18, y + 14, 4, 66, DEAD_WOOD);
    fill_rect(pixels, x + 8, y + 26, 10, 3, DEAD_WOOD);
    fill_rect(pixels, x + 8, y + 19, 3, 8, DEAD_WOOD);
    fill_rect(pixels, x + 22, y + 20, 11, 3, DEAD_WOOD);
    fill_rect(pixels, x + 30, y + 12, 3, 9, DEAD_WOOD);
    fill_rect(pixels, x + 10, y + 42, 8, 3, DEAD_WOOD);
}

fn paint_bush(pixels: &mut [u8], r: AtlasRect) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_disc(pixels, x + 12, y + 22, 9, BUSH_DARK);
    fill_disc(pixels, x + 27, y + 22, 9, BUSH_DARK);
    fill_disc(pixels, x + 19, y + 16, 10, BUSH);
}

fn paint_cactus(pixels: &mut [u8], r: AtlasRect) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_rect(pixels, x + 13, y + 6, 7, 58, CACTUS);
    fill_rect(pixels, x + 4, y + 26, 9, 5, CACTUS);
    fill_rect(pixels, x + 4, y + 14, 5, 17, CACTUS);
    fill_rect(pixels, x + 20, y + 34, 9, 5, CACTUS);
    fill_rect(pixels, x + 24, y + 22, 5, 17, CACTUS);
}

fn paint_rock(pixels: &mut [u8], r: AtlasRect) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_disc(pixels, x + 20, y + 22, 13, ROCK);
    fill_disc(pixels, x + 31, y + 24, 9, ROCK);
    fill_disc(pixels, x + 17, y + 18, 7, ROCK_LIGHT);
}

fn paint_billboard(pixels: &mut [u8], r: AtlasRect, brand: [u8; 4]) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_rect(pixels, x + 8, y + 22, 4, 10, POST);
    fill_rect(pixels, x + 52, y + 22, 4, 10, POST);
    fill_rect(pixels, x + 2, y + 2, 60, 22, POST);
    fill_rect(pixels, x + 4, y + 4, 56, 18, PANEL);
    fill_rect(pixels, x + 6, y + 6, 20, 14, brand);
    fill_rect(pixels, x + 30, y + 8, 24, 4, brand);
    fill_rect(pixels, x + 30, y + 15, 18, 4, brand);
}

/// `lean` tips the cabin sideways for the steering frames.
fn paint_car(pixels: &mut [u8], r: AtlasRect, lean: i32) {
    let x = r.x as i32;
    let y = r.y as i32;
    fill_rect(pixels, x + 4, y + 8, 32, 9, CAR_BODY);
    fill_rect(pixels, x + 4, y + 8, 32, 2, CAR_BODY_LIGHT);
    fill_rect(pixels, x + 13 + lean * 3, y + 3, 14, 6, CAR_GLASS);
    fill_rect(pixels, x + 6, y + 11, 4, 3, CAR_TAIL);
    fill_rect(pixels, x + 30, y + 11, 4, 3, CAR_TAIL);
    fill_rect(pixels, x + 5, y + 16, 8, 6, CAR_WHEEL);
    fill_rect(pixels, x + 27, y + 16, 8, 6, CAR_WHEEL);
}
