//! Sky backdrop.
//!
//! One static mesh behind everything else: a full-viewport vertical
//! gradient with a low sun disc. The gradient bottoms out at the fog
//! color, so the road's fog wall and the sky meet in the same tone and
//! the draw-distance edge never shows as a line.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::render_asset::RenderAssetUsages;
use bevy::sprite::AlphaMode2d;

use crate::palette;
use crate::projection::Viewport;

const SUN_SEGMENTS: u32 = 24;

#[derive(Component)]
pub struct SkyLayer;

pub fn build_sky_mesh(viewport: &Viewport) -> Mesh {
    let half_w = viewport.width / 2.0;
    let half_h = viewport.height / 2.0;
    let top = palette::sky_top().to_srgba().to_f32_array();
    let horizon = palette::horizon();

    let mut positions: Vec<[f32; 3]> = vec![
        [-half_w, -half_h, 0.0],
        [half_w, -half_h, 0.0],
        [half_w, half_h, 0.0],
        [-half_w, half_h, 0.0],
    ];
    let mut colors: Vec<[f32; 4]> = vec![horizon, horizon, top, top];
    let mut indices: Vec<u32> = vec![0, 1, 2, 0, 2, 3];

    // Sun just over the horizon, off to the right of the road. A level
    // camera puts the horizon at mesh y zero.
    let cx = half_w * 0.45;
    let cy = viewport.height * 0.06;
    let radius = viewport.height * 0.09;
    let center = positions.len() as u32;
    positions.push([cx, cy, 0.0]);
    colors.push(palette::sun_core());
    for i in 0..SUN_SEGMENTS {
        let angle = i as f32 / SUN_SEGMENTS as f32 * std::f32::consts::TAU;
        positions.push([cx + radius * angle.cos(), cy + radius * angle.sin(), 0.0]);
        colors.push(palette::sun_rim());
    }
    for i in 0..SUN_SEGMENTS {
        let next = (i + 1) % SUN_SEGMENTS;
        indices.extend_from_slice(&[center, center + 1 + i, center + 1 + next]);
    }

    let uvs = vec![[0.0, 0.0]; positions.len()];
    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, uvs)
    .with_inserted_indices(Indices::U32(indices))
}

pub fn setup_sky(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    viewport: Res<Viewport>,
) {
    let mesh = meshes.add(build_sky_mesh(&viewport));
    let material = materials.add(ColorMaterial {
        color: Color::WHITE,
        alpha_mode: AlphaMode2d::Blend,
        ..default()
    });
    commands.spawn((
        SkyLayer,
        Mesh2d(mesh),
        MeshMaterial2d(material),
        Transform::from_translation(Vec3::new(0.0, 0.0, crate::SKY_Z)),
    ));
}
