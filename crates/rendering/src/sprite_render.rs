//! Sprite pass.
//!
//! Roadside sprites composite far to near over the road, as textured
//! quads in one mesh sharing the atlas material. Each sprite anchors to
//! its segment's near edge: feet on the road row, pulled toward the road
//! edge it stands beside. Quads clip against the segment's occlusion
//! watermark so hill crests swallow sprites from the feet up, and fog
//! fades them through vertex alpha. The player car draws last, pinned to
//! the bottom of the view.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::primitives::Aabb;
use bevy::render::render_asset::RenderAssetUsages;

use simulation::config::{ROAD_WIDTH, ViewConfig};
use simulation::input::PlayerInput;
use simulation::sprites::AtlasRect;
use simulation::track::Track;
use simulation::track_data::PlacedSprite;

use crate::projection::{FramePlan, SegmentFrame, Viewport};
use crate::sprite_atlas::{ATLAS_HEIGHT, ATLAS_WIDTH, CAR_CENTER, CAR_LEFT, CAR_RIGHT, SpriteAtlas};

/// World size of one atlas pixel, chosen so the player car frame spans
/// 0.3 road half-widths.
pub const SPRITE_WORLD_SCALE: f32 = 0.3 / CAR_CENTER.w as f32;

/// Marks the entity whose mesh the sprite pass rewrites every frame.
#[derive(Component)]
pub struct SpriteLayer;

#[derive(Default)]
pub struct SpriteGeometry {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl SpriteGeometry {
    /// Textured quad from raster bounds. `uv` is `[u0, v0, u1, v1]` with
    /// v0 at the top, matching raster orientation.
    fn push_quad(
        &mut self,
        viewport: &Viewport,
        x0: f32,
        x1: f32,
        y0: f32,
        y1: f32,
        uv: [f32; 4],
        alpha: f32,
    ) {
        let vi = self.positions.len() as u32;
        let corners = [
            ([x0, y1], [uv[0], uv[3]]),
            ([x1, y1], [uv[2], uv[3]]),
            ([x1, y0], [uv[2], uv[1]]),
            ([x0, y0], [uv[0], uv[1]]),
        ];
        for ([sx, sy], uv) in corners {
            self.positions
                .push([sx - viewport.width / 2.0, viewport.height / 2.0 - sy, 0.0]);
            self.colors.push([1.0, 1.0, 1.0, alpha]);
            self.uvs.push(uv);
        }
        self.indices
            .extend_from_slice(&[vi, vi + 1, vi + 2, vi, vi + 2, vi + 3]);
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn to_mesh(self) -> Mesh {
        Mesh::new(
            PrimitiveTopology::TriangleList,
            RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
        )
        .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, self.positions)
        .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, self.colors)
        .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, self.uvs)
        .with_inserted_indices(Indices::U32(self.indices))
    }
}

/// Draws one atlas frame into the destination rectangle, cropped from
/// the bottom against `clip_y`. The crop keeps the top of the art: a
/// sprite sinking behind a crest loses its feet first.
#[allow(clippy::too_many_arguments)]
fn blit(
    geo: &mut SpriteGeometry,
    viewport: &Viewport,
    frame: AtlasRect,
    dest_x: f32,
    dest_y: f32,
    dest_w: f32,
    dest_h: f32,
    clip_y: f32,
    alpha: f32,
) {
    let clip_h = (dest_y + dest_h - clip_y).max(0.0);
    if clip_h >= dest_h {
        return;
    }
    let visible_h = dest_h - clip_h;
    let kept = visible_h / dest_h;

    let u0 = frame.x as f32 / ATLAS_WIDTH as f32;
    let v0 = frame.y as f32 / ATLAS_HEIGHT as f32;
    let u1 = (frame.x + frame.w) as f32 / ATLAS_WIDTH as f32;
    let v1 = (frame.y as f32 + frame.h as f32 * kept) / ATLAS_HEIGHT as f32;

    geo.push_quad(
        viewport,
        dest_x,
        dest_x + dest_w,
        dest_y,
        dest_y + visible_h,
        [u0, v0, u1, v1],
        alpha,
    );
}

/// Composites one placed sprite against its segment's frame.
pub fn raster_sprite(
    geo: &mut SpriteGeometry,
    viewport: &Viewport,
    frame: &SegmentFrame,
    placed: &PlacedSprite,
) {
    let Some(desc) = placed.kind.descriptor() else {
        return;
    };

    let scale = frame.p1.scale;
    let world = scale * (viewport.width / 2.0) * SPRITE_WORLD_SCALE * ROAD_WIDTH;
    let dest_w = desc.frame.w as f32 * desc.scale * world;
    let dest_h = desc.frame.h as f32 * desc.scale * world;

    let sprite_x = frame.p1.x + scale * placed.offset * ROAD_WIDTH * viewport.width / 2.0;
    // Left-side sprites anchor their right edge at the offset point, so
    // art grows away from the pavement on both sides.
    let dest_x = if placed.offset < 0.0 {
        sprite_x - dest_w
    } else {
        sprite_x
    };
    if dest_x > viewport.width || dest_x + dest_w < 0.0 {
        return;
    }
    let dest_y = frame.p1.y - dest_h;

    blit(
        geo,
        viewport,
        desc.frame,
        dest_x,
        dest_y,
        dest_w,
        dest_h,
        frame.clip_y,
        1.0 - frame.fog,
    );
}

/// Draws the player car, centered and pinned to the bottom edge. The
/// camera rides a fixed height over the road directly under the car,
/// which is what keeps the car there on hills.
pub fn raster_player(
    geo: &mut SpriteGeometry,
    viewport: &Viewport,
    view: &ViewConfig,
    input: &PlayerInput,
) {
    let frame = if input.left {
        CAR_LEFT
    } else if input.right {
        CAR_RIGHT
    } else {
        CAR_CENTER
    };

    let scale = view.camera_depth() / view.player_z();
    let world = scale * (viewport.width / 2.0) * SPRITE_WORLD_SCALE * ROAD_WIDTH;
    let dest_w = frame.w as f32 * world;
    let dest_h = frame.h as f32 * world;

    blit(
        geo,
        viewport,
        frame,
        viewport.width / 2.0 - dest_w / 2.0,
        viewport.height - dest_h,
        dest_w,
        dest_h,
        viewport.height,
        1.0,
    );
}

pub fn setup_sprite_layer(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    atlas: Res<SpriteAtlas>,
    viewport: Res<Viewport>,
) {
    let mesh = meshes.add(SpriteGeometry::default().to_mesh());
    let half = Vec3::new(viewport.width / 2.0, viewport.height / 2.0, 0.5);
    commands.spawn((
        SpriteLayer,
        Mesh2d(mesh),
        MeshMaterial2d(atlas.material.clone()),
        Transform::from_translation(Vec3::new(0.0, 0.0, crate::SPRITE_Z)),
        Aabb::from_min_max(-half, half),
    ));
}

pub fn build_sprite_frame(
    plan: Res<FramePlan>,
    track: Res<Track>,
    view: Res<ViewConfig>,
    input: Res<PlayerInput>,
    viewport: Res<Viewport>,
    layer: Query<&Mesh2d, With<SpriteLayer>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(mesh_handle) = layer.get_single() else {
        return;
    };

    let mut geo = SpriteGeometry::default();
    // Far to near, skipping the segment under the camera, so closer
    // sprites paint over farther ones.
    for frame in plan.segments.iter().skip(1).rev() {
        if frame.fog >= 1.0 {
            continue;
        }
        for placed in &track.segments[frame.index].sprites {
            raster_sprite(&mut geo, &viewport, frame, placed);
        }
    }
    if !plan.segments.is_empty() {
        raster_player(&mut geo, &viewport, &view, &input);
    }
    meshes.insert(&mesh_handle.0, geo.to_mesh());
}
