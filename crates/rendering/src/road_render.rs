//! Road pass.
//!
//! Walks the frame plan near to far and emits flat-shaded quads into one
//! mesh: a full-width terrain band per segment, rumble strips, the
//! pavement trapezoid, and lane markers on bands that carry them. The
//! mesh draws with alpha blending, so quads paint in emission order and
//! the emission order is the painter order.
//!
//! All quad corners are given in raster coordinates (origin top-left,
//! y down) and converted to mesh space here, the same convention the
//! projector uses.

use bevy::prelude::*;
use bevy::render::mesh::{Indices, PrimitiveTopology};
use bevy::render::primitives::Aabb;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::sprite::AlphaMode2d;

use simulation::config::LANES;
use simulation::track::{ColorBand, Track};

use crate::palette;
use crate::projection::{FramePlan, SegmentFrame, Viewport};

/// Marks the entity whose mesh the road pass rewrites every frame.
#[derive(Component)]
pub struct RoadLayer;

#[derive(Default)]
pub struct RoadGeometry {
    positions: Vec<[f32; 3]>,
    colors: Vec<[f32; 4]>,
    uvs: Vec<[f32; 2]>,
    indices: Vec<u32>,
}

impl RoadGeometry {
    /// Quad from raster corners ordered bottom-left, bottom-right,
    /// top-right, top-left.
    fn push_quad(&mut self, viewport: &Viewport, corners: [[f32; 2]; 4], color: [f32; 4]) {
        let vi = self.positions.len() as u32;
        for [sx, sy] in corners {
            self.positions
                .push([sx - viewport.width / 2.0, viewport.height / 2.0 - sy, 0.0]);
            self.colors.push(color);
            self.uvs.push([0.0, 0.0]);
        }
        self.indices
            .extend_from_slice(&[vi, vi + 1, vi + 2, vi, vi + 2, vi + 3]);
    }

    /// Full-width horizontal band between two raster rows.
    fn push_band(&mut self, viewport: &Viewport, y_top: f32, y_bottom: f32, color: [f32; 4]) {
        self.push_quad(
            viewport,
            [
                [0.0, y_bottom],
                [viewport.width, y_bottom],
                [viewport.width, y_top],
                [0.0, y_top],
            ],
            color,
        );
    }

    /// Trapezoid between a near edge (`y1`, wider) and a far edge (`y2`).
    #[allow(clippy::too_many_arguments)]
    fn push_trapezoid(
        &mut self,
        viewport: &Viewport,
        x1_left: f32,
        x1_right: f32,
        y1: f32,
        x2_left: f32,
        x2_right: f32,
        y2: f32,
        color: [f32; 4],
    ) {
        self.push_quad(
            viewport,
            [
                [x1_left, y1],
                [x1_right, y1],
                [x2_right, y2],
                [x2_left, y2],
            ],
            color,
        );
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

fn rumble_width(road_half: f32) -> f32 {
    road_half / (2.0 * LANES as f32).max(6.0)
}

fn lane_marker_width(road_half: f32) -> f32 {
    road_half / (8.0 * LANES as f32).max(32.0)
}

/// Emits one segment's quads. The caller has already decided the segment
/// is visible.
pub fn rasterize_segment(
    geo: &mut RoadGeometry,
    viewport: &Viewport,
    frame: &SegmentFrame,
    band: ColorBand,
) {
    let colors = palette::band_colors(band);
    let fog = frame.fog;
    let p1 = frame.p1;
    let p2 = frame.p2;

    let r1 = rumble_width(p1.w);
    let r2 = rumble_width(p2.w);

    geo.push_band(viewport, p2.y, p1.y, palette::fog_mix(colors.grass, fog));

    let rumble = palette::fog_mix(colors.rumble, fog);
    geo.push_trapezoid(
        viewport,
        p1.x - p1.w - r1,
        p1.x - p1.w,
        p1.y,
        p2.x - p2.w - r2,
        p2.x - p2.w,
        p2.y,
        rumble,
    );
    geo.push_trapezoid(
        viewport,
        p1.x + p1.w,
        p1.x + p1.w + r1,
        p1.y,
        p2.x + p2.w,
        p2.x + p2.w + r2,
        p2.y,
        rumble,
    );

    geo.push_trapezoid(
        viewport,
        p1.x - p1.w,
        p1.x + p1.w,
        p1.y,
        p2.x - p2.w,
        p2.x + p2.w,
        p2.y,
        palette::fog_mix(colors.road, fog),
    );

    if let Some(lane) = colors.lane {
        let lane = palette::fog_mix(lane, fog);
        let l1 = lane_marker_width(p1.w);
        let l2 = lane_marker_width(p2.w);
        let lane_w1 = p1.w * 2.0 / LANES as f32;
        let lane_w2 = p2.w * 2.0 / LANES as f32;
        let mut lane_x1 = p1.x - p1.w + lane_w1;
        let mut lane_x2 = p2.x - p2.w + lane_w2;
        for _ in 1..LANES {
            geo.push_trapezoid(
                viewport,
                lane_x1 - l1 / 2.0,
                lane_x1 + l1 / 2.0,
                p1.y,
                lane_x2 - l2 / 2.0,
                lane_x2 + l2 / 2.0,
                p2.y,
                lane,
            );
            lane_x1 += lane_w1;
            lane_x2 += lane_w2;
        }
    }
}

pub fn setup_road_layer(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    viewport: Res<Viewport>,
) {
    let mesh = meshes.add(RoadGeometry::default().to_mesh());
    let material = materials.add(ColorMaterial {
        color: Color::WHITE,
        alpha_mode: AlphaMode2d::Blend,
        ..default()
    });
    // The mesh is rewritten every frame, so the entity keeps fixed
    // viewport-sized bounds instead of bounds derived from frame one.
    let half = Vec3::new(viewport.width / 2.0, viewport.height / 2.0, 0.5);
    commands.spawn((
        RoadLayer,
        Mesh2d(mesh),
        MeshMaterial2d(material),
        Transform::from_translation(Vec3::new(0.0, 0.0, crate::ROAD_Z)),
        Aabb::from_min_max(-half, half),
    ));
}

pub fn build_road_frame(
    plan: Res<FramePlan>,
    track: Res<Track>,
    viewport: Res<Viewport>,
    layer: Query<&Mesh2d, With<RoadLayer>>,
    mut meshes: ResMut<Assets<Mesh>>,
) {
    let Ok(mesh_handle) = layer.get_single() else {
        return;
    };

    let mut geo = RoadGeometry::default();
    for frame in &plan.segments {
        if !frame.drawn {
            continue;
        }
        let band = track.segments[frame.index].band;
        rasterize_segment(&mut geo, &viewport, frame, band);
    }
    meshes.insert(&mesh_handle.0, geo.to_mesh());
}
