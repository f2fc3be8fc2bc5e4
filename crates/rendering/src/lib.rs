//! Retro raster pipeline.
//!
//! Everything draws as flat meshes into a fixed 480x270 render target; a
//! presentation camera upscales that frame to the window with nearest
//! sampling. Three layers stack by transform depth: the static sky
//! backdrop, the road pass, and the sprite pass. The road and sprite
//! layers rebuild their meshes from the frame plan every update.

pub mod palette;
pub mod projection;
pub mod retro_target;
pub mod road_render;
pub mod sky;
pub mod sprite_atlas;
pub mod sprite_render;

use bevy::prelude::*;

use simulation::GameStep;

use crate::projection::{FramePlan, Viewport};

// ---------------------------------------------------------------------------
// Layer depths
// ---------------------------------------------------------------------------

pub const SKY_Z: f32 = 0.0;
pub const ROAD_Z: f32 = 1.0;
pub const SPRITE_Z: f32 = 2.0;

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct RenderingPlugin;

impl Plugin for RenderingPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<Viewport>()
            .init_resource::<FramePlan>()
            .add_systems(
                Startup,
                (
                    retro_target::setup_retro_target,
                    sky::setup_sky,
                    road_render::setup_road_layer,
                    sprite_atlas::setup_sprite_atlas,
                    sprite_render::setup_sprite_layer,
                )
                    .chain(),
            )
            .add_systems(
                Update,
                (
                    projection::build_frame_plan,
                    road_render::build_road_frame,
                    sprite_render::build_sprite_frame,
                )
                    .chain()
                    .in_set(GameStep::Draw),
            );
    }
}
