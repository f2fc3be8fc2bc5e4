use bevy::prelude::*;

pub mod builder;
pub mod config;
pub mod game_rng;
pub mod input;
pub mod procedural;
pub mod sprites;
pub mod track;
pub mod track_data;
pub mod vehicle;

// ---------------------------------------------------------------------------
// Frame phases
// ---------------------------------------------------------------------------

/// Ordered phases for the per-frame game step, configured as a chain:
/// `Input` → `Physics` → `Draw`.
///
/// Everything runs in `Update`: the renderer redraws the road from scratch
/// each frame, so physics and drawing stay frame-synchronous. Long frames
/// are handled by the integrator's tick clamp instead of a fixed timestep.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum GameStep {
    /// Keyboard sampling into [`input::PlayerInput`].
    Input,
    /// Track rebuild and vehicle integration.
    Physics,
    /// Frame planning and mesh uploads, in the rendering crate.
    Draw,
}

// ---------------------------------------------------------------------------
// Plugin
// ---------------------------------------------------------------------------

pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<config::ViewConfig>()
            .init_resource::<game_rng::GameRng>()
            .init_resource::<input::PlayerInput>()
            .init_resource::<track::Track>()
            .init_resource::<vehicle::VehicleTuning>()
            .init_resource::<vehicle::Player>()
            .configure_sets(
                Update,
                (GameStep::Input, GameStep::Physics, GameStep::Draw).chain(),
            )
            .add_systems(Update, input::sample_keyboard.in_set(GameStep::Input))
            .add_systems(
                Update,
                (builder::rebuild_track, vehicle::integrate_vehicle)
                    .chain()
                    .in_set(GameStep::Physics),
            );
    }
}
