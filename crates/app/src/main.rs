use bevy::prelude::*;
use bevy::window::PresentMode;

use simulation::config::{RETRO_HEIGHT, RETRO_WIDTH, WINDOW_SCALE};

fn main() {
    App::new()
        .insert_resource(ClearColor(rendering::palette::sky_top()))
        .add_plugins(DefaultPlugins.set(WindowPlugin {
            primary_window: Some(Window {
                title: "Sundrift".to_string(),
                resolution: (
                    (RETRO_WIDTH * WINDOW_SCALE) as f32,
                    (RETRO_HEIGHT * WINDOW_SCALE) as f32,
                )
                    .into(),
                present_mode: PresentMode::AutoVsync,
                resizable: false,
                ..default()
            }),
            ..default()
        }))
        .add_plugins((
            simulation::SimulationPlugin,
            rendering::RenderingPlugin,
            save::SavePlugin,
        ))
        .run();
}
