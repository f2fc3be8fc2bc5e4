//! Player controls, decoupled from the keyboard so tests and future demo
//! playback can drive the car directly.

use bevy::prelude::*;

/// Digital control state for the frame, sampled before physics runs.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    pub left: bool,
    pub right: bool,
    pub accelerate: bool,
    pub brake: bool,
}

impl PlayerInput {
    pub fn steering(&self) -> bool {
        self.left || self.right
    }
}

/// Arrows or WASD drive; space doubles as the brake.
pub fn sample_keyboard(keys: Res<ButtonInput<KeyCode>>, mut input: ResMut<PlayerInput>) {
    input.left = keys.pressed(KeyCode::ArrowLeft) || keys.pressed(KeyCode::KeyA);
    input.right = keys.pressed(KeyCode::ArrowRight) || keys.pressed(KeyCode::KeyD);
    input.accelerate = keys.pressed(KeyCode::ArrowUp) || keys.pressed(KeyCode::KeyW);
    input.brake = keys.pressed(KeyCode::ArrowDown)
        || keys.pressed(KeyCode::KeyS)
        || keys.pressed(KeyCode::Space);
}
