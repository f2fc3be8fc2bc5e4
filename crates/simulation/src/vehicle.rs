//! Player vehicle integration. One fixed-order pass per frame: steer,
//! throttle, off-road drag, centrifugal pull, then advance along the track.

use bevy::prelude::*;

use crate::config::ViewConfig;
use crate::input::PlayerInput;
use crate::track::Track;

/// Frames longer than this integrate as if they took this long, so a
/// debugger pause or window drag cannot launch the car.
pub const MAX_TICK_SECONDS: f32 = 0.1;
/// Curvature is clamped to this magnitude before it pulls on the car.
pub const MAX_CURVE_FORCE: f32 = 5.0;
/// Lateral travel in road half-widths. 1.0 is the pavement edge.
pub const MAX_LATERAL: f32 = 2.0;

#[derive(Resource, Debug, Clone, Copy)]
pub struct VehicleTuning {
    /// Top speed on pavement, world units per second (pre-scale).
    pub max_speed: f32,
    pub accel: f32,
    pub decel: f32,
    pub off_road_decel: f32,
    /// Speed the car gets dragged down to while fully off the pavement.
    pub off_road_max_speed: f32,
    /// Full-speed lateral rate in road half-widths per second.
    pub steering_rate: f32,
    /// How much steering authority tightens toward top speed.
    pub steering_speed_scale: f32,
    pub centrifugal: f32,
}

impl Default for VehicleTuning {
    fn default() -> Self {
        Self {
            max_speed: 600.0,
            accel: 1.5,
            decel: 0.6,
            off_road_decel: 2.0,
            off_road_max_speed: 150.0,
            steering_rate: 3.0,
            steering_speed_scale: 0.3,
            centrifugal: 0.32,
        }
    }
}

/// The player car. `x` is lateral position in road half-widths (negative
/// left), `position` is distance along the lap, `y` the sampled road height.
#[derive(Resource, Debug, Clone, Copy, Default)]
pub struct Player {
    pub x: f32,
    pub speed: f32,
    pub position: f32,
    pub y: f32,
}

/// Advances the car by `dt` seconds. Pure so tests can drive it tick by
/// tick without an app.
pub fn vehicle_step(
    player: &mut Player,
    input: &PlayerInput,
    tuning: &VehicleTuning,
    track: &Track,
    player_z: f32,
    dt: f32,
) {
    if track.is_empty() {
        return;
    }
    let dt = dt.clamp(0.0, MAX_TICK_SECONDS);
    let speed_pct = player.speed / tuning.max_speed;

    // Steering authority shrinks as speed climbs, and a parked car does
    // not slide sideways.
    if player.speed > 0.0 {
        let shift =
            dt * tuning.steering_rate * speed_pct * (1.0 - speed_pct * tuning.steering_speed_scale);
        if input.left {
            player.x -= shift;
        }
        if input.right {
            player.x += shift;
        }
    }

    let off_road_amount = (player.x.abs() - 1.0).max(0.0);
    let off_road_factor = off_road_amount.min(1.0);

    if input.accelerate {
        player.speed += tuning.accel * dt * 100.0 * (1.0 - off_road_factor * 0.7);
    } else if input.brake {
        player.speed -= tuning.accel * dt * 100.0 * 2.0;
    } else {
        player.speed -= tuning.decel * dt * 100.0;
    }
    if input.steering() {
        player.speed -= tuning.decel * dt * 100.0 * speed_pct;
    }

    let effective_max =
        tuning.max_speed + (tuning.off_road_max_speed - tuning.max_speed) * off_road_factor;
    if off_road_factor > 0.0 && player.speed > effective_max {
        player.speed -= tuning.off_road_decel * dt * 100.0 * off_road_factor;
    }
    player.speed = player.speed.clamp(0.0, tuning.max_speed);

    let curve = track
        .curve_at(player.position)
        .clamp(-MAX_CURVE_FORCE, MAX_CURVE_FORCE);
    player.x -= curve * speed_pct * speed_pct * dt * tuning.centrifugal;
    player.x = player.x.clamp(-MAX_LATERAL, MAX_LATERAL);

    player.position = track
        .wrap_position(player.position + player.speed * dt * track.segment_length / 10.0);
    player.y = track.elevation_at(player.position + player_z);
}

pub fn integrate_vehicle(
    time: Res<Time>,
    input: Res<PlayerInput>,
    tuning: Res<VehicleTuning>,
    view: Res<ViewConfig>,
    track: Res<Track>,
    mut player: ResMut<Player>,
) {
    vehicle_step(
        &mut player,
        &input,
        &tuning,
        &track,
        view.player_z(),
        time.delta_secs(),
    );
}
