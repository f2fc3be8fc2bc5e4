use bevy::prelude::*;

/// World-space length of one road segment.
pub const SEGMENT_LENGTH: f32 = 200.0;

/// Half-width of the paved road in world units. Lateral offsets in [-1, 1]
/// stay on the pavement; the shoulders run out to +/-2.
pub const ROAD_WIDTH: f32 = 1000.0;

/// Segments per color band; also the length of the finish stripe.
pub const RUMBLE_LENGTH: usize = 3;

/// Lane count on the paved surface (lane markers are drawn between lanes).
pub const LANES: u32 = 3;

/// Internal render resolution. 16:9, integer-scales to 1080p-class windows.
pub const RETRO_WIDTH: u32 = 480;
pub const RETRO_HEIGHT: u32 = 270;

/// Window upscale factor for the presentation pass.
pub const WINDOW_SCALE: u32 = 3;

/// Projection and fog parameters, shared by the projector, the road pass,
/// and the vehicle's road-height lookahead.
#[derive(Resource, Clone, Debug)]
pub struct ViewConfig {
    /// Camera eye height above the road surface, world units.
    pub camera_height: f32,
    /// Horizontal field of view in degrees.
    pub field_of_view: f32,
    /// Segments projected per frame ahead of the camera.
    pub draw_distance: usize,
    /// Fraction of the draw distance where fog starts.
    pub fog_start: f32,
    /// Fraction of the draw distance where fog saturates at density 1.
    pub fog_end: f32,
    /// Fog density multiplier. 0 disables fog; higher pulls the wall closer.
    pub fog_density: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            camera_height: 1000.0,
            field_of_view: 100.0,
            draw_distance: 200,
            fog_start: 0.45,
            fog_end: 0.85,
            fog_density: 1.0,
        }
    }
}

impl ViewConfig {
    /// Distance from the eye to the projection plane for the configured
    /// field of view. Projected scale is `camera_depth / camera_z`.
    pub fn camera_depth(&self) -> f32 {
        1.0 / (self.field_of_view.to_radians() / 2.0).tan()
    }

    /// Track distance from the camera to the player car. The road height
    /// sampled here drives the car's vertical position.
    pub fn player_z(&self) -> f32 {
        self.camera_height * self.camera_depth()
    }

    /// Fog amount in [0, 1] for a segment `n` steps ahead of the camera:
    /// 0 below the start threshold, 1 past the density-scaled end threshold,
    /// linear in between.
    pub fn fog_amount(&self, n: usize) -> f32 {
        if self.fog_density <= 0.0 {
            return 0.0;
        }
        let span = ((self.fog_end - self.fog_start) / self.fog_density).max(1e-6);
        let t = n as f32 / self.draw_distance as f32;
        ((t - self.fog_start) / span).clamp(0.0, 1.0)
    }
}
