//! Sunset palette.
//!
//! Every draw in the retro pass is flat-shaded, so the whole look of the
//! game lives in this table. The fog color doubles as the sky's horizon
//! color: the far road fades into the same tone the sky gradient lands
//! on, which hides the seam at the draw-distance wall.

use bevy::prelude::*;

use simulation::track::ColorBand;

/// Vertex color for an sRGB byte triple, opaque.
pub fn srgb(r: u8, g: u8, b: u8) -> [f32; 4] {
    Color::srgb_u8(r, g, b).to_srgba().to_f32_array()
}

/// Zenith color, also the window clear color.
pub fn sky_top() -> Color {
    Color::srgb_u8(38, 34, 84)
}

/// Horizon glow and fog color.
pub fn horizon() -> [f32; 4] {
    srgb(248, 178, 120)
}

pub fn sun_core() -> [f32; 4] {
    srgb(255, 226, 158)
}

pub fn sun_rim() -> [f32; 4] {
    srgb(252, 190, 112)
}

/// Paint scheme for one color band of road.
#[derive(Debug, Clone, Copy)]
pub struct BandColors {
    pub road: [f32; 4],
    pub grass: [f32; 4],
    pub rumble: [f32; 4],
    /// Lane markers paint only on bands that carry them, which is what
    /// makes the markers read as dashes.
    pub lane: Option<[f32; 4]>,
}

pub fn band_colors(band: ColorBand) -> BandColors {
    match band {
        ColorBand::Light => BandColors {
            road: srgb(99, 94, 106),
            grass: srgb(198, 153, 107),
            rumble: srgb(226, 226, 226),
            lane: Some(srgb(214, 214, 214)),
        },
        ColorBand::Dark => BandColors {
            road: srgb(92, 87, 99),
            grass: srgb(181, 137, 93),
            rumble: srgb(186, 64, 64),
            lane: None,
        },
        // Start and finish stripes override the whole band.
        ColorBand::Start => BandColors {
            road: srgb(240, 240, 240),
            grass: srgb(240, 240, 240),
            rumble: srgb(240, 240, 240),
            lane: None,
        },
        ColorBand::Finish => BandColors {
            road: srgb(26, 24, 34),
            grass: srgb(26, 24, 34),
            rumble: srgb(26, 24, 34),
            lane: None,
        },
    }
}

/// Blends a vertex color toward the fog color. Alpha is untouched.
pub fn fog_mix(color: [f32; 4], amount: f32) -> [f32; 4] {
    let fog = horizon();
    let t = amount.clamp(0.0, 1.0);
    [
        color[0] + (fog[0] - color[0]) * t,
        color[1] + (fog[1] - color[1]) * t,
        color[2] + (fog[2] - color[2]) * t,
        color[3],
    ]
}
