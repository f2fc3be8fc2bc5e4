//! Fixed-resolution render target and presentation upscale.
//!
//! The world draws through its own 2D camera into a 480x270 image, and a
//! second camera shows nothing but that image scaled up to the window
//! with nearest sampling. The internal resolution stays fixed no matter
//! the window size, which is what keeps the pixel grid honest.

use bevy::prelude::*;
use bevy::render::camera::RenderTarget;
use bevy::render::render_asset::RenderAssetUsages;
use bevy::render::render_resource::{Extent3d, TextureDimension, TextureFormat, TextureUsages};
use bevy::render::view::RenderLayers;

use simulation::config::{RETRO_HEIGHT, RETRO_WIDTH, WINDOW_SCALE};

use crate::palette;

/// Layer for the upscale sprite and its camera, keeping them invisible
/// to the world camera and the world invisible to them.
const PRESENTATION_LAYER: usize = 1;

pub fn setup_retro_target(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    let size = Extent3d {
        width: RETRO_WIDTH,
        height: RETRO_HEIGHT,
        depth_or_array_layers: 1,
    };
    let mut image = Image::new_fill(
        size,
        TextureDimension::D2,
        &[0, 0, 0, 255],
        TextureFormat::Bgra8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD | RenderAssetUsages::MAIN_WORLD,
    );
    image.texture_descriptor.usage = TextureUsages::TEXTURE_BINDING
        | TextureUsages::COPY_DST
        | TextureUsages::RENDER_ATTACHMENT;
    image.sampler = bevy::image::ImageSampler::nearest();
    let target = images.add(image);

    // World camera. Renders first, into the retro frame.
    commands.spawn((
        Camera2d::default(),
        Camera {
            order: -1,
            target: RenderTarget::Image(target.clone()),
            clear_color: ClearColorConfig::Custom(palette::sky_top()),
            ..default()
        },
        Msaa::Off,
    ));

    // Presentation pair: the retro frame as a sprite, and the window
    // camera that sees only it.
    commands.spawn((
        Sprite {
            image: target,
            ..default()
        },
        Transform::from_scale(Vec3::splat(WINDOW_SCALE as f32)),
        RenderLayers::layer(PRESENTATION_LAYER),
    ));
    commands.spawn((Camera2d::default(), RenderLayers::layer(PRESENTATION_LAYER)));
}
