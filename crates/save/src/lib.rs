//! Track persistence and startup track selection.
//!
//! Startup resolves which track to drive from one environment variable:
//! unset runs the built-in demo circuit, `random` rolls a procedural
//! layout, anything else is read as a track file path with a fallback to
//! the demo circuit on any error. At runtime F5 exports the current
//! track back to the interchange format, so a generated layout can be
//! kept and edited.

pub mod track_file;

use bevy::prelude::*;

use simulation::game_rng::GameRng;
use simulation::procedural::generate_track;
use simulation::track::Track;
use simulation::track_data::TrackData;
use simulation::GameStep;

/// Startup track selector.
pub const TRACK_ENV: &str = "SUNDRIFT_TRACK";

/// Where [`export_on_key`] writes the running track.
pub const EXPORT_PATH: &str = "sundrift-track.json";

pub struct SavePlugin;

impl Plugin for SavePlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, load_startup_track)
            .add_systems(Update, export_on_key.in_set(GameStep::Input));
    }
}

fn load_startup_track(mut commands: Commands, mut rng: ResMut<GameRng>) {
    let data = match std::env::var(TRACK_ENV) {
        Err(_) => TrackData::demo_circuit(),
        Ok(choice) if choice == "random" => {
            let seed = rng.reseed_from_entropy();
            info!("generating random track, seed {seed}");
            generate_track(&mut rng.0)
        }
        Ok(path) => match track_file::load_track_data(&path) {
            Ok(data) => {
                info!("loaded track from {path}");
                data
            }
            Err(err) => {
                warn!("could not load {path}: {err}; running the demo circuit");
                TrackData::demo_circuit()
            }
        },
    };
    commands.insert_resource(data);
}

fn export_on_key(keys: Res<ButtonInput<KeyCode>>, track: Res<Track>) {
    if !keys.just_pressed(KeyCode::F5) || track.is_empty() {
        return;
    }
    let data = simulation::builder::export_track(&track);
    match track_file::save_track_data(EXPORT_PATH, &data) {
        Ok(()) => info!("exported track to {EXPORT_PATH}"),
        Err(err) => warn!("track export failed: {err}"),
    }
}
