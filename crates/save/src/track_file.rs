//! Track files.
//!
//! The interchange format is pretty-printed JSON: an ordered list of
//! track pieces plus the placed roadside sprites. Saves go through the
//! write-rename pattern (`{path}.tmp`, flush, rename) so a crash mid-save
//! cannot truncate an existing track.

use std::fmt;
use std::fs::{self, File};
use std::io::{self, Write};
use std::path::Path;

use simulation::track_data::TrackData;

#[derive(Debug)]
pub enum TrackFileError {
    Io(io::Error),
    /// The file exists but is not valid interchange JSON.
    Parse(serde_json::Error),
}

impl fmt::Display for TrackFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrackFileError::Io(e) => write!(f, "I/O error: {e}"),
            TrackFileError::Parse(e) => write!(f, "malformed track file: {e}"),
        }
    }
}

impl std::error::Error for TrackFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TrackFileError::Io(e) => Some(e),
            TrackFileError::Parse(e) => Some(e),
        }
    }
}

impl From<io::Error> for TrackFileError {
    fn from(e: io::Error) -> Self {
        TrackFileError::Io(e)
    }
}

impl From<serde_json::Error> for TrackFileError {
    fn from(e: serde_json::Error) -> Self {
        TrackFileError::Parse(e)
    }
}

pub fn load_track_data(path: &str) -> Result<TrackData, TrackFileError> {
    let text = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

/// Writes `{path}.tmp`, flushes to disk, then renames over `path`.
pub fn save_track_data(path: &str, data: &TrackData) -> Result<(), TrackFileError> {
    let json = serde_json::to_string_pretty(data)?;

    let final_path = Path::new(path);
    let tmp_path = format!("{}.tmp", path);

    if let Some(parent) = final_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut file = File::create(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    fs::rename(&tmp_path, final_path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Helper to create a unique temp directory for each test.
    fn test_dir(name: &str) -> String {
        let dir = format!("/tmp/sundrift_track_file_test_{}", name);
        let _ = fs::remove_dir_all(&dir);
        fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[test]
    fn test_round_trip_preserves_track() {
        let dir = test_dir("round_trip");
        let path = format!("{}/track.json", dir);

        let data = TrackData::demo_circuit();
        save_track_data(&path, &data).unwrap();
        let loaded = load_track_data(&path).unwrap();
        assert_eq!(loaded, data);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_leaves_no_temp_file() {
        let dir = test_dir("no_temp");
        let path = format!("{}/track.json", dir);

        save_track_data(&path, &TrackData::demo_circuit()).unwrap();
        assert!(Path::new(&path).exists());
        assert!(!Path::new(&format!("{}.tmp", path)).exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_overwrites_existing_file() {
        let dir = test_dir("overwrites");
        let path = format!("{}/track.json", dir);

        fs::write(&path, "stale").unwrap();
        let data = TrackData::demo_circuit();
        save_track_data(&path, &data).unwrap();
        assert_eq!(load_track_data(&path).unwrap(), data);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = test_dir("parent_dirs");
        let path = format!("{}/nested/deep/track.json", dir);

        save_track_data(&path, &TrackData::demo_circuit()).unwrap();
        assert!(Path::new(&path).exists());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = load_track_data("/tmp/sundrift_track_file_test_missing/none.json").unwrap_err();
        assert!(matches!(err, TrackFileError::Io(_)));
    }

    #[test]
    fn test_garbage_is_a_parse_error() {
        let dir = test_dir("garbage");
        let path = format!("{}/track.json", dir);

        fs::write(&path, "not json at all").unwrap();
        let err = load_track_data(&path).unwrap_err();
        assert!(matches!(err, TrackFileError::Parse(_)));
        assert!(err.to_string().contains("malformed track file"));

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_written_file_is_pretty_printed() {
        let dir = test_dir("pretty");
        let path = format!("{}/track.json", dir);

        save_track_data(&path, &TrackData::demo_circuit()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.lines().count() > 4, "expected multi-line JSON");
        assert!(text.contains("\"pieces\""));
        assert!(text.contains("\"sprites\""));

        let _ = fs::remove_dir_all(&dir);
    }
}
