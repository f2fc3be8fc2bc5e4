//! The built track: the flat segment list every per-frame query runs
//! against. Produced from [`TrackData`](crate::track_data::TrackData) by
//! [`build_track`](crate::builder::build_track).

use bevy::prelude::*;

use crate::config::{RUMBLE_LENGTH, SEGMENT_LENGTH};
use crate::track_data::{PlacedSprite, TrackPiece};

/// One end of a segment in world space. `z` is fixed at build time;
/// `y` comes from the elevation pass.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SegmentEnd {
    pub y: f32,
    pub z: f32,
}

/// Alternating paint scheme plus the start/finish overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorBand {
    Light,
    Dark,
    Start,
    Finish,
}

/// Segments alternate in runs of [`RUMBLE_LENGTH`] so rumble strips read
/// at speed.
pub fn band_for_index(index: usize) -> ColorBand {
    if (index / RUMBLE_LENGTH) % 2 == 0 {
        ColorBand::Light
    } else {
        ColorBand::Dark
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub index: usize,
    /// Per-segment curvature accumulated by the projector.
    pub curve: f32,
    /// Elevation delta across this segment.
    pub hill: f32,
    pub band: ColorBand,
    pub p1: SegmentEnd,
    pub p2: SegmentEnd,
    /// Sprites anchored to this segment, in placement order.
    pub sprites: Vec<PlacedSprite>,
}

/// The flat, query-friendly form of the track. Rebuilt whenever the
/// declarative data changes; all gameplay and rendering reads go through
/// the position queries here.
#[derive(Resource, Debug, Clone, Default)]
pub struct Track {
    pub segments: Vec<Segment>,
    /// The source pieces, kept so an edited track can round-trip back to
    /// the interchange format.
    pub pieces: Vec<TrackPiece>,
    pub segment_length: f32,
    pub track_length: f32,
}

impl Track {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Index of the segment containing world position `z`. Positions are
    /// circular: anything outside [0, track_length) wraps.
    pub fn find_segment_index(&self, z: f32) -> usize {
        let wrapped = self.wrap_position(z);
        ((wrapped / self.segment_length) as usize).min(self.segments.len() - 1)
    }

    pub fn find_segment(&self, z: f32) -> &Segment {
        &self.segments[self.find_segment_index(z)]
    }

    /// Fraction [0, 1) of the way through the segment containing `z`.
    pub fn percent_into_segment(&self, z: f32) -> f32 {
        let wrapped = self.wrap_position(z);
        (wrapped % self.segment_length) / self.segment_length
    }

    /// Maps any world position into [0, track_length).
    pub fn wrap_position(&self, z: f32) -> f32 {
        z.rem_euclid(self.track_length)
    }

    /// Road height at `z`, interpolated across the containing segment.
    pub fn elevation_at(&self, z: f32) -> f32 {
        let segment = self.find_segment(z);
        let percent = self.percent_into_segment(z);
        segment.p1.y + (segment.p2.y - segment.p1.y) * percent
    }

    /// Curvature at `z`, blended toward the next segment so steering
    /// forces ramp instead of stepping.
    pub fn curve_at(&self, z: f32) -> f32 {
        let index = self.find_segment_index(z);
        let percent = self.percent_into_segment(z);
        let current = self.segments[index].curve;
        let next = self.segments[(index + 1) % self.segments.len()].curve;
        current + (next - current) * percent
    }
}

/// Convenience for tests and the builder: a segment's base z from its index.
pub fn segment_base_z(index: usize) -> f32 {
    index as f32 * SEGMENT_LENGTH
}
