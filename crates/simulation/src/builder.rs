//! Turns declarative [`TrackData`] into the flat [`Track`] segment list.
//!
//! Each piece emits its segments through an enter/hold/exit envelope so
//! curves and hills ramp in and out instead of snapping. A second pass
//! accumulates hill deltas into world-space elevations.

use bevy::prelude::*;

use crate::config::{RUMBLE_LENGTH, SEGMENT_LENGTH, ViewConfig};
use crate::track::{band_for_index, segment_base_z, ColorBand, Segment, SegmentEnd, Track};
use crate::track_data::{PieceKind, TrackData, TrackPiece};

/// Substitute length when the input has no usable pieces. The fallback
/// piece is kept in [`Track::pieces`] so exports still round-trip.
const FALLBACK_STRAIGHT_SEGMENTS: u32 = 100;

// ---------------------------------------------------------------------------
// Envelope
// ---------------------------------------------------------------------------

/// Segment counts for the three phases of a piece. Integer division
/// rounds the remainder into the exit phase.
pub fn envelope_phases(length: u32) -> (u32, u32, u32) {
    let enter = length / 4;
    let hold = length / 2;
    let exit = length - enter - hold;
    (enter, hold, exit)
}

/// Sum of the envelope across a piece of the given length, for a unit
/// value. A hill piece changes elevation by `value * envelope_sum_factor`.
pub fn envelope_sum_factor(length: u32) -> f32 {
    let (enter, hold, exit) = envelope_phases(length);
    let enter_sum = if enter > 0 { (enter - 1) as f32 / 2.0 } else { 0.0 };
    let exit_sum = if exit > 0 { (exit + 1) as f32 / 2.0 } else { 0.0 };
    enter_sum + hold as f32 + exit_sum
}

fn emit_piece(piece: &TrackPiece, segments: &mut Vec<Segment>) {
    let curve = piece.curve_amount();
    let hill = piece.hill_amount();
    let (enter, hold, exit) = envelope_phases(piece.length);

    for i in 0..enter {
        let t = i as f32 / enter as f32;
        push_segment(segments, curve * t, hill * t);
    }
    for _ in 0..hold {
        push_segment(segments, curve, hill);
    }
    for i in 0..exit {
        let t = 1.0 - i as f32 / exit as f32;
        push_segment(segments, curve * t, hill * t);
    }
}

fn push_segment(segments: &mut Vec<Segment>, curve: f32, hill: f32) {
    let index = segments.len();
    segments.push(Segment {
        index,
        curve,
        hill,
        band: band_for_index(index),
        p1: SegmentEnd {
            y: 0.0,
            z: segment_base_z(index),
        },
        p2: SegmentEnd {
            y: 0.0,
            z: segment_base_z(index + 1),
        },
        sprites: Vec::new(),
    });
}

// ---------------------------------------------------------------------------
// Build
// ---------------------------------------------------------------------------

/// Builds the queryable track. `player_z` positions the start line a
/// couple of segments ahead of the camera.
pub fn build_track(data: &TrackData, player_z: f32) -> Track {
    let mut pieces = data.pieces.clone();
    let total: u32 = pieces.iter().map(|p| p.length).sum();
    if total == 0 {
        warn!("track has no segments, substituting a straight");
        pieces = vec![TrackPiece {
            id: 0,
            kind: PieceKind::Straight,
            length: FALLBACK_STRAIGHT_SEGMENTS,
            value: 0.0,
            hill: 0.0,
        }];
    }

    let mut segments = Vec::with_capacity(pieces.iter().map(|p| p.length as usize).sum());
    for piece in &pieces {
        emit_piece(piece, &mut segments);
    }

    // Accumulate hill deltas into elevations. Each segment starts where
    // the previous one ended.
    let mut running = 0.0;
    for segment in &mut segments {
        segment.p1.y = running;
        running += segment.hill;
        segment.p2.y = running;
    }

    let track_length = segments.len() as f32 * SEGMENT_LENGTH;
    let player_index =
        ((player_z.rem_euclid(track_length) / SEGMENT_LENGTH) as usize).min(segments.len() - 1);
    let len = segments.len();
    segments[(player_index + 2) % len].band = ColorBand::Start;
    segments[(player_index + 3) % len].band = ColorBand::Start;
    for n in 0..RUMBLE_LENGTH.min(len) {
        segments[len - 1 - n].band = ColorBand::Finish;
    }

    splice_sprites(data, &mut segments);

    Track {
        segments,
        pieces,
        segment_length: SEGMENT_LENGTH,
        track_length,
    }
}

fn splice_sprites(data: &TrackData, segments: &mut [Segment]) {
    for sprite in &data.sprites {
        match segments.get_mut(sprite.segment_index) {
            Some(segment) => segment.sprites.push(sprite.clone()),
            None => warn!(
                "sprite {} targets segment {} past track end {}, skipping",
                sprite.id,
                sprite.segment_index,
                segments.len()
            ),
        }
    }
}

/// Inverse of [`build_track`]: recovers the interchange document from a
/// built track. Sprites come back in segment order.
pub fn export_track(track: &Track) -> TrackData {
    let mut sprites = Vec::new();
    for segment in &track.segments {
        sprites.extend(segment.sprites.iter().cloned());
    }
    TrackData {
        pieces: track.pieces.clone(),
        sprites,
    }
}

// ---------------------------------------------------------------------------
// Rebuild system
// ---------------------------------------------------------------------------

/// Rebuilds the segment list whenever the declarative data changes.
pub fn rebuild_track(
    data: Option<Res<TrackData>>,
    view: Res<ViewConfig>,
    mut track: ResMut<Track>,
) {
    let Some(data) = data else {
        return;
    };
    if !data.is_changed() && !track.is_empty() {
        return;
    }
    *track = build_track(&data, view.player_z());
    info!(
        "track built: {} segments, {} world units",
        track.len(),
        track.track_length
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::SpriteKind;
    use crate::track_data::PlacedSprite;

    fn data_with_piece(kind: PieceKind, length: u32, value: f32) -> TrackData {
        TrackData {
            pieces: vec![TrackPiece {
                id: 0,
                kind,
                length,
                value,
                hill: 0.0,
            }],
            sprites: Vec::new(),
        }
    }

    #[test]
    fn test_envelope_phases_sum_to_length() {
        for length in 1..200 {
            let (enter, hold, exit) = envelope_phases(length);
            assert_eq!(enter + hold + exit, length);
        }
        assert_eq!(envelope_phases(40), (10, 20, 10));
        assert_eq!(envelope_phases(7), (1, 3, 3));
    }

    #[test]
    fn test_envelope_sum_factor_matches_emitted_segments() {
        for length in [1, 2, 3, 7, 40, 63] {
            let data = data_with_piece(PieceKind::Hill, length, 1.0);
            let track = build_track(&data, 0.0);
            let emitted: f32 = track.segments.iter().map(|s| s.hill).sum();
            assert!((envelope_sum_factor(length) - emitted).abs() < 1e-4);
        }
        assert_eq!(envelope_sum_factor(40), 30.0);
    }

    #[test]
    fn test_straight_piece_emits_flat_segments() {
        let data = data_with_piece(PieceKind::Straight, 50, 0.0);
        let track = build_track(&data, 0.0);
        assert_eq!(track.len(), 50);
        assert_eq!(track.track_length, 50.0 * SEGMENT_LENGTH);
        for segment in &track.segments {
            assert_eq!(segment.curve, 0.0);
            assert_eq!(segment.hill, 0.0);
        }
    }

    #[test]
    fn test_curve_envelope_ramps_and_holds() {
        let data = data_with_piece(PieceKind::Curve, 40, 8.0);
        let track = build_track(&data, 0.0);
        assert_eq!(track.len(), 40);
        assert_eq!(track.segments[0].curve, 0.0);
        assert!((track.segments[9].curve - 7.2).abs() < 1e-4);
        for i in 10..30 {
            assert_eq!(track.segments[i].curve, 8.0);
        }
        assert!((track.segments[30].curve - 8.0).abs() < 1e-4);
        assert!((track.segments[39].curve - 0.8).abs() < 1e-4);
    }

    #[test]
    fn test_hill_elevation_is_continuous() {
        let data = TrackData {
            pieces: vec![
                TrackPiece {
                    id: 0,
                    kind: PieceKind::Hill,
                    length: 30,
                    value: 120.0,
                    hill: 0.0,
                },
                TrackPiece {
                    id: 1,
                    kind: PieceKind::Hill,
                    length: 25,
                    value: -80.0,
                    hill: 0.0,
                },
            ],
            sprites: Vec::new(),
        };
        let track = build_track(&data, 0.0);
        for pair in track.segments.windows(2) {
            assert!((pair[0].p2.y - pair[1].p1.y).abs() < 1e-2);
        }
        assert_eq!(track.segments[0].p1.y, 0.0);
    }

    #[test]
    fn test_combined_piece_feeds_both_envelopes() {
        let data = TrackData {
            pieces: vec![TrackPiece {
                id: 0,
                kind: PieceKind::Combined,
                length: 40,
                value: 4.0,
                hill: 60.0,
            }],
            sprites: Vec::new(),
        };
        let track = build_track(&data, 0.0);
        assert_eq!(track.segments[15].curve, 4.0);
        assert_eq!(track.segments[15].hill, 60.0);
        assert!(track.segments[39].p2.y > 0.0);
    }

    #[test]
    fn test_start_and_finish_bands() {
        let data = data_with_piece(PieceKind::Straight, 80, 0.0);
        let view = ViewConfig::default();
        let track = build_track(&data, view.player_z());
        let player_index = track.find_segment_index(view.player_z());
        assert_eq!(track.segments[player_index + 2].band, ColorBand::Start);
        assert_eq!(track.segments[player_index + 3].band, ColorBand::Start);
        for n in 0..RUMBLE_LENGTH {
            assert_eq!(track.segments[80 - 1 - n].band, ColorBand::Finish);
        }
    }

    #[test]
    fn test_sprites_splice_onto_segments() {
        let mut data = data_with_piece(PieceKind::Straight, 50, 0.0);
        data.sprites = vec![
            PlacedSprite {
                id: 0,
                segment_index: 12,
                kind: SpriteKind::Tree,
                offset: 1.5,
            },
            PlacedSprite {
                id: 1,
                segment_index: 999,
                kind: SpriteKind::Rock,
                offset: -1.2,
            },
        ];
        let track = build_track(&data, 0.0);
        assert_eq!(track.segments[12].sprites.len(), 1);
        assert_eq!(track.segments[12].sprites[0].kind, SpriteKind::Tree);
        let total: usize = track.segments.iter().map(|s| s.sprites.len()).sum();
        assert_eq!(total, 1);
    }

    #[test]
    fn test_empty_data_falls_back_to_straight() {
        let track = build_track(&TrackData::default(), 0.0);
        assert_eq!(track.len(), FALLBACK_STRAIGHT_SEGMENTS as usize);
        assert!(track.segments.iter().all(|s| s.curve == 0.0));
        // The substitute piece survives export.
        let exported = export_track(&track);
        assert_eq!(exported.pieces.len(), 1);
        assert_eq!(exported.pieces[0].length, FALLBACK_STRAIGHT_SEGMENTS);
    }

    #[test]
    fn test_export_round_trips() {
        let mut data = data_with_piece(PieceKind::Curve, 60, -5.0);
        data.sprites = vec![
            PlacedSprite {
                id: 0,
                segment_index: 5,
                kind: SpriteKind::PalmTree,
                offset: 1.3,
            },
            PlacedSprite {
                id: 1,
                segment_index: 40,
                kind: SpriteKind::BillboardFuel,
                offset: -1.6,
            },
        ];
        let track = build_track(&data, 0.0);
        assert_eq!(export_track(&track), data);
    }

    #[test]
    fn test_export_of_demo_circuit_keeps_every_sprite() {
        let data = TrackData::demo_circuit();
        let track = build_track(&data, ViewConfig::default().player_z());
        let mut exported = export_track(&data_round(&track));
        let mut original = data.clone();
        exported.sprites.sort_by_key(|s| s.id);
        original.sprites.sort_by_key(|s| s.id);
        assert_eq!(exported, original);
    }

    // Build then export once more to make sure nothing drifts over a
    // second pass.
    fn data_round(track: &Track) -> Track {
        build_track(&export_track(track), 0.0)
    }
}
