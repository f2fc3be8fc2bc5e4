//! Random track generation: bounded random pieces bracketed by straights,
//! a corrective hill so every lap ends back at ground level, and sprites
//! scattered along the roadside.

use rand::Rng;

use crate::builder::envelope_sum_factor;
use crate::sprites::SpriteKind;
use crate::track_data::{PieceKind, PlacedSprite, TrackData, TrackPiece};

/// Straight runs bracketing the lap so the start line sits on level road.
const BRACKET_LENGTH: u32 = 40;
const MIN_PIECES: u32 = 10;
const MAX_PIECES: u32 = 24;
const MIN_PIECE_LENGTH: u32 = 25;
const MAX_PIECE_LENGTH: u32 = 70;
const MIN_CURVE: f32 = 2.0;
const MAX_CURVE: f32 = 8.0;
const MIN_HILL: f32 = 20.0;
const MAX_HILL: f32 = 80.0;
/// Target per-segment grade of the corrective piece.
const CORRECTIVE_VALUE: f32 = 60.0;
const CORRECTIVE_MIN_LENGTH: u32 = 20;
const CORRECTIVE_MAX_LENGTH: u32 = 150;
/// Segments at the start of the lap kept free of roadside sprites.
const START_CLEARANCE: usize = 12;

pub fn generate_track<R: Rng>(rng: &mut R) -> TrackData {
    let mut pieces = vec![bracket_piece(0)];

    let count = rng.gen_range(MIN_PIECES..=MAX_PIECES);
    for _ in 0..count {
        let length = rng.gen_range(MIN_PIECE_LENGTH..=MAX_PIECE_LENGTH);
        let roll: f32 = rng.gen();
        let (kind, value, hill) = if roll < 0.30 {
            (PieceKind::Straight, 0.0, 0.0)
        } else if roll < 0.60 {
            (
                PieceKind::Curve,
                signed(rng) * rng.gen_range(MIN_CURVE..=MAX_CURVE),
                0.0,
            )
        } else if roll < 0.85 {
            (
                PieceKind::Hill,
                signed(rng) * rng.gen_range(MIN_HILL..=MAX_HILL),
                0.0,
            )
        } else {
            (
                PieceKind::Combined,
                signed(rng) * rng.gen_range(MIN_CURVE..=MAX_CURVE),
                signed(rng) * rng.gen_range(MIN_HILL..=MAX_HILL),
            )
        };
        pieces.push(TrackPiece {
            id: pieces.len() as u32,
            kind,
            length,
            value,
            hill,
        });
    }

    // Undo the accumulated climb with one sized-to-fit hill, otherwise the
    // lap seam would be a vertical cliff.
    let net: f32 = pieces
        .iter()
        .map(|p| p.hill_amount() * envelope_sum_factor(p.length))
        .sum();
    if net.abs() >= 1.0 {
        let length = ((net.abs() / (CORRECTIVE_VALUE * 0.75)).ceil() as u32)
            .clamp(CORRECTIVE_MIN_LENGTH, CORRECTIVE_MAX_LENGTH);
        pieces.push(TrackPiece {
            id: pieces.len() as u32,
            kind: PieceKind::Hill,
            length,
            value: -net / envelope_sum_factor(length),
            hill: 0.0,
        });
    }

    pieces.push(bracket_piece(pieces.len() as u32));

    let total_segments: usize = pieces.iter().map(|p| p.length as usize).sum();
    let sprites = scatter_sprites(rng, total_segments);

    TrackData { pieces, sprites }
}

fn bracket_piece(id: u32) -> TrackPiece {
    TrackPiece {
        id,
        kind: PieceKind::Straight,
        length: BRACKET_LENGTH,
        value: 0.0,
        hill: 0.0,
    }
}

fn signed<R: Rng>(rng: &mut R) -> f32 {
    if rng.gen_bool(0.5) { 1.0 } else { -1.0 }
}

fn scatter_sprites<R: Rng>(rng: &mut R, total_segments: usize) -> Vec<PlacedSprite> {
    let mut sprites = Vec::new();
    let mut segment_index = START_CLEARANCE;
    while segment_index + 4 < total_segments {
        let roll: f32 = rng.gen();
        let kind = if roll < 0.70 {
            match rng.gen_range(0..5) {
                0 => SpriteKind::PalmTree,
                1 => SpriteKind::Tree,
                2 => SpriteKind::DeadTree,
                3 => SpriteKind::Bush,
                _ => SpriteKind::Cactus,
            }
        } else if roll < 0.85 {
            SpriteKind::Rock
        } else if rng.gen_bool(0.5) {
            SpriteKind::BillboardFuel
        } else {
            SpriteKind::BillboardMotel
        };
        sprites.push(PlacedSprite {
            id: sprites.len() as u32,
            segment_index,
            kind,
            offset: signed(rng) * rng.gen_range(1.15..1.95),
        });
        segment_index += rng.gen_range(5..=14);
    }
    sprites
}
