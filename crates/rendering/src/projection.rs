//! Perspective projector and per-frame draw plan.
//!
//! The road is a chain of segments along world z. Each frame the planner
//! walks `draw_distance` segments ahead of the camera, projects both ends
//! of each onto the retro viewport, and records which segments survive
//! the occlusion tests. Road curvature never moves world geometry: the
//! planner accumulates a per-segment screen-space shift (`dx`) instead,
//! which is what bends the road on screen.
//!
//! Occlusion works with a single watermark. `max_y` starts at the bottom
//! of the viewport and only ever moves up as nearer segments are drawn,
//! so a far segment whose top edge lands below the watermark is hidden
//! behind a hill crest and is skipped. Each segment's watermark snapshot
//! (`clip_y`) is recorded before the tests run, because the sprite pass
//! clips against it even when the road quad itself is skipped.

use bevy::prelude::*;

use simulation::config::{RETRO_HEIGHT, RETRO_WIDTH, ROAD_WIDTH, ViewConfig};
use simulation::track::{SegmentEnd, Track};
use simulation::vehicle::Player;

/// Retro render resolution in pixels. Raster math happens in this space;
/// the presentation transform upscales it to the window.
#[derive(Resource, Debug, Clone, Copy)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: RETRO_WIDTH as f32,
            height: RETRO_HEIGHT as f32,
        }
    }
}

/// Camera placement for one frame, derived from the player state.
#[derive(Debug, Clone, Copy)]
pub struct CameraPose {
    /// World x of the eye. The player's lateral offset is in road
    /// half-widths, so this is `player.x * ROAD_WIDTH`.
    pub x: f32,
    /// World y of the eye: road height under the car plus the eye height.
    pub y: f32,
    /// Track distance of the eye. The car sits `player_z` ahead.
    pub z: f32,
    /// Distance from the eye to the projection plane.
    pub depth: f32,
}

/// One road-center point on the viewport. `x`, `y`, `w` are rounded to
/// whole pixels, matching the chunky look of the upscaled raster.
#[derive(Debug, Clone, Copy)]
pub struct ProjectedPoint {
    /// Depth of the point in front of the eye, world units.
    pub camera_z: f32,
    /// Projected size factor, `depth / camera_z`.
    pub scale: f32,
    pub x: f32,
    pub y: f32,
    /// Projected road half-width in pixels.
    pub w: f32,
}

impl CameraPose {
    /// Projects a road-center point. `road_x` is the accumulated curve
    /// shift of the road center at this depth, and `z_shift` rewinds the
    /// eye by one lap for segments past the seam.
    ///
    /// A point on or behind the eye plane has no projection; it comes
    /// back with zero scale, pushed below the viewport, and the planner's
    /// near-plane test culls it. Never divides by a non-positive depth.
    pub fn project(
        &self,
        end: SegmentEnd,
        road_x: f32,
        z_shift: f32,
        viewport: &Viewport,
    ) -> ProjectedPoint {
        let camera_z = end.z - (self.z - z_shift);
        if camera_z <= 0.0 {
            return ProjectedPoint {
                camera_z,
                scale: 0.0,
                x: 0.0,
                y: viewport.height,
                w: 0.0,
            };
        }
        let scale = self.depth / camera_z;
        let half_w = viewport.width / 2.0;
        let half_h = viewport.height / 2.0;
        ProjectedPoint {
            camera_z,
            scale,
            x: (half_w + scale * (road_x - self.x) * half_w).round(),
            y: (half_h - scale * (end.y - self.y) * half_h).round(),
            w: (scale * ROAD_WIDTH * half_w).round(),
        }
    }
}

/// One segment's projection for the current frame.
#[derive(Debug, Clone, Copy)]
pub struct SegmentFrame {
    /// Index into `Track::segments`.
    pub index: usize,
    /// Near edge.
    pub p1: ProjectedPoint,
    /// Far edge.
    pub p2: ProjectedPoint,
    pub fog: f32,
    /// Occlusion watermark before this segment ran its tests. Sprites on
    /// this segment clip against it.
    pub clip_y: f32,
    /// Whether the road pass draws this segment.
    pub drawn: bool,
}

/// The frame plan, rebuilt once per update and consumed by the road and
/// sprite passes.
#[derive(Resource, Debug, Default)]
pub struct FramePlan {
    /// Segment frames in near-to-far order, starting at the segment under
    /// the camera.
    pub segments: Vec<SegmentFrame>,
}

/// Projects the road ahead of the player into `plan`.
pub fn plan_frame(
    plan: &mut FramePlan,
    track: &Track,
    player: &Player,
    view: &ViewConfig,
    viewport: &Viewport,
) {
    plan.segments.clear();
    if track.is_empty() {
        return;
    }

    let camera_depth = view.camera_depth();
    let position = track.wrap_position(player.position);
    let base_index = track.find_segment_index(position);
    let base_percent = track.percent_into_segment(position);

    let pose = CameraPose {
        x: player.x * ROAD_WIDTH,
        y: player.y + view.camera_height,
        z: position,
        depth: camera_depth,
    };

    let mut x = 0.0_f32;
    let mut dx = -(track.segments[base_index].curve * base_percent);
    let mut max_y = viewport.height;

    // On a track shorter than the draw distance, stop after one lap
    // instead of projecting the same segments twice.
    let count = view.draw_distance.min(track.len());
    for n in 0..count {
        let index = (base_index + n) % track.len();
        let segment = &track.segments[index];
        let z_shift = if index < base_index {
            track.track_length
        } else {
            0.0
        };

        let fog = view.fog_amount(n);
        let clip_y = max_y;

        let p1 = pose.project(segment.p1, x, z_shift, viewport);
        let p2 = pose.project(segment.p2, x + dx, z_shift, viewport);

        x += dx;
        dx += segment.curve;

        let behind = p1.camera_z <= camera_depth;
        let inverted = p2.y >= p1.y;
        let occluded = p2.y >= max_y;
        let drawn = !(behind || inverted || occluded);
        if drawn {
            max_y = max_y.min(p1.y);
        }

        plan.segments.push(SegmentFrame {
            index,
            p1,
            p2,
            fog,
            clip_y,
            drawn,
        });
    }
}

pub fn build_frame_plan(
    mut plan: ResMut<FramePlan>,
    track: Res<Track>,
    player: Res<Player>,
    view: Res<ViewConfig>,
    viewport: Res<Viewport>,
) {
    plan_frame(&mut plan, &track, &player, &view, &viewport);
}

#[cfg(test)]
mod tests {
    use super::*;
    use simulation::builder::build_track;
    use simulation::track_data::{PieceKind, TrackData, TrackPiece};

    fn piece(id: u32, kind: PieceKind, length: u32, value: f32, hill: f32) -> TrackPiece {
        TrackPiece {
            id,
            kind,
            length,
            value,
            hill,
        }
    }

    fn track_of(pieces: Vec<TrackPiece>) -> Track {
        let data = TrackData {
            pieces,
            sprites: Vec::new(),
        };
        build_track(&data, ViewConfig::default().player_z())
    }

    fn flat_track(length: u32) -> Track {
        track_of(vec![piece(1, PieceKind::Straight, length, 0.0, 0.0)])
    }

    fn default_pose() -> CameraPose {
        let view = ViewConfig::default();
        CameraPose {
            x: 0.0,
            y: view.camera_height,
            z: 0.0,
            depth: view.camera_depth(),
        }
    }

    fn plan_for(track: &Track, player: &Player) -> FramePlan {
        let mut plan = FramePlan::default();
        plan_frame(
            &mut plan,
            track,
            player,
            &ViewConfig::default(),
            &Viewport::default(),
        );
        plan
    }

    #[test]
    fn test_project_centers_straight_road() {
        let pose = default_pose();
        let p = pose.project(
            SegmentEnd { y: 0.0, z: 2000.0 },
            0.0,
            0.0,
            &Viewport::default(),
        );
        assert_eq!(p.x, 240.0);
        assert!(p.w > 0.0);
        // Ground ahead of a raised camera lands below the screen center.
        assert!(p.y > 135.0);
    }

    #[test]
    fn test_project_scale_follows_depth() {
        let pose = default_pose();
        let viewport = Viewport::default();
        let near = pose.project(SegmentEnd { y: 0.0, z: 1000.0 }, 0.0, 0.0, &viewport);
        let far = pose.project(SegmentEnd { y: 0.0, z: 2000.0 }, 0.0, 0.0, &viewport);
        assert!((near.scale / far.scale - 2.0).abs() < 1e-4);
        assert!(near.w > far.w);
    }

    #[test]
    fn test_project_guards_eye_plane() {
        let pose = default_pose();
        let viewport = Viewport::default();
        for z in [0.0, -500.0] {
            let p = pose.project(SegmentEnd { y: 0.0, z }, 0.0, 0.0, &viewport);
            assert_eq!(p.scale, 0.0);
            assert_eq!(p.w, 0.0);
            assert_eq!(p.x, 0.0);
            assert_eq!(p.y, viewport.height);
        }
    }

    #[test]
    fn test_plan_covers_draw_distance() {
        let track = flat_track(400);
        let plan = plan_for(&track, &Player::default());
        assert_eq!(plan.segments.len(), ViewConfig::default().draw_distance);
    }

    #[test]
    fn test_plan_caps_at_one_lap() {
        let track = flat_track(50);
        let plan = plan_for(&track, &Player::default());
        assert_eq!(plan.segments.len(), 50);
    }

    #[test]
    fn test_plan_skips_segment_under_camera() {
        let track = flat_track(400);
        let plan = plan_for(&track, &Player::default());
        assert!(!plan.segments[0].drawn);
        assert!(plan.segments.iter().any(|f| f.drawn));
    }

    #[test]
    fn test_plan_watermark_never_rises() {
        let track = track_of(vec![
            piece(1, PieceKind::Straight, 30, 0.0, 0.0),
            piece(2, PieceKind::Hill, 60, 90.0, 0.0),
            piece(3, PieceKind::Combined, 60, 5.0, -90.0),
            piece(4, PieceKind::Curve, 80, -6.0, 0.0),
            piece(5, PieceKind::Straight, 170, 0.0, 0.0),
        ]);
        let player = Player {
            position: 2200.0,
            ..Default::default()
        };
        let plan = plan_for(&track, &player);
        for pair in plan.segments.windows(2) {
            assert!(
                pair[1].clip_y <= pair[0].clip_y,
                "watermark rose from {} to {}",
                pair[0].clip_y,
                pair[1].clip_y
            );
        }
    }

    #[test]
    fn test_plan_drawn_segments_stack_toward_horizon() {
        let track = flat_track(400);
        let plan = plan_for(&track, &Player::default());
        let drawn: Vec<_> = plan.segments.iter().filter(|f| f.drawn).collect();
        assert!(drawn.len() > 10);
        for frame in &drawn {
            assert!(frame.p2.y < frame.p1.y);
            // Level camera: nothing projects above the vanishing line.
            assert!(frame.p2.y >= 134.0);
        }
        let first = drawn.first().unwrap();
        let last = drawn.last().unwrap();
        assert!(last.p2.y < first.p1.y);
    }

    #[test]
    fn test_plan_fog_matches_view_ramp() {
        let view = ViewConfig::default();
        let track = flat_track(400);
        let plan = plan_for(&track, &Player::default());
        for (n, frame) in plan.segments.iter().enumerate() {
            assert_eq!(frame.fog, view.fog_amount(n));
        }
    }

    #[test]
    fn test_plan_depth_increases_across_lap_seam() {
        let track = flat_track(50);
        let player = Player {
            position: 48.0 * track.segment_length + 60.0,
            ..Default::default()
        };
        let plan = plan_for(&track, &player);
        assert_eq!(plan.segments.len(), 50);
        for pair in plan.segments.windows(2) {
            assert!(
                pair[1].p1.camera_z > pair[0].p1.camera_z,
                "depth regressed at segment {}",
                pair[1].index
            );
        }
    }

    #[test]
    fn test_plan_curve_bends_road_sideways() {
        let right = track_of(vec![
            piece(1, PieceKind::Straight, 10, 0.0, 0.0),
            piece(2, PieceKind::Curve, 120, 5.0, 0.0),
            piece(3, PieceKind::Straight, 270, 0.0, 0.0),
        ]);
        let player = Player {
            position: 11.0 * right.segment_length,
            ..Default::default()
        };
        let plan = plan_for(&right, &player);
        let drawn: Vec<_> = plan.segments.iter().filter(|f| f.drawn).collect();
        let near = drawn.first().unwrap();
        let far = drawn.last().unwrap();
        assert!(
            far.p1.x > near.p1.x + 5.0,
            "right-hand curve should push the far road right: near {} far {}",
            near.p1.x,
            far.p1.x
        );
    }

    #[test]
    fn test_plan_player_offset_shifts_road_opposite() {
        let track = flat_track(400);
        let player = Player {
            x: 1.0,
            ..Default::default()
        };
        let plan = plan_for(&track, &player);
        let near = plan.segments.iter().find(|f| f.drawn).unwrap();
        // Car on the right edge of the pavement: road center on screen
        // moves left.
        assert!(near.p1.x < 240.0);
    }

    #[test]
    fn test_plan_empty_track_clears_previous_frame() {
        let track = flat_track(400);
        let mut plan = FramePlan::default();
        plan_frame(
            &mut plan,
            &track,
            &Player::default(),
            &ViewConfig::default(),
            &Viewport::default(),
        );
        assert!(!plan.segments.is_empty());

        plan_frame(
            &mut plan,
            &Track::default(),
            &Player::default(),
            &ViewConfig::default(),
            &Viewport::default(),
        );
        assert!(plan.segments.is_empty());
    }
}
