use serde::{Deserialize, Serialize};

use crate::geometry::Rect;
use crate::physics::DEFAULT_GROUND_Y;

/// Width of the solid wall placed where two ground segments change height.
const TRANSITION_WALL_WIDTH: f32 = 4.0;

/// A horizontal ground span `[x1, x2)` whose surface sits at height `y`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GroundSegment {
    pub x1: f32,
    pub x2: f32,
    pub y: f32,
}

impl GroundSegment {
    pub fn contains(&self, x: f32) -> bool {
        x >= self.x1 && x < self.x2
    }
}

/// Ordered, contiguous ground segments covering the whole map width.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Terrain {
    segments: Vec<GroundSegment>,
}

impl Terrain {
    pub fn new(segments: Vec<GroundSegment>) -> Self {
        Self { segments }
    }

    pub fn segments(&self) -> &[GroundSegment] {
        &self.segments
    }

    /// Ground surface height under `x`.
    ///
    /// Falls back to [`DEFAULT_GROUND_Y`] outside every segment.
    pub fn height_at(&self, x: f32) -> f32 {
        self.segments
            .iter()
            .find(|seg| seg.contains(x))
            .map_or(DEFAULT_GROUND_Y, |seg| seg.y)
    }

    /// Solid walls filling the step between adjacent segments of different height.
    pub fn transition_walls(&self) -> Vec<Rect> {
        self.segments
            .windows(2)
            .filter(|pair| pair[0].y != pair[1].y)
            .map(|pair| {
                let top = pair[0].y.min(pair[1].y);
                let bottom = pair[0].y.max(pair[1].y);
                Rect::new(
                    pair[1].x1 - TRANSITION_WALL_WIDTH / 2.0,
                    top,
                    TRANSITION_WALL_WIDTH,
                    bottom - top,
                )
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stepped() -> Terrain {
        Terrain::new(vec![
            GroundSegment {
                x1: 0.0,
                x2: 500.0,
                y: 400.0,
            },
            GroundSegment {
                x1: 500.0,
                x2: 900.0,
                y: 340.0,
            },
            GroundSegment {
                x1: 900.0,
                x2: 2400.0,
                y: 340.0,
            },
        ])
    }

    #[test]
    fn height_follows_segments() {
        let terrain = stepped();
        assert_eq!(terrain.height_at(0.0), 400.0);
        assert_eq!(terrain.height_at(499.9), 400.0);
        assert_eq!(terrain.height_at(500.0), 340.0);
        assert_eq!(terrain.height_at(2399.0), 340.0);
    }

    #[test]
    fn uncovered_x_uses_fallback() {
        let terrain = stepped();
        assert_eq!(terrain.height_at(2400.0), DEFAULT_GROUND_Y);
        assert_eq!(terrain.height_at(-1.0), DEFAULT_GROUND_Y);
        assert_eq!(Terrain::default().height_at(10.0), DEFAULT_GROUND_Y);
    }

    #[test]
    fn walls_only_at_height_changes() {
        let walls = stepped().transition_walls();
        assert_eq!(walls, vec![Rect::new(498.0, 340.0, 4.0, 60.0)]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn contiguous_segments_cover_every_x(
                cuts in proptest::collection::btree_set(1u32..2399, 0..8),
                heights in proptest::collection::vec(220.0f32..=400.0, 9),
                x in 0.0f32..2400.0,
            ) {
                let mut bounds: Vec<f32> = vec![0.0];
                bounds.extend(cuts.iter().map(|&c| c as f32));
                bounds.push(2400.0);
                let segments: Vec<GroundSegment> = bounds
                    .windows(2)
                    .zip(heights.iter())
                    .map(|(w, &y)| GroundSegment { x1: w[0], x2: w[1], y })
                    .collect();
                let terrain = Terrain::new(segments.clone());

                let matches: Vec<&GroundSegment> =
                    segments.iter().filter(|s| s.contains(x)).collect();
                prop_assert_eq!(matches.len(), 1, "x={} must hit exactly one segment", x);
                prop_assert_eq!(terrain.height_at(x), matches[0].y);
            }
        }
    }
}
