use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::geometry::frame::Frame;

/// Half-open interval `[lo, hi)` of local spline parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParamRange {
    pub lo: f64,
    pub hi: f64,
}

impl ParamRange {
    pub const fn new(lo: f64, hi: f64) -> Self {
        Self { lo, hi }
    }

    pub fn contains(&self, u: f64) -> bool {
        u >= self.lo && u < self.hi
    }

    pub fn is_valid(&self) -> bool {
        self.lo.is_finite() && self.hi.is_finite() && self.lo <= self.hi
    }
}

/// Segments where the default layout drops its pillar, hand-picked so that
/// pillars do not pierce lower parts of the track.
const DEFAULT_PILLAR_EXCLUSIONS: &[usize] = &[
    97, 99, 183, 186, 187, 209, 213, 214, 237, 238, 239, 240, 241, 256, 257, 258, 259, 260, 261,
    262, 263, 264, 265, 272, 306,
];

/// Where reinforced planks and pillars go.
///
/// Rails and the centre beam are laid at every step and are not governed
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementPolicy {
    /// A reinforced plank is added at every step whose `u` falls in one of
    /// these ranges, plus one at the end of every segment.
    pub reinforced_ranges: Vec<ParamRange>,
    /// Segments that never get a pillar.
    pub pillar_exclusions: BTreeSet<usize>,
    /// Only every `pillar_stride`-th segment is considered for a pillar.
    pub pillar_stride: usize,
    /// Skip pillars where the track is upside down.
    pub require_upright: bool,
}

impl Default for PlacementPolicy {
    fn default() -> Self {
        Self {
            reinforced_ranges: vec![
                ParamRange::new(0.45, 0.5),
                ParamRange::new(0.2, 0.24),
                ParamRange::new(0.74, 0.79),
            ],
            pillar_exclusions: DEFAULT_PILLAR_EXCLUSIONS.iter().copied().collect(),
            pillar_stride: 1,
            require_upright: true,
        }
    }
}

impl PlacementPolicy {
    /// Same planks as the default, but a pillar under every upright segment.
    pub fn unrestricted() -> Self {
        Self {
            pillar_exclusions: BTreeSet::new(),
            ..Self::default()
        }
    }

    pub fn reinforce_at(&self, u: f64) -> bool {
        self.reinforced_ranges.iter().any(|range| range.contains(u))
    }

    /// Whether `segment` gets a pillar, given the frame it ends on.
    pub fn pillar_at(&self, segment: usize, frame: &Frame) -> bool {
        self.pillar_stride > 0
            && segment % self.pillar_stride == 0
            && (!self.require_upright || frame.up.y > 0.0)
            && !self.pillar_exclusions.contains(&segment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::frame::step_parameters;
    use crate::geometry::{Point3d, Vec3};

    fn inverted() -> Frame {
        Frame {
            origin: Point3d::origin(),
            front: Vec3::z(),
            up: -Vec3::y(),
            right: -Vec3::x(),
        }
    }

    #[test]
    fn test_default_ranges_hit_three_steps() {
        let policy = PlacementPolicy::default();
        let reinforced: Vec<f64> = step_parameters(0.05)
            .filter(|&u| policy.reinforce_at(u))
            .collect();
        assert_eq!(reinforced, vec![0.2, 0.45, 0.75]);
    }

    #[test]
    fn test_range_excludes_upper_bound() {
        let range = ParamRange::new(0.45, 0.5);
        assert!(range.contains(0.45));
        assert!(range.contains(0.4999));
        assert!(!range.contains(0.5));
        assert!(!range.contains(0.44));
    }

    #[test]
    fn test_pillar_exclusions() {
        let policy = PlacementPolicy::default();
        let upright = Frame::seed(Point3d::origin());
        for segment in [97, 99, 183, 186, 187, 209, 213, 214, 237, 241, 256, 265, 272, 306] {
            assert!(!policy.pillar_at(segment, &upright), "segment {segment}");
        }
        for segment in [1, 96, 98, 236, 242, 255, 266, 305, 307] {
            assert!(policy.pillar_at(segment, &upright), "segment {segment}");
        }
        assert_eq!(policy.pillar_exclusions.len(), 25);
    }

    #[test]
    fn test_no_pillar_when_inverted() {
        let policy = PlacementPolicy::default();
        assert!(!policy.pillar_at(5, &inverted()));

        let anywhere = PlacementPolicy {
            require_upright: false,
            ..PlacementPolicy::default()
        };
        assert!(anywhere.pillar_at(5, &inverted()));
    }

    #[test]
    fn test_stride() {
        let policy = PlacementPolicy {
            pillar_stride: 4,
            ..PlacementPolicy::unrestricted()
        };
        let upright = Frame::seed(Point3d::origin());
        assert!(policy.pillar_at(8, &upright));
        assert!(!policy.pillar_at(9, &upright));

        let never = PlacementPolicy {
            pillar_stride: 0,
            ..PlacementPolicy::default()
        };
        assert!(!never.pillar_at(0, &upright));
    }

    #[test]
    fn test_partial_policy_fills_defaults() {
        let policy: PlacementPolicy =
            serde_json::from_str(r#"{ "pillar_exclusions": [3, 4] }"#).unwrap();
        assert_eq!(policy.pillar_exclusions, BTreeSet::from([3, 4]));
        assert_eq!(policy.reinforced_ranges.len(), 3);
        assert_eq!(policy.pillar_stride, 1);
    }
}
