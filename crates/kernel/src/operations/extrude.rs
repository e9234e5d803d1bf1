use crate::geometry::frame::Frame;
use crate::geometry::{Point3d, Vec2, Vec3};
use crate::mesh::solid::{CrossSection, Hexahedron};

use super::{PILLAR_DROP, RAIL_GAP, TRACK_DROP, UNIT};

const RAIL_HALF_WIDTH: f64 = UNIT / 2.0;
const RAIL_HALF_HEIGHT: f64 = UNIT / 1.5;

/// Lateral position of the running rails.
const RAIL_LATERAL: f64 = RAIL_GAP / 2.0;
/// Lateral position of the guard bars outside the running rails.
const GUARD_LATERAL: f64 = RAIL_GAP / 2.0 + RAIL_GAP / 3.0;
const RAIL_VERTICAL: f64 = UNIT / 1.15 - TRACK_DROP;
const GUARD_VERTICAL: f64 = 4.0 * UNIT - TRACK_DROP;

const BEAM_VERTICAL: f64 = -3.0 * UNIT - TRACK_DROP;
const BEAM_TOP: f64 = BEAM_VERTICAL + RAIL_HALF_HEIGHT;
const BEAM_BOTTOM: f64 = BEAM_VERTICAL - RAIL_HALF_HEIGHT;

const DECK_HALF_WIDTH: f64 = 2.0 * UNIT + RAIL_GAP / 1.7;
const DECK_HALF_HEIGHT: f64 = UNIT / 4.0;
const DECK_BOTTOM: f64 = -TRACK_DROP - DECK_HALF_HEIGHT;
/// Where a brace meets the deck underside, on its inner edge.
const BRACE_INNER: f64 = RAIL_GAP / 1.5;

/// Sweep `section`, shifted by the track offset, between two frames.
fn section_solid(prev: &Frame, cur: &Frame, section: CrossSection, offset: Vec2) -> Hexahedron {
    Hexahedron::sweep(prev, cur, &section.offset(offset))
}

/// Both running rails and both guard bars between two frames.
pub fn rail_segment(prev: &Frame, cur: &Frame, offset: Vec2) -> [Hexahedron; 4] {
    [
        (-RAIL_LATERAL, RAIL_VERTICAL),
        (RAIL_LATERAL, RAIL_VERTICAL),
        (-GUARD_LATERAL, GUARD_VERTICAL),
        (GUARD_LATERAL, GUARD_VERTICAL),
    ]
    .map(|(lateral, vertical)| {
        let section = CrossSection::rect(lateral, vertical, RAIL_HALF_WIDTH, RAIL_HALF_HEIGHT);
        section_solid(prev, cur, section, offset)
    })
}

/// Centre beam running under the track.
pub fn support_plank(prev: &Frame, cur: &Frame, offset: Vec2) -> Hexahedron {
    let section = CrossSection::rect(0.0, BEAM_VERTICAL, RAIL_HALF_WIDTH, RAIL_HALF_HEIGHT);
    section_solid(prev, cur, section, offset)
}

/// Railing post on the left edge of the deck, rising to the guard bar.
fn railing_post() -> CrossSection {
    let guard_top = GUARD_VERTICAL + RAIL_HALF_HEIGHT;
    let post_outer = GUARD_LATERAL + RAIL_HALF_WIDTH;
    CrossSection::new([
        Vec2::new(-DECK_HALF_WIDTH - RAIL_HALF_WIDTH, DECK_BOTTOM),
        Vec2::new(-DECK_HALF_WIDTH, DECK_BOTTOM),
        Vec2::new(-post_outer - RAIL_HALF_WIDTH, guard_top),
        Vec2::new(-post_outer, guard_top),
    ])
}

/// Slanted brace from the left side of the centre beam to the deck underside.
fn brace() -> CrossSection {
    CrossSection::new([
        Vec2::new(-RAIL_HALF_WIDTH, BEAM_BOTTOM),
        Vec2::new(-DECK_HALF_WIDTH - RAIL_HALF_WIDTH, DECK_BOTTOM),
        Vec2::new(-RAIL_HALF_WIDTH, BEAM_TOP),
        Vec2::new(-BRACE_INNER, DECK_BOTTOM),
    ])
}

/// Deck spanning both rails, a railing post on each side and two braces
/// down to the centre beam.
pub fn reinforced_plank(prev: &Frame, cur: &Frame, offset: Vec2) -> [Hexahedron; 5] {
    let deck = CrossSection::rect(0.0, -TRACK_DROP, DECK_HALF_WIDTH, DECK_HALF_HEIGHT);
    let post = railing_post();
    let brace = brace();
    [
        deck,
        post,
        post.mirrored(),
        brace,
        brace.mirrored(),
    ]
    .map(|section| section_solid(prev, cur, section, offset))
}

/// Pillar hanging from the underside of the centre beam straight down along
/// world -Y.
pub fn pillar(prev: &Frame, cur: &Frame, offset: Vec2) -> Hexahedron {
    let under_beam = |frame: &Frame, lateral: f64| -> Point3d {
        frame.place(lateral + offset.x, BEAM_BOTTOM + offset.y)
    };
    let top = [
        under_beam(prev, -RAIL_HALF_WIDTH),
        under_beam(prev, RAIL_HALF_WIDTH),
        under_beam(cur, -RAIL_HALF_WIDTH),
        under_beam(cur, RAIL_HALF_WIDTH),
    ];
    Hexahedron::column(top, Vec3::y() * PILLAR_DROP)
}
