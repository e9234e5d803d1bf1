use crate::geometry::frame::Frame;
use crate::geometry::{Point3d, Vec2, Vec3};

use super::MeshBuffer;

/// Corner indices of the six faces, wound counter-clockwise seen from
/// outside when corner `i` sits at `(i & 1, (i >> 1) & 1, (i >> 2) & 1)`.
const FACES: [[usize; 4]; 6] = [
    [0, 4, 6, 2], // -x
    [1, 3, 7, 5], // +x
    [0, 1, 5, 4], // -y
    [2, 6, 7, 3], // +y
    [0, 2, 3, 1], // -z
    [4, 5, 7, 6], // +z
];

/// Swaps the first index bit, mirroring the corner order.
const MIRROR: [usize; 8] = [1, 0, 3, 2, 5, 4, 7, 6];

/// Four corners in a frame's right/up plane.
///
/// Corner `i` has lateral bit `i & 1` and vertical bit `i >> 1`, the same
/// layout as the low two bits of a [`Hexahedron`] corner index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CrossSection {
    pub corners: [Vec2; 4],
}

impl CrossSection {
    pub fn new(corners: [Vec2; 4]) -> Self {
        Self { corners }
    }

    /// Axis-aligned rectangle centred at `(lateral, vertical)`.
    pub fn rect(lateral: f64, vertical: f64, half_width: f64, half_height: f64) -> Self {
        Self::new([
            Vec2::new(lateral - half_width, vertical - half_height),
            Vec2::new(lateral + half_width, vertical - half_height),
            Vec2::new(lateral - half_width, vertical + half_height),
            Vec2::new(lateral + half_width, vertical + half_height),
        ])
    }

    /// Reflect across the track centreline.
    pub fn mirrored(&self) -> Self {
        Self::new(self.corners.map(|c| Vec2::new(-c.x, c.y)))
    }

    pub fn offset(&self, by: Vec2) -> Self {
        Self::new(self.corners.map(|c| c + by))
    }
}

/// Eight-cornered closed solid emitted as twelve triangles.
///
/// Corners are kept in right-handed order, which makes the shared face table
/// wind every face outward.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hexahedron {
    corners: [Point3d; 8],
}

impl Hexahedron {
    /// Build from corners in `x + 2y + 4z` bit order. A left-handed order is
    /// mirrored so the faces still point outward.
    pub fn from_corners(corners: [Point3d; 8]) -> Self {
        let solid = Self { corners };
        if solid.signed_volume() < 0.0 {
            Self {
                corners: MIRROR.map(|i| corners[i]),
            }
        } else {
            solid
        }
    }

    /// Place `section` on both frames: corners 0..4 on `prev`, 4..8 on `cur`.
    pub fn sweep(prev: &Frame, cur: &Frame, section: &CrossSection) -> Self {
        let corners = std::array::from_fn(|i| {
            let frame = if i & 4 == 0 { prev } else { cur };
            let c = section.corners[i & 3];
            frame.place(c.x, c.y)
        });
        Self::from_corners(corners)
    }

    /// Extend four top corners straight down by `drop`. The top corners use
    /// the `x + 2z` bit order of a horizontal face.
    pub fn column(top: [Point3d; 4], drop: Vec3) -> Self {
        let corners = std::array::from_fn(|i| {
            let corner = top[(i & 1) | ((i >> 1) & 2)];
            if i & 2 == 0 { corner - drop } else { corner }
        });
        Self::from_corners(corners)
    }

    pub fn corners(&self) -> &[Point3d; 8] {
        &self.corners
    }

    pub fn center(&self) -> Point3d {
        let sum = self
            .corners
            .iter()
            .fold(Vec3::zeros(), |acc, p| acc + p.coords);
        Point3d::from(sum / 8.0)
    }

    /// The twelve triangles, two per face.
    pub fn triangles(&self) -> impl Iterator<Item = [Point3d; 3]> + '_ {
        FACES.iter().flat_map(move |&[a, b, c, d]| {
            let p = &self.corners;
            [[p[a], p[b], p[c]], [p[a], p[c], p[d]]]
        })
    }

    /// Enclosed volume, positive when the corners are right-handed.
    pub fn signed_volume(&self) -> f64 {
        let center = self.center();
        self.triangles()
            .map(|[a, b, c]| {
                let (a, b, c) = (a - center, b - center, c - center);
                a.dot(&b.cross(&c))
            })
            .sum::<f64>()
            / 6.0
    }

    pub fn emit_into(&self, mesh: &mut MeshBuffer) {
        for [a, b, c] in self.triangles() {
            mesh.push_triangle(a, b, c);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> [Point3d; 8] {
        std::array::from_fn(|i| {
            Point3d::new((i & 1) as f64, ((i >> 1) & 1) as f64, ((i >> 2) & 1) as f64)
        })
    }

    fn assert_outward(solid: &Hexahedron) {
        let center = solid.center();
        for [a, b, c] in solid.triangles() {
            let normal = (b - a).cross(&(c - a));
            let centroid = Point3d::from((a.coords + b.coords + c.coords) / 3.0);
            assert!(
                normal.dot(&(centroid - center)) > 0.0,
                "inward face at {centroid:?}"
            );
        }
    }

    #[test]
    fn test_unit_cube_volume_and_winding() {
        let cube = Hexahedron::from_corners(unit_cube());
        assert_eq!(cube.corners(), &unit_cube());
        assert!((cube.signed_volume() - 1.0).abs() < 1e-12);
        assert_eq!(cube.triangles().count(), 12);
        assert_outward(&cube);
    }

    #[test]
    fn test_left_handed_corners_are_mirrored() {
        let mut flipped = unit_cube();
        for p in flipped.iter_mut() {
            p.x = -p.x;
        }
        let solid = Hexahedron::from_corners(flipped);
        assert!((solid.signed_volume() - 1.0).abs() < 1e-12);
        assert_outward(&solid);
    }

    #[test]
    fn test_sweep_places_corners_in_frames() {
        let prev = Frame::seed(Point3d::new(0.0, 0.0, 0.0));
        let cur = Frame::seed(Point3d::new(0.0, 0.0, 1.0));
        let section = CrossSection::rect(0.5, -1.0, 0.1, 0.2);
        let solid = Hexahedron::sweep(&prev, &cur, &section);

        assert_eq!(solid.corners()[0], Point3d::new(0.4, -1.2, 0.0));
        assert_eq!(solid.corners()[7], Point3d::new(0.6, -0.8, 1.0));
        assert!((solid.signed_volume() - 0.2 * 0.4).abs() < 1e-12);
        assert_outward(&solid);
    }

    #[test]
    fn test_mirrored_section_still_outward() {
        let prev = Frame::seed(Point3d::origin());
        let cur = Frame::seed(Point3d::new(0.0, 0.0, 0.5));
        let section = CrossSection::new([
            Vec2::new(0.0, 0.0),
            Vec2::new(0.3, 0.1),
            Vec2::new(0.05, 0.2),
            Vec2::new(0.25, 0.25),
        ]);
        for s in [section, section.mirrored()] {
            let solid = Hexahedron::sweep(&prev, &cur, &s);
            assert!(solid.signed_volume() > 0.0);
            assert_outward(&solid);
        }
    }

    #[test]
    fn test_offset_moves_every_corner() {
        let section = CrossSection::rect(0.0, 0.0, 1.0, 1.0).offset(Vec2::new(2.0, -1.0));
        assert_eq!(section.corners[0], Vec2::new(1.0, -2.0));
        assert_eq!(section.corners[3], Vec2::new(3.0, 0.0));
    }

    #[test]
    fn test_column_hangs_below_top() {
        let top = [
            Point3d::new(0.0, 5.0, 0.0),
            Point3d::new(1.0, 5.0, 0.0),
            Point3d::new(0.0, 5.0, 1.0),
            Point3d::new(1.0, 5.0, 1.0),
        ];
        let solid = Hexahedron::column(top, Vec3::new(0.0, 30.0, 0.0));
        assert!((solid.signed_volume() - 30.0).abs() < 1e-9);
        assert!(solid.corners().iter().any(|p| p.y == -25.0));
        assert_outward(&solid);
    }

    #[test]
    fn test_emit_into_writes_twelve_triangles() {
        let mut mesh = MeshBuffer::new();
        Hexahedron::from_corners(unit_cube()).emit_into(&mut mesh);
        assert_eq!(mesh.triangle_count(), 12);
        assert_eq!(mesh.max_height(), 1.0);
    }
}
