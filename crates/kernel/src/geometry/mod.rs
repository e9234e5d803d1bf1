pub mod frame;
pub mod spline;
pub mod transform;

/// A point in 3D world space.
pub type Point3d = nalgebra::Point3<f64>;

/// A direction or offset in 3D world space.
pub type Vec3 = nalgebra::Vector3<f64>;

/// A lateral/vertical offset in a frame's right/up plane.
pub type Vec2 = nalgebra::Vector2<f64>;
