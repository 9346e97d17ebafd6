//! Geometry primitives shared by the rigging core and its hosts.

mod core;
mod curve;

pub use core::{Point3, Tolerance, Transform, Vec3};
pub use curve::{
    Arc3, CubicBezier3, Curve3, Line3, polyline_length, tessellate_curve_uniform,
};

#[cfg(test)]
mod tests;
