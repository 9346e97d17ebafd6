use super::core::{Point3, Vec3};

/// A parametric space curve.
///
/// Hosts own the real curve data; these implementations let the engine and
/// its tests produce tessellations the same way a host would.
pub trait Curve3 {
    fn point_at(&self, t: f64) -> Point3;

    #[must_use]
    fn domain(&self) -> (f64, f64) {
        (0.0, 1.0)
    }

    #[must_use]
    fn is_closed(&self) -> bool {
        false
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line3 {
    pub start: Point3,
    pub end: Point3,
}

impl Line3 {
    #[must_use]
    pub const fn new(start: Point3, end: Point3) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub const fn direction(self) -> Vec3 {
        self.end.sub_point(self.start)
    }
}

impl Curve3 for Line3 {
    fn point_at(&self, t: f64) -> Point3 {
        self.start.add_vec(self.direction().mul_scalar(t))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arc3 {
    pub center: Point3,
    pub x_axis: Vec3,
    pub y_axis: Vec3,
    pub radius: f64,
    pub start_angle: f64,
    pub sweep_angle: f64,
}

impl Arc3 {
    /// Arc in the plane spanned by `x_axis` and `normal × x_axis`.
    #[must_use]
    pub fn from_center_xaxis_normal(
        center: Point3,
        x_axis: Vec3,
        normal: Vec3,
        radius: f64,
        start_angle: f64,
        sweep_angle: f64,
    ) -> Self {
        let x = x_axis.normalized().unwrap_or(Vec3::X);
        let n = normal.normalized().unwrap_or(Vec3::Z);
        let y = n.cross(x).normalized().unwrap_or(Vec3::Y);
        Self {
            center,
            x_axis: x,
            y_axis: y,
            radius,
            start_angle,
            sweep_angle,
        }
    }

    /// Exact arc length.
    #[must_use]
    pub fn length(&self) -> f64 {
        self.radius.abs() * self.sweep_angle.abs()
    }
}

impl Curve3 for Arc3 {
    fn point_at(&self, t: f64) -> Point3 {
        let u = t.clamp(0.0, 1.0);
        let angle = self.start_angle + self.sweep_angle * u;
        self.center
            .add_vec(self.x_axis.mul_scalar(self.radius * angle.cos()))
            .add_vec(self.y_axis.mul_scalar(self.radius * angle.sin()))
    }

    fn is_closed(&self) -> bool {
        const FULL_CIRCLE_TOLERANCE: f64 = 1e-9;
        (self.sweep_angle.abs() - std::f64::consts::TAU).abs() < FULL_CIRCLE_TOLERANCE
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CubicBezier3 {
    pub p0: Point3,
    pub p1: Point3,
    pub p2: Point3,
    pub p3: Point3,
}

impl CubicBezier3 {
    #[must_use]
    pub const fn new(p0: Point3, p1: Point3, p2: Point3, p3: Point3) -> Self {
        Self { p0, p1, p2, p3 }
    }
}

impl Curve3 for CubicBezier3 {
    fn point_at(&self, t: f64) -> Point3 {
        let t = t.clamp(0.0, 1.0);
        let u = 1.0 - t;
        let u2 = u * u;
        let t2 = t * t;
        let v = self.p0.to_vec3().mul_scalar(u2 * u)
            + self.p1.to_vec3().mul_scalar(3.0 * u2 * t)
            + self.p2.to_vec3().mul_scalar(3.0 * u * t2)
            + self.p3.to_vec3().mul_scalar(t2 * t);
        Point3::from(v)
    }
}

/// Tessellates a curve with `steps` segments evenly spaced in its parameter.
///
/// This mirrors how hosts evaluate curves at a fixed resolution: spacing is
/// uniform in `t`, not in arc length, so fast-moving stretches of a curve get
/// sparser samples. Closed curves do not repeat their first point.
#[must_use]
pub fn tessellate_curve_uniform(curve: &impl Curve3, steps: usize) -> Vec<Point3> {
    let steps = steps.max(1);
    let (t0, t1) = curve.domain();
    let span = t1 - t0;
    let count = if curve.is_closed() { steps } else { steps + 1 };
    (0..count)
        .map(|i| {
            let t = if i == steps { t1 } else { t0 + span * (i as f64 / steps as f64) };
            curve.point_at(t)
        })
        .collect()
}

/// Arc length of the polyline through `points`.
#[must_use]
pub fn polyline_length(points: &[Point3]) -> f64 {
    points.windows(2).map(|w| w[1].sub_point(w[0]).length()).sum()
}
