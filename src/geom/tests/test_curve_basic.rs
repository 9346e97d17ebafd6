use crate::geom::{
    Arc3, CubicBezier3, Curve3, Line3, Point3, Tolerance, Vec3, polyline_length,
    tessellate_curve_uniform,
};

#[test]
fn tessellate_curve_preserves_endpoints() {
    let line = Line3::new(Point3::new(0.0, 0.0, 0.0), Point3::new(10.0, 0.0, 0.0));
    let pts = tessellate_curve_uniform(&line, 10);
    assert_eq!(pts.first().copied(), Some(line.start));
    assert_eq!(pts.last().copied(), Some(line.end));
    assert_eq!(pts.len(), 11);
    assert!((polyline_length(&pts) - 10.0).abs() < 1e-12);
}

#[test]
fn tessellate_full_circle_has_no_duplicate_endpoint() {
    let circle = Arc3::from_center_xaxis_normal(
        Point3::ORIGIN,
        Vec3::X,
        Vec3::Z,
        2.0,
        0.0,
        std::f64::consts::TAU,
    );

    let pts = tessellate_curve_uniform(&circle, 16);
    assert_eq!(pts.len(), 16);
    assert_ne!(pts.first().copied(), pts.last().copied());
}

#[test]
fn arc_has_expected_endpoints_and_length() {
    let arc = Arc3::from_center_xaxis_normal(
        Point3::ORIGIN,
        Vec3::X,
        Vec3::Z,
        1.0,
        0.0,
        std::f64::consts::FRAC_PI_2,
    );
    let tol = Tolerance::new(1e-9);
    assert!(tol.approx_eq_point3(arc.point_at(0.0), Point3::new(1.0, 0.0, 0.0)));
    assert!(tol.approx_eq_point3(arc.point_at(1.0), Point3::new(0.0, 1.0, 0.0)));

    // A fine tessellation approaches the exact length from below.
    let pts = tessellate_curve_uniform(&arc, 256);
    let approx = polyline_length(&pts);
    assert!(approx < arc.length());
    assert!((approx - arc.length()).abs() < 1e-4);
}

#[test]
fn bezier_interpolates_its_end_control_points() {
    let curve = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(1.0, 1.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
    );
    assert_eq!(curve.point_at(0.0), curve.p0);
    assert_eq!(curve.point_at(1.0), curve.p3);
}

#[test]
fn parameter_uniform_tessellation_is_uneven_in_arc_length() {
    // Control points bunched at the start make the first samples dense.
    let curve = CubicBezier3::new(
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(9.0, 0.0, 0.0),
    );
    let pts = tessellate_curve_uniform(&curve, 8);
    let first = pts[1].distance_to(pts[0]);
    let last = pts[8].distance_to(pts[7]);
    assert!(first < last);
}
