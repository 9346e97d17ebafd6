//! Arc-length table over a host tessellation.

use crate::geom::{Point3, Transform};
use crate::host::{CurveHandle, CurveSource};

use super::error::RigError;

/// Tessellated curve points with their cumulative arc lengths.
///
/// Points stay in the curve's local space; `local_to_world` is applied to
/// interpolated positions only. `cumulative_lengths()[i]` is the distance
/// travelled along the polyline from the first point to `points()[i]`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampledCurve {
    points: Vec<Point3>,
    cumulative_lengths: Vec<f64>,
    local_to_world: Transform,
}

impl SampledCurve {
    /// Build the arc-length table for a polyline given in world space.
    ///
    /// # Errors
    ///
    /// [`RigError::InsufficientResolution`] for fewer than 2 points and
    /// [`RigError::NonFinitePoint`] for NaN or infinite coordinates.
    pub fn from_points(points: Vec<Point3>) -> Result<Self, RigError> {
        Self::with_transform(points, Transform::identity())
    }

    /// Same as [`SampledCurve::from_points`] for a polyline in local space.
    ///
    /// # Errors
    ///
    /// As [`SampledCurve::from_points`].
    pub fn with_transform(points: Vec<Point3>, local_to_world: Transform) -> Result<Self, RigError> {
        if points.len() < 2 {
            return Err(RigError::InsufficientResolution {
                available: points.len(),
                required: 2,
            });
        }
        if let Some(index) = points.iter().position(|p| !p.is_finite()) {
            return Err(RigError::NonFinitePoint { index });
        }

        let mut cumulative_lengths = Vec::with_capacity(points.len());
        cumulative_lengths.push(0.0);
        let mut total = 0.0;
        for window in points.windows(2) {
            // Coincident points add nothing and keep the table non-decreasing.
            total += window[1].sub_point(window[0]).length();
            cumulative_lengths.push(total);
        }

        Ok(Self {
            points,
            cumulative_lengths,
            local_to_world,
        })
    }

    #[must_use]
    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    #[must_use]
    pub fn cumulative_lengths(&self) -> &[f64] {
        &self.cumulative_lengths
    }

    #[must_use]
    pub fn local_to_world(&self) -> Transform {
        self.local_to_world
    }

    #[must_use]
    pub fn total_length(&self) -> f64 {
        self.cumulative_lengths.last().copied().unwrap_or(0.0)
    }

    /// Number of tessellated points; always at least 2.
    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Largest bone count this resolution supports: one bone per segment.
    #[must_use]
    pub fn max_bones(&self) -> usize {
        self.points.len() - 1
    }

    #[must_use]
    pub fn last_point(&self) -> Point3 {
        self.points[self.points.len() - 1]
    }
}

/// Fetch the tessellation of `curve` from the host and measure it.
///
/// # Errors
///
/// Host lookups fail with [`RigError::Host`]; see also
/// [`SampledCurve::with_transform`].
pub fn sample_curve<S: CurveSource + ?Sized>(
    source: &S,
    curve: CurveHandle,
) -> Result<SampledCurve, RigError> {
    let points = source.tessellate(curve)?;
    let local_to_world = source.local_to_world(curve)?;
    log::debug!("sampled curve {:?}: {} points", curve, points.len());
    SampledCurve::with_transform(points, local_to_world)
}
