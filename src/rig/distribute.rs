//! Placement of bone joints along a sampled curve.
//!
//! A [`SpacingStrategy`] turns a bone count into `count + 1` target arc
//! lengths; [`interpolate_at`] maps each target back onto the polyline.
//!
//! - **Equal length**: targets are evenly spaced in physical distance, so every
//!   bone has the same length no matter how the host tessellated the curve.
//! - **Equal index**: targets sit at evenly spaced *sample indices*, so bone
//!   density follows the tessellation (denser where the host put more points).

#[cfg(feature = "parallel")]
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::geom::{Point3, Tolerance};

use super::error::RigError;
use super::sampler::SampledCurve;

/// Produces the target arc lengths for a bone count.
pub trait SpacingStrategy {
    /// `count + 1` non-decreasing arc lengths in `[0, total_length]`, starting
    /// at 0. `count` is at least 1 and at most `sampled.max_bones()`.
    fn targets(&self, sampled: &SampledCurve, count: usize) -> Vec<f64>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EqualLengthSpacing;

impl SpacingStrategy for EqualLengthSpacing {
    fn targets(&self, sampled: &SampledCurve, count: usize) -> Vec<f64> {
        let bone_length = sampled.total_length() / count as f64;
        (0..=count).map(|k| bone_length * k as f64).collect()
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct EqualIndexSpacing;

impl SpacingStrategy for EqualIndexSpacing {
    fn targets(&self, sampled: &SampledCurve, count: usize) -> Vec<f64> {
        let cumulative = sampled.cumulative_lengths();
        let last_index = cumulative.len() - 1;
        (0..=count)
            .map(|k| cumulative[k * last_index / count])
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum DistributionMode {
    EqualLength,
    #[default]
    EqualIndex,
}

impl DistributionMode {
    #[must_use]
    pub const fn from_equal_length(equal_length: bool) -> Self {
        if equal_length {
            Self::EqualLength
        } else {
            Self::EqualIndex
        }
    }

    #[must_use]
    pub fn strategy(self) -> &'static dyn SpacingStrategy {
        match self {
            Self::EqualLength => &EqualLengthSpacing,
            Self::EqualIndex => &EqualIndexSpacing,
        }
    }
}

/// Joint positions for one rig, in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Distribution {
    pub requested: usize,
    /// Bone count actually used; `positions.len() == actual + 1`.
    pub actual: usize,
    pub positions: Vec<Point3>,
    /// `requested` exceeded what the tessellation supports.
    pub clamped: bool,
}

/// Place `requested + 1` joints along `sampled`, clamping the bone count to
/// the number of tessellated segments.
///
/// # Errors
///
/// [`RigError::InvalidBoneCount`] for `requested == 0`;
/// [`RigError::InsufficientResolution`] if the curve cannot hold the clamped
/// count.
pub fn distribute(
    sampled: &SampledCurve,
    requested: usize,
    mode: DistributionMode,
) -> Result<Distribution, RigError> {
    if requested == 0 {
        return Err(RigError::InvalidBoneCount);
    }

    let max_bones = sampled.max_bones();
    let (actual, clamped) = if requested > max_bones {
        log::warn!("requested {requested} bones, curve resolution allows {max_bones}");
        (max_bones, true)
    } else {
        (requested, false)
    };

    if actual == 0 || sampled.len() < actual + 1 {
        return Err(RigError::InsufficientResolution {
            available: sampled.len(),
            required: actual + 1,
        });
    }

    let targets = mode.strategy().targets(sampled, actual);
    let positions = interpolate_targets(sampled, &targets);
    log::debug!("distributed {} joints ({mode:?})", positions.len());

    Ok(Distribution {
        requested,
        actual,
        positions,
        clamped,
    })
}

#[cfg(feature = "parallel")]
fn interpolate_targets(sampled: &SampledCurve, targets: &[f64]) -> Vec<Point3> {
    let to_world = sampled.local_to_world();
    targets
        .par_iter()
        .map(|&pos| to_world.apply_point(interpolate_at(sampled, pos)))
        .collect()
}

#[cfg(not(feature = "parallel"))]
fn interpolate_targets(sampled: &SampledCurve, targets: &[f64]) -> Vec<Point3> {
    let to_world = sampled.local_to_world();
    targets
        .iter()
        .map(|&pos| to_world.apply_point(interpolate_at(sampled, pos)))
        .collect()
}

/// Point at arc length `pos` along the sampled polyline, in local space.
///
/// Segments are scanned in order and the first one whose range contains
/// `pos` wins. A zero-length segment yields its start point. Arc lengths at
/// (or within [`Tolerance::DEFAULT`] of) the total length resolve to the last
/// point directly; anything the scan still misses falls back to it as well.
#[must_use]
pub fn interpolate_at(sampled: &SampledCurve, pos: f64) -> Point3 {
    let points = sampled.points();
    let cumulative = sampled.cumulative_lengths();
    let total = sampled.total_length();

    if total > 0.0 && pos >= total - Tolerance::DEFAULT.relative_to(total) {
        return sampled.last_point();
    }

    for i in 1..cumulative.len() {
        let start = cumulative[i - 1];
        let end = cumulative[i];
        if start <= pos && pos <= end {
            let segment_length = end - start;
            let t = if segment_length == 0.0 {
                0.0
            } else {
                (pos - start) / segment_length
            };
            return points[i - 1].lerp(points[i], t);
        }
    }

    log::debug!("no segment brackets arc length {pos}; using the final point");
    sampled.last_point()
}
