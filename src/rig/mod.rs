//! Curve-to-bone-chain core.
//!
//! The pipeline is a pure function of a tessellated curve and [`RigOptions`]:
//!
//! ```text
//! points ──► SampledCurve ──► Distribution ──► RigPlan
//!            (arc length)     (joints)         (bones + IK target)
//! ```
//!
//! Nothing here touches host state, so every failure surfaces before a host
//! is asked to create or replace anything.

mod chain;
mod distribute;
mod error;
mod options;
mod report;
mod sampler;

pub use chain::{
    BoneRole, BoneSpec, IK_TARGET_BONE_NAME, IkConstraintSpec, RigPlan, build_chain,
    chain_bone_name,
};
pub use distribute::{
    Distribution, DistributionMode, EqualIndexSpacing, EqualLengthSpacing, SpacingStrategy,
    distribute, interpolate_at,
};
pub use error::RigError;
pub use options::RigOptions;
pub use report::{ReportEntry, ReportLevel, RigReport};
pub use sampler::{SampledCurve, sample_curve};

/// A plan together with what the user should be told about it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedRig {
    pub plan: RigPlan,
    /// `options` with the bone count replaced by the count actually used.
    pub effective_options: RigOptions,
    pub report: RigReport,
}

/// Run distribution and chain building over an already sampled curve.
///
/// # Errors
///
/// See [`distribute`] and [`build_chain`].
pub fn plan_rig(sampled: &SampledCurve, options: &RigOptions) -> Result<PlannedRig, RigError> {
    let distribution = distribute(sampled, options.bone_count, options.mode())?;

    let mut report = RigReport::default();
    if distribution.clamped {
        report.warn(format!(
            "Max {} Bones for this curve resolution.",
            distribution.actual
        ));
    }

    let plan = build_chain(
        &distribution.positions,
        sampled.total_length(),
        options.add_ik_target,
    )?;

    Ok(PlannedRig {
        plan,
        effective_options: RigOptions {
            bone_count: distribution.actual,
            ..*options
        },
        report,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Point3, Tolerance};

    fn straight_curve() -> SampledCurve {
        SampledCurve::from_points((0..11).map(|i| Point3::new(i as f64, 0.0, 0.0)).collect())
            .unwrap()
    }

    #[test]
    fn five_equal_bones_on_a_straight_curve() {
        let options = RigOptions {
            bone_count: 5,
            equal_length: true,
            add_ik_target: false,
        };
        let planned = plan_rig(&straight_curve(), &options).unwrap();

        assert!(planned.report.is_empty());
        assert_eq!(planned.effective_options, options);
        let plan = &planned.plan;
        assert_eq!(plan.bones().len(), 5);
        assert_eq!(plan.ik_target_index(), None);

        let heads: Vec<f64> = plan.bones().iter().map(|b| b.head.x).collect();
        assert_eq!(heads, vec![0.0, 2.0, 4.0, 6.0, 8.0]);
        let total: f64 = plan.bones().iter().map(BoneSpec::length).sum();
        assert!(Tolerance::LOOSE.approx_eq_f64(total, 10.0));
    }

    #[test]
    fn clamped_count_is_reported_and_written_back() {
        let options = RigOptions {
            bone_count: 20,
            equal_length: true,
            add_ik_target: false,
        };
        let planned = plan_rig(&straight_curve(), &options).unwrap();

        assert_eq!(planned.plan.chain_length(), 10);
        assert_eq!(planned.effective_options.bone_count, 10);
        let warnings: Vec<_> = planned.report.warnings().collect();
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].message, "Max 10 Bones for this curve resolution.");
    }

    #[test]
    fn ik_target_follows_five_bone_chain() {
        let options = RigOptions {
            bone_count: 5,
            equal_length: true,
            add_ik_target: true,
        };
        let plan = plan_rig(&straight_curve(), &options).unwrap().plan;

        assert_eq!(plan.bones().len(), 6);
        assert_eq!(plan.ik_target_index(), Some(5));
        let target = &plan.bones()[5];
        assert!(!target.connected);
        assert_eq!(target.head, plan.bones()[4].tail);
        assert!(Tolerance::DEFAULT.approx_eq_point3(target.tail, Point3::new(12.0, 0.0, 0.0)));
    }
}
