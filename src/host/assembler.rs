use serde::Serialize;

use crate::rig::{PlannedRig, RigError, RigOptions, RigPlan, RigReport, plan_rig, sample_curve};

use super::{
    ArmatureHandle, BoneRequest, CurveHandle, HostError, IkConstraintRequest, ObjectId, RigHost,
};

/// Name requested for generated armatures; the host may suffix it.
pub const DEFAULT_ARMATURE_NAME: &str = "Armature";

/// Host state the operator would otherwise read implicitly.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RigContext {
    /// The active scene object, which may or may not be a curve.
    pub active: Option<ObjectId>,
}

impl RigContext {
    #[must_use]
    pub const fn with_active(active: ObjectId) -> Self {
        Self {
            active: Some(active),
        }
    }
}

/// Result of a successful generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RigOutcome {
    pub curve: CurveHandle,
    pub armature: ArmatureHandle,
    /// Armature removed because it was generated earlier from the same curve.
    pub replaced: Option<ArmatureHandle>,
    /// Host-assigned bone names, in plan order.
    pub bone_names: Vec<String>,
    pub plan: RigPlan,
    pub effective_options: RigOptions,
    pub report: RigReport,
}

/// Turns the active curve into an armature on a [`RigHost`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigAssembler {
    armature_name: String,
}

impl Default for RigAssembler {
    fn default() -> Self {
        Self::new(DEFAULT_ARMATURE_NAME)
    }
}

impl RigAssembler {
    #[must_use]
    pub fn new(armature_name: impl Into<String>) -> Self {
        Self {
            armature_name: armature_name.into(),
        }
    }

    #[must_use]
    pub fn armature_name(&self) -> &str {
        &self.armature_name
    }

    /// Generate a rig for the active curve, replacing the one generated from
    /// it previously.
    ///
    /// The plan is computed before the host is touched, so selection and
    /// resolution errors leave the scene as it was. The previous armature is
    /// removed before the new one is populated: if the host then rejects a
    /// bone or the constraint, the new armature is removed again and the curve
    /// is left without any rig.
    ///
    /// # Errors
    ///
    /// [`RigError::NoCurveSelected`] when the context has no active curve,
    /// anything [`plan_rig`] reports, and host failures as [`RigError::Host`].
    pub fn run<H: RigHost + ?Sized>(
        &self,
        host: &mut H,
        context: &RigContext,
        options: &RigOptions,
    ) -> Result<RigOutcome, RigError> {
        let curve = context
            .active
            .and_then(|object| host.curve_handle(object))
            .ok_or(RigError::NoCurveSelected)?;

        let sampled = sample_curve(&*host, curve)?;
        let PlannedRig {
            plan,
            effective_options,
            mut report,
        } = plan_rig(&sampled, options)?;

        let replaced = host
            .rig_link(curve)
            .filter(|previous| host.armature_exists(*previous));
        if let Some(previous) = replaced {
            log::debug!("removing armature {previous:?} generated earlier from {curve:?}");
            host.remove_armature(previous)?;
        }

        let armature = host.create_armature(&self.armature_name);
        let bone_names = match populate(host, armature, &plan) {
            Ok(names) => names,
            Err(err) => {
                if let Err(cleanup) = host.remove_armature(armature) {
                    log::warn!("could not remove partial armature {armature:?}: {cleanup}");
                }
                return Err(err.into());
            }
        };
        host.set_rig_link(curve, armature);

        report.info(format!("Created {} bones", bone_names.len()));
        log::debug!(
            "rigged {curve:?} into {armature:?} with {} bones",
            bone_names.len()
        );

        Ok(RigOutcome {
            curve,
            armature,
            replaced,
            bone_names,
            plan,
            effective_options,
            report,
        })
    }
}

/// Create the plan's bones in order, then attach its IK constraint.
fn populate<H: RigHost + ?Sized>(
    host: &mut H,
    armature: ArmatureHandle,
    plan: &RigPlan,
) -> Result<Vec<String>, HostError> {
    let mut names: Vec<String> = Vec::with_capacity(plan.bones().len());
    for bone in plan.bones() {
        let parent = bone.parent.map(|index| names[index].as_str());
        let request = BoneRequest {
            name: &bone.name,
            head: bone.head,
            tail: bone.tail,
            parent,
            connected: bone.connected,
        };
        let assigned = host.add_bone(armature, &request)?;
        names.push(assigned);
    }

    if let Some(ik) = plan.ik_constraint() {
        host.add_ik_constraint(
            armature,
            &IkConstraintRequest {
                owner_bone: &names[ik.owner_index],
                target: armature,
                subtarget: &names[ik.target_index],
                chain_count: ik.chain_count,
            },
        )?;
    }

    Ok(names)
}
