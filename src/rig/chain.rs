//! Bone chain construction from joint positions.

use serde::Serialize;

use crate::geom::{Point3, Vec3};

use super::error::RigError;

/// Name of the appended IK locator bone.
pub const IK_TARGET_BONE_NAME: &str = "IK_Target";

/// Name of the chain bone at `index`: `Bone.1`, `Bone.2`, ...
#[must_use]
pub fn chain_bone_name(index: usize) -> String {
    format!("Bone.{}", index + 1)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum BoneRole {
    /// Part of the connected kinematic chain.
    Chain,
    /// Free-standing locator the chain's IK constraint reaches for.
    IkTarget,
}

/// One bone of a [`RigPlan`].
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BoneSpec {
    pub name: String,
    pub head: Point3,
    pub tail: Point3,
    /// Index of the parent bone within the plan.
    pub parent: Option<usize>,
    /// Head is locked to the parent's tail.
    pub connected: bool,
    pub role: BoneRole,
}

impl BoneSpec {
    #[must_use]
    pub fn length(&self) -> f64 {
        self.tail.distance_to(self.head)
    }

    /// Unit head-to-tail direction, `None` for a zero-length bone.
    #[must_use]
    pub fn direction(&self) -> Option<Vec3> {
        self.tail.sub_point(self.head).normalized()
    }
}

/// IK constraint the host attaches once the bones exist.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct IkConstraintSpec {
    /// Bone that carries the constraint: the last chain bone.
    pub owner_index: usize,
    /// The IK locator bone.
    pub target_index: usize,
    /// Number of bones the solver may move, counted up from the owner.
    pub chain_count: usize,
}

/// Complete description of a rig, ready to hand to a host.
///
/// Bones `0..chain_length` form a strictly linear connected chain; when an IK
/// target was requested it follows at `ik_target_index`, unparented.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RigPlan {
    bones: Vec<BoneSpec>,
    ik_target_index: Option<usize>,
    chain_length: usize,
    total_length: f64,
}

impl RigPlan {
    #[must_use]
    pub fn bones(&self) -> &[BoneSpec] {
        &self.bones
    }

    /// The connected chain without the IK locator.
    #[must_use]
    pub fn chain(&self) -> &[BoneSpec] {
        &self.bones[..self.chain_length]
    }

    #[must_use]
    pub const fn chain_length(&self) -> usize {
        self.chain_length
    }

    #[must_use]
    pub const fn ik_target_index(&self) -> Option<usize> {
        self.ik_target_index
    }

    #[must_use]
    pub fn ik_target(&self) -> Option<&BoneSpec> {
        self.ik_target_index.map(|index| &self.bones[index])
    }

    /// Arc length of the curve the plan was built from.
    #[must_use]
    pub const fn total_length(&self) -> f64 {
        self.total_length
    }

    #[must_use]
    pub fn ik_constraint(&self) -> Option<IkConstraintSpec> {
        self.ik_target_index.map(|target_index| IkConstraintSpec {
            owner_index: self.chain_length - 1,
            target_index,
            chain_count: self.chain_length,
        })
    }
}

/// Build a connected chain through `positions`, optionally followed by an IK
/// locator.
///
/// Bone `i` spans `positions[i]..positions[i + 1]` and is parented to bone
/// `i - 1`. The locator starts at the chain's tail and continues in the last
/// bone's direction for `total_length / chain_length`; a zero-length last bone
/// points it along +Z instead.
///
/// # Errors
///
/// [`RigError::InsufficientResolution`] for fewer than 2 positions.
pub fn build_chain(
    positions: &[Point3],
    total_length: f64,
    add_ik_target: bool,
) -> Result<RigPlan, RigError> {
    if positions.len() < 2 {
        return Err(RigError::InsufficientResolution {
            available: positions.len(),
            required: 2,
        });
    }

    let chain_length = positions.len() - 1;
    let mut bones = Vec::with_capacity(chain_length + usize::from(add_ik_target));
    for (i, joint) in positions.windows(2).enumerate() {
        bones.push(BoneSpec {
            name: chain_bone_name(i),
            head: joint[0],
            tail: joint[1],
            parent: i.checked_sub(1),
            connected: i > 0,
            role: BoneRole::Chain,
        });
    }

    let mut ik_target_index = None;
    if add_ik_target {
        let last = &bones[chain_length - 1];
        let direction = last.direction().unwrap_or(Vec3::Z);
        let average_bone_length = total_length / chain_length as f64;
        let head = last.tail;
        let tail = head.add_vec(direction.mul_scalar(average_bone_length));

        ik_target_index = Some(bones.len());
        bones.push(BoneSpec {
            name: IK_TARGET_BONE_NAME.to_string(),
            head,
            tail,
            parent: None,
            connected: false,
            role: BoneRole::IkTarget,
        });
    }

    log::debug!(
        "built chain of {chain_length} bones (ik target: {})",
        ik_target_index.is_some()
    );

    Ok(RigPlan {
        bones,
        ik_target_index,
        chain_length,
        total_length,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Tolerance;

    fn joints_along_x(count: usize, spacing: f64) -> Vec<Point3> {
        (0..count)
            .map(|i| Point3::new(i as f64 * spacing, 0.0, 0.0))
            .collect()
    }

    #[test]
    fn chain_is_linear_and_connected() {
        let plan = build_chain(&joints_along_x(6, 2.0), 10.0, false).unwrap();

        assert_eq!(plan.chain_length(), 5);
        assert_eq!(plan.bones().len(), 5);
        assert_eq!(plan.ik_target_index(), None);
        assert!(plan.ik_constraint().is_none());

        let root = &plan.bones()[0];
        assert_eq!(root.parent, None);
        assert!(!root.connected);
        for (i, pair) in plan.bones().windows(2).enumerate() {
            assert_eq!(pair[1].parent, Some(i));
            assert!(pair[1].connected);
            assert_eq!(pair[1].head, pair[0].tail);
        }
        assert!(plan.bones().iter().all(|b| (b.length() - 2.0).abs() < 1e-12));
    }

    #[test]
    fn bones_are_named_from_one() {
        let plan = build_chain(&joints_along_x(4, 1.0), 3.0, true).unwrap();
        let names: Vec<&str> = plan.bones().iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names, vec!["Bone.1", "Bone.2", "Bone.3", "IK_Target"]);
    }

    #[test]
    fn ik_target_extends_last_bone() {
        let plan = build_chain(&joints_along_x(6, 2.0), 10.0, true).unwrap();

        assert_eq!(plan.bones().len(), 6);
        assert_eq!(plan.ik_target_index(), Some(5));
        let target = plan.ik_target().unwrap();
        assert_eq!(target.role, BoneRole::IkTarget);
        assert_eq!(target.parent, None);
        assert!(!target.connected);
        assert_eq!(target.head, Point3::new(10.0, 0.0, 0.0));
        assert_eq!(target.tail, Point3::new(12.0, 0.0, 0.0));
        assert_eq!(plan.chain().len(), 5);

        assert_eq!(
            plan.ik_constraint(),
            Some(IkConstraintSpec {
                owner_index: 4,
                target_index: 5,
                chain_count: 5,
            })
        );
    }

    #[test]
    fn ik_target_uses_curve_length_not_chord_length() {
        // Joints on a bent path: chords sum to 2, the curve was 3 long.
        let joints = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
        ];
        let plan = build_chain(&joints, 3.0, true).unwrap();
        let target = plan.ik_target().unwrap();
        let tol = Tolerance::new(1e-12);
        assert!(tol.approx_eq_f64(target.length(), 1.5));
        assert!(tol.approx_eq_vec3(target.direction().unwrap(), Vec3::Y));
    }

    #[test]
    fn zero_length_last_bone_points_ik_target_up() {
        let p = Point3::new(1.0, 1.0, 1.0);
        let plan = build_chain(&[Point3::ORIGIN, p, p], 4.0, true).unwrap();
        let target = plan.ik_target().unwrap();
        assert_eq!(target.head, p);
        assert_eq!(target.tail, Point3::new(1.0, 1.0, 3.0));
    }

    #[test]
    fn needs_two_positions() {
        assert!(build_chain(&[Point3::ORIGIN], 0.0, false).is_err());
    }
}
