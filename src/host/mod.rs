//! Boundary between the rigging core and the application that owns curves
//! and armatures.
//!
//! The core never touches scene state directly. A host exposes its curves
//! through [`CurveSource`] and accepts generated rigs through
//! [`ArmatureSink`]; [`RigAssembler`] drives both. Object lifetime is explicit:
//! every scene object is addressed by a handle and removed by an explicit call.
//!
//! ```text
//! CurveSource ──► sample ──► distribute ──► build chain ──► ArmatureSink
//! ```

mod assembler;
mod memory;

use serde::Serialize;

use crate::geom::{Point3, Transform};

pub use assembler::{DEFAULT_ARMATURE_NAME, RigAssembler, RigContext, RigOutcome};
pub use memory::{MemoryScene, SceneArmature, SceneBone, SceneCurve, SceneIkConstraint};

/// Identifier of any object in a host scene.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObjectId(pub u32);

/// A scene object known to be a curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct CurveHandle(pub ObjectId);

/// A scene object known to be an armature (object plus its data block).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ArmatureHandle(pub ObjectId);

impl CurveHandle {
    #[must_use]
    pub const fn id(self) -> ObjectId {
        self.0
    }
}

impl ArmatureHandle {
    #[must_use]
    pub const fn id(self) -> ObjectId {
        self.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("unknown curve object {0:?}")]
    UnknownCurve(CurveHandle),
    #[error("unknown armature object {0:?}")]
    UnknownArmature(ArmatureHandle),
    #[error("armature {armature:?} has no bone named `{bone}`")]
    UnknownBone {
        armature: ArmatureHandle,
        bone: String,
    },
}

/// Read access to the host's curves.
pub trait CurveSource {
    /// Resolve an arbitrary scene object to a curve, if it is one.
    fn curve_handle(&self, object: ObjectId) -> Option<CurveHandle>;

    /// Evaluated, tessellated points of the curve in its local space. The
    /// resolution is a property of the curve.
    fn tessellate(&self, curve: CurveHandle) -> Result<Vec<Point3>, HostError>;

    fn local_to_world(&self, curve: CurveHandle) -> Result<Transform, HostError>;
}

/// A bone to be created in edit mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoneRequest<'a> {
    pub name: &'a str,
    pub head: Point3,
    pub tail: Point3,
    /// Host-assigned name of an already created bone.
    pub parent: Option<&'a str>,
    pub connected: bool,
}

/// An IK constraint to attach in pose mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IkConstraintRequest<'a> {
    /// Bone carrying the constraint (the chain's last bone).
    pub owner_bone: &'a str,
    pub target: ArmatureHandle,
    pub subtarget: &'a str,
    pub chain_count: usize,
}

/// Write access to the host's armatures plus the curve → armature link.
pub trait ArmatureSink {
    /// Create an empty armature object with its data block. The host may
    /// alter `name` to keep it unique.
    fn create_armature(&mut self, name: &str) -> ArmatureHandle;

    /// Remove the armature object and its data block.
    fn remove_armature(&mut self, armature: ArmatureHandle) -> Result<(), HostError>;

    fn armature_exists(&self, armature: ArmatureHandle) -> bool;

    /// Create a bone and return the name the host assigned to it.
    fn add_bone(
        &mut self,
        armature: ArmatureHandle,
        bone: &BoneRequest<'_>,
    ) -> Result<String, HostError>;

    fn add_ik_constraint(
        &mut self,
        armature: ArmatureHandle,
        constraint: &IkConstraintRequest<'_>,
    ) -> Result<(), HostError>;

    /// The armature most recently generated from `curve`, if recorded.
    fn rig_link(&self, curve: CurveHandle) -> Option<ArmatureHandle>;

    fn set_rig_link(&mut self, curve: CurveHandle, armature: ArmatureHandle);
}

/// Everything [`RigAssembler`] needs from a host.
pub trait RigHost: CurveSource + ArmatureSink {}

impl<T: CurveSource + ArmatureSink + ?Sized> RigHost for T {}
