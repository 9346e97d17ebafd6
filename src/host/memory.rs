//! In-memory scene implementing the host traits.
//!
//! Used by the WebAssembly front end and by tests. Object and bone names are
//! kept unique the way DCC hosts do it: a clash appends `.001`, `.002`, ...

use std::collections::{BTreeMap, HashMap};

use serde::Serialize;

use crate::geom::{Curve3, Point3, Transform, tessellate_curve_uniform};

use super::{
    ArmatureHandle, ArmatureSink, BoneRequest, CurveHandle, CurveSource, HostError,
    IkConstraintRequest, ObjectId,
};

#[derive(Debug, Clone, PartialEq)]
pub struct SceneCurve {
    pub name: String,
    /// Tessellated points in local space.
    pub points: Vec<Point3>,
    pub local_to_world: Transform,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneBone {
    pub name: String,
    pub head: Point3,
    pub tail: Point3,
    pub parent: Option<String>,
    pub connected: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneIkConstraint {
    pub owner_bone: String,
    pub target: ArmatureHandle,
    pub subtarget: String,
    pub chain_count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneArmature {
    pub name: String,
    pub bones: Vec<SceneBone>,
    pub constraints: Vec<SceneIkConstraint>,
}

impl SceneArmature {
    #[must_use]
    pub fn bone(&self, name: &str) -> Option<&SceneBone> {
        self.bones.iter().find(|bone| bone.name == name)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum SceneObject {
    Curve(SceneCurve),
    Armature(SceneArmature),
    /// Any other object kind; only its name matters here.
    Other(String),
}

impl SceneObject {
    fn name(&self) -> &str {
        match self {
            Self::Curve(curve) => &curve.name,
            Self::Armature(armature) => &armature.name,
            Self::Other(name) => name,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryScene {
    next_id: u32,
    objects: BTreeMap<ObjectId, SceneObject>,
    rig_links: HashMap<CurveHandle, ArmatureHandle>,
}

impl MemoryScene {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a curve from an already tessellated point list in local space.
    pub fn add_curve(&mut self, name: &str, points: Vec<Point3>) -> CurveHandle {
        let name = self.unique_object_name(name);
        CurveHandle(self.insert(SceneObject::Curve(SceneCurve {
            name,
            points,
            local_to_world: Transform::identity(),
        })))
    }

    /// Add a curve tessellated at `resolution` segments.
    pub fn add_curve_from(
        &mut self,
        name: &str,
        curve: &impl Curve3,
        resolution: usize,
    ) -> CurveHandle {
        self.add_curve(name, tessellate_curve_uniform(curve, resolution))
    }

    /// Add an object that is not a curve.
    pub fn add_object(&mut self, name: &str) -> ObjectId {
        let name = self.unique_object_name(name);
        self.insert(SceneObject::Other(name))
    }

    pub fn set_curve_transform(
        &mut self,
        curve: CurveHandle,
        local_to_world: Transform,
    ) -> Result<(), HostError> {
        match self.objects.get_mut(&curve.id()) {
            Some(SceneObject::Curve(data)) => {
                data.local_to_world = local_to_world;
                Ok(())
            }
            _ => Err(HostError::UnknownCurve(curve)),
        }
    }

    #[must_use]
    pub fn curve(&self, curve: CurveHandle) -> Option<&SceneCurve> {
        match self.objects.get(&curve.id()) {
            Some(SceneObject::Curve(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn armature(&self, armature: ArmatureHandle) -> Option<&SceneArmature> {
        match self.objects.get(&armature.id()) {
            Some(SceneObject::Armature(data)) => Some(data),
            _ => None,
        }
    }

    #[must_use]
    pub fn armature_count(&self) -> usize {
        self.objects
            .values()
            .filter(|object| matches!(object, SceneObject::Armature(_)))
            .count()
    }

    #[must_use]
    pub fn object_count(&self) -> usize {
        self.objects.len()
    }

    #[must_use]
    pub fn object_name(&self, object: ObjectId) -> Option<&str> {
        self.objects.get(&object).map(SceneObject::name)
    }

    fn insert(&mut self, object: SceneObject) -> ObjectId {
        let id = ObjectId(self.next_id);
        self.next_id += 1;
        self.objects.insert(id, object);
        id
    }

    fn unique_object_name(&self, base: &str) -> String {
        unique_name(base, |candidate| {
            self.objects.values().any(|object| object.name() == candidate)
        })
    }

    fn armature_mut(&mut self, armature: ArmatureHandle) -> Result<&mut SceneArmature, HostError> {
        match self.objects.get_mut(&armature.id()) {
            Some(SceneObject::Armature(data)) => Ok(data),
            _ => Err(HostError::UnknownArmature(armature)),
        }
    }
}

impl CurveSource for MemoryScene {
    fn curve_handle(&self, object: ObjectId) -> Option<CurveHandle> {
        match self.objects.get(&object) {
            Some(SceneObject::Curve(_)) => Some(CurveHandle(object)),
            _ => None,
        }
    }

    fn tessellate(&self, curve: CurveHandle) -> Result<Vec<Point3>, HostError> {
        self.curve(curve)
            .map(|data| data.points.clone())
            .ok_or(HostError::UnknownCurve(curve))
    }

    fn local_to_world(&self, curve: CurveHandle) -> Result<Transform, HostError> {
        self.curve(curve)
            .map(|data| data.local_to_world)
            .ok_or(HostError::UnknownCurve(curve))
    }
}

impl ArmatureSink for MemoryScene {
    fn create_armature(&mut self, name: &str) -> ArmatureHandle {
        let name = self.unique_object_name(name);
        ArmatureHandle(self.insert(SceneObject::Armature(SceneArmature {
            name,
            ..SceneArmature::default()
        })))
    }

    fn remove_armature(&mut self, armature: ArmatureHandle) -> Result<(), HostError> {
        match self.objects.get(&armature.id()) {
            Some(SceneObject::Armature(_)) => {
                self.objects.remove(&armature.id());
                self.rig_links.retain(|_, linked| *linked != armature);
                Ok(())
            }
            _ => Err(HostError::UnknownArmature(armature)),
        }
    }

    fn armature_exists(&self, armature: ArmatureHandle) -> bool {
        self.armature(armature).is_some()
    }

    fn add_bone(
        &mut self,
        armature: ArmatureHandle,
        bone: &BoneRequest<'_>,
    ) -> Result<String, HostError> {
        let data = self.armature_mut(armature)?;
        if let Some(parent) = bone.parent {
            if data.bone(parent).is_none() {
                return Err(HostError::UnknownBone {
                    armature,
                    bone: parent.to_string(),
                });
            }
        }

        let name = unique_name(bone.name, |candidate| data.bone(candidate).is_some());
        data.bones.push(SceneBone {
            name: name.clone(),
            head: bone.head,
            tail: bone.tail,
            parent: bone.parent.map(str::to_string),
            connected: bone.connected,
        });
        Ok(name)
    }

    fn add_ik_constraint(
        &mut self,
        armature: ArmatureHandle,
        constraint: &IkConstraintRequest<'_>,
    ) -> Result<(), HostError> {
        let target_has_bone = self
            .armature(constraint.target)
            .ok_or(HostError::UnknownArmature(constraint.target))?
            .bone(constraint.subtarget)
            .is_some();
        if !target_has_bone {
            return Err(HostError::UnknownBone {
                armature: constraint.target,
                bone: constraint.subtarget.to_string(),
            });
        }

        let data = self.armature_mut(armature)?;
        if data.bone(constraint.owner_bone).is_none() {
            return Err(HostError::UnknownBone {
                armature,
                bone: constraint.owner_bone.to_string(),
            });
        }
        data.constraints.push(SceneIkConstraint {
            owner_bone: constraint.owner_bone.to_string(),
            target: constraint.target,
            subtarget: constraint.subtarget.to_string(),
            chain_count: constraint.chain_count,
        });
        Ok(())
    }

    fn rig_link(&self, curve: CurveHandle) -> Option<ArmatureHandle> {
        self.rig_links.get(&curve).copied()
    }

    fn set_rig_link(&mut self, curve: CurveHandle, armature: ArmatureHandle) {
        self.rig_links.insert(curve, armature);
    }
}

fn unique_name(base: &str, taken: impl Fn(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    (1..)
        .map(|n| format!("{base}.{n:03}"))
        .find(|candidate| !taken(candidate))
        .unwrap_or_else(|| base.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::{Line3, Vec3};

    #[test]
    fn object_names_are_deduplicated() {
        let mut scene = MemoryScene::new();
        let a = scene.create_armature("Armature");
        let b = scene.create_armature("Armature");
        let c = scene.create_armature("Armature");

        assert_eq!(scene.object_name(a.id()), Some("Armature"));
        assert_eq!(scene.object_name(b.id()), Some("Armature.001"));
        assert_eq!(scene.object_name(c.id()), Some("Armature.002"));
        assert_eq!(scene.armature_count(), 3);
    }

    #[test]
    fn only_curves_resolve_to_curve_handles() {
        let mut scene = MemoryScene::new();
        let curve = scene.add_curve_from(
            "Path",
            &Line3::new(Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)),
            4,
        );
        let other = scene.add_object("Cube");

        assert_eq!(scene.curve_handle(curve.id()), Some(curve));
        assert_eq!(scene.curve_handle(other), None);
        assert_eq!(scene.tessellate(curve).unwrap().len(), 5);
    }

    #[test]
    fn curve_transform_is_reported() {
        let mut scene = MemoryScene::new();
        let curve = scene.add_curve("Path", vec![Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)]);
        let t = Transform::translate(Vec3::new(0.0, 3.0, 0.0));
        scene.set_curve_transform(curve, t).unwrap();
        assert_eq!(scene.local_to_world(curve), Ok(t));

        let bogus = CurveHandle(ObjectId(99));
        assert_eq!(
            scene.set_curve_transform(bogus, t),
            Err(HostError::UnknownCurve(bogus))
        );
    }

    #[test]
    fn bones_need_existing_parents() {
        let mut scene = MemoryScene::new();
        let armature = scene.create_armature("Armature");
        let request = BoneRequest {
            name: "Bone.2",
            head: Point3::ORIGIN,
            tail: Point3::new(0.0, 0.0, 1.0),
            parent: Some("Bone.1"),
            connected: true,
        };
        assert!(matches!(
            scene.add_bone(armature, &request),
            Err(HostError::UnknownBone { .. })
        ));

        let root = BoneRequest {
            name: "Bone.1",
            parent: None,
            connected: false,
            ..request
        };
        assert_eq!(scene.add_bone(armature, &root).unwrap(), "Bone.1");
        assert_eq!(scene.add_bone(armature, &root).unwrap(), "Bone.1.001");
        assert_eq!(scene.add_bone(armature, &request).unwrap(), "Bone.2");
    }

    #[test]
    fn removing_an_armature_drops_its_link() {
        let mut scene = MemoryScene::new();
        let curve = scene.add_curve("Path", vec![Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)]);
        let armature = scene.create_armature("Armature");
        scene.set_rig_link(curve, armature);
        assert_eq!(scene.rig_link(curve), Some(armature));

        scene.remove_armature(armature).unwrap();
        assert!(!scene.armature_exists(armature));
        assert_eq!(scene.rig_link(curve), None);
        assert_eq!(
            scene.remove_armature(armature),
            Err(HostError::UnknownArmature(armature))
        );
    }
}
