use serde::{Deserialize, Serialize};

use super::distribute::DistributionMode;

/// User-adjustable parameters of a rig generation.
///
/// Field names deserialize from camelCase (`boneCount`) as well as
/// snake_case; missing fields take their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RigOptions {
    /// Requested number of chain bones, at least 1. Clamped to the curve's
    /// tessellated point count minus one.
    #[serde(alias = "bone_count")]
    pub bone_count: usize,
    /// Give every bone the same length instead of following the curve's
    /// sample density.
    #[serde(alias = "equal_length")]
    pub equal_length: bool,
    /// Append an IK target bone and constrain the chain to it.
    #[serde(alias = "add_ik_target", alias = "ikRig")]
    pub add_ik_target: bool,
}

impl Default for RigOptions {
    fn default() -> Self {
        Self {
            bone_count: 10,
            equal_length: false,
            add_ik_target: false,
        }
    }
}

impl RigOptions {
    #[must_use]
    pub const fn mode(&self) -> DistributionMode {
        DistributionMode::from_equal_length(self.equal_length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let options = RigOptions::default();
        assert_eq!(options.bone_count, 10);
        assert!(!options.equal_length);
        assert!(!options.add_ik_target);
        assert_eq!(options.mode(), DistributionMode::EqualIndex);
    }

    #[test]
    fn equal_length_selects_mode() {
        let options = RigOptions {
            equal_length: true,
            ..RigOptions::default()
        };
        assert_eq!(options.mode(), DistributionMode::EqualLength);
    }

    #[test]
    fn deserializes_partial_maps_with_defaults() {
        use serde::de::value::{Error, MapDeserializer};

        let camel = MapDeserializer::<_, Error>::new(vec![("boneCount", 4_usize)].into_iter());
        let options = RigOptions::deserialize(camel).unwrap();
        assert_eq!(options.bone_count, 4);
        assert!(!options.add_ik_target);

        let snake = MapDeserializer::<_, Error>::new(vec![("bone_count", 3_usize)].into_iter());
        assert_eq!(RigOptions::deserialize(snake).unwrap().bone_count, 3);
    }
}
