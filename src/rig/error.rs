use crate::host::HostError;

use super::report::ReportLevel;

/// Failures of a rig generation.
///
/// All variants except [`RigError::Host`] are raised before the host is
/// modified. A host failure while building the replacement armature leaves
/// the curve without a rig, since the previous one was already removed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RigError {
    #[error("Please select an active curve")]
    NoCurveSelected,
    #[error(
        "Curve resolution is insufficient for the bone count ({available} points, {required} required)"
    )]
    InsufficientResolution { available: usize, required: usize },
    #[error("bone count must be at least 1")]
    InvalidBoneCount,
    #[error("curve point {index} has non-finite coordinates")]
    NonFinitePoint { index: usize },
    #[error("host error: {0}")]
    Host(#[from] HostError),
}

impl RigError {
    #[must_use]
    pub const fn report_level(&self) -> ReportLevel {
        ReportLevel::Error
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{CurveHandle, ObjectId};

    #[test]
    fn messages_are_user_facing() {
        assert_eq!(RigError::NoCurveSelected.to_string(), "Please select an active curve");
        let err = RigError::InsufficientResolution {
            available: 1,
            required: 2,
        };
        assert!(err.to_string().starts_with("Curve resolution is insufficient"));
        assert_eq!(err.report_level(), ReportLevel::Error);
    }

    #[test]
    fn host_errors_convert() {
        let host = HostError::UnknownCurve(CurveHandle(ObjectId(7)));
        let err: RigError = host.clone().into();
        assert_eq!(err, RigError::Host(host));
    }
}
