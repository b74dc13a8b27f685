use std::sync::Arc;

use crate::error::ConfigError;

/// Number of keypoints in the BODY_34 skeleton.
pub const BODY_34_JOINTS: usize = 34;

// Index map of the BODY_34 body format, with the joints recorded by default.
// "Rigth_Hand" is misspelled on purpose: existing datasets carry that header.
const BODY_34: [(&str, bool); BODY_34_JOINTS] = [
    ("Pelvis", true),
    ("Naval_Spine", true),
    ("Chest_Spine", true),
    ("Neck", true),
    ("Left_Clavicle", true),
    ("Left_Shoulder", true),
    ("Left_Elbow", true),
    ("Left_Wrist", true),
    ("Left_Hand", false),
    ("Left_Handtip", false),
    ("Left_Thumb", false),
    ("Right_Clavicle", true),
    ("Right_Shoulder", true),
    ("Right_Elbow", true),
    ("Right_Wrist", true),
    ("Rigth_Hand", false),
    ("Right_Handtip", false),
    ("Right_Thumb", false),
    ("Left_Hip", true),
    ("Left_knee", false),
    ("Left_Ankle", false),
    ("Left_Foot", false),
    ("Right_Hip", true),
    ("Right_Knee", false),
    ("Right_Ankle", false),
    ("Right_Foot", false),
    ("Head", false),
    ("Nose", false),
    ("Left_Eye", false),
    ("Left_Ear", false),
    ("Right_Eye", false),
    ("Right_Ear", false),
    ("Left_Heel", false),
    ("Right_Heel", false),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Joint {
    pub index: usize,
    pub name: &'static str,
    pub include: bool,
}

/// Ordered joint table deciding which keypoints end up in a recording.
///
/// The table is built once and never mutated; clones share the same storage.
/// Column order in the output always follows joint index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JointSchema {
    joints: Arc<[Joint]>,
}

impl Default for JointSchema {
    fn default() -> Self {
        Self::body_34()
    }
}

impl JointSchema {
    /// BODY_34 with the default include set (torso, arms down to the wrists, hips).
    pub fn body_34() -> Self {
        let joints = BODY_34
            .iter()
            .enumerate()
            .map(|(index, &(name, include))| Joint {
                index,
                name,
                include,
            })
            .collect();
        Self { joints }
    }

    /// BODY_34 including exactly the named joints. Names match case-insensitively.
    pub fn with_included<S: AsRef<str>>(names: &[S]) -> Result<Self, ConfigError> {
        let mut include = [false; BODY_34_JOINTS];
        for name in names {
            let name = name.as_ref();
            let index = BODY_34
                .iter()
                .position(|(joint, _)| joint.eq_ignore_ascii_case(name))
                .ok_or_else(|| ConfigError::UnknownJoint(name.to_string()))?;
            include[index] = true;
        }

        let joints = BODY_34
            .iter()
            .enumerate()
            .map(|(index, &(name, _))| Joint {
                index,
                name,
                include: include[index],
            })
            .collect();
        Ok(Self { joints })
    }

    pub fn joints(&self) -> &[Joint] {
        &self.joints
    }

    pub fn included(&self) -> impl Iterator<Item = &Joint> + '_ {
        self.joints.iter().filter(|joint| joint.include)
    }

    pub fn included_count(&self) -> usize {
        self.included().count()
    }
}
