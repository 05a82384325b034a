//! The chicken: a fixed rig of fourteen boxes.
//!
//! Each part starts from a copy of its parent's checkpoint frame and runs its own list of
//! steps. The checkpoint is the frame a part hands to its children, normally taken before the
//! part scales itself so that children attach to the joint rather than inherit the scale.

use smallvec::SmallVec;

use crate::{
    gfx::{Primitive, Shape, TextureSelector},
    math::{Matrix4, Vector3, Vector4},
};

/// The animated joints.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Joint {
    Head,
    RightArm,
    LeftArm,
}

/// Joint angles in degrees.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct JointAngles {
    pub head: f32,
    pub right_arm: f32,
    pub left_arm: f32,
}

impl Default for JointAngles {
    fn default() -> JointAngles {
        JointAngles {
            head: -2.0,
            right_arm: 225.0,
            left_arm: 135.0,
        }
    }
}

impl JointAngles {
    #[inline]
    pub fn get(&self, joint: Joint) -> f32 {
        match joint {
            Joint::Head => self.head,
            Joint::RightArm => self.right_arm,
            Joint::LeftArm => self.left_arm,
        }
    }

    #[inline]
    pub fn set(&mut self, joint: Joint, degrees: f32) {
        match joint {
            Joint::Head => self.head = degrees,
            Joint::RightArm => self.right_arm = degrees,
            Joint::LeftArm => self.left_arm = degrees,
        }
    }
}

#[derive(Copy, Clone, Debug)]
enum Step {
    Translate(f32, f32, f32),
    Scale(f32, f32, f32),
    /// Rotate about an axis by the current angle of a joint.
    Rotate(Joint, Vector3),
    /// Save the frame handed to children.
    Checkpoint,
}

#[derive(Debug)]
struct Part {
    name: &'static str,
    /// Index of the parent in [`PARTS`], which always comes earlier.
    parent: Option<usize>,
    color: Vector4,
    steps: &'static [Step],
}

const BODY: usize = 0;
const HEAD: usize = 1;
const RIGHT_LEG_TOP: usize = 10;
const LEFT_LEG_TOP: usize = 12;

const WHITE: Vector4 = Vector4::new(0.9, 0.9, 0.9, 1.0);
const EYE: Vector4 = Vector4::new(0.2, 0.2, 0.2, 1.0);
const ORANGE: Vector4 = Vector4::new(1.0, 0.64, 0.0, 1.0);

use Step::*;

static PARTS: [Part; 14] = [
    Part {
        name: "body",
        parent: None,
        color: WHITE,
        steps: &[
            Translate(0.0, -0.4, 0.0),
            Checkpoint,
            Scale(0.5, 0.6, 0.75),
            Translate(-0.5, 0.0, 0.0),
        ],
    },
    Part {
        name: "head",
        parent: Some(BODY),
        color: WHITE,
        steps: &[
            Translate(-0.25, 0.6001, 0.2),
            Rotate(Joint::Head, Vector3::new(1.0, 0.0, 0.0)),
            Translate(0.0, 0.0, -0.2),
            Checkpoint,
            Scale(0.5, 0.5, 0.5),
        ],
    },
    Part {
        name: "body_back",
        parent: Some(BODY),
        color: Vector4::new(0.85, 0.85, 0.85, 1.0),
        steps: &[Scale(0.4, 0.55, 0.2), Translate(-0.5, 0.05, 3.75)],
    },
    Part {
        name: "right_eye",
        parent: Some(HEAD),
        color: EYE,
        steps: &[Translate(0.5, 0.25, 0.1), Scale(0.05, 0.1, 0.1)],
    },
    Part {
        name: "left_eye",
        parent: Some(HEAD),
        color: EYE,
        steps: &[Translate(-0.05, 0.25, 0.1), Scale(0.05, 0.1, 0.1)],
    },
    Part {
        name: "comb",
        parent: Some(HEAD),
        color: Vector4::new(1.0, 0.0, 0.0, 1.0),
        steps: &[Scale(0.1, 0.18, 0.3), Translate(2.0, 2.8, 0.25)],
    },
    Part {
        name: "beak_top",
        parent: Some(HEAD),
        color: ORANGE,
        steps: &[Scale(0.08, 0.1, 0.12), Translate(2.5, 1.5, -1.0)],
    },
    Part {
        name: "beak_bottom",
        parent: Some(HEAD),
        color: Vector4::new(0.9, 0.0, 0.0, 1.0),
        steps: &[Scale(0.08, 0.08, 0.08), Translate(2.5, 0.85, -1.0)],
    },
    Part {
        name: "right_arm",
        parent: Some(BODY),
        color: WHITE,
        steps: &[
            Translate(0.25, 0.5, 0.1),
            Rotate(Joint::RightArm, Vector3::new(0.0, 0.0, 1.0)),
            Scale(0.2, 0.5, 0.5),
        ],
    },
    Part {
        name: "left_arm",
        parent: Some(BODY),
        color: WHITE,
        steps: &[
            Translate(-0.1, 0.4, 0.1),
            Rotate(Joint::LeftArm, Vector3::new(0.0, 0.0, 1.0)),
            Scale(0.2, 0.5, 0.5),
        ],
    },
    // The lower legs hang off the fully scaled upper leg.
    Part {
        name: "right_leg_top",
        parent: Some(BODY),
        color: ORANGE,
        steps: &[Scale(0.05, 0.1, 0.05), Translate(1.0, -1.0, 5.0), Checkpoint],
    },
    Part {
        name: "right_leg_bottom",
        parent: Some(RIGHT_LEG_TOP),
        color: ORANGE,
        steps: &[Scale(1.5, 0.4, 2.0), Translate(-0.15, -1.0, -0.5)],
    },
    Part {
        name: "left_leg_top",
        parent: Some(BODY),
        color: ORANGE,
        steps: &[Scale(0.05, 0.1, 0.05), Translate(-2.5, -1.0, 5.0), Checkpoint],
    },
    Part {
        name: "left_leg_bottom",
        parent: Some(LEFT_LEG_TOP),
        color: ORANGE,
        steps: &[Scale(1.5, 0.4, 2.0), Translate(-0.15, -1.0, -0.5)],
    },
];

pub const PART_COUNT: usize = PARTS.len();

/// One posed part of the rig.
#[derive(Copy, Clone, Debug)]
pub struct PosedPart {
    pub name: &'static str,
    pub primitive: Primitive,
}

pub type Pose = SmallVec<[PosedPart; PART_COUNT]>;

/// Resolve every part of the chicken placed at `root`, parents before children.
///
/// Every part gets its normal matrix derived. With `normal_debug` every part shades its
/// normals instead of its colour.
pub fn pose(root: &Matrix4, angles: &JointAngles, normal_debug: bool) -> Pose {
    let mut checkpoints = [Matrix4::identity(); PART_COUNT];
    let mut posed = Pose::new();

    for (index, part) in PARTS.iter().enumerate() {
        let frame = match part.parent {
            Some(parent) => &checkpoints[parent],
            None => root,
        };
        let mut primitive = Primitive::with_parent(Shape::Cube, frame);
        let mut checkpoint = None;
        for step in part.steps {
            let matrix = primitive.matrix_mut();
            match *step {
                Translate(x, y, z) => {
                    matrix.translate(x, y, z);
                }
                Scale(x, y, z) => {
                    matrix.scale(x, y, z);
                }
                Rotate(joint, axis) => {
                    matrix.rotate(angles.get(joint), axis.x(), axis.y(), axis.z());
                }
                Checkpoint => checkpoint = Some(*matrix),
            }
        }
        checkpoints[index] = checkpoint.unwrap_or(*primitive.matrix());

        primitive.set_color(part.color).derive_normal_matrix();
        if normal_debug {
            primitive.set_selector(TextureSelector::NormalDebug);
        }
        posed.push(PosedPart {
            name: part.name,
            primitive,
        });
    }
    posed
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f32 = 1e-4;

    fn part<'a>(pose: &'a Pose, name: &str) -> &'a Primitive {
        &pose.iter().find(|part| part.name == name).unwrap().primitive
    }

    fn head_descendants() -> Vec<&'static str> {
        PARTS
            .iter()
            .filter(|part| part.parent == Some(HEAD))
            .map(|part| part.name)
            .collect()
    }

    #[test]
    fn parents_come_first() {
        for (index, part) in PARTS.iter().enumerate() {
            if let Some(parent) = part.parent {
                assert!(parent < index, "{} is posed before its parent", part.name);
            }
        }
        assert_eq!(5, head_descendants().len());
    }

    #[test]
    fn head_rotation_moves_only_head_descendants() {
        let root = Matrix4::translation(Vector3::new(0.0, -0.2, 2.0));
        let mut angles = JointAngles::default();
        angles.set(Joint::Head, 0.0);
        let before = pose(&root, &angles, false);
        angles.set(Joint::Head, 30.0);
        let after = pose(&root, &angles, false);

        // The change applied to the head, as a world-space transform.
        let head_before = part(&before, "head").matrix();
        let head_after = part(&after, "head").matrix();
        let change = head_after * &head_before.inverted().unwrap();
        assert!(!change.near(&Matrix4::identity(), EPSILON));

        for name in head_descendants() {
            let moved = part(&after, name).matrix();
            let expected = &change * part(&before, name).matrix();
            assert!(moved.near(&expected, EPSILON), "{} did not follow the head", name);
        }

        for name in &[
            "body",
            "body_back",
            "right_arm",
            "left_arm",
            "right_leg_top",
            "right_leg_bottom",
            "left_leg_top",
            "left_leg_bottom",
        ] {
            let unchanged = part(&before, name).matrix().near(part(&after, name).matrix(), EPSILON);
            assert!(unchanged, "{} moved with the head", name);
        }
    }

    #[test]
    fn children_attach_to_the_unscaled_frame() {
        let mut angles = JointAngles::default();
        angles.set(Joint::Head, 0.0);
        let posed = pose(&Matrix4::identity(), &angles, false);

        // The head's origin ignores the body's scale.
        let origin = part(&posed, "head").matrix().transform_point(Vector3::splat(0.0));
        assert!(origin.near(Vector3::new(-0.25, 0.2001, 0.0), EPSILON), "{:?}", origin);

        // The eye is offset from the head joint in unscaled units.
        let eye = part(&posed, "right_eye").matrix().transform_point(Vector3::splat(0.0));
        assert!(eye.near(Vector3::new(0.25, 0.4501, 0.1), EPSILON), "{:?}", eye);
    }

    #[test]
    fn root_moves_everything() {
        let angles = JointAngles::default();
        let home = pose(&Matrix4::identity(), &angles, false);
        let offset = Vector3::new(0.0, -0.2, 2.0);
        let moved = pose(&Matrix4::translation(offset), &angles, false);
        for (a, b) in home.iter().zip(moved.iter()) {
            let p = a.primitive.matrix().transform_point(Vector3::splat(0.5)) + offset;
            let q = b.primitive.matrix().transform_point(Vector3::splat(0.5));
            assert!(p.near(q, EPSILON), "{}", a.name);
        }
    }

    #[test]
    fn arms_and_normals() {
        let posed = pose(&Matrix4::identity(), &JointAngles::default(), true);
        assert_eq!(PART_COUNT, posed.len());
        for part in &posed {
            assert_eq!(TextureSelector::NormalDebug, part.primitive.selector());
            let matrix = part.primitive.matrix();
            let normal = part.primitive.normal_matrix();
            // Normals stay perpendicular to transformed tangents.
            let n = normal.transform_vector(Vector3::new(0.0, 1.0, 0.0));
            let t = matrix.transform_vector(Vector3::new(1.0, 0.0, 0.0));
            assert!(n.dot(t).abs() < EPSILON, "{}", part.name);
        }

        // The arms mirror each other about the body's x axis.
        let right = part(&posed, "right_arm").matrix().transform_vector(Vector3::up());
        let left = part(&posed, "left_arm").matrix().transform_vector(Vector3::up());
        assert!((right.x() + left.x()).abs() < EPSILON);
        assert!((right.y() - left.y()).abs() < EPSILON);
    }
}
