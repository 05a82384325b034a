use crate::game::JointAngles;

/// Scalars that pose the scene. All angles are degrees.
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    /// Seconds since the animation clock started.
    pub seconds: f32,
    /// Rotation of the whole scene about `+y`.
    pub global_angle: f32,
    pub joints: JointAngles,
    pub chicken_y: f32,
    pub chicken_z: f32,
}

impl Default for Animation {
    fn default() -> Animation {
        Animation {
            seconds: 0.0,
            global_angle: 0.0,
            joints: JointAngles::default(),
            chicken_y: 0.0,
            chicken_z: 6.0,
        }
    }
}

impl Animation {
    /// Where the orbiting light sits along x at the current time.
    #[inline]
    pub fn light_x(&self) -> f32 {
        self.seconds.cos()
    }
}
