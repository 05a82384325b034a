use crate::{game::Joint, math::Vector3};

/// Discrete camera motions the input layer can ask for.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum CameraMotion {
    MoveForward,
    MoveBackwards,
    MoveLeft,
    MoveRight,
    PanLeft,
    PanRight,
    GoUp,
    GoDown,
    PanUp,
    PanDown,
}

impl CameraMotion {
    /// Pans turn by degrees, everything else moves by distance.
    #[inline]
    pub fn is_pan(self) -> bool {
        matches!(
            self,
            CameraMotion::PanLeft | CameraMotion::PanRight | CameraMotion::PanUp | CameraMotion::PanDown
        )
    }
}

/// A camera motion with an optional magnitude. Without one the configured step is used.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CameraCommand {
    pub motion: CameraMotion,
    pub magnitude: Option<f32>,
}

impl CameraCommand {
    #[inline]
    pub fn step(motion: CameraMotion) -> CameraCommand {
        CameraCommand {
            motion,
            magnitude: None,
        }
    }

    #[inline]
    pub fn by(motion: CameraMotion, magnitude: f32) -> CameraCommand {
        CameraCommand {
            motion,
            magnitude: Some(magnitude),
        }
    }

    /// The pans for a mouse drag of `(dx, dy)` pixels. Dragging right pans right and
    /// dragging down pans down.
    pub fn drag(dx: f32, dy: f32, sensitivity: f32) -> impl Iterator<Item = CameraCommand> {
        let horizontal = if dx > 0.0 {
            Some(CameraCommand::by(CameraMotion::PanRight, dx * sensitivity))
        } else if dx < 0.0 {
            Some(CameraCommand::by(CameraMotion::PanLeft, -dx * sensitivity))
        } else {
            None
        };
        let vertical = if dy > 0.0 {
            Some(CameraCommand::by(CameraMotion::PanDown, dy * sensitivity))
        } else if dy < 0.0 {
            Some(CameraCommand::by(CameraMotion::PanUp, -dy * sensitivity))
        } else {
            None
        };
        horizontal.into_iter().chain(vertical)
    }
}

/// Setters from the control surface. Each one is visible to the next render.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Control {
    Animate(bool),
    NormalDebug(bool),
    Light(bool),
    Spotlight(bool),
    /// Degrees about `+y`.
    GlobalAngle(f32),
    /// Degrees.
    Fov(f32),
    JointAngle(Joint, f32),
    LightColor(Vector3),
    LightPosition(Vector3),
    /// Need not be unit length. Zero points straight down.
    SpotDirection(Vector3),
    /// Half-angle of the cone in degrees.
    SpotCutoff(f32),
    SpotExponent(f32),
    /// New viewport size in pixels.
    Resize(u32, u32),
}
