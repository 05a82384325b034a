mod frame;
mod input;

pub use frame::*;
pub use input::*;

use crate::{
    config::Config,
    game::{SceneFlags, SceneState},
    gfx::{Bitmap, MeshSet, Rasterizer, TextureSlots},
    util::BoxedError,
};
use std::time::{Duration, Instant};

/// Drives the scene: owns all mutable state and turns it into one frame of draw calls at a
/// time.
///
/// Controls, camera commands and texture binds are applied immediately, so whatever the
/// caller changes before [`Engine::render`] is what that render shows.
pub struct Engine {
    config: Config,
    scene: SceneState,
    textures: TextureSlots,
    meshes: MeshSet,
    last_frame: FrameStats,
}

impl Engine {
    pub fn new(config: Config) -> Engine {
        let meshes = MeshSet::new(config.sphere_stacks, config.sphere_slices);
        Engine {
            scene: SceneState::new(&config),
            textures: TextureSlots::default(),
            meshes,
            last_frame: FrameStats::default(),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn scene(&self) -> &SceneState {
        &self.scene
    }

    #[inline]
    pub fn scene_mut(&mut self) -> &mut SceneState {
        &mut self.scene
    }

    #[inline]
    pub fn textures(&self) -> &TextureSlots {
        &self.textures
    }

    #[inline]
    pub fn meshes(&self) -> &MeshSet {
        &self.meshes
    }

    #[inline]
    pub fn last_frame(&self) -> FrameStats {
        self.last_frame
    }

    /// Advance the animation clock to `elapsed` since startup.
    pub fn tick(&mut self, elapsed: Duration) {
        self.scene.tick(elapsed.as_secs_f32());
    }

    pub fn apply(&mut self, control: Control) {
        let scene = &mut self.scene;
        match control {
            Control::Animate(on) => {
                log::debug!("Animation {}", if on { "started" } else { "stopped" });
                scene.flags.set(SceneFlags::ANIMATE, on);
            }
            Control::NormalDebug(on) => scene.flags.set(SceneFlags::NORMAL_DEBUG, on),
            Control::Light(on) => scene.flags.set(SceneFlags::LIGHT, on),
            Control::Spotlight(on) => scene.flags.set(SceneFlags::SPOTLIGHT, on),
            Control::GlobalAngle(degrees) => scene.animation.global_angle = degrees,
            Control::Fov(degrees) => scene.camera.set_fov(degrees),
            Control::JointAngle(joint, degrees) => scene.animation.joints.set(joint, degrees),
            Control::LightColor(color) => scene.lighting.color = color,
            Control::LightPosition(position) => scene.lighting.position = position,
            Control::SpotDirection(direction) => scene.lighting.spotlight.set_direction(direction),
            Control::SpotCutoff(degrees) => scene.lighting.spotlight.set_cutoff(degrees),
            Control::SpotExponent(exponent) => scene.lighting.spotlight.set_exponent(exponent),
            Control::Resize(width, height) => {
                scene
                    .camera
                    .set_aspect_ratio(width as f32 / height.max(1) as f32);
            }
        }
    }

    pub fn command(&mut self, command: CameraCommand) {
        let magnitude = command.magnitude.unwrap_or(if command.motion.is_pan() {
            self.config.pan_step
        } else {
            self.config.move_step
        });
        log::trace!("Camera {:?} by {}", command.motion, magnitude);

        let camera = &mut self.scene.camera;
        match command.motion {
            CameraMotion::MoveForward => camera.move_forward(magnitude),
            CameraMotion::MoveBackwards => camera.move_backwards(magnitude),
            CameraMotion::MoveLeft => camera.move_left(magnitude),
            CameraMotion::MoveRight => camera.move_right(magnitude),
            CameraMotion::PanLeft => camera.pan_left(magnitude),
            CameraMotion::PanRight => camera.pan_right(magnitude),
            CameraMotion::GoUp => camera.go_up(magnitude),
            CameraMotion::GoDown => camera.go_down(magnitude),
            CameraMotion::PanUp => camera.pan_up(magnitude),
            CameraMotion::PanDown => camera.pan_down(magnitude),
        }
    }

    /// Pan for a mouse drag of `(dx, dy)` pixels.
    pub fn drag(&mut self, dx: f32, dy: f32) {
        for command in CameraCommand::drag(dx, dy, self.config.drag_sensitivity) {
            self.command(command);
        }
    }

    /// Bind a finished image to a texture slot. The latest bind for a slot wins.
    pub fn bind_texture(&mut self, slot: usize, bitmap: Bitmap) -> Result<(), BoxedError> {
        self.textures.bind(slot, bitmap)
    }

    /// Issue one frame: the shared uniforms, then every primitive in draw order.
    pub fn render<R: Rasterizer + ?Sized>(
        &mut self,
        rasterizer: &mut R,
    ) -> Result<FrameStats, BoxedError> {
        let start = Instant::now();
        let frame = self.scene.frame_uniforms();
        let primitives = self.scene.primitives();

        rasterizer.begin_frame(&frame, &self.textures);
        for primitive in &primitives {
            primitive.render(rasterizer);
        }
        rasterizer.end_frame()?;

        self.last_frame = FrameStats {
            duration: start.elapsed(),
            draw_calls: primitives.len(),
        };
        Ok(self.last_frame)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{game::Joint, math::Vector3};

    #[test]
    fn default_steps_come_from_config() {
        let config = Config {
            move_step: 1.0,
            pan_step: 90.0,
            ..Config::default()
        };
        let mut engine = Engine::new(config);
        engine.command(CameraCommand::step(CameraMotion::MoveForward));
        assert!(engine.scene().camera.eye().near(Vector3::new(0.0, 0.0, 4.0), 1e-5));
        engine.command(CameraCommand::step(CameraMotion::PanRight));
        let forward = engine.scene().camera.forward();
        assert!(forward.near(Vector3::new(1.0, 0.0, 0.0), 1e-5), "{:?}", forward);
        engine.command(CameraCommand::by(CameraMotion::GoUp, 0.5));
        assert!(engine.scene().camera.eye().near(Vector3::new(0.0, 0.5, 4.0), 1e-5));
    }

    #[test]
    fn drag_uses_sensitivity() {
        let mut engine = Engine::new(Config::default());
        engine.drag(-100.0, 0.0);
        // 100 pixels at 0.3 degrees each.
        let forward = engine.scene().camera.forward();
        let (sin, cos) = 30f32.to_radians().sin_cos();
        assert!(forward.near(Vector3::new(-sin, 0.0, -cos), 1e-5), "{:?}", forward);
    }

    #[test]
    fn controls_update_state() {
        let mut engine = Engine::new(Config::default());
        engine.apply(Control::Animate(true));
        engine.apply(Control::Light(false));
        engine.apply(Control::JointAngle(Joint::LeftArm, 10.0));
        engine.apply(Control::SpotCutoff(60.0));
        engine.apply(Control::Fov(90.0));
        let scene = engine.scene();
        assert!(scene.flags.contains(SceneFlags::ANIMATE));
        assert!(!scene.flags.contains(SceneFlags::LIGHT));
        assert_eq!(10.0, scene.animation.joints.left_arm);
        assert!((scene.lighting.spotlight.cos_cutoff() - 0.5).abs() < 1e-6);
        assert_eq!(90.0, scene.camera.fov());
    }

    #[test]
    fn bad_texture_slot_is_an_error() {
        let mut engine = Engine::new(Config::default());
        let bitmap = Bitmap::from_rgba8(1, 1, vec![0; 4]).unwrap();
        assert!(engine.bind_texture(7, bitmap.clone()).is_err());
        assert!(engine.bind_texture(4, bitmap).is_ok());
    }
}
