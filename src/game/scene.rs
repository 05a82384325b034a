use smallvec::SmallVec;

use crate::{
    config::Config,
    game::{chicken, Animation, Camera, Lighting, PART_COUNT},
    gfx::{FrameUniforms, Primitive, TextureSelector},
    math::{Matrix4, Vector3, Vector4},
};

bitflags::bitflags! {
    pub struct SceneFlags: u32 {
        /// Advance the animation on every tick.
        const ANIMATE = 0x01;
        /// Shade normals instead of colours.
        const NORMAL_DEBUG = 0x02;
        /// Specular and spotlight. Diffuse and ambient are always on.
        const LIGHT = 0x04;
        const SPOTLIGHT = 0x08;
    }
}

impl Default for SceneFlags {
    #[inline]
    fn default() -> SceneFlags {
        SceneFlags::LIGHT
    }
}

pub const FLOOR_COLOR: Vector4 = Vector4::new(0.76, 0.70, 0.50, 1.0);
pub const SKY_COLOR: Vector4 = Vector4::new(0.3, 0.0, 0.3, 1.0);
/// Brighter than white so the marker reads as a glowing bulb.
pub const LIGHT_MARKER_COLOR: Vector4 = Vector4::new(2.0, 2.0, 0.0, 1.0);

/// Every primitive drawn in a frame.
pub type Primitives = SmallVec<[Primitive; 5 + PART_COUNT]>;

/// All mutable state of the scene. Everything drawn is derived from this each frame.
#[derive(Debug, Clone)]
pub struct SceneState {
    pub flags: SceneFlags,
    pub animation: Animation,
    pub lighting: Lighting,
    pub camera: Camera,
}

impl Default for SceneState {
    fn default() -> SceneState {
        SceneState::new(&Config::default())
    }
}

impl SceneState {
    pub fn new(config: &Config) -> SceneState {
        SceneState {
            flags: SceneFlags::default(),
            animation: Animation::default(),
            lighting: Lighting::default(),
            camera: Camera::from_config(config),
        }
    }

    /// Set the animation clock. While animating, the light swings along x with it.
    pub fn tick(&mut self, seconds: f32) {
        self.animation.seconds = seconds;
        if self.flags.contains(SceneFlags::ANIMATE) {
            self.lighting.position.set_x(self.animation.light_x());
        }
    }

    pub fn frame_uniforms(&self) -> FrameUniforms {
        FrameUniforms {
            view: self.camera.view_matrix(),
            projection: self.camera.projection_matrix(),
            global_rotation: Matrix4::rotation(self.animation.global_angle, Vector3::up()),
            light: self.lighting.to_uniforms(
                self.camera.eye(),
                self.flags.contains(SceneFlags::LIGHT),
                self.flags.contains(SceneFlags::SPOTLIGHT),
            ),
        }
    }

    /// The frame's primitives in draw order: floor, sky, light marker, sphere, cube, then the
    /// chicken.
    pub fn primitives(&self) -> Primitives {
        let normal_debug = self.flags.contains(SceneFlags::NORMAL_DEBUG);
        let debug = |primitive: &mut Primitive| {
            if normal_debug {
                primitive.set_selector(TextureSelector::NormalDebug);
            }
        };
        let mut primitives = Primitives::new();

        let mut floor = Primitive::cube();
        floor
            .set_color(FLOOR_COLOR)
            .set_selector(TextureSelector::SolidColor)
            .set_fast(true);
        floor.matrix_mut().translate(-5.0, -0.75, -5.0).scale(10.0, 0.0, 10.0);
        primitives.push(floor);

        let mut sky = Primitive::cube();
        sky.set_color(SKY_COLOR);
        sky.matrix_mut()
            .scale(-7.0, -7.0, -7.0)
            .rotate(180.0, 0.0, 0.0, 1.0)
            .translate(-0.5, -0.5, -0.5);
        debug(&mut sky);
        primitives.push(sky);

        let mut marker = Primitive::cube();
        let light = self.lighting.position;
        marker.set_color(LIGHT_MARKER_COLOR);
        marker
            .matrix_mut()
            .translate(light.x(), light.y(), light.z())
            .scale(-0.1, -0.1, -0.1)
            .translate(-0.5, -0.5, -0.5);
        primitives.push(marker);

        let mut sphere = Primitive::sphere();
        sphere.set_color(Vector4::new(1.0, 0.0, 0.0, 1.0));
        sphere.matrix_mut().translate(1.0, 0.0, 2.0).scale(0.5, 0.5, 0.5);
        debug(&mut sphere);
        primitives.push(sphere);

        let mut cube = Primitive::cube();
        cube.set_color(Vector4::new(0.0, 1.0, 0.0, 1.0));
        cube.matrix_mut().translate(-2.0, -0.5, 2.0);
        debug(&mut cube);
        primitives.push(cube);

        let root = Matrix4::translation(Vector3::new(
            0.0,
            self.animation.chicken_y - 0.2,
            self.animation.chicken_z - 4.0,
        ));
        let chicken = chicken::pose(&root, &self.animation.joints, normal_debug);
        primitives.extend(chicken.iter().map(|part| part.primitive));
        primitives
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gfx::DrawPath;

    #[test]
    fn draw_order_and_defaults() {
        let scene = SceneState::default();
        let primitives = scene.primitives();
        assert_eq!(5 + PART_COUNT, primitives.len());
        assert!(!primitives.spilled());

        let floor = &primitives[0];
        assert_eq!(DrawPath::Fast, floor.path());
        assert_eq!(FLOOR_COLOR, floor.color());
        assert_eq!(SKY_COLOR, primitives[1].color());
        assert_eq!(LIGHT_MARKER_COLOR, primitives[2].color());
        assert!(primitives[5..].iter().all(|p| p.path() == DrawPath::Full));

        // Only the chicken carries a derived normal matrix.
        for primitive in &primitives[..5] {
            assert_eq!(&Matrix4::identity(), primitive.normal_matrix());
        }
        assert_ne!(&Matrix4::identity(), primitives[5].normal_matrix());
    }

    #[test]
    fn normal_debug_skips_floor_and_marker() {
        let mut scene = SceneState::default();
        scene.flags.insert(SceneFlags::NORMAL_DEBUG);
        let selectors: Vec<_> = scene.primitives().iter().map(Primitive::selector).collect();
        assert_eq!(TextureSelector::SolidColor, selectors[0]);
        assert_eq!(TextureSelector::SolidColor, selectors[2]);
        assert!(selectors
            .iter()
            .enumerate()
            .filter(|(index, _)| *index != 0 && *index != 2)
            .all(|(_, selector)| *selector == TextureSelector::NormalDebug));
    }

    #[test]
    fn light_follows_clock_only_when_animating() {
        let mut scene = SceneState::default();
        scene.tick(1.0);
        assert_eq!(0.0, scene.lighting.position.x());

        scene.flags.insert(SceneFlags::ANIMATE);
        scene.tick(std::f32::consts::PI);
        assert!((scene.lighting.position.x() + 1.0).abs() < 1e-6);
        let marker = scene.primitives()[2];
        let corner = marker.matrix().transform_point(Vector3::splat(0.5));
        assert!(corner.near(scene.lighting.position, 1e-5));
    }

    #[test]
    fn uniforms_follow_flags() {
        let mut scene = SceneState::default();
        let light = scene.frame_uniforms().light;
        assert!(light.light_on);
        assert!(!light.spotlight_on);
        assert_eq!(Vector3::new(0.0, 0.0, 5.0), light.camera_position);

        scene.flags.remove(SceneFlags::LIGHT);
        scene.flags.insert(SceneFlags::SPOTLIGHT);
        scene.animation.global_angle = 90.0;
        let frame = scene.frame_uniforms();
        assert!(!frame.light.light_on);
        assert!(frame.light.spotlight_on);
        let turned = frame.global_rotation.transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert!(turned.near(Vector3::new(0.0, 0.0, -1.0), 1e-5));
    }
}
