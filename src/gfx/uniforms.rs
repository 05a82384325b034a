use crate::{
    gfx::{DrawCall, LightUniforms},
    math::{Matrix4, Vector3, Vector4},
};

/// The state shared by every draw call in one frame.
#[derive(Copy, Clone, Debug)]
pub struct FrameUniforms {
    pub view: Matrix4,
    pub projection: Matrix4,
    /// Applied between the view and the model transform, and ignored by lighting.
    pub global_rotation: Matrix4,
    pub light: LightUniforms,
}

impl Default for FrameUniforms {
    fn default() -> FrameUniforms {
        FrameUniforms {
            view: Matrix4::identity(),
            projection: Matrix4::identity(),
            global_rotation: Matrix4::identity(),
            light: LightUniforms::default(),
        }
    }
}

impl FrameUniforms {
    /// `P * V * G`, the part of the clip transform that does not depend on the draw call.
    pub fn view_projection(&self) -> Matrix4 {
        &(&self.projection * &self.view) * &self.global_rotation
    }

    pub fn to_block(&self) -> FrameBlock {
        let light = &self.light;
        FrameBlock {
            view: self.view,
            projection: self.projection,
            global_rotation: self.global_rotation,
            camera_position: light.camera_position,
            light_on: light.light_on as u32,
            light_position: light.position,
            spotlight_on: light.spotlight_on as u32,
            light_color: light.color,
            spot_cos_cutoff: light.spot_cos_cutoff,
            spot_direction: light.spot_direction,
            spot_exponent: light.spot_exponent,
        }
    }
}

/// GPU layout of [`FrameUniforms`]. Each `Vector3` shares its 16-byte row with the scalar
/// that follows it.
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct FrameBlock {
    pub view: Matrix4,
    pub projection: Matrix4,
    pub global_rotation: Matrix4,
    pub camera_position: Vector3,
    pub light_on: u32,
    pub light_position: Vector3,
    pub spotlight_on: u32,
    pub light_color: Vector3,
    pub spot_cos_cutoff: f32,
    pub spot_direction: Vector3,
    pub spot_exponent: f32,
}

unsafe impl bytemuck::Zeroable for FrameBlock {}

unsafe impl bytemuck::Pod for FrameBlock {}

/// GPU layout of one [`DrawCall`].
#[repr(C)]
#[derive(Copy, Clone, Debug)]
pub struct DrawBlock {
    pub model: Matrix4,
    pub normal: Matrix4,
    pub color: Vector4,
    pub selector: i32,
    pub _pad: [u32; 3],
}

unsafe impl bytemuck::Zeroable for DrawBlock {}

unsafe impl bytemuck::Pod for DrawBlock {}

impl From<&DrawCall> for DrawBlock {
    fn from(call: &DrawCall) -> DrawBlock {
        DrawBlock {
            model: call.model,
            normal: call.normal,
            color: call.color,
            selector: call.selector.to_raw(),
            _pad: [0; 3],
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::gfx::{Primitive, TextureSelector};
    use std::mem;

    #[test]
    fn block_layouts() {
        assert_eq!(256, mem::size_of::<FrameBlock>());
        assert_eq!(160, mem::size_of::<DrawBlock>());
        let block = FrameUniforms::default().to_block();
        let bytes = bytemuck::bytes_of(&block);
        // light_on sits right after the camera position.
        assert_eq!(&1u32.to_le_bytes(), &bytes[204..208]);
    }

    #[test]
    fn draw_block_encodes_selector() {
        let mut sphere = Primitive::sphere();
        sphere.set_selector(TextureSelector::NormalDebug);
        let block = DrawBlock::from(&sphere.draw_call());
        assert_eq!(-3, block.selector);
    }

    #[test]
    fn global_rotation_sits_between_view_and_model() {
        let frame = FrameUniforms {
            view: Matrix4::translation(Vector3::new(0.0, 0.0, -5.0)),
            global_rotation: Matrix4::rotation(90.0, Vector3::up()),
            ..FrameUniforms::default()
        };
        let p = frame.view_projection().transform_point(Vector3::new(1.0, 0.0, 0.0));
        assert!(p.near(Vector3::new(0.0, 0.0, -6.0), 1e-5), "{:?}", p);
    }
}
