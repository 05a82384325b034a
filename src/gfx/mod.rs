use crate::math::{Vector2, Vector3};

mod bitmap;
mod mesh;
mod primitive;
mod shading;
mod texture;
mod uniforms;

pub use bitmap::*;
pub use mesh::*;
pub use primitive::*;
pub use shading::*;
pub use texture::*;
pub use uniforms::*;

#[repr(C)]
#[derive(Copy, Clone, Default, Debug)]
pub struct Vertex {
    pub position: Vector3,
    pub uv: Vector2,
    pub normal: Vector3,
}

unsafe impl bytemuck::Zeroable for Vertex {}

unsafe impl bytemuck::Pod for Vertex {}

impl Vertex {
    #[inline]
    pub const fn new(position: Vector3, uv: Vector2, normal: Vector3) -> Vertex {
        Vertex {
            position,
            uv,
            normal,
        }
    }
}

/// Whatever turns draw calls into pixels.
///
/// A frame is always `begin_frame`, any number of `draw`s, then `end_frame`. Implementations
/// must not hold on to state from a previous frame: everything they need arrives again.
pub trait Rasterizer {
    fn begin_frame(&mut self, frame: &FrameUniforms, textures: &TextureSlots);

    fn draw(&mut self, call: &DrawCall);

    fn end_frame(&mut self) -> Result<(), crate::util::BoxedError>;
}
