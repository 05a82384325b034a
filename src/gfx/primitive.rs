use crate::{
    gfx::{Rasterizer, TextureSelector},
    math::{Matrix4, Vector4},
};

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum Shape {
    Cube,
    Sphere,
}

/// Which vertex stream a primitive is drawn with.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub enum DrawPath {
    /// Positions, uvs and real normals.
    Full,
    /// Positions only: normals are fixed to `+y` and uvs to zero. Looks the same as `Full`
    /// for up-facing, untextured surfaces.
    Fast,
}

impl Default for DrawPath {
    #[inline]
    fn default() -> DrawPath {
        DrawPath::Full
    }
}

/// Everything a rasterizer needs to draw one primitive.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DrawCall {
    pub shape: Shape,
    pub path: DrawPath,
    pub model: Matrix4,
    pub normal: Matrix4,
    pub color: Vector4,
    pub selector: TextureSelector,
}

/// A cube or sphere placed in the world, built fresh each frame.
#[derive(Copy, Clone, Debug)]
pub struct Primitive {
    shape: Shape,
    matrix: Matrix4,
    normal_matrix: Matrix4,
    color: Vector4,
    selector: TextureSelector,
    path: DrawPath,
}

impl Primitive {
    pub fn new(shape: Shape) -> Primitive {
        Primitive::with_parent(shape, &Matrix4::identity())
    }

    #[inline]
    pub fn cube() -> Primitive {
        Primitive::new(Shape::Cube)
    }

    #[inline]
    pub fn sphere() -> Primitive {
        Primitive::new(Shape::Sphere)
    }

    /// A primitive whose transform starts as a copy of `frame`.
    pub fn with_parent(shape: Shape, frame: &Matrix4) -> Primitive {
        Primitive {
            shape,
            matrix: *frame,
            normal_matrix: Matrix4::identity(),
            color: Vector4::new(1.0, 1.0, 1.0, 1.0),
            selector: TextureSelector::default(),
            path: DrawPath::default(),
        }
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// The local transform, for chaining `translate`/`rotate`/`scale` onto.
    #[inline]
    pub fn matrix_mut(&mut self) -> &mut Matrix4 {
        &mut self.matrix
    }

    #[inline]
    pub fn normal_matrix(&self) -> &Matrix4 {
        &self.normal_matrix
    }

    #[inline]
    pub fn color(&self) -> Vector4 {
        self.color
    }

    #[inline]
    pub fn set_color(&mut self, color: Vector4) -> &mut Primitive {
        self.color = color;
        self
    }

    #[inline]
    pub fn selector(&self) -> TextureSelector {
        self.selector
    }

    #[inline]
    pub fn set_selector(&mut self, selector: TextureSelector) -> &mut Primitive {
        self.selector = selector;
        self
    }

    #[inline]
    pub fn path(&self) -> DrawPath {
        self.path
    }

    #[inline]
    pub fn set_fast(&mut self, fast: bool) -> &mut Primitive {
        self.path = if fast { DrawPath::Fast } else { DrawPath::Full };
        self
    }

    /// Recompute the normal matrix from the current transform. Call it after the transform is
    /// final; a singular transform keeps the identity.
    pub fn derive_normal_matrix(&mut self) -> &mut Primitive {
        self.normal_matrix = self.matrix.normal_matrix();
        self
    }

    pub fn draw_call(&self) -> DrawCall {
        DrawCall {
            shape: self.shape,
            path: self.path,
            model: self.matrix,
            normal: self.normal_matrix,
            color: self.color,
            selector: self.selector,
        }
    }

    #[inline]
    pub fn render<R: Rasterizer + ?Sized>(&self, rasterizer: &mut R) {
        rasterizer.draw(&self.draw_call());
    }
}
