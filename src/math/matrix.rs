use crate::math::{Vector3, Vector4};

use std::ops::{Index, IndexMut, Mul};

/// A column-major 4x4 homogeneous transform.
///
/// `self.0[c]` is column `c`, so the translation lives in `self.0[3]`. This is the layout
/// shaders expect, and it can be uploaded with [`Matrix4::to_bytes`] as-is.
///
/// The chained mutators ([`translate`](Matrix4::translate), [`scale`](Matrix4::scale),
/// [`rotate`](Matrix4::rotate), [`multiply`](Matrix4::multiply)) *post-multiply*: each call
/// is applied to geometry before everything that was already in the matrix. So
/// `m.translate(t).scale(s)` scales in local space first and then moves.
#[repr(C)]
#[derive(Copy, Clone, Default, Debug)]
pub struct Matrix4(pub [Vector4; 4]);

unsafe impl bytemuck::Zeroable for Matrix4 {}
unsafe impl bytemuck::Pod for Matrix4 {}

impl Matrix4 {
    #[inline]
    pub const fn new(x: Vector4, y: Vector4, z: Vector4, w: Vector4) -> Matrix4 {
        Matrix4([x, y, z, w])
    }

    #[inline]
    pub const fn identity() -> Matrix4 {
        Matrix4([
            Vector4([1.0, 0.0, 0.0, 0.0]),
            Vector4([0.0, 1.0, 0.0, 0.0]),
            Vector4([0.0, 0.0, 1.0, 0.0]),
            Vector4([0.0, 0.0, 0.0, 1.0]),
        ])
    }

    #[inline]
    pub fn translation(v: Vector3) -> Matrix4 {
        Matrix4([
            Vector4([1.0, 0.0, 0.0, 0.0]),
            Vector4([0.0, 1.0, 0.0, 0.0]),
            Vector4([0.0, 0.0, 1.0, 0.0]),
            Vector4([v.0[0], v.0[1], v.0[2], 1.0]),
        ])
    }

    #[inline]
    pub fn scaling(v: Vector3) -> Matrix4 {
        Matrix4([
            Vector4([v.0[0], 0.0, 0.0, 0.0]),
            Vector4([0.0, v.0[1], 0.0, 0.0]),
            Vector4([0.0, 0.0, v.0[2], 0.0]),
            Vector4([0.0, 0.0, 0.0, 1.0]),
        ])
    }

    /// Right-handed rotation of `degrees` about `axis`.
    ///
    /// The axis is normalized here. A zero axis describes no rotation at all and gives the
    /// identity.
    #[rustfmt::skip]
    pub fn rotation(degrees: f32, axis: Vector3) -> Matrix4 {
        if axis.squared_normal() == 0.0 {
            return Matrix4::identity();
        }
        let Vector3([x, y, z]) = axis.normalized();
        let (s, c) = degrees.to_radians().sin_cos();
        let t = 1.0 - c;
        Matrix4([
            Vector4([t * x * x + c, t * x * y + s * z, t * x * z - s * y, 0.0]),
            Vector4([t * x * y - s * z, t * y * y + c, t * y * z + s * x, 0.0]),
            Vector4([t * x * z + s * y, t * y * z - s * x, t * z * z + c, 0.0]),
            Vector4([0.0, 0.0, 0.0, 1.0]),
        ])
    }

    /// OpenGL-style perspective projection (clip-space z in `-w..w`). `fov` is the vertical
    /// field of view in radians.
    #[inline]
    pub fn perspective(fov: f32, aspect_ratio: f32, near: f32, far: f32) -> Matrix4 {
        let depth = near - far;
        let tan_fov = (fov / 2.0).tan();
        Matrix4([
            Vector4([1.0 / (tan_fov * aspect_ratio), 0.0, 0.0, 0.0]),
            Vector4([0.0, 1.0 / tan_fov, 0.0, 0.0]),
            Vector4([0.0, 0.0, (near + far) / depth, -1.0]),
            Vector4([0.0, 0.0, (2.0 * far * near) / depth, 0.0]),
        ])
    }

    /// Remaps OpenGL clip-space depth (`-w..w`) to the `0..w` range wgpu expects.
    #[inline]
    pub const fn wgpu_depth_correction() -> Matrix4 {
        Matrix4([
            Vector4([1.0, 0.0, 0.0, 0.0]),
            Vector4([0.0, 1.0, 0.0, 0.0]),
            Vector4([0.0, 0.0, 0.5, 0.0]),
            Vector4([0.0, 0.0, 0.5, 1.0]),
        ])
    }

    #[inline]
    pub fn look_at(position: Vector3, at: Vector3, up: Vector3) -> Matrix4 {
        let z = (at - position).normalized();
        let x = z.cross(up).normalized();
        let y = x.cross(z);
        let z = -z;
        Matrix4([
            Vector4([x.0[0], y.0[0], z.0[0], 0.0]),
            Vector4([x.0[1], y.0[1], z.0[1], 0.0]),
            Vector4([x.0[2], y.0[2], z.0[2], 0.0]),
            Vector4([-x.dot(position), -y.dot(position), -z.dot(position), 1.0]),
        ])
    }

    /// Post-multiply by a translation.
    #[inline]
    pub fn translate(&mut self, x: f32, y: f32, z: f32) -> &mut Matrix4 {
        self.multiply(&Matrix4::translation(Vector3([x, y, z])))
    }

    /// Post-multiply by a (possibly non-uniform or negative) scale.
    #[inline]
    pub fn scale(&mut self, x: f32, y: f32, z: f32) -> &mut Matrix4 {
        self.multiply(&Matrix4::scaling(Vector3([x, y, z])))
    }

    /// Post-multiply by a rotation of `degrees` about the axis `(x, y, z)`.
    #[inline]
    pub fn rotate(&mut self, degrees: f32, x: f32, y: f32, z: f32) -> &mut Matrix4 {
        self.multiply(&Matrix4::rotation(degrees, Vector3([x, y, z])))
    }

    /// `self = self * rhs`
    #[inline]
    pub fn multiply(&mut self, rhs: &Matrix4) -> &mut Matrix4 {
        *self = &*self * rhs;
        self
    }

    #[inline]
    #[rustfmt::skip]
    pub fn transposed(&self) -> Matrix4 {
        Matrix4([
            Vector4([self.0[0].0[0], self.0[1].0[0], self.0[2].0[0], self.0[3].0[0]]),
            Vector4([self.0[0].0[1], self.0[1].0[1], self.0[2].0[1], self.0[3].0[1]]),
            Vector4([self.0[0].0[2], self.0[1].0[2], self.0[2].0[2], self.0[3].0[2]]),
            Vector4([self.0[0].0[3], self.0[1].0[3], self.0[2].0[3], self.0[3].0[3]]),
        ])
    }

    /// The inverse, or `None` when the matrix is singular (e.g. a zero scale on some axis).
    #[rustfmt::skip]
    pub fn inverted(&self) -> Option<Matrix4> {
        let m = self.to_array();
        let mut inv = [0.0f32; 16];

        inv[0] = m[5] * m[10] * m[15] - m[5] * m[11] * m[14] - m[9] * m[6] * m[15] + m[9] * m[7] * m[14] + m[13] * m[6] * m[11] - m[13] * m[7] * m[10];
        inv[4] = -m[4] * m[10] * m[15] + m[4] * m[11] * m[14] + m[8] * m[6] * m[15] - m[8] * m[7] * m[14] - m[12] * m[6] * m[11] + m[12] * m[7] * m[10];
        inv[8] = m[4] * m[9] * m[15] - m[4] * m[11] * m[13] - m[8] * m[5] * m[15] + m[8] * m[7] * m[13] + m[12] * m[5] * m[11] - m[12] * m[7] * m[9];
        inv[12] = -m[4] * m[9] * m[14] + m[4] * m[10] * m[13] + m[8] * m[5] * m[14] - m[8] * m[6] * m[13] - m[12] * m[5] * m[10] + m[12] * m[6] * m[9];
        inv[1] = -m[1] * m[10] * m[15] + m[1] * m[11] * m[14] + m[9] * m[2] * m[15] - m[9] * m[3] * m[14] - m[13] * m[2] * m[11] + m[13] * m[3] * m[10];
        inv[5] = m[0] * m[10] * m[15] - m[0] * m[11] * m[14] - m[8] * m[2] * m[15] + m[8] * m[3] * m[14] + m[12] * m[2] * m[11] - m[12] * m[3] * m[10];
        inv[9] = -m[0] * m[9] * m[15] + m[0] * m[11] * m[13] + m[8] * m[1] * m[15] - m[8] * m[3] * m[13] - m[12] * m[1] * m[11] + m[12] * m[3] * m[9];
        inv[13] = m[0] * m[9] * m[14] - m[0] * m[10] * m[13] - m[8] * m[1] * m[14] + m[8] * m[2] * m[13] + m[12] * m[1] * m[10] - m[12] * m[2] * m[9];
        inv[2] = m[1] * m[6] * m[15] - m[1] * m[7] * m[14] - m[5] * m[2] * m[15] + m[5] * m[3] * m[14] + m[13] * m[2] * m[7] - m[13] * m[3] * m[6];
        inv[6] = -m[0] * m[6] * m[15] + m[0] * m[7] * m[14] + m[4] * m[2] * m[15] - m[4] * m[3] * m[14] - m[12] * m[2] * m[7] + m[12] * m[3] * m[6];
        inv[10] = m[0] * m[5] * m[15] - m[0] * m[7] * m[13] - m[4] * m[1] * m[15] + m[4] * m[3] * m[13] + m[12] * m[1] * m[7] - m[12] * m[3] * m[5];
        inv[14] = -m[0] * m[5] * m[14] + m[0] * m[6] * m[13] + m[4] * m[1] * m[14] - m[4] * m[2] * m[13] - m[12] * m[1] * m[6] + m[12] * m[2] * m[5];
        inv[3] = -m[1] * m[6] * m[11] + m[1] * m[7] * m[10] + m[5] * m[2] * m[11] - m[5] * m[3] * m[10] - m[9] * m[2] * m[7] + m[9] * m[3] * m[6];
        inv[7] = m[0] * m[6] * m[11] - m[0] * m[7] * m[10] - m[4] * m[2] * m[11] + m[4] * m[3] * m[10] + m[8] * m[2] * m[7] - m[8] * m[3] * m[6];
        inv[11] = -m[0] * m[5] * m[11] + m[0] * m[7] * m[9] + m[4] * m[1] * m[11] - m[4] * m[3] * m[9] - m[8] * m[1] * m[7] + m[8] * m[3] * m[5];
        inv[15] = m[0] * m[5] * m[10] - m[0] * m[6] * m[9] - m[4] * m[1] * m[10] + m[4] * m[2] * m[9] + m[8] * m[1] * m[6] - m[8] * m[2] * m[5];

        let det = m[0] * inv[0] + m[1] * inv[4] + m[2] * inv[8] + m[3] * inv[12];
        if det == 0.0 || !det.is_finite() {
            return None;
        }
        let inv_det = 1.0 / det;
        for value in inv.iter_mut() {
            *value *= inv_det;
        }
        Some(Matrix4::from_array(inv))
    }

    /// The inverse-transpose, used to carry surface normals through a transform that has a
    /// non-uniform scale. Singular transforms have no meaningful normal transform, so they
    /// yield the identity.
    #[inline]
    pub fn normal_matrix(&self) -> Matrix4 {
        self.inverted()
            .map(|inverse| inverse.transposed())
            .unwrap_or_else(Matrix4::identity)
    }

    /// Transform a point (`w = 1`).
    #[inline]
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        (self * p.widened(1.0)).narrowed()
    }

    /// Transform a direction (`w = 0`), ignoring translation.
    #[inline]
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        (self * v.widened(0.0)).narrowed()
    }

    #[inline]
    pub fn to_array(&self) -> [f32; 16] {
        let mut array = [0.0; 16];
        for (column, chunk) in self.0.iter().zip(array.chunks_exact_mut(4)) {
            chunk.copy_from_slice(&column.0);
        }
        array
    }

    #[inline]
    pub fn from_array(array: [f32; 16]) -> Matrix4 {
        let mut matrix = Matrix4::default();
        for (column, chunk) in matrix.0.iter_mut().zip(array.chunks_exact(4)) {
            column.0.copy_from_slice(chunk);
        }
        matrix
    }

    /// Approximate equality with an explicit tolerance.
    #[inline]
    pub fn near(&self, rhs: &Matrix4, epsilon: f32) -> bool {
        self.0
            .iter()
            .zip(rhs.0.iter())
            .all(|(a, b)| a.near(*b, epsilon))
    }

    #[inline]
    pub fn to_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }
}

impl PartialEq for Matrix4 {
    #[inline]
    fn eq(&self, rhs: &Matrix4) -> bool {
        self.0 == rhs.0
    }
}

impl Index<usize> for Matrix4 {
    type Output = Vector4;
    #[inline]
    fn index(&self, index: usize) -> &Vector4 {
        &self.0[index]
    }
}

impl IndexMut<usize> for Matrix4 {
    #[inline]
    fn index_mut(&mut self, index: usize) -> &mut Vector4 {
        &mut self.0[index]
    }
}

impl Mul<&Matrix4> for &Matrix4 {
    type Output = Matrix4;

    /// The usual matrix product: `(a * b) * p == a * (b * p)`.
    fn mul(self, rhs: &Matrix4) -> Matrix4 {
        let mut ret = Matrix4::default();
        for column in 0..4 {
            for row in 0..4 {
                ret[column][row] = (0..4).map(|k| self[k][row] * rhs[column][k]).sum::<f32>();
            }
        }
        ret
    }
}

impl Mul<Matrix4> for Matrix4 {
    type Output = Matrix4;
    #[inline]
    fn mul(self, rhs: Matrix4) -> Matrix4 {
        &self * &rhs
    }
}

impl Mul<Vector4> for &Matrix4 {
    type Output = Vector4;
    fn mul(self, rhs: Vector4) -> Vector4 {
        let mut ret = Vector4::default();
        for row in 0..4 {
            ret[row] = (0..4).map(|column| self[column][row] * rhs[column]).sum::<f32>();
        }
        ret
    }
}

#[cfg(test)]
mod test {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn chained_calls_apply_in_reverse() {
        // translate then scale: the point is scaled in local space first, then moved.
        let mut m = Matrix4::identity();
        m.translate(1.0, 2.0, 3.0).scale(2.0, 2.0, 2.0);
        let p = m.transform_point(Vector3::new(1.0, 1.0, 1.0));
        assert!(p.near(Vector3::new(3.0, 4.0, 5.0), EPSILON), "{:?}", p);

        // and the other way around scales the translation too.
        let mut m = Matrix4::identity();
        m.scale(2.0, 2.0, 2.0).translate(1.0, 2.0, 3.0);
        let p = m.transform_point(Vector3::new(1.0, 1.0, 1.0));
        assert!(p.near(Vector3::new(4.0, 6.0, 8.0), EPSILON), "{:?}", p);
    }

    #[test]
    fn composition_matches_nested_application() {
        let mut t1 = Matrix4::identity();
        t1.rotate(30.0, 0.0, 1.0, 0.0).translate(0.5, -1.0, 2.0);
        let mut t2 = Matrix4::identity();
        t2.scale(0.5, 2.0, -1.0).rotate(-75.0, 1.0, 1.0, 0.0);

        let p = Vector3::new(0.3, -0.7, 1.9);
        let composed = (&t1 * &t2).transform_point(p);
        let nested = t1.transform_point(t2.transform_point(p));
        assert!(composed.near(nested, EPSILON));

        let mut chained = t1;
        chained.multiply(&t2);
        assert!(chained.near(&(&t1 * &t2), EPSILON));
    }

    #[test]
    fn rotates_right_handed_in_degrees() {
        let m = Matrix4::rotation(90.0, Vector3::new(0.0, 0.0, 1.0));
        let p = m.transform_point(Vector3::right());
        assert!(p.near(Vector3::up(), EPSILON), "{:?}", p);

        // The axis is normalized internally.
        let scaled_axis = Matrix4::rotation(90.0, Vector3::new(0.0, 0.0, 7.0));
        assert!(scaled_axis.near(&m, EPSILON));

        assert!(Matrix4::rotation(45.0, Vector3::splat(0.0)).near(&Matrix4::identity(), 0.0));
    }

    #[test]
    fn inverse_round_trips() {
        let mut m = Matrix4::identity();
        m.translate(1.0, -2.0, 0.5)
            .rotate(33.0, 1.0, 2.0, 3.0)
            .scale(0.5, 0.6, 0.75);
        let inverse = m.inverted().unwrap();
        assert!((&m * &inverse).near(&Matrix4::identity(), EPSILON));
        assert!((&inverse * &m).near(&Matrix4::identity(), EPSILON));
    }

    #[test]
    fn singular_matrices_have_no_inverse() {
        let mut floor = Matrix4::identity();
        floor.translate(-5.0, -0.75, -5.0).scale(10.0, 0.0, 10.0);
        assert!(floor.inverted().is_none());
        assert!(floor.normal_matrix().near(&Matrix4::identity(), 0.0));
    }

    #[test]
    fn normal_matrix_keeps_normals_perpendicular() {
        let mut m = Matrix4::identity();
        m.translate(0.25, 0.5, 0.1)
            .rotate(225.0, 0.0, 0.0, 1.0)
            .scale(0.2, 0.5, 0.5);
        let normal_matrix = m.normal_matrix();

        // A slanted surface: two tangents and the normal between them.
        let t1 = Vector3::new(1.0, 1.0, 0.0);
        let t2 = Vector3::new(0.0, 1.0, 1.0);
        let n = t1.cross(t2);

        let n = normal_matrix.transform_vector(n);
        assert!(n.dot(m.transform_vector(t1)).abs() < EPSILON);
        assert!(n.dot(m.transform_vector(t2)).abs() < EPSILON);

        // Transforming the normal with the model matrix itself would not stay perpendicular.
        let wrong = m.transform_vector(t1.cross(t2));
        assert!(wrong.dot(m.transform_vector(t1)).abs() > 0.01);
    }

    #[test]
    fn transpose_swaps_rows_and_columns() {
        let m = Matrix4::translation(Vector3::new(1.0, 2.0, 3.0));
        let t = m.transposed();
        assert_eq!(Vector4::new(1.0, 0.0, 0.0, 1.0), t[0]);
        assert!(t.transposed().near(&m, 0.0));
    }

    #[test]
    fn look_at_maps_eye_to_origin() {
        let eye = Vector3::new(0.0, 0.0, 5.0);
        let view = Matrix4::look_at(eye, Vector3::splat(0.0), Vector3::up());
        assert!(view.transform_point(eye).near(Vector3::splat(0.0), EPSILON));
        // The target is straight down the -z axis in view space.
        let target = view.transform_point(Vector3::splat(0.0));
        assert!(target.near(Vector3::new(0.0, 0.0, -5.0), EPSILON), "{:?}", target);
    }

    #[test]
    fn perspective_maps_planes_to_clip_range() {
        let p = Matrix4::perspective(60f32.to_radians(), 1.0, 0.1, 1000.0);
        let near = &p * Vector4::new(0.0, 0.0, -0.1, 1.0);
        let far = &p * Vector4::new(0.0, 0.0, -1000.0, 1.0);
        assert!((near.z() / near.w() + 1.0).abs() < 1e-3);
        assert!((far.z() / far.w() - 1.0).abs() < 1e-3);

        let corrected = &Matrix4::wgpu_depth_correction() * &p;
        let near = &corrected * Vector4::new(0.0, 0.0, -0.1, 1.0);
        assert!((near.z() / near.w()).abs() < 1e-3);
    }
}
