use crate::{
    gfx::{DrawPath, Shape, Vertex},
    math::{Vector2, Vector3},
};
use std::f32::consts::PI;

// Each face of the unit cube [0, 1]^3: the outward normal and its corners, counter-clockwise
// when seen from outside.
const CUBE_FACES: [(Vector3, [Vector3; 4]); 6] = [
    (
        Vector3::new(0.0, 0.0, 1.0),
        [
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
        ],
    ),
    (
        Vector3::new(0.0, 0.0, -1.0),
        [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
        ],
    ),
    (
        Vector3::new(1.0, 0.0, 0.0),
        [
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(1.0, 1.0, 1.0),
        ],
    ),
    (
        Vector3::new(-1.0, 0.0, 0.0),
        [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(0.0, 0.0, 1.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
    ),
    (
        Vector3::new(0.0, 1.0, 0.0),
        [
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 1.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        ],
    ),
    (
        Vector3::new(0.0, -1.0, 0.0),
        [
            Vector3::new(0.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 0.0, 1.0),
            Vector3::new(0.0, 0.0, 1.0),
        ],
    ),
];

const FACE_UVS: [Vector2; 4] = [
    Vector2::new(0.0, 0.0),
    Vector2::new(1.0, 0.0),
    Vector2::new(1.0, 1.0),
    Vector2::new(0.0, 1.0),
];

/// Indexed triangle list.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    vertices: Vec<Vertex>,
    indices: Vec<u32>,
}

impl Mesh {
    #[inline]
    pub fn vertices(&self) -> &[Vertex] {
        &self.vertices
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// The unit cube spanning `[0, 1]` on every axis, with flat per-face normals and a full
    /// `[0, 1]` texture on every face.
    pub fn cube() -> Mesh {
        let mut mesh = Mesh::default();
        for (normal, corners) in CUBE_FACES.iter() {
            let base = mesh.vertices.len() as u32;
            for (corner, uv) in corners.iter().zip(FACE_UVS.iter()) {
                mesh.vertices.push(Vertex::new(*corner, *uv, *normal));
            }
            mesh.indices
                .extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
        }
        mesh
    }

    /// A unit sphere centred on the origin, subdivided into `stacks` bands of latitude (pole
    /// to pole along y) and `slices` bands of longitude.
    ///
    /// Normals are the positions themselves. `u` runs around the equator, `v` from the south
    /// pole (0) to the north pole (1).
    pub fn sphere(stacks: u32, slices: u32) -> Mesh {
        let stacks = stacks.max(2);
        let slices = slices.max(3);
        let mut mesh = Mesh::default();

        for stack in 0..=stacks {
            let theta = PI * stack as f32 / stacks as f32;
            let (sin_theta, cos_theta) = theta.sin_cos();
            for slice in 0..=slices {
                let phi = 2.0 * PI * slice as f32 / slices as f32;
                let (sin_phi, cos_phi) = phi.sin_cos();
                let position = Vector3::new(sin_theta * cos_phi, cos_theta, sin_theta * sin_phi);
                let uv = Vector2::new(
                    slice as f32 / slices as f32,
                    1.0 - stack as f32 / stacks as f32,
                );
                mesh.vertices.push(Vertex::new(position, uv, position));
            }
        }

        let row = slices + 1;
        for stack in 0..stacks {
            for slice in 0..slices {
                let a = stack * row + slice;
                let b = a + row;
                mesh.indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }
        mesh
    }

    /// Strip the lighting-sensitive attributes for the fast draw path: every normal becomes
    /// `+y` and every uv `(0, 0)`. Only meant for up-facing or unlit surfaces.
    pub fn to_fast(&self) -> Mesh {
        Mesh {
            vertices: self
                .vertices
                .iter()
                .map(|vertex| Vertex::new(vertex.position, Vector2::default(), Vector3::up()))
                .collect(),
            indices: self.indices.clone(),
        }
    }
}

/// One mesh for every shape and draw path, built once at startup.
#[derive(Debug, Clone)]
pub struct MeshSet {
    cube: Mesh,
    sphere: Mesh,
    fast_cube: Mesh,
    fast_sphere: Mesh,
}

impl MeshSet {
    pub fn new(sphere_stacks: u32, sphere_slices: u32) -> MeshSet {
        let cube = Mesh::cube();
        let sphere = Mesh::sphere(sphere_stacks, sphere_slices);
        MeshSet {
            fast_cube: cube.to_fast(),
            fast_sphere: sphere.to_fast(),
            cube,
            sphere,
        }
    }

    #[inline]
    pub fn get(&self, shape: Shape, path: DrawPath) -> &Mesh {
        match (shape, path) {
            (Shape::Cube, DrawPath::Full) => &self.cube,
            (Shape::Cube, DrawPath::Fast) => &self.fast_cube,
            (Shape::Sphere, DrawPath::Full) => &self.sphere,
            (Shape::Sphere, DrawPath::Fast) => &self.fast_sphere,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (Shape, DrawPath, &Mesh)> {
        static KEYS: [(Shape, DrawPath); 4] = [
            (Shape::Cube, DrawPath::Full),
            (Shape::Cube, DrawPath::Fast),
            (Shape::Sphere, DrawPath::Full),
            (Shape::Sphere, DrawPath::Fast),
        ];
        KEYS.iter()
            .map(move |&(shape, path)| (shape, path, self.get(shape, path)))
    }
}
