/// Scene data model: vertices, faces, meshes, materials and the demo scene
use crate::camera::{Camera, NearPlane};
use crate::error::{Error, Result};
use crate::light::{LightSwitch, PointLight};
use crate::transform::{Rotation, TransformRef, TransformTables};
use crate::vector::Vector3;

/// Below this, up and gaze are treated as parallel
const DEGENERATE_FRAME_EPSILON: f32 = 1e-6;

/// A 3D vertex with position and normal
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Vector3,
    pub normal: Vector3,
}

impl Vertex {
    pub fn new(x: f32, y: f32, z: f32, nx: f32, ny: f32, nz: f32) -> Self {
        Self {
            position: Vector3::new(x, y, z),
            normal: Vector3::new(nx, ny, nz),
        }
    }
}

/// A triangle as three indices into the shared vertex table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Face {
    pub v0: usize,
    pub v1: usize,
    pub v2: usize,
}

impl Face {
    pub fn new(v0: usize, v1: usize, v2: usize) -> Self {
        Self { v0, v1, v2 }
    }

    pub fn indices(&self) -> [usize; 3] {
        [self.v0, self.v1, self.v2]
    }
}

/// How a mesh's polygons are drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeshMode {
    #[default]
    Solid,
    Wireframe,
}

/// Surface reflectance, shared between meshes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: Vector3,
    pub diffuse: Vector3,
    pub specular: Vector3,
    pub phong_exponent: f32,
}

/// A mesh: faces over the shared vertex table plus its transform chain
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub material: usize,
    pub transformations: Vec<TransformRef>,
    pub mode: MeshMode,
    pub faces: Vec<Face>,
}

/// The whole scene, built once by a loader and owned by the session
#[derive(Debug, Clone)]
pub struct Scene {
    pub background_color: [u8; 3],
    pub camera: Camera,
    pub lights: LightSwitch,
    pub materials: Vec<Material>,
    pub vertices: Vec<Vertex>,
    pub transforms: TransformTables,
    pub meshes: Vec<Mesh>,
}

impl Scene {
    /// Check that every index in the scene points at something and that the
    /// camera has a usable frame.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if camera.up.cross(&camera.gaze).norm() < DEGENERATE_FRAME_EPSILON {
            return Err(Error::DegenerateCamera {
                gaze: camera.gaze,
                up: camera.up,
            });
        }

        for (mesh_index, mesh) in self.meshes.iter().enumerate() {
            if mesh.material >= self.materials.len() {
                return Err(Error::MaterialIndex {
                    mesh: mesh_index,
                    index: mesh.material,
                    len: self.materials.len(),
                });
            }

            if let Some(index) = mesh
                .faces
                .iter()
                .flat_map(|face| face.indices())
                .find(|&index| index >= self.vertices.len())
            {
                return Err(Error::VertexIndex {
                    mesh: mesh_index,
                    index,
                    len: self.vertices.len(),
                });
            }

            for &reference in &mesh.transformations {
                self.transforms.resolve(reference)?;
            }
        }

        Ok(())
    }

    /// Background color with components scaled to `[0, 1]`.
    pub fn background(&self) -> Vector3 {
        let [r, g, b] = self.background_color;
        Vector3::new(r as f32, g as f32, b as f32) / 255.0
    }

    /// A small built-in scene: two cubes sharing one vertex block, a floor
    /// and three point lights.
    pub fn demo() -> Self {
        let mut vertices = Vec::new();
        let cube = push_cube(&mut vertices, 1.0);
        let floor = push_quad(&mut vertices);

        let camera = Camera::new(
            Vector3::new(0.0, 1.0, 6.0),
            Vector3::new(0.0, -0.15, -1.0),
            Vector3::Y,
            NearPlane::new(-0.5, 0.5, -0.375, 0.375),
            1.0,
            100.0,
            800,
            600,
        );

        let lights = LightSwitch::new(
            vec![
                PointLight::new(Vector3::new(4.0, 4.0, 4.0), Vector3::new(0.8, 0.8, 0.8)),
                PointLight::new(Vector3::new(-4.0, 2.0, 1.0), Vector3::new(0.7, 0.2, 0.2)),
                PointLight::new(Vector3::new(0.0, 3.0, -4.0), Vector3::new(0.2, 0.3, 0.8)),
            ],
            Vector3::new(0.15, 0.15, 0.15),
        );

        let materials = vec![
            Material {
                ambient: Vector3::new(0.6, 0.6, 0.6),
                diffuse: Vector3::new(0.9, 0.7, 0.3),
                specular: Vector3::new(0.8, 0.8, 0.8),
                phong_exponent: 32.0,
            },
            Material {
                ambient: Vector3::new(0.4, 0.4, 0.4),
                diffuse: Vector3::new(0.5, 0.5, 0.55),
                specular: Vector3::new(0.1, 0.1, 0.1),
                phong_exponent: 4.0,
            },
        ];

        let transforms = TransformTables {
            translations: vec![
                Vector3::new(-1.2, 0.0, 0.0),
                Vector3::new(1.2, 0.0, 0.0),
                Vector3::new(0.0, -0.5, 0.0),
            ],
            rotations: vec![
                Rotation::from([30.0, 0.0, 1.0, 0.0]),
                Rotation::from([45.0, 1.0, 1.0, 0.0]),
            ],
            scalings: vec![Vector3::new(1.0, 1.5, 1.0), Vector3::new(6.0, 1.0, 6.0)],
        };

        let meshes = vec![
            Mesh {
                material: 0,
                transformations: vec![
                    TransformRef::translation(0),
                    TransformRef::rotation(0),
                    TransformRef::scaling(0),
                ],
                mode: MeshMode::Solid,
                faces: cube.clone(),
            },
            Mesh {
                material: 0,
                transformations: vec![TransformRef::translation(1), TransformRef::rotation(1)],
                mode: MeshMode::Wireframe,
                faces: cube,
            },
            Mesh {
                material: 1,
                transformations: vec![TransformRef::translation(2), TransformRef::scaling(1)],
                mode: MeshMode::Solid,
                faces: floor,
            },
        ];

        Self {
            background_color: [20, 20, 30],
            camera,
            lights,
            materials,
            vertices,
            transforms,
            meshes,
        }
    }
}

/// Append an axis-aligned cube centred at the origin to `vertices`.
///
/// Each side gets its own four vertices so normals stay flat.
pub fn push_cube(vertices: &mut Vec<Vertex>, size: f32) -> Vec<Face> {
    let h = size / 2.0;
    let sides = [
        // Front
        (Vector3::Z, [(-h, -h, h), (h, -h, h), (h, h, h), (-h, h, h)]),
        // Back
        (-Vector3::Z, [(h, -h, -h), (-h, -h, -h), (-h, h, -h), (h, h, -h)]),
        // Top
        (Vector3::Y, [(-h, h, h), (h, h, h), (h, h, -h), (-h, h, -h)]),
        // Bottom
        (-Vector3::Y, [(-h, -h, -h), (h, -h, -h), (h, -h, h), (-h, -h, h)]),
        // Right
        (Vector3::X, [(h, -h, h), (h, -h, -h), (h, h, -h), (h, h, h)]),
        // Left
        (-Vector3::X, [(-h, -h, -h), (-h, -h, h), (-h, h, h), (-h, h, -h)]),
    ];

    let mut faces = Vec::with_capacity(12);
    for (normal, corners) in sides {
        let base = vertices.len();
        for (x, y, z) in corners {
            vertices.push(Vertex::new(x, y, z, normal.x, normal.y, normal.z));
        }
        faces.push(Face::new(base, base + 1, base + 2));
        faces.push(Face::new(base, base + 2, base + 3));
    }
    faces
}

/// Append a unit quad in the XZ plane facing +Y.
pub fn push_quad(vertices: &mut Vec<Vertex>) -> Vec<Face> {
    let base = vertices.len();
    for (x, z) in [(-0.5, 0.5), (0.5, 0.5), (0.5, -0.5), (-0.5, -0.5)] {
        vertices.push(Vertex::new(x, 0.0, z, 0.0, 1.0, 0.0));
    }
    vec![Face::new(base, base + 1, base + 2), Face::new(base, base + 2, base + 3)]
}
