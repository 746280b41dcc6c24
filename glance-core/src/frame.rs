/// Pushes the camera and the scene's meshes through a backend
use tracing::trace;

use crate::backend::RenderBackend;
use crate::camera::Camera;
use crate::error::{Error, Result};
use crate::scene::{Mesh, Scene, Vertex};

/// Re-derive the camera frame and hand viewport, view and projection to the backend.
pub fn apply_camera<B: RenderBackend + ?Sized>(camera: &mut Camera, backend: &mut B) {
    backend.set_viewport(camera.image_width, camera.image_height);

    let view = camera.view_parameters();
    backend.set_view(view.eye, view.target, view.up);
    backend.set_projection(&camera.frustum());
}

/// Clear the frame and emit every mesh.
///
/// Presentation is left to the caller.
pub fn render_scene<B: RenderBackend + ?Sized>(scene: &Scene, backend: &mut B) -> Result<()> {
    backend.clear_frame(scene.background());

    for (index, mesh) in scene.meshes.iter().enumerate() {
        render_mesh(scene, index, mesh, backend)?;
    }

    Ok(())
}

fn render_mesh<B: RenderBackend + ?Sized>(
    scene: &Scene,
    index: usize,
    mesh: &Mesh,
    backend: &mut B,
) -> Result<()> {
    let material = scene.materials.get(mesh.material).ok_or(Error::MaterialIndex {
        mesh: index,
        index: mesh.material,
        len: scene.materials.len(),
    })?;
    let chain = scene.transforms.chain(&mesh.transformations)?;

    let vertex = |i: usize| {
        scene.vertices.get(i).ok_or(Error::VertexIndex {
            mesh: index,
            index: i,
            len: scene.vertices.len(),
        })
    };
    // Every face resolves before the backend sees any of this mesh
    let triangles = mesh
        .faces
        .iter()
        .map(|face| -> Result<[&Vertex; 3]> {
            let [a, b, c] = face.indices();
            Ok([vertex(a)?, vertex(b)?, vertex(c)?])
        })
        .collect::<Result<Vec<_>>>()?;

    backend.set_polygon_mode(mesh.mode);
    backend.set_material(material);

    backend.push_transform();
    for op in &chain {
        op.apply(backend);
    }
    for triangle in triangles {
        backend.emit_triangle(triangle);
    }
    backend.pop_transform();

    trace!(mesh = index, faces = mesh.faces.len(), ops = chain.len(), "mesh emitted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Face, Material, MeshMode};
    use crate::testing::{Call, RecordingBackend};
    use crate::transform::TransformRef;
    use crate::vector::Vector3;

    #[test]
    fn test_apply_camera_calls() {
        let mut scene = Scene::demo();
        let mut backend = RecordingBackend::new();
        apply_camera(&mut scene.camera, &mut backend);

        assert_eq!(backend.calls.len(), 3);
        assert_eq!(backend.calls[0], Call::Viewport(800, 600));
        match backend.calls[1] {
            Call::View { eye, target, up } => {
                assert_eq!(eye, scene.camera.position);
                assert_eq!(target, scene.camera.position + scene.camera.gaze);
                assert_eq!(up, scene.camera.up);
            }
            ref other => panic!("expected view, got {other:?}"),
        }
        assert_eq!(backend.calls[2], Call::Projection(scene.camera.frustum()));
    }

    #[test]
    fn test_render_scene_structure() {
        let scene = Scene::demo();
        let mut backend = RecordingBackend::new();
        render_scene(&scene, &mut backend).unwrap();

        assert_eq!(backend.calls[0], Call::Clear(scene.background()));

        let triangles = backend
            .calls
            .iter()
            .filter(|call| matches!(call, Call::Triangle(_)))
            .count();
        let expected: usize = scene.meshes.iter().map(|m| m.faces.len()).sum();
        assert_eq!(triangles, expected);

        let pushes = backend.calls.iter().filter(|c| **c == Call::Push).count();
        let pops = backend.calls.iter().filter(|c| **c == Call::Pop).count();
        assert_eq!(pushes, scene.meshes.len());
        assert_eq!(pops, scene.meshes.len());
    }

    #[test]
    fn test_render_mesh_sets_mode_and_material_before_geometry() {
        let mut scene = Scene::demo();
        scene.meshes.truncate(2);
        scene.meshes.remove(0);
        let mut backend = RecordingBackend::new();
        render_scene(&scene, &mut backend).unwrap();

        assert_eq!(backend.calls[1], Call::PolygonMode(MeshMode::Wireframe));
        assert_eq!(backend.calls[2], Call::Material(scene.materials[0]));
        assert_eq!(backend.calls[3], Call::Push);
        assert_eq!(backend.calls.last(), Some(&Call::Pop));
    }

    #[test]
    fn test_bad_vertex_emits_nothing_for_the_mesh() {
        let mut scene = Scene::demo();
        scene.meshes = vec![Mesh {
            material: 0,
            transformations: vec![TransformRef::translation(0)],
            mode: MeshMode::Solid,
            faces: vec![Face::new(0, 1, 2), Face::new(0, 1, 10_000)],
        }];
        scene.materials = vec![Material {
            ambient: Vector3::ZERO,
            diffuse: Vector3::ZERO,
            specular: Vector3::ZERO,
            phong_exponent: 1.0,
        }];

        let mut backend = RecordingBackend::new();
        let err = render_scene(&scene, &mut backend).unwrap_err();
        assert!(matches!(err, Error::VertexIndex { index: 10_000, .. }));
        assert_eq!(backend.calls, vec![Call::Clear(scene.background())]);
    }
}
