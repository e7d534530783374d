use approx::assert_relative_eq;
use arena_viewer::data_structures::mesh::MeshData;
use cgmath::{InnerSpace, Vector3};

fn check_streams(mesh: &MeshData) {
    let vertices = mesh.vertex_count();
    assert_eq!(mesh.position.len(), vertices * 3);
    assert_eq!(mesh.normal.len(), vertices * 3);
    assert_eq!(mesh.uv.len(), vertices * 2);
    assert_eq!(mesh.index.len() % 3, 0);
    assert_eq!(mesh.index_count() as usize, mesh.index.len());
    assert!(mesh.index.iter().all(|&i| (i as usize) < vertices));
    for n in mesh.normal.chunks_exact(3) {
        assert_relative_eq!(Vector3::new(n[0], n[1], n[2]).magnitude(), 1.0, epsilon = 1e-5);
    }
}

#[test]
fn cube_has_four_vertices_per_face() {
    let cube = MeshData::cube();
    check_streams(&cube);
    assert_eq!(cube.vertex_count(), 24);
    assert_eq!(cube.index_count(), 36);
}

#[test]
fn barrel_streams_are_consistent() {
    let barrel = MeshData::barrel();
    check_streams(&barrel);
    // 17 side pairs plus two caps of centre + 17 rim vertices.
    assert_eq!(barrel.vertex_count(), 17 * 2 + 2 * 18);
    assert_eq!(barrel.index_count(), 16 * 6 + 2 * 16 * 3);
}

#[test]
fn cube_triangles_face_outwards() {
    let cube = MeshData::cube();
    let p = |i: u16| {
        let i = i as usize * 3;
        Vector3::new(cube.position[i], cube.position[i + 1], cube.position[i + 2])
    };
    let n = |i: u16| {
        let i = i as usize * 3;
        Vector3::new(cube.normal[i], cube.normal[i + 1], cube.normal[i + 2])
    };
    for tri in cube.index.chunks_exact(3) {
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        let winding = (b - a).cross(c - a);
        assert!(winding.dot(n(tri[0])) > 0.0, "triangle {tri:?} is wound clockwise");
    }
}

#[test]
fn builtin_lookup() {
    assert_eq!(MeshData::builtin("cube"), Some(MeshData::cube()));
    assert!(MeshData::builtin("barrel").is_some());
    assert_eq!(MeshData::builtin("teapot"), None);
}
