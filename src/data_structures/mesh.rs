//! Static mesh descriptions.
//!
//! A [`MeshData`] is the CPU side of a mesh: separate position, normal and UV
//! streams plus 16-bit triangle indices. The GPU copies live in
//! [`crate::resources::mesh::Buffers`].

use std::f32::consts::TAU;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// xyz triples.
    pub position: Vec<f32>,
    /// xyz triples, one per vertex.
    pub normal: Vec<f32>,
    /// uv pairs, one per vertex.
    pub uv: Vec<f32>,
    /// Triangle list.
    pub index: Vec<u16>,
}

impl MeshData {
    pub fn vertex_count(&self) -> usize {
        self.position.len() / 3
    }

    pub fn index_count(&self) -> u32 {
        self.index.len() as u32
    }

    /// Looks up one of the meshes compiled into the viewer.
    pub fn builtin(name: &str) -> Option<MeshData> {
        match name {
            "cube" => Some(MeshData::cube()),
            "barrel" => Some(MeshData::barrel()),
            _ => None,
        }
    }

    /// Axis aligned cube spanning -1..1 with four vertices per face so every
    /// face gets its own normal and a full 0..1 UV square.
    pub fn cube() -> MeshData {
        #[rustfmt::skip]
        const POSITION: [f32; 72] = [
            // front
            -1.0, -1.0,  1.0,   1.0, -1.0,  1.0,   1.0,  1.0,  1.0,  -1.0,  1.0,  1.0,
            // back
            -1.0, -1.0, -1.0,  -1.0,  1.0, -1.0,   1.0,  1.0, -1.0,   1.0, -1.0, -1.0,
            // top
            -1.0,  1.0, -1.0,  -1.0,  1.0,  1.0,   1.0,  1.0,  1.0,   1.0,  1.0, -1.0,
            // bottom
            -1.0, -1.0, -1.0,   1.0, -1.0, -1.0,   1.0, -1.0,  1.0,  -1.0, -1.0,  1.0,
            // right
             1.0, -1.0, -1.0,   1.0,  1.0, -1.0,   1.0,  1.0,  1.0,   1.0, -1.0,  1.0,
            // left
            -1.0, -1.0, -1.0,  -1.0, -1.0,  1.0,  -1.0,  1.0,  1.0,  -1.0,  1.0, -1.0,
        ];
        const FACE_NORMALS: [[f32; 3]; 6] = [
            [0.0, 0.0, 1.0],
            [0.0, 0.0, -1.0],
            [0.0, 1.0, 0.0],
            [0.0, -1.0, 0.0],
            [1.0, 0.0, 0.0],
            [-1.0, 0.0, 0.0],
        ];
        const FACE_UV: [f32; 8] = [0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.0, 1.0];

        let normal = FACE_NORMALS
            .iter()
            .flat_map(|n| n.iter().copied().cycle().take(12))
            .collect();
        let uv = FACE_UV.iter().copied().cycle().take(FACE_UV.len() * 6).collect();
        let index = (0..6u16)
            .flat_map(|face| {
                let base = face * 4;
                [base, base + 1, base + 2, base, base + 2, base + 3]
            })
            .collect();

        MeshData {
            position: POSITION.to_vec(),
            normal,
            uv,
            index,
        }
    }

    /// Capped cylinder of radius 1 spanning -1..1 on the Y axis.
    pub fn barrel() -> MeshData {
        const SEGMENTS: u16 = 16;
        let mut mesh = MeshData::default();
        let ring = |i: u16| {
            let angle = TAU * i as f32 / SEGMENTS as f32;
            (angle.cos(), angle.sin())
        };

        // Side: a bottom/top vertex pair per ring step, the seam is duplicated
        // so the texture wraps exactly once.
        for i in 0..=SEGMENTS {
            let (x, z) = ring(i);
            let u = i as f32 / SEGMENTS as f32;
            mesh.push_vertex([x, -1.0, z], [x, 0.0, z], [u, 1.0]);
            mesh.push_vertex([x, 1.0, z], [x, 0.0, z], [u, 0.0]);
        }
        for i in 0..SEGMENTS {
            let bottom = i * 2;
            let top = bottom + 1;
            let next_bottom = bottom + 2;
            let next_top = bottom + 3;
            mesh.index
                .extend_from_slice(&[bottom, top, next_top, bottom, next_top, next_bottom]);
        }

        mesh.push_cap(1.0, SEGMENTS, ring);
        mesh.push_cap(-1.0, SEGMENTS, ring);
        mesh
    }

    fn push_vertex(&mut self, position: [f32; 3], normal: [f32; 3], uv: [f32; 2]) -> u16 {
        let index = self.vertex_count() as u16;
        self.position.extend_from_slice(&position);
        self.normal.extend_from_slice(&normal);
        self.uv.extend_from_slice(&uv);
        index
    }

    /// Triangle fan at height `y`, wound counter-clockwise when seen from
    /// outside the barrel.
    fn push_cap(&mut self, y: f32, segments: u16, ring: impl Fn(u16) -> (f32, f32)) {
        let normal = [0.0, y.signum(), 0.0];
        let centre = self.push_vertex([0.0, y, 0.0], normal, [0.5, 0.5]);
        let first = centre + 1;
        for i in 0..=segments {
            let (x, z) = ring(i);
            self.push_vertex([x, y, z], normal, [0.5 + x * 0.5, 0.5 + z * 0.5]);
        }
        for i in 0..segments {
            let (a, b) = (first + i, first + i + 1);
            if y > 0.0 {
                self.index.extend_from_slice(&[centre, b, a]);
            } else {
                self.index.extend_from_slice(&[centre, a, b]);
            }
        }
    }
}
