//! Procedural meshes: the globe icosphere, the aircraft arrowhead, and the
//! octahedron used for point markers.

use std::collections::HashMap;

use glam::Vec3;

use crate::buffer::{BufferAllocator, MeshBuffer, VertexPositionColor};

/// CPU-side mesh ready for upload.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    pub vertices: Vec<VertexPositionColor>,
    pub indices: Vec<u32>,
}

impl MeshData {
    pub fn upload(&self, allocator: &BufferAllocator, label: &str) -> MeshBuffer {
        allocator.create_mesh(label, &self.vertices, &self.indices)
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Append a flat-colored triangle with its own vertices.
    fn push_triangle(&mut self, corners: [Vec3; 3], color: [f32; 4]) {
        let base = self.vertices.len() as u32;
        for p in corners {
            self.vertices.push(VertexPositionColor {
                position: p.to_array(),
                color,
            });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2]);
    }
}

/// Unit icosphere: positions on the unit sphere and triangle indices.
///
/// Subdivision 5 gives 20 480 triangles.
pub fn icosphere(subdivisions: u32) -> (Vec<Vec3>, Vec<u32>) {
    let t = (1.0 + 5.0_f32.sqrt()) / 2.0;

    let mut positions: Vec<Vec3> = [
        Vec3::new(-1.0, t, 0.0),
        Vec3::new(1.0, t, 0.0),
        Vec3::new(-1.0, -t, 0.0),
        Vec3::new(1.0, -t, 0.0),
        Vec3::new(0.0, -1.0, t),
        Vec3::new(0.0, 1.0, t),
        Vec3::new(0.0, -1.0, -t),
        Vec3::new(0.0, 1.0, -t),
        Vec3::new(t, 0.0, -1.0),
        Vec3::new(t, 0.0, 1.0),
        Vec3::new(-t, 0.0, -1.0),
        Vec3::new(-t, 0.0, 1.0),
    ]
    .into_iter()
    .map(Vec3::normalize)
    .collect();

    let mut indices: Vec<u32> = vec![
        0, 11, 5, 0, 5, 1, 0, 1, 7, 0, 7, 10, 0, 10, 11, 1, 5, 9, 5, 11, 4, 11, 10, 2, 10, 7, 6, 7,
        1, 8, 3, 9, 4, 3, 4, 2, 3, 2, 6, 3, 6, 8, 3, 8, 9, 4, 9, 5, 2, 4, 11, 6, 2, 10, 8, 6, 7, 9,
        8, 1,
    ];

    for _ in 0..subdivisions {
        subdivide(&mut positions, &mut indices);
    }

    (positions, indices)
}

/// Split every triangle into four at its edge midpoints, sharing midpoints
/// between neighbouring triangles.
fn subdivide(positions: &mut Vec<Vec3>, indices: &mut Vec<u32>) {
    let mut midpoints: HashMap<(u32, u32), u32> = HashMap::new();
    let mut new_indices = Vec::with_capacity(indices.len() * 4);

    let mut midpoint = |a: u32, b: u32, positions: &mut Vec<Vec3>| -> u32 {
        let key = (a.min(b), a.max(b));
        *midpoints.entry(key).or_insert_with(|| {
            let mid = (positions[a as usize] + positions[b as usize]).normalize();
            positions.push(mid);
            positions.len() as u32 - 1
        })
    };

    for tri in indices.chunks(3) {
        let (a, b, c) = (tri[0], tri[1], tri[2]);
        let ab = midpoint(a, b, positions);
        let bc = midpoint(b, c, positions);
        let ca = midpoint(c, a, positions);

        new_indices.extend_from_slice(&[a, ab, ca]);
        new_indices.extend_from_slice(&[b, bc, ab]);
        new_indices.extend_from_slice(&[c, ca, bc]);
        new_indices.extend_from_slice(&[ab, bc, ca]);
    }

    *indices = new_indices;
}

/// Color of the globe at a latitude given as `sin(lat)` on the unit sphere.
///
/// Polar caps above 66.5° are ice; elsewhere 15° bands alternate between two
/// ocean blues so heading and motion read at a glance.
pub fn latitude_color(sin_lat: f32) -> [f32; 4] {
    let lat_deg = sin_lat.clamp(-1.0, 1.0).asin().to_degrees();
    if lat_deg.abs() >= 66.5 {
        return [0.85, 0.9, 0.95, 1.0];
    }
    let band = ((lat_deg + 90.0) / 15.0).floor() as i32;
    if band % 2 == 0 {
        [0.05, 0.22, 0.45, 1.0]
    } else {
        [0.08, 0.3, 0.55, 1.0]
    }
}

/// Unit-sphere globe with +Z as the polar axis. Scale by the ellipsoid axes
/// to place it in ECEF.
pub fn globe_mesh(subdivisions: u32) -> MeshData {
    let (positions, indices) = icosphere(subdivisions);
    let vertices = positions
        .iter()
        .map(|p| VertexPositionColor {
            position: p.to_array(),
            color: latitude_color(p.z),
        })
        .collect();
    MeshData { vertices, indices }
}

/// Arrowhead aircraft about one unit long: nose at −Z, wings along ±X, tail
/// fin toward +Y.
pub fn aircraft_mesh() -> MeshData {
    let nose = Vec3::new(0.0, 0.0, -1.0);
    let left = Vec3::new(-0.8, 0.0, 0.6);
    let right = Vec3::new(0.8, 0.0, 0.6);
    let notch = Vec3::new(0.0, 0.0, 0.3);
    let spine = Vec3::new(0.0, 0.15, 0.1);
    let fin = Vec3::new(0.0, 0.45, 0.6);

    let top = [0.85, 0.85, 0.9, 1.0];
    let side = [0.7, 0.7, 0.75, 1.0];
    let belly = [0.45, 0.45, 0.5, 1.0];
    let tail = [0.8, 0.15, 0.1, 1.0];

    let mut mesh = MeshData::default();
    mesh.push_triangle([nose, left, spine], top);
    mesh.push_triangle([nose, spine, right], top);
    mesh.push_triangle([left, notch, spine], side);
    mesh.push_triangle([spine, notch, right], side);
    mesh.push_triangle([nose, notch, left], belly);
    mesh.push_triangle([nose, right, notch], belly);
    mesh.push_triangle([spine, fin, notch], tail);
    mesh
}

/// White octahedron of radius one; tinted per draw.
pub fn marker_mesh() -> MeshData {
    let white = [1.0, 1.0, 1.0, 1.0];
    let vertices = [Vec3::X, Vec3::NEG_X, Vec3::Y, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z]
        .into_iter()
        .map(|p| VertexPositionColor {
            position: p.to_array(),
            color: white,
        })
        .collect();
    #[rustfmt::skip]
    let indices = vec![
        0, 2, 4,  2, 1, 4,  1, 3, 4,  3, 0, 4,
        2, 0, 5,  1, 2, 5,  3, 1, 5,  0, 3, 5,
    ];
    MeshData { vertices, indices }
}
