//! Torus mesh generation and normal maintenance.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use std::f32::consts::TAU;

use crate::params::TorusParams;

/// Vertex data for the torus mesh (position + normal + UV coordinates)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct Vertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

/// Torus mesh with a fixed-size vertex buffer rewritten in place
pub struct TorusMesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    /// Unit direction of each vertex from the origin at generation time
    pub(super) rest_directions: Vec<Vec3>,
    radius: f32,
    radial: usize,
    tubular: usize,
    needs_upload: bool,
}

impl TorusMesh {
    /// Generate a torus around the Z axis
    pub fn new(params: &TorusParams) -> Self {
        let radial = params.radial_segments.max(3);
        let tubular = params.tubular_segments.max(3);

        let mut vertices = Vec::with_capacity((radial + 1) * (tubular + 1));
        let mut indices = Vec::with_capacity(radial * tubular * 6);

        for j in 0..=radial {
            let v = j as f32 / radial as f32 * TAU;
            for i in 0..=tubular {
                let u = i as f32 / tubular as f32 * TAU;

                let ring = params.radius + params.tube * v.cos();
                let position = Vec3::new(ring * u.cos(), ring * u.sin(), params.tube * v.sin());
                let center = Vec3::new(params.radius * u.cos(), params.radius * u.sin(), 0.0);
                let normal = (position - center).normalize_or_zero();

                vertices.push(Vertex {
                    position: position.to_array(),
                    normal: normal.to_array(),
                    uv: [i as f32 / tubular as f32, j as f32 / radial as f32],
                });
            }
        }

        // Two counter-clockwise triangles per quad
        let row = (tubular + 1) as u32;
        for j in 1..=radial as u32 {
            for i in 1..=tubular as u32 {
                let a = row * j + i - 1;
                let b = row * (j - 1) + i - 1;
                let c = row * (j - 1) + i;
                let d = row * j + i;

                indices.extend_from_slice(&[a, b, d, b, c, d]);
            }
        }

        let rest_directions = vertices
            .iter()
            .map(|v| Vec3::from_array(v.position).normalize_or_zero())
            .collect();

        Self {
            vertices,
            indices,
            rest_directions,
            radius: params.radius,
            radial,
            tubular,
            needs_upload: true,
        }
    }

    /// Directions the displacement pushes vertices along (zero at the origin)
    pub fn rest_directions(&self) -> &[Vec3] {
        &self.rest_directions
    }

    /// Ring radius the mesh was generated with
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Flag the vertex buffer as changed since the last GPU upload
    pub fn mark_needs_upload(&mut self) {
        self.needs_upload = true;
    }

    /// Consume the upload flag, returning whether an upload is due
    pub fn take_needs_upload(&mut self) -> bool {
        std::mem::take(&mut self.needs_upload)
    }

    /// Rebuild vertex normals from the current positions
    ///
    /// Face normals are accumulated unnormalized so larger triangles weigh more.
    /// The duplicated seam columns and rows share one summed normal.
    pub fn recompute_normals(&mut self) {
        let mut accum = vec![Vec3::ZERO; self.vertices.len()];

        for tri in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let v0 = Vec3::from_array(self.vertices[i0].position);
            let v1 = Vec3::from_array(self.vertices[i1].position);
            let v2 = Vec3::from_array(self.vertices[i2].position);

            let face = (v1 - v0).cross(v2 - v0);
            accum[i0] += face;
            accum[i1] += face;
            accum[i2] += face;
        }

        let row = self.tubular + 1;
        if accum.len() == row * (self.radial + 1) {
            for j in 0..=self.radial {
                weld(&mut accum, row * j, row * j + self.tubular);
            }
            for i in 0..=self.tubular {
                weld(&mut accum, i, row * self.radial + i);
            }
        }

        for (vertex, normal) in self.vertices.iter_mut().zip(accum) {
            vertex.normal = normal.normalize_or_zero().to_array();
        }
    }
}

fn weld(accum: &mut [Vec3], a: usize, b: usize) {
    let sum = accum[a] + accum[b];
    accum[a] = sum;
    accum[b] = sum;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn small_params() -> TorusParams {
        TorusParams {
            radius: 3.0,
            tube: 1.0,
            radial_segments: 8,
            tubular_segments: 12,
        }
    }

    #[test]
    fn test_torus_creation() {
        let params = TorusParams::default();
        let mesh = TorusMesh::new(&params);

        // Check vertex count: (radial + 1) * (tubular + 1)
        assert_eq!(
            mesh.vertices.len(),
            (params.radial_segments + 1) * (params.tubular_segments + 1)
        );

        // Check triangle count: radial * tubular * 2 triangles * 3 indices
        assert_eq!(
            mesh.indices.len(),
            params.radial_segments * params.tubular_segments * 6
        );
        assert!(mesh
            .indices
            .iter()
            .all(|&i| (i as usize) < mesh.vertices.len()));
    }

    #[test]
    fn test_vertices_lie_on_torus_surface() {
        let params = small_params();
        let mesh = TorusMesh::new(&params);

        for vertex in &mesh.vertices {
            let p = Vec3::from_array(vertex.position);
            let ring_distance = (p.x * p.x + p.y * p.y).sqrt() - params.radius;
            let tube_distance = (ring_distance * ring_distance + p.z * p.z).sqrt();
            assert!((tube_distance - params.tube).abs() < 1e-4);

            let [u, v] = vertex.uv;
            assert!((0.0..=1.0).contains(&u) && (0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_recomputed_normals_match_analytic_normals() {
        let mut mesh = TorusMesh::new(&small_params());
        let analytic: Vec<_> = mesh.vertices.iter().map(|v| Vec3::from(v.normal)).collect();

        mesh.recompute_normals();

        for (vertex, expected) in mesh.vertices.iter().zip(&analytic) {
            let normal = Vec3::from(vertex.normal);
            assert!((normal.length() - 1.0).abs() < 1e-4);
            assert!(normal.dot(*expected) > 0.9, "{normal} vs {expected}");
        }
    }

    #[test]
    fn test_seam_duplicates_share_normals() {
        let mut mesh = TorusMesh::new(&small_params());
        // Dent the surface so the seam neighbourhoods are lopsided
        for (k, vertex) in mesh.vertices.iter_mut().enumerate() {
            let scale = 1.0 + 0.1 * (k % 5) as f32;
            vertex.position = (Vec3::from(vertex.position) * scale).to_array();
        }
        mesh.recompute_normals();

        let (radial, tubular) = (8, 12);
        let row = tubular + 1;
        for j in 0..=radial {
            assert_eq!(mesh.vertices[row * j].normal, mesh.vertices[row * j + tubular].normal);
        }
        for i in 0..=tubular {
            assert_eq!(mesh.vertices[i].normal, mesh.vertices[row * radial + i].normal);
        }
    }

    #[test]
    fn test_rest_directions_are_unit_position_directions() {
        let mesh = TorusMesh::new(&small_params());

        assert_eq!(mesh.rest_directions().len(), mesh.vertices.len());
        for (vertex, direction) in mesh.vertices.iter().zip(mesh.rest_directions()) {
            let expected = Vec3::from(vertex.position).normalize();
            assert!((direction.length() - 1.0).abs() < 1e-5);
            assert!(direction.dot(expected) > 0.9999);
        }
    }

    #[test]
    fn test_upload_flag() {
        let mut mesh = TorusMesh::new(&small_params());

        // Fresh meshes need an initial upload
        assert!(mesh.take_needs_upload());
        assert!(!mesh.take_needs_upload());

        mesh.mark_needs_upload();
        assert!(mesh.take_needs_upload());
    }
}
