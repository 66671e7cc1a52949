//! Audio-driven noise displacement of the torus vertices.

use glam::{DVec3, Vec3};
use noise::{NoiseFn, OpenSimplex};

use super::TorusMesh;
use crate::audio::FrequencySummary;
use crate::params::{AudioReactiveMapping, DisplacementParams};
use crate::remap::modulate;

/// Per-frame displacement drive derived from the spectrum
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Drive {
    /// Added to the torus radius
    pub bass: f32,
    /// Scales the noise amplitude
    pub treble: f32,
}

impl Drive {
    /// Remap a spectrum summary into drive values
    pub fn from_summary(summary: &FrequencySummary, mapping: &AudioReactiveMapping) -> Self {
        let (bass_min, bass_max) = mapping.bass_range;
        let (treble_min, treble_max) = mapping.treble_range;

        Self {
            bass: modulate(
                summary.lower_max.powf(mapping.bass_exponent),
                0.0,
                1.0,
                bass_min,
                bass_max,
            ),
            treble: modulate(summary.upper_avg, 0.0, 1.0, treble_min, treble_max),
        }
    }
}

/// Rewrites vertex distances from the origin using 3D simplex noise
pub struct Displacer {
    simplex: OpenSimplex,
    params: DisplacementParams,
}

impl Displacer {
    pub fn new(params: DisplacementParams) -> Self {
        Self {
            simplex: OpenSimplex::new(params.noise_seed),
            params,
        }
    }

    /// Displace every vertex of `mesh` for the given drive and time
    ///
    /// Each vertex is placed along its rest direction from the origin at
    /// distance `(radius + bass) + noise(dir * scale + drift(t)) * amplitude * treble`,
    /// floored at `f32::EPSILON` so it never crosses to the opposite side.
    /// Vertices generated at the origin are left in place.
    pub fn apply(&self, mesh: &mut TorusMesh, drive: Drive, time_ms: f64) {
        let base = mesh.radius() + drive.bass;
        let gain = self.params.amplitude * drive.treble;

        let [rx, ry, rz] = self.params.axis_rates;
        let drift = DVec3::new(rx, ry, rz) * (time_ms * self.params.time_rate);

        for (vertex, &direction) in mesh.vertices.iter_mut().zip(&mesh.rest_directions) {
            if direction == Vec3::ZERO {
                continue;
            }

            let sample = direction.as_dvec3() * self.params.direction_scale + drift;
            let noise = self.simplex.get(sample.to_array()) as f32;
            let distance = (base + noise * gain).max(f32::EPSILON);

            vertex.position = (direction * distance).to_array();
        }

        mesh.recompute_normals();
        mesh.mark_needs_upload();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TorusParams;

    fn mesh() -> TorusMesh {
        TorusMesh::new(&TorusParams {
            radial_segments: 16,
            tubular_segments: 24,
            ..Default::default()
        })
    }

    #[test]
    fn test_drive_from_summary() {
        let mapping = AudioReactiveMapping::default();

        let silent = Drive::from_summary(&FrequencySummary::default(), &mapping);
        assert_eq!(silent, Drive::default());

        let summary = FrequencySummary {
            lower_avg: 0.5,
            lower_max: 1.0,
            upper_avg: 0.5,
            upper_max: 1.0,
        };
        let drive = Drive::from_summary(&summary, &mapping);
        assert!((drive.bass - 8.0).abs() < 1e-6);
        assert!((drive.treble - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_displacement_preserves_count_and_direction() {
        let mut mesh = mesh();
        let before: Vec<Vec3> = mesh.vertices.iter().map(|v| Vec3::from(v.position)).collect();
        let displacer = Displacer::new(DisplacementParams::default());

        displacer.apply(
            &mut mesh,
            Drive {
                bass: 2.5,
                treble: 1.5,
            },
            12_345.0,
        );

        assert_eq!(mesh.vertices.len(), before.len());
        for (vertex, original) in mesh.vertices.iter().zip(&before) {
            let after = Vec3::from(vertex.position);
            let cos = after.normalize().dot(original.normalize());
            assert!(cos > 0.9999, "direction changed: {original} -> {after}");
        }
    }

    #[test]
    fn test_saturated_spectrum_keeps_vertices_on_their_side() {
        let mut mesh = TorusMesh::new(&TorusParams::default());
        let displacer = Displacer::new(DisplacementParams::default());
        let drive = Drive::from_summary(
            &FrequencySummary::from_bins(&[255u8; 256]),
            &AudioReactiveMapping::default(),
        );
        assert!(drive.treble * 7.0 > mesh.radius() + drive.bass);

        for frame in 0..10 {
            displacer.apply(&mut mesh, drive, 12_345.0 + frame as f64 * 16.0);

            for (vertex, rest) in mesh.vertices.iter().zip(mesh.rest_directions()) {
                let position = Vec3::from(vertex.position);
                assert!(position.length() > 0.0);
                assert!(
                    position.normalize().dot(*rest) > 0.0,
                    "frame {frame}: {position} left {rest}"
                );
            }
        }
    }

    #[test]
    fn test_zero_treble_gives_sphere_of_radius_plus_bass() {
        let mut mesh = mesh();
        let displacer = Displacer::new(DisplacementParams::default());

        displacer.apply(
            &mut mesh,
            Drive {
                bass: 1.0,
                treble: 0.0,
            },
            0.0,
        );

        for vertex in &mesh.vertices {
            assert!((Vec3::from(vertex.position).length() - 4.0).abs() < 1e-4);
        }
    }

    #[test]
    fn test_displacement_is_deterministic_and_bounded() {
        let displacer = Displacer::new(DisplacementParams::default());
        let drive = Drive {
            bass: 0.0,
            treble: 1.0,
        };

        let mut a = mesh();
        let mut b = mesh();
        displacer.apply(&mut a, drive, 500.0);
        displacer.apply(&mut b, drive, 500.0);

        for (va, vb) in a.vertices.iter().zip(&b.vertices) {
            assert_eq!(va.position, vb.position);
            // Noise is in [-1, 1], so distance stays within radius +/- amplitude
            let distance = Vec3::from(va.position).length();
            assert!((distance - 3.0).abs() <= 7.0 + 1e-3);
        }
    }

    #[test]
    fn test_displacement_flags_upload() {
        let mut mesh = mesh();
        mesh.take_needs_upload();

        Displacer::new(DisplacementParams::default()).apply(&mut mesh, Drive::default(), 0.0);

        assert!(mesh.take_needs_upload());
    }

    #[test]
    fn test_origin_vertex_left_in_place() {
        let mut mesh = mesh();
        mesh.vertices[0].position = [0.0, 0.0, 0.0];
        mesh.rest_directions[0] = Vec3::ZERO;

        Displacer::new(DisplacementParams::default()).apply(
            &mut mesh,
            Drive {
                bass: 3.0,
                treble: 1.0,
            },
            0.0,
        );

        assert_eq!(mesh.vertices[0].position, [0.0, 0.0, 0.0]);
    }
}
