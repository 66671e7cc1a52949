//! CPU-side scene state advanced once per frame.

use glam::Mat4;

use crate::audio::FrequencySummary;
use crate::camera::PerspectiveCamera;
use crate::frame_loop::FrameTick;
use crate::params::{AudioReactiveMapping, Settings};
use crate::torus::{Displacer, Drive, TorusMesh};

/// Camera, torus and the parameters driving its deformation
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub torus: TorusMesh,
    displacer: Displacer,
    mapping: AudioReactiveMapping,
    spin_per_frame: f32,
    rotation: f32,
    time_s: f32,
    last_drive: Option<Drive>,
}

impl Scene {
    pub fn new(settings: &Settings) -> Self {
        Self {
            camera: PerspectiveCamera::new(&settings.camera, settings.render.aspect_ratio()),
            torus: TorusMesh::new(&settings.torus),
            displacer: Displacer::new(settings.displacement.clone()),
            mapping: settings.mapping.clone(),
            spin_per_frame: settings.render.spin_per_frame,
            rotation: 0.0,
            time_s: 0.0,
            last_drive: None,
        }
    }

    /// Advance one frame
    ///
    /// `spectrum` is the current byte spectrum, present only while audio is
    /// playing; without it the torus keeps its last shape.
    pub fn update(&mut self, tick: &FrameTick, spectrum: Option<&[u8]>) {
        self.rotation = (self.rotation + self.spin_per_frame) % std::f32::consts::TAU;
        self.time_s = tick.elapsed.as_secs_f32();

        self.last_drive = spectrum.map(|bins| {
            let summary = FrequencySummary::from_bins(bins);
            let drive = Drive::from_summary(&summary, &self.mapping);
            self.displacer
                .apply(&mut self.torus, drive, tick.elapsed.as_secs_f64() * 1000.0);
            drive
        });
    }

    /// Model matrix of the torus
    pub fn model(&self) -> Mat4 {
        Mat4::from_rotation_y(self.rotation)
    }

    /// Seconds since the loop started, as of the last update
    pub fn time_s(&self) -> f32 {
        self.time_s
    }

    /// Drive applied during the last update, if audio was playing
    pub fn last_drive(&self) -> Option<Drive> {
        self.last_drive
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::TorusParams;
    use std::time::Duration;

    fn settings() -> Settings {
        Settings {
            torus: TorusParams {
                radial_segments: 10,
                tubular_segments: 10,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn tick(index: u64) -> FrameTick {
        FrameTick {
            index,
            elapsed: Duration::from_millis(16 * index),
            resized: None,
        }
    }

    #[test]
    fn test_silent_frame_leaves_mesh_untouched() {
        let mut scene = Scene::new(&settings());
        let before: Vec<_> = scene.torus.vertices.iter().map(|v| v.position).collect();
        scene.torus.take_needs_upload();

        scene.update(&tick(1), None);

        let after: Vec<_> = scene.torus.vertices.iter().map(|v| v.position).collect();
        assert_eq!(before, after);
        assert!(!scene.torus.take_needs_upload());
        assert_eq!(scene.last_drive(), None);
    }

    #[test]
    fn test_audio_frame_deforms_mesh() {
        let mut scene = Scene::new(&settings());
        scene.torus.take_needs_upload();

        let spectrum = [0, 0, 0, 0, 10, 20, 30, 40];
        scene.update(&tick(3), Some(&spectrum));

        let drive = scene.last_drive().unwrap();
        // lower band is silent, upper_avg = 25 / 4
        assert_eq!(drive.bass, 0.0);
        assert!((drive.treble - 25.0).abs() < 1e-4);
        assert!(scene.torus.take_needs_upload());
        assert!((scene.time_s() - 0.048).abs() < 1e-6);
    }

    #[test]
    fn test_torus_spins_each_frame() {
        let mut scene = Scene::new(&settings());
        assert_eq!(scene.model(), Mat4::IDENTITY);

        scene.update(&tick(1), None);
        assert_ne!(scene.model(), Mat4::IDENTITY);
    }
}
