//! The visualizer context: scene, renderer and audio, advanced frame by frame.

use anyhow::Result;
use std::sync::Arc;
use winit::window::Window;

use crate::audio::AudioSource;
use crate::frame_loop::FrameTick;
use crate::params::Settings;
use crate::rendering::Renderer;
use crate::scene::Scene;
use crate::viewport::Viewport;

/// Everything one visualizer instance owns
pub struct Visualizer {
    scene: Scene,
    renderer: Renderer,
    audio: Option<AudioSource>,
}

impl Visualizer {
    /// Build the scene and GPU resources for `window` and start the audio
    ///
    /// Audio failures are logged; the visualizer then runs without reacting.
    pub fn new(window: Arc<Window>, settings: &Settings) -> Result<Self> {
        let mut scene = Scene::new(settings);

        let renderer = pollster::block_on(Renderer::new(window.clone(), &scene.torus, settings))?;

        let size = window.inner_size();
        scene
            .camera
            .set_viewport(Viewport::new(size.width, size.height));

        let audio = match AudioSource::open(
            &settings.assets.audio,
            settings.analyser.clone(),
            &settings.playback,
        ) {
            Ok(source) => Some(source),
            Err(e) => {
                log::error!("audio disabled: {e:#}");
                None
            }
        };

        Ok(Self {
            scene,
            renderer,
            audio,
        })
    }

    pub fn is_audio_playing(&self) -> bool {
        self.audio.as_ref().is_some_and(AudioSource::is_playing)
    }

    /// Run one frame: resize, poll audio, deform, render
    pub fn frame(&mut self, tick: &FrameTick) {
        if let Some(viewport) = tick.resized {
            self.renderer.resize(viewport, &mut self.scene.camera);
        }

        let spectrum = self.audio.as_mut().and_then(AudioSource::frequency_data);
        self.scene.update(tick, spectrum);

        match self.renderer.render(&mut self.scene) {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                log::debug!("surface lost or outdated, reconfiguring");
                self.renderer.recover_surface();
            }
            Err(e) => log::warn!("render error: {e:?}"),
        }
    }
}
