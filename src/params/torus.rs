//! Torus geometry, displacement and audio-reactive mapping parameters.

/// Torus geometry parameters
#[derive(Debug, Clone)]
pub struct TorusParams {
    /// Distance from the torus center to the center of the tube
    pub radius: f32,

    /// Tube radius
    pub tube: f32,

    /// Segments around the tube cross-section
    pub radial_segments: usize,

    /// Segments around the main ring
    pub tubular_segments: usize,
}

impl Default for TorusParams {
    fn default() -> Self {
        Self {
            radius: 3.0,
            tube: 1.0,
            radial_segments: 100,
            tubular_segments: 100,
        }
    }
}

/// Noise displacement parameters
#[derive(Debug, Clone)]
pub struct DisplacementParams {
    /// Noise amplitude multiplier (world units per unit treble)
    pub amplitude: f32,

    /// Scale applied to the unit direction before sampling noise
    pub direction_scale: f64,

    /// Noise drift per millisecond, multiplied by `axis_rates` per axis
    pub time_rate: f64,

    /// Per-axis drift multipliers for the noise field
    pub axis_rates: [f64; 3],

    /// OpenSimplex seed
    pub noise_seed: u32,
}

impl Default for DisplacementParams {
    fn default() -> Self {
        Self {
            amplitude: 7.0,
            direction_scale: 1.0,
            time_rate: 0.00001,
            axis_rates: [7.0, 8.0, 9.0],
            noise_seed: 0,
        }
    }
}

/// Mapping from spectrum summary to displacement drive values
#[derive(Debug, Clone)]
pub struct AudioReactiveMapping {
    /// Exponent applied to the normalized lower-band peak before remapping
    pub bass_exponent: f32,

    /// Output range for bass (added to the torus radius)
    /// Formula: bass = modulate(lower_max ^ exponent, 0, 1, min, max)
    pub bass_range: (f32, f32),

    /// Output range for treble (scales the noise amplitude)
    /// Formula: treble = modulate(upper_avg, 0, 1, min, max)
    pub treble_range: (f32, f32),
}

impl Default for AudioReactiveMapping {
    fn default() -> Self {
        Self {
            bass_exponent: 0.8,
            bass_range: (0.0, 8.0),
            treble_range: (0.0, 4.0),
        }
    }
}
