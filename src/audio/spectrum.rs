//! Reduction of a byte spectrum to four band scalars.

/// Lower/upper band statistics for one audio frame.
///
/// Each value is divided by the sample count of its band, so a full-scale
/// band of `n` bins reads `255 / n`.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FrequencySummary {
    pub lower_avg: f32,
    pub lower_max: f32,
    pub upper_avg: f32,
    pub upper_max: f32,
}

impl FrequencySummary {
    /// Summarize a byte spectrum.
    ///
    /// The lower band is `[0, len / 2)` and the upper band `[len / 2, len)`,
    /// so odd lengths give the extra bin to the upper band. An empty band
    /// contributes zeros.
    pub fn from_bins(bins: &[u8]) -> Self {
        let (lower, upper) = bins.split_at(bins.len() / 2);
        let (lower_avg, lower_max) = band_stats(lower);
        let (upper_avg, upper_max) = band_stats(upper);

        Self {
            lower_avg,
            lower_max,
            upper_avg,
            upper_max,
        }
    }
}

/// Normalized (average, maximum) of one band
fn band_stats(band: &[u8]) -> (f32, f32) {
    if band.is_empty() {
        return (0.0, 0.0);
    }

    let len = band.len() as f32;
    let sum: u32 = band.iter().map(|&b| b as u32).sum();
    let max = band.iter().copied().max().unwrap_or(0);

    (sum as f32 / len / len, max as f32 / len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_of_split_spectrum() {
        let summary = FrequencySummary::from_bins(&[0, 0, 0, 0, 10, 20, 30, 40]);

        assert_eq!(summary.lower_avg, 0.0);
        assert_eq!(summary.lower_max, 0.0);
        assert_eq!(summary.upper_avg, 25.0 / 4.0);
        assert_eq!(summary.upper_max, 40.0 / 4.0);
    }

    #[test]
    fn test_empty_spectrum_is_zero() {
        assert_eq!(FrequencySummary::from_bins(&[]), FrequencySummary::default());
    }

    #[test]
    fn test_single_bin_goes_to_upper_band() {
        let summary = FrequencySummary::from_bins(&[200]);

        assert_eq!(summary.lower_avg, 0.0);
        assert_eq!(summary.lower_max, 0.0);
        assert_eq!(summary.upper_avg, 200.0);
        assert_eq!(summary.upper_max, 200.0);
    }

    #[test]
    fn test_odd_length_split() {
        // [1, 2] | [3, 4, 5]
        let summary = FrequencySummary::from_bins(&[1, 2, 3, 4, 5]);

        assert_eq!(summary.lower_avg, 1.5 / 2.0);
        assert_eq!(summary.lower_max, 2.0 / 2.0);
        assert_eq!(summary.upper_avg, 4.0 / 3.0);
        assert_eq!(summary.upper_max, 5.0 / 3.0);
    }

    #[test]
    fn test_summary_bounds_and_ordering() {
        // Deterministic pseudo-random spectra of several even lengths
        let mut state: u32 = 0x1234_5678;
        for len in (2..=64).step_by(2) {
            let bins: Vec<u8> = (0..len)
                .map(|_| {
                    state = state.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
                    (state >> 24) as u8
                })
                .collect();

            let summary = FrequencySummary::from_bins(&bins);
            let bound = 255.0 / (len / 2) as f32;

            for value in [
                summary.lower_avg,
                summary.lower_max,
                summary.upper_avg,
                summary.upper_max,
            ] {
                assert!((0.0..=bound).contains(&value), "{value} out of [0, {bound}]");
            }
            assert!(summary.lower_max >= summary.lower_avg);
            assert!(summary.upper_max >= summary.upper_avg);
        }
    }
}
