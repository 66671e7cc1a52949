//! WAV clip decoding with progress reporting.

use anyhow::{bail, Context, Result};
use std::path::Path;

use super::AudioClip;

/// Progress is reported every this many samples (and once at the end)
const PROGRESS_CHUNK: usize = 1 << 16;

/// Decode a WAV file into an interleaved `f32` clip
///
/// `on_progress` receives the fraction of samples decoded so far, in
/// increasing order, ending with 1.0 on success.
pub fn load_clip(path: &Path, mut on_progress: impl FnMut(f32)) -> Result<AudioClip> {
    let mut reader = hound::WavReader::open(path)
        .with_context(|| format!("failed to open audio file {}", path.display()))?;

    let spec = reader.spec();
    if spec.channels == 0 {
        bail!("audio file {} declares zero channels", path.display());
    }

    let total = reader.len() as usize;
    let mut samples = Vec::with_capacity(total);

    match spec.sample_format {
        hound::SampleFormat::Float => {
            for sample in reader.samples::<f32>() {
                samples.push(sample.context("failed to decode float sample")?);
                report(&mut on_progress, samples.len(), total);
            }
        }
        hound::SampleFormat::Int => {
            let scale = 1.0 / (1i64 << (spec.bits_per_sample - 1)) as f32;
            for sample in reader.samples::<i32>() {
                let value = sample.context("failed to decode integer sample")?;
                samples.push(value as f32 * scale);
                report(&mut on_progress, samples.len(), total);
            }
        }
    }

    on_progress(1.0);

    log::debug!(
        "decoded {} ({} ch @ {} Hz, {} samples)",
        path.display(),
        spec.channels,
        spec.sample_rate,
        samples.len()
    );

    Ok(AudioClip::new(samples, spec.channels, spec.sample_rate))
}

fn report(on_progress: &mut impl FnMut(f32), decoded: usize, total: usize) {
    if decoded % PROGRESS_CHUNK == 0 && total > 0 && decoded < total {
        on_progress(decoded as f32 / total as f32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_wav(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("sonitorus-{}-{}.wav", name, std::process::id()))
    }

    #[test]
    fn test_load_int_wav() {
        let path = temp_wav("int");
        let spec = hound::WavSpec {
            channels: 2,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for _ in 0..100_000 {
            writer.write_sample(i16::MAX).unwrap();
            writer.write_sample(i16::MIN).unwrap();
        }
        writer.finalize().unwrap();

        let mut progress = Vec::new();
        let clip = load_clip(&path, |p| progress.push(p)).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(clip.channels(), 2);
        assert_eq!(clip.sample_rate(), 22050);
        assert_eq!(clip.frames(), 100_000);
        assert!((clip.frame(0)[0] - 1.0).abs() < 1e-3);
        assert_eq!(clip.frame(0)[1], -1.0);

        // Monotonic, ends at 1.0, with intermediate reports for a large file
        assert!(progress.len() > 1);
        assert!(progress.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(*progress.last().unwrap(), 1.0);
    }

    #[test]
    fn test_load_float_wav() {
        let path = temp_wav("float");
        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 44100,
            bits_per_sample: 32,
            sample_format: hound::SampleFormat::Float,
        };
        let mut writer = hound::WavWriter::create(&path, spec).unwrap();
        for i in 0..10 {
            writer.write_sample(i as f32 * 0.1).unwrap();
        }
        writer.finalize().unwrap();

        let clip = load_clip(&path, |_| {}).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(clip.frames(), 10);
        assert!((clip.mono(5) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let result = load_clip(Path::new("does/not/exist.wav"), |_| {});
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("does/not/exist.wav"));
    }
}
