//! Silence trimming and level metering over interleaved `f32` buffers.

use crate::models::audio_models::AudioLevels;

/// Strip leading and trailing silence from an interleaved buffer.
///
/// A frame (`channels` consecutive samples) is audible when the largest
/// absolute sample in it is strictly greater than `threshold`. Returns the
/// inclusive range from the first to the last audible frame, so frames are
/// never split. Returns an empty buffer when nothing is audible.
///
/// `channels == 0` is treated as mono. An incomplete trailing frame is never
/// part of the output.
pub fn trim_silence(samples: &[f32], channels: usize, threshold: f32) -> Vec<f32> {
    let channels = channels.max(1);
    let frame_count = samples.len() / channels;

    let is_audible = |frame: usize| frame_peak(&samples[frame * channels..(frame + 1) * channels]) > threshold;

    let Some(first) = (0..frame_count).find(|&f| is_audible(f)) else {
        return Vec::new();
    };
    // `first` is audible, so the reverse scan always finds a frame.
    let last = (first..frame_count).rev().find(|&f| is_audible(f)).unwrap_or(first);

    samples[first * channels..(last + 1) * channels].to_vec()
}

/// Largest absolute sample value in `samples` (0.0 for an empty slice).
pub fn peak_level(samples: &[f32]) -> f32 {
    frame_peak(samples)
}

/// Root-mean-square level of `samples` (0.0 for an empty slice).
pub fn rms_level(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum_squares: f64 = samples.iter().map(|&s| (s as f64) * (s as f64)).sum();
    (sum_squares / samples.len() as f64).sqrt() as f32
}

pub fn levels(samples: &[f32]) -> AudioLevels {
    AudioLevels {
        rms: rms_level(samples),
        peak: peak_level(samples),
    }
}

fn frame_peak(frame: &[f32]) -> f32 {
    frame.iter().fold(0.0f32, |peak, &s| peak.max(s.abs()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn strips_leading_and_trailing_silence_mono() {
        let samples = [0.0, 0.001, 0.5, 0.0, -0.7, 0.002, 0.0];
        assert_eq!(trim_silence(&samples, 1, 0.01), vec![0.5, 0.0, -0.7]);
    }

    #[test]
    fn all_silent_returns_empty() {
        let samples = vec![0.0f32; 88200];
        assert!(trim_silence(&samples, 1, 0.01).is_empty());
    }

    #[test]
    fn all_audible_returns_input_unchanged() {
        let samples = [0.5, -0.5, 0.3, 0.9];
        assert_eq!(trim_silence(&samples, 2, 0.01), samples.to_vec());
    }

    #[test]
    fn threshold_is_strict() {
        let samples = [0.01, 0.02, 0.01];
        assert_eq!(trim_silence(&samples, 1, 0.01), vec![0.02]);
        assert!(trim_silence(&[0.01, -0.01], 1, 0.01).is_empty());
    }

    #[test]
    fn stereo_keeps_whole_frames() {
        // Frames: [0,0] [0,0.5] [0.2,0] [0,0]
        let samples = [0.0, 0.0, 0.0, 0.5, 0.2, 0.0, 0.0, 0.0];
        let trimmed = trim_silence(&samples, 2, 0.1);
        assert_eq!(trimmed, vec![0.0, 0.5, 0.2, 0.0]);
        assert_eq!(trimmed.len() % 2, 0);
    }

    #[test]
    fn loud_sample_in_one_channel_keeps_the_frame() {
        let samples = [0.0, 0.0, -0.8, 0.0, 0.0, 0.0];
        assert_eq!(trim_silence(&samples, 3, 0.1), vec![-0.8, 0.0, 0.0]);
    }

    #[test]
    fn incomplete_trailing_frame_is_dropped() {
        let samples = [0.5, 0.5, 0.9];
        assert_eq!(trim_silence(&samples, 2, 0.1), vec![0.5, 0.5]);
    }

    #[test]
    fn zero_channels_treated_as_mono() {
        assert_eq!(trim_silence(&[0.0, 0.4, 0.0], 0, 0.1), vec![0.4]);
    }

    #[test]
    fn empty_input() {
        assert!(trim_silence(&[], 1, 0.01).is_empty());
    }

    #[test]
    fn trim_is_idempotent() {
        let samples: Vec<f32> = (0..400)
            .map(|i| {
                let t = i as f32 / 400.0;
                if (0.2..0.7).contains(&t) {
                    (t * 40.0).sin() * 0.5
                } else {
                    0.001
                }
            })
            .collect();

        for channels in [1usize, 2, 4] {
            let once = trim_silence(&samples, channels, 0.01);
            let twice = trim_silence(&once, channels, 0.01);
            assert_eq!(once, twice);
            assert!(once.len() <= samples.len());
            assert_eq!(once.len() % channels, 0);
        }
    }

    #[test]
    fn trimmed_output_starts_on_frame_boundary() {
        let samples = [0.0, 0.0, 0.0, 0.0, 0.0, 0.6, 0.0, 0.0];
        let trimmed = trim_silence(&samples, 2, 0.1);
        // The audible sample is the right channel of frame 2; the frame starts at index 4.
        assert_eq!(trimmed, samples[4..6].to_vec());
    }

    #[test]
    fn level_meters() {
        assert_eq!(peak_level(&[]), 0.0);
        assert_eq!(rms_level(&[]), 0.0);
        assert_relative_eq!(peak_level(&[0.1, -0.8, 0.3]), 0.8);
        assert_relative_eq!(rms_level(&[0.5, -0.5, 0.5, -0.5]), 0.5, epsilon = 1e-6);

        let l = levels(&[1.0, 0.0]);
        assert_relative_eq!(l.peak, 1.0);
        assert_relative_eq!(l.rms, std::f32::consts::FRAC_1_SQRT_2, epsilon = 1e-6);
    }
}
