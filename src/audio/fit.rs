use std::path::Path;

use crate::foundation::error::{ReelError, ReelResult};
use crate::media::AudioPcm;

/// What [`fit_to_duration`] did to the narration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AudioFit {
    /// Narration already had the target length.
    Exact,
    /// Narration was longer; the tail was dropped.
    Truncated {
        /// Seconds removed from the end.
        dropped_secs: f64,
    },
    /// Narration was shorter; silence was appended after it.
    Padded {
        /// Seconds of silence appended.
        silence_secs: f64,
    },
}

/// Sample frames covering `total_secs` at `sample_rate`.
pub fn target_frames(total_secs: f64, sample_rate: u32) -> u64 {
    (total_secs * f64::from(sample_rate)).round() as u64
}

/// Truncate or pad `pcm` so it lasts exactly `total_secs`.
///
/// Padding is silence appended at the end; narration samples never move.
pub fn fit_to_duration(mut pcm: AudioPcm, total_secs: f64) -> ReelResult<(AudioPcm, AudioFit)> {
    if !total_secs.is_finite() || total_secs <= 0.0 {
        return Err(ReelError::validation(
            "target audio duration must be a positive number of seconds",
        ));
    }
    if pcm.sample_rate == 0 {
        return Err(ReelError::validation("audio sample_rate must be non-zero"));
    }
    if pcm.channels == 0 {
        return Err(ReelError::validation("audio channels must be non-zero"));
    }

    let channels = usize::from(pcm.channels);
    // Drop a dangling partial frame, if any.
    let whole = pcm.interleaved_f32.len() - pcm.interleaved_f32.len() % channels;
    pcm.interleaved_f32.truncate(whole);

    let have = pcm.frames();
    let want = target_frames(total_secs, pcm.sample_rate);
    let rate = f64::from(pcm.sample_rate);
    let target_len = usize::try_from(want)
        .ok()
        .and_then(|w| w.checked_mul(channels))
        .ok_or_else(|| {
            ReelError::validation(format!(
                "target audio duration {total_secs}s is too long to buffer"
            ))
        })?;

    let fit = match have.cmp(&want) {
        std::cmp::Ordering::Equal => AudioFit::Exact,
        std::cmp::Ordering::Greater => {
            pcm.interleaved_f32.truncate(target_len);
            AudioFit::Truncated {
                dropped_secs: (have - want) as f64 / rate,
            }
        }
        std::cmp::Ordering::Less => {
            pcm.interleaved_f32.resize(target_len, 0.0);
            AudioFit::Padded {
                silence_secs: (want - have) as f64 / rate,
            }
        }
    };
    Ok((pcm, fit))
}

/// Write interleaved `f32` PCM samples to a raw little-endian `.f32le` file.
pub fn write_f32le(samples_interleaved: &[f32], out_path: &Path) -> ReelResult<()> {
    if let Some(parent) = out_path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            ReelError::media(format!(
                "failed to create audio output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }

    let mut bytes = Vec::<u8>::with_capacity(samples_interleaved.len() * 4);
    for &sample in samples_interleaved {
        bytes.extend_from_slice(&sample.clamp(-1.0, 1.0).to_le_bytes());
    }
    std::fs::write(out_path, bytes).map_err(|e| {
        ReelError::media(format!(
            "failed to write audio file '{}': {e}",
            out_path.display()
        ))
    })
}

#[cfg(test)]
#[path = "../../tests/unit/audio/fit.rs"]
mod tests;
