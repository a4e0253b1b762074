use std::io::Write as _;
use std::path::Path;

use crate::foundation::core::Millis;
use crate::foundation::error::{QuizError, QuizResult};

/// Sample rate audio is decoded to before muxing.
pub const MIX_SAMPLE_RATE: u32 = 48_000;
/// Channel count audio is decoded to before muxing.
pub const MIX_CHANNELS: u16 = 2;

/// Interleaved `f32` PCM.
#[derive(Clone, Debug)]
pub struct AudioPcm {
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Interleaved samples.
    pub interleaved_f32: Vec<f32>,
}

impl AudioPcm {
    /// Number of sample frames (one sample per channel).
    pub fn frames(&self) -> u64 {
        if self.channels == 0 {
            return 0;
        }
        (self.interleaved_f32.len() / usize::from(self.channels)) as u64
    }

    /// Duration in seconds.
    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        (self.frames() as f64) / f64::from(self.sample_rate)
    }

    /// Truncate to exactly `duration`, failing if the audio is shorter.
    pub fn trim_exact(mut self, duration: Millis) -> QuizResult<Self> {
        let needed = sample_frames_for(duration, self.sample_rate);
        let available = self.frames();
        if available < needed {
            return Err(QuizError::AudioTooShort {
                needed_secs: duration.as_secs_f64(),
                available_secs: self.duration_secs(),
            });
        }
        self.interleaved_f32
            .truncate(needed as usize * usize::from(self.channels));
        Ok(self)
    }

    /// Write the samples as raw little-endian `f32` into a temporary file.
    ///
    /// The file is deleted when the returned handle is dropped.
    pub fn write_f32le_tempfile(&self) -> QuizResult<tempfile::NamedTempFile> {
        let mut file = tempfile::Builder::new()
            .prefix("quizreel-audio-")
            .suffix(".f32le")
            .tempfile()
            .map_err(|e| QuizError::encode(format!("failed to create audio temp file: {e}")))?;

        let mut bytes = Vec::<u8>::with_capacity(self.interleaved_f32.len() * 4);
        for &sample in &self.interleaved_f32 {
            bytes.extend_from_slice(&sample.to_le_bytes());
        }
        file.write_all(&bytes)
            .and_then(|()| file.flush())
            .map_err(|e| {
                QuizError::encode(format!(
                    "failed to write audio temp file '{}': {e}",
                    file.path().display()
                ))
            })?;
        Ok(file)
    }
}

/// Sample frames covering `duration` at `sample_rate`, rounded to nearest.
pub fn sample_frames_for(duration: Millis, sample_rate: u32) -> u64 {
    let num = u128::from(duration.0) * u128::from(sample_rate);
    ((num + 500) / 1000) as u64
}

/// Decode at most `limit` of `path` to interleaved f32 stereo PCM using the system `ffmpeg`.
///
/// A little more than `limit` is requested so that an exactly long enough file is not reported
/// short because of decoder padding.
pub fn decode_audio_f32_stereo(
    path: &Path,
    sample_rate: u32,
    limit: Option<Millis>,
) -> QuizResult<AudioPcm> {
    if !path.is_file() {
        return Err(QuizError::asset(format!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }

    let mut cmd = std::process::Command::new("ffmpeg");
    cmd.args(["-v", "error", "-i"]).arg(path);
    if let Some(limit) = limit {
        let secs = (limit + Millis(250)).as_secs_f64();
        cmd.args(["-t", &format!("{secs:.3}")]);
    }
    cmd.args([
        "-vn",
        "-f",
        "f32le",
        "-acodec",
        "pcm_f32le",
        "-ac",
        &MIX_CHANNELS.to_string(),
        "-ar",
        &sample_rate.to_string(),
        "pipe:1",
    ]);

    let out = cmd.output().map_err(|e| {
        QuizError::encode(format!(
            "failed to run ffmpeg for audio decode (is it installed and on PATH?): {e}"
        ))
    })?;

    if !out.status.success() {
        return Err(QuizError::asset(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    pcm_from_f32le_bytes(&out.stdout, sample_rate, MIX_CHANNELS)
}

fn pcm_from_f32le_bytes(bytes: &[u8], sample_rate: u32, channels: u16) -> QuizResult<AudioPcm> {
    if !bytes.len().is_multiple_of(4) {
        return Err(QuizError::asset(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    let interleaved_f32 = bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    Ok(AudioPcm {
        sample_rate,
        channels,
        interleaved_f32,
    })
}
