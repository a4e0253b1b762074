//! End-to-end stages: plan the timeline, render it, mux it with the soundtrack.

use std::ops::Range;
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::assets::media::{MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo};
use crate::assets::prepared::PreparedAssets;
use crate::config::LoadedJob;
use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ensure_parent_dir, flatten_premul_over_bg_to_opaque_rgba8,
};
use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex, Millis};
use crate::foundation::error::{QuizError, QuizResult};
use crate::render::backend::{FrameRGBA, FrameRenderer};
use crate::render::cpu::FrameComposer;
use crate::timeline::{FrameSource, Phase, Timeline, build_timeline};

/// Output video frames covered by each timeline entry.
///
/// Boundaries are rounded on cumulative time, so the ranges are contiguous and their total is
/// `fps.frames_at(timeline.total())`.
pub fn entry_frame_ranges(timeline: &Timeline, fps: Fps) -> Vec<Range<u64>> {
    timeline
        .boundaries()
        .windows(2)
        .map(|w| fps.frames_at(w[0])..fps.frames_at(w[1]))
        .collect()
}

/// Summary of an [`assemble`] run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct AssembleReport {
    /// Timeline entries processed.
    pub entries: usize,
    /// Entries that were composed (the rest reused the previous image).
    pub rendered: usize,
    /// Entries too short to cover a single video frame.
    pub skipped: usize,
    /// Video frames pushed.
    pub frames: u64,
    /// Timeline duration.
    pub duration: Millis,
}

/// Render `timeline` and push its frames into `sink`.
///
/// Each entry is composed once and repeated for its frame range; `RepeatPrevious` entries reuse
/// the last composed image.
#[tracing::instrument(skip_all, fields(entries = timeline.entries.len(), fps = fps.as_f64()))]
pub fn assemble<R, S>(
    timeline: &Timeline,
    renderer: &mut R,
    sink: &mut S,
    fps: Fps,
    audio: Option<AudioInputConfig>,
) -> QuizResult<AssembleReport>
where
    R: FrameRenderer + ?Sized,
    S: FrameSink + ?Sized,
{
    if matches!(
        timeline.entries.first().map(|e| &e.source),
        Some(FrameSource::RepeatPrevious)
    ) {
        return Err(QuizError::validation(
            "the first timeline entry has no previous frame to repeat",
        ));
    }

    let ranges = entry_frame_ranges(timeline, fps);
    let frame_count = ranges.last().map_or(0, |r| r.end);
    let (width, height) = renderer.output_size();

    sink.begin(SinkConfig {
        width,
        height,
        fps,
        frame_count,
        audio,
    })?;

    let mut current: Option<FrameRGBA> = None;
    let mut rendered = 0usize;
    let mut skipped = 0usize;
    for (i, (entry, range)) in timeline.entries.iter().zip(&ranges).enumerate() {
        if let FrameSource::Render(spec) = &entry.source {
            current = Some(renderer.render(spec)?);
            rendered += 1;
        }
        let frame = current.as_ref().ok_or_else(|| {
            QuizError::validation("timeline entry has no frame to show")
        })?;
        if range.is_empty() {
            skipped += 1;
            tracing::warn!(
                entry = i,
                phase = ?entry.phase,
                duration_ms = entry.duration.0,
                "entry is shorter than one video frame and is not shown"
            );
        }
        tracing::debug!(
            entry = i,
            phase = ?entry.phase,
            duration_ms = entry.duration.0,
            frames = range.end - range.start,
            "entry"
        );
        for idx in range.clone() {
            sink.push_frame(FrameIndex(idx), frame)?;
        }
    }
    sink.end()?;

    Ok(AssembleReport {
        entries: timeline.entries.len(),
        rendered,
        skipped,
        frames: frame_count,
        duration: timeline.total(),
    })
}

/// Result of [`render_quiz`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct RenderReport {
    /// Video written.
    pub out: PathBuf,
    /// Assembly statistics.
    pub assemble: AssembleReport,
}

/// Render the whole job to an MP4.
///
/// Assets and audio are checked before any frame is composed; the audio is decoded, trimmed to
/// exactly the timeline duration and handed to ffmpeg through a temporary PCM file that is
/// removed when this returns.
#[tracing::instrument(skip(job), fields(job_dir = %job.base_dir.display()))]
pub fn render_quiz(job: &LoadedJob, out_override: Option<&Path>) -> QuizResult<RenderReport> {
    let (timeline, assets) = prepare(job)?;
    let fps = job.job.fps()?;
    let total = timeline.total();

    let audio_path = job.resolve(&job.job.audio);
    let pcm = decode_audio_f32_stereo(&audio_path, MIX_SAMPLE_RATE, Some(total))?
        .trim_exact(total)?;
    let pcm_file = pcm.write_f32le_tempfile()?;
    tracing::debug!(
        audio = %audio_path.display(),
        samples = pcm.frames(),
        "soundtrack trimmed"
    );

    let out = out_override.map_or_else(|| job.resolve(&job.job.out), Path::to_path_buf);
    let mut composer = composer_for(job, assets)?;
    let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(out.clone()));
    let report = assemble(
        &timeline,
        &mut composer,
        &mut sink,
        fps,
        Some(AudioInputConfig {
            path: pcm_file.path().to_path_buf(),
            sample_rate: MIX_SAMPLE_RATE,
            channels: MIX_CHANNELS,
        }),
    )?;
    drop(pcm_file);

    tracing::info!(
        out = %out.display(),
        frames = report.frames,
        secs = report.duration.as_secs_f64(),
        "quiz rendered"
    );
    Ok(RenderReport {
        out,
        assemble: report,
    })
}

/// Render the image of timeline entry `entry` to a PNG (border included).
#[tracing::instrument(skip(job))]
pub fn render_entry_png(job: &LoadedJob, entry: usize, out: &Path) -> QuizResult<()> {
    let (timeline, assets) = prepare(job)?;
    let mut composer = composer_for(job, assets)?;
    let spec = timeline.resolve_spec(entry).ok_or_else(|| {
        QuizError::validation(format!(
            "entry {entry} out of range (timeline has {} entries)",
            timeline.entries.len()
        ))
    })?;

    let frame = composer.render(spec)?;
    let mut rgba = vec![0u8; frame.data.len()];
    if frame.premultiplied {
        flatten_premul_over_bg_to_opaque_rgba8(&mut rgba, &frame.data, [0, 0, 0, 255])?;
    } else {
        rgba.copy_from_slice(&frame.data);
    }

    let img = image::RgbaImage::from_raw(frame.width, frame.height, rgba)
        .ok_or_else(|| QuizError::validation("frame buffer does not match its size"))?;
    ensure_parent_dir(out)?;
    img.save(out)
        .map_err(|e| QuizError::encode(format!("failed to write '{}': {e}", out.display())))?;
    tracing::info!(out = %out.display(), entry, "frame written");
    Ok(())
}

/// One row of a [`QuizPlan`].
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PlanEntry {
    /// Phase that emitted the entry.
    pub phase: Phase,
    /// Start offset in milliseconds.
    pub start_ms: u64,
    /// Duration in milliseconds.
    pub duration_ms: u64,
    /// Output video frames covered.
    pub frames: Range<u64>,
    /// Whether the previous image is reused.
    pub repeat_previous: bool,
    /// Picture index shown.
    pub picture: Option<usize>,
    /// Question text shown.
    pub question: Option<String>,
    /// Answer size in px when the answer is shown.
    pub answer_size: Option<f32>,
}

/// Timeline summary printed by `quizreel plan`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct QuizPlan {
    /// Frame rate used for the frame ranges.
    pub fps: f64,
    /// Total duration in milliseconds.
    pub total_ms: u64,
    /// Total duration in seconds.
    pub total_secs: f64,
    /// Number of output video frames.
    pub frame_count: u64,
    /// Wrapped question lines.
    pub lines: Vec<String>,
    /// Entries in display order.
    pub entries: Vec<PlanEntry>,
}

impl QuizPlan {
    /// Summarize `timeline` at `fps`.
    pub fn from_timeline(timeline: &Timeline, fps: Fps) -> Self {
        let ranges = entry_frame_ranges(timeline, fps);
        let starts = timeline.boundaries();
        let entries = timeline
            .entries
            .iter()
            .enumerate()
            .zip(ranges)
            .map(|((i, e), frames)| {
                let spec = timeline.resolve_spec(i);
                PlanEntry {
                    phase: e.phase,
                    start_ms: starts[i].0,
                    duration_ms: e.duration.0,
                    frames,
                    repeat_previous: matches!(e.source, FrameSource::RepeatPrevious),
                    picture: spec.map(|s| s.picture),
                    question: spec.map(|s| s.question.clone()),
                    answer_size: spec.filter(|s| s.show_answer).map(|s| s.answer_size),
                }
            })
            .collect();

        let total = timeline.total();
        Self {
            fps: fps.as_f64(),
            total_ms: total.0,
            total_secs: total.as_secs_f64(),
            frame_count: fps.frames_at(total),
            lines: timeline.lines.clone(),
            entries,
        }
    }
}

/// Build the timeline of `job` without rendering anything.
#[tracing::instrument(skip(job))]
pub fn plan_quiz(job: &LoadedJob) -> QuizResult<QuizPlan> {
    let (timeline, _) = prepare(job)?;
    Ok(QuizPlan::from_timeline(&timeline, job.job.fps()?))
}

fn prepare(job: &LoadedJob) -> QuizResult<(Timeline, PreparedAssets)> {
    job.job.validate()?;
    let question = job.question_text()?;
    let mut assets = PreparedAssets::load(job)?;
    let timeline = build_timeline(
        &question,
        assets.pictures.len(),
        &job.job.style,
        &mut assets.text,
    )?;
    Ok((timeline, assets))
}

fn composer_for(job: &LoadedJob, assets: PreparedAssets) -> QuizResult<FrameComposer> {
    FrameComposer::new(
        job.job.style.layout.clone(),
        job.job.title.clone(),
        job.job.answer.clone(),
        assets,
    )
}

#[cfg(test)]
#[path = "../tests/unit/pipeline.rs"]
mod tests;
