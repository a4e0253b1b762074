//! Job files and style configuration.
//!
//! A job is a JSON document naming the inputs of one render (title, question script, answer,
//! pictures, audio, output path) plus an optional [`QuizStyle`]. Every style field has a default,
//! so the smallest valid job only names its inputs.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

use crate::assets::color::ColorDef;
use crate::assets::store::FontRole;
use crate::foundation::core::{Canvas, Fps, Millis};
use crate::foundation::error::{QuizError, QuizResult};

/// Axis along which the background gradient runs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GradientDirection {
    /// Start color at the top, end color at the bottom.
    #[default]
    Vertical,
    /// Start color on the left, end color on the right.
    Horizontal,
}

/// Font files used for the three text roles.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FontPaths {
    /// Question font; also the fallback for the other roles.
    pub text: PathBuf,
    /// Title font (defaults to `text`).
    pub title: Option<PathBuf>,
    /// Answer font (defaults to `text`).
    pub answer: Option<PathBuf>,
}

impl Default for FontPaths {
    fn default() -> Self {
        Self {
            text: PathBuf::from("arialbd.ttf"),
            title: None,
            answer: None,
        }
    }
}

impl FontPaths {
    /// Path configured for `role`.
    pub fn for_role(&self, role: FontRole) -> &Path {
        match role {
            FontRole::Title => self.title.as_deref().unwrap_or(&self.text),
            FontRole::Question => &self.text,
            FontRole::Answer => self.answer.as_deref().unwrap_or(&self.text),
        }
    }
}

/// Geometry, typography and colors of a frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LayoutConfig {
    /// Canvas size before the border is added.
    pub canvas: Canvas,
    /// Font files.
    pub fonts: FontPaths,
    /// Title font size in px.
    pub title_size: f32,
    /// Question font size in px.
    pub text_size: f32,
    /// Base answer font size in px (blink frames enlarge it).
    pub answer_size: f32,
    /// Gradient color at the top (or left).
    pub gradient_start: ColorDef,
    /// Gradient color at the bottom (or right).
    pub gradient_end: ColorDef,
    /// Gradient axis.
    pub gradient_direction: GradientDirection,
    /// Color of all text.
    pub text_color: ColorDef,
    /// Fill of the box behind the question (usually translucent).
    pub box_color: ColorDef,
    /// Border color.
    pub border_color: ColorDef,
    /// Border width in px, added outside the canvas.
    pub border_width: u32,
    /// Distance from the canvas top to the title.
    pub title_top: f64,
    /// Left/right margin of the question text.
    pub side_margin: f64,
    /// Gap between title and question block.
    pub space_after_title: f64,
    /// Gap between question block and picture slot.
    pub space_after_text: f64,
    /// Extra spacing between question lines.
    pub line_spacing: f64,
    /// Padding of the question box around the text.
    pub box_padding: f64,
    /// Distance from the canvas bottom to the answer line.
    pub answer_bottom_margin: f64,
    /// Gap kept between the picture slot and the answer line.
    pub picture_bottom_gap: f64,
    /// Top margin above the picture, as a fraction of the displayed picture height.
    pub picture_margin_ratio: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            canvas: Canvas {
                width: 1080,
                height: 1920,
            },
            fonts: FontPaths::default(),
            title_size: 60.0,
            text_size: 48.0,
            answer_size: 48.0,
            gradient_start: ColorDef::WHITE,
            gradient_end: ColorDef::rgb(0xe0, 0xe0, 0xe0),
            gradient_direction: GradientDirection::Vertical,
            text_color: ColorDef::BLACK,
            box_color: ColorDef::rgba(255, 255, 255, 180),
            border_color: ColorDef::BLACK,
            border_width: 10,
            title_top: 50.0,
            side_margin: 50.0,
            space_after_title: 30.0,
            space_after_text: 30.0,
            line_spacing: 10.0,
            box_padding: 20.0,
            answer_bottom_margin: 50.0,
            picture_bottom_gap: 50.0,
            picture_margin_ratio: 0.1,
        }
    }
}

impl LayoutConfig {
    /// Maximum width of a question line.
    pub fn text_width(&self) -> f64 {
        f64::from(self.canvas.width) - 2.0 * self.side_margin
    }

    /// Size of the frames handed to the encoder (canvas plus border).
    pub fn output_canvas(&self) -> Canvas {
        self.canvas.expanded(self.border_width)
    }

    /// Check sizes and spacing for values that cannot be laid out.
    pub fn validate(&self) -> QuizResult<()> {
        if self.canvas.width == 0 || self.canvas.height == 0 {
            return Err(QuizError::validation("canvas width/height must be non-zero"));
        }
        let out = self.output_canvas();
        if out.width % 2 != 0 || out.height % 2 != 0 {
            return Err(QuizError::validation(format!(
                "output frame {}x{} must have even dimensions for yuv420p",
                out.width, out.height
            )));
        }
        for (name, size) in [
            ("title_size", self.title_size),
            ("text_size", self.text_size),
            ("answer_size", self.answer_size),
        ] {
            if !size.is_finite() || size <= 0.0 {
                return Err(QuizError::validation(format!(
                    "{name} must be finite and > 0 (got {size})"
                )));
            }
        }
        for (name, v) in [
            ("title_top", self.title_top),
            ("side_margin", self.side_margin),
            ("space_after_title", self.space_after_title),
            ("space_after_text", self.space_after_text),
            ("line_spacing", self.line_spacing),
            ("box_padding", self.box_padding),
            ("answer_bottom_margin", self.answer_bottom_margin),
            ("picture_bottom_gap", self.picture_bottom_gap),
        ] {
            if !v.is_finite() || v < 0.0 {
                return Err(QuizError::validation(format!(
                    "{name} must be finite and >= 0 (got {v})"
                )));
            }
        }
        if self.text_width() <= 0.0 {
            return Err(QuizError::validation(
                "side_margin leaves no room for question text",
            ));
        }
        if !(0.0..1.0).contains(&self.picture_margin_ratio) {
            return Err(QuizError::validation(
                "picture_margin_ratio must be in [0, 1)",
            ));
        }
        Ok(())
    }
}

/// Frame durations and the picture cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TimingConfig {
    /// Seconds each revealed word stays on screen.
    pub word_secs: f64,
    /// Seconds of the pause before the answer.
    pub pause_secs: f64,
    /// Seconds added to `word_secs` for the answer frame.
    pub reveal_extra_secs: f64,
    /// Seconds of each blink frame.
    pub blink_secs: f64,
    /// Answer enlargement, in percent, of each blink frame.
    pub blink_increments: Vec<u32>,
    /// Words per picture change.
    pub picture_cycle: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            word_secs: 0.5,
            pause_secs: 2.0,
            reveal_extra_secs: 3.0,
            blink_secs: 0.3,
            blink_increments: vec![10, 20, 30],
            picture_cycle: 6,
        }
    }
}

/// [`TimingConfig`] converted to exact milliseconds.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Durations {
    /// Per-word frame.
    pub word: Millis,
    /// Pause frame.
    pub pause: Millis,
    /// Extra time of the answer frame.
    pub reveal_extra: Millis,
    /// Each blink frame.
    pub blink: Millis,
}

impl TimingConfig {
    /// Validate and convert the second-based fields.
    pub fn durations(&self) -> QuizResult<Durations> {
        let word = Millis::from_secs_f64(self.word_secs)?;
        if word == Millis::ZERO {
            return Err(QuizError::validation("word_secs must be at least 1ms"));
        }
        Ok(Durations {
            word,
            pause: Millis::from_secs_f64(self.pause_secs)?,
            reveal_extra: Millis::from_secs_f64(self.reveal_extra_secs)?,
            blink: Millis::from_secs_f64(self.blink_secs)?,
        })
    }

    /// Validate all timing fields.
    pub fn validate(&self) -> QuizResult<()> {
        self.durations()?;
        if self.picture_cycle == 0 {
            return Err(QuizError::validation("picture_cycle must be >= 1"));
        }
        Ok(())
    }
}

/// Complete visual and timing style of a quiz.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct QuizStyle {
    /// Frame layout.
    pub layout: LayoutConfig,
    /// Timeline timing.
    pub timing: TimingConfig,
}

impl QuizStyle {
    /// Validate layout and timing.
    pub fn validate(&self) -> QuizResult<()> {
        self.layout.validate()?;
        self.timing.validate()
    }
}

fn default_out() -> PathBuf {
    PathBuf::from("output_video.mp4")
}

fn default_fps() -> u32 {
    24
}

/// One quiz render, as read from a job file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct QuizJob {
    /// Title drawn at the top of every frame.
    pub title: String,
    /// Plain-text question script file.
    #[serde(default)]
    pub question_path: Option<PathBuf>,
    /// Inline question text (alternative to `question_path`).
    #[serde(default)]
    pub question: Option<String>,
    /// Answer revealed at the end.
    pub answer: String,
    /// Illustrative pictures, cycled every `picture_cycle` words.
    pub pictures: Vec<PathBuf>,
    /// Audio track, trimmed to the timeline duration.
    pub audio: PathBuf,
    /// Output video path.
    #[serde(default = "default_out")]
    pub out: PathBuf,
    /// Output frame rate.
    #[serde(default = "default_fps")]
    pub fps: u32,
    /// Style overrides.
    #[serde(default)]
    pub style: QuizStyle,
}

impl QuizJob {
    /// Output frame rate as [`Fps`].
    pub fn fps(&self) -> QuizResult<Fps> {
        Fps::new(self.fps, 1)
    }

    /// Validate everything that can be checked without touching the filesystem.
    pub fn validate(&self) -> QuizResult<()> {
        match (&self.question_path, &self.question) {
            (Some(_), Some(_)) => {
                return Err(QuizError::validation(
                    "set either question_path or question, not both",
                ));
            }
            (None, None) => {
                return Err(QuizError::validation(
                    "one of question_path or question is required",
                ));
            }
            _ => {}
        }
        if self.answer.trim().is_empty() {
            return Err(QuizError::validation("answer must not be empty"));
        }
        if self.pictures.is_empty() {
            return Err(QuizError::validation("at least one picture is required"));
        }
        self.fps()?;
        self.style.validate()
    }
}

/// A job together with the directory its relative paths resolve against.
#[derive(Clone, Debug)]
pub struct LoadedJob {
    /// Parsed job.
    pub job: QuizJob,
    /// Base directory for relative paths.
    pub base_dir: PathBuf,
}

impl LoadedJob {
    /// Wrap an in-memory job; relative paths resolve against `base_dir`.
    pub fn new(job: QuizJob, base_dir: impl Into<PathBuf>) -> Self {
        Self {
            job,
            base_dir: base_dir.into(),
        }
    }

    /// Read and validate a JSON job file.
    pub fn from_path(path: &Path) -> QuizResult<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("read job file '{}'", path.display()))
            .map_err(|e| QuizError::asset(format!("{e:#}")))?;
        let job: QuizJob = serde_json::from_slice(&bytes).map_err(|e| {
            QuizError::validation(format!("invalid job file '{}': {e}", path.display()))
        })?;
        job.validate()?;

        let base_dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf);
        Ok(Self { job, base_dir })
    }

    /// Resolve a job-relative path.
    pub fn resolve(&self, p: &Path) -> PathBuf {
        if p.is_absolute() {
            p.to_path_buf()
        } else {
            self.base_dir.join(p)
        }
    }

    /// Question text, read from `question_path` when set.
    pub fn question_text(&self) -> QuizResult<String> {
        if let Some(inline) = &self.job.question {
            return Ok(inline.clone());
        }
        let rel = self
            .job
            .question_path
            .as_deref()
            .ok_or_else(|| QuizError::validation("one of question_path or question is required"))?;
        let path = self.resolve(rel);
        std::fs::read_to_string(&path).map_err(|e| {
            QuizError::asset(format!(
                "failed to read question text '{}': {e}",
                path.display()
            ))
        })
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
