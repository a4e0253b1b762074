//! quizreel renders short vertical "guess who/what" quiz videos.
//!
//! A job names a title, a question script, an answer, a few pictures and a soundtrack. The
//! question is revealed word by word over a gradient background, pictures cycle as the text
//! grows, then the answer appears and blinks at growing sizes. Frames are rasterized on the CPU
//! and streamed into the system `ffmpeg` together with the trimmed soundtrack.
//!
//! - Load a [`LoadedJob`] from JSON
//! - Inspect its [`Timeline`] with [`plan_quiz`]
//! - Render it with [`render_quiz`], or drive [`assemble`] with your own
//!   [`FrameRenderer`] / [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod assets;
mod config;
mod encode;
mod foundation;
mod layout;
mod pipeline;
mod render;
mod timeline;


pub use crate::foundation::core::{Canvas, Fps, FrameIndex, Millis, Point, Rect};
pub use crate::foundation::error::{QuizError, QuizResult};

pub use crate::assets::color::ColorDef;
pub use crate::assets::decode::{
    Picture, PreparedImage, PreparedSvg, decode_image, decode_picture, parse_svg,
};
pub use crate::assets::media::{
    AudioPcm, MIX_CHANNELS, MIX_SAMPLE_RATE, decode_audio_f32_stereo, sample_frames_for,
};
pub use crate::assets::prepared::PreparedAssets;
pub use crate::assets::store::{
    FontRole, TextBrushRgba8, TextExtent, TextLayoutEngine, TextMeasure,
};
pub use crate::assets::svg_raster::rasterize_svg_to_premul_rgba8;
pub use crate::config::{
    Durations, FontPaths, GradientDirection, LayoutConfig, LoadedJob, QuizJob, QuizStyle,
    TimingConfig,
};
pub use crate::encode::ffmpeg::{
    FfmpegSink, FfmpegSinkOpts, ffmpeg_args, flatten_premul_over_bg_to_opaque_rgba8,
    is_ffmpeg_on_path,
};
pub use crate::encode::sink::{AudioInputConfig, FrameSink, InMemorySink, SinkConfig};
pub use crate::layout::frame::{FrameInputs, FrameLayout, PicturePlacement, PlacedLine};
pub use crate::layout::wrap::{LineAccumulator, WordPlacement, wrap_text};
pub use crate::pipeline::{
    AssembleReport, PlanEntry, QuizPlan, RenderReport, assemble, entry_frame_ranges, plan_quiz,
    render_entry_png, render_quiz,
};
pub use crate::render::background::gradient_rgba8_premul;
pub use crate::render::backend::{FrameRGBA, FrameRenderer};
pub use crate::render::cpu::{FrameComposer, add_border};
pub use crate::timeline::{
    FrameSource, FrameSpec, Phase, Timeline, TimelineEntry, blink_size, build_timeline,
    picture_after_word,
};
