use crate::assets::store::{FontRole, TextExtent, TextMeasure};
use crate::config::LayoutConfig;
use crate::foundation::error::QuizResult;
use crate::foundation::core::{Point, Rect};
use crate::layout::wrap::wrap_text;

/// What goes on one frame.
#[derive(Clone, Copy, Debug)]
pub struct FrameInputs<'a> {
    /// Title line.
    pub title: &'a str,
    /// Question text revealed so far (wrapped by the layout).
    pub question: &'a str,
    /// Answer text.
    pub answer: &'a str,
    /// Whether the answer line is drawn.
    pub show_answer: bool,
    /// Answer font size in px for this frame.
    pub answer_size: f32,
    /// Width / height of the picture, `None` when there is no picture to place.
    pub picture_aspect: Option<f64>,
}

/// A single line of text with its top-left corner.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedLine {
    /// Text of the line.
    pub text: String,
    /// Top-left of the line box.
    pub origin: Point,
    /// Measured size.
    pub extent: TextExtent,
}

impl PlacedLine {
    /// Bounding box of the line.
    pub fn rect(&self) -> Rect {
        Rect::new(
            self.origin.x,
            self.origin.y,
            self.origin.x + f64::from(self.extent.width),
            self.origin.y + f64::from(self.extent.height),
        )
    }
}

/// Pixel-aligned destination of the picture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PicturePlacement {
    /// Left edge.
    pub x: u32,
    /// Top edge.
    pub y: u32,
    /// Displayed width.
    pub width: u32,
    /// Displayed height.
    pub height: u32,
}

impl PicturePlacement {
    /// Destination rectangle.
    pub fn rect(&self) -> Rect {
        Rect::new(
            f64::from(self.x),
            f64::from(self.y),
            f64::from(self.x + self.width),
            f64::from(self.y + self.height),
        )
    }
}

/// Geometry of one frame in canvas coordinates (before the border is added).
#[derive(Clone, Debug, PartialEq)]
pub struct FrameLayout {
    /// Title line; `None` for an empty title.
    pub title: Option<PlacedLine>,
    /// Translucent box behind the question.
    pub question_box: Option<Rect>,
    /// Wrapped, centered question lines.
    pub question_lines: Vec<PlacedLine>,
    /// Picture destination; `None` when there is no room or no picture.
    pub picture: Option<PicturePlacement>,
    /// Answer line when it is shown.
    pub answer: Option<PlacedLine>,
    /// The shown answer is wider than the canvas and will be clipped.
    pub answer_clipped: bool,
}

impl FrameLayout {
    /// Lay out one frame.
    ///
    /// The picture slot ends `picture_bottom_gap` above the answer at `inputs.answer_size`, so
    /// an enlarged answer shrinks the picture. Hidden answers still reserve their slot.
    pub fn compute<M: TextMeasure + ?Sized>(
        cfg: &LayoutConfig,
        inputs: &FrameInputs<'_>,
        metrics: &mut M,
    ) -> QuizResult<Self> {
        let canvas_w = f64::from(cfg.canvas.width);

        let mut y = cfg.title_top;
        let title = if inputs.title.trim().is_empty() {
            None
        } else {
            let extent = metrics.extent(FontRole::Title, cfg.title_size, inputs.title)?;
            y += f64::from(extent.height);
            Some(PlacedLine {
                text: inputs.title.to_owned(),
                origin: Point::new(centered(canvas_w, extent.width), cfg.title_top),
                extent,
            })
        };
        y += cfg.space_after_title;

        let wrapped = wrap_text(inputs.question, cfg.text_width() as f32, |s| {
            metrics.width(FontRole::Question, cfg.text_size, s)
        })?;

        let block_top = y;
        let mut question_lines = Vec::with_capacity(wrapped.len());
        for (i, line) in wrapped.into_iter().enumerate() {
            if i > 0 {
                y += cfg.line_spacing;
            }
            let extent = metrics.extent(FontRole::Question, cfg.text_size, &line)?;
            question_lines.push(PlacedLine {
                origin: Point::new(centered(canvas_w, extent.width), y),
                text: line,
                extent,
            });
            y += f64::from(extent.height);
        }

        let question_box = (!question_lines.is_empty()).then(|| {
            Rect::new(
                cfg.side_margin - cfg.box_padding,
                block_top - cfg.box_padding,
                cfg.side_margin + cfg.text_width() + cfg.box_padding,
                y + cfg.box_padding,
            )
        });
        if question_box.is_some() {
            y += cfg.box_padding;
        }
        let slot_top = y + cfg.space_after_text;

        let answer_extent =
            metrics.extent(FontRole::Answer, inputs.answer_size, inputs.answer)?;
        let slot_bottom = answer_top(cfg, answer_extent) - cfg.picture_bottom_gap;
        let picture = inputs.picture_aspect.and_then(|aspect| {
            fit_picture(cfg, aspect, slot_top, slot_bottom - slot_top)
        });
        if inputs.picture_aspect.is_some() && picture.is_none() {
            tracing::warn!(
                slot_top,
                slot_bottom,
                "no room left for the picture; it is not drawn"
            );
        }

        let (answer, answer_clipped) = if inputs.show_answer {
            let clipped = f64::from(answer_extent.width) > canvas_w;
            if clipped {
                tracing::warn!(
                    answer = inputs.answer,
                    width = answer_extent.width,
                    "answer is wider than the canvas and will be clipped"
                );
            }
            let line = PlacedLine {
                text: inputs.answer.to_owned(),
                origin: Point::new(
                    centered(canvas_w, answer_extent.width),
                    answer_top(cfg, answer_extent),
                ),
                extent: answer_extent,
            };
            (Some(line), clipped)
        } else {
            (None, false)
        };

        Ok(Self {
            title,
            question_box,
            question_lines,
            picture,
            answer,
            answer_clipped,
        })
    }
}

fn centered(canvas_w: f64, width: f32) -> f64 {
    (canvas_w - f64::from(width)) / 2.0
}

fn answer_top(cfg: &LayoutConfig, extent: TextExtent) -> f64 {
    f64::from(cfg.canvas.height) - cfg.answer_bottom_margin - f64::from(extent.height)
}

/// Scale the picture to the text width, then shrink it until picture plus its top margin fit
/// in `available` px of height.
fn fit_picture(
    cfg: &LayoutConfig,
    aspect: f64,
    slot_top: f64,
    available: f64,
) -> Option<PicturePlacement> {
    if !aspect.is_finite() || aspect <= 0.0 || !available.is_finite() || available <= 0.0 {
        return None;
    }

    let max_height = available / (1.0 + cfg.picture_margin_ratio);
    let mut width = cfg.text_width();
    let mut height = width / aspect;
    if height > max_height {
        height = max_height;
        width = height * aspect;
    }

    let width = width.floor() as u32;
    let height = height.floor() as u32;
    if width == 0 || height == 0 {
        return None;
    }

    let margin = (f64::from(height) * cfg.picture_margin_ratio).floor();
    Some(PicturePlacement {
        x: cfg.canvas.width.saturating_sub(width) / 2,
        y: (slot_top + margin).round().max(0.0) as u32,
        width,
        height,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/layout/frame.rs"]
mod tests;
