use std::collections::HashMap;
use std::sync::Arc;

use crate::assets::color::ColorDef;
use crate::assets::prepared::PreparedAssets;
use crate::assets::store::{FontRole, TextBrushRgba8};
use crate::config::LayoutConfig;
use crate::foundation::core::{Point, Rect};
use crate::foundation::error::{QuizError, QuizResult};
use crate::foundation::math::premul_channel;
use crate::layout::frame::{FrameInputs, FrameLayout, PicturePlacement};
use crate::render::background::gradient_rgba8_premul;
use crate::render::backend::{FrameRGBA, FrameRenderer};
use crate::timeline::FrameSpec;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
struct PictureKey {
    index: usize,
    width: u32,
    height: u32,
}

/// vello_cpu rasterizer for quiz frames.
///
/// Holds the job's fonts, pictures and the precomputed gradient. Scaled pictures are cached per
/// displayed size; caches never change output, so the same [`FrameSpec`] always yields the same
/// pixels.
pub struct FrameComposer {
    layout: LayoutConfig,
    title: String,
    answer: String,
    assets: PreparedAssets,
    width: u16,
    height: u16,
    background: vello_cpu::Image,
    picture_cache: HashMap<PictureKey, vello_cpu::Image>,
}

impl FrameComposer {
    /// Create a composer drawing `title` and `answer` with `assets`.
    pub fn new(
        layout: LayoutConfig,
        title: impl Into<String>,
        answer: impl Into<String>,
        assets: PreparedAssets,
    ) -> QuizResult<Self> {
        let width: u16 = layout
            .canvas
            .width
            .try_into()
            .map_err(|_| QuizError::validation("canvas width exceeds u16"))?;
        let height: u16 = layout
            .canvas
            .height
            .try_into()
            .map_err(|_| QuizError::validation("canvas height exceeds u16"))?;

        let gradient = gradient_rgba8_premul(
            layout.canvas.width,
            layout.canvas.height,
            layout.gradient_start,
            layout.gradient_end,
            layout.gradient_direction,
        )?;
        let background = image_paint(pixmap_from_premul_rgba8(
            &gradient,
            layout.canvas.width,
            layout.canvas.height,
        )?);

        Ok(Self {
            layout,
            title: title.into(),
            answer: answer.into(),
            assets,
            width,
            height,
            background,
            picture_cache: HashMap::new(),
        })
    }

    /// Geometry of the frame described by `spec`.
    pub fn layout(&mut self, spec: &FrameSpec) -> QuizResult<FrameLayout> {
        let picture_aspect = self.picture_index(spec).and_then(|i| {
            self.assets
                .pictures
                .get(i)
                .and_then(|p| p.aspect_ratio())
        });
        let inputs = FrameInputs {
            title: &self.title,
            question: &spec.question,
            answer: &self.answer,
            show_answer: spec.show_answer,
            answer_size: spec.answer_size,
            picture_aspect,
        };
        FrameLayout::compute(&self.layout, &inputs, &mut self.assets.text)
    }

    /// Draw the canvas (no border) as premultiplied RGBA8.
    pub fn compose_canvas(&mut self, spec: &FrameSpec) -> QuizResult<Vec<u8>> {
        let frame = self.layout(spec)?;
        let text_brush = brush(self.layout.text_color);

        let mut ctx = vello_cpu::RenderContext::new(self.width, self.height);
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);

        ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
        ctx.set_paint(self.background.clone());
        ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
            0.0,
            0.0,
            f64::from(self.width),
            f64::from(self.height),
        ));

        if let Some(title) = &frame.title {
            self.draw_line(
                &mut ctx,
                FontRole::Title,
                self.layout.title_size,
                &title.text,
                title.origin,
                text_brush,
            )?;
        }

        if let Some(rect) = frame.question_box {
            let c = self.layout.box_color;
            ctx.set_transform(vello_cpu::kurbo::Affine::IDENTITY);
            ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(c.r, c.g, c.b, c.a));
            ctx.fill_rect(&rect_to_cpu(rect));
        }

        for line in &frame.question_lines {
            self.draw_line(
                &mut ctx,
                FontRole::Question,
                self.layout.text_size,
                &line.text,
                line.origin,
                text_brush,
            )?;
        }

        if let (Some(placement), Some(index)) = (frame.picture, self.picture_index(spec)) {
            let paint = self.picture_paint(index, placement)?;
            ctx.set_transform(vello_cpu::kurbo::Affine::translate((
                f64::from(placement.x),
                f64::from(placement.y),
            )));
            ctx.set_paint(paint);
            ctx.fill_rect(&vello_cpu::kurbo::Rect::new(
                0.0,
                0.0,
                f64::from(placement.width),
                f64::from(placement.height),
            ));
        }

        if let Some(answer) = &frame.answer {
            self.draw_line(
                &mut ctx,
                FontRole::Answer,
                spec.answer_size,
                &answer.text,
                answer.origin,
                text_brush,
            )?;
        }

        let mut pixmap = vello_cpu::Pixmap::new(self.width, self.height);
        ctx.flush();
        ctx.render_to_pixmap(&mut pixmap);
        Ok(pixmap.data_as_u8_slice().to_vec())
    }

    fn picture_index(&self, spec: &FrameSpec) -> Option<usize> {
        let n = self.assets.pictures.len();
        (n > 0).then(|| spec.picture % n)
    }

    fn draw_line(
        &mut self,
        ctx: &mut vello_cpu::RenderContext,
        role: FontRole,
        size_px: f32,
        text: &str,
        origin: Point,
        brush: TextBrushRgba8,
    ) -> QuizResult<()> {
        let layout = self.assets.text.layout_line(role, text, size_px, brush)?;
        let font = self.assets.text.font_data(role)?.clone();

        ctx.set_transform(vello_cpu::kurbo::Affine::translate((origin.x, origin.y)));
        for line in layout.lines() {
            for item in line.items() {
                let parley::layout::PositionedLayoutItem::GlyphRun(run) = item else {
                    continue;
                };

                let b = run.style().brush;
                ctx.set_paint(vello_cpu::peniko::Color::from_rgba8(b.r, b.g, b.b, b.a));

                let glyphs = run.positioned_glyphs().map(|g| vello_cpu::Glyph {
                    id: g.id,
                    x: g.x,
                    y: g.y,
                });
                ctx.glyph_run(&font)
                    .font_size(run.run().font_size())
                    .fill_glyphs(glyphs);
            }
        }
        Ok(())
    }

    fn picture_paint(
        &mut self,
        index: usize,
        placement: PicturePlacement,
    ) -> QuizResult<vello_cpu::Image> {
        let key = PictureKey {
            index,
            width: placement.width,
            height: placement.height,
        };
        if let Some(paint) = self.picture_cache.get(&key) {
            return Ok(paint.clone());
        }

        let picture = self
            .assets
            .pictures
            .get(index)
            .ok_or_else(|| QuizError::asset(format!("picture index {index} out of range")))?;
        let rgba8_premul = picture.scaled_premul(placement.width, placement.height)?;
        let paint = image_paint(pixmap_from_premul_rgba8(
            &rgba8_premul,
            placement.width,
            placement.height,
        )?);

        self.picture_cache.insert(key, paint.clone());
        Ok(paint)
    }
}

impl FrameRenderer for FrameComposer {
    fn output_size(&self) -> (u32, u32) {
        let out = self.layout.output_canvas();
        (out.width, out.height)
    }

    fn render(&mut self, spec: &FrameSpec) -> QuizResult<FrameRGBA> {
        let canvas = self.compose_canvas(spec)?;
        Ok(add_border(
            &canvas,
            u32::from(self.width),
            u32::from(self.height),
            self.layout.border_width,
            self.layout.border_color,
        ))
    }
}

/// Surround a premultiplied canvas with a solid `border` px frame of `color`.
pub fn add_border(canvas: &[u8], width: u32, height: u32, border: u32, color: ColorDef) -> FrameRGBA {
    let out_w = width + 2 * border;
    let out_h = height + 2 * border;
    let fill = [
        premul_channel(color.r, color.a),
        premul_channel(color.g, color.a),
        premul_channel(color.b, color.a),
        color.a,
    ];

    let mut data = Vec::with_capacity(out_w as usize * out_h as usize * 4);
    for _ in 0..(out_w as usize * out_h as usize) {
        data.extend_from_slice(&fill);
    }

    let row_bytes = width as usize * 4;
    let out_row_bytes = out_w as usize * 4;
    for (y, src) in canvas.chunks_exact(row_bytes).take(height as usize).enumerate() {
        let start = (y + border as usize) * out_row_bytes + border as usize * 4;
        data[start..start + row_bytes].copy_from_slice(src);
    }

    FrameRGBA {
        width: out_w,
        height: out_h,
        data,
        premultiplied: true,
    }
}

fn brush(c: ColorDef) -> TextBrushRgba8 {
    TextBrushRgba8 {
        r: c.r,
        g: c.g,
        b: c.b,
        a: c.a,
    }
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

fn image_paint(pixmap: vello_cpu::Pixmap) -> vello_cpu::Image {
    vello_cpu::Image {
        image: vello_cpu::ImageSource::Pixmap(Arc::new(pixmap)),
        sampler: vello_cpu::peniko::ImageSampler::default(),
    }
}

fn pixmap_from_premul_rgba8(
    rgba8_premul: &[u8],
    width: u32,
    height: u32,
) -> QuizResult<vello_cpu::Pixmap> {
    let w: u16 = width
        .try_into()
        .map_err(|_| QuizError::validation("image width exceeds u16"))?;
    let h: u16 = height
        .try_into()
        .map_err(|_| QuizError::validation("image height exceeds u16"))?;
    if rgba8_premul.len() != width as usize * height as usize * 4 {
        return Err(QuizError::validation("image byte length mismatch"));
    }

    let mut may_have_opacities = false;
    let pixels = rgba8_premul
        .chunks_exact(4)
        .map(|px| {
            may_have_opacities |= px[3] != 255;
            vello_cpu::peniko::color::PremulRgba8 {
                r: px[0],
                g: px[1],
                b: px[2],
                a: px[3],
            }
        })
        .collect();

    Ok(vello_cpu::Pixmap::from_parts_with_opacity(
        pixels,
        w,
        h,
        may_have_opacities,
    ))
}
