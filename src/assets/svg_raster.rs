use crate::foundation::error::{QuizError, QuizResult};

// Beyond this the picture would be larger than any sane output canvas.
const MAX_DIM: u32 = 16_384;

/// Rasterize `tree` stretched to `width` x `height`, returning premultiplied RGBA8.
pub fn rasterize_svg_to_premul_rgba8(
    tree: &usvg::Tree,
    width: u32,
    height: u32,
) -> QuizResult<Vec<u8>> {
    if width > MAX_DIM || height > MAX_DIM {
        return Err(QuizError::validation(format!(
            "svg raster size too large: {width}x{height} (max {MAX_DIM}x{MAX_DIM})"
        )));
    }
    let size = tree.size();
    if !(size.width() > 0.0 && size.height() > 0.0) {
        return Err(QuizError::asset("svg has invalid width/height"));
    }

    let mut pixmap = resvg::tiny_skia::Pixmap::new(width, height)
        .ok_or_else(|| QuizError::encode("failed to allocate svg pixmap"))?;

    let sx = (width as f32) / size.width();
    let sy = (height as f32) / size.height();
    resvg::render(
        tree,
        resvg::tiny_skia::Transform::from_scale(sx, sy),
        &mut pixmap.as_mut(),
    );
    Ok(pixmap.take())
}
