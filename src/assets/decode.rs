use std::sync::Arc;

use anyhow::Context;

use crate::assets::svg_raster::rasterize_svg_to_premul_rgba8;
use crate::foundation::error::{QuizError, QuizResult};
use crate::foundation::math::premultiply_rgba8_in_place;

/// Decoded raster picture, premultiplied RGBA8.
#[derive(Clone, Debug)]
pub struct PreparedImage {
    /// Premultiplied pixels; channel layout is plain RGBA8.
    pub rgba8_premul: Arc<image::RgbaImage>,
}

/// Parsed SVG picture.
#[derive(Clone, Debug)]
pub struct PreparedSvg {
    /// Parsed SVG tree.
    pub tree: Arc<usvg::Tree>,
}

/// An illustrative picture ready to be scaled into a frame.
#[derive(Clone, Debug)]
pub enum Picture {
    /// PNG, JPEG, WebP, ... decoded through `image`.
    Raster(PreparedImage),
    /// Vector picture rasterized on demand at the displayed size.
    Svg(PreparedSvg),
}

impl Picture {
    /// Natural size in pixels (SVG: its declared viewport).
    pub fn natural_size(&self) -> (f64, f64) {
        match self {
            Self::Raster(img) => (
                f64::from(img.rgba8_premul.width()),
                f64::from(img.rgba8_premul.height()),
            ),
            Self::Svg(svg) => {
                let size = svg.tree.size();
                (f64::from(size.width()), f64::from(size.height()))
            }
        }
    }

    /// Width / height; `None` for degenerate pictures.
    pub fn aspect_ratio(&self) -> Option<f64> {
        let (w, h) = self.natural_size();
        (w.is_finite() && h.is_finite() && w > 0.0 && h > 0.0).then(|| w / h)
    }

    /// Premultiplied RGBA8 pixels scaled to exactly `width` x `height`.
    pub fn scaled_premul(&self, width: u32, height: u32) -> QuizResult<Vec<u8>> {
        if width == 0 || height == 0 {
            return Err(QuizError::validation("picture target size must be non-zero"));
        }
        match self {
            Self::Raster(img) => {
                let src = img.rgba8_premul.as_ref();
                if src.width() == width && src.height() == height {
                    return Ok(src.as_raw().clone());
                }
                let scaled = image::imageops::resize(
                    src,
                    width,
                    height,
                    image::imageops::FilterType::Triangle,
                );
                Ok(scaled.into_raw())
            }
            Self::Svg(svg) => rasterize_svg_to_premul_rgba8(&svg.tree, width, height),
        }
    }
}

/// Decode a raster image from memory into premultiplied RGBA8.
pub fn decode_image(bytes: &[u8]) -> QuizResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let mut rgba = dyn_img.to_rgba8();
    premultiply_rgba8_in_place(&mut rgba);

    Ok(PreparedImage {
        rgba8_premul: Arc::new(rgba),
    })
}

/// Parse an SVG document.
pub fn parse_svg(bytes: &[u8]) -> QuizResult<PreparedSvg> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_data(bytes, &opts).context("parse svg tree")?;
    Ok(PreparedSvg {
        tree: Arc::new(tree),
    })
}

/// Decode picture bytes, picking SVG or raster by file extension.
pub fn decode_picture(bytes: &[u8], extension: Option<&str>) -> QuizResult<Picture> {
    let is_svg = extension.is_some_and(|e| e.eq_ignore_ascii_case("svg"));
    if is_svg {
        Ok(Picture::Svg(parse_svg(bytes)?))
    } else {
        Ok(Picture::Raster(decode_image(bytes)?))
    }
}
