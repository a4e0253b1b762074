use crate::assets::color::ColorDef;
use crate::config::GradientDirection;
use crate::foundation::error::{QuizError, QuizResult};
use crate::foundation::math::{lerp_u8, premultiply_rgba8_in_place};

/// Linear gradient from `start` to `end` along `direction`, as premultiplied RGBA8.
///
/// Position `p` along an axis of length `n` uses `t = p / n`, so the last row (or column) is one
/// step short of `end`.
pub fn gradient_rgba8_premul(
    width: u32,
    height: u32,
    start: ColorDef,
    end: ColorDef,
    direction: GradientDirection,
) -> QuizResult<Vec<u8>> {
    if width == 0 || height == 0 {
        return Err(QuizError::validation(
            "gradient width/height must be non-zero",
        ));
    }

    let w = width as usize;
    let h = height as usize;
    let extent = match direction {
        GradientDirection::Vertical => h,
        GradientDirection::Horizontal => w,
    };
    let steps: Vec<[u8; 4]> = (0..extent)
        .map(|p| {
            let t = (p as f32) / (extent as f32);
            [
                lerp_u8(start.r, end.r, t),
                lerp_u8(start.g, end.g, t),
                lerp_u8(start.b, end.b, t),
                lerp_u8(start.a, end.a, t),
            ]
        })
        .collect();

    let mut bytes = vec![0u8; w * h * 4];
    match direction {
        GradientDirection::Vertical => {
            for (row, c) in bytes.chunks_exact_mut(w * 4).zip(&steps) {
                for px in row.chunks_exact_mut(4) {
                    px.copy_from_slice(c);
                }
            }
        }
        GradientDirection::Horizontal => {
            for row in bytes.chunks_exact_mut(w * 4) {
                for (px, c) in row.chunks_exact_mut(4).zip(&steps) {
                    px.copy_from_slice(c);
                }
            }
        }
    }

    premultiply_rgba8_in_place(&mut bytes);
    Ok(bytes)
}
