use crate::foundation::error::QuizResult;
use crate::timeline::FrameSpec;

#[derive(Clone, Debug, PartialEq, Eq)]
/// CPU-side RGBA8 frame buffer.
pub struct FrameRGBA {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Tightly packed RGBA8 bytes (`width * height * 4`).
    pub data: Vec<u8>,
    /// Whether color channels are premultiplied by alpha.
    pub premultiplied: bool,
}

/// Something that turns a [`FrameSpec`] into pixels.
///
/// Output frames of one renderer all share the same size.
pub trait FrameRenderer {
    /// `(width, height)` of every frame this renderer produces.
    fn output_size(&self) -> (u32, u32);

    /// Compose one frame.
    fn render(&mut self, spec: &FrameSpec) -> QuizResult<FrameRGBA>;
}

impl<R: FrameRenderer + ?Sized> FrameRenderer for &mut R {
    fn output_size(&self) -> (u32, u32) {
        (**self).output_size()
    }

    fn render(&mut self, spec: &FrameSpec) -> QuizResult<FrameRGBA> {
        (**self).render(spec)
    }
}
