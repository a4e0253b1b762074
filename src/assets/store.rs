use std::collections::HashMap;
use std::sync::Arc;

use crate::foundation::error::{QuizError, QuizResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
/// RGBA8 brush color used by Parley text layout.
pub struct TextBrushRgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

/// Which of the three configured fonts a piece of text is set in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FontRole {
    /// Title at the top of the frame.
    Title,
    /// Question text inside the translucent box.
    Question,
    /// Answer line near the bottom.
    Answer,
}

/// Measured size of a single unwrapped line of text.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct TextExtent {
    /// Advance width in pixels.
    pub width: f32,
    /// Line box height in pixels.
    pub height: f32,
}

/// Font metric provider used by wrapping and frame layout.
pub trait TextMeasure {
    /// Measure `text` set on one line in the font for `role` at `size_px`.
    fn extent(&mut self, role: FontRole, size_px: f32, text: &str) -> QuizResult<TextExtent>;

    /// Advance width of `text` on one line.
    fn width(&mut self, role: FontRole, size_px: f32, text: &str) -> QuizResult<f32> {
        Ok(self.extent(role, size_px, text)?.width)
    }
}

pub(crate) type TextLayout = parley::Layout<TextBrushRgba8>;

struct RegisteredFont {
    family: String,
    data: vello_cpu::peniko::FontData,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct LayoutKey {
    role: FontRole,
    size_bits: u32,
    brush: TextBrushRgba8,
    text: String,
}

/// Parley-backed text shaper holding one registered font per [`FontRole`].
///
/// Layouts are cached by `(role, size, color, text)`; the cache never changes output.
pub struct TextLayoutEngine {
    font_ctx: parley::FontContext,
    layout_ctx: parley::LayoutContext<TextBrushRgba8>,
    fonts: HashMap<FontRole, RegisteredFont>,
    layouts: HashMap<LayoutKey, Arc<TextLayout>>,
}

impl Default for TextLayoutEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TextLayoutEngine {
    /// Construct a new layout engine with fresh Parley contexts and no fonts.
    pub fn new() -> Self {
        Self {
            font_ctx: parley::FontContext::default(),
            layout_ctx: parley::LayoutContext::new(),
            fonts: HashMap::new(),
            layouts: HashMap::new(),
        }
    }

    /// Register raw font bytes (TTF/OTF) for `role` and return the resolved family name.
    pub fn register_font(&mut self, role: FontRole, font_bytes: Vec<u8>) -> QuizResult<String> {
        let families = self
            .font_ctx
            .collection
            .register_fonts(parley::fontique::Blob::from(font_bytes.clone()), None);
        let family_id = families
            .first()
            .map(|(id, _)| *id)
            .ok_or_else(|| QuizError::asset(format!("no font family found for {role:?} font")))?;

        let family = self
            .font_ctx
            .collection
            .family_name(family_id)
            .ok_or_else(|| QuizError::asset("registered font family has no name"))?
            .to_string();

        let data = vello_cpu::peniko::FontData::new(vello_cpu::peniko::Blob::from(font_bytes), 0);
        self.fonts.insert(
            role,
            RegisteredFont {
                family: family.clone(),
                data,
            },
        );
        self.layouts.retain(|k, _| k.role != role);
        Ok(family)
    }

    /// Family name registered for `role`, if any.
    pub fn family_name(&self, role: FontRole) -> Option<&str> {
        self.fonts.get(&role).map(|f| f.family.as_str())
    }

    pub(crate) fn font_data(&self, role: FontRole) -> QuizResult<&vello_cpu::peniko::FontData> {
        self.fonts
            .get(&role)
            .map(|f| &f.data)
            .ok_or_else(|| QuizError::asset(format!("no font registered for {role:?}")))
    }

    /// Shape `text` on a single line (no wrapping).
    pub(crate) fn layout_line(
        &mut self,
        role: FontRole,
        text: &str,
        size_px: f32,
        brush: TextBrushRgba8,
    ) -> QuizResult<Arc<TextLayout>> {
        if !size_px.is_finite() || size_px <= 0.0 {
            return Err(QuizError::validation(
                "text size_px must be finite and > 0",
            ));
        }

        let key = LayoutKey {
            role,
            size_bits: size_px.to_bits(),
            brush,
            text: text.to_owned(),
        };
        if let Some(layout) = self.layouts.get(&key) {
            return Ok(Arc::clone(layout));
        }

        let family = self
            .fonts
            .get(&role)
            .map(|f| f.family.clone())
            .ok_or_else(|| QuizError::asset(format!("no font registered for {role:?}")))?;

        let mut builder = self
            .layout_ctx
            .ranged_builder(&mut self.font_ctx, text, 1.0, true);
        builder.push_default(parley::style::StyleProperty::FontStack(
            parley::style::FontStack::Source(std::borrow::Cow::Owned(family)),
        ));
        builder.push_default(parley::style::StyleProperty::FontSize(size_px));
        builder.push_default(parley::style::StyleProperty::Brush(brush));

        let mut layout: TextLayout = builder.build(text);
        layout.break_all_lines(None);

        let layout = Arc::new(layout);
        self.layouts.insert(key, Arc::clone(&layout));
        Ok(layout)
    }
}

impl TextMeasure for TextLayoutEngine {
    fn extent(&mut self, role: FontRole, size_px: f32, text: &str) -> QuizResult<TextExtent> {
        let layout = self.layout_line(role, text, size_px, TextBrushRgba8::default())?;
        Ok(TextExtent {
            width: layout.width(),
            height: layout.height(),
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/store.rs"]
mod tests;
