use crate::foundation::error::QuizResult;

/// Greedy word wrap.
///
/// Words are separated by any whitespace. A word is appended to the current line while the
/// measured width of the extended line stays `<= max_width`; otherwise it starts a new line. A
/// single word wider than `max_width` is never split and ends up alone on an over-width line.
///
/// Empty or whitespace-only text yields no lines. Measurement errors abort the wrap.
pub fn wrap_text(
    text: &str,
    max_width: f32,
    mut width_of: impl FnMut(&str) -> QuizResult<f32>,
) -> QuizResult<Vec<String>> {
    let mut acc = LineAccumulator::new(max_width);
    for word in text.split_whitespace() {
        acc.push_word(word, &mut width_of)?;
    }
    Ok(acc.finish())
}

/// What [`LineAccumulator::push_word`] did with a word.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum WordPlacement {
    /// First word of the first line.
    Started,
    /// Appended to the current line.
    Appended,
    /// The current line was finalized and the word starts a new one.
    Broke,
}

/// Incremental form of [`wrap_text`]: feed words one at a time.
#[derive(Clone, Debug)]
pub struct LineAccumulator {
    max_width: f32,
    lines: Vec<String>,
    current: String,
}

impl LineAccumulator {
    /// Empty accumulator wrapping at `max_width`.
    pub fn new(max_width: f32) -> Self {
        Self {
            max_width,
            lines: Vec::new(),
            current: String::new(),
        }
    }

    /// Add one word (must not contain whitespace).
    ///
    /// Over-width words are only logged at debug level here; callers that wrap once per job
    /// report them.
    pub fn push_word(
        &mut self,
        word: &str,
        mut width_of: impl FnMut(&str) -> QuizResult<f32>,
    ) -> QuizResult<WordPlacement> {
        if self.current.is_empty() {
            if width_of(word)? > self.max_width {
                tracing::debug!(word, max_width = self.max_width, "word is wider than a line");
            }
            self.current.push_str(word);
            return Ok(WordPlacement::Started);
        }

        let candidate = format!("{} {word}", self.current);
        if width_of(&candidate)? <= self.max_width {
            self.current = candidate;
            return Ok(WordPlacement::Appended);
        }

        if width_of(word)? > self.max_width {
            tracing::debug!(word, max_width = self.max_width, "word is wider than a line");
        }
        let done = std::mem::replace(&mut self.current, word.to_owned());
        self.lines.push(done);
        Ok(WordPlacement::Broke)
    }

    /// Finalized lines (excluding the one being built).
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Line currently being built.
    pub fn current(&self) -> &str {
        &self.current
    }

    /// All words so far joined by single spaces.
    pub fn text_so_far(&self) -> String {
        self.snapshot().join(" ")
    }

    /// Finalized lines plus the current line.
    pub fn snapshot(&self) -> Vec<String> {
        let mut out = self.lines.clone();
        if !self.current.is_empty() {
            out.push(self.current.clone());
        }
        out
    }

    /// Finalize the current line and return all lines.
    pub fn finish(mut self) -> Vec<String> {
        if !self.current.is_empty() {
            self.lines.push(std::mem::take(&mut self.current));
        }
        self.lines
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/wrap.rs"]
mod tests;
