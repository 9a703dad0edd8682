//! Lower-cased view of a SKU that can map spans back to the original.

use super::Span;

pub(crate) struct LoweredText {
    lower: String,
    /// Original byte offset for every byte of `lower`, plus one past the end.
    /// `None` when lower-casing kept every character's byte length.
    offsets: Option<Vec<usize>>,
}

impl LoweredText {
    pub(crate) fn new(original: &str) -> Self {
        let mut lower = String::with_capacity(original.len());
        let mut offsets = Vec::with_capacity(original.len() + 1);
        let mut same_layout = true;

        for (pos, ch) in original.char_indices() {
            let before = lower.len();
            lower.extend(ch.to_lowercase());
            let written = lower.len() - before;
            same_layout &= written == ch.len_utf8();
            offsets.extend(std::iter::repeat_n(pos, written));
        }
        offsets.push(original.len());

        Self {
            lower,
            offsets: if same_layout { None } else { Some(offsets) },
        }
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.lower
    }

    /// Translate a span of the lower-cased text into the original text.
    pub(crate) fn original_span(&self, span: Span) -> Span {
        match &self.offsets {
            None => span,
            Some(offsets) => (offsets[span.0], offsets[span.1]),
        }
    }
}
