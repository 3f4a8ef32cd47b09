//! Strategies that split text into chunks at line break opportunities.
//!
//! The line assembler never looks inside a chunk: a chunk is placed on a line
//! as a whole or moved to the next one. Strategies therefore decide the atomic
//! units of wrapping.

use unicode_linebreak::{BreakOpportunity, linebreaks};

/// Contiguous run of text ending at a break opportunity.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BreakTextChunk<'a> {
    pub text: &'a str,
    /// `true` only when the break is forced by the text itself, e.g. a newline.
    pub is_hard_break: bool,
}

impl<'a> BreakTextChunk<'a> {
    pub fn new(text: &'a str, is_hard_break: bool) -> Self {
        Self {
            text,
            is_hard_break,
        }
    }
}

/// A line breaking strategy.
///
/// Every call produces a fresh iterator over the input, and the chunks
/// concatenate back to the original text.
pub trait BreakText {
    fn break_text<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = BreakTextChunk<'a>> + 'a>;
}

/// Never breaks: the whole text is one soft chunk.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct NeverBreak;

/// Breaks at Unicode (UAX #14) line break opportunities.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IcuLineBreak;

impl BreakText for NeverBreak {
    fn break_text<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = BreakTextChunk<'a>> + 'a> {
        Box::new(break_text_never(text))
    }
}

impl BreakText for IcuLineBreak {
    fn break_text<'a>(&self, text: &'a str) -> Box<dyn Iterator<Item = BreakTextChunk<'a>> + 'a> {
        Box::new(break_text_icu_line(text))
    }
}

/// Emits `text` as a single soft chunk, or nothing when it is empty.
pub fn break_text_never(text: &str) -> impl Iterator<Item = BreakTextChunk<'_>> {
    (!text.is_empty())
        .then(|| BreakTextChunk::new(text, false))
        .into_iter()
}

/// Emits one chunk per line break opportunity.
///
/// A chunk is hard when the opportunity is mandatory and the chunk ends with a
/// line terminator. The implicit mandatory break at the end of the text is
/// soft unless the text itself ends with a terminator.
pub fn break_text_icu_line(text: &str) -> impl Iterator<Item = BreakTextChunk<'_>> {
    let mut start = 0;
    linebreaks(text).filter_map(move |(end, opportunity)| {
        let chunk = &text[start..end];
        start = end;

        if chunk.is_empty() {
            return None;
        }

        let is_hard_break = matches!(opportunity, BreakOpportunity::Mandatory)
            && chunk.ends_with(is_line_terminator);
        Some(BreakTextChunk::new(chunk, is_hard_break))
    })
}

/// Characters that force a line break (UAX #14 classes BK, CR, LF and NL).
pub fn is_line_terminator(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\u{000B}' | '\u{000C}' | '\u{0085}' | '\u{2028}' | '\u{2029}'
    )
}
