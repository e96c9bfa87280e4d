//! Bold-aware word wrapping
//!
//! Words are measured in the weight of the span they come from and
//! accumulated until the next word would push the line past its width. A
//! line whose width equals the limit still fits. A single word wider than
//! the limit gets a line of its own.

use crate::metrics::TextMeasure;
use crate::spans::TextSpan;

/// One wrapped line: consecutive segments with their weights
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WrappedLine {
    pub segments: Vec<TextSpan>,
    /// Rendered width in millimetres
    pub width: f32,
}

impl WrappedLine {
    pub fn text(&self) -> String {
        self.segments.iter().map(|s| s.text.as_str()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    fn push(&mut self, text: &str, bold: bool, width: f32) {
        match self.segments.last_mut() {
            Some(last) if last.bold == bold => last.text.push_str(text),
            _ => self.segments.push(TextSpan {
                text: text.to_string(),
                bold,
            }),
        }
        self.width += width;
    }
}

/// A word and whether whitespace separated it from the previous word
struct Word<'a> {
    text: &'a str,
    bold: bool,
    spaced: bool,
}

fn words(spans: &[TextSpan]) -> Vec<Word<'_>> {
    let mut words = Vec::new();
    let mut pending_space = false;
    for span in spans {
        for (i, piece) in span.text.split(char::is_whitespace).enumerate() {
            if i > 0 {
                pending_space = true;
            }
            if piece.is_empty() {
                continue;
            }
            words.push(Word {
                text: piece,
                bold: span.bold,
                spaced: pending_space,
            });
            pending_space = false;
        }
    }
    words
}

/// Wrap spans at `size` points
///
/// The first line may be `first_width` wide and every following line
/// `rest_width`, which lets callers indent continuation lines.
pub fn wrap_spans(
    spans: &[TextSpan],
    metrics: &dyn TextMeasure,
    size: f32,
    first_width: f32,
    rest_width: f32,
) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut line = WrappedLine::default();

    for word in words(spans) {
        let max_width = if lines.is_empty() {
            first_width
        } else {
            rest_width
        };

        if line.is_empty() {
            let w = metrics.text_width(word.text, size, word.bold);
            line.push(word.text, word.bold, w);
            continue;
        }

        let piece = if word.spaced {
            format!(" {}", word.text)
        } else {
            word.text.to_string()
        };
        let w = metrics.text_width(&piece, size, word.bold);

        if line.width + w > max_width {
            lines.push(std::mem::take(&mut line));
            let w = metrics.text_width(word.text, size, word.bold);
            line.push(word.text, word.bold, w);
        } else {
            line.push(&piece, word.bold, w);
        }
    }

    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Wrap plain text in a single weight
pub fn wrap_text(
    text: &str,
    metrics: &dyn TextMeasure,
    size: f32,
    bold: bool,
    width: f32,
) -> Vec<WrappedLine> {
    let span = TextSpan {
        text: text.to_string(),
        bold,
    };
    wrap_spans(&[span], metrics, size, width, width)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;
    use crate::spans::parse_bold_spans;

    /// 1mm per character at size 1
    const MONO: MonospaceMetrics = MonospaceMetrics { char_width: 1.0 };

    fn texts(lines: &[WrappedLine]) -> Vec<String> {
        lines.iter().map(WrappedLine::text).collect()
    }

    #[test]
    fn test_exact_fit_stays_on_line() {
        // "aaaa bbbb" is exactly 9 wide
        let lines = wrap_text("aaaa bbbb cc", &MONO, 1.0, false, 9.0);
        assert_eq!(texts(&lines), vec!["aaaa bbbb", "cc"]);
        assert_eq!(lines[0].width, 9.0);
    }

    #[test]
    fn test_overflow_breaks_before_word() {
        let lines = wrap_text("aaaa bbbb cc", &MONO, 1.0, false, 8.0);
        assert_eq!(texts(&lines), vec!["aaaa", "bbbb cc"]);
    }

    #[test]
    fn test_long_word_gets_own_line() {
        let lines = wrap_text("a supercalifragilistic b", &MONO, 1.0, false, 5.0);
        assert_eq!(texts(&lines), vec!["a", "supercalifragilistic", "b"]);
    }

    #[test]
    fn test_bold_segments_are_kept() {
        let spans = parse_bold_spans("**Name**: value here");
        let lines = wrap_spans(&spans, &MONO, 1.0, 100.0, 100.0);
        assert_eq!(lines.len(), 1);
        assert_eq!(
            lines[0].segments,
            vec![TextSpan::bold("Name:"), TextSpan::plain(" value here")]
        );
    }

    #[test]
    fn test_no_space_inserted_between_adjacent_spans() {
        let spans = parse_bold_spans("**Tier**2");
        let lines = wrap_spans(&spans, &MONO, 1.0, 100.0, 100.0);
        assert_eq!(lines[0].text(), "Tier2");
    }

    #[test]
    fn test_continuation_width() {
        // First line 10 wide, then 5
        let lines = wrap_spans(
            &[TextSpan::plain("aaaa bbbb cccc dddd")],
            &MONO,
            1.0,
            10.0,
            5.0,
        );
        assert_eq!(texts(&lines), vec!["aaaa bbbb", "cccc", "dddd"]);
    }

    #[test]
    fn test_blank_input_has_no_lines() {
        assert!(wrap_text("   ", &MONO, 1.0, false, 10.0).is_empty());
    }
}
