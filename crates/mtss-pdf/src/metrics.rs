//! Text measurement
//!
//! Wrapping decisions depend only on rendered width, so the layout engine
//! takes its metrics through [`TextMeasure`]. Production layout uses the
//! standard Helvetica widths; tests use [`MonospaceMetrics`] for exact,
//! predictable line breaks.

/// Millimetres per PDF point
pub const PT_TO_MM: f32 = 25.4 / 72.0;

/// Width of a text run in millimetres
pub trait TextMeasure {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32;
}

/// Helvetica and Helvetica-Bold advance widths (standard 14 font AFM)
#[derive(Debug, Clone, Copy, Default)]
pub struct HelveticaMetrics;

/// Widths for ASCII 32..=126, in 1/1000 em
const HELVETICA: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556, // 0..?
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556, // P.._
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556, // `..o
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584, // p..~
];

const HELVETICA_BOLD: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278, // ' '../
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611, // 0..?
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778, // @..O
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556, // P.._
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611, // `..o
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584, // p..~
];

impl HelveticaMetrics {
    /// Advance width of one character in 1/1000 em
    pub fn char_units(c: char, bold: bool) -> u16 {
        let table = if bold { &HELVETICA_BOLD } else { &HELVETICA };
        match c {
            ' '..='~' => table[c as usize - 32],
            '\u{a0}' => 278,
            '©' | '®' => 737,
            '•' => 350,
            '–' => 556,
            '—' | '…' => 1000,
            '‘' | '’' if bold => 278,
            '‘' | '’' => 222,
            '“' | '”' if bold => 500,
            '“' | '”' => 333,
            _ => 556,
        }
    }
}

impl TextMeasure for HelveticaMetrics {
    fn text_width(&self, text: &str, size: f32, bold: bool) -> f32 {
        let units: u32 = text
            .chars()
            .map(|c| u32::from(Self::char_units(c, bold)))
            .sum();
        units as f32 / 1000.0 * size * PT_TO_MM
    }
}

/// Every character has the same width: `chars × char_width × size`
#[derive(Debug, Clone, Copy)]
pub struct MonospaceMetrics {
    /// Millimetres per character per point of font size
    pub char_width: f32,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self { char_width: 0.2 }
    }
}

impl TextMeasure for MonospaceMetrics {
    fn text_width(&self, text: &str, size: f32, _bold: bool) -> f32 {
        text.chars().count() as f32 * self.char_width * size
    }
}
