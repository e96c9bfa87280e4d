//! mtss-pdf - paginated PDF output for MTSS resources
//!
//! # Architecture
//!
//! 1. **Blocks** - normalized markdown is split on blank lines and each
//!    block classified as heading, list, table or paragraph
//! 2. **Layout** - blocks are wrapped with bold-aware word wrapping and
//!    placed on A4 pages, with a header band and footer on every page
//! 3. **Writer** - pages are serialized as PDF 1.4 using the built-in
//!    Helvetica faces
//!
//! # Example
//!
//! ```
//! use mtss_pdf::{classify, parse_bold_spans, PdfBlock, TextSpan};
//!
//! assert_eq!(
//!     parse_bold_spans("**Name**: value"),
//!     vec![TextSpan::bold("Name:"), TextSpan::plain(" value")]
//! );
//! assert!(matches!(classify("- one\n- two")[0], PdfBlock::List(_)));
//! ```

pub mod blocks;
pub mod error;
pub mod export;
pub mod layout;
pub mod metrics;
pub mod spans;
pub mod wrap;
pub mod writer;

pub use blocks::{classify, PdfBlock};
pub use error::{PdfError, Result};
pub use export::{
    export_pdf, export_pdf_with, export_preview_pdf, render_pdf, render_pdf_with, ExportOptions,
};
pub use layout::{
    DrawOp, FilledRect, LayoutCursor, LayoutEngine, Margins, Page, PageDecoration, PageGeometry,
    TextRun,
};
pub use metrics::{HelveticaMetrics, MonospaceMetrics, TextMeasure, PT_TO_MM};
pub use spans::{parse_bold_spans, TextSpan};
pub use wrap::{wrap_spans, wrap_text, WrappedLine};
pub use writer::{DocumentInfo, PdfWriter};
