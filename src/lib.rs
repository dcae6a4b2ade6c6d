//! # fontaudit
//!
//! Font embedding audit for PowerPoint presentations.
//!
//! This library inspects a .pptx package and reports font-rendering risk
//! before the document reaches a renderer that cannot substitute missing
//! fonts: which typefaces are declared as embedded versus actually requested
//! by slide content, which paragraphs and runs request no typeface at all,
//! and whether the style variants runs ask for (bold, italic, bold-italic)
//! are present among the embedded variants.
//!
//! ## Quick Start
//!
//! ```no_run
//! use fontaudit::audit_file;
//!
//! let report = audit_file("deck.pptx")?;
//! println!("Embedded: {:?}", report.embedded_typefaces);
//! if report.has_unknown_requested() {
//!     eprintln!("Not embedded: {:?}", report.unknown_requested);
//! }
//! # Ok::<(), fontaudit::Error>(())
//! ```
//!
//! ## Auditing in-memory packages
//!
//! ```no_run
//! use fontaudit::audit_bytes;
//!
//! let data = std::fs::read("deck.pptx")?;
//! let report = audit_bytes(&data)?;
//! let json = serde_json::to_string_pretty(&report).unwrap();
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The report is a deterministic function of the package bytes: auditing the
//! same bytes twice yields identical serialized output.

pub mod audit;
pub mod catalog;
pub mod container;
pub mod error;
pub mod model;
pub mod slides;
pub mod sniff;
pub mod theme;

// Re-exports
pub use catalog::FontCatalog;
pub use container::{PptxContainer, SlidePartName};
pub use error::{Error, Result};
pub use model::{
    AuditReport, CountMap, EmbeddedFontEntry, FontBinaryEntry, FontStyle, MissingParagraph,
    MissingRunCounts, StyleFlags, StyleUsage, StyleViolation, SummaryCounts, ThemeFonts,
};

use std::path::Path;

/// Audit a .pptx package file and return the report.
///
/// # Example
///
/// ```no_run
/// use fontaudit::audit_file;
///
/// let report = audit_file("deck.pptx")?;
/// println!("Unknown requested: {}", report.unknown_requested.len());
/// # Ok::<(), fontaudit::Error>(())
/// ```
pub fn audit_file(path: impl AsRef<Path>) -> Result<AuditReport> {
    let path = path.as_ref();
    let container = PptxContainer::open(path)?;
    let mut report = audit::audit_container(&container)?;
    report.source_path = Some(path.display().to_string());
    Ok(report)
}

/// Audit a .pptx package from bytes.
///
/// # Example
///
/// ```no_run
/// use fontaudit::audit_bytes;
///
/// let data = std::fs::read("deck.pptx")?;
/// let report = audit_bytes(&data)?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn audit_bytes(data: &[u8]) -> Result<AuditReport> {
    let container = PptxContainer::from_bytes(data.to_vec())?;
    audit::audit_container(&container)
}
