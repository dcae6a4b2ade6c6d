//! Audit report model.
//!
//! The report is a pure value: a deterministic function of the package bytes.
//! Every aggregated mapping is normalized to `(-count, key)` order before the
//! report is built, so serializing the same package twice yields identical
//! output.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, HashMap};

use crate::model::fonts::{FontStyle, StyleFlags};

/// Typeface occurrence counts, ordered by descending count then name.
///
/// Serializes as a JSON object whose key order is the normalized order; the
/// ordering is part of the report's determinism contract, which is why this
/// is not a plain `HashMap`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountMap {
    entries: Vec<(String, u64)>,
}

impl CountMap {
    /// Normalize an unordered counter into `(-count, key)` order.
    pub fn from_counter(counter: HashMap<String, u64>) -> Self {
        let mut entries: Vec<(String, u64)> = counter.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        Self { entries }
    }

    /// Count for a key, if present.
    pub fn get(&self, key: &str) -> Option<u64> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| *v)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate entries in normalized order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Keys in normalized order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// A `"Name:count, ..."` summary of the top entries.
    pub fn top_items(&self, limit: usize) -> String {
        self.entries
            .iter()
            .take(limit)
            .map(|(k, v)| format!("{}:{}", k, v))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Serialize for CountMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, count) in &self.entries {
            map.serialize_entry(key, count)?;
        }
        map.end()
    }
}

/// One declared embedded-font binary slot with its enrichment metadata.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FontBinaryEntry {
    /// Typeface of the declaring embedded-font entry.
    pub typeface: Option<String>,
    /// Style variant the slot declares.
    pub style: FontStyle,
    /// Relationship id referenced by the slot, if any.
    pub rel_id: Option<String>,
    /// Resolved part name of the font program, if the relationship resolved.
    pub part_name: Option<String>,
    /// Name strings sniffed from the font program bytes.
    pub name_strings: Vec<String>,
}

/// Counts of runs and paragraphs that request no typeface at all.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct MissingRunCounts {
    pub runs: u64,
    pub paragraphs: u64,
    pub total: u64,
}

/// Location record for a nonempty paragraph without typeface coverage.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct MissingParagraph {
    /// Part name of the slide.
    pub slide_file: String,
    /// 1-based slide index from the part name.
    pub slide_index: u32,
    /// 1-based index among the slide's text-bearing shapes.
    pub shape_index: usize,
    pub shape_id: Option<String>,
    pub shape_name: Option<String>,
    /// 1-based paragraph index within the shape.
    pub paragraph_index: usize,
    pub has_runs: bool,
    pub run_count: usize,
    /// Sorted distinct run-level typefaces seen in the paragraph.
    pub run_typefaces: Vec<String>,
    /// First characters of the paragraph text.
    pub snippet: String,
    pub has_def_rpr_latin: bool,
    pub has_end_para_rpr_latin: bool,
    /// Synthesized location path into the slide markup.
    pub xpath: String,
}

/// A run requesting a style variant its embedded typeface does not declare.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StyleViolation {
    /// Part name of the slide.
    pub slide_file: String,
    pub shape_id: Option<String>,
    pub shape_name: Option<String>,
    /// 1-based paragraph index within the shape.
    pub paragraph_index: usize,
    /// 1-based run index within the paragraph.
    pub run_index: usize,
    pub typeface: String,
    pub bold: bool,
    pub italic: bool,
    /// First characters of the run text.
    pub snippet: String,
}

/// Aggregated unsupported-style usage.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct StyleUsage {
    /// typeface -> required style -> occurrence count.
    pub counts: BTreeMap<String, BTreeMap<String, u64>>,
    /// Individual violation records in slide order.
    pub violations: Vec<StyleViolation>,
}

/// Summary cardinalities of the report's sets.
#[derive(Debug, Clone, Copy, Default, Serialize, PartialEq, Eq)]
pub struct SummaryCounts {
    pub embedded: usize,
    pub requested_unique: usize,
    pub requested_faces_unique: usize,
    pub requested_theme_tokens_unique: usize,
    pub requested_resolved_unique: usize,
    pub unknown_requested: usize,
}

/// The complete audit report for one package.
#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct AuditReport {
    /// Path the package was read from, when audited from a file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_path: Option<String>,

    /// Sorted, de-duplicated declared embedded typefaces.
    pub embedded_typefaces: Vec<String>,

    /// Declared style availability per embedded typeface.
    pub embedded_font_styles: BTreeMap<String, StyleFlags>,

    /// Declared binary slots with sniffed-name enrichment.
    pub embedded_font_binaries: Vec<FontBinaryEntry>,

    pub theme_major_latin: Option<String>,
    pub theme_minor_latin: Option<String>,

    /// Every typeface request, literal or token.
    pub requested_typefaces: CountMap,
    /// Literal face-name requests.
    pub requested_faces: CountMap,
    /// Theme-token requests.
    pub requested_theme_tokens: CountMap,
    /// Requests resolved to literal faces (faces plus resolved tokens).
    pub requested_resolved: CountMap,

    pub missing_typeface_runs: MissingRunCounts,
    pub missing_paragraphs_empty: u64,
    pub missing_paragraphs_nonempty: u64,
    pub missing_runs_with_text: u64,
    pub missing_paragraph_locations: Vec<MissingParagraph>,

    pub unsupported_style_usage: StyleUsage,

    /// Literal faces requested but not embedded, sorted.
    pub unknown_requested: Vec<String>,

    pub counts: SummaryCounts,
}

impl AuditReport {
    /// Whether the audit found any requested face that is not embedded.
    ///
    /// This is the completion signal the CLI maps to its exit code.
    pub fn has_unknown_requested(&self) -> bool {
        !self.unknown_requested.is_empty()
    }
}
