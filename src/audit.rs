//! Audit orchestration and report assembly.

use std::collections::{BTreeMap, HashSet};

use crate::catalog::FontCatalog;
use crate::container::{
    PptxContainer, PRESENTATION_PART, PRESENTATION_RELS_PART, THEME_PART,
};
use crate::error::Result;
use crate::model::{
    AuditReport, CountMap, MissingRunCounts, StyleUsage, SummaryCounts, ThemeFonts,
};
use crate::slides::{parse_slide, SlideStats};

/// Run the full audit over an opened container.
///
/// Parsing order is container -> theme -> catalog -> slides; the report is
/// built once, after all parsing completes. A missing or unparsable slide is
/// skipped so the rest of the deck is still audited; malformed
/// presentation/rels/theme parts abort.
pub fn audit_container(container: &PptxContainer) -> Result<AuditReport> {
    let presentation_xml = container.read_xml_part(PRESENTATION_PART);
    let rels_xml = container.read_xml_part(PRESENTATION_RELS_PART);
    let catalog = FontCatalog::parse(
        presentation_xml.as_deref(),
        rels_xml.as_deref(),
        container,
    )?;

    let theme = match container.read_xml_part(THEME_PART) {
        Some(xml) => ThemeFonts::parse(&xml)?,
        None => ThemeFonts::default(),
    };

    let mut stats = SlideStats::default();
    for part in container.slide_parts() {
        let Some(xml) = container.read_xml_part(&part.name) else {
            continue;
        };
        let Ok(doc) = parse_slide(&part.name, &xml) else {
            continue;
        };
        stats.merge(SlideStats::collect(&part, &doc, &catalog, &theme));
    }

    Ok(build_report(catalog, theme, stats))
}

/// Assemble the immutable report value from the parsed inputs.
fn build_report(catalog: FontCatalog, theme: ThemeFonts, stats: SlideStats) -> AuditReport {
    let requested_typefaces = CountMap::from_counter(stats.raw);
    let requested_faces = CountMap::from_counter(stats.faces);
    let requested_theme_tokens = CountMap::from_counter(stats.tokens);
    let requested_resolved = CountMap::from_counter(stats.resolved);

    let embedded_set: HashSet<&str> = catalog
        .embedded_typefaces
        .iter()
        .map(String::as_str)
        .collect();
    let mut unknown_requested: Vec<String> = requested_faces
        .keys()
        .filter(|face| !embedded_set.contains(face))
        .map(String::from)
        .collect();
    unknown_requested.sort();

    let mut style_usage_counts: BTreeMap<String, BTreeMap<String, u64>> = BTreeMap::new();
    for ((typeface, style), count) in stats.style_counts {
        style_usage_counts
            .entry(typeface)
            .or_default()
            .insert(style.as_str().to_string(), count);
    }

    let missing_typeface_runs = MissingRunCounts {
        runs: stats.missing_runs,
        paragraphs: stats.missing_paragraphs,
        total: stats.missing_runs + stats.missing_paragraphs,
    };

    let counts = SummaryCounts {
        embedded: catalog.embedded_typefaces.len(),
        requested_unique: requested_typefaces.len(),
        requested_faces_unique: requested_faces.len(),
        requested_theme_tokens_unique: requested_theme_tokens.len(),
        requested_resolved_unique: requested_resolved.len(),
        unknown_requested: unknown_requested.len(),
    };

    AuditReport {
        source_path: None,
        embedded_typefaces: catalog.embedded_typefaces,
        embedded_font_styles: catalog.style_flags,
        embedded_font_binaries: catalog.binaries,
        theme_major_latin: theme.major_latin,
        theme_minor_latin: theme.minor_latin,
        requested_typefaces,
        requested_faces,
        requested_theme_tokens,
        requested_resolved,
        missing_typeface_runs,
        missing_paragraphs_empty: stats.missing_paragraphs_empty,
        missing_paragraphs_nonempty: stats.missing_paragraphs_nonempty,
        missing_runs_with_text: stats.missing_runs_with_text,
        missing_paragraph_locations: stats.missing_locations,
        unsupported_style_usage: StyleUsage {
            counts: style_usage_counts,
            violations: stats.violations,
        },
        unknown_requested,
        counts,
    }
}
