//! Slide scanning: font requests, coverage walk, and discrepancy records.
//!
//! One streaming pass per slide builds the font-relevant tree
//! ([`SlideDoc`]) together with the raw request list; [`SlideStats`] then
//! derives every counter and discrepancy record from the tree. Slide results
//! merge commutatively, so processing order only affects the order of the
//! record vectors, never their content.

use std::collections::HashMap;

use crate::catalog::FontCatalog;
use crate::container::SlidePartName;
use crate::error::{Error, Result};
use crate::model::{
    is_theme_token, FontStyle, MissingParagraph, Paragraph, Run, Shape, SlideDoc, StyleViolation,
    ThemeFonts,
};
use crate::theme::typeface_attr;

/// Characters kept when truncating run or paragraph text for a record.
const SNIPPET_LEN: usize = 40;

/// Attribute values treated as true for bold/italic flags.
///
/// Case-insensitive; anything else, including absence, is false.
fn truthy_attr(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "t" | "on" | "yes"
    )
}

fn snippet(text: &str) -> String {
    text.chars().take(SNIPPET_LEN).collect()
}

/// Parse a slide part into its font-relevant tree.
///
/// Collects every `a:latin` typeface attribute in the slide (the raw request
/// stream) and the shape/paragraph/run structure of text bodies. `part` names
/// the slide for error context only.
pub fn parse_slide(part: &str, xml: &str) -> Result<SlideDoc> {
    let mut doc = SlideDoc::default();
    let mut reader = quick_xml::Reader::from_str(xml);
    // Keep whitespace: runs may carry xml:space="preserve" text.
    reader.config_mut().trim_text(false);
    // Self-closing elements carry structure here (an empty a:p is still a
    // paragraph), so surface them as Start/End pairs.
    reader.config_mut().expand_empty_elements = true;

    let mut buf = Vec::new();
    let mut in_sp = false;
    let mut in_nv_sp_pr = false;
    let mut in_tx_body = false;
    let mut in_p_pr = false;
    let mut in_def_rpr = false;
    let mut in_end_rpr = false;
    let mut in_rpr = false;
    let mut in_text = false;

    let mut current_shape: Option<Shape> = None;
    let mut shape_has_body = false;
    let mut current_para: Option<Paragraph> = None;
    let mut current_run: Option<Run> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e)) => {
                let name = e.name();
                let local_name = name.local_name();
                match local_name.as_ref() {
                    b"latin" => {
                        if let Some(tf) = typeface_attr(e) {
                            doc.font_refs.push(tf.clone());
                            if in_def_rpr {
                                if let Some(para) = current_para.as_mut() {
                                    para.default_typeface.get_or_insert(tf);
                                }
                            } else if in_end_rpr {
                                if let Some(para) = current_para.as_mut() {
                                    para.end_typeface.get_or_insert(tf);
                                }
                            } else if in_rpr {
                                if let Some(run) = current_run.as_mut() {
                                    run.typeface.get_or_insert(tf);
                                }
                            }
                        }
                    }
                    b"sp" => {
                        current_shape = Some(Shape::default());
                        shape_has_body = false;
                        in_sp = true;
                    }
                    b"nvSpPr" if in_sp => in_nv_sp_pr = true,
                    b"cNvPr" if in_nv_sp_pr => {
                        if let Some(shape) = current_shape.as_mut() {
                            for attr in e.attributes().flatten() {
                                match attr.key.local_name().as_ref() {
                                    b"id" => {
                                        shape.id =
                                            Some(String::from_utf8_lossy(&attr.value).to_string());
                                    }
                                    b"name" => {
                                        shape.name =
                                            Some(String::from_utf8_lossy(&attr.value).to_string());
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                    b"txBody" if in_sp => {
                        in_tx_body = true;
                        shape_has_body = true;
                    }
                    b"p" if in_tx_body => {
                        current_para = Some(Paragraph::default());
                    }
                    b"pPr" if current_para.is_some() => in_p_pr = true,
                    b"defRPr" if in_p_pr => in_def_rpr = true,
                    b"endParaRPr" if current_para.is_some() && current_run.is_none() => {
                        in_end_rpr = true;
                    }
                    b"r" if current_para.is_some() => {
                        current_run = Some(Run::default());
                    }
                    b"rPr" if current_run.is_some() => {
                        in_rpr = true;
                        if let Some(run) = current_run.as_mut() {
                            for attr in e.attributes().flatten() {
                                match attr.key.local_name().as_ref() {
                                    b"b" => {
                                        run.bold =
                                            truthy_attr(&String::from_utf8_lossy(&attr.value));
                                    }
                                    b"i" => {
                                        run.italic =
                                            truthy_attr(&String::from_utf8_lossy(&attr.value));
                                    }
                                    _ => {}
                                }
                            }
                        }
                    }
                    b"t" if current_run.is_some() => in_text = true,
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Text(ref e)) => {
                if in_text {
                    if let Some(run) = current_run.as_mut() {
                        let text = e.unescape().unwrap_or_default();
                        run.text.push_str(&text);
                    }
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                match e.name().local_name().as_ref() {
                    b"t" => in_text = false,
                    b"rPr" => in_rpr = false,
                    b"defRPr" => in_def_rpr = false,
                    b"endParaRPr" => in_end_rpr = false,
                    b"pPr" => in_p_pr = false,
                    b"r" => {
                        if let (Some(para), Some(run)) = (current_para.as_mut(), current_run.take())
                        {
                            para.runs.push(run);
                        }
                    }
                    b"p" => {
                        if let (Some(shape), Some(para)) =
                            (current_shape.as_mut(), current_para.take())
                        {
                            shape.paragraphs.push(para);
                        }
                    }
                    b"txBody" => in_tx_body = false,
                    b"nvSpPr" => in_nv_sp_pr = false,
                    b"sp" => {
                        if let Some(shape) = current_shape.take() {
                            if shape_has_body {
                                doc.shapes.push(shape);
                            }
                        }
                        in_sp = false;
                    }
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::malformed(part, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(doc)
}

/// Per-slide audit counters and discrepancy records.
#[derive(Debug, Clone, Default)]
pub struct SlideStats {
    /// Every request, literal or token.
    pub raw: HashMap<String, u64>,
    /// Literal face requests.
    pub faces: HashMap<String, u64>,
    /// Theme-token requests.
    pub tokens: HashMap<String, u64>,
    /// Requests resolved to literal faces.
    pub resolved: HashMap<String, u64>,

    pub missing_runs: u64,
    pub missing_paragraphs: u64,
    pub missing_paragraphs_empty: u64,
    pub missing_paragraphs_nonempty: u64,
    pub missing_runs_with_text: u64,
    pub missing_locations: Vec<MissingParagraph>,

    /// (typeface, required style) -> occurrence count.
    pub style_counts: HashMap<(String, FontStyle), u64>,
    pub violations: Vec<StyleViolation>,
}

impl SlideStats {
    /// Derive all counters and records for one parsed slide.
    pub fn collect(
        part: &SlidePartName,
        doc: &SlideDoc,
        catalog: &FontCatalog,
        theme: &ThemeFonts,
    ) -> SlideStats {
        let mut stats = SlideStats::default();

        for tf in &doc.font_refs {
            *stats.raw.entry(tf.clone()).or_default() += 1;
            if is_theme_token(tf) {
                *stats.tokens.entry(tf.clone()).or_default() += 1;
                if let Some(face) = theme.resolve_token(tf) {
                    *stats.resolved.entry(face.to_string()).or_default() += 1;
                }
            } else {
                *stats.faces.entry(tf.clone()).or_default() += 1;
                *stats.resolved.entry(tf.clone()).or_default() += 1;
            }
        }

        for (shape_idx, shape) in doc.shapes.iter().enumerate() {
            let shape_idx = shape_idx + 1;
            for (p_idx, para) in shape.paragraphs.iter().enumerate() {
                let p_idx = p_idx + 1;
                let p_has = para.has_typeface();

                for (r_idx, run) in para.runs.iter().enumerate() {
                    let r_idx = r_idx + 1;
                    if let Some(tf) = &run.typeface {
                        if let Some(flags) = catalog.flags_for(tf) {
                            let required = FontStyle::required(run.bold, run.italic);
                            if !flags.has(required) {
                                *stats
                                    .style_counts
                                    .entry((tf.clone(), required))
                                    .or_default() += 1;
                                stats.violations.push(StyleViolation {
                                    slide_file: part.name.clone(),
                                    shape_id: shape.id.clone(),
                                    shape_name: shape.name.clone(),
                                    paragraph_index: p_idx,
                                    run_index: r_idx,
                                    typeface: tf.clone(),
                                    bold: run.bold,
                                    italic: run.italic,
                                    snippet: snippet(&run.text),
                                });
                            }
                        }
                    }
                }

                if !p_has {
                    stats.missing_paragraphs += 1;
                    let text = para.combined_text();
                    if para.runs.is_empty() && text.is_empty() {
                        stats.missing_paragraphs_empty += 1;
                    } else {
                        stats.missing_paragraphs_nonempty += 1;
                        stats.missing_locations.push(MissingParagraph {
                            slide_file: part.name.clone(),
                            slide_index: part.index,
                            shape_index: shape_idx,
                            shape_id: shape.id.clone(),
                            shape_name: shape.name.clone(),
                            paragraph_index: p_idx,
                            has_runs: !para.runs.is_empty(),
                            run_count: para.runs.len(),
                            run_typefaces: para.run_typefaces(),
                            snippet: snippet(&text),
                            has_def_rpr_latin: para.default_typeface.is_some(),
                            has_end_para_rpr_latin: para.end_typeface.is_some(),
                            xpath: format!(
                                "/p:sld/p:cSld/p:spTree/p:sp[{}]/p:txBody/a:p[{}]",
                                shape_idx, p_idx
                            ),
                        });
                    }
                }

                for run in &para.runs {
                    // A run is missing only when neither it nor its paragraph
                    // provides a typeface; paragraph coverage applies to
                    // every run regardless of the run's other properties.
                    if !(run.has_typeface() || p_has) {
                        stats.missing_runs += 1;
                        if run.has_text() {
                            stats.missing_runs_with_text += 1;
                        }
                    }
                }
            }
        }

        stats
    }

    /// Fold another slide's stats into this accumulator.
    pub fn merge(&mut self, other: SlideStats) {
        for (k, v) in other.raw {
            *self.raw.entry(k).or_default() += v;
        }
        for (k, v) in other.faces {
            *self.faces.entry(k).or_default() += v;
        }
        for (k, v) in other.tokens {
            *self.tokens.entry(k).or_default() += v;
        }
        for (k, v) in other.resolved {
            *self.resolved.entry(k).or_default() += v;
        }
        self.missing_runs += other.missing_runs;
        self.missing_paragraphs += other.missing_paragraphs;
        self.missing_paragraphs_empty += other.missing_paragraphs_empty;
        self.missing_paragraphs_nonempty += other.missing_paragraphs_nonempty;
        self.missing_runs_with_text += other.missing_runs_with_text;
        self.missing_locations.extend(other.missing_locations);
        for (k, v) in other.style_counts {
            *self.style_counts.entry(k).or_default() += v;
        }
        self.violations.extend(other.violations);
    }
}
