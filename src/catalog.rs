//! Embedded-font catalog from the presentation manifest.

use std::collections::{BTreeMap, HashMap};

use crate::container::{PptxContainer, PRESENTATION_PART, PRESENTATION_RELS_PART};
use crate::error::{Error, Result};
use crate::model::{EmbeddedFontEntry, FontBinaryEntry, FontStyle, StyleFlags};
use crate::sniff::sniff_names;
use crate::theme::typeface_attr;

/// Declared embedded fonts: names, style availability, and binary locations.
///
/// An absent manifest yields an empty catalog, which is a normal outcome:
/// most presentations embed no fonts at all.
#[derive(Debug, Clone, Default)]
pub struct FontCatalog {
    /// Sorted, de-duplicated declared typeface names.
    pub embedded_typefaces: Vec<String>,
    /// Declared style availability per typeface.
    pub style_flags: BTreeMap<String, StyleFlags>,
    /// One entry per declared style slot, with best-effort enrichment.
    pub binaries: Vec<FontBinaryEntry>,
}

impl FontCatalog {
    /// Build the catalog from the presentation manifest and its relationship
    /// index, reading font-program parts from the container for enrichment.
    ///
    /// Missing relationships or missing target parts degrade to entries with
    /// no sniffed names; malformed XML in a present part is fatal.
    pub fn parse(
        presentation_xml: Option<&str>,
        rels_xml: Option<&str>,
        container: &PptxContainer,
    ) -> Result<FontCatalog> {
        let Some(presentation_xml) = presentation_xml else {
            return Ok(FontCatalog::default());
        };

        let entries = parse_embedded_font_entries(presentation_xml)?;
        let rels = match rels_xml {
            Some(xml) => parse_relationships(xml)?,
            None => HashMap::new(),
        };

        let mut typefaces: Vec<String> = entries
            .iter()
            .filter_map(|e| e.typeface.clone())
            .collect();
        typefaces.sort();
        typefaces.dedup();

        let mut style_flags = BTreeMap::new();
        let mut binaries = Vec::new();
        for entry in &entries {
            if let Some(typeface) = &entry.typeface {
                let mut flags = StyleFlags::default();
                for (style, _) in &entry.styles {
                    flags.set(*style);
                }
                style_flags.insert(typeface.clone(), flags);
            }
            for (style, rel_id) in &entry.styles {
                let target = rel_id.as_deref().and_then(|id| rels.get(id));
                let part_name = target.map(|t| resolve_part_path(t));
                let name_strings = part_name
                    .as_deref()
                    .and_then(|name| container.read_part(name))
                    .map(|data| sniff_names(&data))
                    .unwrap_or_default();
                binaries.push(FontBinaryEntry {
                    typeface: entry.typeface.clone(),
                    style: *style,
                    rel_id: rel_id.clone(),
                    part_name,
                    name_strings,
                });
            }
        }

        Ok(FontCatalog {
            embedded_typefaces: typefaces,
            style_flags,
            binaries,
        })
    }

    /// Whether a typeface name is declared as embedded.
    pub fn is_embedded(&self, typeface: &str) -> bool {
        self.embedded_typefaces.iter().any(|t| t == typeface)
    }

    /// Declared style availability for a typeface, if known.
    pub fn flags_for(&self, typeface: &str) -> Option<&StyleFlags> {
        self.style_flags.get(typeface)
    }
}

/// Parse `p:embeddedFontLst/p:embeddedFont` declarations from the manifest.
fn parse_embedded_font_entries(xml: &str) -> Result<Vec<EmbeddedFontEntry>> {
    let mut entries = Vec::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut in_font_lst = false;
    let mut current: Option<EmbeddedFontEntry> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Start(ref e))
            | Ok(quick_xml::events::Event::Empty(ref e)) => {
                let name = e.name();
                let local_name = name.local_name();
                match local_name.as_ref() {
                    b"embeddedFontLst" => in_font_lst = true,
                    b"embeddedFont" if in_font_lst => {
                        current = Some(EmbeddedFontEntry::default());
                    }
                    b"font" if in_font_lst => {
                        if let Some(entry) = current.as_mut() {
                            if entry.typeface.is_none() {
                                entry.typeface = typeface_attr(e);
                            }
                        }
                    }
                    other => {
                        if let (Some(entry), Some(style)) =
                            (current.as_mut(), FontStyle::from_element_name(other))
                        {
                            entry.styles.push((style, rel_id_attr(e)));
                        }
                    }
                }
            }
            Ok(quick_xml::events::Event::End(ref e)) => {
                match e.name().local_name().as_ref() {
                    b"embeddedFont" => {
                        if let Some(entry) = current.take() {
                            entries.push(entry);
                        }
                    }
                    b"embeddedFontLst" => in_font_lst = false,
                    _ => {}
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::malformed(PRESENTATION_PART, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(entries)
}

/// Parse a relationship index into an id -> target map.
fn parse_relationships(xml: &str) -> Result<HashMap<String, String>> {
    let mut rels = HashMap::new();
    let mut reader = quick_xml::Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    loop {
        match reader.read_event_into(&mut buf) {
            Ok(quick_xml::events::Event::Empty(ref e))
            | Ok(quick_xml::events::Event::Start(ref e)) => {
                if e.name().as_ref() == b"Relationship" {
                    let mut id = String::new();
                    let mut target = String::new();
                    for attr in e.attributes().flatten() {
                        match attr.key.as_ref() {
                            b"Id" => id = String::from_utf8_lossy(&attr.value).to_string(),
                            b"Target" => target = String::from_utf8_lossy(&attr.value).to_string(),
                            _ => {}
                        }
                    }
                    if !id.is_empty() && !target.is_empty() {
                        rels.insert(id, target);
                    }
                }
            }
            Ok(quick_xml::events::Event::Eof) => break,
            Err(e) => return Err(Error::malformed(PRESENTATION_RELS_PART, e)),
            _ => {}
        }
        buf.clear();
    }

    Ok(rels)
}

/// `r:id` relationship attribute of a style-slot element.
fn rel_id_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"id" {
            let value = String::from_utf8_lossy(&attr.value).to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}

/// Normalize a relationship target to a package part path.
///
/// Root-relative targets pass through without the leading slash;
/// package-relative targets are taken from the presentation's folder.
fn resolve_part_path(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        return stripped.trim_start_matches('/').to_string();
    }
    if target.starts_with("ppt/") {
        return target.to_string();
    }
    format!("ppt/{}", target)
}
