//! End-to-end audit tests over synthetic .pptx packages.
//!
//! Fixtures are assembled in memory with the zip crate, so every scenario is
//! self-contained and byte-deterministic.

use std::io::{Cursor, Write};

use fontaudit::{audit_bytes, audit_file, Error, FontStyle};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

fn build_package(parts: &[(&str, &[u8])]) -> Vec<u8> {
    let mut buffer = Vec::new();
    let mut zip = ZipWriter::new(Cursor::new(&mut buffer));
    let options = SimpleFileOptions::default();
    for (name, data) in parts {
        zip.start_file(*name, options).unwrap();
        zip.write_all(data).unwrap();
    }
    zip.finish().unwrap();
    buffer
}

fn utf16le(s: &str) -> Vec<u8> {
    s.encode_utf16().flat_map(|u| u.to_le_bytes()).collect()
}

const PRESENTATION_XML: &str = r#"<?xml version="1.0"?>
<p:presentation xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main"
                xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <p:embeddedFontLst>
    <p:embeddedFont>
      <p:font typeface="Calibri"/>
      <p:regular r:id="rId20"/>
      <p:bold r:id="rId21"/>
    </p:embeddedFont>
  </p:embeddedFontLst>
</p:presentation>"#;

const RELS_XML: &str = r#"<?xml version="1.0"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId20" Type="http://t/font" Target="fonts/font1.fntdata"/>
  <Relationship Id="rId21" Type="http://t/font" Target="fonts/font2.fntdata"/>
</Relationships>"#;

const THEME_XML: &str = r#"<?xml version="1.0"?>
<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Office">
  <a:themeElements>
    <a:fontScheme name="Office">
      <a:majorFont><a:latin typeface="Cambria"/></a:majorFont>
      <a:minorFont><a:latin typeface="Arial"/></a:minorFont>
    </a:fontScheme>
  </a:themeElements>
</a:theme>"#;

const SLIDE1_XML: &str = r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="2" name="Title 1"/></p:nvSpPr>
      <p:txBody>
        <a:p>
          <a:r>
            <a:rPr b="1" i="1"><a:latin typeface="Calibri"/></a:rPr>
            <a:t>Bold italic Calibri</a:t>
          </a:r>
          <a:r>
            <a:rPr><a:latin typeface="+mn-lt"/></a:rPr>
            <a:t>Minor token text</a:t>
          </a:r>
        </a:p>
        <a:p>
          <a:r>
            <a:t>Uncovered run</a:t>
          </a:r>
        </a:p>
        <a:p/>
      </p:txBody>
    </p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

const SLIDE2_XML: &str = r#"<?xml version="1.0"?>
<p:sld xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main"
       xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main">
  <p:cSld><p:spTree>
    <p:sp>
      <p:nvSpPr><p:cNvPr id="4" name="Body 1"/></p:nvSpPr>
      <p:txBody>
        <a:p>
          <a:pPr><a:defRPr><a:latin typeface="Comic Sans"/></a:defRPr></a:pPr>
          <a:r>
            <a:rPr><a:latin typeface="Comic Sans"/></a:rPr>
            <a:t>Unembedded face</a:t>
          </a:r>
        </a:p>
      </p:txBody>
    </p:sp>
  </p:spTree></p:cSld>
</p:sld>"#;

fn full_package() -> Vec<u8> {
    let font1 = utf16le("Calibri Regular");
    let font2 = utf16le("Calibri Bold");
    build_package(&[
        ("ppt/presentation.xml", PRESENTATION_XML.as_bytes()),
        ("ppt/_rels/presentation.xml.rels", RELS_XML.as_bytes()),
        ("ppt/theme/theme1.xml", THEME_XML.as_bytes()),
        ("ppt/slides/slide1.xml", SLIDE1_XML.as_bytes()),
        ("ppt/slides/slide2.xml", SLIDE2_XML.as_bytes()),
        ("ppt/fonts/font1.fntdata", &font1),
        ("ppt/fonts/font2.fntdata", &font2),
    ])
}

#[test]
fn embedded_catalog_and_binaries() {
    let report = audit_bytes(&full_package()).unwrap();

    assert_eq!(report.embedded_typefaces, vec!["Calibri"]);
    let flags = &report.embedded_font_styles["Calibri"];
    assert!(flags.has_regular);
    assert!(flags.has_bold);
    assert!(!flags.has_italic);
    assert!(!flags.has_bold_italic);

    assert_eq!(report.embedded_font_binaries.len(), 2);
    let regular = &report.embedded_font_binaries[0];
    assert_eq!(regular.style, FontStyle::Regular);
    assert_eq!(regular.part_name.as_deref(), Some("ppt/fonts/font1.fntdata"));
    assert_eq!(regular.name_strings, vec!["Calibri Regular"]);
    let bold = &report.embedded_font_binaries[1];
    assert_eq!(bold.name_strings, vec!["Calibri Bold"]);
}

#[test]
fn theme_fonts_extracted() {
    let report = audit_bytes(&full_package()).unwrap();
    assert_eq!(report.theme_major_latin.as_deref(), Some("Cambria"));
    assert_eq!(report.theme_minor_latin.as_deref(), Some("Arial"));
}

#[test]
fn requested_counters_partition_tokens_and_faces() {
    let report = audit_bytes(&full_package()).unwrap();

    // Raw = faces + tokens, and no key is in both.
    let raw_total: u64 = report.requested_typefaces.iter().map(|(_, v)| v).sum();
    let face_total: u64 = report.requested_faces.iter().map(|(_, v)| v).sum();
    let token_total: u64 = report.requested_theme_tokens.iter().map(|(_, v)| v).sum();
    assert_eq!(raw_total, face_total + token_total);
    for key in report.requested_faces.keys() {
        assert_eq!(report.requested_theme_tokens.get(key), None);
    }

    assert_eq!(report.requested_theme_tokens.get("+mn-lt"), Some(1));
    // The resolvable token contributes one unit under the resolved name.
    assert_eq!(report.requested_resolved.get("Arial"), Some(1));
    assert_eq!(report.requested_faces.get("Calibri"), Some(1));
    assert_eq!(report.requested_resolved.get("Calibri"), Some(1));
}

#[test]
fn unknown_requested_is_set_difference() {
    let report = audit_bytes(&full_package()).unwrap();
    // Comic Sans appears twice in the raw stream (defRPr + rPr) but only
    // once in the set difference.
    assert_eq!(report.requested_faces.get("Comic Sans"), Some(2));
    assert_eq!(report.unknown_requested, vec!["Comic Sans"]);
    assert!(report.has_unknown_requested());
}

#[test]
fn style_violation_for_missing_bold_italic() {
    let report = audit_bytes(&full_package()).unwrap();

    let violations = &report.unsupported_style_usage.violations;
    assert_eq!(violations.len(), 1);
    let violation = &violations[0];
    assert_eq!(violation.slide_file, "ppt/slides/slide1.xml");
    assert_eq!(violation.typeface, "Calibri");
    assert!(violation.bold);
    assert!(violation.italic);
    assert_eq!(violation.run_index, 1);
    assert_eq!(violation.snippet, "Bold italic Calibri");

    let counts = &report.unsupported_style_usage.counts;
    assert_eq!(counts["Calibri"]["boldItalic"], 1);
}

#[test]
fn missing_paragraph_classification() {
    let report = audit_bytes(&full_package()).unwrap();

    // Slide 1: none of the three paragraphs carries a paragraph-level
    // typeface (run-level typefaces do not count as paragraph coverage);
    // slide 2's paragraph is covered by its defRPr.
    assert_eq!(report.missing_typeface_runs.paragraphs, 3);
    assert_eq!(report.missing_paragraphs_empty, 1);
    assert_eq!(report.missing_paragraphs_nonempty, 2);
    assert_eq!(
        report.missing_paragraphs_empty + report.missing_paragraphs_nonempty,
        report.missing_typeface_runs.paragraphs
    );

    // Only the run with neither its own nor a paragraph typeface is missing.
    assert_eq!(report.missing_typeface_runs.runs, 1);
    assert_eq!(report.missing_runs_with_text, 1);
    assert_eq!(
        report.missing_typeface_runs.total,
        report.missing_typeface_runs.runs + report.missing_typeface_runs.paragraphs
    );

    // Nonempty paragraphs get location records; the empty one does not.
    assert_eq!(report.missing_paragraph_locations.len(), 2);

    let first = &report.missing_paragraph_locations[0];
    assert_eq!(first.paragraph_index, 1);
    assert_eq!(first.run_count, 2);
    assert_eq!(first.run_typefaces, vec!["+mn-lt", "Calibri"]);
    assert_eq!(first.snippet, "Bold italic CalibriMinor token text");

    let second = &report.missing_paragraph_locations[1];
    assert_eq!(second.slide_file, "ppt/slides/slide1.xml");
    assert_eq!(second.slide_index, 1);
    assert_eq!(second.shape_index, 1);
    assert_eq!(second.paragraph_index, 2);
    assert!(second.has_runs);
    assert!(second.run_typefaces.is_empty());
    assert_eq!(second.snippet, "Uncovered run");
    assert!(!second.has_def_rpr_latin);
    assert!(!second.has_end_para_rpr_latin);
    assert_eq!(second.xpath, "/p:sld/p:cSld/p:spTree/p:sp[1]/p:txBody/a:p[2]");
}

#[test]
fn summary_counts_match_sections() {
    let report = audit_bytes(&full_package()).unwrap();
    assert_eq!(report.counts.embedded, report.embedded_typefaces.len());
    assert_eq!(report.counts.requested_unique, report.requested_typefaces.len());
    assert_eq!(report.counts.requested_faces_unique, report.requested_faces.len());
    assert_eq!(
        report.counts.requested_theme_tokens_unique,
        report.requested_theme_tokens.len()
    );
    assert_eq!(
        report.counts.requested_resolved_unique,
        report.requested_resolved.len()
    );
    assert_eq!(report.counts.unknown_requested, report.unknown_requested.len());
}

#[test]
fn audit_is_deterministic() {
    let data = full_package();
    let first = serde_json::to_string(&audit_bytes(&data).unwrap()).unwrap();
    let second = serde_json::to_string(&audit_bytes(&data).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn empty_package_degrades_to_empty_report() {
    // No presentation, no theme, no slides: every section empty, no error.
    let data = build_package(&[("docProps/app.xml", b"<Properties/>")]);
    let report = audit_bytes(&data).unwrap();
    assert!(report.embedded_typefaces.is_empty());
    assert!(report.embedded_font_styles.is_empty());
    assert!(report.embedded_font_binaries.is_empty());
    assert_eq!(report.theme_major_latin, None);
    assert_eq!(report.theme_minor_latin, None);
    assert!(report.requested_typefaces.is_empty());
    assert!(report.unknown_requested.is_empty());
    assert_eq!(report.missing_typeface_runs.total, 0);
}

#[test]
fn missing_font_binary_part_degrades() {
    // Declared relationship targets a part that is not in the archive.
    let data = build_package(&[
        ("ppt/presentation.xml", PRESENTATION_XML.as_bytes()),
        ("ppt/_rels/presentation.xml.rels", RELS_XML.as_bytes()),
    ]);
    let report = audit_bytes(&data).unwrap();
    assert_eq!(report.embedded_font_binaries.len(), 2);
    assert!(report.embedded_font_binaries[0].name_strings.is_empty());
    assert_eq!(
        report.embedded_font_binaries[0].part_name.as_deref(),
        Some("ppt/fonts/font1.fntdata")
    );
}

#[test]
fn malformed_slide_is_skipped() {
    let data = build_package(&[
        ("ppt/slides/slide1.xml", b"<p:sld xmlns:p=\"http://p\"><broken" as &[u8]),
        ("ppt/slides/slide2.xml", SLIDE2_XML.as_bytes()),
    ]);
    let report = audit_bytes(&data).unwrap();
    // Slide 1 contributes nothing; slide 2 is still audited.
    assert_eq!(report.requested_faces.get("Comic Sans"), Some(2));
}

#[test]
fn malformed_presentation_is_fatal() {
    let data = build_package(&[("ppt/presentation.xml", b"<p:presentation><bad" as &[u8])]);
    let err = audit_bytes(&data).unwrap_err();
    assert!(matches!(err, Error::PartMalformed { .. }));
}

#[test]
fn malformed_theme_is_fatal() {
    let data = build_package(&[("ppt/theme/theme1.xml", b"<a:theme><bad" as &[u8])]);
    let err = audit_bytes(&data).unwrap_err();
    assert!(matches!(err, Error::PartMalformed { .. }));
}

#[test]
fn corrupt_archive_is_fatal() {
    let err = audit_bytes(b"this is not a zip archive").unwrap_err();
    assert!(matches!(err, Error::PackageCorrupt(_)));
}

#[test]
fn audit_file_missing_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.pptx");
    let err = audit_file(&path).unwrap_err();
    assert!(matches!(err, Error::PackageNotFound(_)));
}

#[test]
fn audit_file_records_source_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deck.pptx");
    std::fs::write(&path, full_package()).unwrap();

    let report = audit_file(&path).unwrap();
    assert_eq!(report.source_path.as_deref(), Some(path.to_str().unwrap()));
    // Same content as the in-memory audit apart from the recorded path.
    let mut from_bytes = audit_bytes(&full_package()).unwrap();
    from_bytes.source_path = report.source_path.clone();
    assert_eq!(report, from_bytes);
}

#[test]
fn slides_ordered_by_numeric_index() {
    // slide10 sorts after slide2 numerically even though it is earlier
    // lexicographically.
    let uncovered = |text: &str| {
        format!(
            r#"<p:sld xmlns:a="http://a" xmlns:p="http://p">
  <p:sp><p:txBody><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>
</p:sld>"#,
            text
        )
    };
    let slide2 = uncovered("second");
    let slide10 = uncovered("tenth");
    let data = build_package(&[
        ("ppt/slides/slide10.xml", slide10.as_bytes()),
        ("ppt/slides/slide2.xml", slide2.as_bytes()),
    ]);
    let report = audit_bytes(&data).unwrap();
    let order: Vec<u32> = report
        .missing_paragraph_locations
        .iter()
        .map(|loc| loc.slide_index)
        .collect();
    assert_eq!(order, vec![2, 10]);
}

#[test]
fn paragraph_coverage_applies_to_all_runs() {
    // The paragraph-level typeface covers the run without its own typeface:
    // no missing run is counted even though the run itself declares nothing.
    let slide = r#"<p:sld xmlns:a="http://a" xmlns:p="http://p">
  <p:sp><p:txBody>
    <a:p>
      <a:pPr><a:defRPr><a:latin typeface="Georgia"/></a:defRPr></a:pPr>
      <a:r><a:t>covered</a:t></a:r>
    </a:p>
  </p:txBody></p:sp>
</p:sld>"#;
    let data = build_package(&[("ppt/slides/slide1.xml", slide.as_bytes())]);
    let report = audit_bytes(&data).unwrap();
    assert_eq!(report.missing_typeface_runs.runs, 0);
    assert_eq!(report.missing_typeface_runs.paragraphs, 0);
}

#[test]
fn unresolvable_token_counts_raw_only() {
    // No theme part: the minor token stays unresolved and contributes to the
    // raw/token counters but never to the resolved counter.
    let slide = r#"<p:sld xmlns:a="http://a" xmlns:p="http://p">
  <p:sp><p:txBody>
    <a:p><a:r><a:rPr><a:latin typeface="+mn-lt"/></a:rPr><a:t>x</a:t></a:r></a:p>
  </p:txBody></p:sp>
</p:sld>"#;
    let data = build_package(&[("ppt/slides/slide1.xml", slide.as_bytes())]);
    let report = audit_bytes(&data).unwrap();
    assert_eq!(report.requested_typefaces.get("+mn-lt"), Some(1));
    assert_eq!(report.requested_theme_tokens.get("+mn-lt"), Some(1));
    assert!(report.requested_resolved.is_empty());
    // Tokens never enter the unknown set.
    assert!(report.unknown_requested.is_empty());
}
