//! Parsed slide tree: shapes, paragraphs, and text runs.
//!
//! Only the font-relevant subset of the slide markup survives parsing. The
//! tree is internal to the walker and never serialized.

/// A parsed slide part.
#[derive(Debug, Clone, Default)]
pub struct SlideDoc {
    /// Every typeface attribute appearing on a font-reference element
    /// anywhere in the slide, in document order. Not limited to text bodies.
    pub font_refs: Vec<String>,
    /// Shapes carrying a text body, in document order.
    pub shapes: Vec<Shape>,
}

/// A shape with a text body.
#[derive(Debug, Clone, Default)]
pub struct Shape {
    /// Shape id from its non-visual properties.
    pub id: Option<String>,
    /// Shape name from its non-visual properties.
    pub name: Option<String>,
    /// Paragraphs of the text body, in document order.
    pub paragraphs: Vec<Paragraph>,
}

/// A paragraph of a shape's text body.
#[derive(Debug, Clone, Default)]
pub struct Paragraph {
    /// Runs in document order.
    pub runs: Vec<Run>,
    /// Latin typeface from the paragraph's default run properties.
    pub default_typeface: Option<String>,
    /// Latin typeface from the paragraph's end-of-paragraph run properties.
    pub end_typeface: Option<String>,
}

impl Paragraph {
    /// Whether the paragraph provides a typeface for runs lacking their own.
    pub fn has_typeface(&self) -> bool {
        self.default_typeface.is_some() || self.end_typeface.is_some()
    }

    /// Concatenated text of all runs.
    pub fn combined_text(&self) -> String {
        self.runs.iter().map(|r| r.text.as_str()).collect()
    }

    /// Sorted distinct run-level typefaces seen in this paragraph.
    pub fn run_typefaces(&self) -> Vec<String> {
        let mut faces: Vec<String> = self
            .runs
            .iter()
            .filter_map(|r| r.typeface.clone())
            .collect();
        faces.sort();
        faces.dedup();
        faces
    }
}

/// The smallest unit of styled text within a paragraph.
#[derive(Debug, Clone, Default)]
pub struct Run {
    /// Latin typeface from the run's own properties.
    pub typeface: Option<String>,
    /// Bold flag from the run properties.
    pub bold: bool,
    /// Italic flag from the run properties.
    pub italic: bool,
    /// Text content of the run.
    pub text: String,
}

impl Run {
    /// Whether the run declares its own typeface.
    pub fn has_typeface(&self) -> bool {
        self.typeface.is_some()
    }

    /// Whether the run carries non-empty text.
    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }
}
