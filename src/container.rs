//! ZIP container access for .pptx packages.

use crate::error::{Error, Result};
use std::cell::RefCell;
use std::fs::File;
use std::io::{BufReader, Cursor, Read, Seek};
use std::path::Path;

/// Part path of the presentation manifest.
pub const PRESENTATION_PART: &str = "ppt/presentation.xml";

/// Part path of the presentation's relationship index.
pub const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";

/// Part path of the primary theme.
pub const THEME_PART: &str = "ppt/theme/theme1.xml";

const SLIDE_PREFIX: &str = "ppt/slides/slide";
const SLIDE_SUFFIX: &str = ".xml";

/// A slide part name together with its embedded 1-based index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlidePartName {
    /// Index parsed from the part name (`ppt/slides/slide3.xml` -> 3).
    pub index: u32,
    /// Full part name inside the package.
    pub name: String,
}

/// Read access to the parts of a .pptx package.
///
/// Part absence is a normal value: [`PptxContainer::read_part`] returns
/// `None` for a part that is not in the archive. Only failure to open the
/// container itself is an error.
pub struct PptxContainer {
    archive: RefCell<zip::ZipArchive<Cursor<Vec<u8>>>>,
}

impl PptxContainer {
    /// Open a package from a file path.
    ///
    /// Returns [`Error::PackageNotFound`] if the path does not exist and
    /// [`Error::PackageCorrupt`] if the archive cannot be opened.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::PackageNotFound(path.to_path_buf()));
        }
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Open a package from a byte vector.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let archive = zip::ZipArchive::new(Cursor::new(data))
            .map_err(|e| Error::PackageCorrupt(e.to_string()))?;
        Ok(Self {
            archive: RefCell::new(archive),
        })
    }

    /// Open a package from a reader.
    pub fn from_reader<R: Read + Seek>(mut reader: R) -> Result<Self> {
        let mut data = Vec::new();
        reader.read_to_end(&mut data)?;
        Self::from_bytes(data)
    }

    /// Read the raw bytes of a named part, or `None` if absent.
    pub fn read_part(&self, name: &str) -> Option<Vec<u8>> {
        let mut archive = self.archive.borrow_mut();
        let mut file = archive.by_name(name).ok()?;
        let mut data = Vec::new();
        file.read_to_end(&mut data).ok()?;
        Some(data)
    }

    /// Read a named part and decode it as XML text, or `None` if absent.
    pub fn read_xml_part(&self, name: &str) -> Option<String> {
        self.read_part(name).map(|bytes| decode_xml_bytes(&bytes))
    }

    /// Check if a part exists in the package.
    pub fn exists(&self, name: &str) -> bool {
        self.archive.borrow().file_names().any(|n| n == name)
    }

    /// Slide part names, sorted ascending by their embedded numeric index.
    pub fn slide_parts(&self) -> Vec<SlidePartName> {
        let archive = self.archive.borrow();
        let mut slides: Vec<SlidePartName> = archive
            .file_names()
            .filter_map(|name| {
                let index = slide_index(name)?;
                Some(SlidePartName {
                    index,
                    name: name.to_string(),
                })
            })
            .collect();
        slides.sort_by_key(|s| s.index);
        slides
    }
}

impl std::fmt::Debug for PptxContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PptxContainer")
            .field("parts", &self.archive.borrow().len())
            .finish()
    }
}

/// Extract the numeric index from a `ppt/slides/slideN.xml` part name.
fn slide_index(name: &str) -> Option<u32> {
    let digits = name.strip_prefix(SLIDE_PREFIX)?.strip_suffix(SLIDE_SUFFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Decode XML part bytes handling UTF-8 and UTF-16 LE/BE encodings.
///
/// OOXML parts are typically UTF-8, but some producers emit UTF-16 with a
/// BOM. Decoding is lossy: the audit tolerates stray bytes rather than
/// failing on them.
pub fn decode_xml_bytes(bytes: &[u8]) -> String {
    if bytes.len() >= 3 && bytes[0] == 0xEF && bytes[1] == 0xBB && bytes[2] == 0xBF {
        // UTF-8 BOM
        return String::from_utf8_lossy(&bytes[3..]).into_owned();
    }

    if bytes.len() >= 2 && bytes[0] == 0xFF && bytes[1] == 0xFE {
        // UTF-16 LE BOM
        return fix_xml_encoding_declaration(&decode_utf16(&bytes[2..], u16::from_le_bytes));
    }

    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        // UTF-16 BE BOM
        return fix_xml_encoding_declaration(&decode_utf16(&bytes[2..], u16::from_be_bytes));
    }

    String::from_utf8_lossy(bytes).into_owned()
}

fn decode_utf16(bytes: &[u8], read_unit: fn([u8; 2]) -> u16) -> String {
    let units = bytes
        .chunks_exact(2)
        .map(|pair| read_unit([pair[0], pair[1]]));
    char::decode_utf16(units)
        .map(|c| c.unwrap_or(char::REPLACEMENT_CHARACTER))
        .collect()
}

/// Rewrite an `encoding="UTF-16"` XML declaration to UTF-8.
///
/// Once decoded to a Rust string the content is UTF-8; a stale UTF-16
/// declaration would make quick-xml reinterpret the already-decoded text.
fn fix_xml_encoding_declaration(content: &str) -> String {
    if content.starts_with("<?xml") {
        if let Some(end_decl) = content.find("?>") {
            let decl = &content[..end_decl + 2];
            let rest = &content[end_decl + 2..];
            let fixed = decl
                .replace("encoding=\"UTF-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='UTF-16'", "encoding='UTF-8'")
                .replace("encoding=\"utf-16\"", "encoding=\"UTF-8\"")
                .replace("encoding='utf-16'", "encoding='UTF-8'");
            return format!("{}{}", fixed, rest);
        }
    }
    content.to_string()
}
