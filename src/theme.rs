//! Theme part parsing for the default latin typefaces.

use crate::container::THEME_PART;
use crate::error::{Error, Result};
use crate::model::ThemeFonts;

impl ThemeFonts {
    /// Parse the theme part's font scheme.
    ///
    /// Extracts the latin typeface under the major-font and minor-font
    /// elements of `a:themeElements/a:fontScheme`. A slot without a latin
    /// typeface stays `None`. Malformed theme XML is fatal.
    pub fn parse(xml: &str) -> Result<ThemeFonts> {
        let mut theme = ThemeFonts::default();
        let mut reader = quick_xml::Reader::from_str(xml);
        reader.config_mut().trim_text(true);

        let mut buf = Vec::new();
        let mut in_font_scheme = false;
        let mut in_major = false;
        let mut in_minor = false;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(quick_xml::events::Event::Start(ref e)) => {
                    match e.name().local_name().as_ref() {
                        b"fontScheme" => in_font_scheme = true,
                        b"majorFont" if in_font_scheme => in_major = true,
                        b"minorFont" if in_font_scheme => in_minor = true,
                        b"latin" => {
                            let typeface = typeface_attr(e);
                            if in_major && theme.major_latin.is_none() {
                                theme.major_latin = typeface;
                            } else if in_minor && theme.minor_latin.is_none() {
                                theme.minor_latin = typeface;
                            }
                        }
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Empty(ref e)) => {
                    if e.name().local_name().as_ref() == b"latin" {
                        let typeface = typeface_attr(e);
                        if in_major && theme.major_latin.is_none() {
                            theme.major_latin = typeface;
                        } else if in_minor && theme.minor_latin.is_none() {
                            theme.minor_latin = typeface;
                        }
                    }
                }
                Ok(quick_xml::events::Event::End(ref e)) => {
                    match e.name().local_name().as_ref() {
                        b"fontScheme" => in_font_scheme = false,
                        b"majorFont" => in_major = false,
                        b"minorFont" => in_minor = false,
                        _ => {}
                    }
                }
                Ok(quick_xml::events::Event::Eof) => break,
                Err(e) => return Err(Error::malformed(THEME_PART, e)),
                _ => {}
            }
            buf.clear();
        }

        Ok(theme)
    }
}

/// Non-empty `typeface` attribute of a font-reference element.
pub(crate) fn typeface_attr(e: &quick_xml::events::BytesStart<'_>) -> Option<String> {
    for attr in e.attributes().flatten() {
        if attr.key.local_name().as_ref() == b"typeface" {
            let value = String::from_utf8_lossy(&attr.value).to_string();
            if !value.is_empty() {
                return Some(value);
            }
        }
    }
    None
}
