use std::fmt::{self, Write};

use html_escape::{encode_double_quoted_attribute, encode_text};

use super::{MarkupEvent, MarkupSink};

/// The declaration prefixed to full documents.
pub const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serializes markup events as text.
///
/// Text escapes `&`, `<` and `>`; attribute values are double quoted and also
/// escape `"`. Carriage returns are written as `&#13;` so that conforming XML
/// readers, which normalize line endings, still see the original bytes.
#[derive(Debug, Default)]
pub struct MarkupWriter<W = String> {
    out: W,
}

impl MarkupWriter<String> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<W: Write> MarkupWriter<W> {
    pub fn with_output(out: W) -> Self {
        Self { out }
    }

    pub fn declaration(&mut self) -> fmt::Result {
        self.out.write_str(DECLARATION)
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn text(&mut self, text: &str) -> fmt::Result {
        let escaped = encode_text(text);
        if escaped.contains('\r') {
            self.out.write_str(&escaped.replace('\r', "&#13;"))
        } else {
            self.out.write_str(&escaped)
        }
    }
}

impl<'a, W: Write> MarkupSink<'a> for MarkupWriter<W> {
    fn event(&mut self, event: MarkupEvent<'a>) -> fmt::Result {
        match event {
            MarkupEvent::Open { name, attributes } => {
                write!(self.out, "<{name}")?;
                for attribute in &attributes {
                    write!(
                        self.out,
                        " {}=\"{}\"",
                        attribute.name,
                        encode_double_quoted_attribute(&attribute.value)
                    )?;
                }
                self.out.write_char('>')
            }
            MarkupEvent::Close { name } => write!(self.out, "</{name}>"),
            MarkupEvent::Text(text) => self.text(text),
        }
    }
}
