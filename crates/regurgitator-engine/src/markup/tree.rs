//! Generic element tree built from markup text.
//!
//! Element names and attributes are checked for well-formedness and kept,
//! but never interpreted: any document with balanced tags parses, whatever
//! vocabulary it uses.

use std::borrow::Cow;

use html_escape::decode_html_entities;

use super::lexer::{MarkupToken, tokenize};
use crate::error::MarkupError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode<'a> {
    Element(Element<'a>),
    /// Text with entities decoded, or the verbatim body of a CDATA section.
    Text(Cow<'a, str>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element<'a> {
    pub name: &'a str,
    pub attributes: Vec<(&'a str, Cow<'a, str>)>,
    pub children: Vec<MarkupNode<'a>>,
    /// Byte offset of the start tag.
    pub offset: usize,
}

/// Parse markup into its top-level nodes.
///
/// Several top-level nodes are allowed, so fragments parse as well as full
/// documents. Comments, processing instructions and declarations are dropped.
pub fn parse(markup: &str) -> Result<Vec<MarkupNode<'_>>, MarkupError> {
    let mut roots = Vec::new();
    let mut open: Vec<Element<'_>> = Vec::new();

    for token in tokenize(markup) {
        let (token, range) = token.map_err(|offset| MarkupError::Unrecognized { offset })?;
        let slice = &markup[range.clone()];

        let node = match token {
            MarkupToken::Text => MarkupNode::Text(decode_html_entities(slice)),
            MarkupToken::CData => {
                let body = &slice["<![CDATA[".len()..slice.len() - "]]>".len()];
                MarkupNode::Text(Cow::Borrowed(body))
            }
            MarkupToken::Comment | MarkupToken::Instruction | MarkupToken::Declaration => continue,
            MarkupToken::StartTag(self_closing) => {
                let element = start_tag(slice, range.start)?;
                if !self_closing {
                    open.push(element);
                    continue;
                }
                MarkupNode::Element(element)
            }
            MarkupToken::EndTag => {
                let name = slice[2..slice.len() - 1].trim_end();
                let Some(element) = open.pop() else {
                    return Err(MarkupError::UnexpectedClose {
                        name: name.to_string(),
                        offset: range.start,
                    });
                };
                if element.name != name {
                    return Err(MarkupError::Mismatched {
                        expected: element.name.to_string(),
                        found: name.to_string(),
                        opened: element.offset,
                        offset: range.start,
                    });
                }
                MarkupNode::Element(element)
            }
        };

        match open.last_mut() {
            Some(parent) => parent.children.push(node),
            None => roots.push(node),
        }
    }

    if let Some(element) = open.pop() {
        return Err(MarkupError::Unclosed {
            name: element.name.to_string(),
            offset: element.offset,
        });
    }

    Ok(roots)
}

/// Split a start tag token into its name and attributes.
fn start_tag(tag: &str, offset: usize) -> Result<Element<'_>, MarkupError> {
    let malformed = |message| MarkupError::MalformedTag { offset, message };

    let inner = tag
        .strip_prefix('<')
        .and_then(|t| t.strip_suffix('>'))
        .ok_or_else(|| malformed("missing angle brackets"))?;
    let inner = inner.strip_suffix('/').unwrap_or(inner);

    let name_end = inner
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(inner.len());
    let (name, mut rest) = inner.split_at(name_end);

    let mut attributes = Vec::new();
    loop {
        rest = rest.trim_start_matches(|c: char| c.is_ascii_whitespace());
        if rest.is_empty() {
            break;
        }

        let eq = rest.find('=').ok_or_else(|| malformed("attribute without a value"))?;
        let attr_name = rest[..eq].trim_end();
        if attr_name.is_empty() || attr_name.contains(|c: char| c.is_ascii_whitespace()) {
            return Err(malformed("invalid attribute name"));
        }

        let value_part = rest[eq + 1..].trim_start_matches(|c: char| c.is_ascii_whitespace());
        let quote = value_part
            .chars()
            .next()
            .filter(|c| *c == '"' || *c == '\'')
            .ok_or_else(|| malformed("unquoted attribute value"))?;
        let body = &value_part[1..];
        let close = body
            .find(quote)
            .ok_or_else(|| malformed("unterminated attribute value"))?;

        attributes.push((attr_name, decode_html_entities(&body[..close])));
        rest = &body[close + 1..];
    }

    Ok(Element {
        name,
        attributes,
        children: Vec::new(),
        offset,
    })
}
