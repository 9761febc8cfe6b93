//! Markup → source text.
//!
//! The document is parsed into a generic element tree and every text node is
//! concatenated in document order. Element names and attributes only matter
//! for well-formedness; nothing here looks at what they say.

use log::debug;

use crate::error::MarkupError;
use crate::markup::tree::{self, MarkupNode};

/// Recover the text of a markup document.
pub fn detag(markup: &str) -> Result<String, MarkupError> {
    let roots = tree::parse(markup)?;
    let mut out = String::with_capacity(markup.len());

    // Children are pushed in reverse so they pop in document order.
    let mut stack: Vec<&MarkupNode<'_>> = roots.iter().rev().collect();
    while let Some(node) = stack.pop() {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element(element) => stack.extend(element.children.iter().rev()),
        }
    }

    debug!("detagged {} bytes of markup into {} bytes", markup.len(), out.len());
    Ok(out)
}
