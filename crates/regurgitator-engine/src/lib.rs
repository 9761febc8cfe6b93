//! # regurgitator-engine
//!
//! Renders a [`SyntaxNode`] tree and the source text it was parsed from into
//! a markup document whose elements mirror the tree, and reads such documents
//! back into the exact source text.
//!
//! ```text
//! source ──parse_module──► SyntaxNode ──render──► MarkupEvent* ──MarkupWriter──► markup
//! markup ──tree::parse──► MarkupNode* ──detag──► source
//! ```
//!
//! The one guarantee everything rests on: the `Text` events of a rendered
//! document, concatenated in order, are the source text byte for byte. Tags
//! and attributes are annotation only, so [`detag`] never needs to know what
//! they mean.
//!
//! ```
//! use regurgitator_engine::{py2xml, xml2py, RenderOptions};
//!
//! let source = "d = 5\n";
//! let markup = py2xml(source, &RenderOptions::default()).unwrap();
//! assert_eq!(
//!     markup,
//!     "<Module><Assign><targets><Name ctx=\"Store\" name=\"d\">d</Name></targets> = <Num>5</Num></Assign>\n</Module>"
//! );
//! assert_eq!(xml2py(&markup).unwrap(), source);
//! ```

pub mod detag;
pub mod error;
pub mod mapper;
pub mod markup;
pub mod render;
pub mod separators;
mod source;

#[cfg(test)]
pub mod tests;

pub use detag::detag;
pub use error::{ConvertError, MarkupError, RenderError};
pub use markup::writer::MarkupWriter;
pub use markup::{Attribute, MarkupDocument, MarkupEvent, MarkupSink};
pub use regurgitator_syntax::{SyntaxError, SyntaxNode, parse_module};
pub use render::Renderer;
pub use separators::{Placement, SeparatorTable};
pub use source::CursorError;

use log::debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderOptions {
    pub separators: SeparatorTable,
    /// Wrap the output in the root's element. When unset the document is a
    /// fragment of top-level statements and text.
    pub module_element: bool,
    /// Prefix the XML declaration.
    pub declaration: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            separators: SeparatorTable::default(),
            module_element: true,
            declaration: false,
        }
    }
}

/// Stream the rendering of `tree` over `source` into `sink`.
///
/// The declaration is not part of the event stream; callers that want one
/// write it themselves.
pub fn render_to<'a, S: MarkupSink<'a>>(
    tree: &'a SyntaxNode,
    source: &'a str,
    options: &RenderOptions,
    sink: &mut S,
) -> Result<(), RenderError> {
    Renderer::new(source, &options.separators, sink).render_root(tree, options.module_element)
}

/// Render `tree` into an in-memory event list.
pub fn render_document<'a>(
    tree: &'a SyntaxNode,
    source: &'a str,
    options: &RenderOptions,
) -> Result<MarkupDocument<'a>, RenderError> {
    let mut document = MarkupDocument::new();
    render_to(tree, source, options, &mut document)?;
    Ok(document)
}

/// Parse Python source and render it as markup text.
pub fn py2xml(source: &str, options: &RenderOptions) -> Result<String, ConvertError> {
    let tree = parse_module(source)?;
    let mut writer = MarkupWriter::new();
    if options.declaration {
        writer.declaration().map_err(RenderError::from)?;
    }
    render_to(&tree, source, options, &mut writer)?;
    let markup = writer.into_inner();
    debug!("rendered {} bytes of source into {} bytes of markup", source.len(), markup.len());
    Ok(markup)
}

/// Recover the source text from markup.
pub fn xml2py(markup: &str) -> Result<String, MarkupError> {
    detag(markup)
}
