//! # Markup documents
//!
//! The renderer produces a stream of [`MarkupEvent`]s. Concatenating the
//! payloads of the `Text` events, in order, yields the source text exactly;
//! everything else in the document is annotation.
//!
//! - [`MarkupSink`] receives events as they are produced
//! - [`MarkupDocument`] collects them in memory
//! - [`writer::MarkupWriter`] serializes them as escaped markup text
//! - [`lexer`] and [`tree`] read markup text back into a generic element tree

pub mod lexer;
pub mod tree;
pub mod writer;

use std::borrow::Cow;
use std::fmt;

/// A `name="value"` pair on an opening tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute<'a> {
    pub name: &'static str,
    pub value: Cow<'a, str>,
}

impl<'a> Attribute<'a> {
    pub fn new(name: &'static str, value: impl Into<Cow<'a, str>>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupEvent<'a> {
    Open {
        name: &'static str,
        attributes: Vec<Attribute<'a>>,
    },
    Close {
        name: &'static str,
    },
    /// A verbatim slice of the source.
    Text(&'a str),
}

/// Receives markup events in document order.
pub trait MarkupSink<'a> {
    fn event(&mut self, event: MarkupEvent<'a>) -> fmt::Result;
}

/// Events collected in memory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupDocument<'a> {
    events: Vec<MarkupEvent<'a>>,
}

impl<'a> MarkupDocument<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[MarkupEvent<'a>] {
        &self.events
    }

    /// The concatenated text payloads, with all tags dropped.
    pub fn text(&self) -> String {
        self.events
            .iter()
            .filter_map(|event| match event {
                MarkupEvent::Text(text) => Some(*text),
                _ => None,
            })
            .collect()
    }

    /// Serialize as markup text.
    pub fn to_markup(&self) -> Result<String, fmt::Error> {
        let mut writer = writer::MarkupWriter::new();
        for event in &self.events {
            writer.event(event.clone())?;
        }
        Ok(writer.into_inner())
    }
}

impl<'a> MarkupSink<'a> for MarkupDocument<'a> {
    fn event(&mut self, event: MarkupEvent<'a>) -> fmt::Result {
        self.events.push(event);
        Ok(())
    }
}
