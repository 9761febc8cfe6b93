//! Sink for converting parser events into a Rowan green tree.
//!
//! The parser works on significant tokens only; the sink walks the full token
//! stream and re-inserts trivia. Trivia ahead of a node is placed *before* the
//! node starts, and trivia after a node's last token is only emitted when the
//! next token arrives, so every node's range is tight around its significant
//! tokens. Everything before the first and after the last statement ends up
//! directly under the root.

use rowan::{GreenNode, GreenNodeBuilder};

use crate::lexer::Token;
use crate::parser::event::Event;
use crate::syntax_kind::SyntaxKind;

/// Converts parser events and tokens into a Rowan green tree.
pub struct Sink<'t, 'input> {
    builder: GreenNodeBuilder<'static>,
    tokens: &'t [Token<'input>],
    cursor: usize,
    depth: usize,
    events: Vec<Event>,
}

impl<'t, 'input> Sink<'t, 'input> {
    /// Create a new sink.
    pub fn new(tokens: &'t [Token<'input>], events: Vec<Event>) -> Self {
        Self {
            builder: GreenNodeBuilder::new(),
            tokens,
            cursor: 0,
            depth: 0,
            events,
        }
    }

    /// Consume the sink and build the green tree.
    pub fn finish(mut self) -> GreenNode {
        let mut forward_parents = Vec::new();

        for i in 0..self.events.len() {
            match std::mem::replace(&mut self.events[i], Event::Placeholder) {
                Event::Start {
                    kind,
                    forward_parent,
                } => {
                    forward_parents.push(kind);
                    let mut fp = forward_parent;

                    while let Some(parent_idx) = fp {
                        match std::mem::replace(&mut self.events[parent_idx], Event::Placeholder) {
                            Event::Start {
                                kind,
                                forward_parent,
                            } => {
                                fp = forward_parent;
                                forward_parents.push(kind);
                            }
                            _ => unreachable!(),
                        }
                    }

                    // The root owns leading trivia; every other node starts tight.
                    if self.depth > 0 {
                        self.eat_trivia();
                    }

                    // Start nodes in reverse order (outermost first)
                    for kind in forward_parents.drain(..).rev() {
                        self.builder.start_node(kind.into());
                        self.depth += 1;
                    }
                }
                Event::Token { kind } => {
                    self.eat_trivia();
                    self.token(kind);
                }
                Event::Finish => {
                    if self.depth == 1 {
                        self.eat_trivia();
                    }
                    self.builder.finish_node();
                    self.depth -= 1;
                }
                Event::Placeholder => {}
            }
        }

        self.builder.finish()
    }

    fn eat_trivia(&mut self) {
        while let Some(token) = self.tokens.get(self.cursor) {
            if !token.kind.is_trivia() {
                break;
            }
            self.builder.token(token.kind.into(), token.text);
            self.cursor += 1;
        }
    }

    fn token(&mut self, kind: SyntaxKind) {
        let token = &self.tokens[self.cursor];
        self.builder.token(kind.into(), token.text);
        self.cursor += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::lex;
    use crate::syntax_kind::CstNode;

    #[test]
    fn sink_builds_simple_tree() {
        let tokens = lex("x");

        let events = vec![
            Event::start(SyntaxKind::MODULE),
            Event::start(SyntaxKind::NAME_EXPR),
            Event::token(SyntaxKind::NAME),
            Event::Finish,
            Event::Finish,
        ];

        let tree = CstNode::new_root(Sink::new(&tokens, events).finish());

        assert_eq!(tree.kind(), SyntaxKind::MODULE);
        assert_eq!(tree.children().count(), 1);
    }

    #[test]
    fn sink_keeps_trivia_outside_nodes() {
        let input = "  x  ";
        let tokens = lex(input);

        let events = vec![
            Event::start(SyntaxKind::MODULE),
            Event::start(SyntaxKind::NAME_EXPR),
            Event::token(SyntaxKind::NAME),
            Event::Finish,
            Event::Finish,
        ];

        let tree = CstNode::new_root(Sink::new(&tokens, events).finish());
        let name = tree.children().next().unwrap();

        assert_eq!(tree.text().to_string(), input);
        assert_eq!(name.text().to_string(), "x");
    }
}
