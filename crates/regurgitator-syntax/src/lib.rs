//! # regurgitator-syntax
//!
//! A lossless syntax tree for a subset of Python using [Rowan] + [Logos],
//! following the [rust-analyzer] architecture model, and a lowering pass that
//! turns it into the span-carrying AST consumed by the markup renderer.
//!
//! [Rowan]: https://docs.rs/rowan
//! [Logos]: https://docs.rs/logos
//! [rust-analyzer]: https://rust-analyzer.github.io/book/contributing/syntax.html
//!
//! ## Architecture Overview
//!
//! ```text
//! Source Text → Lexer → Tokens → Parser → Events → Sink → Rowan Tree → Lowering → SyntaxNode
//!               (Logos)          (Grammar)        (GreenNodeBuilder)  (lower)
//! ```
//!
//! The Rowan tree keeps every byte: whitespace, comments, parentheses and
//! punctuation are all tokens. The [`SyntaxNode`] tree keeps none of them; it
//! stores [`Span`]s into the source instead, so the text between nodes can be
//! recovered exactly without ever being copied.
//!
//! ## Module Structure
//!
//! ```text
//! regurgitator-syntax/
//! ├── lib.rs           # This file - public API and integration tests
//! ├── syntax_kind.rs   # SyntaxKind enum (tokens + nodes) and Rowan integration
//! ├── lexer.rs         # Logos-based tokenizer with bracket-aware newlines
//! ├── span.rs          # Byte ranges into the source
//! ├── ast.rs           # NodeKind, SyntaxNode, operators and contexts
//! ├── error.rs         # SyntaxError
//! ├── parser/
//! │   ├── mod.rs       # Parser struct, Marker system, public parse() function
//! │   ├── event.rs     # Event enum (Start, Token, Finish, Placeholder)
//! │   ├── sink.rs      # Converts events to Rowan GreenNode
//! │   └── grammar/     # Statement and expression rules
//! └── lower/           # CST → SyntaxNode, target contexts
//! ```
//!
//! ## Quick Start
//!
//! ```
//! use regurgitator_syntax::{parse_module, NodeKind};
//!
//! let module = parse_module("d = 5\n").unwrap();
//! assert_eq!(module.kind, NodeKind::Module);
//! assert_eq!(module.children()[0].kind, NodeKind::Assign);
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod lower;
pub mod parser;
pub mod span;
pub mod syntax_kind;

pub use ast::{
    Constant, Content, ExprContext, NodeKind, NodeSpan, Operator, Separator, SyntaxNode,
};
pub use error::SyntaxError;
pub use parser::{Parse, ParseError, parse};
pub use span::Span;
pub use syntax_kind::{CstElement, CstNode, CstToken, PythonLang, SyntaxKind};

impl From<&ParseError> for SyntaxError {
    fn from(error: &ParseError) -> Self {
        SyntaxError::Parse {
            message: error.message.clone(),
            offset: error.offset,
        }
    }
}

/// Parse source text and lower it to the AST.
///
/// The first parse error, if any, is returned instead of a tree.
pub fn parse_module(source: &str) -> Result<SyntaxNode, SyntaxError> {
    let parse = parse(source);
    if let Some(error) = parse.errors().first() {
        return Err(error.into());
    }
    lower::module(&parse.syntax())
}

#[cfg(test)]
mod tests {
    use super::*;
    use insta::assert_snapshot;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// Helper to format a syntax tree for snapshot testing.
    fn format_tree(node: &CstNode, indent: usize) -> String {
        let mut result = String::new();
        let prefix = "  ".repeat(indent);

        result.push_str(&format!(
            "{}{:?}@{:?}\n",
            prefix,
            node.kind(),
            node.text_range()
        ));

        for child in node.children_with_tokens() {
            match child {
                rowan::NodeOrToken::Node(n) => {
                    result.push_str(&format_tree(&n, indent + 1));
                }
                rowan::NodeOrToken::Token(t) => {
                    let text = t.text().replace('\n', "\\n");
                    result.push_str(&format!(
                        "{}  {:?}@{:?} {:?}\n",
                        prefix,
                        t.kind(),
                        t.text_range(),
                        text
                    ));
                }
            }
        }

        result
    }

    /// One line per AST node: kind, semantic fields and span.
    fn format_ast(node: &SyntaxNode, indent: usize) -> String {
        let mut result = "  ".repeat(indent);
        result.push_str(node.kind.label());
        if let NodeKind::Name { id, .. } = &node.kind {
            result.push_str(&format!(" {id}"));
        }
        if let Some(ctx) = node.kind.context() {
            result.push_str(&format!(" {}", ctx.as_str()));
        }
        match node.span {
            NodeSpan::Parsed { span, outer } if span == outer => {
                result.push_str(&format!(" @{span}"));
            }
            NodeSpan::Parsed { span, outer } => {
                result.push_str(&format!(" @{span} ({outer})"));
            }
            NodeSpan::Synthesized => result.push_str(" @synth"),
        }
        for piece in node.pieces() {
            result.push_str(&format!(" [{piece}]"));
        }
        result.push('\n');
        for child in node.children() {
            result.push_str(&format_ast(child, indent + 1));
        }
        result
    }

    fn ast(source: &str) -> String {
        format_ast(&parse_module(source).unwrap(), 0)
    }

    #[test]
    fn snapshot_assignment_cst() {
        let tree = parse("d = 5\n").syntax();
        assert_snapshot!(format_tree(&tree, 0), @r#"
        MODULE@0..6
          ASSIGN_STMT@0..5
            NAME_EXPR@0..1
              NAME@0..1 "d"
            WHITESPACE@1..2 " "
            EQ@2..3 "="
            WHITESPACE@3..4 " "
            NUMBER_LIT@4..5
              NUMBER@4..5 "5"
          NEWLINE@5..6 "\\n"
        "#);
    }

    #[test]
    fn snapshot_assignment_ast() {
        assert_snapshot!(ast("d = 5\n"), @r"
        Module @0..6
          Assign @0..5
            targets @0..1
              Name d Store @0..1
            = @synth
            Num @4..5
        ");
    }

    #[test]
    fn snapshot_grouped_binop_ast() {
        assert_snapshot!(ast("( 2+ (3 )  )"), @r"
        Module @0..12
          Expr @0..12
            BinOp @2..9 (0..12)
              Num @2..3
              Add @synth
              Num @6..7 (5..9)
        ");
    }

    #[test]
    fn snapshot_implicit_concatenation_ast() {
        assert_snapshot!(ast("'part 1'  \\\n' /part 2'"), @r"
        Module @0..22
          Expr @0..22
            Str @0..22 [0..8] [12..22]
        ");
    }

    #[test]
    fn chained_assignment_shares_one_targets_node() {
        assert_eq!(
            ast("a = (b) = 1"),
            "Module @0..11\n  Assign @0..11\n    targets @0..7\n      Name a Store @0..1\n      = @synth\n      Name b Store @5..6 (4..7)\n    = @synth\n    Num @10..11\n"
        );
    }

    #[test]
    fn store_context_reaches_nested_targets() {
        let module = parse_module("[a, (b, *c)] = x").unwrap();
        let contexts: Vec<_> = module
            .descendants()
            .filter_map(|n| match &n.kind {
                NodeKind::Name { id, ctx } => Some((id.as_str(), *ctx)),
                _ => None,
            })
            .collect();
        assert_eq!(
            contexts,
            vec![
                ("a", ExprContext::Store),
                ("b", ExprContext::Store),
                ("c", ExprContext::Store),
                ("x", ExprContext::Load),
            ]
        );
    }

    #[test]
    fn attribute_target_keeps_its_value_loaded() {
        let module = parse_module("self.x = 1").unwrap();
        let attribute = &module.children()[0].children()[0].children()[0];
        assert_eq!(
            attribute.kind,
            NodeKind::Attribute {
                attr: "x".into(),
                ctx: ExprContext::Store
            }
        );
        assert_eq!(attribute.children()[0].kind.context(), Some(ExprContext::Load));
    }

    #[test]
    fn bare_del_targets_are_flattened() {
        assert_eq!(
            ast("del a, b"),
            "Module @0..8\n  Delete @0..8\n    targets @4..8\n      Name a Del @4..5\n      , @synth\n      Name b Del @7..8\n"
        );
    }

    #[test]
    fn compare_groups_two_word_operators() {
        let module = parse_module("a is not b not in c").unwrap();
        let ops: Vec<_> = module
            .descendants()
            .filter(|n| n.is_synthesized())
            .map(|n| n.kind.label())
            .collect();
        assert_eq!(ops, ["IsNot", "NotIn"]);
    }

    #[rstest]
    #[case("'a' 'b'", NodeKind::Str)]
    #[case("b'a' rb'b'", NodeKind::Bytes)]
    #[case("'a' f'{b}'", NodeKind::JoinedStr)]
    fn string_literal_kind(#[case] source: &str, #[case] expected: NodeKind) {
        let module = parse_module(source).unwrap();
        assert_eq!(module.children()[0].children()[0].kind, expected);
    }

    #[rstest]
    #[case("1 = x", "cannot assign to Num at 0..1")]
    #[case("(a, b) += 1", "cannot augmented-assign to Tuple at 0..6")]
    #[case("del *a", "cannot delete Starred at 4..6")]
    #[case("b'a' 'b'", "cannot mix bytes and non-bytes literals at 0..8")]
    #[case("x = )", "syntax error at byte 4: expected expression")]
    #[case("if x: pass", "syntax error at byte 0: expected statement")]
    #[case("x = yield", "syntax error at byte 4: `yield` is not supported")]
    #[case("lambda = 1", "syntax error at byte 0: `lambda` is not supported")]
    #[case("class.x = 2", "syntax error at byte 0: `class` is not supported")]
    #[case("f(await g)", "syntax error at byte 2: `await` is not supported")]
    #[case("import os", "syntax error at byte 0: `import` is not supported")]
    #[case("x = [i for i in y]", "syntax error at byte 7: expected `]`")]
    #[case("assert x", "syntax error at byte 0: `assert` is not supported")]
    #[case("raise", "syntax error at byte 0: `raise` is not supported")]
    fn rejected_source(#[case] source: &str, #[case] message: &str) {
        let error = parse_module(source).unwrap_err();
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn long_operator_chain_is_rejected_not_overflowed() {
        let source = format!("x = {}1", "'s' + ".repeat(10_000));
        let error = parse_module(&source).unwrap_err();
        assert!(
            matches!(&error, SyntaxError::Parse { message, offset }
                if message.contains("nested more than") && *offset > 4),
            "{error}"
        );
    }

    #[test]
    fn deep_brackets_are_rejected_not_overflowed() {
        for (open, close) in [("(", ")"), ("[", "]")] {
            let source = format!("{}1{}", open.repeat(10_000), close.repeat(10_000));
            let error = parse_module(&source).unwrap_err();
            assert!(error.to_string().contains("nested more than"), "{error}");
        }
        let source = format!("{}x", "not ".repeat(10_000));
        assert!(parse_module(&source).is_err());
    }

    #[test]
    fn chain_within_the_nesting_limit_lowers() {
        let source = format!("x = {}1", "'s' + ".repeat(150));
        let module = parse_module(&source).unwrap();
        let binops = module
            .descendants()
            .filter(|n| n.kind == NodeKind::BinOp)
            .count();
        assert_eq!(binops, 150);
    }

    #[test]
    fn lone_carriage_returns_and_bom_are_accepted() {
        let module = parse_module("\u{feff}x = 1\ry = 2\r").unwrap();
        let kinds: Vec<_> = module.children().iter().map(|n| n.kind.label()).collect();
        assert_eq!(kinds, ["Assign", "Assign"]);
    }

    #[test]
    fn roundtrip_preserves_text() {
        let inputs = [
            "6\n",
            "\"my string\"\n",
            "(1,2,3)\n",
            "x = [\n    1,  # one\n    2,\n]\n",
            "a = b if c else d  # trailing\n",
            "f(a, *b, k=1, **c)[1:2, ::3].attr\n",
            "  \n# only a comment\n\n",
        ];

        for input in inputs {
            let parse = parse(input);
            assert!(parse.is_ok(), "{input:?}: {:?}", parse.errors());
            assert_eq!(
                parse.syntax().text().to_string(),
                input,
                "Roundtrip failed for: {:?}",
                input
            );
        }
    }
}
