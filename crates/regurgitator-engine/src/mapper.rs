//! Node kind → element name and attributes.
//!
//! Element names follow [`NodeKind::label`], so every kind the syntax crate
//! can produce has exactly one element name. Attributes come from the kind's
//! semantic fields and are listed in alphabetical order.

use regurgitator_syntax::{NodeKind, Separator};

use crate::markup::Attribute;

/// Element wrapping each piece of a multi-piece literal.
pub const PIECE_ELEMENT: &str = "s";

/// Element name for a node: its kind's label, except that separators are
/// spelled out since `=`, `,` and `:` are not valid element names.
pub fn element_name(kind: &NodeKind) -> &'static str {
    match kind {
        NodeKind::Separator(Separator::Equals) => "equals",
        NodeKind::Separator(Separator::Comma) => "comma",
        NodeKind::Separator(Separator::Colon) => "colon",
        other => other.label(),
    }
}

pub fn attributes(kind: &NodeKind) -> Vec<Attribute<'_>> {
    match kind {
        NodeKind::Name { id, ctx } => vec![
            Attribute::new("ctx", ctx.as_str()),
            Attribute::new("name", id.as_str()),
        ],
        NodeKind::Attribute { attr, ctx } => vec![
            Attribute::new("attr", attr.as_str()),
            Attribute::new("ctx", ctx.as_str()),
        ],
        NodeKind::Tuple { ctx }
        | NodeKind::List { ctx }
        | NodeKind::Starred { ctx }
        | NodeKind::Subscript { ctx } => vec![Attribute::new("ctx", ctx.as_str())],
        NodeKind::NameConstant(value) => vec![Attribute::new("value", value.as_str())],
        NodeKind::Keyword { arg: Some(arg) } => vec![Attribute::new("arg", arg.as_str())],
        _ => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use regurgitator_syntax::{Constant, ExprContext, Operator};
    use rstest::rstest;

    #[rstest]
    #[case(NodeKind::Num, "Num")]
    #[case(NodeKind::Targets, "targets")]
    #[case(NodeKind::Keyword { arg: None }, "keyword")]
    #[case(NodeKind::Operator(Operator::Add), "Add")]
    #[case(NodeKind::Operator(Operator::NotIn), "NotIn")]
    #[case(NodeKind::Separator(Separator::Comma), "comma")]
    #[case(NodeKind::Separator(Separator::Equals), "equals")]
    #[case(NodeKind::Separator(Separator::Colon), "colon")]
    fn element_names(#[case] kind: NodeKind, #[case] expected: &str) {
        assert_eq!(element_name(&kind), expected);
    }

    fn pairs(kind: &NodeKind) -> Vec<(&'static str, String)> {
        attributes(kind)
            .into_iter()
            .map(|a| (a.name, a.value.into_owned()))
            .collect()
    }

    #[test]
    fn name_attributes_are_sorted() {
        let kind = NodeKind::Name {
            id: "d".into(),
            ctx: ExprContext::Store,
        };
        assert_eq!(
            pairs(&kind),
            vec![("ctx", "Store".to_string()), ("name", "d".to_string())]
        );
    }

    #[test]
    fn every_attribute_list_is_sorted() {
        let kinds = [
            NodeKind::Name {
                id: "x".into(),
                ctx: ExprContext::Load,
            },
            NodeKind::Attribute {
                attr: "y".into(),
                ctx: ExprContext::Del,
            },
            NodeKind::Tuple {
                ctx: ExprContext::Store,
            },
            NodeKind::NameConstant(Constant::None),
            NodeKind::Keyword {
                arg: Some("k".into()),
            },
        ];
        for kind in kinds {
            let names: Vec<_> = attributes(&kind).iter().map(|a| a.name).collect();
            let mut sorted = names.clone();
            sorted.sort_unstable();
            assert_eq!(names, sorted, "{kind:?}");
        }
    }

    #[test]
    fn keyword_without_name_has_no_attributes() {
        assert!(attributes(&NodeKind::Keyword { arg: None }).is_empty());
    }
}
