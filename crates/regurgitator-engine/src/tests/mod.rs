//! End-to-end tests: Python source through the parser and renderer to markup
//! and back.
//!
//! Fixtures (.py) live in `fixtures/`; each one is rendered, checked against
//! the tree it came from and detagged back to its source.


use insta::assert_snapshot;
use pretty_assertions::assert_eq;
use regurgitator_syntax::{SyntaxError, parse_module};
use rstest::rstest;

use crate::separators::{Placement, SeparatorTable};
use crate::{ConvertError, RenderOptions, py2xml, render_document, xml2py};

/// Render without the `<Module>` wrapper.
fn statements(source: &str) -> String {
    let options = RenderOptions {
        module_element: false,
        ..RenderOptions::default()
    };
    py2xml(source, &options).unwrap()
}

fn with_separators(source: &str, separators: SeparatorTable) -> String {
    let options = RenderOptions {
        separators,
        module_element: false,
        ..RenderOptions::default()
    };
    py2xml(source, &options).unwrap()
}

// Simple expressions

#[rstest]
#[case::num("6", "<Expr><Num>6</Num></Expr>")]
#[case::str_double(r#""my string""#, r#"<Expr><Str><s>"my string"</s></Str></Expr>"#)]
#[case::str_triple("'''my 2'''", "<Expr><Str><s>'''my 2'''</s></Str></Expr>")]
#[case::str_multiline(
    "\"\"\"line 1\nline 2\"\"\" ",
    "<Expr><Str><s>\"\"\"line 1\nline 2\"\"\"</s></Str></Expr> "
)]
#[case::str_implicit_concat(
    "'part 1' ' /part 2'",
    "<Expr><Str><s>'part 1'</s> <s>' /part 2'</s></Str></Expr>"
)]
#[case::str_line_continuation(
    "'part 1'  \\\n ' /part 2'",
    "<Expr><Str><s>'part 1'</s>  \\\n <s>' /part 2'</s></Str></Expr>"
)]
#[case::bytes("b'x' b'y'", "<Expr><Bytes><s>b'x'</s> <s>b'y'</s></Bytes></Expr>")]
#[case::joined_str("'a' f'{b}'", "<Expr><JoinedStr><s>'a'</s> <s>f'{b}'</s></JoinedStr></Expr>")]
#[case::tuple(
    "(1,2,3)",
    r#"<Expr><Tuple ctx="Load">(<Num>1</Num>,<Num>2</Num>,<Num>3</Num>)</Tuple></Expr>"#
)]
#[case::tuple_space(
    "(  1, 2,3 )",
    r#"<Expr><Tuple ctx="Load">(  <Num>1</Num>, <Num>2</Num>,<Num>3</Num> )</Tuple></Expr>"#
)]
#[case::name_constant("None", r#"<Expr><NameConstant value="None">None</NameConstant></Expr>"#)]
#[case::ellipsis("...", "<Expr><Ellipsis>...</Ellipsis></Expr>")]
fn simple_expressions(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(statements(source), expected);
}

// Expressions

#[rstest]
#[case::parenthesis("(3 )", "<Expr>(<Num>3</Num> )</Expr>")]
#[case::parenthesis_nested("((3 )  )", "<Expr>((<Num>3</Num> )  )</Expr>")]
#[case::parenthesis_any(
    "( 2+ (3 )  )",
    "<Expr>( <BinOp><Num>2</Num><Add>+ </Add>(<Num>3</Num> )</BinOp>  )</Expr>"
)]
#[case::binop_add(
    "1 + 2",
    "<Expr><BinOp><Num>1</Num><Add> + </Add><Num>2</Num></BinOp></Expr>"
)]
#[case::binop_add_space(
    "3+  4",
    "<Expr><BinOp><Num>3</Num><Add>+  </Add><Num>4</Num></BinOp></Expr>"
)]
#[case::unary(
    "not x",
    r#"<Expr><UnaryOp><Not>not </Not><Name ctx="Load" name="x">x</Name></UnaryOp></Expr>"#
)]
#[case::compare_chain(
    "a < b is not c",
    r#"<Expr><Compare><Name ctx="Load" name="a">a</Name><Lt> < </Lt><Name ctx="Load" name="b">b</Name><IsNot> is not </IsNot><Name ctx="Load" name="c">c</Name></Compare></Expr>"#
)]
#[case::bool_op(
    "a or b",
    r#"<Expr><BoolOp><Name ctx="Load" name="a">a</Name><Or> or </Or><Name ctx="Load" name="b">b</Name></BoolOp></Expr>"#
)]
#[case::call(
    "f(x, k=1)",
    r#"<Expr><Call><Name ctx="Load" name="f">f</Name>(<Name ctx="Load" name="x">x</Name>, <keyword arg="k">k=<Num>1</Num></keyword>)</Call></Expr>"#
)]
#[case::attribute(
    "a.b",
    r#"<Expr><Attribute attr="b" ctx="Load"><Name ctx="Load" name="a">a</Name>.b</Attribute></Expr>"#
)]
#[case::dict(
    "{1: 2}",
    "<Expr><Dict>{<Num>1</Num>: <Num>2</Num>}</Dict></Expr>"
)]
#[case::slice(
    "x[1:2]",
    r#"<Expr><Subscript ctx="Load"><Name ctx="Load" name="x">x</Name>[<Slice><Num>1</Num>:<Num>2</Num></Slice>]</Subscript></Expr>"#
)]
fn expressions(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(statements(source), expected);
}

// Statements

#[rstest]
#[case::assign(
    "d = 5",
    r#"<Assign><targets><Name ctx="Store" name="d">d</Name></targets> = <Num>5</Num></Assign>"#
)]
#[case::assign_space(
    "f  =   7",
    r#"<Assign><targets><Name ctx="Store" name="f">f</Name></targets>  =   <Num>7</Num></Assign>"#
)]
#[case::assign_chained(
    "a = b = 1",
    r#"<Assign><targets><Name ctx="Store" name="a">a</Name> = <Name ctx="Store" name="b">b</Name></targets> = <Num>1</Num></Assign>"#
)]
#[case::aug_assign(
    "x += 1",
    r#"<AugAssign><Name ctx="Store" name="x">x</Name><Add> += </Add><Num>1</Num></AugAssign>"#
)]
#[case::delete(
    "del a, b",
    r#"<Delete>del <targets><Name ctx="Del" name="a">a</Name>, <Name ctx="Del" name="b">b</Name></targets></Delete>"#
)]
#[case::pass_and_return("pass; return", "<Pass>pass</Pass>; <Return>return</Return>")]
fn statements_render(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(statements(source), expected);
}

// Multiline

#[rstest]
#[case::two_lines("6\n7", "<Expr><Num>6</Num></Expr>\n<Expr><Num>7</Num></Expr>")]
#[case::blank_line("6\n\n7", "<Expr><Num>6</Num></Expr>\n\n<Expr><Num>7</Num></Expr>")]
#[case::comment(
    "6\n# my comment\n7",
    "<Expr><Num>6</Num></Expr>\n# my comment\n<Expr><Num>7</Num></Expr>"
)]
fn multiline(#[case] source: &str, #[case] expected: &str) {
    assert_eq!(statements(source), expected);
}

#[test]
fn module_element_wraps_everything() {
    let markup = py2xml("6\n", &RenderOptions::default()).unwrap();
    assert_eq!(markup, "<Module><Expr><Num>6</Num></Expr>\n</Module>");
}

#[test]
fn declaration_prefix() {
    let options = RenderOptions {
        declaration: true,
        ..RenderOptions::default()
    };
    let markup = py2xml("6", &options).unwrap();
    assert_snapshot!(markup, @r#"<?xml version="1.0" encoding="UTF-8"?><Module><Expr><Num>6</Num></Expr></Module>"#);
    assert_eq!(xml2py(&markup).unwrap(), "6");
}

#[test]
fn empty_source() {
    assert_eq!(py2xml("", &RenderOptions::default()).unwrap(), "<Module></Module>");
    assert_eq!(statements(""), "");
}

#[test]
fn wrapped_separators() {
    let markup = with_separators("(1, 2)", SeparatorTable::uniform(Placement::Wrap));
    assert_snapshot!(markup, @r#"<Expr><Tuple ctx="Load">(<Num>1</Num><comma>, </comma><Num>2</Num>)</Tuple></Expr>"#);

    let markup = with_separators("d = {1: 2}", SeparatorTable::uniform(Placement::Wrap));
    assert_snapshot!(markup, @r#"<Assign><targets><Name ctx="Store" name="d">d</Name></targets><equals> = </equals><Dict>{<Num>1</Num><colon>: </colon><Num>2</Num>}</Dict></Assign>"#);
}

#[test]
fn operators_left_in_gap() {
    let separators = SeparatorTable {
        operator: Placement::Gap,
        ..SeparatorTable::default()
    };
    assert_eq!(
        with_separators("1 + 2", separators),
        "<Expr><BinOp><Num>1</Num> + <Num>2</Num></BinOp></Expr>"
    );
}

#[test]
fn text_is_escaped_and_detagged_back() {
    let source = "'<a & b>' < c\r\n";
    let markup = py2xml(source, &RenderOptions::default()).unwrap();
    assert_eq!(
        markup,
        "<Module><Expr><Compare><Str><s>'&lt;a &amp; b&gt;'</s></Str><Lt> &lt; </Lt>\
         <Name ctx=\"Load\" name=\"c\">c</Name></Compare></Expr>&#13;\n</Module>"
    );
    assert_eq!(xml2py(&markup).unwrap(), source);
}

#[test]
fn syntax_errors_are_reported() {
    let err = py2xml("x = = 1", &RenderOptions::default()).unwrap_err();
    assert!(matches!(err, ConvertError::Syntax(SyntaxError::Parse { .. })), "{err}");

    let err = py2xml("1 = x", &RenderOptions::default()).unwrap_err();
    assert_eq!(err.to_string(), "cannot assign to Num at 0..1");
}

// Fixture-based round trips

#[rstest]
#[case::arithmetic("arithmetic")]
#[case::assignments("assignments")]
#[case::collections("collections")]
#[case::strings("strings")]
#[case::comments_and_blank_lines("comments_and_blank_lines")]
fn fixture_round_trip(#[case] name: &str) {
    assert_fixture(name);
}

fn assert_fixture(name: &str) {
    let fixtures_dir = format!("{}/src/tests/fixtures", env!("CARGO_MANIFEST_DIR"));
    let source = std::fs::read_to_string(format!("{fixtures_dir}/{name}.py")).unwrap();

    let tree = parse_module(&source).unwrap();
    for separators in [SeparatorTable::default(), SeparatorTable::uniform(Placement::Wrap)] {
        let options = RenderOptions {
            separators,
            ..RenderOptions::default()
        };
        let document = render_document(&tree, &source, &options).unwrap();
        invariants::check(&source, &tree, &document, &separators);
        assert_eq!(xml2py(&document.to_markup().unwrap()).unwrap(), source);
    }
}
