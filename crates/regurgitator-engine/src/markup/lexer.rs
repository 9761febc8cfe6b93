//! Logos tokenizer for markup text.
//!
//! Markup is tokenized at tag granularity: a whole start tag (attributes
//! included) is one token, and so is every comment, CDATA section,
//! processing instruction and declaration. Anything else up to the next `<`
//! is text. A `<` that starts none of these is a lexing error.

use std::ops::Range;

use logos::{Lexer, Logos};

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupToken {
    /// `<!-- ... -->`
    #[token("<!--", comment_end)]
    Comment,

    /// `<![CDATA[ ... ]]>`
    #[token("<![CDATA[", cdata_end)]
    CData,

    /// `<? ... ?>`
    #[token("<?", instruction_end)]
    Instruction,

    /// `<!DOCTYPE ...>` and other declarations
    #[regex("<![A-Za-z]", declaration_end)]
    Declaration,

    /// `<name attr="v">`; the payload is true for `<name/>`
    #[regex(r"<[A-Za-z_:][A-Za-z0-9_:.\-]*", start_tag_end)]
    StartTag(bool),

    #[regex(r"</[A-Za-z_:][A-Za-z0-9_:.\-]*[ \t\r\n]*>")]
    EndTag,

    #[regex("[^<]+")]
    Text,
}

/// Consume everything up to and including `terminator`.
fn skip_past(lex: &mut Lexer<'_, MarkupToken>, terminator: &str) -> bool {
    match lex.remainder().find(terminator) {
        Some(at) => {
            lex.bump(at + terminator.len());
            true
        }
        None => false,
    }
}

fn comment_end(lex: &mut Lexer<'_, MarkupToken>) -> bool {
    skip_past(lex, "-->")
}

fn cdata_end(lex: &mut Lexer<'_, MarkupToken>) -> bool {
    skip_past(lex, "]]>")
}

fn instruction_end(lex: &mut Lexer<'_, MarkupToken>) -> bool {
    skip_past(lex, "?>")
}

fn declaration_end(lex: &mut Lexer<'_, MarkupToken>) -> bool {
    skip_past(lex, ">")
}

/// Find the `>` closing a start tag, skipping quoted attribute values.
fn start_tag_end(lex: &mut Lexer<'_, MarkupToken>) -> Option<bool> {
    let rest = lex.remainder().as_bytes();
    let mut quote = None;

    for (i, &b) in rest.iter().enumerate() {
        match (quote, b) {
            (Some(q), _) if b == q => quote = None,
            (Some(_), _) => {}
            (None, b'"' | b'\'') => quote = Some(b),
            (None, b'<') => return None,
            (None, b'>') => {
                let self_closing = i > 0 && rest[i - 1] == b'/';
                lex.bump(i + 1);
                return Some(self_closing);
            }
            (None, _) => {}
        }
    }

    None
}

/// A token with its byte range, or the offset of unrecognised input.
pub type Spanned = Result<(MarkupToken, Range<usize>), usize>;

/// Tokenize markup text.
pub fn tokenize(markup: &str) -> impl Iterator<Item = Spanned> + '_ {
    MarkupToken::lexer(markup)
        .spanned()
        .map(|(token, span)| match token {
            Ok(token) => Ok((token, span)),
            Err(()) => Err(span.start),
        })
}
