//! Indentation-aware tokenizer for Wirekit source text.
//!
//! Whitespace inside a line is insignificant, but line structure is not: the
//! tokenizer emits [`Token::Newline`] at the end of every line that produced a
//! token and turns changes in leading indentation into [`Token::Indent`] and
//! [`Token::Dedent`]. Blank and comment-only lines never affect indentation.
//!
//! The [`Tokenizer`] is pull-based: the parser drives it through
//! [`Tokenizer::peek`] and [`Tokenizer::advance`]. Lexical problems become
//! [`Token::Invalid`] tokens plus diagnostics; tokenizing never fails and
//! always ends with [`Token::Eof`].

use std::collections::VecDeque;

use log::trace;
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, not, opt, peek, preceded, terminated},
    error::ModalResult,
    stream::{LocatingSlice, Location as _, Stream},
    token::{one_of, take_while},
};

use wirekit_core::span::{LineIndex, Span};

use crate::{
    error::{Diagnostic, ErrorCode},
    tokens::{LexError, PositionedToken, Token},
};

/// Columns a tab counts for when measuring indentation.
pub const TAB_WIDTH: usize = 4;

type Input<'a> = LocatingSlice<&'a str>;

fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_'
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

/// Succeeds, consuming nothing, when the next character cannot continue a word.
fn word_boundary(input: &mut Input<'_>) -> ModalResult<()> {
    peek(not(one_of(is_ident_char))).parse_next(input)
}

fn identifier_text<'a>(input: &mut Input<'a>) -> ModalResult<&'a str> {
    (one_of(is_ident_start), take_while(0.., is_ident_char))
        .take()
        .parse_next(input)
}

/// Parse identifiers and keywords
fn word<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    identifier_text
        .map(|word| match word {
            "style" => Token::Style,
            "let" => Token::Let,
            "when" => Token::When,
            _ => Token::Identifier(word),
        })
        .parse_next(input)
}

/// Parse a `$name` variable reference
fn variable<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    preceded('$', identifier_text)
        .map(Token::Variable)
        .parse_next(input)
}

fn placement_value(input: &mut Input<'_>) -> ModalResult<u32> {
    terminated(
        digit1.try_map(|digits: &str| digits.parse::<u32>()),
        word_boundary,
    )
    .parse_next(input)
}

/// Parse placement shorthands. `rs` is tried before `r` since they share a prefix.
fn placement<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    alt((
        preceded("@c", placement_value).map(Token::PlaceColumn),
        preceded("rs", placement_value).map(Token::PlaceRowSpan),
        preceded('r', placement_value).map(Token::PlaceRow),
        preceded('s', placement_value).map(Token::PlaceSpan),
    ))
    .parse_next(input)
}

/// Parse a `#rgb` or `#rrggbb` color. Anything else starting with `#` is an id marker.
fn color<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    let hex = |c: char| c.is_ascii_hexdigit();
    terminated(
        ('#', alt((take_while(6, hex), take_while(3, hex)))).take(),
        word_boundary,
    )
    .map(Token::Color)
    .parse_next(input)
}

/// Parse a number with an optional `px` suffix.
///
/// A number running into other letters is consumed whole and returned as
/// [`LexError::MalformedNumber`].
fn number<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    let value = (digit1, opt(('.', digit1)))
        .take()
        .try_map(|text: &str| text.parse::<f32>())
        .parse_next(input)?;
    opt(terminated("px", word_boundary)).parse_next(input)?;

    if word_boundary(input).is_ok() {
        return Ok(Token::Number(value));
    }
    take_while(0.., is_ident_char).parse_next(input)?;
    Ok(Token::Invalid(LexError::MalformedNumber))
}

/// Parse comparison operators (longest first)
fn comparison<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    alt((
        "<=".value(Token::LessEqual),
        ">=".value(Token::GreaterEqual),
        '<'.value(Token::Less),
        '>'.value(Token::Greater),
    ))
    .parse_next(input)
}

/// Parse single character tokens
fn punctuation<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    alt((
        '='.value(Token::Equals),
        ':'.value(Token::Colon),
        '#'.value(Token::Hash),
        '.'.value(Token::Dot),
        '{'.value(Token::LeftBrace),
        '}'.value(Token::RightBrace),
        '('.value(Token::LeftParen),
        ')'.value(Token::RightParen),
        ';'.value(Token::Semicolon),
        ','.value(Token::Comma),
    ))
    .parse_next(input)
}

/// Parse any token other than strings, newlines and whitespace.
fn scan_token<'a>(input: &mut Input<'a>) -> ModalResult<Token<'a>> {
    alt((
        placement, // Must come before word: `s2` is a span, not a name
        color,     // Must come before punctuation `#`
        number,
        variable,
        word,
        comparison,
        punctuation,
    ))
    .parse_next(input)
}

/// Parse a string literal.
///
/// Supported escapes are `\\`, `\"`, `\n` and `\t`. Unknown escapes are kept
/// literally and their offsets pushed to `invalid_escapes`. A string that
/// reaches the end of its line is returned as
/// [`LexError::UnterminatedString`] holding the text read so far; the line
/// break itself is not consumed.
fn string_literal<'a>(
    input: &mut Input<'a>,
    invalid_escapes: &mut Vec<usize>,
) -> ModalResult<Token<'a>> {
    '"'.parse_next(input)?;

    let mut value = String::new();
    loop {
        let chunk = take_while(0.., |c: char| !matches!(c, '"' | '\\' | '\n' | '\r'))
            .parse_next(input)?;
        value.push_str(chunk);

        let escape_start = input.current_token_start();
        match input.peek_token() {
            Some('"') => {
                input.next_token();
                return Ok(Token::StringLiteral(value));
            }
            Some('\\') => {
                input.next_token();
                match input.peek_token() {
                    Some(c @ ('\\' | '"')) => {
                        input.next_token();
                        value.push(c);
                    }
                    Some('n') => {
                        input.next_token();
                        value.push('\n');
                    }
                    Some('t') => {
                        input.next_token();
                        value.push('\t');
                    }
                    Some(c) if c != '\n' && c != '\r' => {
                        input.next_token();
                        invalid_escapes.push(escape_start);
                        value.push('\\');
                        value.push(c);
                    }
                    _ => value.push('\\'),
                }
            }
            _ => return Ok(Token::Invalid(LexError::UnterminatedString(value))),
        }
    }
}

/// Pull-based tokenizer with an explicit indentation stack.
pub struct Tokenizer<'src> {
    source: &'src str,
    input: Input<'src>,
    line_index: LineIndex,
    /// Open indentation widths; never empty, bottom is always 0.
    indents: Vec<usize>,
    pending: VecDeque<PositionedToken<'src>>,
    at_line_start: bool,
    line_has_tokens: bool,
    finished: bool,
    diagnostics: Vec<Diagnostic>,
}

impl<'src> Tokenizer<'src> {
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            input: LocatingSlice::new(source),
            line_index: LineIndex::new(source),
            indents: vec![0],
            pending: VecDeque::new(),
            at_line_start: true,
            line_has_tokens: false,
            finished: false,
            diagnostics: Vec::new(),
        }
    }

    /// Look at the token `offset` positions ahead without consuming it.
    ///
    /// Looking past the end yields [`Token::Eof`].
    pub fn peek(&mut self, offset: usize) -> &PositionedToken<'src> {
        while self.pending.len() <= offset {
            self.lex_next();
        }
        &self.pending[offset]
    }

    /// Consume and return the next token.
    pub fn advance(&mut self) -> PositionedToken<'src> {
        if self.pending.is_empty() {
            self.lex_next();
        }
        match self.pending.pop_front() {
            Some(token) => token,
            None => self.eof_token(),
        }
    }

    /// Take the diagnostics produced since the last call.
    ///
    /// Diagnostics are produced as tokens are lexed, so lookahead through
    /// [`Tokenizer::peek`] may surface them before the token is consumed.
    pub fn take_diagnostics(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.diagnostics)
    }

    fn offset(&self) -> usize {
        self.input.current_token_start()
    }

    fn rest(&self) -> &'src str {
        self.source.get(self.offset()..).unwrap_or_default()
    }

    fn eof_token(&self) -> PositionedToken<'src> {
        let end = self.source.len();
        PositionedToken::new(
            Token::Eof,
            Span::new(end..end),
            self.line_index.location(self.source, end),
            "",
        )
    }

    fn push(&mut self, token: Token<'src>, span: Span) {
        let raw = self
            .source
            .get(span.start()..span.end())
            .unwrap_or_default();
        let location = self.line_index.location(self.source, span.start());
        self.pending
            .push_back(PositionedToken::new(token, span, location, raw));
    }

    fn report(&mut self, diagnostic: Diagnostic, offset: usize) {
        let location = self.line_index.location(self.source, offset);
        self.diagnostics.push(diagnostic.at(location));
    }

    /// Lex until at least one more token is pending.
    fn lex_next(&mut self) {
        let before = self.pending.len();
        while self.pending.len() == before {
            if self.finished {
                let eof = self.eof_token();
                self.pending.push_back(eof);
                return;
            }
            if self.at_line_start {
                self.at_line_start = false;
                self.begin_line();
                continue;
            }

            while matches!(self.input.peek_token(), Some(' ' | '\t' | '\r')) {
                self.input.next_token();
            }
            if self.rest().starts_with("//") {
                self.skip_to_line_end();
                continue;
            }

            let start = self.offset();
            match self.input.peek_token() {
                None => self.finish_input(),
                Some('\n') => {
                    self.input.next_token();
                    if self.line_has_tokens {
                        self.push(Token::Newline, Span::new(start..start + 1));
                    }
                    self.line_has_tokens = false;
                    self.at_line_start = true;
                }
                Some('"') => self.lex_string(start),
                Some(_) => self.lex_token(start),
            }
        }
    }

    fn skip_to_line_end(&mut self) {
        while self.input.peek_token().is_some_and(|c| c != '\n') {
            self.input.next_token();
        }
    }

    /// Measure the indentation of the next content line and emit structure tokens.
    ///
    /// Blank and comment-only lines are consumed here without touching the
    /// indentation stack.
    fn begin_line(&mut self) {
        loop {
            let line_start = self.offset();
            let mut width = 0;
            while let Some(c) = self.input.peek_token() {
                match c {
                    ' ' => width += 1,
                    '\t' => width += TAB_WIDTH,
                    _ => break,
                }
                self.input.next_token();
            }

            let rest = self.rest().trim_start_matches('\r');
            if rest.is_empty() {
                return;
            }
            if rest.starts_with('\n') || rest.starts_with("//") {
                self.skip_to_line_end();
                self.input.next_token();
                continue;
            }

            let span = Span::new(line_start..self.offset());
            self.apply_indent(width, span);
            return;
        }
    }

    fn apply_indent(&mut self, width: usize, span: Span) {
        let current = self.indents.last().copied().unwrap_or(0);
        if width > current {
            self.indents.push(width);
            self.push(Token::Indent, span);
            return;
        }

        while self.indents.len() > 1 && self.indents.last().is_some_and(|&top| top > width) {
            self.indents.pop();
            self.push(Token::Dedent, Span::new(span.end()..span.end()));
        }

        let enclosing = self.indents.last().copied().unwrap_or(0);
        if enclosing != width {
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E002,
                    format!("indentation of {width} does not match any enclosing block"),
                )
                .with_label(span, "inconsistent dedent")
                .with_help(format!(
                    "indent this line by {enclosing} columns to continue the enclosing block"
                )),
                span.start(),
            );
        }
    }

    fn lex_string(&mut self, start: usize) {
        let checkpoint = self.input.checkpoint();
        let mut invalid_escapes = Vec::new();
        let token = match string_literal(&mut self.input, &mut invalid_escapes) {
            Ok(token) => token,
            Err(_) => {
                self.input.reset(&checkpoint);
                self.input.next_token();
                Token::Invalid(LexError::UnexpectedChar('"'))
            }
        };
        let span = Span::new(start..self.offset());

        for escape in invalid_escapes {
            let sequence: String = self
                .source
                .get(escape..)
                .unwrap_or_default()
                .chars()
                .take(2)
                .collect();
            let escape_span = Span::new(escape..escape + sequence.len());
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E003,
                    format!("unknown escape sequence `{sequence}`"),
                )
                .with_label(escape_span, "kept literally")
                .with_help("valid escapes are `\\\\`, `\\\"`, `\\n` and `\\t`"),
                escape,
            );
        }

        if matches!(token, Token::Invalid(LexError::UnterminatedString(_))) {
            self.report(
                Diagnostic::from_code(ErrorCode::E001, "unterminated string literal")
                    .with_label(span, ErrorCode::E001.description())
                    .with_help("add a closing `\"` before the end of the line"),
                start,
            );
        }

        self.line_has_tokens = true;
        self.push(token, span);
    }

    fn lex_token(&mut self, start: usize) {
        let checkpoint = self.input.checkpoint();
        let token = match scan_token(&mut self.input) {
            Ok(token) => token,
            Err(_) => {
                self.input.reset(&checkpoint);
                let unexpected = self.input.next_token().unwrap_or('\0');
                let span = Span::new(start..self.offset());
                self.report(
                    Diagnostic::from_code(
                        ErrorCode::E002,
                        format!("unexpected character `{unexpected}`"),
                    )
                    .with_label(span, ErrorCode::E002.description()),
                    start,
                );
                Token::Invalid(LexError::UnexpectedChar(unexpected))
            }
        };
        let span = Span::new(start..self.offset());

        if token == Token::Invalid(LexError::MalformedNumber) {
            let raw = self.source.get(start..span.end()).unwrap_or_default();
            self.report(
                Diagnostic::from_code(ErrorCode::E004, format!("invalid number `{raw}`"))
                    .with_label(span, ErrorCode::E004.description())
                    .with_help("a number may only be followed by the `px` unit"),
                start,
            );
        }

        self.line_has_tokens = true;
        self.push(token, span);
    }

    /// Close the last line, unwind open blocks and emit [`Token::Eof`].
    fn finish_input(&mut self) {
        let end = self.source.len();
        if self.line_has_tokens {
            self.push(Token::Newline, Span::new(end..end));
            self.line_has_tokens = false;
        }
        while self.indents.len() > 1 {
            self.indents.pop();
            self.push(Token::Dedent, Span::new(end..end));
        }
        let eof = self.eof_token();
        self.pending.push_back(eof);
        self.finished = true;
        trace!(bytes = end; "Tokenizer reached end of input");
    }
}

/// Tokenize `source` into a complete token list ending with [`Token::Eof`].
pub fn tokenize(source: &str) -> Vec<PositionedToken<'_>> {
    tokenize_with_diagnostics(source).0
}

/// Tokenize `source`, also returning every lexical diagnostic.
pub fn tokenize_with_diagnostics(source: &str) -> (Vec<PositionedToken<'_>>, Vec<Diagnostic>) {
    let mut tokenizer = Tokenizer::new(source);
    let mut tokens = Vec::new();
    loop {
        let token = tokenizer.advance();
        let is_eof = token.token == Token::Eof;
        tokens.push(token);
        if is_eof {
            break;
        }
    }
    let diagnostics = tokenizer.take_diagnostics();
    (tokens, diagnostics)
}

#[cfg(test)]
mod tests {
    use wirekit_core::span::Location;

    use super::*;

    fn kinds(source: &str) -> Vec<Token<'_>> {
        tokenize(source).into_iter().map(|t| t.token).collect()
    }

    fn codes(source: &str) -> Vec<ErrorCode> {
        tokenize_with_diagnostics(source)
            .1
            .iter()
            .filter_map(Diagnostic::code)
            .collect()
    }

    #[test]
    fn test_node_header_tokens() {
        assert_eq!(
            kinds("button \"Go\" #cta .primary grow"),
            vec![
                Token::Identifier("button"),
                Token::StringLiteral("Go".to_string()),
                Token::Hash,
                Token::Identifier("cta"),
                Token::Dot,
                Token::Identifier("primary"),
                Token::Identifier("grow"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_keywords_and_hyphenated_identifiers() {
        assert_eq!(
            kinds("style let when login-card styles"),
            vec![
                Token::Style,
                Token::Let,
                Token::When,
                Token::Identifier("login-card"),
                Token::Identifier("styles"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_indentation_tokens() {
        let source = "card\n  text \"a\"\n  text \"b\"\nbutton \"c\"\n";
        assert_eq!(
            kinds(source),
            vec![
                Token::Identifier("card"),
                Token::Newline,
                Token::Indent,
                Token::Identifier("text"),
                Token::StringLiteral("a".to_string()),
                Token::Newline,
                Token::Identifier("text"),
                Token::StringLiteral("b".to_string()),
                Token::Newline,
                Token::Dedent,
                Token::Identifier("button"),
                Token::StringLiteral("c".to_string()),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_open_blocks_unwind_at_eof() {
        let tokens = kinds("grid\n  vstack\n    text \"x\"");
        let tail = &tokens[tokens.len() - 4..];
        assert_eq!(
            tail,
            &[Token::Newline, Token::Dedent, Token::Dedent, Token::Eof]
        );
    }

    #[test]
    fn test_tab_counts_as_four_columns() {
        let tokens = kinds("vstack\n\ttext \"a\"\n    text \"b\"\n");
        let indents = tokens.iter().filter(|t| **t == Token::Indent).count();
        let dedents = tokens.iter().filter(|t| **t == Token::Dedent).count();
        assert_eq!(indents, 1);
        assert_eq!(dedents, 1);
        assert!(codes("vstack\n\ttext \"a\"\n    text \"b\"\n").is_empty());
    }

    #[test]
    fn test_inconsistent_dedent_reports_and_continues() {
        let source = "vstack\n    text \"a\"\n  text \"b\"\n";
        let (tokens, diagnostics) = tokenize_with_diagnostics(source);

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E002));
        assert_eq!(diagnostics[0].location(), Location::new(3, 1));
        assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::Eof));
        assert!(
            tokens
                .iter()
                .any(|t| t.token == Token::StringLiteral("b".to_string()))
        );
    }

    #[test]
    fn test_blank_and_comment_lines_are_ignored() {
        let source = "// header\n\nvstack // trailing\n\n  // indented comment\n  text \"a\"\n";
        assert_eq!(
            kinds(source),
            vec![
                Token::Identifier("vstack"),
                Token::Newline,
                Token::Indent,
                Token::Identifier("text"),
                Token::StringLiteral("a".to_string()),
                Token::Newline,
                Token::Dedent,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_color_versus_id_marker() {
        assert_eq!(kinds("#fff")[0], Token::Color("#fff"));
        assert_eq!(kinds("#1e90ff")[0], Token::Color("#1e90ff"));
        assert_eq!(
            &kinds("#abc-x")[..2],
            &[Token::Hash, Token::Identifier("abc-x")]
        );
        assert_eq!(
            &kinds("#abcd")[..2],
            &[Token::Hash, Token::Identifier("abcd")]
        );
        assert_eq!(&kinds("#cta")[..2], &[Token::Hash, Token::Identifier("cta")]);
    }

    #[test]
    fn test_placement_shorthands() {
        assert_eq!(
            kinds("@c3 s2 rs2 r1 span s2x"),
            vec![
                Token::PlaceColumn(3),
                Token::PlaceSpan(2),
                Token::PlaceRowSpan(2),
                Token::PlaceRow(1),
                Token::Identifier("span"),
                Token::Identifier("s2x"),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            kinds("w:240px h:1.5"),
            vec![
                Token::Identifier("w"),
                Token::Colon,
                Token::Number(240.0),
                Token::Identifier("h"),
                Token::Colon,
                Token::Number(1.5),
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_malformed_number() {
        assert_eq!(
            kinds("12abc")[0],
            Token::Invalid(LexError::MalformedNumber)
        );
        assert_eq!(codes("w:12abc"), vec![ErrorCode::E004]);
    }

    #[test]
    fn test_string_escapes() {
        assert_eq!(
            kinds(r#""a\\b\"c\n\t""#)[0],
            Token::StringLiteral("a\\b\"c\n\t".to_string())
        );
    }

    #[test]
    fn test_unknown_escape_is_kept_with_warning() {
        let (tokens, diagnostics) = tokenize_with_diagnostics(r#""\q""#);

        assert_eq!(tokens[0].token, Token::StringLiteral("\\q".to_string()));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E003));
        assert!(diagnostics[0].severity().is_warning());
    }

    #[test]
    fn test_unterminated_string() {
        let source = "text \"oops\nbutton \"b\"\n";
        let (tokens, diagnostics) = tokenize_with_diagnostics(source);

        assert_eq!(
            tokens[1].token,
            Token::Invalid(LexError::UnterminatedString("oops".to_string()))
        );
        assert_eq!(tokens[2].token, Token::Newline);
        assert_eq!(tokens[3].token, Token::Identifier("button"));
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E001));
        assert_eq!(diagnostics[0].location(), Location::new(1, 6));
    }

    #[test]
    fn test_unexpected_character() {
        let (tokens, diagnostics) = tokenize_with_diagnostics("button ! \"Go\"");

        assert_eq!(tokens[1].token, Token::Invalid(LexError::UnexpectedChar('!')));
        assert_eq!(tokens[2].token, Token::StringLiteral("Go".to_string()));
        assert_eq!(diagnostics[0].code(), Some(ErrorCode::E002));
    }

    #[test]
    fn test_conditions_and_variables() {
        assert_eq!(
            kinds("when <600 >=320 { fill: $brand }"),
            vec![
                Token::When,
                Token::Less,
                Token::Number(600.0),
                Token::GreaterEqual,
                Token::Number(320.0),
                Token::LeftBrace,
                Token::Identifier("fill"),
                Token::Colon,
                Token::Variable("brand"),
                Token::RightBrace,
                Token::Newline,
                Token::Eof,
            ]
        );
    }

    #[test]
    fn test_positions_and_raw_text() {
        let tokens = tokenize("card\n  button \"Go\" s2");

        let button = &tokens[3];
        assert_eq!(button.token, Token::Identifier("button"));
        assert_eq!(button.location, Location::new(2, 3));
        assert_eq!(button.span, Span::new(7..13));

        let label = &tokens[4];
        assert_eq!(label.raw, "\"Go\"");
        assert_eq!(tokens[5].raw, "s2");
    }

    #[test]
    fn test_peek_and_advance() {
        let mut tokenizer = Tokenizer::new("vstack\n  text \"a\"");

        assert_eq!(tokenizer.peek(2).token, Token::Indent);
        assert_eq!(tokenizer.advance().token, Token::Identifier("vstack"));
        assert_eq!(tokenizer.advance().token, Token::Newline);
        assert_eq!(tokenizer.peek(0).token, Token::Indent);

        while tokenizer.advance().token != Token::Eof {}
        assert_eq!(tokenizer.advance().token, Token::Eof);
        assert_eq!(tokenizer.peek(5).token, Token::Eof);
    }
}

#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;

    fn check_tokenizer_terminates_balanced(source: &str) -> Result<(), TestCaseError> {
        let tokens = tokenize(source);

        prop_assert_eq!(tokens.last().map(|t| &t.token), Some(&Token::Eof));
        let eofs = tokens.iter().filter(|t| t.token == Token::Eof).count();
        prop_assert_eq!(eofs, 1);

        let indents = tokens.iter().filter(|t| t.token == Token::Indent).count();
        let dedents = tokens.iter().filter(|t| t.token == Token::Dedent).count();
        prop_assert_eq!(indents, dedents, "unbalanced structure for {:?}", source);
        Ok(())
    }

    proptest! {
        #[test]
        fn tokenizer_terminates_on_arbitrary_input(source in "\\PC{0,200}") {
            check_tokenizer_terminates_balanced(&source)?;
        }

        #[test]
        fn tokenizer_balances_indented_lines(
            lines in prop::collection::vec(("[ \t]{0,8}", "[a-z#.@\"0-9 ]{0,12}"), 0..20)
        ) {
            let source: String = lines
                .iter()
                .map(|(indent, body)| format!("{indent}{body}\n"))
                .collect();
            check_tokenizer_terminates_balanced(&source)?;
        }
    }
}
