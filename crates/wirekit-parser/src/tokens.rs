//! Token types produced by the tokenizer.

use std::fmt;

use wirekit_core::span::{Location, Span};

/// A lexical problem carried by a [`Token::Invalid`].
///
/// The matching diagnostic is reported by the tokenizer; consumers only need
/// the token to recover.
#[derive(Debug, Clone, PartialEq)]
pub enum LexError {
    /// A string ran into the end of its line. Holds the text read so far.
    UnterminatedString(String),
    /// A character that starts no token.
    UnexpectedChar(char),
    /// A number directly followed by letters, e.g. `12abc`.
    MalformedNumber,
}

/// Token types for the Wirekit language.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'src> {
    // Keywords
    Style,
    Let,
    When,

    // Literals
    Identifier(&'src str),
    StringLiteral(String),
    /// A number, with any `px` suffix stripped.
    Number(f32),
    /// A color literal including its leading `#`, e.g. `#1e90ff`.
    Color(&'src str),
    /// A `$name` reference; holds the name without `$`.
    Variable(&'src str),

    // Placement shorthands
    PlaceColumn(u32),  // @c<n>
    PlaceSpan(u32),    // s<n>
    PlaceRow(u32),     // r<n>
    PlaceRowSpan(u32), // rs<n>

    // Operators
    Less,         // <
    LessEqual,    // <=
    Greater,      // >
    GreaterEqual, // >=
    Equals,       // =
    Colon,        // :

    // Punctuation
    Hash,       // #
    Dot,        // .
    LeftBrace,  // {
    RightBrace, // }
    LeftParen,  // (
    RightParen, // )
    Semicolon,  // ;
    Comma,      // ,

    // Structure
    Newline,
    Indent,
    Dedent,
    Eof,

    Invalid(LexError),
}

impl Token<'_> {
    /// Returns `true` for tokens whose raw text can serve as a name:
    /// identifiers, keywords and placement shorthands.
    pub fn is_word(&self) -> bool {
        matches!(
            self,
            Token::Identifier(_)
                | Token::Style
                | Token::Let
                | Token::When
                | Token::PlaceColumn(_)
                | Token::PlaceSpan(_)
                | Token::PlaceRow(_)
                | Token::PlaceRowSpan(_)
        )
    }
}

/// A token with its source position.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedToken<'src> {
    pub token: Token<'src>,
    pub span: Span,
    pub location: Location,
    /// The exact source text of the token.
    pub raw: &'src str,
}

impl<'src> PositionedToken<'src> {
    pub fn new(token: Token<'src>, span: Span, location: Location, raw: &'src str) -> Self {
        Self {
            token,
            span,
            location,
            raw,
        }
    }
}

impl<'src> std::ops::Deref for PositionedToken<'src> {
    type Target = Token<'src>;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl fmt::Display for PositionedToken<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.token.fmt(f)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Style => write!(f, "style"),
            Token::Let => write!(f, "let"),
            Token::When => write!(f, "when"),

            Token::Identifier(name) => write!(f, "{name}"),
            Token::StringLiteral(s) => write!(f, "\"{s}\""),
            Token::Number(n) => write!(f, "{n}"),
            Token::Color(c) => write!(f, "{c}"),
            Token::Variable(name) => write!(f, "${name}"),

            Token::PlaceColumn(n) => write!(f, "@c{n}"),
            Token::PlaceSpan(n) => write!(f, "s{n}"),
            Token::PlaceRow(n) => write!(f, "r{n}"),
            Token::PlaceRowSpan(n) => write!(f, "rs{n}"),

            Token::Less => write!(f, "<"),
            Token::LessEqual => write!(f, "<="),
            Token::Greater => write!(f, ">"),
            Token::GreaterEqual => write!(f, ">="),
            Token::Equals => write!(f, "="),
            Token::Colon => write!(f, ":"),

            Token::Hash => write!(f, "#"),
            Token::Dot => write!(f, "."),
            Token::LeftBrace => write!(f, "{{"),
            Token::RightBrace => write!(f, "}}"),
            Token::LeftParen => write!(f, "("),
            Token::RightParen => write!(f, ")"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),

            Token::Newline => write!(f, "end of line"),
            Token::Indent => write!(f, "indentation"),
            Token::Dedent => write!(f, "dedent"),
            Token::Eof => write!(f, "end of input"),

            Token::Invalid(LexError::UnterminatedString(s)) => write!(f, "\"{s}"),
            Token::Invalid(LexError::UnexpectedChar(c)) => write!(f, "{c}"),
            Token::Invalid(LexError::MalformedNumber) => write!(f, "malformed number"),
        }
    }
}
