//! Recursive-descent parser for Wirekit documents.
//!
//! The parser pulls tokens from a [`Tokenizer`] and builds a [`Document`]
//! item by item. It never stops at the first problem: every malformed
//! construct is reported to a bounded [`DiagnosticCollector`] and the parser
//! resynchronizes at the next line (or block separator) and keeps going, so
//! the returned document is always valid, if partial.

use std::{collections::HashMap, time::Instant};

use indexmap::IndexMap;
use log::{debug, trace};

use wirekit_core::{
    component::{ComponentKind, PropError},
    document::{
        Breakpoint, Comparison, Condition, Document, Node, PlacementTokens, Selector, StyleMap,
        StyleRule, WidthRange, is_style_property,
    },
    span::Span,
    value::Value,
};

use crate::{
    error::{DEFAULT_DIAGNOSTIC_LIMIT, Diagnostic, DiagnosticCollector, ErrorCode, ParseError},
    lexer::Tokenizer,
    tokens::{LexError, PositionedToken, Token},
};

/// Limits applied while parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Node count above which a single `NODE_COUNT_LIMIT` warning is emitted.
    /// Parsing continues past it.
    pub max_nodes: usize,
    /// Node count above which a single `NODE_COUNT_WARNING` is emitted.
    pub warn_threshold: usize,
    /// Maximum number of diagnostics kept.
    pub max_diagnostics: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_nodes: 1000,
            warn_threshold: 300,
            max_diagnostics: DEFAULT_DIAGNOSTIC_LIMIT,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParseMetrics {
    pub parse_time_ms: f64,
    /// Number of top-level nodes, i.e. `document.nodes.len()`.
    pub node_count: usize,
    /// Every node declaration parsed, including children and `when` blocks.
    pub total_node_count: usize,
    pub diagnostic_count: usize,
    pub error_count: usize,
    pub warning_count: usize,
}

/// The result of parsing: always a document, plus what went wrong.
#[derive(Debug, Clone)]
pub struct ParseOutput {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
    pub metrics: ParseMetrics,
}

impl ParseOutput {
    /// Returns `true` if any error-severity diagnostic was kept.
    pub fn has_errors(&self) -> bool {
        self.metrics.error_count > 0
    }

    /// Return the document, or every diagnostic if any of them is an error.
    pub fn into_result(self) -> Result<Document, ParseError> {
        if self.has_errors() {
            Err(ParseError::new(self.diagnostics))
        } else {
            Ok(self.document)
        }
    }
}

/// Parse `source` with default options.
pub fn parse(source: &str) -> ParseOutput {
    parse_document(source, &ParseOptions::default())
}

/// Parse `source` into a [`Document`], collecting diagnostics.
pub fn parse_document(source: &str, options: &ParseOptions) -> ParseOutput {
    let started = Instant::now();
    let (document, diagnostics, total_node_count) = Parser::new(source, *options).run();

    let metrics = ParseMetrics {
        parse_time_ms: started.elapsed().as_secs_f64() * 1000.0,
        node_count: document.nodes.len(),
        total_node_count,
        diagnostic_count: diagnostics.len(),
        error_count: diagnostics.error_count(),
        warning_count: diagnostics.warning_count(),
    };
    debug!(
        nodes = metrics.total_node_count,
        styles = document.styles.len(),
        breakpoints = document.breakpoints.len(),
        diagnostics = metrics.diagnostic_count,
        elapsed_ms = metrics.parse_time_ms;
        "Parsed document"
    );

    ParseOutput {
        document,
        diagnostics: diagnostics.into_diagnostics(),
        metrics,
    }
}

/// Outcome of reading a value position.
enum ParsedValue {
    Value(Value),
    /// A value token was consumed but cannot be used; already reported.
    Dropped,
    /// No value token was present; already reported, nothing consumed.
    Missing,
}

fn describe(token: &PositionedToken<'_>) -> String {
    match token.token {
        Token::Newline | Token::Eof | Token::Indent | Token::Dedent => token.token.to_string(),
        _ => format!("`{}`", token.raw),
    }
}

struct Parser<'src> {
    tokens: Tokenizer<'src>,
    options: ParseOptions,
    diagnostics: DiagnosticCollector,
    document: Document,
    /// Ids declared in the node tree being parsed.
    ids: HashMap<String, Span>,
    total_nodes: usize,
    previous_end: usize,
}

impl<'src> Parser<'src> {
    fn new(source: &'src str, options: ParseOptions) -> Self {
        Self {
            tokens: Tokenizer::new(source),
            options,
            diagnostics: DiagnosticCollector::with_limit(options.max_diagnostics),
            document: Document::default(),
            ids: HashMap::new(),
            total_nodes: 0,
            previous_end: 0,
        }
    }

    fn run(mut self) -> (Document, DiagnosticCollector, usize) {
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::Newline | Token::Dedent => {
                    self.advance();
                }
                Token::Indent => {
                    // The lines stay top-level items; the matching dedent is skipped above.
                    self.report_indent(
                        "no container owns this block",
                        "remove the indentation of top-level lines",
                    );
                }
                Token::Let => self.parse_top_level_let(),
                Token::Style => {
                    if let Some(rule) = self.parse_style_block() {
                        self.document.styles.push(rule);
                    }
                }
                Token::When => {
                    if let Some(breakpoint) = self.parse_when_block() {
                        self.document.breakpoints.push(breakpoint);
                    }
                }
                _ => {
                    if let Some(node) = self.parse_node() {
                        self.document.nodes.push(node);
                    }
                }
            }
        }

        self.check_breakpoint_overlaps();
        (self.document, self.diagnostics, self.total_nodes)
    }

    // ---------------------------------------------------------------------
    // Token access
    // ---------------------------------------------------------------------

    fn drain_lexer(&mut self) {
        let lexical = self.tokens.take_diagnostics();
        self.diagnostics.extend(lexical);
    }

    fn peek(&mut self) -> Token<'src> {
        let token = self.tokens.peek(0).token.clone();
        self.drain_lexer();
        token
    }

    fn current(&mut self) -> PositionedToken<'src> {
        let token = self.tokens.peek(0).clone();
        self.drain_lexer();
        token
    }

    fn advance(&mut self) -> PositionedToken<'src> {
        let token = self.tokens.advance();
        self.drain_lexer();
        if token.token != Token::Eof {
            self.previous_end = token.span.end();
        }
        token
    }

    fn report(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.emit(diagnostic);
    }

    fn unexpected(&mut self, token: &PositionedToken<'src>, context: &str) {
        // The tokenizer has already reported invalid tokens.
        if matches!(token.token, Token::Invalid(_)) {
            return;
        }
        self.report(
            Diagnostic::from_code(
                ErrorCode::E011,
                format!("unexpected {} {context}", describe(token)),
            )
            .with_label(token.span, ErrorCode::E011.description())
            .at(token.location),
        );
    }

    /// Consume a name-like token, or report what was found instead.
    fn expect_name(&mut self, what: &str) -> Option<PositionedToken<'src>> {
        let token = self.current();
        if token.is_word() {
            return Some(self.advance());
        }
        if !matches!(token.token, Token::Invalid(_)) {
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E011,
                    format!("expected {what}, found {}", describe(&token)),
                )
                .with_label(token.span, format!("expected {what}"))
                .at(token.location),
            );
        }
        None
    }

    // ---------------------------------------------------------------------
    // Recovery
    // ---------------------------------------------------------------------

    /// Skip to the end of the current line.
    ///
    /// Inside a `{}` block `;` and `,` also end the skipped region. Stops
    /// before `}` so the enclosing block can close.
    fn synchronize(&mut self, in_block: bool) {
        loop {
            match self.peek() {
                Token::Newline => {
                    self.advance();
                    break;
                }
                Token::Semicolon | Token::Comma if in_block => {
                    self.advance();
                    break;
                }
                Token::Eof | Token::RightBrace => break,
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Skip an indented block whose `Indent` was just consumed.
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        loop {
            match self.advance().token {
                Token::Indent => depth += 1,
                Token::Dedent => {
                    depth -= 1;
                    if depth == 0 {
                        break;
                    }
                }
                Token::Eof => break,
                _ => {}
            }
        }
    }

    /// Skip a malformed construct: the rest of its line, or its whole
    /// `{}` block if one opens before the line ends.
    fn recover_block(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                Token::Eof => break,
                Token::LeftBrace => {
                    self.advance();
                    depth += 1;
                }
                Token::RightBrace => {
                    self.advance();
                    if depth <= 1 {
                        break;
                    }
                    depth -= 1;
                }
                Token::Newline if depth == 0 => {
                    self.advance();
                    break;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Consume an `Indent` and report it.
    fn report_indent(&mut self, reason: &str, help: &str) {
        let indent = self.advance();
        self.report(
            Diagnostic::from_code(ErrorCode::E017, "unexpected indentation")
                .with_label(indent.span, reason.to_string())
                .with_help(help.to_string())
                .at(indent.location),
        );
    }

    /// Report an `Indent` below a node and drop the block it opens.
    fn unexpected_indent(&mut self, reason: &str) {
        self.report_indent(
            reason,
            "only containers such as `vstack`, `grid` or `card` take indented children",
        );
        self.skip_block();
    }

    /// Require the end of a statement line.
    fn expect_line_end(&mut self, context: &str) {
        match self.peek() {
            Token::Newline => {
                self.advance();
            }
            Token::Eof | Token::RightBrace | Token::Dedent => {}
            _ => {
                let token = self.advance();
                self.unexpected(&token, context);
                self.synchronize(false);
            }
        }
    }

    /// Require a declaration separator inside a `{}` block.
    fn expect_separator(&mut self) {
        match self.peek() {
            Token::Newline | Token::Semicolon | Token::Comma => {
                self.advance();
            }
            Token::RightBrace | Token::Eof | Token::Dedent | Token::Indent => {}
            _ => {
                let token = self.advance();
                self.unexpected(&token, "after declaration");
                self.synchronize(true);
            }
        }
    }

    // ---------------------------------------------------------------------
    // Nodes
    // ---------------------------------------------------------------------

    fn count_node(&mut self, start: &PositionedToken<'src>) {
        self.total_nodes += 1;

        if self.total_nodes == self.options.warn_threshold + 1 {
            self.report(
                Diagnostic::from_code(
                    ErrorCode::W501,
                    format!(
                        "document has more than {} nodes",
                        self.options.warn_threshold
                    ),
                )
                .with_label(start.span, "threshold crossed here")
                .with_help("large documents may lay out slowly; consider splitting them")
                .at(start.location),
            );
        }
        if self.total_nodes == self.options.max_nodes + 1 {
            self.report(
                Diagnostic::from_code(
                    ErrorCode::W502,
                    format!(
                        "document exceeds the limit of {} nodes",
                        self.options.max_nodes
                    ),
                )
                .with_label(start.span, "limit exceeded here")
                .at(start.location),
            );
        }
    }

    fn parse_node(&mut self) -> Option<Node> {
        let start = self.advance();
        let kind = match &start.token {
            Token::Identifier(word) => match word.parse::<ComponentKind>() {
                Ok(kind) => Some(kind),
                Err(err) => {
                    self.report(
                        Diagnostic::from_code(ErrorCode::E012, err.to_string())
                            .with_label(start.span, "not a component")
                            .with_help(
                                "a line starts with a component keyword, `style`, `let` or `when`",
                            )
                            .at(start.location),
                    );
                    None
                }
            },
            _ => {
                self.unexpected(&start, "at the start of a line");
                None
            }
        };

        let Some(kind) = kind else {
            self.synchronize(false);
            if matches!(self.peek(), Token::Indent) {
                self.advance();
                self.skip_block();
            }
            return None;
        };

        self.count_node(&start);
        let mut node = Node::new(kind);
        node.location = start.location;

        match self.peek() {
            Token::StringLiteral(text) | Token::Invalid(LexError::UnterminatedString(text)) => {
                self.advance();
                node.label = Some(text);
            }
            _ => {}
        }
        if node.label.is_none() && kind.requires_label() {
            self.report(
                Diagnostic::from_code(ErrorCode::E013, format!("`{kind}` requires a label"))
                    .with_label(start.span, "label expected after this keyword")
                    .with_help(format!("add a quoted label: {kind} \"...\""))
                    .at(start.location),
            );
            node.label = Some(String::new());
        }

        let header_end = self.parse_node_header(&mut node);
        node.span = start.span.union(Span::new(start.span.start()..header_end));

        if matches!(self.peek(), Token::Indent) {
            if kind.is_container() {
                self.advance();
                node.children = self.parse_children();
            } else {
                self.unexpected_indent(&format!("`{kind}` cannot contain children"));
            }
        }

        trace!(
            kind = kind.keyword(),
            line = node.location.line(),
            children = node.children.len();
            "Parsed node"
        );
        Some(node)
    }

    /// Parse ids, classes, placement and properties up to the end of the line.
    ///
    /// Returns the end offset of the last header token.
    fn parse_node_header(&mut self, node: &mut Node) -> usize {
        let mut end = self.previous_end;
        loop {
            let token = self.current();
            let ok = match &token.token {
                Token::Newline => {
                    self.advance();
                    break;
                }
                Token::Eof | Token::RightBrace | Token::Indent | Token::Dedent => break,
                Token::Hash => {
                    self.advance();
                    match self.expect_name("an id after `#`") {
                        Some(name) => {
                            self.assign_id(node, name.raw, token.span.union(name.span), &token);
                            true
                        }
                        None => false,
                    }
                }
                Token::Color(text) => {
                    self.advance();
                    self.assign_id(node, text.trim_start_matches('#'), token.span, &token);
                    true
                }
                Token::Dot => {
                    self.advance();
                    match self.expect_name("a class name after `.`") {
                        Some(name) => {
                            node.classes.insert(name.raw.to_string());
                            true
                        }
                        None => false,
                    }
                }
                Token::PlaceColumn(_)
                | Token::PlaceSpan(_)
                | Token::PlaceRow(_)
                | Token::PlaceRowSpan(_) => {
                    self.advance();
                    self.set_placement(node, &token);
                    true
                }
                Token::Identifier(key) => {
                    self.advance();
                    self.parse_node_prop(node, key, &token)
                }
                Token::Invalid(_) => {
                    self.advance();
                    true
                }
                _ => {
                    self.advance();
                    self.unexpected(&token, &format!("in `{}` declaration", node.kind));
                    false
                }
            };

            if !ok {
                self.synchronize(false);
                break;
            }
            end = self.previous_end;
        }
        end
    }

    fn assign_id(&mut self, node: &mut Node, id: &str, span: Span, token: &PositionedToken<'src>) {
        if let Some(existing) = &node.id {
            let message = format!("`{}` already has the id `{existing}`", node.kind);
            self.report(
                Diagnostic::from_code(ErrorCode::E011, message)
                    .with_label(span, "second id")
                    .at(token.location),
            );
            return;
        }

        if let Some(first) = self.ids.get(id).copied() {
            self.report(
                Diagnostic::from_code(ErrorCode::E201, format!("duplicate id `{id}`"))
                    .with_label(span, "duplicate id")
                    .with_secondary_label(first, "first used here")
                    .with_help("ids must be unique; rename one of them")
                    .at(token.location),
            );
            return;
        }

        self.ids.insert(id.to_string(), span);
        node.id = Some(id.to_string());
    }

    fn set_placement(&mut self, node: &mut Node, token: &PositionedToken<'src>) {
        let value = match token.token {
            Token::PlaceColumn(n)
            | Token::PlaceSpan(n)
            | Token::PlaceRow(n)
            | Token::PlaceRowSpan(n) => n,
            _ => return,
        };
        if value == 0 {
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E104,
                    format!("placement `{}` must be at least 1", token.raw),
                )
                .with_label(token.span, "columns and rows are counted from 1")
                .at(token.location),
            );
            return;
        }

        let place = node.place.get_or_insert_with(PlacementTokens::default);
        match token.token {
            Token::PlaceColumn(n) => place.c = Some(n),
            Token::PlaceSpan(n) => place.s = Some(n),
            Token::PlaceRow(n) => place.r = Some(n),
            Token::PlaceRowSpan(n) => place.rs = Some(n),
            _ => {}
        }
    }

    /// Parse `key:value` or a bare flag. Returns `false` if the line must be skipped.
    fn parse_node_prop(&mut self, node: &mut Node, key: &str, key_token: &PositionedToken<'src>) -> bool {
        let value = if matches!(self.peek(), Token::Colon) {
            self.advance();
            match self.parse_value(None) {
                ParsedValue::Value(value) => value,
                ParsedValue::Dropped => return true,
                ParsedValue::Missing => return false,
            }
        } else {
            Value::Bool(true)
        };

        let span = key_token
            .span
            .union(Span::new(key_token.span.start()..self.previous_end));
        match node.props.insert_checked(node.kind, key, value) {
            Ok(()) => {}
            Err(err @ PropError::Unknown { .. }) => self.report(
                Diagnostic::from_code(ErrorCode::E101, err.to_string())
                    .with_label(key_token.span, ErrorCode::E101.description())
                    .with_help("the property is ignored")
                    .at(key_token.location),
            ),
            Err(err @ PropError::InvalidValue { .. }) => self.report(
                Diagnostic::from_code(ErrorCode::E102, err.to_string())
                    .with_label(span, ErrorCode::E102.description())
                    .at(key_token.location),
            ),
        }
        true
    }

    fn parse_children(&mut self) -> Vec<Node> {
        let mut children = Vec::new();
        loop {
            match self.peek() {
                Token::Dedent => {
                    self.advance();
                    break;
                }
                Token::Eof | Token::RightBrace => break,
                Token::Newline => {
                    self.advance();
                }
                Token::Indent => self.unexpected_indent("indented further than its siblings"),
                Token::Style | Token::Let | Token::When => {
                    let token = self.current();
                    self.report(
                        Diagnostic::from_code(
                            ErrorCode::E011,
                            format!("`{}` must be declared at the top level", token.raw),
                        )
                        .with_label(token.span, "inside a container")
                        .at(token.location),
                    );
                    self.recover_block();
                }
                _ => {
                    if let Some(node) = self.parse_node() {
                        children.push(node);
                    }
                }
            }
        }
        children
    }

    // ---------------------------------------------------------------------
    // Values and variables
    // ---------------------------------------------------------------------

    fn parse_value(&mut self, locals: Option<&IndexMap<String, Value>>) -> ParsedValue {
        let token = self.current();
        let value = match &token.token {
            Token::Number(number) => Value::Number(*number),
            Token::StringLiteral(text) | Token::Invalid(LexError::UnterminatedString(text)) => {
                Value::Text(text.clone())
            }
            Token::Identifier("true") => Value::Bool(true),
            Token::Identifier("false") => Value::Bool(false),
            Token::Color(color) => Value::Text(color.to_string()),
            Token::Variable(name) => {
                self.advance();
                return match self.resolve_variable(name, &token, locals) {
                    Some(value) => ParsedValue::Value(value),
                    None => ParsedValue::Dropped,
                };
            }
            Token::Invalid(_) => {
                self.advance();
                return ParsedValue::Dropped;
            }
            other if other.is_word() => Value::Text(token.raw.to_string()),
            _ => {
                self.report(
                    Diagnostic::from_code(
                        ErrorCode::E011,
                        format!("expected a value, found {}", describe(&token)),
                    )
                    .with_label(token.span, "value expected")
                    .at(token.location),
                );
                return ParsedValue::Missing;
            }
        };
        self.advance();
        ParsedValue::Value(value)
    }

    /// Resolve `$name` in `locals`, then in the document's variables.
    fn resolve_variable(
        &mut self,
        name: &str,
        token: &PositionedToken<'src>,
        locals: Option<&IndexMap<String, Value>>,
    ) -> Option<Value> {
        let found = locals
            .and_then(|locals| locals.get(name))
            .or_else(|| self.document.variables.get(name))
            .cloned();
        if found.is_none() {
            self.report(
                Diagnostic::from_code(ErrorCode::E202, format!("undefined variable `${name}`"))
                    .with_label(token.span, "not defined")
                    .with_help(format!("define it before use: let {name} = ..."))
                    .at(token.location),
            );
        }
        found
    }

    /// Parse `let name = value` without its terminator.
    fn parse_let_binding(&mut self) -> Option<(String, Value)> {
        self.advance();
        let name = self.expect_name("a variable name after `let`")?;

        if !matches!(self.peek(), Token::Equals) {
            let token = self.current();
            self.unexpected(&token, &format!("after `let {}`, expected `=`", name.raw));
            return None;
        }
        self.advance();

        if let Token::Variable(inner) = self.peek() {
            let token = self.advance();
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E204,
                    format!("variable `{}` cannot be defined from `${inner}`", name.raw),
                )
                .with_label(token.span, "variable reference")
                .with_help("variables must be assigned a literal value")
                .at(token.location),
            );
            return None;
        }

        match self.parse_value(None) {
            ParsedValue::Value(value) => Some((name.raw.to_string(), value)),
            ParsedValue::Dropped | ParsedValue::Missing => None,
        }
    }

    fn parse_top_level_let(&mut self) {
        match self.parse_let_binding() {
            Some((name, value)) => {
                trace!(name = name.as_str(); "Defined variable");
                self.document.variables.insert(name, value);
                self.expect_line_end("after `let` statement");
            }
            None => self.synchronize(false),
        }
    }

    // ---------------------------------------------------------------------
    // Style blocks
    // ---------------------------------------------------------------------

    fn parse_style_block(&mut self) -> Option<StyleRule> {
        let style = self.advance();
        let Some(selector) = self.parse_selector() else {
            self.recover_block();
            return None;
        };

        if !matches!(self.peek(), Token::LeftBrace) {
            let token = self.current();
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E011,
                    format!(
                        "expected `{{` after selector `{selector}`, found {}",
                        describe(&token)
                    ),
                )
                .with_label(token.span, "block expected")
                .at(token.location),
            );
            self.recover_block();
            return None;
        }
        let open = self.advance();

        let mut declarations = StyleMap::new();
        let mut locals = IndexMap::new();
        loop {
            match self.peek() {
                Token::RightBrace => {
                    self.advance();
                    self.expect_line_end("after style block");
                    break;
                }
                Token::Eof => {
                    self.report(
                        Diagnostic::from_code(ErrorCode::E014, "unclosed style block")
                            .with_label(open.span, "block opened here")
                            .with_help("add a closing `}`")
                            .at(open.location),
                    );
                    break;
                }
                Token::Newline
                | Token::Indent
                | Token::Dedent
                | Token::Semicolon
                | Token::Comma => {
                    self.advance();
                }
                Token::Let => match self.parse_let_binding() {
                    Some((name, value)) => {
                        locals.insert(name, value);
                        self.expect_separator();
                    }
                    None => self.synchronize(true),
                },
                token if token.is_word() => self.parse_declaration(&mut declarations, &locals),
                _ => {
                    let token = self.advance();
                    self.unexpected(&token, "in style block");
                    self.synchronize(true);
                }
            }
        }

        trace!(
            selector:? = selector,
            declarations = declarations.len();
            "Parsed style rule"
        );
        Some(StyleRule {
            selector,
            declarations,
            location: style.location,
        })
    }

    fn parse_selector(&mut self) -> Option<Selector> {
        let token = self.current();
        match &token.token {
            Token::Identifier("default") => {
                self.advance();
                Some(Selector::Default)
            }
            Token::Identifier("type") => {
                self.advance();
                if !matches!(self.peek(), Token::LeftParen) {
                    self.invalid_selector(&token, "expected `(` after `type`");
                    return None;
                }
                self.advance();

                let name = self.current();
                let kind = match &name.token {
                    Token::Identifier(word) => word.parse::<ComponentKind>().ok(),
                    _ => None,
                };
                let Some(kind) = kind else {
                    self.invalid_selector(&name, &format!("{} is not a component type", describe(&name)));
                    return None;
                };
                self.advance();

                if !matches!(self.peek(), Token::RightParen) {
                    let close = self.current();
                    self.invalid_selector(&close, "expected `)` after the component type");
                    return None;
                }
                self.advance();
                Some(Selector::Type(kind))
            }
            Token::Dot | Token::Hash => {
                self.advance();
                let name = self.current();
                if !name.is_word() {
                    self.invalid_selector(&name, &format!("expected a name after `{}`", token.raw));
                    return None;
                }
                self.advance();
                let name = name.raw.to_string();
                Some(if token.token == Token::Dot {
                    Selector::Class(name)
                } else {
                    Selector::Id(name)
                })
            }
            Token::Color(text) => {
                self.advance();
                Some(Selector::Id(text.trim_start_matches('#').to_string()))
            }
            _ => {
                self.invalid_selector(&token, &format!("invalid selector {}", describe(&token)));
                None
            }
        }
    }

    fn invalid_selector(&mut self, token: &PositionedToken<'src>, message: &str) {
        self.report(
            Diagnostic::from_code(ErrorCode::E015, message.to_string())
                .with_label(token.span, ErrorCode::E015.description())
                .with_help("selectors are `default`, `type(<component>)`, `.class` or `#id`")
                .at(token.location),
        );
    }

    /// Parse `name(.name)*: value`.
    fn parse_declaration(&mut self, declarations: &mut StyleMap, locals: &IndexMap<String, Value>) {
        let first = self.advance();
        let mut name = first.raw.to_string();
        let mut span = first.span;

        while matches!(self.peek(), Token::Dot) {
            self.advance();
            match self.expect_name("a property name after `.`") {
                Some(part) => {
                    name.push('.');
                    name.push_str(part.raw);
                    span = span.union(part.span);
                }
                None => {
                    self.synchronize(true);
                    return;
                }
            }
        }

        if !matches!(self.peek(), Token::Colon) {
            let token = self.current();
            self.unexpected(&token, &format!("after `{name}`, expected `:`"));
            self.synchronize(true);
            return;
        }
        self.advance();

        if !is_style_property(&name) {
            self.report(
                Diagnostic::from_code(ErrorCode::E103, format!("unknown style property `{name}`"))
                    .with_label(span, "declaration dropped")
                    .with_help(
                        "style properties are skin, font, u, fill, stroke, text, shadow, radius, \
                         tone, gap, pad and color.*, radius.*, shadow.*, stroke.* tokens",
                    )
                    .at(first.location),
            );
            self.synchronize(true);
            return;
        }

        match self.parse_value(Some(locals)) {
            ParsedValue::Value(value) => {
                declarations.insert(name, value);
                self.expect_separator();
            }
            ParsedValue::Dropped => self.expect_separator(),
            ParsedValue::Missing => self.synchronize(true),
        }
    }

    // ---------------------------------------------------------------------
    // Breakpoints
    // ---------------------------------------------------------------------

    fn parse_when_block(&mut self) -> Option<Breakpoint> {
        let when = self.advance();

        let mut conditions = Vec::new();
        loop {
            let token = self.current();
            let op = match token.token {
                Token::Less => Comparison::Less,
                Token::LessEqual => Comparison::LessEqual,
                Token::Greater => Comparison::Greater,
                Token::GreaterEqual => Comparison::GreaterEqual,
                Token::LeftBrace if !conditions.is_empty() => break,
                _ => {
                    let message = if conditions.is_empty() {
                        "expected a width condition after `when`".to_string()
                    } else {
                        format!("expected a condition or `{{`, found {}", describe(&token))
                    };
                    self.report(
                        Diagnostic::from_code(ErrorCode::E016, message)
                            .with_label(token.span, ErrorCode::E016.description())
                            .with_help("write conditions like `<600` or `>=768 <1024`")
                            .at(token.location),
                    );
                    self.recover_block();
                    return None;
                }
            };
            self.advance();

            let value = self.current();
            let Token::Number(width) = value.token else {
                self.report(
                    Diagnostic::from_code(
                        ErrorCode::E016,
                        format!("expected a number after `{}`", op.symbol()),
                    )
                    .with_label(value.span, "width expected")
                    .at(value.location),
                );
                self.recover_block();
                return None;
            };
            self.advance();
            conditions.push(Condition::new(op, width));
        }

        let condition_text = conditions
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let range = WidthRange::from_conditions(&conditions);
        let span = when.span.union(Span::new(when.span.start()..self.previous_end));

        if !range.is_satisfiable() {
            self.report(
                Diagnostic::from_code(
                    ErrorCode::E203,
                    format!("breakpoint `{condition_text}` can never match"),
                )
                .with_label(span, "no width satisfies every condition")
                .with_help("check the direction of each comparison")
                .at(when.location),
            );
        }

        let open = self.advance();
        let outer_ids = std::mem::take(&mut self.ids);
        let mut nodes = Vec::new();
        let mut styles = Vec::new();
        loop {
            match self.peek() {
                Token::RightBrace => {
                    self.advance();
                    self.expect_line_end("after `when` block");
                    break;
                }
                Token::Eof => {
                    self.report(
                        Diagnostic::from_code(ErrorCode::E014, "unclosed `when` block")
                            .with_label(open.span, "block opened here")
                            .with_help("add a closing `}`")
                            .at(open.location),
                    );
                    break;
                }
                Token::Newline
                | Token::Indent
                | Token::Dedent
                | Token::Semicolon
                | Token::Comma => {
                    self.advance();
                }
                Token::Style => {
                    if let Some(rule) = self.parse_style_block() {
                        styles.push(rule);
                    }
                }
                Token::Let | Token::When => {
                    let token = self.current();
                    self.report(
                        Diagnostic::from_code(
                            ErrorCode::E011,
                            format!("`{}` is not allowed inside a `when` block", token.raw),
                        )
                        .with_label(token.span, "inside a `when` block")
                        .with_help("declare variables and breakpoints at the top level")
                        .at(token.location),
                    );
                    self.recover_block();
                }
                _ => {
                    if let Some(node) = self.parse_node() {
                        nodes.push(node);
                    }
                }
            }
        }
        self.ids = outer_ids;

        debug!(
            conditions = condition_text.as_str(),
            nodes = nodes.len(),
            styles = styles.len();
            "Parsed breakpoint"
        );
        Some(Breakpoint {
            condition_text,
            conditions,
            range,
            nodes: (!nodes.is_empty()).then_some(nodes),
            styles: (!styles.is_empty()).then_some(styles),
            location: when.location,
            span,
        })
    }

    /// Warn about every pair of satisfiable breakpoints whose ranges overlap.
    fn check_breakpoint_overlaps(&mut self) {
        let breakpoints = &self.document.breakpoints;
        let mut overlaps = Vec::new();
        for (index, later) in breakpoints.iter().enumerate() {
            if !later.range.is_satisfiable() {
                continue;
            }
            for earlier in &breakpoints[..index] {
                if earlier.range.is_satisfiable() && earlier.range.overlaps(&later.range) {
                    overlaps.push(
                        Diagnostic::from_code(
                            ErrorCode::W503,
                            format!(
                                "breakpoint `{}` overlaps `{}`",
                                later.condition_text, earlier.condition_text
                            ),
                        )
                        .with_label(later.span, "overlapping range")
                        .with_secondary_label(earlier.span, "overlaps this breakpoint")
                        .with_help("where both match, the later block wins")
                        .at(later.location),
                    );
                }
            }
        }
        for diagnostic in overlaps {
            self.report(diagnostic);
        }
    }
}
