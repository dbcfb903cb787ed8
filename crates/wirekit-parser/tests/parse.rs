use wirekit_parser::{
    ParseOptions, parse_document,
    error::{Diagnostic, DiagnosticSink, ErrorCode, Severity},
    tokenize,
    tokens::Token,
};

const DASHBOARD: &str = r##"// Admin dashboard
let brand = "#4f46e5"
let unit = 8

style default { skin: clean; u: $unit }
style type(card) { radius: md }
style .primary { tone: $brand }

section "Dashboard" #dashboard
  grid cols:3 gap:2
    card "Revenue" @c1 s2
      heading "$12,400" level:2
      progress value:62
    card "Users" @c3
      text "1,204 active"
    card "Actions" @c1 s3
      hstack gap:1
        button "Export" .primary
        button "Invite" variant:secondary

when <600 {
  vstack #dashboard
    card "Revenue"
      heading "$12,400"
}
"##;

#[test]
fn test_dashboard_parses_cleanly() {
    let output = parse_document(DASHBOARD, &ParseOptions::default());

    assert!(output.diagnostics.is_empty(), "{:#?}", output.diagnostics);
    let document = &output.document;
    assert_eq!(document.nodes.len(), 1);
    assert_eq!(document.styles.len(), 3);
    assert_eq!(document.variables.len(), 2);
    assert_eq!(document.breakpoints.len(), 1);
    assert_eq!(output.metrics.total_node_count, 14);

    let grid = &document.nodes[0].children[0];
    assert_eq!(grid.children.len(), 3);
    assert_eq!(grid.children[2].place.map(|place| place.column_span()), Some(3));
}

#[test]
fn test_public_tokenizer() {
    let tokens = tokenize("button \"Go\" #go\n");
    let kinds: Vec<_> = tokens.iter().map(|token| token.token.clone()).collect();

    assert_eq!(
        kinds,
        [
            Token::Identifier("button"),
            Token::StringLiteral("Go".to_string()),
            Token::Hash,
            Token::Identifier("go"),
            Token::Newline,
            Token::Eof,
        ]
    );
}

#[test]
fn test_diagnostics_forwarded_to_sink() {
    let output = parse_document(
        "button \"A\" #x\nbutton \"B\" #x\nwidget\n",
        &ParseOptions::default(),
    );

    let mut reported = Vec::new();
    let mut sink = |diagnostic: &Diagnostic| {
        reported.push((diagnostic.code(), diagnostic.severity(), diagnostic.line()))
    };
    sink.report_all(&output.diagnostics);

    assert_eq!(
        reported,
        [
            (Some(ErrorCode::E201), Severity::Error, 2),
            (Some(ErrorCode::E012), Severity::Error, 3),
        ]
    );
}

#[test]
fn test_custom_diagnostic_limit() {
    let options = ParseOptions {
        max_diagnostics: 2,
        ..ParseOptions::default()
    };
    let output = parse_document("a\nb\nc\nd\n", &options);

    assert_eq!(output.diagnostics.len(), 2);
    assert!(output.has_errors());
}
