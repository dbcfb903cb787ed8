//! Integration tests for the Compiler API.

use std::{cell::RefCell, rc::Rc};

use wirekit::{
    Compiler, Diagnostic, ErrorCode, WirekitError, config::AppConfig, layout_box::find_box,
};

const RESPONSIVE: &str = r#"style default { skin: wire }
style .nav { gap: 3 }

hstack .nav #nav
  link "Home"
  button "Sign up" tone:brand

when <600 {
  vstack .nav #nav
    button "Menu"
}
"#;

#[test]
fn test_compile_and_render() {
    let mut compiler = Compiler::default();
    let compilation = compiler.compile(RESPONSIVE, None);

    assert!(compilation.diagnostics().is_empty(), "{:#?}", compilation.diagnostics());
    assert_eq!(compilation.viewport_width(), 1024.0);
    assert_eq!(compilation.parse_metrics().total_node_count, 5);
    assert_eq!(compilation.style_metrics().matched_rules, 1);

    let svg = compiler.render_svg(&compilation).expect("Failed to render");
    assert!(svg.contains("<svg"), "Output should contain SVG tag");
    assert!(svg.contains("</svg>"), "Output should be complete SVG");
    assert!(svg.contains("Sign up"));
}

#[test]
fn test_viewport_selects_breakpoint() {
    let mut compiler = Compiler::default();

    let narrow = compiler.compile(RESPONSIVE, Some(375.0));
    let nav = find_box(narrow.boxes(), "nav").expect("nav box");
    assert_eq!(nav.children.len(), 1);
    assert_eq!(narrow.breakpoint_metrics().matched_index, Some(0));

    let wide = compiler.compile(RESPONSIVE, Some(1280.0));
    let nav = find_box(wide.boxes(), "nav").expect("nav box");
    assert_eq!(nav.children.len(), 2);
    // Style gap 3 units between the two children.
    assert_eq!(nav.children[1].x, 96.0 + 24.0);
    assert!(wide.breakpoint_metrics().used_fallback);
    assert_eq!(compiler.breakpoint_context().fallback_activations(), 1);
}

#[test]
fn test_unit_global_scales_spacing() {
    let mut compiler = Compiler::default();
    let compilation = compiler.compile(
        "style default { u: 4 }\nvstack gap:2\n  text \"A\"\n  text \"B\"\n",
        None,
    );

    let root = &compilation.boxes()[0];
    assert_eq!(root.children[1].y, 24.0 + 8.0);
}

#[test]
fn test_parse_and_layout_diagnostics_are_merged() {
    let mut compiler = Compiler::default();
    let compilation = compiler.compile("widget\nvstack\n  text \"A\" @c2\n", None);

    let codes: Vec<ErrorCode> = compilation
        .diagnostics()
        .iter()
        .filter_map(Diagnostic::code)
        .collect();
    assert_eq!(codes, [ErrorCode::E012, ErrorCode::E301]);
    assert!(compilation.has_errors());
    assert_eq!(compilation.boxes().len(), 1);
}

#[test]
fn test_merged_diagnostics_respect_the_limit() {
    let config: AppConfig =
        toml::from_str("[parse]\nmax_diagnostics = 3\n").expect("Failed to parse config");
    let mut compiler = Compiler::new(config);
    let compilation = compiler.compile(
        "widget\ngadget\nvstack\n  text \"A\" @c2\n  text \"B\" @c2\n",
        None,
    );

    let codes: Vec<ErrorCode> = compilation
        .diagnostics()
        .iter()
        .filter_map(Diagnostic::code)
        .collect();
    assert_eq!(codes, [ErrorCode::E012, ErrorCode::E012, ErrorCode::E301]);
}

#[test]
fn test_sink_receives_every_diagnostic() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let recorder = Rc::clone(&seen);
    let mut compiler = Compiler::new(AppConfig::default()).with_sink(
        move |diagnostic: &Diagnostic| recorder.borrow_mut().push(diagnostic.code()),
    );

    compiler.compile("button\nbutton \"A\" #a\nbutton \"B\" #a\n", None);

    assert_eq!(
        *seen.borrow(),
        [Some(ErrorCode::E013), Some(ErrorCode::E201)]
    );
}

#[test]
fn test_into_result_carries_source() {
    let source = "button \"A\" #a\nbutton \"B\" #a\n";
    let compilation = Compiler::default().compile(source, None);

    match compilation.into_result(source) {
        Err(WirekitError::Diagnostics { err, src }) => {
            assert_eq!(src, source);
            assert_eq!(err.diagnostics()[0].code(), Some(ErrorCode::E201));
        }
        other => panic!("expected a diagnostics error, got {other:?}"),
    }
}

#[test]
fn test_invalid_config_fails_render() {
    let config: AppConfig =
        toml::from_str("[style]\nskin = \"neon\"\n").expect("Failed to parse config");
    let mut compiler = Compiler::new(config);
    let compilation = compiler.compile("text \"Hi\"\n", None);

    let err = compiler.render_svg(&compilation).unwrap_err();
    assert!(matches!(err, WirekitError::Config(_)));
    assert!(err.to_string().contains("unknown skin `neon`"));
}

#[test]
fn test_document_skin_wins_over_config() {
    let config: AppConfig =
        toml::from_str("[style]\nskin = \"sketch\"\nbackground_color = \"white\"\n")
            .expect("Failed to parse config");
    let mut compiler = Compiler::new(config);

    let plain = compiler.compile("text \"Hi\"\n", None);
    let svg = compiler.render_svg(&plain).expect("Failed to render");
    assert!(svg.contains("data-skin=\"sketch\""));

    let themed = compiler.compile("style default { skin: blueprint }\ntext \"Hi\"\n", None);
    let svg = compiler.render_svg(&themed).expect("Failed to render");
    assert!(svg.contains("data-skin=\"blueprint\""));
}

#[test]
fn test_repeated_compiles_hit_the_memo() {
    let mut compiler = Compiler::default();
    let source = "vstack\n  button \"A\"\n  button \"B\"\n";

    let first = compiler.compile(source, None);
    let second = compiler.compile(source, None);

    assert_eq!(first.layout_metrics().memo_hit_count, 0);
    assert_eq!(second.layout_metrics().memo_hit_count, 2);
    assert_eq!(first.boxes(), second.boxes());
}

#[test]
fn test_viewport_change_clears_the_memo() {
    let mut compiler = Compiler::default();
    let source = "vstack\n  button \"A\"\n  button \"B\"\n";

    compiler.compile(source, None);
    let resized = compiler.compile(source, Some(800.0));
    assert_eq!(resized.layout_metrics().memo_hit_count, 0);
    assert_eq!(compiler.memo().len(), 2);

    let again = compiler.compile(source, Some(800.0));
    assert_eq!(again.layout_metrics().memo_hit_count, 2);
    assert_eq!(compiler.memo().len(), 2);
}
