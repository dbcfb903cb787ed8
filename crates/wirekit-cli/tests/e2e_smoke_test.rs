use std::{fs, path::PathBuf};

use tempfile::tempdir;

use wirekit_cli::{Args, run};

/// Collects all .wire files from a directory
fn collect_wire_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = match fs::read_dir(&dir) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("wire")
            })
            .collect(),
        Err(_) => Vec::new(),
    };

    files.sort();
    files
}

/// Samples live at the workspace root.
fn samples_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("samples")
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        width: None,
        height: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let samples = collect_wire_files(samples_dir());
    assert!(!samples.is_empty(), "No samples found in samples/");

    let mut failed = Vec::new();
    for sample in &samples {
        let output = temp_dir
            .path()
            .join(format!("{}.svg", sample.file_stem().unwrap().to_string_lossy()));

        match run(&args_for(sample, output.clone())) {
            Ok(report) if report.has_errors() => {
                failed.push((sample.clone(), format!("{:#?}", report.diagnostics)));
            }
            Ok(_) => {
                let svg = fs::read_to_string(&output).expect("Failed to read SVG output");
                assert!(svg.starts_with("<svg"), "{}", sample.display());
            }
            Err(err) => failed.push((sample.clone(), err.to_string())),
        }
    }

    if !failed.is_empty() {
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid sample(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let samples = collect_wire_files(samples_dir().join("errors"));
    assert!(!samples.is_empty(), "No error samples found in samples/errors/");

    for sample in &samples {
        let output = temp_dir.path().join("error.svg");
        let report = run(&args_for(sample, output.clone())).expect("Run should still succeed");

        assert!(
            report.has_errors(),
            "{} should produce an error diagnostic",
            sample.display()
        );
        // Error recovery still yields a document.
        assert!(output.exists());
    }
}

#[test]
fn e2e_width_flag_selects_breakpoint() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let sample = samples_dir().join("responsive.wire");

    let narrow = temp_dir.path().join("narrow.svg");
    let mut args = args_for(&sample, narrow.clone());
    args.width = Some(375.0);
    run(&args).expect("Failed to compile");

    let wide = temp_dir.path().join("wide.svg");
    run(&args_for(&sample, wide.clone())).expect("Failed to compile");

    let narrow = fs::read_to_string(narrow).unwrap();
    let wide = fs::read_to_string(wide).unwrap();
    assert!(narrow.contains("Menu"));
    assert!(!wide.contains("Menu"));
    assert!(wide.contains("Pricing"));
}

#[test]
fn e2e_missing_input_is_an_error() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = temp_dir.path().join("absent.wire");

    let result = run(&args_for(&input, temp_dir.path().join("out.svg")));
    assert!(result.is_err());
}
