use std::{fs, path::PathBuf};

use tempfile::tempdir;

use valnet_cli::{Args, run};

fn samples_dir() -> PathBuf {
    // Samples live at the workspace root, not in the crate
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("samples")
}

/// Collects all .json files from a directory
fn collect_json_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(&dir)
        .map(|entries| {
            entries
                .flatten()
                .map(|entry| entry.path())
                .filter(|path| {
                    path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("json")
                })
                .collect()
        })
        .unwrap_or_default();

    files.sort();
    files
}

fn args_for(input: &PathBuf, output: PathBuf) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        config: None,
        scope: "all".to_string(),
        axes: None,
        iterations: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let samples = collect_json_files(samples_dir());

    assert!(!samples.is_empty(), "No samples found in samples/");

    let mut failed = Vec::new();

    for sample in &samples {
        let output_path = temp_dir
            .path()
            .join(format!("{}.svg", sample.file_stem().unwrap().to_string_lossy()));

        match run(&args_for(sample, output_path.clone())) {
            Ok(()) => {
                let svg = fs::read_to_string(&output_path).expect("output written");
                assert!(svg.contains("<svg"), "{} produced no SVG", sample.display());
            }
            Err(err) => failed.push((sample.clone(), err)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nValid samples that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} valid sample(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_samples() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let samples = collect_json_files(samples_dir().join("errors"));

    assert!(!samples.is_empty(), "No error samples found in samples/errors/");

    let mut unexpectedly_succeeded = Vec::new();

    for sample in &samples {
        let output_path = temp_dir
            .path()
            .join(format!("error_{}.svg", sample.file_stem().unwrap().to_string_lossy()));

        if run(&args_for(sample, output_path)).is_ok() {
            unexpectedly_succeeded.push(sample.clone());
        }
    }

    assert!(
        unexpectedly_succeeded.is_empty(),
        "error samples succeeded unexpectedly: {unexpectedly_succeeded:?}"
    );
}

#[test]
fn e2e_scoped_run_draws_selected_processes() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = samples_dir().join("herbs.json");
    let output_path = temp_dir.path().join("order.svg");

    let mut args = args_for(&input, output_path.clone());
    args.scope = "order:Order-1".to_string();
    args.axes = Some("both".to_string());
    args.iterations = Some(5);

    run(&args).expect("scoped run succeeds");

    let svg = fs::read_to_string(&output_path).unwrap();
    assert!(svg.contains("Package"));
    assert!(!svg.contains("Harvest"));
}

#[test]
fn e2e_unknown_scope_fails() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let input = samples_dir().join("herbs.json");

    let mut args = args_for(&input, temp_dir.path().join("out.svg"));
    args.scope = "agent:Agent-42".to_string();

    assert!(run(&args).is_err());
}
