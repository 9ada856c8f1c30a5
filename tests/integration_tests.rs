use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use tempfile::TempDir;

fn fixture(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/data").join(name)
}

/// Run bubbleplot with `args` inside `dir`, optionally feeding stdin
fn run_bubbleplot(dir: &Path, args: &[&str], stdin: Option<&str>) -> Output {
    let mut child = Command::new(env!("CARGO_BIN_EXE_bubbleplot"))
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("Failed to spawn bubbleplot");

    if let Some(mut handle) = child.stdin.take() {
        if let Some(text) = stdin {
            handle
                .write_all(text.as_bytes())
                .expect("Failed to write to stdin");
        }
    }

    child.wait_with_output().expect("Failed to wait for bubbleplot")
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

fn files_in(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect()
}

#[test]
fn test_bubble_plot_png() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let out = dir.path().join("plot.png");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "Z", "-c", "Cat", "-o", out.to_str().unwrap()],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));
    assert!(is_valid_png(&fs::read(&out).unwrap()));
}

#[test]
fn test_default_output_name() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(dir.path(), &[input.to_str().unwrap(), "X", "Y", "Z"], None);
    assert!(output.status.success(), "Failed: {}", stderr(&output));

    let files = files_in(dir.path());
    assert_eq!(files.len(), 1);
    let name = files[0].file_name().unwrap().to_str().unwrap().to_string();
    assert!(name.starts_with("bubble_"), "unexpected name {}", name);
    assert!(name.ends_with(".png"), "unexpected name {}", name);
    assert!(is_valid_png(&fs::read(&files[0]).unwrap()));
}

#[test]
fn test_svg_to_stdout() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "--format", "svg", "-o", "-"],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));
    let text = String::from_utf8(output.stdout).unwrap();
    assert!(text.starts_with("<svg"));
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_format_from_output_extension() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let out = dir.path().join("plot.svg");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "-o", out.to_str().unwrap()],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));
    assert!(fs::read_to_string(&out).unwrap().starts_with("<svg"));
}

#[test]
fn test_csv_from_stdin() {
    let dir = TempDir::new().unwrap();
    let csv = fs::read_to_string(fixture("bubbles.csv")).unwrap();
    let output = run_bubbleplot(dir.path(), &["-", "X", "Y", "Z", "-o", "-"], Some(&csv));
    assert!(output.status.success(), "Failed: {}", stderr(&output));
    assert!(is_valid_png(&output.stdout));
}

#[test]
fn test_grouped_grid_with_everything() {
    let dir = TempDir::new().unwrap();
    let input = fixture("grouped.csv");
    let out = dir.path().join("grid.png");
    let output = run_bubbleplot(
        dir.path(),
        &[
            input.to_str().unwrap(),
            "gdp",
            "life",
            "population",
            "-c",
            "continent",
            "-g",
            "decade",
            "-l",
            "country",
            "-t",
            "mul(4) | add(10)",
            "--ranges",
            "0,_,40,_",
            "--figsize",
            "10,8",
            "--dpi",
            "80",
            "--alpha",
            "0.5",
            "--legend-top-padding",
            "0.1",
            "-o",
            out.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));
    assert!(is_valid_png(&fs::read(&out).unwrap()));
}

#[test]
fn test_json_input_and_config_file() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.json");
    let config = fixture("layout.json");
    let out = dir.path().join("from_json");
    let output = run_bubbleplot(
        dir.path(),
        &[
            input.to_str().unwrap(),
            "X",
            "Y",
            "Z",
            "-c",
            "Cat",
            "--config",
            config.to_str().unwrap(),
            "-o",
            out.to_str().unwrap(),
        ],
        None,
    );
    assert!(output.status.success(), "Failed: {}", stderr(&output));
    // Config file selects SVG
    assert!(fs::read_to_string(&out).unwrap().starts_with("<svg"));
}

#[test]
fn test_unknown_column_fails() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(dir.path(), &[input.to_str().unwrap(), "X", "Height"], None);
    assert!(!output.status.success());
    assert!(stderr(&output).contains("Unknown column 'Height'"));
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_bad_transform_fails() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "Z", "-t", "mul(two)"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("mul"));
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_bad_alpha_fails() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "--alpha", "1.5"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("alpha"));
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_bad_figsize_fails() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "--figsize", "8x6"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("figure size"));
}

#[test]
fn test_oversized_figure_fails() {
    let dir = TempDir::new().unwrap();
    let input = fixture("bubbles.csv");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "--figsize", "1000,1000"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("figure size"));
    assert!(files_in(dir.path()).is_empty());
}

#[test]
fn test_non_numeric_data_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let input = fixture("non_numeric.csv");
    let out = dir.path().join("plot.png");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "Z", "-o", out.to_str().unwrap()],
        None,
    );
    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("'five'"), "stderr: {}", err);
    assert!(err.contains("row 2"), "stderr: {}", err);
    assert!(!out.exists());
}

#[test]
fn test_too_many_categories_fails() {
    let dir = TempDir::new().unwrap();
    let input = fixture("many_categories.csv");
    let output = run_bubbleplot(
        dir.path(),
        &[input.to_str().unwrap(), "X", "Y", "-c", "Cat"],
        None,
    );
    assert!(!output.status.success());
    assert!(stderr(&output).contains("20"));
    assert!(files_in(dir.path()).is_empty());
}
