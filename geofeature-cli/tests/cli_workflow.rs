//! End-to-end tests driving the `geofeature` binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tempfile::TempDir;

const TAXONOMY: &str = "\
natural
  coastline @1
  water
highway @5
  primary
";

/// Temp workspace with a taxonomy and a config that keeps logs inside it.
struct Workspace {
    dir: TempDir,
    config: PathBuf,
}

impl Workspace {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        let taxonomy = dir.path().join("classificator.txt");
        fs::write(&taxonomy, TAXONOMY).unwrap();

        let config = dir.path().join("config.ini");
        fs::write(
            &config,
            format!(
                "[taxonomy]\npath = {}\n\n[logging]\ndirectory = {}\nfile = test.log\n",
                taxonomy.display(),
                dir.path().join("logs").display()
            ),
        )
        .unwrap();

        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn run(&self, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_geofeature"))
            .arg("--config")
            .arg(&self.config)
            .args(args)
            .output()
            .unwrap()
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn test_lookup_known_path() {
    let ws = Workspace::new();
    let output = ws.run(&["lookup", "natural.coastline"]);

    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("natural.coastline"));
    assert!(text.contains("level 1"));
}

#[test]
fn test_lookup_unknown_path_fails() {
    let ws = Workspace::new();
    let output = ws.run(&["lookup", "natural.forest"]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("natural.forest"));
}

#[test]
fn test_encode_then_inspect() {
    let ws = Workspace::new();
    let file = ws.path().join("features.bin");
    let file_arg = file.to_str().unwrap();

    let output = ws.run(&[
        "encode",
        "--type",
        "natural.coastline",
        "--type",
        "natural.forest",
        "--point",
        "0,0",
        "--point",
        "1,0",
        "--point",
        "1,1",
        "--point",
        "0,0",
        "--layer",
        "-2",
        "--name",
        "Bay",
        "--output",
        file_arg,
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout(&output).contains("area"));
    assert!(String::from_utf8_lossy(&output.stderr).contains("natural.forest"));

    // A second run appends a point feature
    let output = ws.run(&["encode", "--type", "highway.primary", "--point", "2,3", "--output", file_arg]);
    assert!(output.status.success());

    let output = ws.run(&["inspect", file_arg]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.contains("2 features"));
    assert!(text.contains("natural.coastline"));
    assert!(text.contains("highway.primary"));
    assert!(text.contains("Bay"));
    assert!(!text.contains("natural.forest"));
}

#[test]
fn test_encode_rejects_bad_layer() {
    let ws = Workspace::new();
    let output = ws.run(&["encode", "--point", "0,0", "--layer", "40"]);
    assert!(!output.status.success());
}

#[test]
fn test_inspect_missing_file_fails() {
    let ws = Workspace::new();
    let missing = ws.path().join("missing.bin");
    let output = ws.run(&["inspect", missing.to_str().unwrap()]);
    assert!(!output.status.success());
}
