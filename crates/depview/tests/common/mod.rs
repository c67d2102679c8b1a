//! Common test utilities shared across integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

/// Snapshot used by most tests, in the query layer's link-record shape.
///
/// ```text
/// 1 Billing Report (PROG, root)
/// ├── 2 Read Orders (FUNC)  CALL
/// │   └── 3 Orders (TABL)   SELECT
/// │       └── 4 Order Number (DTEL)  FIELD
/// └── 3 Orders              SELECT
/// ```
pub const SAMPLE_LINKS: &str = r#"[
  {"link": {
    "from": {"id": 1, "label": "Billing Report", "technicalName": "ZBILLING", "group": "PROG", "isCustom": true, "title": null},
    "to": {"id": 2, "label": "Read Orders", "technicalName": "Z_READ_ORDERS", "group": "FUNC", "isCustom": true, "title": "Reads open orders"},
    "edge": {"id": "1-2", "from": 1, "to": 2, "label": "CALL"}
  }},
  {"link": {
    "from": {"id": 2, "label": "Read Orders", "technicalName": "Z_READ_ORDERS", "group": "FUNC", "isCustom": true, "title": "Reads open orders"},
    "to": {"id": 3, "label": "Orders", "technicalName": "ZORDERS", "group": "TABL", "isCustom": false, "title": null},
    "edge": {"id": "2-3", "from": 2, "to": 3, "label": "SELECT"}
  }},
  {"link": {
    "from": {"id": 3, "label": "Orders", "technicalName": "ZORDERS", "group": "TABL", "isCustom": false, "title": null},
    "to": {"id": 4, "label": "Order Number", "technicalName": "ZORDER_NO", "group": "DTEL", "isCustom": false, "title": null},
    "edge": {"id": "3-4", "from": 3, "to": 4, "label": "FIELD"}
  }},
  {"link": {
    "from": {"id": 1, "label": "Billing Report", "technicalName": "ZBILLING", "group": "PROG", "isCustom": true, "title": null},
    "to": {"id": 3, "label": "Orders", "technicalName": "ZORDERS", "group": "TABL", "isCustom": false, "title": null},
    "edge": {"id": "1-3", "from": 1, "to": 3, "label": "SELECT"}
  }}
]"#;

/// Path of the compiled depview binary.
pub fn depview_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_depview"))
}

/// Write `content` to `name` inside `dir` and return the full path.
pub fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("Failed to write test file");
    path
}

/// Write the sample snapshot as `graph.json` inside `dir`.
pub fn write_sample(dir: &Path) -> PathBuf {
    write_file(dir, "graph.json", SAMPLE_LINKS)
}

/// Run the depview binary in the specified directory with plain output.
pub fn run_depview_in_dir(dir: &Path, args: &[&str]) -> Output {
    Command::new(depview_binary())
        .args(args)
        .current_dir(dir)
        .env("NO_COLOR", "1")
        .env("DEPVIEW_ASCII", "1")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute depview binary")
}

/// Run depview with `--json` and parse stdout.
pub fn run_depview_json(dir: &Path, args: &[&str]) -> serde_json::Value {
    let mut full = vec!["--json"];
    full.extend_from_slice(args);
    let output = run_depview_in_dir(dir, &full);
    assert!(
        output.status.success(),
        "depview {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout should be valid JSON")
}
