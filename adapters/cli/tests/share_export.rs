use std::{fs, process::Command};

fn propeller() -> Command {
    Command::new(env!("CARGO_BIN_EXE_propeller"))
}

#[test]
fn level_file_exports_as_share_string_and_imports_back() {
    let dir = tempfile::tempdir().expect("temporary directory");
    let path = dir.path().join("first.lvl");
    fs::write(
        &path,
        r#"{"player": [[24, 96]], "door": [[96, 72]], "wall": [[24, 120]], "RGB": [1, 2, 3]}"#,
    )
    .expect("write level");

    let exported = propeller()
        .arg("--level")
        .arg(&path)
        .arg("--export")
        .output()
        .expect("run propeller --export");
    assert!(exported.status.success(), "export should succeed");
    let share = String::from_utf8(exported.stdout).expect("share string is utf-8");
    assert!(share.starts_with("propeller:v1:"));

    let reexported = propeller()
        .args(["--import", share.trim(), "--export"])
        .output()
        .expect("run propeller --import --export");
    assert!(reexported.status.success(), "import should succeed");
    assert_eq!(String::from_utf8_lossy(&reexported.stdout), share);
}

#[test]
fn malformed_share_string_fails_before_opening_a_window() {
    let output = propeller()
        .args(["--import", "layout:v1:e30", "--export"])
        .output()
        .expect("run propeller --import");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to import level"), "{stderr}");
}
