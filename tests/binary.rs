use std::process::Command;

#[test]
fn binary_fails_without_asset() {
    let dir = tempfile::tempdir().unwrap();

    let status = Command::new(env!("CARGO_BIN_EXE_texture_loader"))
        .current_dir(dir.path())
        .status()
        .unwrap();

    assert!(!status.success());
}

#[test]
fn binary_loads_bundled_asset() {
    let status = Command::new(env!("CARGO_BIN_EXE_texture_loader"))
        .current_dir(env!("CARGO_MANIFEST_DIR"))
        .status()
        .unwrap();

    assert!(status.success());
}
