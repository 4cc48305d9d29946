//! Integration tests for Configuration System

use super::test_utils::{with_env, with_xdg_env};
use ledframe::config::ConfigLoader;
use tempfile::TempDir;

#[test]
fn test_workspace_config_file() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    std::fs::create_dir_all(workspace.path().join("config")).unwrap();
    std::fs::write(
        workspace.path().join("config").join("config.toml"),
        r#"
[storage]
store_path = "data/frames"

[frames]
id_length = 8
"#,
    )
    .unwrap();

    let config = with_xdg_env(&xdg, || ConfigLoader::load(workspace.path())).unwrap();
    assert_eq!(config.frames.id_length, 8);
    assert_eq!(
        config.storage.resolve_store_path(workspace.path()),
        workspace.path().join("data/frames")
    );
    assert!(config.seed.enabled);
    assert_eq!(config.cache_settings().id_length, 8);
}

#[test]
fn test_global_config_is_overridden_by_workspace() {
    let xdg = TempDir::new().unwrap();
    std::fs::create_dir_all(xdg.path().join("ledframe")).unwrap();
    std::fs::write(
        xdg.path().join("ledframe").join("config.toml"),
        r#"
[frames]
id_length = 10

[seed]
enabled = false
"#,
    )
    .unwrap();

    let workspace = TempDir::new().unwrap();
    std::fs::create_dir_all(workspace.path().join("config")).unwrap();
    std::fs::write(
        workspace.path().join("config").join("config.toml"),
        "[frames]\nid_length = 12\n",
    )
    .unwrap();

    let config = with_xdg_env(&xdg, || ConfigLoader::load(workspace.path())).unwrap();
    assert_eq!(config.frames.id_length, 12);
    assert!(!config.seed.enabled, "global value survives when not overridden");

    let global = with_xdg_env(&xdg, ConfigLoader::xdg_config_path).unwrap();
    assert_eq!(global, xdg.path().join("ledframe").join("config.toml"));
}

#[test]
fn test_environment_overrides_files() {
    let workspace = TempDir::new().unwrap();
    let config = with_env(&[("LEDFRAME__FRAMES__ID_LENGTH", "4")], || {
        ConfigLoader::load(workspace.path())
    })
    .unwrap();
    assert_eq!(config.frames.id_length, 4);
}

#[test]
fn test_invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let file = temp.path().join("bad.toml");
    std::fs::write(&file, "[frames]\nid_length = 0\n").unwrap();

    let config = ConfigLoader::load_from_file(&file).unwrap();
    let errors = config.validate().unwrap_err();
    assert!(errors.iter().any(|e| e.contains("frames.id_length")));
}

#[test]
fn test_deployment_file_overrides_workspace_base() {
    let workspace = TempDir::new().unwrap();
    let config_dir = workspace.path().join("config");
    std::fs::create_dir_all(&config_dir).unwrap();
    std::fs::write(config_dir.join("config.toml"), "[frames]\nid_length = 8\n").unwrap();
    std::fs::write(config_dir.join("device.toml"), "[frames]\nid_length = 10\n").unwrap();

    let config = with_env(&[("LEDFRAME_ENV", "device")], || {
        ConfigLoader::load(workspace.path())
    })
    .unwrap();
    assert_eq!(config.frames.id_length, 10);
}
