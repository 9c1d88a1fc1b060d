//! Layered configuration loading

use crate::integration::test_utils::with_env;
use std::fs;
use stylemix::config::{global_config_path, ConfigLoader};
use stylemix::types::AspectRatio;
use tempfile::TempDir;

fn write_workspace_config(workspace: &TempDir, name: &str, contents: &str) {
    let dir = workspace.path().join("config");
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join(name), contents).unwrap();
}

#[test]
fn test_defaults_without_any_file() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let config = with_env(&xdg, &[], || ConfigLoader::load(workspace.path()).unwrap());

    assert_eq!(config.pipeline.default_image_count, 1);
    assert_eq!(config.pipeline.max_image_count, 4);
    assert_eq!(config.pipeline.default_aspect_ratio, AspectRatio::Square);
    assert_eq!(config.provider.image_model, "gemini-2.5-flash-image");
    assert!(config.validate().is_ok());
}

#[test]
fn test_workspace_file_overrides_global_file() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    fs::create_dir_all(xdg.path().join("stylemix")).unwrap();
    fs::write(
        xdg.path().join("stylemix").join("config.toml"),
        r#"
[pipeline]
default_image_count = 2
default_aspect_ratio = "portrait"

[provider]
analysis_model = "global-model"
"#,
    )
    .unwrap();
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[pipeline]
default_aspect_ratio = "landscape"
"#,
    );

    let config = with_env(&xdg, &[], || {
        assert_eq!(
            global_config_path(),
            Some(xdg.path().join("stylemix").join("config.toml"))
        );
        ConfigLoader::load(workspace.path()).unwrap()
    });

    assert_eq!(config.pipeline.default_image_count, 2);
    assert_eq!(config.pipeline.default_aspect_ratio, AspectRatio::Landscape);
    assert_eq!(config.provider.analysis_model, "global-model");
}

#[test]
fn test_environment_specific_file_and_variables() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[logging]
level = "warn"
"#,
    );
    write_workspace_config(
        &workspace,
        "staging.toml",
        r#"
[logging]
level = "debug"
format = "json"
"#,
    );

    let config = with_env(
        &xdg,
        &[
            ("STYLEMIX_ENV", "staging"),
            ("STYLEMIX__PIPELINE__MAX_IMAGE_COUNT", "8"),
            ("STYLEMIX__PROVIDER__IMAGE_MODEL", "env-image-model"),
        ],
        || ConfigLoader::load(workspace.path()).unwrap(),
    );

    assert_eq!(config.logging.level, "debug");
    assert_eq!(config.logging.format, "json");
    assert_eq!(config.pipeline.max_image_count, 8);
    assert_eq!(config.provider.image_model, "env-image-model");
}

#[test]
fn test_explicit_file_sits_above_workspace() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[pipeline]
default_image_count = 3
"#,
    );
    let explicit = workspace.path().join("override.toml");
    fs::write(
        &explicit,
        r#"
[pipeline]
default_image_count = 4
"#,
    )
    .unwrap();

    let config = with_env(&xdg, &[], || {
        ConfigLoader::load_with(workspace.path(), Some(&explicit)).unwrap()
    });
    assert_eq!(config.pipeline.default_image_count, 4);
}

#[test]
fn test_missing_explicit_file_is_an_error() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    let missing = workspace.path().join("nope.toml");

    with_env(&xdg, &[], || {
        assert!(ConfigLoader::load_from_file(&missing).is_err());
        assert!(ConfigLoader::load_with(workspace.path(), Some(&missing)).is_err());
    });
}

#[test]
fn test_invalid_values_surface_in_validation() {
    let xdg = TempDir::new().unwrap();
    let workspace = TempDir::new().unwrap();
    write_workspace_config(
        &workspace,
        "config.toml",
        r#"
[pipeline]
default_image_count = 9
"#,
    );

    let config = with_env(&xdg, &[], || ConfigLoader::load(workspace.path()).unwrap());
    let errors = config.validate().unwrap_err();
    assert_eq!(errors.len(), 1);
    assert!(errors[0].to_string().starts_with("Pipeline:"));
}
