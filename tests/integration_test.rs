use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// A `dockauth` command isolated from the user's real configuration
fn dockauth(home: &Path) -> Result<Command> {
    let config = home.join("dockauth.toml");
    if !config.exists() {
        fs::write(
            &config,
            format!(
                "docker_config = {:?}\nproperties_file = {:?}\n",
                home.join("config.json"),
                home.join("dockauth.properties"),
            ),
        )?;
    }

    let mut cmd = Command::cargo_bin("dockauth")?;
    cmd.arg("--config")
        .arg(&config)
        .env("HOME", home)
        .env_remove("DOCKER_CONFIG")
        .env_remove("REGISTRY_AUTH_FILE")
        .env_remove("XDG_RUNTIME_DIR")
        .env_remove("DOCKER_REGISTRY_USER")
        .env_remove("DOCKER_REGISTRY_PASSWORD")
        .env_remove("DOCKER_REGISTRY_AUTH");
    Ok(cmd)
}

#[test]
fn test_version_command() -> Result<()> {
    let mut cmd = Command::cargo_bin("dockauth")?;
    cmd.arg("--version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dockauth 0.1.0"));
    Ok(())
}

#[test]
fn test_version_subcommand() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = dockauth(home.path())?;
    cmd.arg("version");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dockauth 0.1.0"));
    Ok(())
}

#[test]
fn test_help_command() -> Result<()> {
    let mut cmd = Command::cargo_bin("dockauth")?;
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains(
        "Resolve Docker registry and daemon credentials",
    ));
    Ok(())
}

#[test]
fn test_resolve_requires_a_host() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = dockauth(home.path())?;
    cmd.arg("resolve");
    cmd.assert().failure();
    Ok(())
}

#[test]
fn test_resolve_without_credentials() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = dockauth(home.path())?;
    cmd.arg("resolve").arg("https://Registry.Example.com:443/v2/");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("registry.example.com\tno credentials"));
    Ok(())
}

#[test]
fn test_resolve_from_env_never_prints_password() -> Result<()> {
    let home = TempDir::new()?;
    let mut cmd = dockauth(home.path())?;
    cmd.arg("--verbose")
        .arg("resolve")
        .arg("registry.example.com")
        .env("DOCKER_REGISTRY_USER", "alice")
        .env("DOCKER_REGISTRY_PASSWORD", "hunter2-password");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "registry.example.com\tusername=alice credential=password",
        ))
        .stdout(predicate::str::contains("hunter2-password").not())
        .stderr(predicate::str::contains("hunter2-password").not());
    Ok(())
}

#[test]
fn test_resolve_image_from_config_file() -> Result<()> {
    let home = TempDir::new()?;
    fs::write(
        home.path().join("config.json"),
        r#"{"auths": {"https://index.docker.io/v1/": {"auth": "aHViOnB3"}, "quay.io": {}}}"#,
    )?;

    let mut cmd = dockauth(home.path())?;
    cmd.arg("resolve")
        .arg("--image")
        .arg("ubuntu:latest")
        .arg("quay.io/org/app:v1");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "index.docker.io\tusername=hub credential=password",
        ))
        .stdout(predicate::str::contains("quay.io\tanonymous"));
    Ok(())
}

#[test]
fn test_providers_lists_chain_in_order() -> Result<()> {
    let home = TempDir::new()?;
    fs::write(home.path().join("config.json"), "{}")?;

    let mut cmd = dockauth(home.path())?;
    cmd.arg("providers");
    let output = cmd.assert().success().get_output().stdout.clone();
    let stdout = String::from_utf8(output)?;
    let lines: Vec<&str> = stdout.lines().collect();

    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("environment\tnot applicable"));
    assert!(lines[1].starts_with("properties-file\tnot applicable"));
    assert!(lines[2].starts_with("config-file\tapplicable"));
    Ok(())
}

#[test]
fn test_invalid_config_file_is_reported() -> Result<()> {
    let home = TempDir::new()?;
    fs::write(home.path().join("dockauth.toml"), "helper_timeout_secs = [")?;

    let mut cmd = dockauth(home.path())?;
    cmd.arg("providers");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse"));
    Ok(())
}
