use anyhow::Result;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn gulpfiles(dir: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new(env!("CARGO_BIN_EXE_gulpfiles"))
        .current_dir(dir)
        .env_remove("GULPFILES_CWD")
        .env_remove("GULPFILES_CONFIG")
        .env_remove("RUST_LOG")
        .args(args)
        .output()?;
    Ok(output)
}

#[test]
fn test_default_task_prints_hello() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::write(temp_dir.path().join("gulpfile.yml"), "hello: world\n")?;

    let output = gulpfiles(temp_dir.path(), &[])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "world\n");

    Ok(())
}

#[test]
fn test_run_build_task() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::write(temp_dir.path().join("gulpfile.yml"), "hello: world\n")?;

    let output = gulpfiles(temp_dir.path(), &["run", "build", "default"])?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "world\nworld\n");

    Ok(())
}

#[test]
fn test_missing_config_exits_non_zero() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    let output = gulpfiles(temp_dir.path(), &[])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert!(stderr.contains("gulpfile.yml not found!"), "stderr was: {}", stderr);
    assert!(stderr.contains("gulpfiles-core"));

    Ok(())
}

#[test]
fn test_malformed_config_exits_non_zero() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::write(temp_dir.path().join("gulpfile.yml"), "hello: 'world\n")?;

    let output = gulpfiles(temp_dir.path(), &["run", "build"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8(output.stderr)?;
    assert_eq!(stderr.matches("failed to parse").count(), 1, "stderr was: {}", stderr);

    Ok(())
}

#[test]
fn test_unknown_task_exits_non_zero() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::write(temp_dir.path().join("gulpfile.yml"), "hello: world\n")?;

    let output = gulpfiles(temp_dir.path(), &["run", "watch"])?;

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8(output.stderr)?.contains("Task 'watch' is not in your gulpfile"));

    Ok(())
}

#[test]
fn test_list_does_not_need_config() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    let output = gulpfiles(temp_dir.path(), &["list"])?;

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("build"));
    assert!(stdout.contains("default"));
    assert!(stdout.contains("Build all styles and styleguide (for production)."));

    Ok(())
}

#[test]
fn test_init_then_build() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;

    let output = gulpfiles(temp_dir.path(), &["init"])?;
    assert!(output.status.success());
    assert!(temp_dir.path().join("gulpfile.yml").is_file());

    let output = gulpfiles(temp_dir.path(), &["run", "build"])?;
    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "world\n");

    Ok(())
}

#[test]
fn test_config_as_json() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    fs::write(
        temp_dir.path().join("gulpfile.yml"),
        "hello: world\nstyles:\n  dest: dist\n",
    )?;

    let output = gulpfiles(temp_dir.path(), &["config", "--json"])?;

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(
        json,
        serde_json::json!({ "hello": "world", "styles": { "dest": "dist" } })
    );

    Ok(())
}

#[test]
fn test_cwd_and_config_flags() -> Result<()> {
    let temp_dir = tempfile::tempdir()?;
    let project = temp_dir.path().join("project");
    fs::create_dir(&project)?;
    fs::write(project.join("settings.yml"), "hello: flags\n")?;

    let cwd = project.to_string_lossy().into_owned();
    let output = gulpfiles(
        temp_dir.path(),
        &["--cwd", &cwd, "--config", "settings.yml", "run", "build"],
    )?;

    assert!(output.status.success());
    assert_eq!(String::from_utf8(output.stdout)?, "flags\n");

    Ok(())
}
