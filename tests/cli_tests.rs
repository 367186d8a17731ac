//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn recode(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("recode"));
    cmd.current_dir(dir);
    cmd
}

fn write_project(dir: &Path) {
    fs::create_dir_all(dir.join("input/pkg")).unwrap();
    fs::write(dir.join("input/main.py"), "import pkg\n\nprint(pkg.x)\n").unwrap();
    fs::write(dir.join("input/pkg/__init__.py"), "x = 1\n").unwrap();
    fs::write(dir.join("input/README.md"), "# readme\n").unwrap();
}

fn write_config(dir: &Path, extra: &str) {
    let content = format!(
        "code_extensions = [\".py\"]\n\
         input_directory = \"input\"\n\
         output_dir = \"out\"\n\
         results_file = \"results.txt\"\n\
         {extra}"
    );
    fs::write(dir.join("recode.toml"), content).unwrap();
}

#[test]
fn test_cli_version() {
    let temp = TempDir::new().unwrap();
    recode(temp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("recode"));
}

#[test]
fn test_cli_help() {
    let temp = TempDir::new().unwrap();
    recode(temp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--input-directory"))
        .stdout(predicate::str::contains("--local-llm"))
        .stdout(predicate::str::contains("--clipboard-mode"));
}

#[test]
fn test_verbose_and_quiet_conflict() {
    let temp = TempDir::new().unwrap();
    recode(temp.path())
        .args(["--verbose", "--quiet"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Cannot use both --verbose and --quiet"));
}

#[test]
fn test_missing_local_runner_completes_with_empty_results() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    write_config(
        temp.path(),
        "local_llm = true\nollama_binary = \"recode-test-no-such-runner\"\n",
    );

    recode(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Using local LLM model"))
        .stdout(predicate::str::contains("Results saved to results.txt"))
        .stdout(predicate::str::contains("not installed"));

    assert_eq!(
        fs::read_to_string(temp.path().join("results.txt")).unwrap(),
        ""
    );
    assert!(!temp.path().join("out").exists());
}

#[test]
fn test_missing_config_is_created_with_defaults() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());

    recode(temp.path())
        .args(["--input-directory", "input", "--code-extensions", ".py", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Configuration file created with default settings",
        ))
        .stdout(predicate::str::contains("Found 2 files that would be sent"))
        .stdout(predicate::str::contains("main.py"));

    let written = fs::read_to_string(temp.path().join("recode.toml")).unwrap();
    assert!(written.contains("ollama_model = \"mistral\""));
    // Overrides are not persisted.
    assert!(written.contains("path_to_input_directory"));
    assert!(!temp.path().join("results.txt").exists());
}

#[test]
fn test_remote_without_credentials_fails() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    write_config(temp.path(), "api_key_path = \"missing.json\"\n");

    recode(temp.path())
        .args(["--local-llm", "false"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read credential file"));
}

#[test]
fn test_missing_input_directory_fails() {
    let temp = TempDir::new().unwrap();
    write_config(temp.path(), "");

    recode(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Input directory not found"));
}

#[test]
fn test_init_config_refuses_to_overwrite() {
    let temp = TempDir::new().unwrap();

    recode(temp.path())
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created recode.toml"));
    assert!(temp.path().join("recode.toml").exists());

    recode(temp.path())
        .arg("--init-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[cfg(unix)]
#[test]
fn test_local_runner_response_is_saved_and_unpacked() {
    use std::os::unix::fs::PermissionsExt;

    let temp = TempDir::new().unwrap();
    write_project(temp.path());

    // Stand-in for ollama: `pull` succeeds silently, `run` prints a reply.
    let runner = temp.path().join("runner.sh");
    fs::write(
        &runner,
        "#!/bin/sh\nif [ \"$1\" = run ]; then printf 'pre\\n#@a.txt\\nhello\\n#@b/c.txt\\nworld\\nagain'; fi\n",
    )
    .unwrap();
    fs::set_permissions(&runner, fs::Permissions::from_mode(0o755)).unwrap();
    write_config(
        temp.path(),
        &format!(
            "local_llm = true\nollama_binary = \"{}\"\n",
            runner.display()
        ),
    );

    recode(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Wrote 2 files under out"));

    assert_eq!(
        fs::read_to_string(temp.path().join("results.txt")).unwrap(),
        "pre\n#@a.txt\nhello\n#@b/c.txt\nworld\nagain"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("out/a.txt")).unwrap(),
        "hello"
    );
    assert_eq!(
        fs::read_to_string(temp.path().join("out/b/c.txt")).unwrap(),
        "world\nagain"
    );
}

#[test]
fn test_empty_suffix_in_config_is_rejected() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    fs::write(
        temp.path().join("recode.toml"),
        "code_extensions = [\".py\", \"\"]\ninput_directory = \"input\"\n",
    )
    .unwrap();

    recode(temp.path())
        .arg("--dry-run")
        .assert()
        .failure()
        .stderr(predicate::str::contains("must not be empty"));
}

#[test]
fn test_config_path_from_environment() {
    let temp = TempDir::new().unwrap();

    recode(temp.path())
        .env("RECODE_CONFIG", "alt.toml")
        .arg("--init-config")
        .assert()
        .success()
        .stdout(predicate::str::contains("Created alt.toml"));

    assert!(temp.path().join("alt.toml").exists());
    assert!(!temp.path().join("recode.toml").exists());
}

#[test]
fn test_rust_log_overrides_verbosity_flags() {
    let temp = TempDir::new().unwrap();
    write_project(temp.path());
    write_config(temp.path(), "");

    recode(temp.path())
        .env_remove("RUST_LOG")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged config").not());

    recode(temp.path())
        .env("RUST_LOG", "debug")
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Merged config"));
}
