//! CLI end-to-end tests
//!
//! Tests for the streamtag command-line interface.

use assert_cmd::prelude::*;
use predicates::prelude::*;
use std::fs;
use std::process::Command;
use tempfile::tempdir;

/// Get a command for the streamtag binary
#[allow(deprecated)]
fn streamtag_cmd() -> Command {
    Command::cargo_bin("streamtag").unwrap()
}

#[test]
fn test_cli_no_args_shows_help() {
    let mut cmd = streamtag_cmd();
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = streamtag_cmd();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("streamtag"))
        .stdout(predicate::str::contains("Usage"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = streamtag_cmd();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("streamtag"));
}

#[test]
fn test_cli_check_tools_command() {
    let mut cmd = streamtag_cmd();
    cmd.arg("check-tools").assert().success().stdout(
        predicate::str::contains("ffmpeg").and(predicate::str::contains("ffprobe")),
    );
}

#[test]
fn test_cli_retag_help() {
    let mut cmd = streamtag_cmd();
    cmd.args(["retag", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Set the title of every stream"));
}

#[test]
fn test_cli_retag_requires_title() {
    let mut cmd = streamtag_cmd();
    cmd.args(["retag", "movie.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--title"));
}

#[test]
fn test_cli_probe_nonexistent_file() {
    let mut cmd = streamtag_cmd();
    cmd.args(["probe", "/nonexistent/file.mkv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn test_cli_validate_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(
        &config_path,
        r#"
[tools]
timeout_secs = 900

[edit]
backup_extension = "orig"
jobs = 3
"#,
    )
    .unwrap();

    let mut cmd = streamtag_cmd();
    cmd.args(["validate", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration is valid"))
        .stdout(predicate::str::contains("Timeout: 900s"))
        .stdout(predicate::str::contains("Backup extension: orig"))
        .stdout(predicate::str::contains("Jobs: 3"));
}

#[test]
fn test_cli_validate_invalid_config() {
    let dir = tempdir().unwrap();
    let config_path = dir.path().join("config.toml");
    fs::write(&config_path, "[edit\njobs =").unwrap();

    let mut cmd = streamtag_cmd();
    cmd.args(["validate", config_path.to_str().unwrap()])
        .assert()
        .failure();
}

#[cfg(unix)]
mod with_fake_tools {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    const STREAMS: &str = r#"{"streams": [
        {"index": 0, "codec_type": "video", "codec_name": "hevc"},
        {"index": 1, "codec_type": "audio", "codec_name": "eac3", "tags": {"language": "jpn"}},
        {"index": 2, "codec_type": "subtitle", "codec_name": "ass", "tags": {"language": "eng"}}
    ]}"#;

    fn script(dir: &Path, name: &str, body: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    /// Write fake ffprobe/ffmpeg scripts and a config pointing at them.
    fn setup(dir: &Path, ffmpeg_body: &str) -> PathBuf {
        let ffprobe = script(dir, "ffprobe", &format!("cat <<'EOF'\n{STREAMS}\nEOF"));
        let ffmpeg = script(dir, "ffmpeg", ffmpeg_body);
        let config = dir.join("streamtag.toml");
        fs::write(
            &config,
            format!(
                "[tools]\nffmpeg_path = {:?}\nffprobe_path = {:?}\ntimeout_secs = 30\n",
                ffmpeg.display().to_string(),
                ffprobe.display().to_string()
            ),
        )
        .unwrap();
        config
    }

    const COPYING_FFMPEG: &str = r#"prev=""
for a in "$@"; do
  if [ "$prev" = "-i" ]; then in="$a"; fi
  prev="$a"
  out="$a"
done
cat "$in" > "$out"
echo retagged >> "$out""#;

    #[test]
    fn probe_lists_streams_as_json() {
        let tools = tempdir().unwrap();
        let config = setup(tools.path(), "exit 0");
        let media = tempdir().unwrap();
        let file = media.path().join("show.mkv");
        fs::write(&file, b"media").unwrap();

        let mut cmd = streamtag_cmd();
        cmd.arg("--config")
            .arg(&config)
            .args(["probe", "--json"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("\"codec_type\": \"audio\""))
            .stdout(predicate::str::contains("\"language\": \"jpn\""));
    }

    #[test]
    fn retag_rewrites_every_file() {
        let tools = tempdir().unwrap();
        let config = setup(tools.path(), COPYING_FFMPEG);
        let media = tempdir().unwrap();
        let first = media.path().join("01.mkv");
        let second = media.path().join("02.mkv");
        fs::write(&first, "one\n").unwrap();
        fs::write(&second, "two\n").unwrap();

        let mut cmd = streamtag_cmd();
        cmd.arg("--config")
            .arg(&config)
            .args(["retag", "--title", "Group", "--jobs", "2"])
            .arg(&first)
            .arg(&second)
            .assert()
            .success()
            .stdout(predicate::str::contains("01.mkv"))
            .stdout(predicate::str::contains("02.mkv"));

        assert_eq!(fs::read_to_string(&first).unwrap(), "one\nretagged\n");
        assert_eq!(fs::read_to_string(&second).unwrap(), "two\nretagged\n");
        assert_eq!(fs::read_dir(media.path()).unwrap().count(), 2);
    }

    #[test]
    fn retag_failure_exits_non_zero() {
        let tools = tempdir().unwrap();
        let config = setup(tools.path(), "echo 'broken pipe' >&2\nexit 1");
        let media = tempdir().unwrap();
        let file = media.path().join("movie.mkv");
        fs::write(&file, "movie\n").unwrap();

        let mut cmd = streamtag_cmd();
        cmd.arg("--config")
            .arg(&config)
            .args(["retag", "--title", "Group"])
            .arg(&file)
            .assert()
            .failure()
            .stdout(predicate::str::contains("broken pipe"))
            .stderr(predicate::str::contains("1 of 1 file(s) failed"));

        assert_eq!(fs::read_to_string(&file).unwrap(), "movie\n");
        assert_eq!(fs::read_dir(media.path()).unwrap().count(), 1);
    }

    #[test]
    fn dry_run_prints_command_only() {
        let tools = tempdir().unwrap();
        let config = setup(tools.path(), COPYING_FFMPEG);
        let media = tempdir().unwrap();
        let file = media.path().join("movie.mkv");
        fs::write(&file, "movie\n").unwrap();

        let mut cmd = streamtag_cmd();
        cmd.arg("--config")
            .arg(&config)
            .args(["retag", "--title", "Group", "--dry-run"])
            .arg(&file)
            .assert()
            .success()
            .stdout(predicate::str::contains("-metadata:s:a:0 language=jpn"))
            .stdout(predicate::str::contains("-metadata:s:s:0 title=Group"))
            .stdout(predicate::str::contains("DRY RUN"));

        assert_eq!(fs::read_to_string(&file).unwrap(), "movie\n");
    }
}
