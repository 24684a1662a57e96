use std::fs;
use std::path::Path;
use std::process::{Command, Output};

fn dump_params(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_dump-params"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run dump-params")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn write_settings(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).expect("failed to write settings");
    path.to_string_lossy().into_owned()
}

// ---------------------------------------------------------------------------
// generate
// ---------------------------------------------------------------------------

#[test]
fn generate_dic_playstation_defaults() {
    let out = dump_params(&[
        "generate",
        "--dialect",
        "dic",
        "--drive",
        "F",
        "--output",
        "game.bin",
        "--speed",
        "8",
        "--system",
        "sony-play-station",
        "--media",
        "cd-rom",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "cd F game.bin 8 /c2 20 /nl /am\n");
}

#[test]
fn generate_redumper_without_speed() {
    let out = dump_params(&[
        "generate",
        "--dialect",
        "redumper",
        "--drive",
        "/dev/sr0",
        "--output",
        "game.bin",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(stdout(&out), "disc --image-name=\"game\" --drive=/dev/sr0\n");
}

#[test]
fn generate_uses_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let config = write_settings(
        dir.path(),
        "settings.yaml",
        "default_dialect: dd\ndd_path: /usr/bin/dd\noptions:\n  dd:\n    block_size: 2048\n",
    );

    let out = dump_params(&[
        "--config", &config, "generate", "--drive", "/dev/sr0", "--output", "disc.iso",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert_eq!(
        stdout(&out),
        "\"/usr/bin/dd\" if=/dev/sr0 of=disc.iso bs=2048 --progress\n"
    );

    let out = dump_params(&[
        "--config", &config, "generate", "--drive", "/dev/sr0", "--output", "disc.iso", "--bare",
    ]);
    assert_eq!(stdout(&out), "if=/dev/sr0 of=disc.iso bs=2048 --progress\n");
}

#[test]
fn generate_fails_without_dialect() {
    let out = dump_params(&["generate", "--drive", "F", "--output", "game.bin"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("error: No dialect given"));
}

#[test]
fn generate_fails_for_incomplete_model() {
    // DiscImageCreator needs a drive speed for its dumping commands.
    let out = dump_params(&[
        "generate", "--dialect", "dic", "--drive", "F", "--output", "game.bin", "--media", "cd-rom",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("error: Cannot generate"));
}

#[test]
fn missing_settings_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("nope.yaml");
    let out = dump_params(&[
        "--config",
        missing.to_str().unwrap(),
        "describe",
        "--dialect",
        "dd",
    ]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("Failed to load settings"));
}

// ---------------------------------------------------------------------------
// parse
// ---------------------------------------------------------------------------

#[test]
fn parse_dic_json_report() {
    let out = dump_params(&[
        "parse",
        "--dialect",
        "dic",
        "--format",
        "json",
        "cd F test.bin 8 /c2 20",
    ]);
    assert!(out.status.success(), "{}", stderr(&out));

    let report: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(report["parameters"], "cd F test.bin 8 /c2 20");
    assert_eq!(report["command"], "cd");
    assert_eq!(report["dumping"], true);
    assert_eq!(report["input_path"], "F");
    assert_eq!(report["output_path"], "test.bin");

    let flags = report["flags"].as_array().unwrap();
    let c2 = flags.iter().find(|f| f["id"] == "c2-opcode").unwrap();
    assert_eq!(c2["values"][0], "20");
}

#[test]
fn parse_redumper_table_report() {
    let out = dump_params(&[
        "parse",
        "--dialect",
        "redumper",
        r#"disc --image-path="/srv/dumps" --image-name="game" --retries=2k"#,
    ]);
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    assert!(text.contains("command:  disc"), "{text}");
    assert!(text.contains("output:   /srv/dumps/game"), "{text}");
    assert!(text.contains("2048"), "{text}");
}

#[test]
fn parse_rejects_malformed_input() {
    let out = dump_params(&["parse", "--dialect", "redumper", "disc --nonsense"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("error: Invalid redumper parameters"));
}

// ---------------------------------------------------------------------------
// describe / validate
// ---------------------------------------------------------------------------

#[test]
fn describe_formats() {
    let out = dump_params(&["describe", "--dialect", "dd", "--format", "yaml"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("dialect: dd"));

    let out = dump_params(&["describe", "--dialect", "dic", "--format", "markdown"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).starts_with("# disc-image-creator"));

    let out = dump_params(&["describe", "--dialect", "redumper"]);
    assert!(out.status.success(), "{}", stderr(&out));
    assert!(stdout(&out).contains("--image-name"));
}

#[test]
fn validate_builtin_catalogs() {
    let out = dump_params(&["validate"]);
    assert!(out.status.success(), "{}", stderr(&out));
    let text = stdout(&out);
    for dialect in ["disc-image-creator", "redumper", "dd"] {
        assert!(text.contains(&format!("{dialect}: ok")), "{text}");
    }
}
