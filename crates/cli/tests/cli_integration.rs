use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use std::time::{SystemTime, UNIX_EPOCH};

fn make_temp_dir(prefix: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system clock is before UNIX_EPOCH")
        .as_nanos();
    let pid = std::process::id();
    let dir = std::env::temp_dir().join(format!("shflags-integ-{prefix}-{pid}-{nanos}"));
    fs::create_dir_all(&dir).expect("failed to create temp dir");
    dir
}

const MANIFEST: &str = r#"{
  "parent": "greet.sh",
  "flags": [
    { "name": "update", "type": "boolean", "default": false, "help": "update things", "short": "x" },
    { "name": "count", "type": "integer", "default": 5, "help": "how many" },
    { "name": "name", "type": "string", "default": "world", "short": "n" }
  ]
}"#;

fn write_manifest(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("flags.json");
    fs::write(&path, contents).expect("failed to write manifest");
    path
}

fn shflags() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_shflags"));
    for var in ["FLAGS_GETOPT_CMD", "FLAGS_PARENT", "FLAGS_HELP", "COLUMNS", "RUST_LOG"] {
        cmd.env_remove(var);
    }
    cmd
}

fn parse(manifest: &Path, extra: &[&str], args: &[&str]) -> Output {
    shflags()
        .arg("parse")
        .arg("--manifest")
        .arg(manifest)
        .args(extra)
        .arg("--")
        .args(args)
        .output()
        .expect("failed to run shflags parse")
}

#[test]
fn help_works() {
    let out = shflags()
        .arg("--help")
        .output()
        .expect("failed to run shflags --help");
    assert!(
        out.status.success(),
        "shflags --help failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(
        stdout.contains("parse") && stdout.contains("usage") && stdout.contains("check"),
        "unexpected help output:\n{stdout}"
    );
}

#[test]
fn parse_prints_shell_assignments() {
    let dir = make_temp_dir("parse-shell");
    let manifest = write_manifest(&dir, MANIFEST);

    let out = parse(&manifest, &[], &["--count", "10", "-x", "--", "a", "b c"]);
    assert!(
        out.status.success(),
        "shflags parse failed:\nstatus: {}\nstderr:\n{}",
        out.status,
        String::from_utf8_lossy(&out.stderr),
    );
    let stdout = String::from_utf8_lossy(&out.stdout);
    for expected in [
        "FLAGS_help=1\n",
        "FLAGS_update=0\n",
        "FLAGS_count=10\n",
        "FLAGS_name='world'\n",
        "FLAGS_ARGC=4\n",
        "set -- 'a' 'b c'\n",
    ] {
        assert!(stdout.contains(expected), "missing {expected:?} in:\n{stdout}");
    }

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn parse_json_format() {
    let dir = make_temp_dir("parse-json");
    let manifest = write_manifest(&dir, MANIFEST);

    let out = parse(&manifest, &["--format", "json"], &["--noupdate", "-n", "Kate", "rest"]);
    assert!(out.status.success(), "stderr:\n{}", String::from_utf8_lossy(&out.stderr));
    let report: serde_json::Value =
        serde_json::from_slice(&out.stdout).expect("parse output is not JSON");
    assert_eq!(report["flags"]["update"], false);
    assert_eq!(report["flags"]["count"], 5);
    assert_eq!(report["flags"]["name"], "Kate");
    assert_eq!(report["positional"], serde_json::json!(["rest"]));
    assert_eq!(report["argc"], 3);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn help_flag_prints_usage_and_exits_false() {
    let dir = make_temp_dir("parse-help");
    let manifest = write_manifest(&dir, MANIFEST);

    let out = parse(&manifest, &[], &["--help"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.starts_with("USAGE: greet.sh [flags] args\nflags:\n"), "{stderr}");
    assert!(stderr.contains("  -x,--[no]update:  update things (default: false)\n"));
    assert!(stderr.contains("  -n,--name:  (default: 'world')\n"));

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn invalid_integer_exits_error() {
    let dir = make_temp_dir("parse-int");
    let manifest = write_manifest(&dir, MANIFEST);

    let out = parse(&manifest, &[], &["--count", "abc"]);
    assert_eq!(out.status.code(), Some(2));
    assert!(out.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("flags:FATAL invalid integer value (abc)"),
        "unexpected stderr:\n{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn unknown_option_exits_error() {
    let dir = make_temp_dir("parse-unknown");
    let manifest = write_manifest(&dir, MANIFEST);

    let out = parse(&manifest, &[], &["--zzz"]);
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("unrecognized option '--zzz'"), "{stderr}");

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn usage_honours_columns() {
    let dir = make_temp_dir("usage");
    let manifest = write_manifest(&dir, MANIFEST);

    let out = shflags()
        .env("COLUMNS", "40")
        .arg("usage")
        .arg("-m")
        .arg(&manifest)
        .output()
        .expect("failed to run shflags usage");
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(
        stderr.contains("  -x,--[no]update:  update things\n                    (default: false)\n"),
        "{stderr}"
    );

    let _ = fs::remove_dir_all(&dir);
}

#[test]
fn check_reports_rejected_definitions() {
    let dir = make_temp_dir("check");

    let ok = write_manifest(&dir, MANIFEST);
    let out = shflags()
        .args(["check", "-m"])
        .arg(&ok)
        .output()
        .expect("failed to run shflags check");
    assert!(out.status.success());
    assert!(String::from_utf8_lossy(&out.stderr).contains("OK: 3 flag(s) defined"));

    let duplicate = write_manifest(
        &dir,
        r#"{ "flags": [
            { "name": "count", "type": "integer", "default": 1 },
            { "name": "count", "type": "string", "default": "x" }
        ] }"#,
    );
    let out = shflags()
        .args(["check", "-m"])
        .arg(&duplicate)
        .output()
        .expect("failed to run shflags check");
    assert_eq!(out.status.code(), Some(1));

    let bad = write_manifest(
        &dir,
        r#"{ "flags": [ { "name": "argc", "type": "integer", "default": 1 } ] }"#,
    );
    let out = shflags()
        .args(["check", "-m"])
        .arg(&bad)
        .output()
        .expect("failed to run shflags check");
    assert_eq!(out.status.code(), Some(2));
    let stderr = String::from_utf8_lossy(&out.stderr);
    assert!(stderr.contains("flags:ERROR argc: flag name (argc) is reserved"), "{stderr}");

    let _ = fs::remove_dir_all(&dir);
}
