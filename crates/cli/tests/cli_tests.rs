//! CLI integration tests

use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn sizer(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_sizer"))
        .args(args)
        .env("NO_COLOR", "1")
        .env("HOME", std::env::temp_dir())
        .env_remove("SIZER_CONFIG")
        .env_remove("SIZER_DEFAULT_FORMAT")
        .env_remove("SIZER_DEPLOYMENT_FILE")
        .env_remove("SIZER_MAX_LOAD_PERCENT")
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to execute command")
}

fn write_deployment(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("deployment.json");
    let content = r#"{
        "name": "acme",
        "maxLoadPercent": 85,
        "sites": [
            {
                "name": "HQ",
                "devices": {
                    "Linux Servers": {"count": 10, "instances": 100, "methods": {"Script": 1}}
                },
                "logSources": {"syslog": 5000}
            },
            {
                "name": "Branch",
                "devices": {
                    "Custom": {"count": 2, "instances": 10, "methods": {"Unknown": 0.5}}
                },
                "logSources": {}
            }
        ]
    }"#;
    std::fs::write(&path, content).unwrap();
    path
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

/// Test that the CLI shows help
#[test]
fn test_cli_help() {
    let output = sizer(&["--help"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI help should succeed");
    assert!(
        stdout.contains("Collector capacity sizing"),
        "Should show app description"
    );
    for command in ["calculate", "quick", "validate", "sizes", "init"] {
        assert!(stdout.contains(command), "Should show {} command", command);
    }
    assert!(stdout.contains("--format"), "Should show format option");
}

/// Test that the CLI shows version
#[test]
fn test_cli_version() {
    let output = sizer(&["--version"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "CLI version should succeed");
    assert!(stdout.contains("sizer"), "Should show binary name");
}

#[test]
fn test_calculate_json() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&["--format", "json", "calculate", path_arg(&path)]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["name"], "acme");
    assert_eq!(report["sites"][0]["name"], "HQ");
    assert_eq!(report["sites"][0]["total_load"], 5000.0);
    // SMALL and MEDIUM both need one unit; the later size wins
    assert_eq!(report["sites"][0]["polling"]["size"], "MEDIUM");
    assert_eq!(report["sites"][1]["total_load"], 0.0);
    assert_eq!(report["sites"][1]["warnings"].as_array().unwrap().len(), 2);
    assert_eq!(report["rollup"]["total_eps"], 5000.0);
}

#[test]
fn test_calculate_site_with_failover() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&[
        "--format",
        "json",
        "calculate",
        path_arg(&path),
        "--site",
        "Branch",
        "--polling-failover",
    ]);
    assert!(output.status.success());

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let sites = report["sites"].as_array().unwrap();
    assert_eq!(sites.len(), 1);

    let units = sites[0]["polling"]["units"].as_array().unwrap();
    assert_eq!(units.len(), 1);
    assert_eq!(units[0]["kind"], "redundancy_standby");
}

#[test]
fn test_calculate_table() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&["calculate", path_arg(&path)]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    assert!(stdout.contains("Deployment: acme"));
    assert!(stdout.contains("1 x MEDIUM"));
    assert!(stdout.contains("No collectors required"));
}

#[test]
fn test_calculate_unknown_site_fails() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&["calculate", path_arg(&path), "--site", "Moon Base"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Moon Base"));
}

#[test]
fn test_calculate_rejects_bad_max_load() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&["calculate", path_arg(&path), "--max-load", "0"]);
    assert!(!output.status.success());
}

#[test]
fn test_quick_estimate() {
    let output = sizer(&[
        "--format",
        "json",
        "quick",
        "--device",
        "Hypervisors=10",
        "--eps",
        "100",
    ]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    // 10 hypervisors * 80 instances * ESX weight 1.0
    assert_eq!(report["total_load"], 800.0);
    assert_eq!(report["total_eps"], 100.0);
}

#[test]
fn test_quick_rejects_tiny_max_load() {
    let output = sizer(&[
        "quick",
        "--device",
        "Linux Servers=1",
        "--max-load",
        "1e-15",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("max load"));
}

#[test]
fn test_quick_rejects_count_overflow() {
    let output = sizer(&[
        "quick",
        "--device",
        "Firewalls=4000000000",
        "--device",
        "Firewalls=4000000000",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Firewalls"));
}

#[test]
fn test_metrics_flag_prints_counters() {
    let output = sizer(&["--metrics", "quick", "--device", "Hypervisors=1"]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("sizing_calculations_total"));
}

#[test]
fn test_log_json_emits_structured_warnings() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&["--log-json", "calculate", path_arg(&path)]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    let events: Vec<serde_json::Value> = stderr
        .lines()
        .filter_map(|line| serde_json::from_str(line).ok())
        .collect();
    assert!(
        events
            .iter()
            .any(|e| e["fields"]["event"] == "validation_warning" && e["fields"]["site"] == "Branch"),
        "Should log Branch warnings as JSON, got: {}",
        stderr
    );
}

#[test]
fn test_quick_rejects_bad_device_argument() {
    let output = sizer(&["quick", "--device", "Hypervisors"]);
    assert!(!output.status.success());
}

#[test]
fn test_validate_reports_warnings() {
    let dir = TempDir::new().unwrap();
    let path = write_deployment(&dir);

    let output = sizer(&["validate", path_arg(&path)]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "Warnings alone should not fail");
    assert!(stdout.contains("Branch"));
    assert!(stdout.contains("Unknown"));
}

#[test]
fn test_validate_rejects_bad_capacities() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.json");
    std::fs::write(
        &path,
        r#"{"capacities": [{"size": "SMALL", "weight": 0, "eps": 100}]}"#,
    )
    .unwrap();

    let output = sizer(&["validate", path_arg(&path)]);
    assert!(!output.status.success());
}

#[test]
fn test_sizes_lists_catalog() {
    let output = sizer(&["sizes"]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success());
    for size in ["SMALL", "MEDIUM", "LARGE", "XL", "XXL"] {
        assert!(stdout.contains(size), "Should list {}", size);
    }
    assert!(stdout.contains("21,286"));
}

#[test]
fn test_sizes_uses_deployment_max_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("half.json");
    std::fs::write(&path, r#"{"name": "half", "maxLoadPercent": 50}"#).unwrap();

    let output = sizer(&["sizes", "--deployment", path_arg(&path)]);
    let stdout = String::from_utf8_lossy(&output.stdout);

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(stdout.contains("10,643"), "SMALL derated to 50%");
    assert!(stdout.contains("Max load: 50%"));

    let output = sizer(&["sizes", "--deployment", path_arg(&path), "--max-load", "100"]);
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Max load: 100%"), "Flag wins over the file");
}

#[test]
fn test_init_writes_loadable_template() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("new.json");

    let output = sizer(&["init", "--output", path_arg(&path)]);
    assert!(output.status.success());
    assert!(path.exists());

    let output = sizer(&["validate", path_arg(&path)]);
    assert!(output.status.success());

    let output = sizer(&["init", "--output", path_arg(&path)]);
    assert!(!output.status.success(), "Should refuse to overwrite");
}

/// Test invalid command error handling
#[test]
fn test_invalid_command() {
    let output = sizer(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid"),
        "Should show error message"
    );
}
