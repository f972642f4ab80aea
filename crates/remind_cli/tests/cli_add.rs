use std::path::PathBuf;
use std::process::Command;
use std::time::{SystemTime, UNIX_EPOCH};
use time::format_description::well_known::Rfc3339;
use time::{Duration, OffsetDateTime};

fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("remindme-{nanos}-{file_name}"))
}

#[test]
fn add_creates_task_and_schedules_notification() {
    let exe = env!("CARGO_BIN_EXE_remind");
    let store_path = temp_path("cli-add.json");
    let spool_dir = temp_path("cli-add-spool");

    let output = Command::new(exe)
        .args([
            "--json",
            "add",
            "Meeting",
            "--at",
            "2099-01-01T10:00:00Z",
            "--lead",
            "10",
        ])
        .env("REMINDME_STORE_PATH", &store_path)
        .env("REMINDME_SPOOL_DIR", &spool_dir)
        .output()
        .expect("failed to run add command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["title"], "Meeting");
    assert_eq!(parsed["dueDate"], "2099-01-01T10:00:00Z");
    assert_eq!(parsed["reminder"]["scheduled"], true);
    assert_eq!(parsed["reminder"]["fireAt"], "2099-01-01T09:50:00Z");

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).expect("stored json");
    assert_eq!(stored["tasks"][0]["title"], "Meeting");
    assert_eq!(stored["tasks"][0]["dueDate"], "2099-01-01T10:00:00Z");

    let task_id = parsed["id"].as_str().expect("task id");
    let request_path = spool_dir.join(format!("{task_id}.json"));
    let request: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&request_path).unwrap())
            .expect("spooled request");
    assert_eq!(request["fire_at"], "2099-01-01T09:50:00Z");
    assert_eq!(request["message"], "Meeting in 10 min");

    std::fs::remove_file(&store_path).ok();
    std::fs::remove_dir_all(&spool_dir).ok();
}

#[test]
fn add_merges_date_and_time_at_local_offset() {
    let exe = env!("CARGO_BIN_EXE_remind");
    let store_path = temp_path("cli-add-merge.json");
    let spool_dir = temp_path("cli-add-merge-spool");

    let output = Command::new(exe)
        .args([
            "--json",
            "add",
            "Standup",
            "--date",
            "2099-01-01",
            "--time",
            "09:30",
            "--lead",
            "5",
        ])
        .env("REMINDME_STORE_PATH", &store_path)
        .env("REMINDME_SPOOL_DIR", &spool_dir)
        .output()
        .expect("failed to run add command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");

    let due = OffsetDateTime::parse(parsed["dueDate"].as_str().unwrap(), &Rfc3339).unwrap();
    assert_eq!(due.hour(), 9);
    assert_eq!(due.minute(), 30);
    assert_eq!(due.second(), 0);
    assert_eq!((due.year(), due.day()), (2099, 1));

    std::fs::remove_file(&store_path).ok();
    std::fs::remove_dir_all(&spool_dir).ok();
}

#[test]
fn add_too_late_still_creates_the_task() {
    let exe = env!("CARGO_BIN_EXE_remind");
    let store_path = temp_path("cli-add-too-late.json");
    let spool_dir = temp_path("cli-add-too-late-spool");
    let due = (OffsetDateTime::now_utc() + Duration::minutes(1))
        .format(&Rfc3339)
        .unwrap();

    let output = Command::new(exe)
        .args(["add", "Soon", "--at", &due, "--lead", "10"])
        .env("REMINDME_STORE_PATH", &store_path)
        .env("REMINDME_SPOOL_DIR", &spool_dir)
        .output()
        .expect("failed to run add command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Added reminder: Soon"));
    assert!(stdout.contains("Too late"));

    let stored: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&store_path).unwrap()).expect("stored json");
    assert_eq!(stored["tasks"].as_array().unwrap().len(), 1);
    assert!(!spool_dir.exists() || std::fs::read_dir(&spool_dir).unwrap().next().is_none());

    std::fs::remove_file(&store_path).ok();
    std::fs::remove_dir_all(&spool_dir).ok();
}

#[test]
fn add_rejects_invalid_lead() {
    let exe = env!("CARGO_BIN_EXE_remind");
    let store_path = temp_path("cli-add-bad-lead.json");
    let spool_dir = temp_path("cli-add-bad-lead-spool");

    let output = Command::new(exe)
        .args([
            "add",
            "Meeting",
            "--at",
            "2099-01-01T10:00:00Z",
            "--lead",
            "abc",
        ])
        .env("REMINDME_STORE_PATH", &store_path)
        .env("REMINDME_SPOOL_DIR", &spool_dir)
        .output()
        .expect("failed to run add command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(!store_path.exists());
}

#[test]
fn add_requires_a_due_time() {
    let exe = env!("CARGO_BIN_EXE_remind");
    let store_path = temp_path("cli-add-no-due.json");

    let output = Command::new(exe)
        .args(["add", "Meeting"])
        .env("REMINDME_STORE_PATH", &store_path)
        .output()
        .expect("failed to run add command");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR: invalid_input"));
    assert!(!store_path.exists());
}

#[test]
fn add_uses_configured_default_lead() {
    let exe = env!("CARGO_BIN_EXE_remind");
    let store_path = temp_path("cli-add-config.json");
    let spool_dir = temp_path("cli-add-config-spool");
    let config_path = temp_path("cli-add-config-config.json");
    std::fs::write(&config_path, "{\n  \"default_lead_minutes\": \"60\"\n}").unwrap();

    let output = Command::new(exe)
        .args(["--json", "add", "Meeting", "--at", "2099-01-01T10:00:00Z"])
        .env("REMINDME_STORE_PATH", &store_path)
        .env("REMINDME_SPOOL_DIR", &spool_dir)
        .env("REMINDME_CONFIG_PATH", &config_path)
        .output()
        .expect("failed to run add command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("json output");
    assert_eq!(parsed["reminder"]["fireAt"], "2099-01-01T09:00:00Z");

    std::fs::remove_file(&store_path).ok();
    std::fs::remove_file(&config_path).ok();
    std::fs::remove_dir_all(&spool_dir).ok();
}
