use assert_cmd::Command;
use predicates::str::contains;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn stockroom(store: &Path) -> Result<Command, Box<dyn std::error::Error>> {
    let mut cmd = Command::cargo_bin("stockroom")?;
    cmd.env_remove("STOCKROOM_ACTIVITY_BACKEND")
        .arg("--store")
        .arg(store);
    Ok(cmd)
}

fn record(store: &Path, kind: &str, id: &str, name: &str) -> Result<(), Box<dyn std::error::Error>> {
    stockroom(store)?
        .args([
            "activity",
            "record",
            "--type",
            kind,
            "--item-id",
            id,
            "--item-name",
            name,
        ])
        .assert()
        .success();
    Ok(())
}

#[test]
fn recorded_activity_is_listed() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    stockroom(dir.path())?
        .args([
            "activity",
            "record",
            "--type",
            "CREATE",
            "--item-id",
            "i1",
            "--item-name",
            "Widget",
        ])
        .assert()
        .success()
        .stdout(contains(r#""type":"CREATE""#))
        .stdout(contains(r#""user":"admin""#));

    stockroom(dir.path())?
        .args(["activity", "list"])
        .assert()
        .success()
        .stdout(contains("[CREATE] admin created Widget (Just now)"));

    assert!(dir.path().join("tactical_report_activities.json").exists());
    Ok(())
}

#[test]
fn filter_by_type() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    record(dir.path(), "CREATE", "i1", "Widget")?;
    record(dir.path(), "DELETE", "i1", "Widget")?;
    record(dir.path(), "CREATE", "i2", "Gadget")?;

    let output = stockroom(dir.path())?
        .args(["activity", "filter", "--type", "CREATE", "--json"])
        .output()?;
    assert!(output.status.success());
    let records: Vec<serde_json::Value> = serde_json::from_slice(&output.stdout)?;
    let names: Vec<&str> = records
        .iter()
        .filter_map(|r| r["itemName"].as_str())
        .collect();
    assert_eq!(names, vec!["Gadget", "Widget"]);
    Ok(())
}

#[test]
fn clear_needs_confirmation() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    record(dir.path(), "UPDATE", "i1", "Widget")?;

    stockroom(dir.path())?
        .args(["activity", "clear"])
        .assert()
        .failure()
        .stderr(contains("--yes"));

    stockroom(dir.path())?
        .args(["activity", "clear", "--yes"])
        .assert()
        .success();
    stockroom(dir.path())?
        .args(["activity", "list"])
        .assert()
        .success()
        .stdout(contains("No activities"));
    Ok(())
}

#[test]
fn export_then_import_into_another_store() -> Result<(), Box<dyn std::error::Error>> {
    let source = tempdir()?;
    let target = tempdir()?;
    let out = tempdir()?;
    record(source.path(), "CREATE", "i1", "Widget")?;
    record(source.path(), "UPDATE", "i1", "Widget")?;

    stockroom(source.path())?
        .args(["activity", "export", "--out-dir"])
        .arg(out.path())
        .assert()
        .success()
        .stdout(contains("Exported 2 activities to"));

    let exported: Vec<_> = fs::read_dir(out.path())?.collect::<Result<_, _>>()?;
    assert_eq!(exported.len(), 1);
    let file = exported[0].path();
    let name = file
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    assert!(name.starts_with("activities_export_") && name.ends_with(".json"));

    stockroom(target.path())?
        .args(["activity", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Imported 2 activities"));
    stockroom(target.path())?
        .args(["activity", "import"])
        .arg(&file)
        .assert()
        .success()
        .stdout(contains("Imported 0 activities"));
    Ok(())
}

#[test]
fn compact_trims_an_overfull_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    let entries: Vec<String> = (0..3)
        .map(|n| {
            format!(
                r#"{{"id":"a{n}","type":"CREATE","itemId":"i{n}","itemName":"Item {n}","details":{{}},"timestamp":"2024-04-01T09:00:0{n}.000Z","user":"admin"}}"#
            )
        })
        .collect();
    fs::write(
        dir.path().join("tactical_report_activities.json"),
        format!("[{}]", entries.join(",")),
    )?;

    stockroom(dir.path())?
        .args(["--capacity", "2", "activity", "compact"])
        .assert()
        .success()
        .stdout(contains("Read 3 entries, kept 2 entries"));

    stockroom(dir.path())?
        .args(["activity", "stats"])
        .assert()
        .success()
        .stdout(contains(r#""total": 2"#));
    Ok(())
}

#[test]
fn debug_logging_reports_the_resolved_store() -> Result<(), Box<dyn std::error::Error>> {
    let dir = tempdir()?;
    stockroom(dir.path())?
        .env("RUST_LOG", "debug")
        .args(["--backend", "memory", "activity", "stats"])
        .assert()
        .success()
        .stderr(contains("stockroom: store dir"))
        .stderr(contains("Memory"));
    Ok(())
}
