use super::*;
use chrono::TimeZone;
use sw_core::{MigrationUnit, SchemaExpression, Tag};

fn unit(version: i64, reversible: bool) -> MigrationUnit {
    let mut builder = MigrationUnit::builder(version)
        .description(format!("step {version}"))
        .up(SchemaExpression::raw_sql("SELECT 1").unwrap())
        .tag(Tag::new("core").unwrap());
    if reversible {
        builder = builder.down(SchemaExpression::raw_sql("SELECT 2").unwrap());
    }
    builder.build().unwrap()
}

fn record(version: i64, description: Option<&str>) -> VersionRecord {
    VersionRecord {
        version: MigrationVersion::new(version),
        applied_at_utc: Some(Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()),
        description: description.map(String::from),
    }
}

#[test]
fn test_entries_merge_files_and_records() {
    let set = MigrationSet::new().with(unit(2, false)).with(unit(1, true));
    let records = vec![record(1, Some("step 1")), record(9, Some("dropped file"))];

    let entries = build_entries(&set, &records);
    let summary: Vec<(i64, EntryStatus)> =
        entries.iter().map(|e| (e.version.get(), e.status)).collect();
    assert_eq!(
        summary,
        vec![
            (1, EntryStatus::Applied),
            (2, EntryStatus::Pending),
            (9, EntryStatus::Missing),
        ]
    );
    assert!(entries[0].reversible);
    assert!(entries[0].applied_at.is_some());
    assert_eq!(entries[1].tags, vec!["core"]);
    assert_eq!(entries[2].description, "dropped file");
}

#[test]
fn test_entries_serialize_lowercase_status() {
    let set = MigrationSet::new().with(unit(1, true));
    let entries = build_entries(&set, &[]);
    let json = serde_json::to_value(&entries).unwrap();
    assert_eq!(json[0]["status"], "pending");
    assert_eq!(json[0]["version"], 1);
    assert!(json[0]["applied_at"].is_null());
}
