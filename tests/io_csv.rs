#![forbid(unsafe_code)]
use chrono::NaiveDate;
use pakirvu::io::{
    export_schedule_json, import_locations_csv, import_staff_csv, import_topics_csv,
    import_verses_csv, write_schedule_csv,
};
use pakirvu::{Catalog, ScheduleRow, StaffCategory, StaffStatus};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write(dir: &Path, name: &str, body: &str) -> std::path::PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).unwrap();
    path
}

fn catalog_with_locations(dir: &Path) -> Catalog {
    let path = write(dir, "locations.csv", "name,excluded\nChennai,no\nMadurai,\nArchive,yes\n");
    Catalog {
        locations: import_locations_csv(path).unwrap(),
        ..Default::default()
    }
}

#[test]
fn import_locations_reads_exclusion_flag() {
    let dir = tempdir().unwrap();
    let c = catalog_with_locations(dir.path());
    let flags: Vec<(&str, bool)> = c
        .locations
        .iter()
        .map(|l| (l.name.as_str(), l.excluded_from_schedule))
        .collect();
    assert_eq!(flags, [("Chennai", false), ("Madurai", false), ("Archive", true)]);

    let bad = write(dir.path(), "bad.csv", "name,excluded\nSalem,maybe\n");
    assert!(import_locations_csv(bad).is_err());
}

#[test]
fn import_staff_resolves_locations_and_rejects_unknown() {
    let dir = tempdir().unwrap();
    let c = catalog_with_locations(dir.path());
    let path = write(
        dir.path(),
        "staff.csv",
        "Staff Name,Location,Designation,Status,Other_Locations\n\
         Priya,chennai,Block Integrator,Working,\n\
         Arun,Madurai,associate,Long Leave,Chennai;Nowhere\n\
         Kavi,Madurai,unknown-role,,\n\
         Ghost,Nowhere,MIS,Working,\n\
         ,Chennai,MIS,Working,\n",
    );

    let import = import_staff_csv(path, &c).unwrap();
    assert_eq!(import.staff.len(), 3);
    let chennai = &c.find_location_by_name("Chennai").unwrap().id;
    let madurai = &c.find_location_by_name("Madurai").unwrap().id;

    let priya = &import.staff[0];
    assert_eq!(priya.location_id, *chennai);
    assert_eq!(priya.category, StaffCategory::Permanent);
    assert_eq!(priya.status, StaffStatus::Working);

    let arun = &import.staff[1];
    assert_eq!(arun.location_id, *madurai);
    assert_eq!(arun.category, StaffCategory::Associate);
    assert_eq!(arun.status, StaffStatus::LongLeave);
    assert_eq!(arun.additional_location_ids, vec![chennai.clone()]);

    let kavi = &import.staff[2];
    assert_eq!(kavi.category, StaffCategory::Permanent);
    assert_eq!(kavi.status, StaffStatus::Working);

    let rejected: Vec<usize> = import.rejected.iter().map(|r| r.row).collect();
    assert_eq!(rejected, [4, 5]);
    assert!(import.rejected[0].reason.contains("Nowhere"));
}

#[test]
fn import_topics_and_verses() {
    let dir = tempdir().unwrap();
    let topics = import_topics_csv(write(dir.path(), "topics.csv", "topic\nEducation\n\nPatience\n")).unwrap();
    let names: Vec<&str> = topics.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["Education", "Patience"]);

    let c = Catalog {
        topics,
        ..Default::default()
    };
    let patience = c.find_topic_by_name("patience").unwrap().id.clone();
    let path = write(
        dir.path(),
        "verses.csv",
        "topic,verse\nEducation,Learn well\n,Bear with others\nUnknown,Dropped\nEducation,\n",
    );

    let verses = import_verses_csv(&path, &c, None).unwrap();
    assert_eq!(verses.len(), 1);
    assert_eq!(verses[0].text, "Learn well");

    let verses = import_verses_csv(&path, &c, Some(&patience)).unwrap();
    let texts: Vec<&str> = verses.iter().map(|v| v.text.as_str()).collect();
    assert_eq!(texts, ["Learn well", "Bear with others", "Dropped"]);
    assert_eq!(verses[1].topic_id, patience);
}

fn sample_rows() -> Vec<ScheduleRow> {
    let first = ScheduleRow {
        date: NaiveDate::from_ymd_opt(2025, 1, 6).unwrap(),
        day: "Monday".into(),
        topic: "Education".into(),
        verse: "Learn well, then act".into(),
        sharing1_location: "Salem".into(),
        sub_row_location: "Chennai".into(),
        sharing2_staff: "Priya".into(),
        sharing3_staff: "Kavi".into(),
        sharing4_staff: "Arun".into(),
        is_first_sub_row: true,
        sub_row_span: 2,
    };
    let second = ScheduleRow {
        sub_row_location: "Madurai".into(),
        sharing2_staff: "N/A".into(),
        sharing3_staff: "N/A".into(),
        sharing4_staff: "N/A".into(),
        is_first_sub_row: false,
        ..first.clone()
    };
    vec![first, second]
}

#[test]
fn schedule_csv_blanks_merged_columns() {
    let mut buf = Vec::new();
    write_schedule_csv(&mut buf, &sample_rows()).unwrap();
    let out = String::from_utf8(buf).unwrap();
    insta::assert_snapshot!(out.trim_end(), @r###"
    date,day,topic,verse,sharing1_location,location,sharing2,sharing3,sharing4
    06-01-2025,Monday,Education,"Learn well, then act",Salem,Chennai,Priya,Kavi,Arun
    ,,,,,Madurai,N/A,N/A,N/A
    "###);
}

#[test]
fn schedule_json_export_reads_back() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("schedule.json");
    let rows = sample_rows();
    export_schedule_json(&path, &rows).unwrap();
    let back: Vec<ScheduleRow> = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(back, rows);
}
