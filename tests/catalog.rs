#![forbid(unsafe_code)]
use pakirvu::{
    Catalog, CatalogError, IssueKind, JsonStorage, Location, LocationId, Period, ScheduleCache,
    ScheduleOptions, SharingDay, SharingRule, Staff, StaffCategory, Storage, Topic, TopicId, Verse,
};
use tempfile::tempdir;

fn sample() -> Catalog {
    let mut chennai = Location::new("Chennai");
    chennai.id = LocationId::new("l1");
    let mut hidden = Location::new("Hidden");
    hidden.id = LocationId::new("l2");
    hidden.excluded_from_schedule = true;
    let topic = Topic::new("Education");
    let verse = Verse::new(topic.id.clone(), "Learn well");
    Catalog {
        staff: vec![Staff::new("Priya", chennai.id.clone(), StaffCategory::Permanent)],
        locations: vec![chennai, hidden],
        topics: vec![topic],
        verses: vec![verse],
        ..Default::default()
    }
}

#[test]
fn set_rule_replaces_and_clears() {
    let mut c = sample();
    c.set_rule(SharingDay::Friday, vec![LocationId::new("l1")]);
    c.set_rule(SharingDay::Monday, vec![LocationId::new("l1")]);
    c.set_rule(SharingDay::Friday, vec![LocationId::new("l2"), LocationId::new("l1")]);
    assert_eq!(c.sharing_rules.len(), 2);
    assert_eq!(c.sharing_rules[0].day, SharingDay::Monday);
    assert_eq!(c.rule_for(SharingDay::Friday).unwrap().location_ids.len(), 2);

    c.set_rule(SharingDay::Friday, Vec::new());
    assert!(c.rule_for(SharingDay::Friday).is_none());
    c.clear_rule(SharingDay::Monday);
    assert!(c.sharing_rules.is_empty());
}

#[test]
fn set_excluded_requires_known_location() {
    let mut c = sample();
    c.set_excluded(&LocationId::new("l2"), false).unwrap();
    assert!(!c.find_location_by_name(" hidden ").unwrap().excluded_from_schedule);
    let err = c.set_excluded(&LocationId::new("nope"), true).unwrap_err();
    assert!(matches!(err, CatalogError::UnknownLocation(id) if id == "nope"));
}

#[test]
fn lint_reports_dangling_references() {
    let mut c = sample();
    assert!(c.lint().is_empty());

    c.sharing_rules.push(SharingRule {
        day: SharingDay::Monday,
        location_ids: vec![LocationId::new("ghost"), LocationId::new("l2")],
    });
    c.sharing_rules.push(SharingRule {
        day: SharingDay::Monday,
        location_ids: vec![LocationId::new("l1")],
    });
    c.staff.push(Staff::new("Lost", LocationId::new("ghost"), StaffCategory::Mis));
    c.verses.push(Verse::new(TopicId::new("orphan"), "..."));

    let kinds: Vec<IssueKind> = c.lint().into_iter().map(|i| i.kind).collect();
    assert_eq!(
        kinds,
        [
            IssueKind::RuleUnknownLocation,
            IssueKind::RuleExcludedLocation,
            IssueKind::DuplicateRule,
            IssueKind::StaffUnknownLocation,
            IssueKind::VerseUnknownTopic,
        ]
    );

    let empty = Catalog::default().lint();
    assert_eq!(empty.len(), 4);
    assert!(empty.iter().all(|i| i.kind == IssueKind::EmptyCollection));
}

#[test]
fn storage_roundtrip_keeps_leave_days() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("catalog.json");
    let storage = JsonStorage::open(&path).unwrap();
    assert_eq!(storage.load_or_default().unwrap(), Catalog::default());
    assert!(storage.load().is_err());

    let mut c = sample();
    c.set_rule(SharingDay::Saturday, vec![LocationId::new("l1")]);
    c.toggle_leave(&Period::new(2025, 0).unwrap(), 14).unwrap();
    storage.save(&c).unwrap();

    let raw = std::fs::read_to_string(&path).unwrap();
    assert!(raw.contains("\"2025-0\""));
    assert_eq!(storage.load().unwrap(), c);
}

#[test]
fn cache_recomputes_only_on_change() {
    let mut c = sample();
    c.set_rule(SharingDay::Monday, vec![LocationId::new("l1")]);
    let period = Period::new(2025, 0).unwrap();
    let opts = ScheduleOptions::default();

    let mut cache = ScheduleCache::new();
    assert!(!cache.is_cached(&c, period, &opts));
    let first = cache.rows(&c, period, &opts).to_vec();
    assert!(cache.is_cached(&c, period, &opts));
    assert!(!cache.is_cached(&c, Period::new(2025, 1).unwrap(), &opts));

    c.toggle_leave(&period, 6).unwrap();
    assert!(!cache.is_cached(&c, period, &opts));
    let second = cache.rows(&c, period, &opts);
    assert_eq!(second.len() + 1, first.len());

    cache.invalidate();
    assert!(!cache.is_cached(&c, period, &opts));
}
