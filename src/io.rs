use crate::model::{
    normalize_label, Catalog, Location, Staff, StaffCategory, StaffStatus, Topic, TopicId, Verse,
};
use crate::schedule::ScheduleRow;
use anyhow::{bail, Context};
use csv::{ReaderBuilder, StringRecord, WriterBuilder};
use std::fs;
use std::io::Write;
use std::path::Path;
use tracing::warn;

const NAME_COLUMNS: &[&str] = &["name", "staff_name", "பணியாளர்"];
const LOCATION_COLUMNS: &[&str] = &["location", "location_name", "place", "இடம்"];
const CATEGORY_COLUMNS: &[&str] = &["category", "designation", "role", "பிரிவு"];
const STATUS_COLUMNS: &[&str] = &["status", "நிலை"];
const ADDITIONAL_COLUMNS: &[&str] = &["additional_locations", "other_locations", "கூடுதல்_இடம்"];
const TOPIC_COLUMNS: &[&str] = &["topic", "name", "தலைப்பு"];
const VERSE_COLUMNS: &[&str] = &["verse", "kural", "குறள்"];

/// Colonnes de l'export, dans l'ordre du tableau imprimé.
pub const SCHEDULE_HEADER: [&str; 9] = [
    "date",
    "day",
    "topic",
    "verse",
    "sharing1_location",
    "location",
    "sharing2",
    "sharing3",
    "sharing4",
];

/// Ligne CSV rejetée à l'import (numéro de ligne de données, base 1).
#[derive(Debug, Clone)]
pub struct RejectedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Default)]
pub struct StaffImport {
    pub staff: Vec<Staff>,
    pub rejected: Vec<RejectedRow>,
}

/// Import de lieux: header `name[,excluded]`
pub fn import_locations_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Location>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let name_col = column(&headers, &["name"]).context("missing name column")?;
    let excluded_col = column(&headers, &["excluded", "excluded_from_schedule"]);

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = field(&rec, Some(name_col));
        if name.is_empty() {
            continue;
        }
        let mut location = Location::new(name);
        let flag = field(&rec, excluded_col);
        if !flag.is_empty() {
            location.excluded_from_schedule = parse_bool(flag)
                .with_context(|| format!("invalid excluded value for location {name}"))?;
        }
        out.push(location);
    }
    Ok(out)
}

/// Import du personnel. Les lieux sont résolus par nom dans le catalogue;
/// une ligne sans nom ou au lieu inconnu est rejetée, les autres sont conservées.
pub fn import_staff_csv<P: AsRef<Path>>(path: P, catalog: &Catalog) -> anyhow::Result<StaffImport> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let name_col = column(&headers, NAME_COLUMNS);
    let location_col = column(&headers, LOCATION_COLUMNS);
    let category_col = column(&headers, CATEGORY_COLUMNS);
    let status_col = column(&headers, STATUS_COLUMNS);
    let additional_col = column(&headers, ADDITIONAL_COLUMNS);

    let mut out = StaffImport::default();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let row = idx + 1;
        let name = field(&rec, name_col);
        let location = field(&rec, location_col);
        if name.is_empty() || location.is_empty() {
            out.rejected.push(RejectedRow {
                row,
                reason: "incomplete row (name and location are required)".to_string(),
            });
            continue;
        }
        let Some(primary) = catalog.find_location_by_name(location) else {
            out.rejected.push(RejectedRow {
                row,
                reason: format!("{name}: unknown location '{location}'"),
            });
            continue;
        };

        let category = StaffCategory::from_label(field(&rec, category_col))
            .unwrap_or(StaffCategory::Permanent);
        let mut member = Staff::new(name, primary.id.clone(), category);
        member.status = StaffStatus::from_label(field(&rec, status_col)).unwrap_or_default();
        member.additional_location_ids = field(&rec, additional_col)
            .split([',', ';'])
            .filter(|chunk| !chunk.trim().is_empty())
            .filter_map(|chunk| catalog.find_location_by_name(chunk))
            .map(|loc| loc.id.clone())
            .collect();
        out.staff.push(member);
    }

    for r in &out.rejected {
        warn!(row = r.row, reason = %r.reason, "staff row rejected");
    }
    Ok(out)
}

/// Import de thèmes: header `name` (ou `topic`)
pub fn import_topics_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<Topic>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let name_col = column(&headers, TOPIC_COLUMNS).context("missing name/topic column")?;

    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = field(&rec, Some(name_col));
        if !name.is_empty() {
            out.push(Topic::new(name));
        }
    }
    Ok(out)
}

/// Import de versets: header `topic,verse`. Le thème est cherché par nom, à défaut `default_topic`;
/// sans thème résolu la ligne est ignorée.
pub fn import_verses_csv<P: AsRef<Path>>(
    path: P,
    catalog: &Catalog,
    default_topic: Option<&TopicId>,
) -> anyhow::Result<Vec<Verse>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let topic_col = column(&headers, TOPIC_COLUMNS);
    let verse_col = column(&headers, VERSE_COLUMNS).context("missing verse column")?;

    let mut out = Vec::new();
    for (idx, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let text = field(&rec, Some(verse_col));
        if text.is_empty() {
            continue;
        }
        let topic_name = field(&rec, topic_col);
        let topic_id = catalog
            .find_topic_by_name(topic_name)
            .filter(|_| !topic_name.is_empty())
            .map(|t| &t.id)
            .or(default_topic);
        match topic_id {
            Some(id) => out.push(Verse::new(id.clone(), text)),
            None => warn!(row = idx + 1, topic = topic_name, "verse skipped: no topic"),
        }
    }
    Ok(out)
}

/// Export CSV du planning; sur les sous-lignes suivantes, date/jour/thème/verset/partage-1
/// sont laissés vides pour simuler la fusion de cellules.
pub fn write_schedule_csv<W: Write>(writer: W, rows: &[ScheduleRow]) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_writer(writer);
    w.write_record(SCHEDULE_HEADER)?;
    for r in rows {
        let date = r.date.format("%d-%m-%Y").to_string();
        let shared: [&str; 5] = if r.is_first_sub_row {
            [
                date.as_str(),
                r.day.as_str(),
                r.topic.as_str(),
                r.verse.as_str(),
                r.sharing1_location.as_str(),
            ]
        } else {
            [""; 5]
        };
        w.write_record(shared.into_iter().chain([
            r.sub_row_location.as_str(),
            r.sharing2_staff.as_str(),
            r.sharing3_staff.as_str(),
            r.sharing4_staff.as_str(),
        ]))?;
    }
    w.flush()?;
    Ok(())
}

pub fn export_schedule_csv<P: AsRef<Path>>(path: P, rows: &[ScheduleRow]) -> anyhow::Result<()> {
    let path = path.as_ref();
    let file = fs::File::create(path).with_context(|| format!("creating {}", path.display()))?;
    write_schedule_csv(file, rows)
}

/// Export JSON du planning (jolie mise en forme)
pub fn export_schedule_json<P: AsRef<Path>>(path: P, rows: &[ScheduleRow]) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(rows)?;
    fs::write(path, s)?;
    Ok(())
}

fn column(headers: &StringRecord, aliases: &[&str]) -> Option<usize> {
    let wanted: Vec<String> = aliases.iter().map(|a| normalize_label(a)).collect();
    headers
        .iter()
        .position(|h| wanted.contains(&normalize_label(h)))
}

fn field(rec: &StringRecord, col: Option<usize>) -> &str {
    col.and_then(|c| rec.get(c)).map(str::trim).unwrap_or("")
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}
