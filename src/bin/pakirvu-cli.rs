#![forbid(unsafe_code)]
use anyhow::{bail, Context, Result};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use pakirvu::{
    catalog::IssueKind,
    io,
    model::{LocationId, Period, SharingDay},
    schedule::{generate_with_options, DayLabels, ScheduleOptions},
    storage::{JsonStorage, Storage},
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de planning de partage (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON du catalogue
    #[arg(long, global = true, default_value = "catalog.json")]
    catalog: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Labels {
    Tamil,
    English,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des lieux depuis un CSV
    ImportLocations {
        #[arg(long)]
        csv: String,
    },

    /// Importer le personnel depuis un CSV (lieux résolus par nom)
    ImportStaff {
        #[arg(long)]
        csv: String,
    },

    /// Importer des thèmes depuis un CSV
    ImportTopics {
        #[arg(long)]
        csv: String,
    },

    /// Importer des versets depuis un CSV
    ImportVerses {
        #[arg(long)]
        csv: String,
        /// Thème par défaut si la ligne n'en précise pas
        #[arg(long)]
        topic: Option<String>,
    },

    /// Exclure un lieu du planning (ou le réintégrer avec --include)
    Exclude {
        #[arg(long)]
        location: String,
        #[arg(long)]
        include: bool,
    },

    /// Définir les lieux d'un jour de la semaine
    Rule {
        /// Monday..Saturday
        #[arg(long)]
        day: String,
        /// liste "lieu1,lieu2,..." ; vide = suppression de la règle
        #[arg(long, default_value = "")]
        locations: String,
    },

    /// Basculer un jour de congé
    Leave {
        #[arg(long)]
        year: i32,
        /// 1..=12
        #[arg(long)]
        month: u32,
        #[arg(long)]
        day: u32,
    },

    /// Vérifier l'intégrité du catalogue
    Check,

    /// Générer le planning d'un mois
    Generate {
        #[arg(long)]
        year: Option<i32>,
        /// 1..=12
        #[arg(long)]
        month: Option<u32>,
        #[arg(long)]
        out_csv: Option<String>,
        #[arg(long)]
        out_json: Option<String>,
        #[arg(long, value_enum, default_value_t = Labels::Tamil)]
        labels: Labels,
        /// Texte quand aucun membre ne correspond
        #[arg(long, default_value = "N/A")]
        na_text: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .try_init();
    }

    let storage = JsonStorage::open(&cli.catalog)?;
    let mut catalog = storage.load_or_default()?;

    let code = match cli.cmd {
        Commands::ImportLocations { csv } => {
            let locations = io::import_locations_csv(csv)?;
            println!("{} location(s) imported", locations.len());
            catalog.add_locations(locations);
            storage.save(&catalog)?;
            0
        }
        Commands::ImportStaff { csv } => {
            let import = io::import_staff_csv(csv, &catalog)?;
            println!("{} staff member(s) imported", import.staff.len());
            for r in &import.rejected {
                eprintln!("row {}: {}", r.row, r.reason);
            }
            catalog.add_staff(import.staff);
            storage.save(&catalog)?;
            if import.rejected.is_empty() {
                0
            } else {
                2
            }
        }
        Commands::ImportTopics { csv } => {
            let topics = io::import_topics_csv(csv)?;
            println!("{} topic(s) imported", topics.len());
            catalog.add_topics(topics);
            storage.save(&catalog)?;
            0
        }
        Commands::ImportVerses { csv, topic } => {
            let default_topic = match topic {
                Some(name) => Some(
                    catalog
                        .find_topic_by_name(&name)
                        .map(|t| t.id.clone())
                        .ok_or_else(|| anyhow::anyhow!("unknown topic: {}", name))?,
                ),
                None => None,
            };
            let verses = io::import_verses_csv(csv, &catalog, default_topic.as_ref())?;
            println!("{} verse(s) imported", verses.len());
            catalog.add_verses(verses);
            storage.save(&catalog)?;
            0
        }
        Commands::Exclude { location, include } => {
            let id = location_id(&catalog, &location)?;
            catalog.set_excluded(&id, !include)?;
            storage.save(&catalog)?;
            0
        }
        Commands::Rule { day, locations } => {
            let day: SharingDay = day.parse()?;
            let mut ids = Vec::new();
            for name in locations.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                ids.push(location_id(&catalog, name)?);
            }
            catalog.set_rule(day, ids);
            storage.save(&catalog)?;
            0
        }
        Commands::Leave { year, month, day } => {
            let period = Period::from_calendar_month(year, month)?;
            let on_leave = catalog.toggle_leave(&period, day)?;
            storage.save(&catalog)?;
            println!(
                "{period}-{day:02}: {}",
                if on_leave { "leave" } else { "working" }
            );
            0
        }
        Commands::Check => {
            let issues = catalog.lint();
            if issues.is_empty() {
                println!("OK: catalog is consistent");
                0
            } else {
                eprintln!("Found {} issue(s)", issues.len());
                for i in &issues {
                    eprintln!(
                        "{}: {} ({})",
                        match i.kind {
                            IssueKind::RuleUnknownLocation => "rule-unknown-location",
                            IssueKind::RuleExcludedLocation => "rule-excluded-location",
                            IssueKind::DuplicateRule => "duplicate-rule",
                            IssueKind::StaffUnknownLocation => "staff-unknown-location",
                            IssueKind::VerseUnknownTopic => "verse-unknown-topic",
                            IssueKind::EmptyCollection => "empty",
                        },
                        i.subject,
                        i.detail
                    );
                }
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Generate {
            year,
            month,
            out_csv,
            out_json,
            labels,
            na_text,
        } => {
            let today = chrono::Local::now().date_naive();
            let period = Period::from_calendar_month(
                year.unwrap_or(today.year()),
                month.unwrap_or(today.month()),
            )?;
            let opts = ScheduleOptions {
                day_labels: match labels {
                    Labels::Tamil => DayLabels::Tamil,
                    Labels::English => DayLabels::English,
                },
                not_available: na_text,
                ..ScheduleOptions::default()
            };
            let missing: Vec<String> = catalog
                .lint()
                .into_iter()
                .filter(|i| i.kind == IssueKind::EmptyCollection)
                .map(|i| i.subject)
                .collect();
            if !missing.is_empty() {
                bail!("cannot schedule {period}: no {} in catalog", missing.join(", "));
            }
            let rows = generate_with_options(&catalog, period, &opts);
            if let Some(path) = out_csv {
                io::export_schedule_csv(&path, &rows).with_context(|| format!("writing {path}"))?;
            }
            if let Some(path) = out_json {
                io::export_schedule_json(&path, &rows).with_context(|| format!("writing {path}"))?;
            }
            if rows.is_empty() {
                let reason = if catalog.locations.iter().all(|l| l.excluded_from_schedule) {
                    "every location is excluded from the schedule"
                } else {
                    "no working day in the month"
                };
                eprintln!("No schedule rows for {period}: {reason}");
                // Code 2 = WARNING/INCOMPLETE
                2
            } else {
                // impression compacte
                for r in &rows {
                    let head = if r.is_first_sub_row {
                        format!("{} {} | {} | {}", r.date.format("%d-%m-%Y"), r.day, r.topic, r.sharing1_location)
                    } else {
                        String::new()
                    };
                    println!(
                        "{head:<40} | {} | {} | {} | {}",
                        r.sub_row_location, r.sharing2_staff, r.sharing3_staff, r.sharing4_staff
                    );
                }
                0
            }
        }
    };

    std::process::exit(code);
}

fn location_id(catalog: &pakirvu::Catalog, name: &str) -> Result<LocationId> {
    catalog
        .find_location_by_name(name)
        .map(|l| l.id.clone())
        .ok_or_else(|| anyhow::anyhow!("unknown location: {}", name))
}
