mod output;

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use kintsugi_core::messages::{self, Event};
use kintsugi_core::profile::{ActivityDetails, Profile};
use kintsugi_core::types::{ActivityKind, Lang};
use kintsugi_core::vessel::VesselVisual;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "kintsugi",
    about = "Kintsugi Mind — daily check-ins, therapy sessions, and the golden vessel",
    version,
    propagate_version = true
)]
struct Cli {
    /// Data root (profiles live under <root>/.kintsugi/)
    #[arg(long, global = true, env = "KINTSUGI_ROOT", default_value = ".")]
    root: PathBuf,

    /// Profile id
    #[arg(long, global = true, default_value = "local")]
    profile: String,

    /// Message language
    #[arg(long, global = true, default_value = "en")]
    lang: Lang,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the data directory and profile
    Init,

    /// Record today's visit
    Checkin {
        /// Override the visit timestamp (RFC 3339), for scripted use
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Record an anxiety report as a new crack
    Anxiety {
        /// What is weighing on you
        text: String,
    },

    /// Record a completed session in one of the three rooms
    Activity {
        /// garden, study, or tatami
        kind: ActivityKind,

        /// Garden actions completed
        #[arg(long)]
        actions: Option<u32>,

        /// Naikan questions answered
        #[arg(long)]
        questions: Option<u32>,

        /// Breathing minutes
        #[arg(long)]
        minutes: Option<u32>,

        /// Idempotency key; resubmitting the same id is a no-op
        #[arg(long)]
        id: Option<String>,
    },

    /// Show the vessel: crack paths and the depth/gold/patina metrics
    Vessel {
        /// Evaluate at this timestamp instead of now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },

    /// Show profile counters
    Stats,

    /// Show today's koan
    Koan,

    /// Merge a profile snapshot exported from another device
    Sync {
        /// YAML snapshot file
        #[arg(long)]
        file: PathBuf,
    },

    /// Run the REST API server
    Serve {
        #[arg(long, default_value_t = 3141)]
        port: u16,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Init => init(&cli),
        Commands::Checkin { at } => checkin(&cli, at),
        Commands::Anxiety { ref text } => anxiety(&cli, text),
        Commands::Activity {
            kind,
            actions,
            questions,
            minutes,
            ref id,
        } => activity(&cli, kind, actions, questions, minutes, id.clone()),
        Commands::Vessel { at } => vessel(&cli, at),
        Commands::Stats => stats(&cli),
        Commands::Koan => koan(&cli),
        Commands::Sync { ref file } => sync(&cli, file),
        Commands::Serve { port } => serve(&cli, port),
    }
}

fn init(cli: &Cli) -> anyhow::Result<()> {
    let profile = Profile::create(&cli.root, &cli.profile)?;
    if cli.json {
        output::print_json(&profile)?;
    } else {
        println!("Initialized profile '{}'. The vessel is whole.", profile.id);
    }
    Ok(())
}

fn checkin(cli: &Cli, at: Option<DateTime<Utc>>) -> anyhow::Result<()> {
    let now = at.unwrap_or_else(Utc::now);
    let mut profile = Profile::load(&cli.root, &cli.profile)?;
    let outcome = profile.record_visit(now);
    if outcome.first_today {
        profile.save(&cli.root)?;
    }

    let event = if !outcome.first_today {
        Event::CheckinRepeat
    } else if outcome.missed_days > 0 {
        Event::CheckinMissed {
            missed: outcome.missed_days,
        }
    } else {
        Event::CheckinFirst {
            streak: outcome.streak,
        }
    };

    if cli.json {
        output::print_json(&outcome)?;
    } else {
        println!("{}", messages::confirmation(cli.lang, event));
    }
    Ok(())
}

fn anxiety(cli: &Cli, text: &str) -> anyhow::Result<()> {
    anyhow::ensure!(!text.trim().is_empty(), "anxiety text must not be empty");
    let mut profile = Profile::load(&cli.root, &cli.profile)?;
    let crack_id = profile.record_anxiety(text, Utc::now()).id.clone();
    profile.save(&cli.root)?;

    if cli.json {
        output::print_json(&serde_json::json!({ "crack_id": crack_id }))?;
    } else {
        println!("{}", messages::confirmation(cli.lang, Event::AnxietyRecorded));
    }
    Ok(())
}

fn activity(
    cli: &Cli,
    kind: ActivityKind,
    actions: Option<u32>,
    questions: Option<u32>,
    minutes: Option<u32>,
    id: Option<String>,
) -> anyhow::Result<()> {
    let details = if actions.is_some() || questions.is_some() || minutes.is_some() {
        Some(ActivityDetails {
            action_count: actions,
            questions_answered: questions,
            breathing_minutes: minutes,
        })
    } else {
        None
    };

    let mut profile = Profile::load(&cli.root, &cli.profile)?;
    let outcome = profile.record_activity(kind, details, id, Utc::now());
    if !outcome.duplicate {
        profile.save(&cli.root)?;
    }

    if cli.json {
        output::print_json(&outcome)?;
    } else if outcome.duplicate {
        println!("Already recorded; nothing changed.");
    } else {
        let event = Event::ActivityRecorded {
            kind,
            repaired: outcome.repaired_crack.is_some(),
        };
        println!("{}", messages::confirmation(cli.lang, event));
    }
    Ok(())
}

fn vessel(cli: &Cli, at: Option<DateTime<Utc>>) -> anyhow::Result<()> {
    let now = at.unwrap_or_else(Utc::now);
    let profile = Profile::load(&cli.root, &cli.profile)?;
    let visual = VesselVisual::compute(&profile, now);

    if cli.json {
        output::print_json(&visual)?;
    } else {
        let repaired = visual.cracks.iter().filter(|c| c.repaired).count();
        output::print_kv(&[
            ("depth", format!("{:.0}", visual.depth)),
            ("gold", format!("{:.0}", visual.gold_intensity)),
            ("patina", format!("{:.0}", visual.patina)),
            (
                "cracks",
                format!("{} ({repaired} repaired)", visual.cracks.len()),
            ),
        ]);
    }
    Ok(())
}

fn stats(cli: &Cli) -> anyhow::Result<()> {
    let profile = Profile::load(&cli.root, &cli.profile)?;
    if cli.json {
        output::print_json(&profile.stats)?;
    } else {
        let s = &profile.stats;
        output::print_kv(&[
            ("visits", s.total_visits.to_string()),
            ("streak", s.current_streak.to_string()),
            ("longest streak", s.longest_streak.to_string()),
            ("garden actions", s.garden_actions.to_string()),
            ("study sessions", s.study_sessions.to_string()),
            ("tatami sessions", s.tatami_sessions.to_string()),
            ("repairs", profile.total_repairs.to_string()),
        ]);
    }
    Ok(())
}

fn koan(cli: &Cli) -> anyhow::Result<()> {
    let today = Utc::now().date_naive();
    let koan = messages::daily_koan(cli.lang, today);
    if cli.json {
        output::print_json(&serde_json::json!({ "date": today, "koan": koan }))?;
    } else {
        println!("{koan}");
    }
    Ok(())
}

fn sync(cli: &Cli, file: &PathBuf) -> anyhow::Result<()> {
    let data = std::fs::read_to_string(file)
        .with_context(|| format!("reading snapshot {}", file.display()))?;
    let snapshot: Profile = serde_yaml::from_str(&data)?;
    snapshot.validate()?;
    anyhow::ensure!(
        snapshot.id == cli.profile,
        "snapshot id '{}' does not match profile '{}'",
        snapshot.id,
        cli.profile
    );

    let merged = match Profile::load(&cli.root, &cli.profile) {
        Ok(stored) => kintsugi_core::merge::merge(&stored, &snapshot),
        Err(kintsugi_core::KintsugiError::ProfileNotFound(_)) => snapshot,
        Err(e) => return Err(e.into()),
    };
    merged.save(&cli.root)?;

    if cli.json {
        output::print_json(&merged)?;
    } else {
        println!(
            "Merged. {} visits, {} cracks, {} repairs.",
            merged.stats.total_visits,
            merged.cracks.len(),
            merged.total_repairs
        );
    }
    Ok(())
}

fn serve(cli: &Cli, port: u16) -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .init();

    let root = cli.root.clone();
    tokio::runtime::Runtime::new()?.block_on(kintsugi_server::serve(root, port))
}
