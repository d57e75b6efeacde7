mod reports;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::{Path, PathBuf};

use rankedcut_game::{
    ActiveQuests, CalendarDate, LadderConfig, LadderEngine, MemoryClaimStore, MemoryLogStore,
    ReplayOutcome, UserProfile, achievement_board, dashboard_metrics, league_leaders, quest_board,
};
use reports::{
    AchievementRow, ReplayReport, write_console_report, write_json_report, write_markdown_report,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Colored summary for a terminal
    Console,
    /// Machine-readable report
    Json,
    /// Markdown tables
    Markdown,
}

#[derive(Debug, Parser)]
#[command(name = "rankedcut-replay", version)]
#[command(about = "Replay a RankedCut save snapshot and report the rebuilt ladder state")]
struct Args {
    /// Save snapshot JSON to replay
    #[arg(long)]
    snapshot: PathBuf,

    /// Replay through this date (YYYY-MM-DD); defaults to the local date
    #[arg(long)]
    today: Option<CalendarDate>,

    /// Output report format
    #[arg(long, value_enum, default_value_t = ReportFormat::Console)]
    report: ReportFormat,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Number of most recent history days to include
    #[arg(long, default_value_t = 7)]
    history: usize,

    /// Include the current quest board
    #[arg(long)]
    quests: bool,

    /// Include achievement progress
    #[arg(long)]
    achievements: bool,

    /// Ladder tuning override (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let today = args
        .today
        .unwrap_or_else(|| CalendarDate::from(chrono::Local::now().date_naive()));
    let engine = load_engine(&args.snapshot, args.config.as_deref())?;
    let outcome = engine.recompute(today)?;
    log::info!("replayed {} days through {today}", outcome.history.len());

    let report = build_report(&args, &engine, &outcome, today)?;

    if args.output.is_some() {
        colored::control::set_override(false);
    }
    let mut output_target = OutputTarget::new(args.output.clone())?;
    match args.report {
        ReportFormat::Console => write_console_report(&report, output_target.writer())?,
        ReportFormat::Json => write_json_report(&report, output_target.writer())?,
        ReportFormat::Markdown => write_markdown_report(&report, output_target.writer())?,
    }
    output_target.flush_inner()?;

    if let Some(path) = &args.output {
        eprintln!("{} {}", "📝 Report written to".green(), path.display());
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

type Engine = LadderEngine<MemoryLogStore, MemoryClaimStore>;

fn load_engine(snapshot: &Path, config: Option<&Path>) -> Result<Engine> {
    let json = std::fs::read_to_string(snapshot)
        .with_context(|| format!("failed to read {}", snapshot.display()))?;
    let engine = LadderEngine::load_snapshot(&json)
        .with_context(|| format!("failed to load {}", snapshot.display()))?;
    let Some(path) = config else {
        return Ok(engine);
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let config = LadderConfig::from_json(&text)
        .with_context(|| format!("invalid ladder config in {}", path.display()))?;
    Ok(engine.with_config(config))
}

fn build_report(
    args: &Args,
    engine: &Engine,
    outcome: &ReplayOutcome,
    today: CalendarDate,
) -> Result<ReplayReport> {
    let logs = engine.logs()?;
    let state = &outcome.state;
    let profile = engine.profile().cloned().unwrap_or_else(UserProfile::default);

    let leaders = outcome.league.as_ref().map_or_else(Vec::new, |league| {
        league_leaders(league, state.lp, state.loadout.weapon_id, &profile.name)
    });

    let quests = if args.quests {
        let claims = engine.claims()?;
        let mut active = ActiveQuests::default();
        active.refresh(today, &profile, &state.season_id);
        Some(quest_board(&active, &logs, state, &claims))
    } else {
        None
    };

    let achievements = if args.achievements {
        let claimed = engine.achievement_claims()?;
        let board = achievement_board(state, &logs, outcome.league.as_ref(), &claimed);
        Some(
            board
                .into_iter()
                .map(|(id, progress)| AchievementRow::new(id, progress))
                .collect(),
        )
    } else {
        None
    };

    let skip = outcome.history.len().saturating_sub(args.history);
    Ok(ReplayReport {
        player: if profile.name.is_empty() {
            "Player".to_string()
        } else {
            profile.name.clone()
        },
        today,
        rank: state.snapshot_label(),
        highest_rank: state.highest_rank.label(),
        streak: state.streak,
        shields: state.shields,
        cp: state.cp,
        essence: state.essence,
        days_logged: state.total_days_logged,
        badges: state.unlocked_badges.len(),
        series: state.series.map(|series| {
            format!(
                "{}W-{}L (first to {})",
                series.wins, series.losses, series.target_wins
            )
        }),
        weekly_event: outcome
            .league
            .as_ref()
            .map(|league| league.event().label().to_string()),
        placement: outcome
            .league
            .as_ref()
            .and_then(|league| league.latest_placement()),
        fingerprint: format!("{:016x}", outcome.fingerprint()),
        metrics: dashboard_metrics(
            engine.config(),
            &logs,
            state,
            outcome.league.as_ref(),
            today,
        ),
        history: outcome.history[skip..].to_vec(),
        leaders,
        quests,
        achievements,
    })
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE_SAVE: &str = include_str!("../../rankedcut-game/tests/fixtures/sample_save.json");

    fn args(extra: &[&str]) -> Args {
        let mut argv = vec!["rankedcut-replay", "--snapshot", "save.json"];
        argv.extend_from_slice(extra);
        Args::parse_from(argv)
    }

    #[test]
    fn defaults_are_console_and_a_week_of_history() {
        let parsed = args(&[]);
        assert_eq!(parsed.report, ReportFormat::Console);
        assert_eq!(parsed.history, 7);
        assert!(parsed.today.is_none());
        assert!(!parsed.quests);
    }

    #[test]
    fn today_must_be_a_date() {
        let parsed = Args::try_parse_from([
            "rankedcut-replay",
            "--snapshot",
            "save.json",
            "--today",
            "next tuesday",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn report_trims_history_and_fills_optional_sections() {
        let engine = LadderEngine::load_snapshot(SAMPLE_SAVE).unwrap();
        let today = CalendarDate::parse("2024-02-20").unwrap();
        let outcome = engine.recompute(today).unwrap();
        let parsed = args(&["--history", "3", "--quests", "--achievements"]);
        let report = build_report(&parsed, &engine, &outcome, today).unwrap();

        assert_eq!(report.player, "Sam");
        assert_eq!(report.history.len(), 3);
        assert_eq!(report.history.last(), outcome.history.last());
        assert_eq!(report.leaders.len(), 5);
        assert!(report.leaders.windows(2).all(|pair| pair[0].lp >= pair[1].lp));
        assert!(!report.quests.unwrap().is_empty());
        let achievements = report.achievements.unwrap();
        assert_eq!(achievements.len(), rankedcut_game::ACHIEVEMENTS.len());
        assert_eq!(report.fingerprint.len(), 16);
    }
}
