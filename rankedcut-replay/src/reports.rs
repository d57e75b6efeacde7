use std::io::Write;

use anyhow::Result;
use colored::Colorize;
use serde::Serialize;

use rankedcut_game::{
    AchievementId, AchievementProgress, CalendarDate, DashboardMetrics, DayResult, LeaderRow,
    QuestStatus, RankHistoryEntry, RiskLevel,
};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementRow {
    pub id: AchievementId,
    pub name: &'static str,
    #[serde(flatten)]
    pub progress: AchievementProgress,
}

impl AchievementRow {
    pub fn new(id: AchievementId, progress: AchievementProgress) -> Self {
        Self {
            id,
            name: id.def().name,
            progress,
        }
    }
}

/// Everything the replay CLI reports for one save.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplayReport {
    pub player: String,
    pub today: CalendarDate,
    pub rank: String,
    pub highest_rank: String,
    pub streak: u32,
    pub shields: u32,
    pub cp: i64,
    pub essence: i64,
    pub days_logged: u32,
    pub badges: usize,
    pub series: Option<String>,
    pub weekly_event: Option<String>,
    pub placement: Option<u32>,
    pub fingerprint: String,
    pub metrics: DashboardMetrics,
    pub history: Vec<RankHistoryEntry>,
    pub leaders: Vec<LeaderRow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quests: Option<Vec<QuestStatus>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub achievements: Option<Vec<AchievementRow>>,
}

fn result_label(result: DayResult) -> &'static str {
    match result {
        DayResult::Win => "WIN",
        DayResult::Loss => "LOSS",
        DayResult::Quest => "QUEST",
        DayResult::Shielded => "SHIELDED",
    }
}

fn signed(value: i32) -> String {
    if value > 0 {
        format!("+{value}")
    } else {
        value.to_string()
    }
}

fn risk_label(risk: RiskLevel) -> &'static str {
    match risk {
        RiskLevel::Safe => "SAFE",
        RiskLevel::Warning => "WARNING",
        RiskLevel::Danger => "DANGER",
    }
}

fn days_to_promote(metrics: &DashboardMetrics) -> String {
    metrics
        .promotion_tracker
        .days_to_promote
        .map_or_else(|| "-".to_string(), |days| days.to_string())
}

pub fn write_console_report(report: &ReplayReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out)?;
    writeln!(
        out,
        "{}",
        format!("🏆 {} on {}", report.player, report.today)
            .bright_cyan()
            .bold()
    )?;
    writeln!(out, "{}", "==============================".cyan())?;
    writeln!(out, "Rank: {}", report.rank.bold())?;
    writeln!(out, "Peak: {}", report.highest_rank)?;
    if let Some(series) = &report.series {
        writeln!(out, "Series: {}", series.yellow())?;
    }
    writeln!(
        out,
        "Streak: {}  Shields: {}  Days logged: {}",
        report.streak, report.shields, report.days_logged
    )?;
    writeln!(
        out,
        "CP: {}  Essence: {}  Badges: {}",
        report.cp, report.essence, report.badges
    )?;

    let risk = risk_label(report.metrics.risk);
    let risk = match report.metrics.risk {
        RiskLevel::Safe => risk.green(),
        RiskLevel::Warning => risk.yellow(),
        RiskLevel::Danger => risk.red(),
    };
    writeln!(out, "Streak risk: {risk}")?;
    writeln!(
        out,
        "Promotion: {} LP needed, ~{} days",
        report.metrics.promotion_tracker.lp_needed,
        days_to_promote(&report.metrics)
    )?;
    if let Some(threat) = &report.metrics.next_threat {
        writeln!(
            out,
            "Next threat: {} ({} LP behind)",
            threat.name.red(),
            threat.gap
        )?;
    }
    writeln!(out)?;

    if !report.leaders.is_empty() {
        let event = report.weekly_event.as_deref().unwrap_or("none");
        writeln!(
            out,
            "{}",
            format!("⚔️  League (event: {event})").bright_yellow().bold()
        )?;
        for row in &report.leaders {
            let line = format!("  #{:<3} {:<20} {:>4} LP", row.rank, row.name, row.lp);
            if row.is_player {
                writeln!(out, "{}", line.green().bold())?;
            } else {
                writeln!(out, "{line}")?;
            }
        }
        writeln!(out)?;
    }

    if !report.history.is_empty() {
        writeln!(out, "{}", "📅 Recent days".bright_yellow().bold())?;
        for entry in &report.history {
            let label = result_label(entry.result);
            let label = match entry.result {
                DayResult::Win => label.green(),
                DayResult::Loss => label.red(),
                DayResult::Quest | DayResult::Shielded => label.yellow(),
            };
            writeln!(
                out,
                "  {}  {:<8} {:>5}  {}",
                entry.date,
                label,
                signed(entry.lp_change),
                entry.rank_snapshot
            )?;
        }
        writeln!(out)?;
    }

    if let Some(quests) = &report.quests {
        writeln!(out, "{}", "📜 Quests".bright_yellow().bold())?;
        for status in quests {
            let mark = if status.claimed {
                "claimed".dimmed()
            } else if status.progress.completed {
                "ready".green()
            } else {
                "open".normal()
            };
            writeln!(
                out,
                "  [{mark}] {} ({}/{})",
                status.quest.label, status.progress.current, status.quest.target_value
            )?;
        }
        writeln!(out)?;
    }

    if let Some(achievements) = &report.achievements {
        writeln!(out, "{}", "🎖️  Achievements".bright_yellow().bold())?;
        for row in achievements {
            let mark = if row.progress.claimed {
                "✅".to_string()
            } else {
                format!("{:>3}%", row.progress.percent)
            };
            writeln!(out, "  {mark} {}", row.name)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "Fingerprint: {}", report.fingerprint.dimmed())?;
    Ok(())
}

pub fn write_json_report(report: &ReplayReport, out: &mut dyn Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, report)?;
    writeln!(out)?;
    Ok(())
}

pub fn write_markdown_report(report: &ReplayReport, out: &mut dyn Write) -> Result<()> {
    writeln!(out, "# RankedCut replay: {}\n", report.player)?;
    writeln!(out, "**Replayed through:** {}  ", report.today)?;
    writeln!(out, "**Rank:** {}  ", report.rank)?;
    writeln!(out, "**Peak:** {}  ", report.highest_rank)?;
    if let Some(series) = &report.series {
        writeln!(out, "**Series:** {series}  ")?;
    }
    writeln!(
        out,
        "**Streak:** {} | **Shields:** {} | **CP:** {} | **Essence:** {}  ",
        report.streak, report.shields, report.cp, report.essence
    )?;
    writeln!(
        out,
        "**Streak risk:** {} | **LP to promote:** {} | **Days to promote:** {}\n",
        risk_label(report.metrics.risk),
        report.metrics.promotion_tracker.lp_needed,
        days_to_promote(&report.metrics)
    )?;

    if !report.leaders.is_empty() {
        writeln!(out, "## League\n")?;
        writeln!(out, "| Rank | Name | LP |")?;
        writeln!(out, "|------|------|----|")?;
        for row in &report.leaders {
            let name = if row.is_player {
                format!("**{}**", row.name)
            } else {
                row.name.clone()
            };
            writeln!(out, "| {} | {name} | {} |", row.rank, row.lp)?;
        }
        writeln!(out)?;
    }

    if !report.history.is_empty() {
        writeln!(out, "## Recent days\n")?;
        writeln!(out, "| Date | Result | LP | Rank |")?;
        writeln!(out, "|------|--------|----|------|")?;
        for entry in &report.history {
            writeln!(
                out,
                "| {} | {} | {} | {} |",
                entry.date,
                result_label(entry.result),
                signed(entry.lp_change),
                entry.rank_snapshot
            )?;
        }
        writeln!(out)?;
    }

    if let Some(quests) = &report.quests {
        writeln!(out, "## Quests\n")?;
        for status in quests {
            let mark = if status.claimed || status.progress.completed {
                "x"
            } else {
                " "
            };
            writeln!(out, "- [{mark}] {}", status.quest.label)?;
        }
        writeln!(out)?;
    }

    if let Some(achievements) = &report.achievements {
        writeln!(out, "## Achievements\n")?;
        for row in achievements {
            writeln!(out, "- {} ({}%)", row.name, row.progress.percent)?;
        }
        writeln!(out)?;
    }

    writeln!(out, "`{}`", report.fingerprint)?;
    Ok(())
}
