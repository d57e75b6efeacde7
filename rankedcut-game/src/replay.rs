//! Full-history replay.
//!
//! [`recompute_history`] rebuilds the player's state from nothing but the
//! log and claim history. Every calendar day from the first recorded activity
//! through `today` is folded through the same steps:
//!
//! 1. week rollover (shield allowance, Fortify refill, weekly event),
//! 2. the monthly boss on first Saturdays,
//! 3. the ladder step from [`process_day`] when the day counts,
//! 4. badge checks,
//! 5. one simulated league day.
//!
//! Nothing is read from the wall clock, so the same inputs always produce the
//! same [`ReplayOutcome`].

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::hash::Hasher;
use thiserror::Error;
use twox_hash::XxHash64;

use crate::achievements::AchievementId;
use crate::badges::{BadgeId, BadgeProgress, COLLECTOR_THRESHOLD, threshold_badges, time_badges};
use crate::boss::{BOSS_CLAIM_PREFIX, BossDay, BossKind};
use crate::calendar::CalendarDate;
use crate::config::{ConfigError, LadderConfig};
use crate::data::{DailyLog, QuestClaim, QuestRewards, UserProfile};
use crate::day::{DayBreakdown, DayInput, DayResult, process_day};
use crate::items::ItemId;
use crate::league::{LeagueState, WeeklyEvent, generate_league};
use crate::numbers::scale_floor;
use crate::quests::QuestTemplateId;
use crate::skills::{SkillId, Skills};
use crate::state::{CarryOver, RankState, SeasonInfo};

/// Boss reward multiplier step per Boss Prep level.
pub const BOSS_PREP_STEP: f64 = 0.15;
/// Essence paid by Rival Breaker when the player's placement improves.
pub const RIVAL_BREAKER_ESSENCE: i64 = 5;

/// Inputs to a replay. Everything is borrowed; the replay never mutates them.
#[derive(Debug, Clone, Copy)]
pub struct ReplayInputs<'a> {
    pub logs: &'a [DailyLog],
    pub profile: Option<&'a UserProfile>,
    pub claims: &'a [QuestClaim],
    pub achievement_claims: &'a [String],
    pub skills: &'a Skills,
    pub carry_over: &'a CarryOver,
    pub today: CalendarDate,
}

/// One processed day in the match history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankHistoryEntry {
    pub date: CalendarDate,
    pub lp_change: i32,
    pub rank_snapshot: String,
    pub result: DayResult,
    pub details: DayBreakdown,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplayOutcome {
    pub state: RankState,
    pub history: Vec<RankHistoryEntry>,
    /// `None` only when the replay window is empty.
    pub league: Option<LeagueState>,
}

impl ReplayOutcome {
    /// Stable digest of the whole outcome, for determinism checks.
    #[must_use]
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = XxHash64::with_seed(0);
        match serde_json::to_vec(self) {
            Ok(bytes) => hasher.write(&bytes),
            Err(err) => log::warn!("replay outcome did not serialize for hashing: {err}"),
        }
        hasher.finish()
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ReplayError {
    #[error("no user profile; nothing to replay")]
    MissingProfile,
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Claims grouped by the day they apply to.
#[derive(Debug, Default)]
struct ClaimLedger {
    by_day: BTreeMap<CalendarDate, QuestRewards>,
    boss_months: HashSet<String>,
}

impl ClaimLedger {
    fn collect(claims: &[QuestClaim], skills: &Skills) -> Self {
        let mut ledger = Self::default();
        let mut seen = HashSet::new();
        let boss_multiplier = 1.0 + f64::from(skills.level(SkillId::BossPrep)) * BOSS_PREP_STEP;

        for claim in claims {
            if !seen.insert(claim.id.as_str()) {
                log::debug!("duplicate claim `{}` ignored", claim.id);
                continue;
            }
            let date = match claim.calendar_date() {
                Ok(date) => date,
                Err(err) => {
                    log::warn!("skipping claim `{}`: {err}", claim.id);
                    continue;
                }
            };
            let mut rewards = claim.rewards();
            if let Some(month) = claim.id.strip_prefix(BOSS_CLAIM_PREFIX) {
                ledger.boss_months.insert(month.to_string());
                rewards.cp = scale_floor(rewards.cp, boss_multiplier);
                rewards.essence = scale_floor(rewards.essence, boss_multiplier);
            } else if QuestTemplateId::from_instance_id(&claim.id).is_none() {
                log::warn!("skipping claim `{}`: unknown quest template", claim.id);
                continue;
            }
            *ledger.by_day.entry(date).or_default() += rewards;
        }
        ledger
    }

    fn first_day(&self) -> Option<CalendarDate> {
        self.by_day.keys().next().copied()
    }

    fn rewards_on(&self, date: CalendarDate) -> QuestRewards {
        self.by_day.get(&date).copied().unwrap_or_default()
    }
}

/// Logs keyed by date; a later entry for the same date replaces an earlier one.
fn index_logs(logs: &[DailyLog]) -> BTreeMap<CalendarDate, &DailyLog> {
    let mut by_day = BTreeMap::new();
    for log in logs {
        match log.calendar_date() {
            Ok(date) => {
                by_day.insert(date, log);
            }
            Err(err) => log::warn!("skipping log: {err}"),
        }
    }
    by_day
}

/// Fold state threaded through every replayed day.
struct Cursor<'a> {
    config: &'a LadderConfig,
    profile: &'a UserProfile,
    skills: &'a Skills,
    today: CalendarDate,
    logs: BTreeMap<CalendarDate, &'a DailyLog>,
    claims: ClaimLedger,
    state: RankState,
    league: LeagueState,
    history: Vec<RankHistoryEntry>,
    week_key: Option<String>,
    weekly_shields_used: u32,
}

impl Cursor<'_> {
    fn advance(mut self, date: CalendarDate) -> Self {
        self.roll_week(date);
        let log = self.logs.get(&date).copied();
        let ranked_win = log.is_some_and(DailyLog::is_ranked_win);
        if date.is_first_saturday() {
            self.fight_boss(date, ranked_win);
        }

        let extra = self.claims.rewards_on(date);
        let counts = ranked_win || date < self.today || extra.lp != 0 || extra.cp != 0;
        if counts {
            self.play_day(date, log, extra);
        }

        self.check_badges(date, log);
        self.simulate_league(date);
        self
    }

    fn roll_week(&mut self, date: CalendarDate) {
        let week_key = date.iso_week_key();
        if self.week_key.as_deref() == Some(week_key.as_str()) {
            return;
        }
        self.weekly_shields_used = 0;
        let fortify = self.skills.level(SkillId::Fortify);
        if fortify > 0 {
            self.state.shields = 1 + fortify;
        }
        let event = WeeklyEvent::for_week(&week_key);
        log::debug!("{week_key}: {}", event.label());
        self.league.weekly_event = Some(event);
        self.week_key = Some(week_key);
    }

    fn fight_boss(&mut self, date: CalendarDate, ranked_win: bool) {
        let boss = &mut self.state.boss_state;
        let outcome = boss.engage(date, ranked_win, date < self.today);
        boss.rewards_claimed = self.claims.boss_months.contains(&boss.month_key);
        if let BossDay::Won(kind) = outcome {
            log::debug!("{date}: {} defeated", kind.name());
            self.state.unlocked_badges.unlock(kind.badge(), date);
            self.state.unlock_item(ItemId::TitleSlayer);
            if kind == BossKind::FlameTyrant {
                self.state.unlock_item(ItemId::BannerFlame);
            }
        }
    }

    fn play_day(&mut self, date: CalendarDate, log: Option<&DailyLog>, extra: QuestRewards) {
        let input = DayInput {
            date,
            log,
            profile: self.profile,
            extra,
            skills: self.skills,
            weekly_shields_used: self.weekly_shields_used,
        };
        let outcome = process_day(self.config, &self.state, &input);
        self.state = outcome.state;

        if (self.state.tier, self.state.division) != (self.league.tier, self.league.division) {
            self.league = generate_league(
                self.state.tier,
                self.state.division,
                date,
                self.league.weekly_event,
            );
        }
        if outcome.result == DayResult::Shielded {
            self.weekly_shields_used += 1;
        }

        self.history.push(RankHistoryEntry {
            date,
            lp_change: outcome.lp_change,
            rank_snapshot: self.state.snapshot_label(),
            result: outcome.result,
            details: outcome.details,
        });
    }

    fn check_badges(&mut self, date: CalendarDate, log: Option<&DailyLog>) {
        award_threshold_badges(&mut self.state, date);

        let Some(log) = log else { return };
        // Time badges need an explicit ranked flag.
        if log.is_ranked == Some(true)
            && let Some(time) = log.clock_time()
        {
            for badge in time_badges(time) {
                self.state.unlocked_badges.unlock(badge, date);
            }
        }
        let in_season = SeasonInfo::find(&self.state.season_id)
            .is_some_and(|season| season.contains(date));
        if log.is_ranked_win() && in_season {
            self.state.unlocked_badges.unlock(BadgeId::Season1, date);
        }
    }

    fn simulate_league(&mut self, date: CalendarDate) {
        let config = self.config;
        let before = self.league.latest_placement();
        let rule = config.rule(self.league.tier);
        let Some(rank) = self.league.advance_day(rule, date, self.state.lp) else {
            return;
        };
        if self.skills.has(SkillId::RivalBreaker) && before.is_some_and(|prev| rank < prev) {
            self.state.essence = self.state.essence.saturating_add(RIVAL_BREAKER_ESSENCE);
        }
        if rank <= 3 {
            self.state.unlocked_badges.unlock(BadgeId::SeasonChampion, date);
        }
    }
}

/// Badges that depend only on counters: tier, streak, balances, boss kills.
fn award_threshold_badges(state: &mut RankState, date: CalendarDate) {
    let progress = BadgeProgress {
        tier: state.tier,
        streak: state.streak,
        cp: state.cp,
        essence: state.essence,
    };
    for badge in threshold_badges(progress) {
        state.unlocked_badges.unlock(badge, date);
    }
    if state.streak >= 7 {
        state.unlock_item(ItemId::TitleConsistent);
    }
    if state.unlocked_badges.boss_kills() >= COLLECTOR_THRESHOLD {
        state.unlocked_badges.unlock(BadgeId::BossCollector, date);
    }
}

/// Credit each claimed achievement once.
fn credit_achievements(state: &mut RankState, claimed: &[String]) {
    let mut seen = HashSet::new();
    for raw in claimed {
        let Ok(id) = raw.parse::<AchievementId>() else {
            log::warn!("skipping unknown achievement claim `{raw}`");
            continue;
        };
        if seen.insert(id) {
            let reward = id.def().reward;
            state.cp = state.cp.saturating_add(reward.cp);
            state.essence = state.essence.saturating_add(reward.essence);
        }
    }
}

/// Rebuild the player's state from the complete history.
///
/// # Errors
///
/// Returns [`ReplayError::MissingProfile`] when no profile was supplied and
/// [`ReplayError::Config`] when `config` fails validation.
pub fn recompute_history(
    config: &LadderConfig,
    inputs: &ReplayInputs<'_>,
) -> Result<ReplayOutcome, ReplayError> {
    let profile = inputs.profile.ok_or(ReplayError::MissingProfile)?;
    config.validate()?;

    let today = inputs.today;
    let logs = index_logs(inputs.logs);
    let claims = ClaimLedger::collect(inputs.claims, inputs.skills);
    let start = [logs.keys().next().copied(), claims.first_day()]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(today);

    let mut state = RankState::with_carry_over(inputs.carry_over);
    if start > today {
        log::warn!("history starts at {start}, after {today}; nothing to replay");
        credit_achievements(&mut state, inputs.achievement_claims);
        return Ok(ReplayOutcome {
            state,
            history: Vec::new(),
            league: None,
        });
    }

    log::debug!("replaying {start}..={today}");
    let league = generate_league(state.tier, state.division, start, None);
    let cursor = Cursor {
        config,
        profile,
        skills: inputs.skills,
        today,
        logs,
        claims,
        state,
        league,
        history: Vec::new(),
        week_key: None,
        weekly_shields_used: 0,
    };
    let mut cursor = start.through(today).fold(cursor, Cursor::advance);

    credit_achievements(&mut cursor.state, inputs.achievement_claims);
    award_threshold_badges(&mut cursor.state, today);

    Ok(ReplayOutcome {
        state: cursor.state,
        history: cursor.history,
        league: Some(cursor.league),
    })
}
