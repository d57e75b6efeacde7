//! RankedCut progression engine
//!
//! Platform-agnostic core of the RankedCut ranked-ladder habit game. Given the
//! full history of daily logs and reward claims, the engine replays every day
//! deterministically to rebuild rank, currencies, badges, and the simulated
//! league. No I/O and no wall clock: callers supply `today`.

pub mod achievements;
pub mod badges;
pub mod boss;
pub mod calendar;
pub mod config;
pub mod data;
pub mod day;
pub mod items;
pub mod league;
pub mod metrics;
pub mod numbers;
pub mod quests;
pub mod replay;
pub mod rng;
pub mod skills;
pub mod snapshot;
pub mod state;
pub mod store;
pub mod tiers;

use anyhow::Context;

// Re-export commonly used types
pub use achievements::{
    ACHIEVEMENTS, AchievementDef, AchievementId, AchievementProgress, achievement_board,
    calculate_achievement_progress,
};
pub use badges::{BADGES, BadgeId, BadgeShelf, UnlockedBadge};
pub use boss::{BossKind, BossState, BossStatus};
pub use calendar::{CalendarDate, CalendarError, ClockTime};
pub use config::{ConfigError, LadderConfig, SeriesGate, TierRule};
pub use data::{DailyLog, Goals, QuestClaim, QuestRewards, UserProfile};
pub use day::{DayBreakdown, DayInput, DayOutcome, DayResult, process_day};
pub use items::{ITEMS, ItemId, Loadout};
pub use league::{
    LeaderRow, LeagueState, Rival, WeeklyEvent, generate_league, league_leaders,
    simulate_rival_day,
};
pub use metrics::{DashboardMetrics, RiskLevel, dashboard_metrics};
pub use quests::{
    ActiveQuests, QuestInstance, QuestProgress, QuestStatus, QuestTemplateId, quest_board,
    quest_progress,
};
pub use replay::{RankHistoryEntry, ReplayError, ReplayInputs, ReplayOutcome, recompute_history};
pub use rng::{Sfc32, cyrb128, seeded_float};
pub use skills::{SKILLS, SkillId, SkillPerk, Skills};
pub use snapshot::{AppSnapshot, SnapshotError};
pub use state::{CURRENT_SEASON_ID, CarryOver, RankState};
pub use store::{ClaimStore, LogStore, MemoryClaimStore, MemoryLogStore};
pub use tiers::{Division, RankPosition, Tier};

/// Owns the log and claim stores plus the player's inputs, and replays on
/// demand.
///
/// Mutations take `&mut self` and [`LadderEngine::recompute`] takes `&self`,
/// so a replay never observes a half-applied write. Hosts that share an
/// engine across threads wrap it in a `Mutex`.
pub struct LadderEngine<L, C>
where
    L: LogStore,
    C: ClaimStore,
{
    logs: L,
    claims: C,
    profile: Option<UserProfile>,
    skills: Skills,
    carry_over: CarryOver,
    config: LadderConfig,
}

impl<L, C> LadderEngine<L, C>
where
    L: LogStore,
    C: ClaimStore,
{
    /// Create an engine over the given stores with the default ladder config.
    pub fn new(logs: L, claims: C) -> Self {
        Self {
            logs,
            claims,
            profile: None,
            skills: Skills::new(),
            carry_over: CarryOver::default(),
            config: LadderConfig::default(),
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: LadderConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub const fn config(&self) -> &LadderConfig {
        &self.config
    }

    #[must_use]
    pub const fn profile(&self) -> Option<&UserProfile> {
        self.profile.as_ref()
    }

    pub fn set_profile(&mut self, profile: UserProfile) {
        self.profile = Some(profile);
    }

    #[must_use]
    pub const fn skills(&self) -> &Skills {
        &self.skills
    }

    pub fn set_skills(&mut self, skills: Skills) {
        self.skills = skills;
    }

    /// Replace the bought and equipped progression the replay starts from.
    pub fn set_carry_over(&mut self, carry_over: CarryOver) {
        self.carry_over = carry_over;
    }

    /// Store a day's log, replacing any earlier log for the same date.
    ///
    /// # Errors
    ///
    /// Returns an error if the log store rejects the write.
    pub fn submit_log(&mut self, log: DailyLog) -> Result<(), L::Error> {
        log::debug!("log submitted for {}", log.date);
        self.logs.upsert_log(log)
    }

    /// Record a quest claim. Returns `false` when the id was already claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim store rejects the write.
    pub fn claim_quest(&mut self, claim: QuestClaim) -> Result<bool, C::Error> {
        self.claims.append_claim(claim)
    }

    /// Record an achievement claim. Returns `false` when already claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim store rejects the write.
    pub fn claim_achievement(&mut self, id: AchievementId) -> Result<bool, C::Error> {
        self.claims.append_achievement(id.as_str())
    }

    /// Stored logs in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the log store cannot be read.
    pub fn logs(&self) -> Result<Vec<DailyLog>, L::Error> {
        self.logs.logs()
    }

    /// Stored quest claims.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim store cannot be read.
    pub fn claims(&self) -> Result<Vec<QuestClaim>, C::Error> {
        self.claims.claims()
    }

    /// Stored achievement claim ids.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim store cannot be read.
    pub fn achievement_claims(&self) -> Result<Vec<String>, C::Error> {
        self.claims.achievement_claims()
    }

    /// Replay the full history through `today`.
    ///
    /// # Errors
    ///
    /// Returns an error if a store cannot be read, no profile is set, or the
    /// ladder config is invalid.
    pub fn recompute(&self, today: CalendarDate) -> anyhow::Result<ReplayOutcome> {
        let logs = self.logs.logs().context("reading daily logs")?;
        let claims = self.claims.claims().context("reading quest claims")?;
        let achievement_claims = self
            .claims
            .achievement_claims()
            .context("reading achievement claims")?;
        let inputs = ReplayInputs {
            logs: &logs,
            profile: self.profile.as_ref(),
            claims: &claims,
            achievement_claims: &achievement_claims,
            skills: &self.skills,
            carry_over: &self.carry_over,
            today,
        };
        recompute_history(&self.config, &inputs)
            .with_context(|| format!("replaying history through {today}"))
    }
}

impl LadderEngine<MemoryLogStore, MemoryClaimStore> {
    /// Build an in-memory engine from a parsed save snapshot.
    #[must_use]
    pub fn from_snapshot(snapshot: AppSnapshot) -> Self {
        let logs: MemoryLogStore = snapshot.logs.into_iter().collect();
        let mut claims = MemoryClaimStore::new();
        for claim in snapshot.quest_claims {
            if !matches!(claims.append_claim(claim), Ok(true)) {
                log::debug!("duplicate quest claim in snapshot ignored");
            }
        }
        for id in &snapshot.achievement_claims {
            if !matches!(claims.append_achievement(id), Ok(true)) {
                log::debug!("duplicate achievement claim `{id}` in snapshot ignored");
            }
        }
        let mut engine = Self::new(logs, claims);
        engine.profile = snapshot.profile;
        engine.skills = snapshot.skills;
        engine.carry_over = snapshot.carry_over;
        engine
    }

    /// Parse a save file's JSON and build an in-memory engine from it.
    ///
    /// # Errors
    ///
    /// Returns an error if the snapshot cannot be parsed.
    pub fn load_snapshot(json: &str) -> anyhow::Result<Self> {
        let snapshot = AppSnapshot::from_json(json).context("loading save snapshot")?;
        Ok(Self::from_snapshot(snapshot))
    }
}
