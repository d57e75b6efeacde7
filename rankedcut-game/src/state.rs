use serde::{Deserialize, Serialize};

use crate::badges::BadgeShelf;
use crate::boss::BossState;
use crate::calendar::CalendarDate;
use crate::items::{ItemId, Loadout, STARTER_ITEMS};
use crate::tiers::{Division, RankPosition, Tier};

pub const CURRENT_SEASON_ID: &str = "season_1";

/// A competitive season and its calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeasonInfo {
    pub id: &'static str,
    pub name: &'static str,
    pub theme: &'static str,
    pub start: &'static str,
    pub end: &'static str,
}

pub static SEASONS: [SeasonInfo; 1] = [SeasonInfo {
    id: CURRENT_SEASON_ID,
    name: "Awakening",
    theme: "amber",
    start: "2024-01-01",
    end: "2026-06-30",
}];

impl SeasonInfo {
    #[must_use]
    pub fn find(id: &str) -> Option<&'static Self> {
        SEASONS.iter().find(|season| season.id == id)
    }

    /// Inclusive calendar window; `None` if the catalog dates are malformed.
    #[must_use]
    pub fn window(&self) -> Option<(CalendarDate, CalendarDate)> {
        let start = CalendarDate::parse(self.start).ok()?;
        let end = CalendarDate::parse(self.end).ok()?;
        Some((start, end))
    }

    #[must_use]
    pub fn contains(&self, date: CalendarDate) -> bool {
        self.window()
            .is_some_and(|(start, end)| start <= date && date <= end)
    }
}

/// Best-of-N promotion series between the top tiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Series {
    #[serde(default)]
    pub wins: u32,
    #[serde(default)]
    pub losses: u32,
    pub target_wins: u32,
    #[serde(default)]
    pub loss_allowance: u32,
}

impl Series {
    #[must_use]
    pub const fn new(target_wins: u32, loss_allowance: u32) -> Self {
        Self {
            wins: 0,
            losses: 0,
            target_wins,
            loss_allowance,
        }
    }

    #[must_use]
    pub const fn is_won(&self) -> bool {
        self.wins >= self.target_wins
    }

    #[must_use]
    pub const fn is_lost(&self) -> bool {
        self.losses > self.loss_allowance
    }
}

/// Archived summary of a finished season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegacySeason {
    pub season_id: String,
    #[serde(default)]
    pub season_name: String,
    #[serde(default)]
    pub theme: String,
    #[serde(default)]
    pub start_date: String,
    #[serde(default)]
    pub end_date: String,
    pub final_tier: Tier,
    #[serde(default)]
    pub final_division: Option<Division>,
    #[serde(default, rename = "finalLP")]
    pub final_lp: i32,
    #[serde(default)]
    pub total_days_logged: u32,
    #[serde(default)]
    pub best_streak: u32,
    #[serde(default)]
    pub bosses_defeated: Vec<String>,
    #[serde(default)]
    pub badges_earned: Vec<String>,
    #[serde(default)]
    pub archived_at: String,
}

/// Progression that survives a recompute because it is bought or chosen
/// rather than derived from logs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CarryOver {
    #[serde(default)]
    pub loadout: Option<Loadout>,
    #[serde(default)]
    pub unlocked_items: Option<Vec<ItemId>>,
    #[serde(default)]
    pub unlocked_badges: Option<BadgeShelf>,
    #[serde(default)]
    pub legacy_seasons: Option<Vec<LegacySeason>>,
    #[serde(default)]
    pub last_seen_season_id: Option<String>,
}

/// The player's full progression snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RankState {
    pub tier: Tier,
    pub division: Option<Division>,
    pub lp: i32,
    /// LP from claims made on a missed day, released by the next win.
    pub pending_quest_lp: i32,
    pub streak: u32,
    pub series: Option<Series>,
    pub highest_rank: RankPosition,
    pub cp: i64,
    pub essence: i64,
    pub shields: u32,
    pub total_days_logged: u32,
    pub loadout: Loadout,
    pub unlocked_items: Vec<ItemId>,
    pub unlocked_badges: BadgeShelf,
    pub boss_state: BossState,
    pub season_id: String,
    pub last_seen_season_id: String,
    pub legacy_seasons: Vec<LegacySeason>,
}

impl Default for RankState {
    fn default() -> Self {
        Self::initial()
    }
}

impl RankState {
    /// Iron IV, zero balances, starter gear.
    #[must_use]
    pub fn initial() -> Self {
        Self {
            tier: Tier::Iron,
            division: Some(Division::IV),
            lp: 0,
            pending_quest_lp: 0,
            streak: 0,
            series: None,
            highest_rank: RankPosition::floor(),
            cp: 0,
            essence: 0,
            shields: 0,
            total_days_logged: 0,
            loadout: Loadout::default(),
            unlocked_items: STARTER_ITEMS.to_vec(),
            unlocked_badges: BadgeShelf::new(),
            boss_state: BossState::default(),
            season_id: CURRENT_SEASON_ID.to_string(),
            last_seen_season_id: String::new(),
            legacy_seasons: Vec::new(),
        }
    }

    /// Initial state with the carried-over choices applied.
    #[must_use]
    pub fn with_carry_over(carry: &CarryOver) -> Self {
        let mut state = Self::initial();
        if let Some(loadout) = carry.loadout {
            state.loadout = loadout;
        }
        if let Some(items) = &carry.unlocked_items {
            state.unlocked_items.clone_from(items);
        }
        if let Some(badges) = &carry.unlocked_badges {
            state.unlocked_badges.clone_from(badges);
        }
        if let Some(legacy) = &carry.legacy_seasons {
            state.legacy_seasons.clone_from(legacy);
        }
        if let Some(seen) = &carry.last_seen_season_id {
            state.last_seen_season_id.clone_from(seen);
        }
        state
    }

    /// The parts of this state a later recompute should start from.
    #[must_use]
    pub fn carry_over(&self) -> CarryOver {
        CarryOver {
            loadout: Some(self.loadout),
            unlocked_items: Some(self.unlocked_items.clone()),
            unlocked_badges: Some(self.unlocked_badges.clone()),
            legacy_seasons: Some(self.legacy_seasons.clone()),
            last_seen_season_id: Some(self.last_seen_season_id.clone()),
        }
    }

    #[must_use]
    pub const fn position(&self) -> RankPosition {
        RankPosition {
            tier: self.tier,
            division: self.division,
            lp: self.lp,
        }
    }

    /// Rank label used in history entries, e.g. `Silver II 45 LP`.
    #[must_use]
    pub fn snapshot_label(&self) -> String {
        self.position().label()
    }

    /// Add an item to the armory. Returns `false` if already owned.
    pub fn unlock_item(&mut self, item: ItemId) -> bool {
        if self.unlocked_items.contains(&item) {
            return false;
        }
        self.unlocked_items.push(item);
        true
    }

    #[must_use]
    pub fn owns(&self, item: ItemId) -> bool {
        self.unlocked_items.contains(&item)
    }

    pub(crate) fn record_high_water_mark(&mut self) {
        let now = self.position();
        if now > self.highest_rank {
            self.highest_rank = now;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::BadgeId;

    #[test]
    fn initial_state_matches_new_player() {
        let state = RankState::initial();
        assert_eq!(state.snapshot_label(), "Iron IV 0 LP");
        assert!(state.owns(ItemId::IronDagger));
        assert!(state.owns(ItemId::BannerInitiate));
        assert_eq!(state.loadout.title_id, Some(ItemId::TitleRecruit));
        assert_eq!(state.season_id, CURRENT_SEASON_ID);
    }

    #[test]
    fn carry_over_survives_reset() {
        let mut state = RankState::initial();
        state.unlock_item(ItemId::GoldSaber);
        state.loadout.weapon_id = ItemId::GoldSaber;
        let date = CalendarDate::parse("2024-02-01").unwrap();
        state.unlocked_badges.unlock(BadgeId::RankIron, date);
        state.lp = 55;
        let restored = RankState::with_carry_over(&state.carry_over());
        assert_eq!(restored.lp, 0);
        assert_eq!(restored.loadout.weapon_id, ItemId::GoldSaber);
        assert!(restored.owns(ItemId::GoldSaber));
        assert!(restored.unlocked_badges.contains(BadgeId::RankIron));
    }

    #[test]
    fn season_window_is_inclusive() {
        let season = SeasonInfo::find(CURRENT_SEASON_ID).unwrap();
        assert!(season.contains(CalendarDate::parse("2024-01-01").unwrap()));
        assert!(season.contains(CalendarDate::parse("2026-06-30").unwrap()));
        assert!(!season.contains(CalendarDate::parse("2026-07-01").unwrap()));
        assert!(SeasonInfo::find("season_9").is_none());
    }

    #[test]
    fn series_outcomes() {
        let mut series = Series::new(2, 1);
        series.losses = 1;
        assert!(!series.is_lost());
        series.losses = 2;
        assert!(series.is_lost());
        series.wins = 2;
        assert!(series.is_won());
    }

    #[test]
    fn legacy_season_reads_camel_case() {
        let json = r#"{"seasonId":"season_0","finalTier":"Gold","finalDivision":"II","finalLP":40}"#;
        let legacy: LegacySeason = serde_json::from_str(json).unwrap();
        assert_eq!(legacy.final_tier, Tier::Gold);
        assert_eq!(legacy.final_lp, 40);
        assert!(legacy.bosses_defeated.is_empty());
    }
}
