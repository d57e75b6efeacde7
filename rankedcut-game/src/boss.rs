//! Monthly boss encounters.
//!
//! A boss appears on the first Saturday of every month. The encounter is won
//! by submitting a ranked log that day; a boss day that passes without one is
//! latched as failed.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::badges::BadgeId;
use crate::calendar::CalendarDate;
use crate::data::QuestRewards;

/// Claim id prefix for boss reward claims, followed by the month key.
pub const BOSS_CLAIM_PREFIX: &str = "BOSS_CLAIM_";

/// Rewards paid when a defeated boss is claimed, before Boss Prep scaling.
pub const BOSS_REWARDS: QuestRewards = QuestRewards {
    lp: 0,
    cp: 100,
    essence: 200,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BossKind {
    #[default]
    FlameTyrant,
    FrostWarden,
    VoidHerald,
    StormColossus,
    IronBehemoth,
    PlagueMonarch,
    DuneLeviathan,
    AstralSeraph,
}

impl BossKind {
    pub const ALL: [Self; 8] = [
        Self::FlameTyrant,
        Self::FrostWarden,
        Self::VoidHerald,
        Self::StormColossus,
        Self::IronBehemoth,
        Self::PlagueMonarch,
        Self::DuneLeviathan,
        Self::AstralSeraph,
    ];

    /// Rotation: `(zero-based month + year) mod 8`.
    #[must_use]
    pub fn for_date(date: CalendarDate) -> Self {
        let month = i64::from(date.month0());
        let year = i64::from(date.year());
        let slot = usize::try_from((month + year).rem_euclid(8)).unwrap_or(0);
        Self::ALL[slot]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FlameTyrant => "flame_tyrant",
            Self::FrostWarden => "frost_warden",
            Self::VoidHerald => "void_herald",
            Self::StormColossus => "storm_colossus",
            Self::IronBehemoth => "iron_behemoth",
            Self::PlagueMonarch => "plague_monarch",
            Self::DuneLeviathan => "dune_leviathan",
            Self::AstralSeraph => "astral_seraph",
        }
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::FlameTyrant => "Flame Tyrant",
            Self::FrostWarden => "Frost Warden",
            Self::VoidHerald => "Void Herald",
            Self::StormColossus => "Storm Colossus",
            Self::IronBehemoth => "Iron Behemoth",
            Self::PlagueMonarch => "Plague Monarch",
            Self::DuneLeviathan => "Dune Leviathan",
            Self::AstralSeraph => "Astral Seraph",
        }
    }

    /// Slayer badge granted on the first win against this boss.
    #[must_use]
    pub const fn badge(self) -> BadgeId {
        match self {
            Self::FlameTyrant => BadgeId::BossFlame,
            Self::FrostWarden => BadgeId::BossFrost,
            Self::VoidHerald => BadgeId::BossVoid,
            Self::StormColossus => BadgeId::BossStorm,
            Self::IronBehemoth => BadgeId::BossIron,
            Self::PlagueMonarch => BadgeId::BossPlague,
            Self::DuneLeviathan => BadgeId::BossDune,
            Self::AstralSeraph => BadgeId::BossAstral,
        }
    }
}

impl fmt::Display for BossKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for BossKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == s).ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossStatus {
    #[default]
    Upcoming,
    Active,
    Completed,
    Defeated,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BossResult {
    Win,
    Loss,
}

/// The current month's encounter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BossState {
    #[serde(default)]
    pub month_key: String,
    #[serde(rename = "type", default)]
    pub kind: BossKind,
    #[serde(default)]
    pub status: BossStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<BossResult>,
    #[serde(default)]
    pub rewards_claimed: bool,
}

/// What happened on a boss day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BossDay {
    /// Ranked log submitted; carries the badge earned.
    Won(BossKind),
    /// The day elapsed without a ranked log.
    Lost,
    /// Still today and nothing logged yet.
    Pending,
}

impl BossState {
    /// Advance the encounter for a first-Saturday `date`.
    ///
    /// `ranked_win` is whether a ranked log exists for the day and `elapsed`
    /// whether the day lies strictly before today.
    pub fn engage(&mut self, date: CalendarDate, ranked_win: bool, elapsed: bool) -> BossDay {
        let month_key = date.month_key();
        if self.month_key != month_key {
            self.rewards_claimed = false;
            self.result = None;
        }
        self.month_key = month_key;
        self.kind = BossKind::for_date(date);
        self.status = BossStatus::Active;
        if ranked_win {
            self.status = BossStatus::Completed;
            self.result = Some(BossResult::Win);
            BossDay::Won(self.kind)
        } else if elapsed {
            self.status = BossStatus::Failed;
            self.result = Some(BossResult::Loss);
            BossDay::Lost
        } else {
            BossDay::Pending
        }
    }

    /// Claim id for this month's reward chest.
    #[must_use]
    pub fn claim_id(&self) -> String {
        format!("{BOSS_CLAIM_PREFIX}{}", self.month_key)
    }

    #[must_use]
    pub fn is_defeated_in(&self, month_key: &str) -> bool {
        self.month_key == month_key
            && matches!(self.status, BossStatus::Completed | BossStatus::Defeated)
    }
}
