//! Badge catalog and unlock rules.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;
use std::str::FromStr;

use crate::calendar::{CalendarDate, ClockTime};
use crate::tiers::Tier;

/// Distinct boss badges needed for the collector badge.
pub const COLLECTOR_THRESHOLD: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum BadgeId {
    #[serde(rename = "badge_boss_flame")]
    BossFlame,
    #[serde(rename = "badge_boss_frost")]
    BossFrost,
    #[serde(rename = "badge_boss_void")]
    BossVoid,
    #[serde(rename = "badge_boss_storm")]
    BossStorm,
    #[serde(rename = "badge_boss_iron")]
    BossIron,
    #[serde(rename = "badge_boss_plague")]
    BossPlague,
    #[serde(rename = "badge_boss_dune")]
    BossDune,
    #[serde(rename = "badge_boss_astral")]
    BossAstral,
    #[serde(rename = "badge_boss_collector")]
    BossCollector,
    #[serde(rename = "badge_rank_iron")]
    RankIron,
    #[serde(rename = "badge_rank_bronze")]
    RankBronze,
    #[serde(rename = "badge_rank_silver")]
    RankSilver,
    #[serde(rename = "badge_rank_gold")]
    RankGold,
    #[serde(rename = "badge_rank_platinum")]
    RankPlatinum,
    #[serde(rename = "badge_rank_emerald")]
    RankEmerald,
    #[serde(rename = "badge_rank_diamond")]
    RankDiamond,
    #[serde(rename = "badge_rank_master")]
    RankMaster,
    #[serde(rename = "badge_rank_grandmaster")]
    RankGrandmaster,
    #[serde(rename = "badge_rank_challenger")]
    RankChallenger,
    #[serde(rename = "badge_streak_7")]
    Streak7,
    #[serde(rename = "badge_streak_30")]
    Streak30,
    #[serde(rename = "badge_night_watch")]
    NightWatch,
    #[serde(rename = "badge_early_bird")]
    EarlyBird,
    #[serde(rename = "badge_cp_100")]
    Cp100,
    #[serde(rename = "badge_cp_500")]
    Cp500,
    #[serde(rename = "badge_cp_1000")]
    Cp1000,
    #[serde(rename = "badge_ess_100")]
    Ess100,
    #[serde(rename = "badge_ess_500")]
    Ess500,
    #[serde(rename = "badge_season_1")]
    Season1,
    #[serde(rename = "badge_season_champion")]
    SeasonChampion,
    #[serde(rename = "badge_clutch_log")]
    ClutchLog,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeCategory {
    Boss,
    Rank,
    Consistency,
    Milestone,
    Seasonal,
    Secret,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeRarity {
    Common,
    Rare,
    Epic,
    Legendary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeDef {
    pub id: BadgeId,
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: BadgeCategory,
    pub rarity: BadgeRarity,
}

const fn badge(
    id: BadgeId,
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    category: BadgeCategory,
    rarity: BadgeRarity,
) -> BadgeDef {
    BadgeDef {
        id,
        slug,
        name,
        description,
        category,
        rarity,
    }
}

use BadgeCategory as C;
use BadgeRarity as R;

pub static BADGES: [BadgeDef; 31] = [
    badge(BadgeId::BossFlame, "badge_boss_flame", "Flame Tyrant Slayer", "Defeated the Flame Tyrant.", C::Boss, R::Rare),
    badge(BadgeId::BossFrost, "badge_boss_frost", "Frost Warden Slayer", "Defeated the Frost Warden.", C::Boss, R::Rare),
    badge(BadgeId::BossVoid, "badge_boss_void", "Void Herald Slayer", "Defeated the Void Herald.", C::Boss, R::Rare),
    badge(BadgeId::BossStorm, "badge_boss_storm", "Storm Colossus Slayer", "Defeated the Storm Colossus.", C::Boss, R::Rare),
    badge(BadgeId::BossIron, "badge_boss_iron", "Iron Behemoth Slayer", "Defeated the Iron Behemoth.", C::Boss, R::Rare),
    badge(BadgeId::BossPlague, "badge_boss_plague", "Plague Monarch Slayer", "Defeated the Plague Monarch.", C::Boss, R::Rare),
    badge(BadgeId::BossDune, "badge_boss_dune", "Dune Leviathan Slayer", "Defeated the Dune Leviathan.", C::Boss, R::Rare),
    badge(BadgeId::BossAstral, "badge_boss_astral", "Astral Seraph Slayer", "Defeated the Astral Seraph.", C::Boss, R::Rare),
    badge(BadgeId::BossCollector, "badge_boss_collector", "Boss Collector", "Defeated 4 different boss types.", C::Boss, R::Epic),
    badge(BadgeId::RankIron, "badge_rank_iron", "Ironbound", "Reached Iron Tier.", C::Rank, R::Common),
    badge(BadgeId::RankBronze, "badge_rank_bronze", "Bronze Rising", "Reached Bronze Tier.", C::Rank, R::Common),
    badge(BadgeId::RankSilver, "badge_rank_silver", "Silver Lining", "Reached Silver Tier.", C::Rank, R::Common),
    badge(BadgeId::RankGold, "badge_rank_gold", "Golden Era", "Reached Gold Tier.", C::Rank, R::Rare),
    badge(BadgeId::RankPlatinum, "badge_rank_platinum", "Platinum Oath", "Reached Platinum Tier.", C::Rank, R::Rare),
    badge(BadgeId::RankEmerald, "badge_rank_emerald", "Emerald Rite", "Reached Emerald Tier.", C::Rank, R::Epic),
    badge(BadgeId::RankDiamond, "badge_rank_diamond", "Diamond Edge", "Reached Diamond Tier.", C::Rank, R::Epic),
    badge(BadgeId::RankMaster, "badge_rank_master", "Master's Mark", "Reached Master Tier.", C::Rank, R::Legendary),
    badge(BadgeId::RankGrandmaster, "badge_rank_grandmaster", "Grandmaster Seal", "Reached Grandmaster Tier.", C::Rank, R::Legendary),
    badge(BadgeId::RankChallenger, "badge_rank_challenger", "Challenger's Crown", "Reached Challenger Tier.", C::Rank, R::Legendary),
    badge(BadgeId::Streak7, "badge_streak_7", "Week of Iron", "Achieved a 7-day streak.", C::Consistency, R::Common),
    badge(BadgeId::Streak30, "badge_streak_30", "Month of Steel", "Achieved a 30-day streak.", C::Consistency, R::Epic),
    badge(BadgeId::NightWatch, "badge_night_watch", "Night Watch", "Logged after 10:30 PM.", C::Consistency, R::Rare),
    badge(BadgeId::EarlyBird, "badge_early_bird", "Early Bird", "Logged before 8:00 AM.", C::Consistency, R::Rare),
    badge(BadgeId::Cp100, "badge_cp_100", "CP Novice", "Earned 100 Consistency Points.", C::Milestone, R::Common),
    badge(BadgeId::Cp500, "badge_cp_500", "CP Adept", "Earned 500 Consistency Points.", C::Milestone, R::Rare),
    badge(BadgeId::Cp1000, "badge_cp_1000", "CP Master", "Earned 1000 Consistency Points.", C::Milestone, R::Epic),
    badge(BadgeId::Ess100, "badge_ess_100", "Essence Seeker", "Earned 100 Essence.", C::Milestone, R::Common),
    badge(BadgeId::Ess500, "badge_ess_500", "Essence Hoarder", "Earned 500 Essence.", C::Milestone, R::Rare),
    badge(BadgeId::Season1, "badge_season_1", "Awakened", "Participated in Season 1.", C::Seasonal, R::Common),
    badge(BadgeId::SeasonChampion, "badge_season_champion", "Season Champion", "Finish Top 3 in League.", C::Seasonal, R::Legendary),
    badge(BadgeId::ClutchLog, "badge_clutch_log", "Clutch Log", "Log within 5 mins of midnight.", C::Secret, R::Rare),
];

const RANK_BADGES: [BadgeId; 10] = [
    BadgeId::RankIron,
    BadgeId::RankBronze,
    BadgeId::RankSilver,
    BadgeId::RankGold,
    BadgeId::RankPlatinum,
    BadgeId::RankEmerald,
    BadgeId::RankDiamond,
    BadgeId::RankMaster,
    BadgeId::RankGrandmaster,
    BadgeId::RankChallenger,
];

impl BadgeId {
    #[must_use]
    pub fn def(self) -> &'static BadgeDef {
        // BADGES is declared in enum order.
        &BADGES[self as usize]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.def().slug
    }

    #[must_use]
    pub fn is_boss_slayer(self) -> bool {
        self.def().category == BadgeCategory::Boss && self != Self::BossCollector
    }
}

impl fmt::Display for BadgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BadgeId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        BADGES.iter().find(|def| def.slug == s).map(|def| def.id).ok_or(())
    }
}

/// A badge on the player's shelf with the day it was earned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnlockedBadge {
    pub id: BadgeId,
    pub date: CalendarDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Unlocked badges in award order; each id appears at most once.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BadgeShelf(Vec<UnlockedBadge>);

impl BadgeShelf {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Award `id` on `date`. Returns `false` when it was already held.
    pub fn unlock(&mut self, id: BadgeId, date: CalendarDate) -> bool {
        if self.contains(id) {
            return false;
        }
        log::debug!("badge {id} unlocked on {date}");
        self.0.push(UnlockedBadge {
            id,
            date,
            details: None,
        });
        true
    }

    #[must_use]
    pub fn contains(&self, id: BadgeId) -> bool {
        self.0.iter().any(|badge| badge.id == id)
    }

    #[must_use]
    pub fn get(&self, id: BadgeId) -> Option<&UnlockedBadge> {
        self.0.iter().find(|badge| badge.id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &UnlockedBadge> {
        self.0.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of distinct boss slayer badges held.
    #[must_use]
    pub fn boss_kills(&self) -> usize {
        self.0.iter().filter(|badge| badge.id.is_boss_slayer()).count()
    }
}

impl FromIterator<UnlockedBadge> for BadgeShelf {
    fn from_iter<I: IntoIterator<Item = UnlockedBadge>>(iter: I) -> Self {
        let mut shelf = Self::new();
        for badge in iter {
            if !shelf.contains(badge.id) {
                shelf.0.push(badge);
            }
        }
        shelf
    }
}

/// Snapshot of the counters the threshold badges look at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BadgeProgress {
    pub tier: Tier,
    pub streak: u32,
    pub cp: i64,
    pub essence: i64,
}

/// Badges earned by having reached the given tier, streak and balances.
#[must_use]
pub fn threshold_badges(progress: BadgeProgress) -> SmallVec<[BadgeId; 16]> {
    let mut earned: SmallVec<[BadgeId; 16]> = RANK_BADGES[..=progress.tier.index()]
        .iter()
        .copied()
        .collect();
    let checks = [
        (progress.streak >= 7, BadgeId::Streak7),
        (progress.streak >= 30, BadgeId::Streak30),
        (progress.cp >= 100, BadgeId::Cp100),
        (progress.cp >= 500, BadgeId::Cp500),
        (progress.cp >= 1000, BadgeId::Cp1000),
        (progress.essence >= 100, BadgeId::Ess100),
        (progress.essence >= 500, BadgeId::Ess500),
    ];
    earned.extend(checks.into_iter().filter(|(hit, _)| *hit).map(|(_, id)| id));
    earned
}

/// Time-of-day badges for a ranked submission at `time`.
#[must_use]
pub fn time_badges(time: ClockTime) -> SmallVec<[BadgeId; 3]> {
    let mut earned = SmallVec::new();
    if time.hour < 8 {
        earned.push(BadgeId::EarlyBird);
    }
    if time.hour > 22 || (time.hour == 22 && time.minute >= 30) {
        earned.push(BadgeId::NightWatch);
    }
    if time.hour == 23 && time.minute >= 55 {
        earned.push(BadgeId::ClutchLog);
    }
    earned
}
