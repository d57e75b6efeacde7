//! Skill tree catalog and the resolved per-player skill levels.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::tiers::Tier;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillId {
    IronWill,
    Fortify,
    Recovery,
    Momentum,
    SteadyHands,
    TreasureHunter,
    EssenceMagnet,
    MilestoneBoost,
    BossPrep,
    RivalBreaker,
    LeagueScout,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillBranch {
    Consistency,
    Progression,
    BossLeague,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SkillDef {
    pub id: SkillId,
    pub branch: SkillBranch,
    pub label: &'static str,
    pub description: &'static str,
    pub max_level: u32,
    pub cost: i64,
    pub req_tier: Tier,
}

const fn def(
    id: SkillId,
    branch: SkillBranch,
    label: &'static str,
    description: &'static str,
    max_level: u32,
    cost: i64,
    req_tier: Tier,
) -> SkillDef {
    SkillDef {
        id,
        branch,
        label,
        description,
        max_level,
        cost,
        req_tier,
    }
}

pub static SKILLS: [SkillDef; 11] = [
    def(SkillId::IronWill, SkillBranch::Consistency, "Iron Will", "Reduces calorie-miss decay by 1 per level.", 3, 150, Tier::Iron),
    def(SkillId::Fortify, SkillBranch::Consistency, "Fortify", "+1 Max Weekly Shield charge.", 1, 300, Tier::Silver),
    def(SkillId::Recovery, SkillBranch::Consistency, "Recovery", "After a miss, next win gives +2 LP.", 2, 200, Tier::Gold),
    def(SkillId::Momentum, SkillBranch::Consistency, "Momentum", "+1 LP per level on wins once the streak reaches 3.", 3, 250, Tier::Silver),
    def(SkillId::SteadyHands, SkillBranch::Consistency, "Steady Hands", "Reduces miss decay by 1 per level.", 2, 250, Tier::Platinum),
    def(SkillId::TreasureHunter, SkillBranch::Progression, "Treasure Hunter", "+10% CP earned per level.", 2, 150, Tier::Bronze),
    def(SkillId::EssenceMagnet, SkillBranch::Progression, "Essence Magnet", "+10% Essence earned per level.", 2, 200, Tier::Gold),
    def(SkillId::MilestoneBoost, SkillBranch::Progression, "Milestone Boost", "Every 100 CP grants 1 shield.", 1, 400, Tier::Platinum),
    def(SkillId::BossPrep, SkillBranch::BossLeague, "Boss Prep", "+15% Boss rewards (CP/Essence).", 2, 200, Tier::Silver),
    def(SkillId::RivalBreaker, SkillBranch::BossLeague, "Rival Breaker", "Gain 5 Essence when passing a rival (max 1/day).", 1, 250, Tier::Gold),
    def(SkillId::LeagueScout, SkillBranch::BossLeague, "League Scout", "See rival movement predictions.", 1, 100, Tier::Bronze),
];

impl SkillId {
    #[must_use]
    pub fn def(self) -> &'static SkillDef {
        // SKILLS is declared in enum order.
        &SKILLS[self as usize]
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IronWill => "iron_will",
            Self::Fortify => "fortify",
            Self::Recovery => "recovery",
            Self::Momentum => "momentum",
            Self::SteadyHands => "steady_hands",
            Self::TreasureHunter => "treasure_hunter",
            Self::EssenceMagnet => "essence_magnet",
            Self::MilestoneBoost => "milestone_boost",
            Self::BossPrep => "boss_prep",
            Self::RivalBreaker => "rival_breaker",
            Self::LeagueScout => "league_scout",
        }
    }
}

impl fmt::Display for SkillId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SKILLS
            .iter()
            .map(|skill| skill.id)
            .find(|id| id.as_str() == s)
            .ok_or(())
    }
}

/// A purchased perk as it appears in the save data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPerk {
    pub id: String,
    #[serde(default)]
    pub level: u32,
}

/// Resolved skill levels, capped at each skill's maximum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skills {
    levels: BTreeMap<SkillId, u32>,
}

impl Skills {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve raw perks, skipping ids outside the catalog.
    #[must_use]
    pub fn from_perks(perks: &[SkillPerk]) -> Self {
        let mut skills = Self::new();
        for perk in perks {
            match perk.id.parse::<SkillId>() {
                Ok(id) => skills.set(id, perk.level),
                Err(()) => log::warn!("ignoring unknown skill id `{}`", perk.id),
            }
        }
        skills
    }

    /// Set a level, clamped to the skill's maximum. Zero removes the skill.
    pub fn set(&mut self, id: SkillId, level: u32) {
        let level = level.min(id.def().max_level);
        if level == 0 {
            self.levels.remove(&id);
        } else {
            self.levels.insert(id, level);
        }
    }

    #[must_use]
    pub fn with(mut self, id: SkillId, level: u32) -> Self {
        self.set(id, level);
        self
    }

    #[must_use]
    pub fn level(&self, id: SkillId) -> u32 {
        self.levels.get(&id).copied().unwrap_or(0)
    }

    #[must_use]
    pub fn has(&self, id: SkillId) -> bool {
        self.level(id) > 0
    }

    #[must_use]
    pub fn to_perks(&self) -> Vec<SkillPerk> {
        self.levels
            .iter()
            .map(|(id, level)| SkillPerk {
                id: id.as_str().to_string(),
                level: *level,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_is_in_enum_order() {
        for (index, skill) in SKILLS.iter().enumerate() {
            assert_eq!(skill.id as usize, index, "{} out of order", skill.label);
            assert_eq!(skill.id.as_str().parse::<SkillId>(), Ok(skill.id));
        }
    }

    #[test]
    fn unknown_perks_are_skipped_and_levels_capped() {
        let perks = vec![
            SkillPerk {
                id: "iron_will".into(),
                level: 9,
            },
            SkillPerk {
                id: "shield_battery".into(),
                level: 1,
            },
            SkillPerk {
                id: "treasure_hunter".into(),
                level: 1,
            },
        ];
        let skills = Skills::from_perks(&perks);
        assert_eq!(skills.level(SkillId::IronWill), 3);
        assert_eq!(skills.level(SkillId::TreasureHunter), 1);
        assert!(!skills.has(SkillId::Fortify));
        assert_eq!(skills.to_perks().len(), 2);
    }
}
