//! Ladder tiers, divisions, and rank positions.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// The ten ladder tiers, lowest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
pub enum Tier {
    #[default]
    Iron,
    Bronze,
    Silver,
    Gold,
    Platinum,
    Emerald,
    Diamond,
    Master,
    Grandmaster,
    Challenger,
}

impl Tier {
    pub const ALL: [Self; 10] = [
        Self::Iron,
        Self::Bronze,
        Self::Silver,
        Self::Gold,
        Self::Platinum,
        Self::Emerald,
        Self::Diamond,
        Self::Master,
        Self::Grandmaster,
        Self::Challenger,
    ];

    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub fn next(self) -> Option<Self> {
        Self::ALL.get(self.index() + 1).copied()
    }

    #[must_use]
    pub fn prev(self) -> Option<Self> {
        self.index().checked_sub(1).and_then(|i| Self::ALL.get(i).copied())
    }

    /// Tiers whose streak bonus is halved.
    #[must_use]
    pub const fn is_apex(self) -> bool {
        matches!(
            self,
            Self::Diamond | Self::Master | Self::Grandmaster | Self::Challenger
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Iron => "Iron",
            Self::Bronze => "Bronze",
            Self::Silver => "Silver",
            Self::Gold => "Gold",
            Self::Platinum => "Platinum",
            Self::Emerald => "Emerald",
            Self::Diamond => "Diamond",
            Self::Master => "Master",
            Self::Grandmaster => "Grandmaster",
            Self::Challenger => "Challenger",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|tier| tier.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or(())
    }
}

/// Division within a tier; `IV` is the entry division and `I` the top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Division {
    IV,
    III,
    II,
    I,
}

impl Division {
    pub const BOTTOM: Self = Self::IV;
    pub const TOP: Self = Self::I;

    #[must_use]
    pub const fn up(self) -> Option<Self> {
        match self {
            Self::IV => Some(Self::III),
            Self::III => Some(Self::II),
            Self::II => Some(Self::I),
            Self::I => None,
        }
    }

    #[must_use]
    pub const fn down(self) -> Option<Self> {
        match self {
            Self::IV => None,
            Self::III => Some(Self::IV),
            Self::II => Some(Self::III),
            Self::I => Some(Self::II),
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::IV => "IV",
            Self::III => "III",
            Self::II => "II",
            Self::I => "I",
        }
    }
}

impl fmt::Display for Division {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Comparable snapshot of where a player sits on the ladder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankPosition {
    pub tier: Tier,
    pub division: Option<Division>,
    pub lp: i32,
}

impl RankPosition {
    #[must_use]
    pub const fn floor() -> Self {
        Self {
            tier: Tier::Iron,
            division: Some(Division::IV),
            lp: 0,
        }
    }

    /// Human-readable label such as `Gold II 40 LP` or `Master 120 LP`.
    #[must_use]
    pub fn label(&self) -> String {
        match self.division {
            Some(division) => format!("{} {} {} LP", self.tier, division, self.lp),
            None => format!("{} {} LP", self.tier, self.lp),
        }
    }
}

impl Default for RankPosition {
    fn default() -> Self {
        Self::floor()
    }
}

impl PartialOrd for RankPosition {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RankPosition {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tier
            .cmp(&other.tier)
            .then(self.division.cmp(&other.division))
            .then(self.lp.cmp(&other.lp))
    }
}

impl fmt::Display for RankPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}
