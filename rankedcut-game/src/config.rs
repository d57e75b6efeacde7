//! Ladder tuning: tier table, promotion gates, currency and shield rules.
//!
//! Every field has a serde default so a partial JSON override only needs the
//! values it changes.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::tiers::Tier;

/// Per-tier LP economy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TierRule {
    pub tier: Tier,
    pub base_win: i32,
    pub base_loss: i32,
    pub promote_at: i32,
    pub has_divisions: bool,
    /// Ranked days required before entering this tier.
    #[serde(default)]
    pub min_days: u32,
}

impl TierRule {
    const fn new(
        tier: Tier,
        base_win: i32,
        base_loss: i32,
        promote_at: i32,
        has_divisions: bool,
        min_days: u32,
    ) -> Self {
        Self {
            tier,
            base_win,
            base_loss,
            promote_at,
            has_divisions,
            min_days,
        }
    }
}

/// Best-of-N gate guarding the promotion out of `from`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeriesGate {
    pub from: Tier,
    pub target_wins: u32,
    /// Losses tolerated; one more aborts the series.
    pub loss_allowance: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrencyConfig {
    #[serde(default = "CurrencyConfig::default_base_cp")]
    pub base_cp: i64,
    #[serde(default = "CurrencyConfig::default_goal_cp")]
    pub goal_cp: i64,
    #[serde(default = "CurrencyConfig::default_weight_cp")]
    pub weight_cp: i64,
    #[serde(default = "CurrencyConfig::default_base_essence")]
    pub base_essence: i64,
    /// Multiplier step per level of the currency skills.
    #[serde(default = "CurrencyConfig::default_skill_step")]
    pub skill_step: f64,
}

impl CurrencyConfig {
    const fn default_base_cp() -> i64 {
        10
    }

    const fn default_goal_cp() -> i64 {
        3
    }

    const fn default_weight_cp() -> i64 {
        2
    }

    const fn default_base_essence() -> i64 {
        5
    }

    const fn default_skill_step() -> f64 {
        0.1
    }
}

impl Default for CurrencyConfig {
    fn default() -> Self {
        Self {
            base_cp: Self::default_base_cp(),
            goal_cp: Self::default_goal_cp(),
            weight_cp: Self::default_weight_cp(),
            base_essence: Self::default_base_essence(),
            skill_step: Self::default_skill_step(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShieldConfig {
    /// Cap applied to shields earned from CP milestones without Milestone Boost.
    #[serde(default = "ShieldConfig::default_cap")]
    pub cap: u32,
    #[serde(default = "ShieldConfig::default_milestone_cp")]
    pub milestone_cp: i64,
    /// Milestone used when Milestone Boost is owned; uncapped.
    #[serde(default = "ShieldConfig::default_boosted_milestone_cp")]
    pub boosted_milestone_cp: i64,
    /// Shields that may be spent per ISO week; `None` means unlimited.
    #[serde(default)]
    pub weekly_cap: Option<u32>,
}

impl ShieldConfig {
    const fn default_cap() -> u32 {
        3
    }

    const fn default_milestone_cp() -> i64 {
        300
    }

    const fn default_boosted_milestone_cp() -> i64 {
        100
    }
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            cap: Self::default_cap(),
            milestone_cp: Self::default_milestone_cp(),
            boosted_milestone_cp: Self::default_boosted_milestone_cp(),
            weekly_cap: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakBonusConfig {
    #[serde(default = "StreakBonusConfig::default_short_days")]
    pub short_days: u32,
    #[serde(default = "StreakBonusConfig::default_short_bonus")]
    pub short_bonus: i32,
    #[serde(default = "StreakBonusConfig::default_long_days")]
    pub long_days: u32,
    #[serde(default = "StreakBonusConfig::default_long_bonus")]
    pub long_bonus: i32,
    /// Streak length at which Momentum starts adding LP.
    #[serde(default = "StreakBonusConfig::default_momentum_days")]
    pub momentum_days: u32,
}

impl StreakBonusConfig {
    const fn default_short_days() -> u32 {
        7
    }

    const fn default_short_bonus() -> i32 {
        2
    }

    const fn default_long_days() -> u32 {
        30
    }

    const fn default_long_bonus() -> i32 {
        3
    }

    const fn default_momentum_days() -> u32 {
        3
    }

    /// Bonus for a streak of `streak` days before apex halving.
    #[must_use]
    pub const fn bonus_for(&self, streak: u32) -> i32 {
        if streak >= self.long_days {
            self.long_bonus
        } else if streak >= self.short_days {
            self.short_bonus
        } else {
            0
        }
    }
}

impl Default for StreakBonusConfig {
    fn default() -> Self {
        Self {
            short_days: Self::default_short_days(),
            short_bonus: Self::default_short_bonus(),
            long_days: Self::default_long_days(),
            long_bonus: Self::default_long_bonus(),
            momentum_days: Self::default_momentum_days(),
        }
    }
}

/// Complete ladder policy consumed by the day processor and league.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LadderConfig {
    #[serde(default = "LadderConfig::default_tiers")]
    pub tiers: [TierRule; 10],
    #[serde(default = "LadderConfig::default_series")]
    pub series: Vec<SeriesGate>,
    #[serde(default = "LadderConfig::default_demotion_lp")]
    pub demotion_lp: i32,
    /// LP left below the threshold when a series is lost.
    #[serde(default = "LadderConfig::default_series_abort_offset")]
    pub series_abort_offset: i32,
    #[serde(default)]
    pub streak: StreakBonusConfig,
    #[serde(default)]
    pub currency: CurrencyConfig,
    #[serde(default)]
    pub shields: ShieldConfig,
}

impl LadderConfig {
    fn default_tiers() -> [TierRule; 10] {
        [
            TierRule::new(Tier::Iron, 20, -10, 100, true, 0),
            TierRule::new(Tier::Bronze, 19, -12, 110, true, 0),
            TierRule::new(Tier::Silver, 18, -14, 120, true, 0),
            TierRule::new(Tier::Gold, 16, -17, 140, true, 0),
            TierRule::new(Tier::Platinum, 14, -19, 160, true, 0),
            TierRule::new(Tier::Emerald, 13, -21, 180, true, 0),
            TierRule::new(Tier::Diamond, 12, -23, 200, true, 0),
            TierRule::new(Tier::Master, 11, -26, 500, false, 21),
            TierRule::new(Tier::Grandmaster, 10, -28, 700, false, 45),
            TierRule::new(Tier::Challenger, 9, -30, 1000, false, 70),
        ]
    }

    fn default_series() -> Vec<SeriesGate> {
        vec![
            SeriesGate {
                from: Tier::Diamond,
                target_wins: 2,
                loss_allowance: 1,
            },
            SeriesGate {
                from: Tier::Grandmaster,
                target_wins: 3,
                loss_allowance: 2,
            },
        ]
    }

    const fn default_demotion_lp() -> i32 {
        75
    }

    const fn default_series_abort_offset() -> i32 {
        25
    }

    #[must_use]
    pub const fn rule(&self, tier: Tier) -> &TierRule {
        &self.tiers[tier.index()]
    }

    #[must_use]
    pub fn series_gate(&self, from: Tier) -> Option<&SeriesGate> {
        self.series.iter().find(|gate| gate.from == from)
    }

    /// Parse a JSON override and validate it.
    ///
    /// # Errors
    ///
    /// Returns an error when the JSON is malformed or violates an invariant.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let cfg: Self = serde_json::from_str(json).map_err(|e| ConfigError::Parse(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Check structural invariants of the policy.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (index, rule) in self.tiers.iter().enumerate() {
            if rule.tier.index() != index {
                return Err(ConfigError::TierOrder {
                    index,
                    found: rule.tier,
                });
            }
            if rule.promote_at <= 0 {
                return Err(ConfigError::Threshold { tier: rule.tier });
            }
            if rule.base_win <= 0 || rule.base_loss > 0 {
                return Err(ConfigError::LpEconomy {
                    tier: rule.tier,
                    win: rule.base_win,
                    loss: rule.base_loss,
                });
            }
        }
        for gate in &self.series {
            if gate.target_wins == 0 || gate.from.next().is_none() {
                return Err(ConfigError::SeriesGate { from: gate.from });
            }
        }
        if self.demotion_lp < 0 || self.series_abort_offset < 0 {
            return Err(ConfigError::NegativeOffset);
        }
        if self.shields.milestone_cp <= 0 || self.shields.boosted_milestone_cp <= 0 {
            return Err(ConfigError::ShieldMilestone);
        }
        Ok(())
    }
}

impl Default for LadderConfig {
    fn default() -> Self {
        Self {
            tiers: Self::default_tiers(),
            series: Self::default_series(),
            demotion_lp: Self::default_demotion_lp(),
            series_abort_offset: Self::default_series_abort_offset(),
            streak: StreakBonusConfig::default(),
            currency: CurrencyConfig::default(),
            shields: ShieldConfig::default(),
        }
    }
}

/// Errors raised when ladder configuration invariants are violated.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("ladder config is not valid JSON: {0}")]
    Parse(String),
    #[error("tier table slot {index} holds {found}; tiers must be listed lowest first")]
    TierOrder { index: usize, found: Tier },
    #[error("{tier} promotion threshold must be positive")]
    Threshold { tier: Tier },
    #[error("{tier} must gain LP on wins and lose LP on misses (win {win}, loss {loss})")]
    LpEconomy { tier: Tier, win: i32, loss: i32 },
    #[error("series gate from {from} needs a next tier and at least one win")]
    SeriesGate { from: Tier },
    #[error("demotion LP and series abort offset must not be negative")]
    NegativeOffset,
    #[error("shield milestones must be positive")]
    ShieldMilestone,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = LadderConfig::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.rule(Tier::Iron).promote_at, 100);
        assert_eq!(cfg.rule(Tier::Challenger).min_days, 70);
        assert_eq!(cfg.series_gate(Tier::Diamond).map(|g| g.target_wins), Some(2));
        assert!(cfg.series_gate(Tier::Master).is_none());
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = LadderConfig::from_json(r#"{ "demotion_lp": 50 }"#).unwrap();
        assert_eq!(cfg.demotion_lp, 50);
        assert_eq!(cfg.series_abort_offset, 25);
        assert_eq!(cfg.currency.base_cp, 10);
        assert_eq!(cfg.shields.weekly_cap, None);
    }

    #[test]
    fn rejects_bad_series_gate() {
        let mut cfg = LadderConfig::default();
        cfg.series.push(SeriesGate {
            from: Tier::Challenger,
            target_wins: 2,
            loss_allowance: 1,
        });
        assert_eq!(
            cfg.validate(),
            Err(ConfigError::SeriesGate {
                from: Tier::Challenger
            })
        );
    }

    #[test]
    fn rejects_out_of_order_tiers() {
        let mut cfg = LadderConfig::default();
        cfg.tiers.swap(0, 1);
        assert!(matches!(
            cfg.validate(),
            Err(ConfigError::TierOrder { index: 0, .. })
        ));
    }

    #[test]
    fn rejects_incomplete_tier_table() {
        let err = LadderConfig::from_json(r#"{ "tiers": [] }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn rejects_positive_loss() {
        let mut cfg = LadderConfig::default();
        cfg.tiers[3].base_loss = 4;
        assert!(matches!(cfg.validate(), Err(ConfigError::LpEconomy { .. })));
        assert!(LadderConfig::from_json("{").is_err());
    }

    #[test]
    fn streak_bonus_thresholds() {
        let streak = StreakBonusConfig::default();
        assert_eq!(streak.bonus_for(6), 0);
        assert_eq!(streak.bonus_for(7), 2);
        assert_eq!(streak.bonus_for(30), 3);
    }
}
