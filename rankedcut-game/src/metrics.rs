//! Dashboard read-outs derived from the recomputed state.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::config::LadderConfig;
use crate::data::DailyLog;
use crate::league::LeagueState;
use crate::state::RankState;

/// Assumed average LP per logged day when projecting a promotion.
pub const AVG_LP_PER_DAY: i32 = 15;
const THREAT_WINDOW: i32 = 20;
const HIGH_THREAT_GAP: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Warning,
    Danger,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ThreatLevel {
    High,
    Med,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromotionTracker {
    pub lp_needed: i32,
    pub days_to_promote: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Threat {
    pub name: String,
    pub risk: ThreatLevel,
    pub gap: i32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub risk: RiskLevel,
    pub promotion_tracker: PromotionTracker,
    pub next_threat: Option<Threat>,
}

/// Streak risk from the gap between `today` and the newest ranked log.
#[must_use]
pub fn streak_risk(logs: &[DailyLog], today: CalendarDate) -> RiskLevel {
    let newest = logs
        .iter()
        .filter(|log| log.is_ranked())
        .filter_map(|log| log.calendar_date().ok())
        .max();
    match newest.map(|date| date.days_until(today).abs()) {
        None => RiskLevel::Warning,
        Some(gap) if gap > 2 => RiskLevel::Danger,
        Some(gap) if gap > 1 => RiskLevel::Warning,
        Some(_) => RiskLevel::Safe,
    }
}

#[must_use]
pub fn promotion_tracker(config: &LadderConfig, rank: &RankState) -> PromotionTracker {
    let lp_needed = (config.rule(rank.tier).promote_at - rank.lp).max(0);
    let days = (lp_needed + AVG_LP_PER_DAY - 1) / AVG_LP_PER_DAY;
    PromotionTracker {
        lp_needed,
        days_to_promote: (days > 0).then_some(days),
    }
}

/// The closest rival below the player, if within striking distance. Ties go to
/// the rival listed first in the roster.
#[must_use]
pub fn next_threat(league: &LeagueState, player_lp: i32) -> Option<Threat> {
    let (_, rival) = league
        .rivals
        .iter()
        .enumerate()
        .filter(|(_, rival)| rival.lp < player_lp)
        .max_by(|(ia, a), (ib, b)| a.lp.cmp(&b.lp).then_with(|| ib.cmp(ia)))?;
    let gap = player_lp - rival.lp;
    (gap < THREAT_WINDOW).then(|| Threat {
        name: rival.name.clone(),
        risk: if gap < HIGH_THREAT_GAP {
            ThreatLevel::High
        } else {
            ThreatLevel::Med
        },
        gap,
    })
}

#[must_use]
pub fn dashboard_metrics(
    config: &LadderConfig,
    logs: &[DailyLog],
    rank: &RankState,
    league: Option<&LeagueState>,
    today: CalendarDate,
) -> DashboardMetrics {
    DashboardMetrics {
        risk: streak_risk(logs, today),
        promotion_tracker: promotion_tracker(config, rank),
        next_threat: league.and_then(|league| next_threat(league, rank.lp)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::league::generate_league;
    use crate::tiers::{Division, Tier};

    fn day(text: &str) -> CalendarDate {
        CalendarDate::parse(text).unwrap()
    }

    #[test]
    fn risk_grows_with_days_since_last_ranked_log() {
        let today = day("2024-03-10");
        assert_eq!(streak_risk(&[], today), RiskLevel::Warning);
        let logs = vec![DailyLog::ranked("2024-03-09", 1800.0)];
        assert_eq!(streak_risk(&logs, today), RiskLevel::Safe);
        let logs = vec![DailyLog::ranked("2024-03-08", 1800.0)];
        assert_eq!(streak_risk(&logs, today), RiskLevel::Warning);
        let mut unranked = DailyLog::ranked("2024-03-10", 1800.0);
        unranked.is_ranked = Some(false);
        let logs = vec![DailyLog::ranked("2024-03-07", 1800.0), unranked];
        assert_eq!(streak_risk(&logs, today), RiskLevel::Danger);
    }

    #[test]
    fn promotion_tracker_rounds_days_up() {
        let cfg = LadderConfig::default();
        let mut rank = RankState::initial();
        rank.lp = 70;
        let tracker = promotion_tracker(&cfg, &rank);
        assert_eq!(tracker.lp_needed, 30);
        assert_eq!(tracker.days_to_promote, Some(2));
        rank.lp = 71;
        assert_eq!(promotion_tracker(&cfg, &rank).days_to_promote, Some(2));
        rank.lp = 100;
        assert_eq!(promotion_tracker(&cfg, &rank).days_to_promote, None);
    }

    #[test]
    fn threat_is_highest_rival_below_player() {
        let mut league = generate_league(Tier::Iron, Some(Division::IV), day("2024-01-01"), None);
        for (i, rival) in league.rivals.iter_mut().enumerate() {
            rival.lp = if i == 3 { 45 } else { 10 };
        }
        let threat = next_threat(&league, 50).unwrap();
        assert_eq!(threat.gap, 5);
        assert_eq!(threat.risk, ThreatLevel::High);
        assert_eq!(threat.name, league.rivals[3].name);
        assert_eq!(next_threat(&league, 60).map(|t| t.risk), Some(ThreatLevel::Med));
        assert!(next_threat(&league, 70).is_none());
        assert!(next_threat(&league, 5).is_none());
    }

    #[test]
    fn threat_ties_follow_roster_order() {
        let mut league = generate_league(Tier::Iron, Some(Division::IV), day("2024-01-01"), None);
        for (i, rival) in league.rivals.iter_mut().enumerate() {
            rival.lp = if i == 2 || i == 10 { 40 } else { 0 };
        }
        league.rivals[2].name = "Second".to_string();
        league.rivals[10].name = "Tenth".to_string();
        let threat = next_threat(&league, 50).unwrap();
        assert_eq!(threat.name, "Second");
        assert_eq!(threat.gap, 10);
    }
}
