//! One-off achievements and their progress.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::data::{DailyLog, QuestRewards};
use crate::league::LeagueState;
use crate::numbers::usize_to_u32;
use crate::state::RankState;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AchievementId {
    #[serde(rename = "ach_streak_7")]
    Streak7,
    #[serde(rename = "ach_streak_30")]
    Streak30,
    #[serde(rename = "ach_perfect_week")]
    PerfectWeek,
    #[serde(rename = "ach_cp_100")]
    Cp100,
    #[serde(rename = "ach_cp_500")]
    Cp500,
    #[serde(rename = "ach_ess_100")]
    Ess100,
    #[serde(rename = "ach_ess_500")]
    Ess500,
    #[serde(rename = "ach_top_10")]
    Top10,
    #[serde(rename = "ach_top_3")]
    Top3,
    #[serde(rename = "ach_top_1")]
    Top1,
    #[serde(rename = "ach_boss_1")]
    Boss1,
    #[serde(rename = "ach_boss_3")]
    Boss3,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AchievementCategory {
    Consistency,
    Progression,
    League,
    Boss,
}

/// What an achievement measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Measure {
    Streak,
    PerfectDays,
    Cp,
    Essence,
    Placement,
    AnyBoss,
    DistinctBosses,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AchievementDef {
    pub id: AchievementId,
    pub slug: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub category: AchievementCategory,
    pub target: u32,
    /// CP and essence credited when claimed; achievements never pay LP.
    pub reward: QuestRewards,
    measure: Measure,
}

const fn ach(
    id: AchievementId,
    slug: &'static str,
    name: &'static str,
    description: &'static str,
    category: AchievementCategory,
    target: u32,
    (cp, essence): (i64, i64),
    measure: Measure,
) -> AchievementDef {
    AchievementDef {
        id,
        slug,
        name,
        description,
        category,
        target,
        reward: QuestRewards { lp: 0, cp, essence },
        measure,
    }
}

use AchievementCategory as C;
use AchievementId as A;

pub static ACHIEVEMENTS: [AchievementDef; 12] = [
    ach(A::Streak7, "ach_streak_7", "7-Day Calories Streak", "Log calories for 7 days in a row.", C::Consistency, 7, (50, 10), Measure::Streak),
    ach(A::Streak30, "ach_streak_30", "30-Day Calories Streak", "Log calories for 30 days in a row.", C::Consistency, 30, (200, 50), Measure::Streak),
    ach(A::PerfectWeek, "ach_perfect_week", "Perfect Week", "Log Cal + Steps + Sleep for 7 days straight.", C::Consistency, 7, (100, 30), Measure::PerfectDays),
    ach(A::Cp100, "ach_cp_100", "Earn 100 CP", "Reach 100 total Consistency Points.", C::Progression, 100, (0, 20), Measure::Cp),
    ach(A::Cp500, "ach_cp_500", "Earn 500 CP", "Reach 500 total Consistency Points.", C::Progression, 500, (0, 50), Measure::Cp),
    ach(A::Ess100, "ach_ess_100", "Earn 100 Essence", "Accumulate 100 total Essence.", C::Progression, 100, (50, 0), Measure::Essence),
    ach(A::Ess500, "ach_ess_500", "Earn 500 Essence", "Accumulate 500 total Essence.", C::Progression, 500, (100, 0), Measure::Essence),
    ach(A::Top10, "ach_top_10", "Reach Top 10", "Finish a day in the Top 10 of your league.", C::League, 10, (30, 10), Measure::Placement),
    ach(A::Top3, "ach_top_3", "Reach Top 3", "Finish a day in the Top 3 of your league.", C::League, 3, (60, 20), Measure::Placement),
    ach(A::Top1, "ach_top_1", "League Champion", "Reach Rank 1 in your league.", C::League, 1, (100, 50), Measure::Placement),
    ach(A::Boss1, "ach_boss_1", "First Blood", "Defeat a monthly boss.", C::Boss, 1, (50, 50), Measure::AnyBoss),
    ach(A::Boss3, "ach_boss_3", "Boss Veteran", "Defeat 3 different bosses.", C::Boss, 3, (150, 100), Measure::DistinctBosses),
];

impl AchievementId {
    #[must_use]
    pub fn def(self) -> &'static AchievementDef {
        // ACHIEVEMENTS is declared in enum order.
        &ACHIEVEMENTS[self as usize]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.def().slug
    }
}

impl fmt::Display for AchievementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AchievementId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ACHIEVEMENTS
            .iter()
            .find(|def| def.slug == s)
            .map(|def| def.id)
            .ok_or(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AchievementProgress {
    /// Progress capped at the target.
    pub current: u32,
    pub target: u32,
    pub percent: u32,
    pub completed: bool,
    pub claimed: bool,
}

/// Consecutive logs, newest first, that carry calories, steps and sleep.
fn perfect_days(logs: &[DailyLog]) -> u32 {
    let mut sorted: Vec<&DailyLog> = logs.iter().collect();
    sorted.sort_by(|a, b| b.date.cmp(&a.date));
    let logged = |value: Option<f64>| value.is_some_and(|v| v != 0.0);
    let run = sorted
        .iter()
        .take_while(|log| logged(log.calories) && logged(log.steps) && logged(log.sleep_hours))
        .count();
    usize_to_u32(run)
}

fn balance(value: i64) -> u32 {
    u32::try_from(value.max(0)).unwrap_or(u32::MAX)
}

#[must_use]
pub fn calculate_achievement_progress(
    achievement: &AchievementDef,
    rank: &RankState,
    logs: &[DailyLog],
    league: Option<&LeagueState>,
    claimed_ids: &[String],
) -> AchievementProgress {
    let target = achievement.target;
    let raw = match achievement.measure {
        Measure::Streak => rank.streak,
        Measure::PerfectDays => perfect_days(logs),
        Measure::Cp => balance(rank.cp),
        Measure::Essence => balance(rank.essence),
        Measure::Placement => match league.and_then(LeagueState::best_placement) {
            Some(best) if best <= target => target,
            _ => 0,
        },
        Measure::AnyBoss => u32::from(rank.unlocked_badges.boss_kills() > 0),
        Measure::DistinctBosses => usize_to_u32(rank.unlocked_badges.boss_kills()),
    };

    let current = raw.min(target);
    let percent = if target == 0 {
        100
    } else {
        (u64::from(current) * 100 / u64::from(target)).min(100)
    };
    AchievementProgress {
        current,
        target,
        percent: u32::try_from(percent).unwrap_or(100),
        completed: raw >= target,
        claimed: claimed_ids.iter().any(|id| id == achievement.slug),
    }
}

/// Progress for the whole catalog, in catalog order.
#[must_use]
pub fn achievement_board(
    rank: &RankState,
    logs: &[DailyLog],
    league: Option<&LeagueState>,
    claimed_ids: &[String],
) -> Vec<(AchievementId, AchievementProgress)> {
    ACHIEVEMENTS
        .iter()
        .map(|def| {
            (
                def.id,
                calculate_achievement_progress(def, rank, logs, league, claimed_ids),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::badges::BadgeId;
    use crate::calendar::CalendarDate;
    use crate::league::{Placement, generate_league};
    use crate::tiers::{Division, Tier};

    fn day(text: &str) -> CalendarDate {
        CalendarDate::parse(text).unwrap()
    }

    #[test]
    fn catalog_lookup_round_trips() {
        for def in &ACHIEVEMENTS {
            assert_eq!(def.id.def().slug, def.slug);
            assert_eq!(def.slug.parse::<AchievementId>(), Ok(def.id));
        }
        assert!("ach_unknown".parse::<AchievementId>().is_err());
    }

    #[test]
    fn streak_progress_caps_visual_value() {
        let mut rank = RankState::initial();
        rank.streak = 12;
        let progress = calculate_achievement_progress(A::Streak7.def(), &rank, &[], None, &[]);
        assert_eq!(progress.current, 7);
        assert_eq!(progress.percent, 100);
        assert!(progress.completed);

        let thirty = calculate_achievement_progress(A::Streak30.def(), &rank, &[], None, &[]);
        assert_eq!(thirty.percent, 40);
        assert!(!thirty.completed);
    }

    #[test]
    fn perfect_week_counts_newest_first_until_gap() {
        let full = |date: &str| DailyLog {
            steps: Some(9000.0),
            sleep_hours: Some(8.0),
            ..DailyLog::ranked(date, 2000.0)
        };
        let logs = vec![
            full("2024-01-05"),
            DailyLog::ranked("2024-01-06", 2000.0),
            full("2024-01-08"),
            full("2024-01-07"),
        ];
        let progress =
            calculate_achievement_progress(A::PerfectWeek.def(), &RankState::initial(), &logs, None, &[]);
        assert_eq!(progress.current, 2);
    }

    #[test]
    fn placement_is_all_or_nothing() {
        let mut league = generate_league(Tier::Iron, Some(Division::IV), day("2024-01-01"), None);
        league.user_placement_history.push(Placement {
            date: day("2024-01-02"),
            rank: 5,
        });
        let rank = RankState::initial();
        let top10 = calculate_achievement_progress(A::Top10.def(), &rank, &[], Some(&league), &[]);
        assert_eq!(top10.current, 10);
        assert!(top10.completed);
        let top3 = calculate_achievement_progress(A::Top3.def(), &rank, &[], Some(&league), &[]);
        assert_eq!(top3.current, 0);
        assert_eq!(top3.percent, 0);
    }

    #[test]
    fn boss_achievements_count_distinct_slayer_badges() {
        let mut rank = RankState::initial();
        rank.unlocked_badges.unlock(BadgeId::BossFlame, day("2024-01-06"));
        rank.unlocked_badges.unlock(BadgeId::BossFrost, day("2024-02-03"));
        let claims = vec!["ach_boss_1".to_string()];
        let first = calculate_achievement_progress(A::Boss1.def(), &rank, &[], None, &claims);
        assert!(first.completed && first.claimed);
        let veteran = calculate_achievement_progress(A::Boss3.def(), &rank, &[], None, &claims);
        assert_eq!((veteran.current, veteran.percent), (2, 66));
        assert!(!veteran.claimed);
    }

    #[test]
    fn board_covers_catalog() {
        let board = achievement_board(&RankState::initial(), &[], None, &[]);
        assert_eq!(board.len(), ACHIEVEMENTS.len());
        assert!(board.iter().all(|(_, progress)| !progress.completed));
    }
}
