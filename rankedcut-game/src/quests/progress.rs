//! Quest progress against the log history.
use serde::{Deserialize, Serialize};

use super::{ActiveQuests, Cadence, QuestInstance, QuestType, TargetType};
use crate::calendar::CalendarDate;
use crate::data::{DailyLog, QuestClaim};
use crate::numbers::usize_to_f64;
use crate::state::{RankState, SeasonInfo};
use crate::tiers::RankPosition;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuestProgress {
    pub current: f64,
    pub completed: bool,
}

impl QuestType {
    /// The log field a quest of this type reads, if any.
    fn field(self, log: &DailyLog) -> Option<f64> {
        match self {
            Self::Calories => log.calories,
            Self::Steps => log.steps,
            Self::Sleep => log.sleep_hours,
            Self::Weight => log.weight_kg,
            Self::Streak | Self::Boss => None,
        }
    }
}

fn in_window(log: &DailyLog, cadence: Cadence, key: &str) -> bool {
    let date = || log.calendar_date().ok();
    match cadence {
        Cadence::Daily => log.date == key,
        Cadence::Weekly => date().is_some_and(|date| date.iso_week_key() == key),
        Cadence::Monthly => date().is_some_and(|date| date.month_key() == key),
        Cadence::Seasonal => date().is_some_and(|date| season_contains(key, date)),
    }
}

fn season_contains(season_id: &str, date: CalendarDate) -> bool {
    SeasonInfo::find(season_id).is_none_or(|season| season.contains(date))
}

/// Progress of `quest` within the window named by `key`.
///
/// Boolean and streak quests read `rank`; without it they report zero.
#[must_use]
pub fn quest_progress(
    quest: &QuestInstance,
    logs: &[DailyLog],
    key: &str,
    rank: Option<&RankState>,
) -> QuestProgress {
    let window: Vec<&DailyLog> = logs
        .iter()
        .filter(|log| in_window(log, quest.freq, key))
        .collect();

    let current = match (quest.target_type, quest.quest_type) {
        (TargetType::Boolean, QuestType::Boss) => {
            flag(rank.is_some_and(|rank| rank.boss_state.is_defeated_in(key)))
        }
        (TargetType::Boolean, _) => flag(rank.is_some_and(has_been_promoted)),
        (TargetType::Log, kind) => flag(window.iter().any(|log| kind.field(log).is_some())),
        (TargetType::Value, QuestType::Streak) => rank.map_or(0.0, |rank| f64::from(rank.streak)),
        (TargetType::Value, kind) => window
            .iter()
            .filter_map(|log| kind.field(log))
            .fold(0.0, f64::max),
        (TargetType::Count, kind) => {
            usize_to_f64(window.iter().filter(|log| kind.field(log).is_some()).count())
        }
    };

    QuestProgress {
        current,
        completed: current >= quest.target_value,
    }
}

/// A quest on the board with its progress and claim state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestStatus {
    pub quest: QuestInstance,
    pub progress: QuestProgress,
    pub claimed: bool,
}

#[must_use]
pub fn quest_board(
    active: &ActiveQuests,
    logs: &[DailyLog],
    rank: &RankState,
    claims: &[QuestClaim],
) -> Vec<QuestStatus> {
    active
        .iter()
        .map(|(quest, key)| QuestStatus {
            quest: quest.clone(),
            progress: quest_progress(quest, logs, key, Some(rank)),
            claimed: claims.iter().any(|claim| claim.id == quest.id),
        })
        .collect()
}

const fn flag(hit: bool) -> f64 {
    if hit { 1.0 } else { 0.0 }
}

fn has_been_promoted(rank: &RankState) -> bool {
    let floor = RankPosition::floor();
    (rank.tier, rank.division) != (floor.tier, floor.division)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::boss::BossState;
    use crate::data::UserProfile;
    use crate::quests::{QuestTemplateId, generate_monthly_quests};
    use crate::tiers::{Division, Tier};

    fn log(date: &str, calories: Option<f64>, steps: Option<f64>) -> DailyLog {
        DailyLog {
            date: date.to_string(),
            calories,
            steps,
            ..DailyLog::default()
        }
    }

    fn quest(id: QuestTemplateId, key: &str) -> QuestInstance {
        id.template().instantiate(key, &UserProfile::default())
    }

    #[test]
    fn daily_log_quest_reads_exact_date() {
        let logs = vec![log("2024-01-01", Some(1900.0), None), log("2024-01-02", None, Some(9000.0))];
        let cal = quest(QuestTemplateId::DqCalLog, "2024-01-02");
        assert!(!quest_progress(&cal, &logs, "2024-01-02", None).completed);
        let steps = quest(QuestTemplateId::DqStepsLog, "2024-01-02");
        assert!(quest_progress(&steps, &logs, "2024-01-02", None).completed);
        let goal = quest(QuestTemplateId::DqStepsGoal, "2024-01-02");
        let progress = quest_progress(&goal, &logs, "2024-01-02", None);
        assert!((progress.current - 9000.0).abs() < f64::EPSILON);
        assert!(progress.completed);
    }

    #[test]
    fn weekly_count_uses_iso_week() {
        // 2024-01-01..07 is 2024-W1; 2024-01-08 starts W2.
        let logs: Vec<DailyLog> = ["2024-01-01", "2024-01-03", "2024-01-05", "2024-01-07", "2024-01-08", "bad-date"]
            .iter()
            .map(|d| log(d, Some(2000.0), None))
            .collect();
        let count = quest(QuestTemplateId::WqCalCount, "2024-W1");
        let progress = quest_progress(&count, &logs, "2024-W1", None);
        assert!((progress.current - 4.0).abs() < f64::EPSILON);
        assert!(!progress.completed);
    }

    #[test]
    fn boolean_quests_read_rank_state() {
        let profile = UserProfile::default();
        let monthly = generate_monthly_quests("2024-06", &profile);
        let boss = monthly
            .iter()
            .find(|q| q.template_id == QuestTemplateId::MqBoss)
            .unwrap();
        let mut rank = RankState::initial();
        assert!(!quest_progress(boss, &[], "2024-06", Some(&rank)).completed);
        let mut boss_state = BossState::default();
        boss_state.engage(CalendarDate::parse("2024-06-01").unwrap(), true, true);
        rank.boss_state = boss_state;
        assert!(quest_progress(boss, &[], "2024-06", Some(&rank)).completed);
        assert!(!quest_progress(boss, &[], "2024-07", Some(&rank)).completed);

        let promo = quest(QuestTemplateId::SqPromo, "season_1");
        assert!(!quest_progress(&promo, &[], "season_1", Some(&rank)).completed);
        rank.lp = 80;
        assert!(!quest_progress(&promo, &[], "season_1", Some(&rank)).completed);
        rank.division = Some(Division::III);
        assert!(quest_progress(&promo, &[], "season_1", Some(&rank)).completed);
        rank.tier = Tier::Bronze;
        assert!(quest_progress(&promo, &[], "season_1", None).current < 1.0);
    }

    #[test]
    fn board_marks_claimed_quests() {
        let today = CalendarDate::parse("2024-01-02").unwrap();
        let mut active = ActiveQuests::default();
        active.refresh(today, &UserProfile::default(), "season_1");
        let logs = vec![DailyLog::ranked("2024-01-02", 2000.0)];
        let claims = vec![QuestClaim::new(
            "dq_cal_log_2024-01-02",
            today,
            QuestTemplateId::DqCalLog.template().rewards,
        )];
        let board = quest_board(&active, &logs, &RankState::initial(), &claims);
        assert_eq!(board.len(), 3 + 2 + 2 + 1);
        let cal = board
            .iter()
            .find(|status| status.quest.id == "dq_cal_log_2024-01-02")
            .unwrap();
        assert!(cal.progress.completed && cal.claimed);
        assert_eq!(board.iter().filter(|status| status.claimed).count(), 1);
    }

    #[test]
    fn streak_value_uses_current_streak() {
        let streak = quest(QuestTemplateId::MqCalStreak, "2024-03");
        let mut rank = RankState::initial();
        rank.streak = 15;
        assert!(quest_progress(&streak, &[], "2024-03", Some(&rank)).completed);
    }
}
