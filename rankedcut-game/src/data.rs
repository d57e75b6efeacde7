use serde::{Deserialize, Serialize};

use crate::calendar::{CalendarDate, CalendarError, ClockTime};

pub const DEFAULT_STEP_GOAL: f64 = 8000.0;
pub const DEFAULT_SLEEP_GOAL: f64 = 7.5;

/// One day's submission. `date` stays raw text so that a single malformed
/// entry can be skipped instead of failing the whole load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DailyLog {
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub steps: Option<f64>,
    #[serde(default)]
    pub sleep_hours: Option<f64>,
    #[serde(default)]
    pub weight_kg: Option<f64>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_ranked: Option<bool>,
}

impl DailyLog {
    /// Minimal ranked log with only calories.
    #[must_use]
    pub fn ranked(date: &str, calories: f64) -> Self {
        Self {
            date: date.to_string(),
            calories: Some(calories),
            ..Self::default()
        }
    }

    /// # Errors
    ///
    /// Returns an error when `date` is not `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Result<CalendarDate, CalendarError> {
        CalendarDate::parse(&self.date)
    }

    /// Ranked flag, defaulting to `true` for saves written before the flag existed.
    #[must_use]
    pub fn is_ranked(&self) -> bool {
        self.is_ranked.unwrap_or(true)
    }

    /// A ranked win needs calories and a ranked submission.
    #[must_use]
    pub fn is_ranked_win(&self) -> bool {
        self.calories.is_some() && self.is_ranked()
    }

    /// Parsed submission time, if present and well formed.
    #[must_use]
    pub fn clock_time(&self) -> Option<ClockTime> {
        let text = self.timestamp.as_deref()?;
        match ClockTime::parse(text) {
            Ok(time) => Some(time),
            Err(err) => {
                log::warn!("log {}: {err}", self.date);
                None
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct Goals {
    #[serde(default)]
    pub calories: Option<f64>,
    #[serde(default)]
    pub steps: Option<f64>,
    #[serde(default)]
    pub sleep: Option<f64>,
}

impl Goals {
    /// Daily step goal; zero or missing falls back to the default.
    #[must_use]
    pub fn steps(&self) -> f64 {
        self.steps.filter(|goal| *goal > 0.0).unwrap_or(DEFAULT_STEP_GOAL)
    }

    /// Nightly sleep goal in hours; zero or missing falls back to the default.
    #[must_use]
    pub fn sleep(&self) -> f64 {
        self.sleep.filter(|goal| *goal > 0.0).unwrap_or(DEFAULT_SLEEP_GOAL)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub goal_weight: f64,
    #[serde(default)]
    pub deadline: String,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub age: u32,
    #[serde(default)]
    pub sex: Option<String>,
    #[serde(default)]
    pub activity_level: Option<String>,
    #[serde(default)]
    pub goals: Goals,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub motto: Option<String>,
}

/// LP, CP and essence granted by a quest or claim.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct QuestRewards {
    #[serde(default)]
    pub lp: i32,
    #[serde(default)]
    pub cp: i64,
    #[serde(default)]
    pub essence: i64,
}

impl std::ops::AddAssign for QuestRewards {
    fn add_assign(&mut self, rhs: Self) {
        self.lp = self.lp.saturating_add(rhs.lp);
        self.cp = self.cp.saturating_add(rhs.cp);
        self.essence = self.essence.saturating_add(rhs.essence);
    }
}

/// A permanent record that a quest instance (or boss chest) was claimed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestClaim {
    pub id: String,
    pub date: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rewards: Option<QuestRewards>,
    /// Older saves stored the LP reward at the top level.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lp: Option<i32>,
}

impl QuestClaim {
    #[must_use]
    pub fn new(id: impl Into<String>, date: CalendarDate, rewards: QuestRewards) -> Self {
        Self {
            id: id.into(),
            date: date.to_string(),
            rewards: Some(rewards),
            lp: None,
        }
    }

    /// Effective rewards; a zero LP inside `rewards` falls back to the legacy field.
    #[must_use]
    pub fn rewards(&self) -> QuestRewards {
        let mut rewards = self.rewards.unwrap_or_default();
        if rewards.lp == 0 {
            rewards.lp = self.lp.unwrap_or(0);
        }
        rewards
    }

    /// # Errors
    ///
    /// Returns an error when `date` is not `YYYY-MM-DD`.
    pub fn calendar_date(&self) -> Result<CalendarDate, CalendarError> {
        CalendarDate::parse(&self.date)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranked_flag_defaults_true() {
        let log: DailyLog = serde_json::from_str(r#"{"date":"2024-01-01","calories":1800}"#).unwrap();
        assert!(log.is_ranked_win());
        let stats_only: DailyLog =
            serde_json::from_str(r#"{"date":"2024-01-01","calories":1800,"isRanked":false}"#).unwrap();
        assert!(!stats_only.is_ranked_win());
        let no_calories: DailyLog =
            serde_json::from_str(r#"{"date":"2024-01-01","steps":9000,"calories":null}"#).unwrap();
        assert!(!no_calories.is_ranked_win());
    }

    #[test]
    fn goals_fall_back_to_defaults() {
        let goals = Goals {
            calories: None,
            steps: Some(0.0),
            sleep: Some(8.0),
        };
        assert!((goals.steps() - DEFAULT_STEP_GOAL).abs() < f64::EPSILON);
        assert!((goals.sleep() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn legacy_claim_lp_is_honoured() {
        let legacy: QuestClaim =
            serde_json::from_str(r#"{"id":"dq_cal_log_2024-01-02","date":"2024-01-02","lp":3}"#).unwrap();
        assert_eq!(legacy.rewards(), QuestRewards { lp: 3, cp: 0, essence: 0 });
        let modern: QuestClaim = serde_json::from_str(
            r#"{"id":"x","date":"2024-01-02","rewards":{"lp":1,"cp":10,"essence":20}}"#,
        )
        .unwrap();
        assert_eq!(modern.rewards().cp, 10);
        assert_eq!(modern.rewards().lp, 1);
    }

    #[test]
    fn stacked_rewards_saturate() {
        let mut total = QuestRewards { lp: i32::MAX - 1, cp: 5, essence: i64::MAX };
        total += QuestRewards { lp: 10, cp: 7, essence: 1 };
        assert_eq!(total, QuestRewards { lp: i32::MAX, cp: 12, essence: i64::MAX });
    }
}
