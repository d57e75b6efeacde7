//! Quest catalog and the date-keyed quest generators.
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::calendar::CalendarDate;
use crate::data::{QuestRewards, UserProfile};
use crate::rng::{Sfc32, shuffle_in_place};

pub mod progress;
pub use progress::{QuestProgress, QuestStatus, quest_board, quest_progress};

const DAILY_SLOTS: usize = 3;
const WEEKLY_SLOTS: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestType {
    Calories,
    Steps,
    Sleep,
    Weight,
    Streak,
    Boss,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetType {
    Log,
    Value,
    Count,
    Boolean,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Cadence {
    Daily,
    Weekly,
    Monthly,
    Seasonal,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestTemplateId {
    DqCalLog,
    DqWeightLog,
    DqStepsLog,
    DqSleepLog,
    DqStepsGoal,
    DqSleepGoal,
    WqCalCount,
    WqStepsCount,
    WqSleepCount,
    WqWeightCount,
    MqBoss,
    MqCalStreak,
    SqPromo,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestTemplate {
    pub id: QuestTemplateId,
    pub slug: &'static str,
    pub quest_type: QuestType,
    pub target_type: TargetType,
    pub base_target: f64,
    pub rewards: QuestRewards,
    pub cadence: Cadence,
}

const fn template(
    id: QuestTemplateId,
    slug: &'static str,
    quest_type: QuestType,
    target_type: TargetType,
    base_target: f64,
    (lp, cp, essence): (i32, i64, i64),
    cadence: Cadence,
) -> QuestTemplate {
    QuestTemplate {
        id,
        slug,
        quest_type,
        target_type,
        base_target,
        rewards: QuestRewards { lp, cp, essence },
        cadence,
    }
}

use QuestTemplateId as Q;
use QuestType as T;
use TargetType as K;

pub static QUEST_TEMPLATES: [QuestTemplate; 13] = [
    template(Q::DqCalLog, "dq_cal_log", T::Calories, K::Log, 1.0, (1, 10, 20), Cadence::Daily),
    template(Q::DqWeightLog, "dq_weight_log", T::Weight, K::Log, 1.0, (0, 15, 25), Cadence::Daily),
    template(Q::DqStepsLog, "dq_steps_log", T::Steps, K::Log, 1.0, (0, 10, 15), Cadence::Daily),
    template(Q::DqSleepLog, "dq_sleep_log", T::Sleep, K::Log, 1.0, (0, 10, 15), Cadence::Daily),
    template(Q::DqStepsGoal, "dq_steps_goal", T::Steps, K::Value, 8000.0, (0, 20, 40), Cadence::Daily),
    template(Q::DqSleepGoal, "dq_sleep_goal", T::Sleep, K::Value, 7.5, (0, 20, 40), Cadence::Daily),
    template(Q::WqCalCount, "wq_cal_count", T::Calories, K::Count, 5.0, (3, 50, 100), Cadence::Weekly),
    template(Q::WqStepsCount, "wq_steps_count", T::Steps, K::Count, 5.0, (0, 40, 80), Cadence::Weekly),
    template(Q::WqSleepCount, "wq_sleep_count", T::Sleep, K::Count, 5.0, (0, 40, 80), Cadence::Weekly),
    template(Q::WqWeightCount, "wq_weight_count", T::Weight, K::Count, 3.0, (0, 30, 60), Cadence::Weekly),
    template(Q::MqBoss, "mq_boss", T::Boss, K::Boolean, 1.0, (5, 100, 200), Cadence::Monthly),
    template(Q::MqCalStreak, "mq_cal_streak", T::Streak, K::Value, 15.0, (5, 150, 250), Cadence::Monthly),
    template(Q::SqPromo, "sq_promo", T::Streak, K::Boolean, 1.0, (10, 500, 1000), Cadence::Seasonal),
];

impl QuestTemplateId {
    #[must_use]
    pub fn template(self) -> &'static QuestTemplate {
        // QUEST_TEMPLATES is declared in enum order.
        &QUEST_TEMPLATES[self as usize]
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        self.template().slug
    }

    /// Split a quest instance id (`<template>_<key>`) into its parts.
    #[must_use]
    pub fn from_instance_id(instance_id: &str) -> Option<(Self, &str)> {
        QUEST_TEMPLATES.iter().find_map(|template| {
            instance_id
                .strip_prefix(template.slug)
                .and_then(|rest| rest.strip_prefix('_'))
                .filter(|key| !key.is_empty())
                .map(|key| (template.id, key))
        })
    }
}

impl fmt::Display for QuestTemplateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestTemplateId {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QUEST_TEMPLATES
            .iter()
            .find(|template| template.slug == s)
            .map(|template| template.id)
            .ok_or(())
    }
}

impl QuestTemplate {
    #[must_use]
    pub fn label(&self, target: f64) -> String {
        match self.id {
            Q::DqCalLog => "Log Calories Today".to_string(),
            Q::DqWeightLog => "Log Weight Today".to_string(),
            Q::DqStepsLog => "Log Steps Today".to_string(),
            Q::DqSleepLog => "Log Sleep Today".to_string(),
            Q::DqStepsGoal => format!("Hit {target} Steps"),
            Q::DqSleepGoal => format!("Sleep {target} Hours"),
            Q::WqCalCount => format!("Log Calories {target} times"),
            Q::WqStepsCount => format!("Log Steps {target} times"),
            Q::WqSleepCount => format!("Log Sleep {target} times"),
            Q::WqWeightCount => format!("Log Weight {target} times"),
            Q::MqBoss => "Defeat Monthly Boss".to_string(),
            Q::MqCalStreak => "15 Day Streak".to_string(),
            Q::SqPromo => "Earn a Promotion".to_string(),
        }
    }

    /// Target after applying the profile's goals to goal-valued templates.
    #[must_use]
    pub fn resolve_target(&self, profile: &UserProfile) -> f64 {
        match (self.quest_type, self.target_type) {
            (QuestType::Steps, TargetType::Value) => profile.goals.steps(),
            (QuestType::Sleep, TargetType::Value) => profile.goals.sleep(),
            _ => self.base_target,
        }
    }

    #[must_use]
    pub fn instantiate(&self, key: &str, profile: &UserProfile) -> QuestInstance {
        let target = self.resolve_target(profile);
        QuestInstance {
            id: format!("{}_{key}", self.slug),
            template_id: self.id,
            label: self.label(target),
            quest_type: self.quest_type,
            target_type: self.target_type,
            target_value: target,
            rewards: self.rewards,
            expires: key.to_string(),
            freq: self.cadence,
        }
    }
}

fn pool(cadence: Cadence) -> impl Iterator<Item = &'static QuestTemplate> {
    QUEST_TEMPLATES
        .iter()
        .filter(move |template| template.cadence == cadence)
}

/// A concrete objective for one cadence window.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestInstance {
    pub id: String,
    pub template_id: QuestTemplateId,
    pub label: String,
    #[serde(rename = "type")]
    pub quest_type: QuestType,
    pub target_type: TargetType,
    pub target_value: f64,
    pub rewards: QuestRewards,
    pub expires: String,
    pub freq: Cadence,
}

/// Forced calorie quest plus two more, preferring quest types not yet picked.
#[must_use]
pub fn generate_daily_quests(date: CalendarDate, profile: &UserProfile) -> Vec<QuestInstance> {
    let key = date.to_string();
    let forced = QuestTemplateId::DqCalLog.template();
    let mut candidates: Vec<&QuestTemplate> = pool(Cadence::Daily)
        .filter(|template| template.id != forced.id)
        .collect();
    let mut rng = Sfc32::from_seed_str(&key);
    shuffle_in_place(&mut candidates, &mut rng);

    let mut selected = vec![forced];
    let mut used_types = vec![forced.quest_type];
    let allow_repeats = candidates.len() < DAILY_SLOTS;
    for candidate in candidates {
        if selected.len() >= DAILY_SLOTS {
            break;
        }
        if allow_repeats || !used_types.contains(&candidate.quest_type) {
            selected.push(candidate);
            used_types.push(candidate.quest_type);
        }
    }
    selected
        .into_iter()
        .map(|template| template.instantiate(&key, profile))
        .collect()
}

/// Two weekly quests from a week-seeded shuffle.
#[must_use]
pub fn generate_weekly_quests(week_key: &str, profile: &UserProfile) -> Vec<QuestInstance> {
    let mut candidates: Vec<&QuestTemplate> = pool(Cadence::Weekly).collect();
    let mut rng = Sfc32::from_seed_str(week_key);
    shuffle_in_place(&mut candidates, &mut rng);
    candidates
        .into_iter()
        .take(WEEKLY_SLOTS)
        .map(|template| template.instantiate(week_key, profile))
        .collect()
}

#[must_use]
pub fn generate_monthly_quests(month_key: &str, profile: &UserProfile) -> Vec<QuestInstance> {
    pool(Cadence::Monthly)
        .map(|template| template.instantiate(month_key, profile))
        .collect()
}

#[must_use]
pub fn generate_seasonal_quests(season_id: &str, profile: &UserProfile) -> Vec<QuestInstance> {
    pool(Cadence::Seasonal)
        .map(|template| template.instantiate(season_id, profile))
        .collect()
}

/// Quests for one cadence and the key they were generated for.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct QuestSet {
    #[serde(default)]
    pub key: String,
    #[serde(default)]
    pub quests: Vec<QuestInstance>,
}

impl QuestSet {
    fn refresh(&mut self, key: String, generate: impl FnOnce(&str) -> Vec<QuestInstance>) -> bool {
        if self.key == key {
            return false;
        }
        self.quests = generate(&key);
        self.key = key;
        true
    }
}

/// The quest board across all cadences.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ActiveQuests {
    #[serde(default)]
    pub daily: QuestSet,
    #[serde(default)]
    pub weekly: QuestSet,
    #[serde(default)]
    pub monthly: QuestSet,
    #[serde(default)]
    pub seasonal: QuestSet,
}

impl ActiveQuests {
    /// Regenerate every cadence whose key no longer matches `today`.
    /// Returns whether anything changed.
    pub fn refresh(&mut self, today: CalendarDate, profile: &UserProfile, season_id: &str) -> bool {
        let daily = self
            .daily
            .refresh(today.to_string(), |_| generate_daily_quests(today, profile));
        let weekly = self
            .weekly
            .refresh(today.iso_week_key(), |key| generate_weekly_quests(key, profile));
        let monthly = self
            .monthly
            .refresh(today.month_key(), |key| generate_monthly_quests(key, profile));
        let seasonal = self
            .seasonal
            .refresh(season_id.to_string(), |key| generate_seasonal_quests(key, profile));
        daily || weekly || monthly || seasonal
    }

    /// Every quest on the board with the key its progress is measured against.
    pub fn iter(&self) -> impl Iterator<Item = (&QuestInstance, &str)> {
        [&self.daily, &self.weekly, &self.monthly, &self.seasonal]
            .into_iter()
            .flat_map(|set| set.quests.iter().map(move |quest| (quest, set.key.as_str())))
    }
}
