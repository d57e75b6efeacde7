//! Loading persisted save snapshots.
//!
//! Saves written by older app versions miss fields and may reference catalog
//! ids that no longer exist. Missing fields default; unknown ids are dropped
//! with a warning so the rest of the save still loads.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::badges::{BadgeId, BadgeShelf, UnlockedBadge};
use crate::calendar::CalendarDate;
use crate::data::{DailyLog, QuestClaim, UserProfile};
use crate::items::{ItemId, Loadout};
use crate::skills::{SkillPerk, Skills};
use crate::state::{CarryOver, LegacySeason};

/// Newest save schema this crate understands.
pub const SNAPSHOT_VERSION: u32 = 8;

#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("snapshot version {found} is newer than supported version {SNAPSHOT_VERSION}")]
    UnsupportedVersion { found: u32 },
}

#[derive(Debug, Deserialize)]
struct RawBadge {
    id: String,
    date: String,
    #[serde(default)]
    details: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawLoadout {
    #[serde(default)]
    weapon_id: Option<String>,
    #[serde(default)]
    relic_id: Option<String>,
    #[serde(default)]
    banner_id: Option<String>,
    #[serde(default)]
    title_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSnapshot {
    #[serde(default)]
    version: Option<u32>,
    #[serde(default)]
    profile: Option<UserProfile>,
    logs: Vec<serde_json::Value>,
    #[serde(default)]
    quest_claims: Vec<serde_json::Value>,
    #[serde(default)]
    achievement_claims: Vec<String>,
    #[serde(default)]
    skills: Vec<SkillPerk>,
    #[serde(default)]
    unlocked_items: Option<Vec<String>>,
    #[serde(default)]
    unlocked_badges: Option<Vec<RawBadge>>,
    #[serde(default)]
    loadout: Option<RawLoadout>,
    #[serde(default)]
    legacy_seasons: Option<Vec<LegacySeason>>,
    #[serde(default)]
    last_seen_season_id: Option<String>,
}

/// Everything a replay needs, read from a save file.
#[derive(Debug, Clone, PartialEq)]
pub struct AppSnapshot {
    pub version: u32,
    pub profile: Option<UserProfile>,
    pub logs: Vec<DailyLog>,
    pub quest_claims: Vec<QuestClaim>,
    pub achievement_claims: Vec<String>,
    pub skills: Skills,
    pub carry_over: CarryOver,
}

impl AppSnapshot {
    /// Parse a save snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`SnapshotError::Parse`] for malformed JSON or a missing `logs`
    /// array and [`SnapshotError::UnsupportedVersion`] for saves from a newer
    /// schema. Individual logs or claims that fail to parse are skipped.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        let raw: RawSnapshot = serde_json::from_str(json)?;
        let version = raw.version.unwrap_or(1);
        if version > SNAPSHOT_VERSION {
            return Err(SnapshotError::UnsupportedVersion { found: version });
        }

        let carry_over = CarryOver {
            loadout: raw.loadout.map(resolve_loadout),
            unlocked_items: raw.unlocked_items.map(|ids| resolve_items(&ids)),
            unlocked_badges: raw.unlocked_badges.map(resolve_badges),
            legacy_seasons: raw.legacy_seasons,
            last_seen_season_id: raw.last_seen_season_id,
        };

        Ok(Self {
            version,
            profile: raw.profile,
            logs: parse_entries::<DailyLog>(raw.logs, "log"),
            quest_claims: parse_entries::<QuestClaim>(raw.quest_claims, "quest claim"),
            achievement_claims: raw.achievement_claims,
            skills: Skills::from_perks(&raw.skills),
            carry_over,
        })
    }
}

/// Keep every entry that parses; a malformed one is logged and skipped.
fn parse_entries<T: DeserializeOwned>(raw: Vec<serde_json::Value>, kind: &str) -> Vec<T> {
    raw.into_iter()
        .enumerate()
        .filter_map(|(index, value)| match serde_json::from_value(value) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("dropping {kind} #{index}: {err}");
                None
            }
        })
        .collect()
}

fn resolve_item(raw: &str) -> Option<ItemId> {
    let parsed = raw.parse().ok();
    if parsed.is_none() {
        log::warn!("dropping unknown item id `{raw}`");
    }
    parsed
}

fn resolve_items(ids: &[String]) -> Vec<ItemId> {
    let mut items: Vec<ItemId> = Vec::with_capacity(ids.len());
    for item in ids.iter().filter_map(|raw| resolve_item(raw)) {
        if !items.contains(&item) {
            items.push(item);
        }
    }
    items
}

fn resolve_loadout(raw: RawLoadout) -> Loadout {
    let defaults = Loadout::default();
    let slot = |value: Option<String>| value.as_deref().and_then(resolve_item);
    Loadout {
        weapon_id: slot(raw.weapon_id).unwrap_or(defaults.weapon_id),
        relic_id: slot(raw.relic_id),
        banner_id: slot(raw.banner_id),
        title_id: slot(raw.title_id),
    }
}

fn resolve_badges(raw: Vec<RawBadge>) -> BadgeShelf {
    raw.into_iter()
        .filter_map(|badge| {
            let Ok(id) = badge.id.parse::<BadgeId>() else {
                log::warn!("dropping unknown badge id `{}`", badge.id);
                return None;
            };
            match CalendarDate::parse(&badge.date) {
                Ok(date) => Some(UnlockedBadge {
                    id,
                    date,
                    details: badge.details,
                }),
                Err(err) => {
                    log::warn!("dropping badge `{}`: {err}", badge.id);
                    None
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::skills::SkillId;

    #[test]
    fn minimal_snapshot_defaults_everything_but_logs() {
        let snap = AppSnapshot::from_json(r#"{"logs":[]}"#).unwrap();
        assert_eq!(snap.version, 1);
        assert!(snap.profile.is_none());
        assert!(snap.quest_claims.is_empty());
        assert_eq!(snap.carry_over, CarryOver::default());
        assert!(AppSnapshot::from_json(r#"{"version":8}"#).is_err());
    }

    #[test]
    fn unknown_ids_are_dropped() {
        let json = r#"{
            "version": 8,
            "profile": {"name": "Sam"},
            "logs": [{"date": "2024-01-01", "calories": 1800}],
            "questClaims": [{"id": "dq_cal_log_2024-01-01", "date": "2024-01-01", "lp": 1}],
            "achievementClaims": ["ach_streak_7"],
            "skills": [{"id": "iron_will", "level": 2}, {"id": "shield_battery", "level": 1}],
            "unlockedItems": ["iron_dagger", "laser_sword", "gold_saber", "gold_saber"],
            "unlockedBadges": [
                {"id": "badge_rank_iron", "date": "2024-01-01"},
                {"id": "badge_mystery", "date": "2024-01-01"},
                {"id": "badge_streak_7", "date": "soon"}
            ],
            "loadout": {"weaponId": "laser_sword", "relicId": "old_coin"}
        }"#;
        let snap = AppSnapshot::from_json(json).unwrap();
        assert_eq!(snap.skills.level(SkillId::IronWill), 2);
        assert_eq!(snap.skills.to_perks().len(), 1);
        assert_eq!(
            snap.carry_over.unlocked_items,
            Some(vec![ItemId::IronDagger, ItemId::GoldSaber])
        );
        let badges = snap.carry_over.unlocked_badges.unwrap();
        assert_eq!(badges.len(), 1);
        assert!(badges.contains(BadgeId::RankIron));
        let loadout = snap.carry_over.loadout.unwrap();
        assert_eq!(loadout.weapon_id, ItemId::IronDagger);
        assert_eq!(loadout.relic_id, Some(ItemId::OldCoin));
        assert_eq!(snap.quest_claims[0].rewards().lp, 1);
    }

    #[test]
    fn malformed_logs_and_claims_are_skipped() {
        let json = r#"{
            "logs": [
                {"date": "2024-01-01", "calories": 1800},
                {"date": "2024-01-02", "calories": "lots"},
                "2024-01-03",
                {"date": "2024-01-04", "calories": 2100}
            ],
            "questClaims": [
                {"id": "dq_cal_log_2024-01-01", "date": "2024-01-01", "lp": 1},
                {"id": 7},
                {"id": "dq_cal_log_2024-01-04", "date": "2024-01-04", "lp": 2}
            ]
        }"#;
        let snap = AppSnapshot::from_json(json).unwrap();
        let dates: Vec<&str> = snap.logs.iter().map(|log| log.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-04"]);
        let claims: Vec<&str> = snap.quest_claims.iter().map(|claim| claim.id.as_str()).collect();
        assert_eq!(claims, ["dq_cal_log_2024-01-01", "dq_cal_log_2024-01-04"]);
    }

    #[test]
    fn newer_versions_are_rejected() {
        let err = AppSnapshot::from_json(r#"{"version": 99, "logs": []}"#).unwrap_err();
        assert!(matches!(err, SnapshotError::UnsupportedVersion { found: 99 }));
    }
}
