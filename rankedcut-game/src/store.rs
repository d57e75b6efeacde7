//! Log and claim persistence seams.
//!
//! The engine only needs "upsert by date" and "append once" semantics; hosts
//! back these traits with whatever storage they have. The in-memory versions
//! are used by the CLI and the tests.

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::data::{DailyLog, QuestClaim};

/// Storage for daily logs, one per calendar date.
pub trait LogStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert `log`, replacing any existing log with the same date.
    ///
    /// # Errors
    ///
    /// Returns an error if the log cannot be written.
    fn upsert_log(&mut self, log: DailyLog) -> Result<(), Self::Error>;

    /// All stored logs in date order.
    ///
    /// # Errors
    ///
    /// Returns an error if the logs cannot be read.
    fn logs(&self) -> Result<Vec<DailyLog>, Self::Error>;
}

/// Storage for quest and achievement claims.
pub trait ClaimStore {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record a quest claim. Returns `false` when the id was already claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim cannot be written.
    fn append_claim(&mut self, claim: QuestClaim) -> Result<bool, Self::Error>;

    /// Record an achievement claim. Returns `false` when already claimed.
    ///
    /// # Errors
    ///
    /// Returns an error if the claim cannot be written.
    fn append_achievement(&mut self, id: &str) -> Result<bool, Self::Error>;

    /// All quest claims in the order they were first made.
    ///
    /// # Errors
    ///
    /// Returns an error if the claims cannot be read.
    fn claims(&self) -> Result<Vec<QuestClaim>, Self::Error>;

    /// # Errors
    ///
    /// Returns an error if the claims cannot be read.
    fn achievement_claims(&self) -> Result<Vec<String>, Self::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct MemoryLogStore {
    logs: BTreeMap<String, DailyLog>,
}

impl MemoryLogStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.logs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }
}

impl FromIterator<DailyLog> for MemoryLogStore {
    fn from_iter<I: IntoIterator<Item = DailyLog>>(iter: I) -> Self {
        Self {
            logs: iter.into_iter().map(|log| (log.date.clone(), log)).collect(),
        }
    }
}

impl LogStore for MemoryLogStore {
    type Error = Infallible;

    fn upsert_log(&mut self, log: DailyLog) -> Result<(), Self::Error> {
        self.logs.insert(log.date.clone(), log);
        Ok(())
    }

    fn logs(&self) -> Result<Vec<DailyLog>, Self::Error> {
        Ok(self.logs.values().cloned().collect())
    }
}

#[derive(Debug, Clone, Default)]
pub struct MemoryClaimStore {
    claims: Vec<QuestClaim>,
    achievements: Vec<String>,
}

impl MemoryClaimStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl ClaimStore for MemoryClaimStore {
    type Error = Infallible;

    fn append_claim(&mut self, claim: QuestClaim) -> Result<bool, Self::Error> {
        if self.claims.iter().any(|existing| existing.id == claim.id) {
            return Ok(false);
        }
        self.claims.push(claim);
        Ok(true)
    }

    fn append_achievement(&mut self, id: &str) -> Result<bool, Self::Error> {
        if self.achievements.iter().any(|existing| existing == id) {
            return Ok(false);
        }
        self.achievements.push(id.to_string());
        Ok(true)
    }

    fn claims(&self) -> Result<Vec<QuestClaim>, Self::Error> {
        Ok(self.claims.clone())
    }

    fn achievement_claims(&self) -> Result<Vec<String>, Self::Error> {
        Ok(self.achievements.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::CalendarDate;
    use crate::data::QuestRewards;

    #[test]
    fn upsert_replaces_same_date() {
        let mut store = MemoryLogStore::new();
        store.upsert_log(DailyLog::ranked("2024-01-02", 1800.0)).unwrap();
        store.upsert_log(DailyLog::ranked("2024-01-01", 1700.0)).unwrap();
        store.upsert_log(DailyLog::ranked("2024-01-02", 2100.0)).unwrap();
        let logs = store.logs().unwrap();
        assert_eq!(logs.len(), 2);
        assert_eq!(logs[0].date, "2024-01-01");
        assert_eq!(logs[1].calories, Some(2100.0));
    }

    #[test]
    fn claims_are_idempotent() {
        let mut store = MemoryClaimStore::new();
        let date = CalendarDate::parse("2024-01-01").unwrap();
        let claim = QuestClaim::new("dq_cal_log_2024-01-01", date, QuestRewards::default());
        assert!(store.append_claim(claim.clone()).unwrap());
        assert!(!store.append_claim(claim).unwrap());
        assert_eq!(store.claims().unwrap().len(), 1);

        assert!(store.append_achievement("ach_streak_7").unwrap());
        assert!(!store.append_achievement("ach_streak_7").unwrap());
        assert_eq!(store.achievement_claims().unwrap(), vec!["ach_streak_7"]);
    }
}
