//! Simulated league bracket.
//!
//! Each (tier, division) bracket the player enters gets a fresh roster of 19
//! rivals derived from the date the bracket was entered. Every calendar day
//! after that, each rival plays one deterministic match whose outcome depends
//! only on the date, the rival id, its personality, and the weekly event.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use crate::calendar::CalendarDate;
use crate::config::TierRule;
use crate::items::{ItemId, WEAPONS};
use crate::numbers::{floor_f64_to_i64, index_from_unit, round_half_up_to_i32, usize_to_u32};
use crate::rng::{Sfc32, seeded_float, shuffle_in_place};
use crate::tiers::{Division, Tier};

pub const ROSTER_SIZE: usize = 19;
/// Entries kept in each rival's LP window and in the player's placement log.
pub const HISTORY_WINDOW: usize = 7;
pub const BASE_WIN_CHANCE: f64 = 0.60;
const AGGRESSIVE_SWING: f64 = 1.25;
const TREND_THRESHOLD: i32 = 5;
/// Rivals may overshoot the promotion threshold by this much.
const LP_HEADROOM: i32 = 10;
const START_LP_SPAN: f64 = 80.0;
const LEADERBOARD_SIZE: usize = 5;

pub const RIVAL_NAMES: [&str; 27] = [
    "IronWill",
    "ZeroSugar",
    "KetoKing",
    "GymRat99",
    "CardioBunny",
    "LiftHeavy",
    "MacroMaster",
    "CheatDay",
    "BulkLord",
    "CutCommander",
    "ProteinShake",
    "ZenMode",
    "NightOwl",
    "EarlyRiser",
    "RepCounter",
    "SquatPro",
    "BenchPresser",
    "SaladEnjoyer",
    "WaterChugger",
    "StepCounter",
    "SleepMaxxer",
    "NoExcuses",
    "JustDoIt",
    "GrindSet",
    "Discipline",
    "Focus",
    "Gainz",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Personality {
    Grinder,
    Consistent,
    Slacker,
    Clutch,
    Aggressive,
    Standard,
}

impl Personality {
    pub const ALL: [Self; 6] = [
        Self::Grinder,
        Self::Consistent,
        Self::Slacker,
        Self::Clutch,
        Self::Aggressive,
        Self::Standard,
    ];

    #[must_use]
    pub const fn win_modifier(self) -> f64 {
        match self {
            Self::Grinder => 0.15,
            Self::Consistent => 0.10,
            Self::Slacker => -0.15,
            Self::Clutch | Self::Aggressive | Self::Standard => 0.0,
        }
    }

    #[must_use]
    pub const fn swing(self) -> f64 {
        match self {
            Self::Aggressive => AGGRESSIVE_SWING,
            _ => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Up,
    Down,
    #[default]
    Flat,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RivalResult {
    #[serde(rename = "W")]
    Win,
    #[serde(rename = "L")]
    Loss,
    #[default]
    #[serde(rename = "-")]
    Unplayed,
}

/// League-wide modifier rolled once per ISO week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WeeklyEvent {
    #[default]
    None,
    Slump,
    Surge,
    Chaos,
}

impl WeeklyEvent {
    pub const ALL: [Self; 4] = [Self::None, Self::Slump, Self::Surge, Self::Chaos];

    /// Event for an ISO week key such as `2024-W5`.
    #[must_use]
    pub fn for_week(week_key: &str) -> Self {
        Self::ALL[index_from_unit(seeded_float(week_key), Self::ALL.len())]
    }

    #[must_use]
    pub const fn win_modifier(self) -> f64 {
        match self {
            Self::Slump => -0.1,
            Self::Surge => 0.1,
            Self::None | Self::Chaos => 0.0,
        }
    }

    /// LP swing multiplier, if the event sets one.
    #[must_use]
    pub const fn swing(self) -> Option<f64> {
        match self {
            Self::Chaos => Some(1.5),
            _ => None,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::None => "Standard Week",
            Self::Slump => "Slump Week",
            Self::Surge => "Surge Week",
            Self::Chaos => "Chaos Week",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::None => "No special modifiers.",
            Self::Slump => "Rivals are struggling. (-10% Win Rate)",
            Self::Surge => "Rivals are motivated. (+10% Win Rate)",
            Self::Chaos => "Rivals are aggressive. (+50% LP Swing)",
        }
    }
}

impl fmt::Display for WeeklyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rival {
    pub id: String,
    pub name: String,
    pub personality: Personality,
    pub lp: i32,
    pub last_result: RivalResult,
    pub trend: Trend,
    pub history: SmallVec<[i32; 8]>,
    /// Placement before the most recent simulated day.
    pub last_rank: u32,
    pub equipped_weapon_id: ItemId,
}

impl Rival {
    fn push_history(&mut self, lp: i32) {
        self.history.push(lp);
        if self.history.len() > HISTORY_WINDOW {
            self.history.remove(0);
        }
    }

    fn refresh_trend(&mut self) {
        if let (Some(first), Some(last)) = (self.history.first(), self.history.last())
            && self.history.len() >= 2
        {
            let diff = last - first;
            self.trend = if diff > TREND_THRESHOLD {
                Trend::Up
            } else if diff < -TREND_THRESHOLD {
                Trend::Down
            } else {
                Trend::Flat
            };
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Placement {
    pub date: CalendarDate,
    pub rank: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeagueState {
    pub id: String,
    pub tier: Tier,
    pub division: Option<Division>,
    pub start_date: CalendarDate,
    pub last_simulated_date: CalendarDate,
    pub rivals: Vec<Rival>,
    pub weekly_event: Option<WeeklyEvent>,
    pub user_placement_history: Vec<Placement>,
}

/// Build a fresh bracket for `tier`/`division` seeded by `date`.
#[must_use]
pub fn generate_league(
    tier: Tier,
    division: Option<Division>,
    date: CalendarDate,
    weekly_event: Option<WeeklyEvent>,
) -> LeagueState {
    let seed = date.to_string();
    let mut names = RIVAL_NAMES;
    let mut rng = Sfc32::from_seed_str(&seed);
    shuffle_in_place(&mut names, &mut rng);

    let rivals = names
        .iter()
        .take(ROSTER_SIZE)
        .enumerate()
        .map(|(i, name)| {
            let personality = Personality::ALL[index_from_unit(
                seeded_float(&format!("{seed}{i}pers")),
                Personality::ALL.len(),
            )];
            let start_lp = floor_f64_to_i64(seeded_float(&format!("{seed}{i}lp")) * START_LP_SPAN);
            let start_lp = i32::try_from(start_lp).unwrap_or(0);
            let weapon =
                WEAPONS[index_from_unit(seeded_float(&format!("{seed}{i}wep")), WEAPONS.len())];
            let mut history = SmallVec::new();
            history.push(start_lp);
            Rival {
                id: format!("rival_{i}"),
                name: (*name).to_string(),
                personality,
                lp: start_lp,
                last_result: RivalResult::Unplayed,
                trend: Trend::Flat,
                history,
                last_rank: usize_to_u32(i + 1),
                equipped_weapon_id: weapon,
            }
        })
        .collect();

    let division_label = division.map_or("", Division::as_str);
    LeagueState {
        id: format!("{tier}_{division_label}_{seed}"),
        tier,
        division,
        start_date: date,
        last_simulated_date: date,
        rivals,
        weekly_event,
        user_placement_history: Vec::new(),
    }
}

/// Placement of every rival, 1-based, ties broken by roster order.
#[must_use]
pub fn roster_ranks(rivals: &[Rival]) -> Vec<u32> {
    let mut order: Vec<usize> = (0..rivals.len()).collect();
    order.sort_by(|a, b| rivals[*b].lp.cmp(&rivals[*a].lp));
    let mut ranks = vec![0; rivals.len()];
    for (place, index) in order.into_iter().enumerate() {
        ranks[index] = usize_to_u32(place + 1);
    }
    ranks
}

/// Play one day for `rival`.
///
/// `rank_before` must be taken from the roster as it stood before any rival
/// played on `date`.
pub fn simulate_rival_day(
    rival: &mut Rival,
    rule: &TierRule,
    date: CalendarDate,
    event: WeeklyEvent,
    rank_before: u32,
) {
    rival.last_rank = rank_before;

    let roll = seeded_float(&format!("{date}{}", rival.id));
    let chance = BASE_WIN_CHANCE + rival.personality.win_modifier() + event.win_modifier();
    let won = roll < chance;

    let swing = event
        .swing()
        .map_or(rival.personality.swing(), |event_swing| {
            event_swing.max(rival.personality.swing())
        });
    let base = if won { rule.base_win } else { rule.base_loss };
    let change = round_half_up_to_i32(f64::from(base) * swing);

    rival.lp = (rival.lp + change).clamp(0, rule.promote_at + LP_HEADROOM);
    rival.last_result = if won {
        RivalResult::Win
    } else {
        RivalResult::Loss
    };
    rival.push_history(rival.lp);
    rival.refresh_trend();
}

impl LeagueState {
    #[must_use]
    pub fn event(&self) -> WeeklyEvent {
        self.weekly_event.unwrap_or_default()
    }

    /// Player placement for `player_lp`: one plus the rivals strictly ahead.
    #[must_use]
    pub fn placement_for(&self, player_lp: i32) -> u32 {
        let ahead = self.rivals.iter().filter(|rival| rival.lp > player_lp).count();
        usize_to_u32(ahead + 1)
    }

    #[must_use]
    pub fn latest_placement(&self) -> Option<u32> {
        self.user_placement_history.last().map(|placement| placement.rank)
    }

    #[must_use]
    pub fn best_placement(&self) -> Option<u32> {
        self.user_placement_history
            .iter()
            .map(|placement| placement.rank)
            .min()
    }

    /// Simulate every rival for `date` and record the player's placement.
    ///
    /// Dates on or before the last simulated date are ignored and yield
    /// `None`.
    pub fn advance_day(&mut self, rule: &TierRule, date: CalendarDate, player_lp: i32) -> Option<u32> {
        if date <= self.last_simulated_date {
            return None;
        }
        let event = self.event();
        let ranks = roster_ranks(&self.rivals);
        for (rival, rank_before) in self.rivals.iter_mut().zip(ranks) {
            simulate_rival_day(rival, rule, date, event, rank_before);
        }
        self.last_simulated_date = date;

        let rank = self.placement_for(player_lp);
        self.user_placement_history.push(Placement { date, rank });
        if self.user_placement_history.len() > HISTORY_WINDOW {
            self.user_placement_history.remove(0);
        }
        Some(rank)
    }
}

/// A row on the league leaderboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderRow {
    pub id: String,
    pub name: String,
    pub lp: i32,
    pub rank: u32,
    /// Movement against the rival's previous placement; always flat for the player.
    pub movement: Trend,
    pub is_player: bool,
    pub weapon_id: ItemId,
}

/// Top of the bracket with the player slotted in after rivals on equal LP.
#[must_use]
pub fn league_leaders(
    league: &LeagueState,
    player_lp: i32,
    player_weapon: ItemId,
    player_name: &str,
) -> Vec<LeaderRow> {
    let mut rows: Vec<LeaderRow> = league
        .rivals
        .iter()
        .map(|rival| LeaderRow {
            id: rival.id.clone(),
            name: rival.name.clone(),
            lp: rival.lp,
            rank: rival.last_rank,
            movement: Trend::Flat,
            is_player: false,
            weapon_id: rival.equipped_weapon_id,
        })
        .collect();
    rows.push(LeaderRow {
        id: "user".to_string(),
        name: if player_name.is_empty() {
            "You".to_string()
        } else {
            player_name.to_string()
        },
        lp: player_lp,
        rank: 0,
        movement: Trend::Flat,
        is_player: true,
        weapon_id: player_weapon,
    });
    rows.sort_by(|a, b| b.lp.cmp(&a.lp));
    rows.truncate(LEADERBOARD_SIZE);

    for (place, row) in rows.iter_mut().enumerate() {
        let current = usize_to_u32(place + 1);
        let previous = row.rank;
        if !row.is_player && previous > 0 {
            row.movement = match current.cmp(&previous) {
                std::cmp::Ordering::Less => Trend::Up,
                std::cmp::Ordering::Greater => Trend::Down,
                std::cmp::Ordering::Equal => Trend::Flat,
            };
        }
        row.rank = current;
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LadderConfig;
    use std::collections::HashSet;

    fn date(text: &str) -> CalendarDate {
        CalendarDate::parse(text).unwrap()
    }

    #[test]
    fn generation_is_deterministic_and_unique() {
        let a = generate_league(Tier::Iron, Some(Division::IV), date("2024-01-01"), None);
        let b = generate_league(Tier::Iron, Some(Division::IV), date("2024-01-01"), None);
        assert_eq!(a, b);
        assert_eq!(a.rivals.len(), ROSTER_SIZE);
        assert_eq!(a.id, "Iron_IV_2024-01-01");
        let names: HashSet<_> = a.rivals.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names.len(), ROSTER_SIZE);
        assert!(a.rivals.iter().all(|r| (0..80).contains(&r.lp)));
        assert!(a.rivals.iter().all(|r| r.history.as_slice() == [r.lp]));

        let c = generate_league(Tier::Iron, Some(Division::IV), date("2024-01-02"), None);
        assert_ne!(a.rivals, c.rivals);
    }

    #[test]
    fn apex_league_id_omits_division() {
        let league = generate_league(Tier::Master, None, date("2024-05-01"), Some(WeeklyEvent::Chaos));
        assert_eq!(league.id, "Master__2024-05-01");
        assert_eq!(league.event(), WeeklyEvent::Chaos);
    }

    #[test]
    fn simulated_lp_stays_within_headroom() {
        let cfg = LadderConfig::default();
        let rule = cfg.rule(Tier::Iron);
        let mut league = generate_league(Tier::Iron, Some(Division::IV), date("2024-01-01"), None);
        for day in date("2024-01-02").through(date("2024-03-31")) {
            league.weekly_event = Some(WeeklyEvent::for_week(&day.iso_week_key()));
            league.advance_day(rule, day, 40);
            for rival in &league.rivals {
                assert!((0..=rule.promote_at + 10).contains(&rival.lp));
                assert!(rival.history.len() <= HISTORY_WINDOW);
            }
        }
        assert_eq!(league.user_placement_history.len(), HISTORY_WINDOW);
        assert_eq!(league.last_simulated_date, date("2024-03-31"));
    }

    #[test]
    fn advance_ignores_already_simulated_dates() {
        let cfg = LadderConfig::default();
        let rule = cfg.rule(Tier::Iron);
        let mut league = generate_league(Tier::Iron, Some(Division::IV), date("2024-01-01"), None);
        assert_eq!(league.advance_day(rule, date("2024-01-01"), 0), None);
        let snapshot = league.clone();
        assert!(league.advance_day(rule, date("2024-01-02"), 0).is_some());
        assert_ne!(snapshot, league);
        let again = league.clone();
        assert_eq!(league.advance_day(rule, date("2024-01-02"), 0), None);
        assert_eq!(again, league);
    }

    #[test]
    fn rank_before_uses_pre_day_roster() {
        let cfg = LadderConfig::default();
        let rule = cfg.rule(Tier::Gold);
        let mut league = generate_league(Tier::Gold, Some(Division::II), date("2024-02-10"), None);
        let expected = roster_ranks(&league.rivals);
        league.advance_day(rule, date("2024-02-11"), 0);
        let recorded: Vec<u32> = league.rivals.iter().map(|r| r.last_rank).collect();
        assert_eq!(recorded, expected);
    }

    #[test]
    fn aggressive_swing_rounds_half_up() {
        let cfg = LadderConfig::default();
        // Bronze loss is -12; 1.25x is -15.
        let rule = cfg.rule(Tier::Bronze);
        let mut rival = Rival {
            id: "rival_x".into(),
            name: "Test".into(),
            personality: Personality::Aggressive,
            lp: 50,
            last_result: RivalResult::Unplayed,
            trend: Trend::Flat,
            history: SmallVec::from_slice(&[50]),
            last_rank: 1,
            equipped_weapon_id: ItemId::IronDagger,
        };
        simulate_rival_day(&mut rival, rule, date("2024-01-03"), WeeklyEvent::None, 4);
        let expected = if rival.last_result == RivalResult::Win { 50 + 24 } else { 50 - 15 };
        assert_eq!(rival.lp, expected);
        assert_eq!(rival.last_rank, 4);
        assert_ne!(rival.trend, Trend::Flat);
    }

    #[test]
    fn leaders_place_player_after_equal_rivals() {
        let mut league = generate_league(Tier::Iron, Some(Division::IV), date("2024-01-01"), None);
        for (i, rival) in league.rivals.iter_mut().enumerate() {
            rival.lp = i32::try_from(i).unwrap();
            rival.last_rank = 5;
        }
        let top = league_leaders(&league, 18, ItemId::IronDagger, "");
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].lp, 18);
        assert!(!top[0].is_player);
        assert!(top[1].is_player);
        assert_eq!(top[1].name, "You");
        assert_eq!(top[0].movement, Trend::Up);
        assert_eq!(top[4].movement, Trend::Flat);
        assert_eq!(league.placement_for(18), 1);
    }

    #[test]
    fn weekly_event_is_stable_per_week() {
        let first = WeeklyEvent::for_week("2024-W1");
        assert_eq!(first, WeeklyEvent::for_week("2024-W1"));
        // seeded_float("2024-W1") is ~0.106, the first quarter.
        assert_eq!(first, WeeklyEvent::None);
    }
}
