//! Single-day ladder step.
//!
//! [`process_day`] is pure: it reads the previous [`RankState`] and returns a
//! new one together with the LP delta and a breakdown of how it was composed.

use serde::{Deserialize, Serialize};

use crate::calendar::CalendarDate;
use crate::config::{LadderConfig, TierRule};
use crate::data::{DailyLog, QuestRewards, UserProfile};
use crate::numbers::scale_floor;
use crate::skills::{SkillId, Skills};
use crate::state::{RankState, Series};
use crate::tiers::Division;

/// Everything a day step needs besides the previous state.
#[derive(Debug, Clone, Copy)]
pub struct DayInput<'a> {
    pub date: CalendarDate,
    pub log: Option<&'a DailyLog>,
    pub profile: &'a UserProfile,
    /// Rewards from claims dated this day.
    pub extra: QuestRewards,
    pub skills: &'a Skills,
    /// Shields already spent in the current ISO week.
    pub weekly_shields_used: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DayResult {
    Win,
    Loss,
    /// A missed day that still paid out quest CP or essence without moving LP.
    Quest,
    Shielded,
}

/// How a day's LP delta was composed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayBreakdown {
    /// Tier win value on a win, decay on an unshielded miss.
    pub base: i32,
    /// Momentum and Recovery skill LP.
    pub bonus: i32,
    pub streak: i32,
    /// Boss encounters pay CP and essence through claims, so this stays zero.
    pub boss: i32,
    pub quest_lp: i32,
    pub pending_lp_applied: i32,
    pub shield_used: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DayOutcome {
    pub state: RankState,
    pub lp_change: i32,
    pub result: DayResult,
    pub details: DayBreakdown,
}

/// Advance `current` by one calendar day.
#[must_use]
pub fn process_day(config: &LadderConfig, current: &RankState, input: &DayInput<'_>) -> DayOutcome {
    let mut state = current.clone();
    let rule = *config.rule(state.tier);
    let won = input.log.is_some_and(DailyLog::is_ranked_win);
    let mut details = DayBreakdown::default();

    let (lp_change, mut result) = if won {
        let lp = apply_win(config, &rule, &mut state, current, input, &mut details);
        (lp, DayResult::Win)
    } else {
        apply_miss(config, &rule, &mut state, input, &mut details)
    };

    let extra_currency = input.extra.cp > 0 || input.extra.essence > 0;
    if result == DayResult::Loss && extra_currency && lp_change == 0 {
        result = DayResult::Quest;
    }

    match state.series {
        Some(series) => resolve_series(config, &rule, &mut state, series, result),
        None => apply_lp(config, &rule, &mut state, lp_change),
    }

    regenerate_shields(config, &mut state, current, input.skills, won);
    state.record_high_water_mark();

    let promote_at = config.rule(state.tier).promote_at;
    debug_assert!(
        (0..=promote_at).contains(&state.lp),
        "LP {} outside [0, {promote_at}] after {}",
        state.lp,
        input.date
    );
    state.lp = state.lp.clamp(0, promote_at);

    log::debug!(
        "{}: {:?} {:+} LP -> {}",
        input.date,
        result,
        lp_change,
        state.snapshot_label()
    );

    DayOutcome {
        state,
        lp_change,
        result,
        details,
    }
}

fn apply_win(
    config: &LadderConfig,
    rule: &TierRule,
    state: &mut RankState,
    previous: &RankState,
    input: &DayInput<'_>,
    details: &mut DayBreakdown,
) -> i32 {
    let skills = input.skills;
    state.total_days_logged += 1;
    state.streak += 1;

    let mut bonus = 0;
    if state.streak >= config.streak.momentum_days {
        bonus += skill_lp(skills, SkillId::Momentum);
    }
    if previous.streak == 0 {
        bonus += 2 * skill_lp(skills, SkillId::Recovery);
    }
    details.base = rule.base_win;
    details.bonus = bonus;

    let mut streak_bonus = config.streak.bonus_for(state.streak);
    if state.tier.is_apex() {
        streak_bonus /= 2;
    }
    details.streak = streak_bonus;

    let pending = state.pending_quest_lp.max(0);
    details.pending_lp_applied = pending;
    state.pending_quest_lp = 0;

    details.quest_lp = input.extra.lp;

    let currency = &config.currency;
    let log = input.log;
    let mut cp_gain = currency.base_cp;
    if log.and_then(|l| l.steps).unwrap_or(0.0) >= input.profile.goals.steps() {
        cp_gain += currency.goal_cp;
    }
    if log.and_then(|l| l.sleep_hours).unwrap_or(0.0) >= input.profile.goals.sleep() {
        cp_gain += currency.goal_cp;
    }
    if log.and_then(|l| l.weight_kg).is_some_and(|kg| kg != 0.0) {
        cp_gain += currency.weight_cp;
    }
    cp_gain += state.loadout.cp_bonus();
    let cp_gain = scale_floor(cp_gain, skill_multiplier(config, skills, SkillId::TreasureHunter));

    let essence_gain = scale_floor(
        currency.base_essence,
        skill_multiplier(config, skills, SkillId::EssenceMagnet),
    );

    state.cp = state.cp.saturating_add(cp_gain).saturating_add(input.extra.cp);
    state.essence = state
        .essence
        .saturating_add(essence_gain)
        .saturating_add(input.extra.essence)
        .saturating_add(state.loadout.essence_bonus());

    rule.base_win
        .saturating_add(bonus)
        .saturating_add(streak_bonus)
        .saturating_add(pending)
        .saturating_add(input.extra.lp)
}

fn apply_miss(
    config: &LadderConfig,
    rule: &TierRule,
    state: &mut RankState,
    input: &DayInput<'_>,
    details: &mut DayBreakdown,
) -> (i32, DayResult) {
    state.streak = 0;
    if input.extra.lp > 0 {
        state.pending_quest_lp = state.pending_quest_lp.saturating_add(input.extra.lp);
    }
    state.cp = state.cp.saturating_add(input.extra.cp);
    state.essence = state.essence.saturating_add(input.extra.essence);

    let weekly_allows = config
        .shields
        .weekly_cap
        .is_none_or(|cap| input.weekly_shields_used < cap);
    if state.shields > 0 && weekly_allows {
        state.shields -= 1;
        details.shield_used = true;
        return (0, DayResult::Shielded);
    }

    let reduction =
        skill_lp(input.skills, SkillId::IronWill) + skill_lp(input.skills, SkillId::SteadyHands);
    let decay = (rule.base_loss + reduction).min(0);
    details.base = decay;
    (decay, DayResult::Loss)
}

/// Series mode: LP is frozen at the threshold and only wins and losses count.
fn resolve_series(
    config: &LadderConfig,
    rule: &TierRule,
    state: &mut RankState,
    mut series: Series,
    result: DayResult,
) {
    match result {
        DayResult::Win => {
            series.wins += 1;
            if series.is_won() {
                promote_tier(config, state);
                return;
            }
        }
        DayResult::Loss => {
            series.losses += 1;
            if series.is_lost() {
                log::debug!("{} promotion series lost", state.tier);
                state.series = None;
                state.lp = (rule.promote_at - config.series_abort_offset).max(0);
                return;
            }
        }
        DayResult::Quest | DayResult::Shielded => {}
    }
    state.series = Some(series);
}

fn apply_lp(config: &LadderConfig, rule: &TierRule, state: &mut RankState, lp_change: i32) {
    let new_lp = state.lp.saturating_add(lp_change);
    if new_lp >= rule.promote_at {
        promote(config, rule, state, new_lp);
    } else if new_lp < 0 {
        demote(config, rule, state);
    } else {
        state.lp = new_lp;
    }
}

/// Threshold reached. The next tier's day gate and any series gate apply to
/// every division of the current tier, ahead of the division step.
fn promote(config: &LadderConfig, rule: &TierRule, state: &mut RankState, new_lp: i32) {
    let Some(next_tier) = state.tier.next() else {
        state.lp = new_lp.min(rule.promote_at);
        return;
    };

    let next_rule = config.rule(next_tier);
    if state.total_days_logged < next_rule.min_days {
        log::debug!(
            "{next_tier} needs {} ranked days, have {}",
            next_rule.min_days,
            state.total_days_logged
        );
        state.lp = rule.promote_at - 1;
        return;
    }

    if let Some(gate) = config.series_gate(state.tier) {
        state.lp = rule.promote_at;
        state.series = Some(Series::new(gate.target_wins, gate.loss_allowance));
        return;
    }

    match state.division.and_then(Division::up) {
        Some(up) if rule.has_divisions => {
            state.division = Some(up);
            state.lp = 0;
        }
        _ => promote_tier(config, state),
    }
}

fn promote_tier(config: &LadderConfig, state: &mut RankState) {
    if let Some(next) = state.tier.next() {
        state.tier = next;
        state.division = config.rule(next).has_divisions.then_some(Division::BOTTOM);
        state.lp = 0;
        state.series = None;
    }
}

fn demote(config: &LadderConfig, rule: &TierRule, state: &mut RankState) {
    if rule.has_divisions
        && let Some(down) = state.division.and_then(Division::down)
    {
        state.division = Some(down);
        state.lp = config.demotion_lp.min(rule.promote_at);
        return;
    }
    match state.tier.prev() {
        Some(prev) => {
            let prev_rule = config.rule(prev);
            state.tier = prev;
            state.division = prev_rule.has_divisions.then_some(Division::TOP);
            state.lp = config.demotion_lp.min(prev_rule.promote_at);
        }
        None => state.lp = 0,
    }
}

fn regenerate_shields(
    config: &LadderConfig,
    state: &mut RankState,
    previous: &RankState,
    skills: &Skills,
    won: bool,
) {
    let shields = &config.shields;
    let crossed = |step: i64| state.cp.div_euclid(step) > previous.cp.div_euclid(step);
    if skills.has(SkillId::MilestoneBoost) {
        if crossed(shields.boosted_milestone_cp) {
            state.shields += 1;
        }
    } else if won && state.cp > 0 && crossed(shields.milestone_cp) {
        state.shields = (state.shields + 1).min(shields.cap);
    }
}

fn skill_lp(skills: &Skills, id: SkillId) -> i32 {
    i32::try_from(skills.level(id)).unwrap_or(i32::MAX)
}

fn skill_multiplier(config: &LadderConfig, skills: &Skills, id: SkillId) -> f64 {
    1.0 + f64::from(skills.level(id)) * config.currency.skill_step
}
