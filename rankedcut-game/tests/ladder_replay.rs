use rankedcut_game::{
    BadgeId, BossStatus, CalendarDate, CarryOver, DailyLog, DayInput, DayResult, Division,
    LadderConfig, LadderEngine, QuestClaim, QuestRewards, RankState, ReplayInputs, ReplayOutcome,
    SkillId, Skills, Tier, UserProfile, process_day, recompute_history, seeded_float,
};

const SAMPLE_SAVE: &str = include_str!("fixtures/sample_save.json");

fn day(text: &str) -> CalendarDate {
    CalendarDate::parse(text).unwrap()
}

fn ranked_days(start: &str, count: usize) -> Vec<DailyLog> {
    day(start)
        .through(day("2099-12-31"))
        .take(count)
        .map(|date| DailyLog::ranked(&date.to_string(), 2000.0))
        .collect()
}

fn replay(logs: &[DailyLog], claims: &[QuestClaim], today: &str) -> ReplayOutcome {
    replay_from(logs, claims, &CarryOver::default(), today)
}

fn replay_from(
    logs: &[DailyLog],
    claims: &[QuestClaim],
    carry: &CarryOver,
    today: &str,
) -> ReplayOutcome {
    let profile = UserProfile::default();
    let skills = Skills::new();
    let inputs = ReplayInputs {
        logs,
        profile: Some(&profile),
        claims,
        achievement_claims: &[],
        skills: &skills,
        carry_over: carry,
        today: day(today),
    };
    recompute_history(&LadderConfig::default(), &inputs).unwrap()
}

/// Roughly two thirds of days logged, chosen by the date-seeded generator.
fn patchy_logs(start: &str, days: usize) -> Vec<DailyLog> {
    day(start)
        .through(day("2099-12-31"))
        .take(days)
        .filter(|date| seeded_float(&format!("{date}patchy")) < 0.66)
        .map(|date| DailyLog::ranked(&date.to_string(), 2000.0))
        .collect()
}

#[test]
fn sample_save_replays_deterministically() {
    let engine = LadderEngine::load_snapshot(SAMPLE_SAVE).unwrap();
    let first = engine.recompute(day("2024-02-20")).unwrap();
    let second = engine.recompute(day("2024-02-20")).unwrap();
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());

    let league = first.league.as_ref().unwrap();
    assert_eq!(league.rivals.len(), 19);
    assert_eq!(league.last_simulated_date, day("2024-02-20"));
    assert!(league.user_placement_history.len() <= 7);
    assert!(first.state.unlocked_badges.contains(BadgeId::EarlyBird));
    assert!(!first.history.is_empty());
}

#[test]
fn recompute_from_own_carry_over_is_stable() {
    let logs = patchy_logs("2024-05-01", 45);
    let claims = [QuestClaim::new(
        "dq_cal_log_2024-05-03",
        day("2024-05-03"),
        QuestRewards {
            lp: 2,
            cp: 40,
            essence: 15,
        },
    )];
    let first = replay(&logs, &claims, "2024-06-20");
    let second = replay_from(&logs, &claims, &first.state.carry_over(), "2024-06-20");
    assert_eq!(first, second);
    assert_eq!(first.fingerprint(), second.fingerprint());
    assert_eq!(second.state.carry_over(), first.state.carry_over());
}

#[test]
fn independent_engines_agree() {
    let a = LadderEngine::load_snapshot(SAMPLE_SAVE).unwrap();
    let b = LadderEngine::load_snapshot(SAMPLE_SAVE).unwrap();
    let today = day("2024-03-01");
    assert_eq!(
        a.recompute(today).unwrap().fingerprint(),
        b.recompute(today).unwrap().fingerprint()
    );
}

#[test]
fn five_straight_wins_reach_iron_three() {
    let out = replay(&ranked_days("2024-01-01", 5), &[], "2024-01-05");
    let deltas: Vec<i32> = out.history.iter().map(|entry| entry.lp_change).collect();
    assert_eq!(deltas, [20, 20, 20, 20, 20]);
    assert_eq!(out.history[3].rank_snapshot, "Iron IV 80 LP");
    assert_eq!(out.history[4].rank_snapshot, "Iron III 0 LP");
    assert_eq!((out.state.tier, out.state.division), (Tier::Iron, Some(Division::III)));
}

#[test]
fn seventh_straight_win_dates_the_streak_badge() {
    let out = replay(&ranked_days("2024-03-04", 9), &[], "2024-03-12");
    let badge = out.state.unlocked_badges.get(BadgeId::Streak7).unwrap();
    assert_eq!(badge.date, day("2024-03-10"));
}

#[test]
fn lp_stays_in_bounds_and_streak_tracks_results() {
    let config = LadderConfig::default();
    let profile = UserProfile::default();
    let skills = Skills::new()
        .with(SkillId::Momentum, 3)
        .with(SkillId::Recovery, 2)
        .with(SkillId::TreasureHunter, 2);
    let logs = patchy_logs("2024-01-01", 400);
    let mut state = RankState::initial();
    state.total_days_logged = 100;

    for date in day("2024-01-01").through(day("2025-02-03")) {
        let key = date.to_string();
        let log = logs.iter().find(|log| log.date == key);
        let input = DayInput {
            date,
            log,
            profile: &profile,
            extra: QuestRewards::default(),
            skills: &skills,
            weekly_shields_used: 0,
        };
        let out = process_day(&config, &state, &input);
        let promote_at = config.rule(out.state.tier).promote_at;
        assert!(
            (0..=promote_at).contains(&out.state.lp),
            "{date}: {} out of bounds",
            out.state.snapshot_label()
        );
        match out.result {
            DayResult::Win => assert_eq!(out.state.streak, state.streak + 1),
            _ => assert_eq!(out.state.streak, 0),
        }
        if state.shields > 0 && log.is_none() {
            assert_eq!(out.result, DayResult::Shielded);
            assert_eq!(out.state.shields, state.shields - 1);
        }
        assert!(out.state.highest_rank >= out.state.position());
        state = out.state;
    }
    assert!(state.tier > Tier::Iron);
}

#[test]
fn decay_is_never_positive_at_any_tier() {
    let config = LadderConfig::default();
    let profile = UserProfile::default();
    let skills = Skills::new()
        .with(SkillId::IronWill, 3)
        .with(SkillId::SteadyHands, 2);
    for tier in Tier::ALL {
        let state = RankState {
            tier,
            division: config.rule(tier).has_divisions.then_some(Division::II),
            lp: 50,
            ..RankState::initial()
        };
        let input = DayInput {
            date: day("2024-05-05"),
            log: None,
            profile: &profile,
            extra: QuestRewards::default(),
            skills: &skills,
            weekly_shields_used: 0,
        };
        let out = process_day(&config, &state, &input);
        assert!(out.lp_change <= 0, "{tier} gained LP on a miss");
        assert!(out.details.base <= 0);
    }
}

#[test]
fn repeated_claims_do_not_stack() {
    let logs = ranked_days("2024-01-01", 3);
    let claim = QuestClaim::new(
        "dq_cal_log_2024-01-02",
        day("2024-01-02"),
        QuestRewards {
            lp: 1,
            cp: 10,
            essence: 20,
        },
    );
    let once = replay(&logs, std::slice::from_ref(&claim), "2024-01-03");
    let thrice = replay(&logs, &[claim.clone(), claim.clone(), claim], "2024-01-03");
    assert_eq!(once, thrice);
    assert_eq!(once.state.lp, 61);
}

#[test]
fn first_saturday_log_defeats_the_boss_once() {
    // 2024-06-01 is the first Saturday of June.
    let logs = ranked_days("2024-05-30", 4);
    let out = replay(&logs, &[], "2024-06-02");
    assert_eq!(out.state.boss_state.status, BossStatus::Completed);
    assert_eq!(out.state.boss_state.month_key, "2024-06");
    assert_eq!(out.state.unlocked_badges.boss_kills(), 1);

    let again = replay(&logs, &[], "2024-06-02");
    assert_eq!(again.state.unlocked_badges.boss_kills(), 1);
    assert_eq!(out, again);
}

#[test]
fn missed_boss_day_fails_once_elapsed() {
    let logs = ranked_days("2024-05-30", 2);
    let pending = replay(&logs, &[], "2024-06-01");
    assert_eq!(pending.state.boss_state.status, BossStatus::Active);
    let failed = replay(&logs, &[], "2024-06-02");
    assert_eq!(failed.state.boss_state.status, BossStatus::Failed);
    assert_eq!(failed.state.unlocked_badges.boss_kills(), 0);
}

#[test]
fn outcome_depends_only_on_inputs() {
    let logs = patchy_logs("2024-02-01", 60);
    let early = replay(&logs, &[], "2024-04-15");
    let late = replay(&logs, &[], "2024-04-15");
    assert_eq!(early.fingerprint(), late.fingerprint());
    let further = replay(&logs, &[], "2024-04-16");
    assert_ne!(early.fingerprint(), further.fingerprint());
}
