use std::rc::Rc;

use glam::Vec2;

use petcat::actions::{corner_farthest_from, CATCH_DISTANCE, CHASE_SPEED};
use petcat::behavior::scoring::NO_TOY_SCORE_CAP;
use petcat::{
    ActionContext, ActionProbabilityCalculator, BehaviorConfig, Cat, CatAction, CatSnapshot,
    ExternalState, GameTimeManager, InternalState, ManualClock, Personality, Preferences,
    SharedTime,
};

const EPS: f32 = 1e-5;

fn manual_time() -> (ManualClock, SharedTime) {
    let clock = ManualClock::new();
    let time = GameTimeManager::new(clock.clone()).into_shared();
    (clock, time)
}

fn cat_with(
    internal: InternalState,
    calculator: Rc<ActionProbabilityCalculator>,
    time: SharedTime,
) -> Cat {
    Cat::new(
        "Tanuki",
        internal,
        Personality::default(),
        Preferences::default(),
        calculator,
        time,
    )
}

fn only_action(name: &str) -> Rc<ActionProbabilityCalculator> {
    let mut config = BehaviorConfig::default();
    config.actions.retain(|action, _| action == name);
    Rc::new(ActionProbabilityCalculator::new(config))
}

#[test]
fn frightened_stranger_prefers_running() {
    let calc = ActionProbabilityCalculator::default();
    let internal = InternalState::default();
    let external = ExternalState::default();
    assert!(!external.toy_presence());
    assert!(external.user_presence());

    let scores = calc.calculate_action_scores(&internal, &external);
    assert!(scores["playWithToy"] <= NO_TOY_SCORE_CAP);

    let probs = calc.calculate_action_probabilities(&internal, &external);
    let mut ranked: Vec<_> = probs.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
    assert_eq!(ranked[0].0, "runAway");
    assert_eq!(ranked[1].0, "sit");

    let sum: f32 = probs.values().sum();
    assert!((sum - 1.0).abs() < EPS);
    for p in probs.values() {
        assert!(*p >= 0.05 - EPS);
    }
}

#[test]
fn cat_chases_toy_then_plays() {
    let (_clock, time) = manual_time();
    let mut cat = cat_with(InternalState::default(), only_action("playWithToy"), time);
    let external = ExternalState::default().with_toy(true, 200.0, None);

    let result = cat
        .update(external, 0.0, 0.0, Some(120.0), Some(160.0))
        .unwrap();
    let movement = result.movement.unwrap();
    assert_eq!(movement.delta, Some(Vec2::new(120.0, 160.0)));
    assert_eq!(movement.speed, Some(CHASE_SPEED));
    assert_eq!(movement.flip_x, Some(true));
    assert_eq!(movement.animation_commands[0].animation_key, "chase");

    // Left of the cat flips the other way.
    let left = CatAction::PlayWithToy.execute(&ActionContext::new(0.0, 0.0, Some(-200.0), Some(0.0)));
    assert_eq!(left.flip_x, Some(false));

    // Within catch range: stand still and play.
    let near = ExternalState::default().with_toy(true, 22.4, None);
    let result = cat
        .update(near, 100.0, 150.0, Some(120.0), Some(160.0))
        .unwrap();
    let movement = result.movement.unwrap();
    assert!(Vec2::new(20.0, 10.0).length() <= CATCH_DISTANCE);
    assert_eq!(movement.delta, Some(Vec2::ZERO));
    assert!(!movement.is_moving());
    assert_eq!(movement.animation_commands[0].animation_key, "play");
}

#[test]
fn fearful_cat_usually_recoils_from_petting() {
    let (_clock, time) = manual_time();
    let calc = Rc::new(ActionProbabilityCalculator::default());
    let start = InternalState::new(0.0, 0.0, 0.8).unwrap();

    let trials = 1_000;
    let mut drops = 0;
    for seed in 0..trials {
        let mut cat = cat_with(start, calc.clone(), time.clone()).with_seed(seed);
        cat.pet_by_user(1.0);
        let delta = cat.internal_state().bonding() - start.bonding();
        if delta != 0.0 {
            assert!((delta + 0.02).abs() < EPS, "unexpected delta {delta}");
            drops += 1;
        }
    }
    let rate = drops as f32 / trials as f32;
    assert!((0.62..0.78).contains(&rate), "drop rate {rate}");
}

#[test]
fn run_away_picks_farthest_corner() {
    // Centre is equidistant from all corners: first in order wins.
    assert_eq!(corner_farthest_from(Vec2::new(400.0, 300.0)), Vec2::new(50.0, 50.0));
    assert_eq!(corner_farthest_from(Vec2::new(600.0, 100.0)), Vec2::new(50.0, 550.0));
    assert_eq!(corner_farthest_from(Vec2::new(100.0, 500.0)), Vec2::new(750.0, 50.0));

    let ctx = ActionContext::new(200.0, 200.0, Some(400.0), Some(300.0));
    let movement = CatAction::RunAway.execute(&ctx);
    assert_eq!(movement.delta, Some(Vec2::new(-150.0, -150.0)));
    assert_eq!(movement.speed, Some(150.0));
    assert_eq!(movement.flip_x, Some(false));
    assert_eq!(movement.animation_commands[0].animation_key, "escape");
}

#[test]
fn snapshot_round_trip_preserves_behavior() {
    let (_clock, time) = manual_time();
    let calc = Rc::new(ActionProbabilityCalculator::default());
    let original = cat_with(
        InternalState::new(0.35, -0.2, 0.1).unwrap(),
        calc.clone(),
        time.clone(),
    );

    let json = serde_json::to_string(&original.snapshot()).unwrap();
    let snapshot: CatSnapshot = serde_json::from_str(&json).unwrap();
    let restored = Cat::from_snapshot("Tanuki", &snapshot, calc.clone(), time).unwrap();

    let a = original.internal_state();
    let b = restored.internal_state();
    assert!((a.bonding() - b.bonding()).abs() < EPS);
    assert!((a.playfulness() - b.playfulness()).abs() < EPS);
    assert!((a.fear() - b.fear()).abs() < EPS);
    assert_eq!(restored.personality(), original.personality());
    assert_eq!(restored.preferences(), original.preferences());
    assert_eq!(restored.name(), "Tanuki");

    let external = ExternalState::default().with_toy(true, 80.0, None);
    assert_eq!(
        calc.calculate_action_probabilities(&a, &external),
        calc.calculate_action_probabilities(&b, &external)
    );
}

#[test]
fn seeded_selection_is_reproducible() {
    let calc = ActionProbabilityCalculator::default();
    let internal = InternalState::new(0.2, 0.4, -0.3).unwrap();
    let external = ExternalState::default().with_toy(true, 150.0, None);
    let probs = calc.calculate_action_probabilities(&internal, &external);

    let picks = |seed| {
        let mut rng = fastrand::Rng::with_seed(seed);
        (0..50)
            .map(|_| calc.select_action(&probs, &mut rng))
            .collect::<Vec<_>>()
    };
    assert_eq!(picks(9), picks(9));
}

#[test]
fn actions_hold_for_their_duration() {
    let (clock, time) = manual_time();
    let calc = Rc::new(ActionProbabilityCalculator::default());
    let mut cat = cat_with(InternalState::default(), calc, time.clone()).with_seed(21);

    let mut switches = 0;
    for frame in 0..2_000 {
        clock.advance(if frame % 3 == 0 { 33.0 } else { 16.0 });
        let now = time.borrow().total_time();
        let before = cat.current_action().cloned();

        let result = cat.update(ExternalState::default(), 400.0, 300.0, None, None);
        assert!(result.is_some());
        let after = cat.current_action().cloned().unwrap();

        match before {
            Some(prev) if now - prev.start_time < prev.duration => {
                assert_eq!(after.name, prev.name);
                assert_eq!(after.start_time, prev.start_time);
            }
            _ => {
                assert_eq!(after.start_time, now);
                switches += 1;
            }
        }
        time.borrow_mut().update();
    }
    assert!(switches > 5);
}

#[test]
fn state_stays_in_bounds_under_random_play() {
    let (clock, time) = manual_time();
    let calc = Rc::new(ActionProbabilityCalculator::default());
    let mut cat = cat_with(InternalState::default(), calc, time.clone()).with_seed(77);
    let mut rng = fastrand::Rng::with_seed(1234);

    for _ in 0..10_000 {
        clock.advance(rng.f64() * 500.0);
        let toy = rng.bool();
        let external = ExternalState::new(toy, rng.f32() * 400.0, rng.bool(), rng.bool());
        let (tx, ty) = if toy {
            (Some(rng.f32() * 800.0), Some(rng.f32() * 600.0))
        } else {
            (None, None)
        };
        cat.update(external, rng.f32() * 800.0, rng.f32() * 600.0, tx, ty);
        if rng.u8(..) < 40 {
            cat.pet_by_user(rng.f32() * 10.0);
        }
        time.borrow_mut().update();

        let s = cat.internal_state();
        for v in [s.bonding(), s.playfulness(), s.fear()] {
            assert!((-1.0..=1.0).contains(&v), "out of range: {v}");
        }
        assert!(cat.bonding_level() <= 10);
    }
}

#[test]
fn probabilities_respect_floor_for_any_state() {
    let calc = ActionProbabilityCalculator::default();
    let mut rng = fastrand::Rng::with_seed(5);
    for _ in 0..500 {
        let internal = InternalState::clamped(
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
            rng.f32() * 2.0 - 1.0,
        );
        let external = ExternalState::new(rng.bool(), rng.f32() * 300.0, rng.bool(), rng.bool());
        let probs = calc.calculate_action_probabilities(&internal, &external);

        let sum: f32 = probs.values().sum();
        assert!((sum - 1.0).abs() < 1e-4);
        assert!(probs.values().all(|p| *p >= 0.05 - EPS));
        if !external.toy_presence() {
            let scores = calc.calculate_action_scores(&internal, &external);
            assert!(scores["playWithToy"] <= NO_TOY_SCORE_CAP);
        }
    }
}

#[test]
fn shipped_config_file_loads() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/assets/behavior.json");
    let config = BehaviorConfig::from_path(path).unwrap();
    assert_eq!(config, BehaviorConfig::default());
    assert!(ActionProbabilityCalculator::try_new(config).is_ok());
}
