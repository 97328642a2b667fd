//! End-to-end runs of the celebration through the public controller API

use birthday_scene::SceneConfig;
use birthday_scene::sim::{SceneController, SceneEvent, ScenePhase};

fn scene() -> SceneController {
    SceneController::new(SceneConfig::default().with_seed(42))
}

fn count(events: &[SceneEvent], pred: impl Fn(&SceneEvent) -> bool) -> usize {
    events.iter().filter(|&e| pred(e)).count()
}

fn run_frames(scene: &mut SceneController, until_ms: f64, step_ms: f64) -> Vec<SceneEvent> {
    let mut t = scene.state().elapsed_ms;
    let mut events = Vec::new();
    while t < until_ms {
        t = (t + step_ms).min(until_ms);
        scene.tick(t, step_ms);
        events.extend(scene.drain_events());
    }
    events
}

#[test]
fn test_countdown_blows_exactly_once() {
    let mut scene = scene();
    let mut events = Vec::new();
    for second in 1..=60 {
        scene.tick(second as f64 * 1000.0, 1000.0);
        events.extend(scene.drain_events());
    }
    assert_eq!(scene.state().countdown.remaining_seconds, 0);
    assert!(!scene.state().countdown.active);
    assert_eq!(
        count(&events, |e| matches!(e, SceneEvent::CascadeStarted { automatic: true, .. })),
        1
    );

    // A late manual blow races the auto-fire and loses
    assert!(!scene.blow());
    events.extend(run_frames(&mut scene, 65_000.0, 1000.0));
    assert_eq!(count(&events, |e| matches!(e, SceneEvent::CascadeStarted { .. })), 1);
    assert_eq!(count(&events, |e| matches!(e, SceneEvent::CandlesBlown { .. })), 1);
    assert_eq!(scene.phase(), ScenePhase::Celebrating);
}

#[test]
fn test_manual_blow_at_thirty_seconds() {
    let mut scene = scene();
    let mut events = run_frames(&mut scene, 30_000.0, 1000.0);
    assert_eq!(scene.state().countdown.remaining_seconds, 30);

    assert!(scene.blow());
    events.extend(scene.drain_events());
    events.extend(run_frames(&mut scene, 120_000.0, 1000.0));

    assert!(!scene.state().countdown.active);
    assert_eq!(scene.state().countdown.remaining_seconds, 30);
    assert_eq!(count(&events, |e| matches!(e, SceneEvent::CountdownExpired { .. })), 0);
    assert_eq!(
        count(&events, |e| matches!(e, SceneEvent::CascadeStarted { automatic: false, .. })),
        1
    );
    assert_eq!(count(&events, |e| matches!(e, SceneEvent::CandlesBlown { .. })), 1);
}

#[test]
fn test_intro_complete_independent_of_frame_rate() {
    let mut coarse = scene();
    let total = coarse.camera().total_duration_ms();
    coarse.tick(total, total);
    let coarse_events = coarse.drain_events();

    let mut fine = scene();
    let fine_events = run_frames(&mut fine, total, 7.0);

    assert_eq!(coarse.state().camera, fine.state().camera);
    assert_eq!(coarse.state().camera, coarse.camera().final_viewpoint());
    for events in [&coarse_events, &fine_events] {
        assert_eq!(count(events, |e| matches!(e, SceneEvent::IntroComplete { .. })), 1);
    }
}

#[test]
fn test_skip_intro_twice() {
    let mut scene = scene();
    run_frames(&mut scene, 1500.0, 16.0);
    assert!(scene.skip_intro());
    assert!(!scene.skip_intro());
    let events = scene.drain_events();
    assert_eq!(count(&events, |e| matches!(e, SceneEvent::IntroComplete { skipped: true, .. })), 1);
    assert_eq!(scene.state().camera, scene.camera().final_viewpoint());
    assert_eq!(scene.phase(), ScenePhase::AwaitingWish);
}

#[test]
fn test_full_celebration() {
    let mut scene = scene();
    let mut events = run_frames(&mut scene, 8000.0, 16.0);
    assert_eq!(scene.phase(), ScenePhase::AwaitingWish);

    assert!(scene.blow());
    events.extend(scene.drain_events());
    events.extend(run_frames(&mut scene, 10_000.0, 16.0));

    assert_eq!(scene.phase(), ScenePhase::Celebrating);
    assert!(scene.state().candles.iter().all(|c| !c.lit));
    assert_eq!(count(&events, |e| matches!(e, SceneEvent::SmokeSpawned { .. })), 5);

    let snapshot = scene.snapshot();
    assert_eq!(snapshot.confetti.len(), 80);
    assert!(snapshot.orbit.is_some());

    // Smoke clears, confetti keeps falling forever
    events.extend(run_frames(&mut scene, 20_000.0, 16.0));
    assert!(scene.particles().smoke_bursts().is_empty());
    assert_eq!(scene.snapshot().confetti.len(), 80);
}

#[test]
fn test_same_seed_same_run() {
    let drive = || {
        let mut scene = scene();
        let mut events = run_frames(&mut scene, 8000.0, 16.0);
        scene.blow();
        events.extend(run_frames(&mut scene, 12_000.0, 16.0));
        (events, scene.particles().confetti().to_vec())
    };
    assert_eq!(drive(), drive());
}

#[test]
fn test_candle_count_from_age() {
    let config = SceneConfig {
        candle_count: None,
        person_age: 21,
        ..SceneConfig::default().with_seed(1)
    };
    let mut scene = SceneController::new(config);
    scene.skip_intro();
    scene.blow();
    run_frames(&mut scene, 6000.0, 16.0);
    assert_eq!(scene.state().candles.len(), 21);
    assert!(scene.state().candles.iter().all(|c| !c.lit));
    assert_eq!(scene.phase(), ScenePhase::Celebrating);
}

#[test]
fn test_dispose_mid_cascade() {
    let mut scene = scene();
    scene.skip_intro();
    scene.blow();
    run_frames(&mut scene, 250.0, 16.0);
    scene.dispose();

    let lit_before = scene.state().lit_count();
    assert!(!scene.tick(10_000.0, 16.0));
    assert_eq!(scene.state().lit_count(), lit_before);
    assert_eq!(scene.effects().pending_timers(), 0);
}
