//! Birthday Scene entry point
//!
//! The browser build is driven from JavaScript through `platform::web`.
//! Natively this runs the scene headless at 60 Hz with a scripted guest
//! and logs what happens.
//!
//! Usage: `birthday-scene [config.json] [--wait]`
//! `--wait` lets the countdown blow the candles instead of the guest.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    env_logger::init();
    log::info!("Birthday scene (native) starting...");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let wait = args.iter().any(|a| a == "--wait");
    let config = match args.iter().find(|a| !a.starts_with("--")) {
        Some(path) => match std::fs::read_to_string(path) {
            Ok(json) => birthday_scene::SceneConfig::from_json_or_default(&json),
            Err(err) => {
                log::warn!("Could not read {}: {}, using defaults", path, err);
                birthday_scene::SceneConfig::default()
            }
        },
        None => birthday_scene::SceneConfig::default(),
    };

    headless::run(config, wait);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::start, this is just to satisfy the compiler
}

#[cfg(not(target_arch = "wasm32"))]
mod headless {
    use birthday_scene::SceneConfig;
    use birthday_scene::sim::{SceneController, SceneEvent, ScenePhase};

    const FRAME_MS: f64 = 1000.0 / 60.0;
    /// Give up after this long even if the celebration never finishes
    const MAX_RUN_MS: f64 = 180_000.0;
    /// Guest waits this long after the intro before blowing
    const GUEST_PAUSE_MS: f64 = 2000.0;

    pub fn run(config: SceneConfig, wait: bool) {
        let mut scene = SceneController::new(config);
        let mut elapsed = 0.0;
        let mut intro_done_at: Option<f64> = None;
        let mut blown_at: Option<f64> = None;

        while elapsed < MAX_RUN_MS {
            elapsed += FRAME_MS;
            scene.tick(elapsed, FRAME_MS);

            for event in scene.drain_events() {
                log::info!("[{:>8.0}ms] {:?}", elapsed, event);
                match event {
                    SceneEvent::IntroComplete { .. } => intro_done_at = Some(elapsed),
                    SceneEvent::CandlesBlown { .. } => blown_at = Some(elapsed),
                    _ => {}
                }
            }

            if !wait {
                if let Some(at) = intro_done_at {
                    if scene.phase() == ScenePhase::AwaitingWish && elapsed - at >= GUEST_PAUSE_MS {
                        scene.blow();
                    }
                }
            }

            // Stop once the last smoke has cleared
            if blown_at.is_some() && scene.particles().smoke_bursts().is_empty() {
                break;
            }
        }

        let snapshot = scene.snapshot();
        println!("\nSeed:      {}", scene.seed());
        println!("Phase:     {:?}", snapshot.phase);
        println!("Ran for:   {:.1}s", elapsed / 1000.0);
        println!(
            "Candles:   {}/{} lit",
            snapshot.candles_lit.iter().filter(|&&lit| lit).count(),
            snapshot.candles_lit.len()
        );
        println!("Confetti:  {} pieces", snapshot.confetti.len());
        println!("Countdown: {}s left", snapshot.countdown.remaining_seconds);

        scene.dispose();
    }
}
