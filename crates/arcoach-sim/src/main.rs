//! Arcoach demo runner entry point.
//!
//! Replays a scripted detection sequence through the full controller
//! stack: splash, reference scan, a wrong tool, the retry pause, the
//! correct tool, the post-solve reference scan, and completion. Commands
//! land on a console surface as log lines.

use std::error::Error;
use std::thread;
use std::time::Duration as StdDuration;

use arcoach_core::clock::SystemClock;
use arcoach_core::geometry::{Point3, Pose};
use arcoach_core::rng::OsSeededRng;
use arcoach_scenario::application::controller::SessionController;
use arcoach_scenario::application::surface::OrchestrationSurface;
use arcoach_scenario::domain::marker::RawDetection;
use arcoach_scenario::domain::narration::AudioCue;
use arcoach_scenario::domain::session::{ScenarioConfig, ScenarioSession};
use chrono::Duration;
use tracing_subscriber::EnvFilter;

mod playback;

use playback::{ClipBank, ConsoleSurface};

fn main() -> Result<(), Box<dyn Error>> {
    // Initialize tracing subscriber.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    tracing::info!("Starting arcoach demo runner");

    // Read configuration from environment. Short defaults keep the demo
    // brisk; production pacing is 5s/10s.
    let splash_secs: i64 = std::env::var("ARCOACH_SPLASH_SECS")
        .unwrap_or_else(|_| "2".to_string())
        .parse()
        .map_err(|e| format!("ARCOACH_SPLASH_SECS must be an integer: {e}"))?;
    let retry_secs: i64 = std::env::var("ARCOACH_RETRY_SECS")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .map_err(|e| format!("ARCOACH_RETRY_SECS must be an integer: {e}"))?;

    let mut config = ScenarioConfig::default();
    config.splash_delay = Duration::seconds(splash_secs);
    config.re_enable_delay = Duration::seconds(retry_secs);
    config.completion_delay = Duration::seconds(retry_secs);
    config.reassembly_anchor = Pose::at(Point3::new(0.0, 0.0, -2.0));

    let surface = ConsoleSurface::new(demo_clip_bank()?, OsSeededRng::new());
    let mut controller =
        SessionController::new(ScenarioSession::new(config), surface, Box::new(SystemClock));

    controller.restart();
    run_for(&mut controller, splash_secs);

    controller.handle_detection(detection("Mocap"))?;
    controller.try_again();

    controller.handle_detection(detection("Brake-fan gauge"))?;
    run_for(&mut controller, retry_secs);

    controller.handle_detection(detection("Standard Wrench"))?;
    controller.handle_detection(detection("Mocap"))?;

    controller.complete_training();
    run_for(&mut controller, retry_secs);

    tracing::info!(stage = ?controller.session().stage(), "demo finished");
    Ok(())
}

/// Pumps the controller for `secs` seconds of wall time, one frame per
/// 100ms, so delayed effects come due.
fn run_for<S: OrchestrationSurface>(controller: &mut SessionController<S>, secs: i64) {
    let frames = secs * 10 + 1;
    for _ in 0..frames {
        thread::sleep(StdDuration::from_millis(100));
        controller.pump();
    }
}

fn detection(text: &str) -> RawDetection {
    RawDetection {
        text: text.to_owned(),
        corners: vec![
            Point3::new(-0.05, 0.05, -0.5),
            Point3::new(0.05, 0.05, -0.5),
            Point3::new(0.05, -0.05, -0.5),
            Point3::new(-0.05, -0.05, -0.5),
        ],
    }
}

fn demo_clip_bank() -> Result<ClipBank, Box<dyn Error>> {
    let mut bank = ClipBank::new();
    bank.register(AudioCue::Intro, "narration/intro", 1.0)?;
    bank.register(AudioCue::BgMusic, "music/bed", 0.4)?;
    bank.register(AudioCue::ToolSelect, "narration/tool_select", 1.0)?;
    bank.register(AudioCue::Reassembly, "narration/reassembly", 1.0)?;
    bank.register(AudioCue::WrongAnswerA, "narration/brake_fan_gauge", 1.0)?;
    bank.register(AudioCue::WrongAnswerB, "narration/torque_wrench", 1.0)?;
    bank.register(AudioCue::CorrectAnswer, "narration/standard_wrench", 1.0)?;
    bank.register(AudioCue::WrongAnswerFx, "fx/buzz", 0.9)?;
    bank.register(AudioCue::WrongAnswerFx, "fx/buzz_alt", 0.9)?;
    bank.register(AudioCue::CorrectAnswerFx, "fx/chime", 0.9)?;
    bank.register(AudioCue::Completion, "narration/completion", 1.0)?;
    Ok(bank)
}
