//! Demo session: replays a scripted provider sequence through a tracker
//! and prints each arbitration outcome.
//!
//! Run with RUST_LOG=bestfix=debug to see the per-decision log lines.

use bestfix::{
    FixTracker, LocationFix, MockLocationSource, TrackerConfig, TrackerEvent,
};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // A short walk: bootstrap fix, an update storm, a better fix, genuine
    // movement, and finally a stale-override after a gap in coverage.
    let script = vec![
        LocationFix::new(0, 60.0, "network", 47.60620, -122.33210),
        LocationFix::new(4_000, 15.0, "network", 47.60621, -122.33211),
        LocationFix::new(15_000, 12.0, "satellite", 47.60622, -122.33209),
        LocationFix::new(30_000, 12.0, "satellite", 47.60650, -122.33190),
        LocationFix::new(45_000, 400.0, "network", 47.60651, -122.33191),
        LocationFix::new(200_000, 350.0, "network", 47.60700, -122.33100),
    ];

    let mut tracker = FixTracker::new(TrackerConfig::default())?;
    tracker.attach_source(Box::new(MockLocationSource::with_script("platform", script)))?;

    tracker.register_event_callback(Box::new(|event| match event {
        TrackerEvent::FixAccepted {
            fix,
            reason,
            displacement_m,
        } => {
            let moved = displacement_m
                .map(|d| format!("{:.1} m from previous", d))
                .unwrap_or_else(|| "first fix".to_string());
            println!(
                "ACCEPT [{:?}] {} @ ({:.5}, {:.5}) ±{} m ({})",
                reason, fix.provider, fix.latitude, fix.longitude, fix.accuracy_m, moved
            );
        }
        TrackerEvent::FixRejected { provider, reason } => {
            println!("reject [{:?}] from {}", reason, provider);
        }
        TrackerEvent::SourceUnhealthy { provider, error } => {
            println!("source {} unhealthy: {}", provider, error);
        }
    }));

    tracker.start()?;
    while tracker.pump()? > 0 {}

    let state = tracker.state();
    println!(
        "\nsession: {} evaluated, {} accepted, {} rejected",
        state.fixes_evaluated, state.fixes_accepted, state.fixes_rejected
    );
    if let Some(best) = tracker.current_best() {
        println!(
            "best fix: {} @ ({:.5}, {:.5}) ±{} m",
            best.provider, best.latitude, best.longitude, best.accuracy_m
        );
    }

    Ok(())
}
