use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::Instant;
use tracing::{debug, warn};

use crate::gain::{Smoother, TAU_ATTACK, TAU_RELEASE, target_gain_db};
use crate::messages::frontend_messages::CabinState;
use crate::surface::transport::StateTransport;

/// Fixed interval of the gain monitor poll
pub const MONITOR_PERIOD: Duration = Duration::from_millis(100);

/// Read-only consumer of the shared record: polls the state service, steps
/// the gain smoother and publishes the latest playback gain in dB on the
/// watch channel.
///
/// Never returns. A failed poll reuses the last known record, so the gain
/// keeps settling toward the stale target until the service comes back.
pub async fn gain_monitor(transport: Arc<dyn StateTransport>, gain_sender: watch::Sender<f64>) {
    let mut ticker = tokio::time::interval(MONITOR_PERIOD);
    let mut smoother = Smoother::new(0.0, TAU_ATTACK, TAU_RELEASE);
    let mut last_known = CabinState::default();
    let mut last_step = Instant::now();

    loop {
        match transport.fetch_state().await {
            Ok(state) => last_known = state,
            Err(err) => warn!("gain monitor poll failed, reusing last known record: {err}"),
        }

        let now = Instant::now();
        let dt = (now - last_step).as_secs_f64();
        last_step = now;

        let gain_db = smoother.step(target_gain_db(&last_known), dt);
        debug!(
            "cabin {:.1} dB / {:.1} km/h -> playback gain {:.2} dB",
            last_known.cabin_db, last_known.speed_kmh, gain_db
        );
        // Receivers may come and go
        gain_sender.send_replace(gain_db);

        ticker.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use tokio::time::sleep;

    use super::*;
    use crate::gain::GAIN_MIN_DB;
    use crate::messages::frontend_messages::StateUpdate;
    use crate::surface::transport::fake::FakeTransport;

    #[tokio::test(start_paused = true)]
    async fn publishes_gain_tracking_the_record() {
        let transport = Arc::new(FakeTransport::new());
        let (sender, receiver) = watch::channel(0.0);
        tokio::spawn(gain_monitor(transport.clone(), sender));

        // Default record: the speed model dominates at ~64.7 dB, so the
        // target sits near +10.3 dB and the gain climbs toward it
        sleep(Duration::from_secs(2)).await;
        let settled = *receiver.borrow();
        assert!(settled > 10.0, "gain was {settled}");

        // A screaming cabin pulls the gain down toward the clamp floor
        transport.store.apply(&StateUpdate::both(100.0, 60.0));
        sleep(Duration::from_secs(10)).await;
        let floored = *receiver.borrow();
        assert!((floored - GAIN_MIN_DB).abs() < 0.5, "gain was {floored}");
    }

    #[tokio::test(start_paused = true)]
    async fn keeps_running_across_poll_failures() {
        let transport = Arc::new(FakeTransport::new());
        let (sender, receiver) = watch::channel(0.0);
        tokio::spawn(gain_monitor(transport.clone(), sender));

        sleep(Duration::from_secs(1)).await;
        transport.set_fail_fetch(true);
        sleep(Duration::from_secs(1)).await;
        let during_outage = *receiver.borrow();

        // Still publishing, still settling toward the last known target
        transport.set_fail_fetch(false);
        transport.store.apply(&StateUpdate::both(100.0, 60.0));
        sleep(Duration::from_secs(5)).await;
        assert!(*receiver.borrow() < during_outage);
    }
}
