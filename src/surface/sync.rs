use std::time::Duration;

use tracing::warn;

use crate::surface::panel::ControlPanel;

/// Fixed interval of the background state poll
pub const REFRESH_PERIOD: Duration = Duration::from_millis(500);

/// Background refresh loop of the control surface.
///
/// Unconditionally polls the authoritative record and hands it to the panel,
/// which skips any control the operator is editing. Never returns: fetch
/// failures are logged and the next tick retries.
pub async fn background_refresh(panel: ControlPanel) {
    let mut ticker = tokio::time::interval(REFRESH_PERIOD);

    loop {
        match panel.transport().fetch_state().await {
            Ok(authoritative) => panel.apply_refresh(authoritative),
            Err(err) => warn!("state poll failed, retrying next tick: {err}"),
        }

        ticker.tick().await;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use tokio::time::sleep;

    use super::*;
    use crate::messages::frontend_messages::StateUpdate;
    use crate::surface::transport::fake::FakeTransport;

    #[tokio::test(start_paused = true)]
    async fn refresh_loop_tracks_the_server_and_survives_failures() {
        let transport = Arc::new(FakeTransport::new());
        let panel = ControlPanel::new(transport.clone());
        tokio::spawn(background_refresh(panel.clone()));

        // Another writer moves the authoritative record; the next tick
        // propagates it into the panel mirror
        transport.store.apply(&StateUpdate::both(48.0, 140.0));
        sleep(REFRESH_PERIOD * 2).await;
        assert_eq!(panel.displayed().cabin_db, 48.0);
        assert_eq!(panel.displayed().speed_kmh, 140.0);

        // A failing poll leaves the mirror alone and does not kill the loop
        transport.set_fail_fetch(true);
        transport.store.apply(&StateUpdate::both(30.0, 0.0));
        sleep(REFRESH_PERIOD * 2).await;
        assert_eq!(panel.displayed().cabin_db, 48.0);

        transport.set_fail_fetch(false);
        sleep(REFRESH_PERIOD * 2).await;
        assert_eq!(panel.displayed().speed_kmh, 0.0);
    }
}
