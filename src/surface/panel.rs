use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::messages::frontend_messages::{CabinState, StateUpdate};
use crate::surface::transport::StateTransport;

/// Quiet period after the last slider input before the write goes out
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(200);

/// The two operator controls of the panel
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    CabinDb,
    SpeedKmh,
}

#[derive(Debug)]
struct PanelInner {
    /// Locally rendered mirror of the two sliders
    mirror: CabinState,
    /// True while the operator is editing the control, suppressing refresh
    cabin_interacting: bool,
    speed_interacting: bool,
    /// Bumped on every input event; a debounce task only sends if its epoch
    /// is still the newest
    edit_epoch: u64,
    /// The currently armed debounce timer, if any
    pending: Option<JoinHandle<()>>,
    /// Status text of the last failed write, cleared by the next success
    last_error: Option<String>,
}

/// Headless rendition of the operator panel.
///
/// Each control runs `Idle -> Interacting -> (debounce) -> Sending -> Idle`:
/// input events update the mirror immediately and re-arm a single debounce
/// timer; when the timer fires, one write carrying both slider values goes to
/// the server; once the write resolves the interacting flags drop and the
/// background refresh regains authority over the sliders.
///
/// Handles clone cheaply and share one panel. Input events spawn the timer
/// task, so the panel must live inside a tokio runtime.
#[derive(Clone)]
pub struct ControlPanel {
    inner: Arc<Mutex<PanelInner>>,
    transport: Arc<dyn StateTransport>,
    debounce: Duration,
}

impl ControlPanel {
    pub fn new(transport: Arc<dyn StateTransport>) -> Self {
        Self::with_debounce(transport, DEBOUNCE_DELAY)
    }

    pub fn with_debounce(transport: Arc<dyn StateTransport>, debounce: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(PanelInner {
                mirror: CabinState::default(),
                cabin_interacting: false,
                speed_interacting: false,
                edit_epoch: 0,
                pending: None,
                last_error: None,
            })),
            transport,
            debounce,
        }
    }

    pub fn transport(&self) -> &Arc<dyn StateTransport> {
        &self.transport
    }

    fn lock(&self) -> MutexGuard<'_, PanelInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// One slider input event.
    ///
    /// Updates the local display immediately (no network call), marks the
    /// control as interacting and re-arms the debounce timer: any previously
    /// armed timer is replaced, so only the last input of a burst sends.
    pub fn slider_input(&self, control: Control, value: f64) {
        let mut state = self.lock();
        match control {
            Control::CabinDb => {
                state.mirror.cabin_db = value;
                state.cabin_interacting = true;
            }
            Control::SpeedKmh => {
                state.mirror.speed_kmh = value;
                state.speed_interacting = true;
            }
        }
        state.edit_epoch += 1;
        let epoch = state.edit_epoch;

        // Replace any pending timer. A timer that already started its send
        // is past the abort (it cleared `pending` first) and instead bails
        // out on the epoch comparison in flush().
        if let Some(pending) = state.pending.take() {
            pending.abort();
        }
        let panel = self.clone();
        state.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(panel.debounce).await;
            panel.flush(epoch).await;
        }));
    }

    /// Explicit "send now": cancel any pending debounce timer and write
    /// immediately. Returns once the write has resolved.
    pub async fn send_now(&self) {
        let epoch = {
            let mut state = self.lock();
            if let Some(pending) = state.pending.take() {
                pending.abort();
            }
            state.edit_epoch
        };
        self.flush(epoch).await;
    }

    /// Issue the write carrying both current slider values.
    ///
    /// Skipped when `epoch` has been superseded by a newer input event (that
    /// input armed its own timer). On resolution, success or failure, the
    /// interacting flags drop unless a newer edit claimed them mid-flight.
    async fn flush(&self, epoch: u64) {
        let update = {
            let mut state = self.lock();
            if state.edit_epoch != epoch {
                return;
            }
            state.pending = None;
            StateUpdate::both(state.mirror.cabin_db, state.mirror.speed_kmh)
        };

        let result = self.transport.push_update(update).await;

        let mut state = self.lock();
        match result {
            Ok(confirmed) => {
                info!("panel update applied, server now at: {:?}", confirmed);
                state.last_error = None;
            }
            Err(err) => {
                warn!("panel update failed: {err}");
                state.last_error = Some(err.to_string());
            }
        }
        if state.edit_epoch == epoch {
            state.cabin_interacting = false;
            state.speed_interacting = false;
        }
    }

    /// Adopt the server's authoritative values for every control the
    /// operator is not currently editing.
    pub fn apply_refresh(&self, authoritative: CabinState) {
        let mut state = self.lock();
        if !state.cabin_interacting {
            state.mirror.cabin_db = authoritative.cabin_db;
        }
        if !state.speed_interacting {
            state.mirror.speed_kmh = authoritative.speed_kmh;
        }
    }

    /// The locally rendered mirror of both sliders
    pub fn displayed(&self) -> CabinState {
        self.lock().mirror
    }

    pub fn is_interacting(&self, control: Control) -> bool {
        let state = self.lock();
        match control {
            Control::CabinDb => state.cabin_interacting,
            Control::SpeedKmh => state.speed_interacting,
        }
    }

    /// Status text of the last failed write, if the panel is out of sync
    pub fn last_error(&self) -> Option<String> {
        self.lock().last_error.clone()
    }
}
