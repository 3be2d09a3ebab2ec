//! Adaptive playback gain: maps the shared speed / cabin-noise record to a
//! smoothed gain that keeps playback audible over road noise.

use crate::messages::frontend_messages::CabinState;

pub mod monitor;

/// Target perceived playback level
pub const L_DESIRED_DB: f64 = 75.0;
/// Operator trim on top of the computed gain
pub const USER_OFFSET_DB: f64 = 0.0;
/// Bounds on the raw gain before smoothing
pub const GAIN_MIN_DB: f64 = -18.0;
pub const GAIN_MAX_DB: f64 = 18.0;

/// Smoothing time constants: boost quickly, back off slowly
pub const TAU_ATTACK: f64 = 0.1;
pub const TAU_RELEASE: f64 = 1.0;

/// Noise contribution of the vehicle speed: grows with log(speed)
pub fn speed_to_noise(speed_kmh: f64) -> f64 {
    let a = 6.0;
    let b = 40.0;
    a * (speed_kmh + 1.0).ln() + b
}

/// Raw (unsmoothed) gain for the current record, clamped to
/// [`GAIN_MIN_DB`, `GAIN_MAX_DB`].
///
/// The effective noise floor is whichever is louder: the measured cabin
/// noise or the speed model.
pub fn target_gain_db(state: &CabinState) -> f64 {
    let noise_db = state.cabin_db.max(speed_to_noise(state.speed_kmh));
    (L_DESIRED_DB - noise_db + USER_OFFSET_DB).clamp(GAIN_MIN_DB, GAIN_MAX_DB)
}

pub fn db_to_lin(db: f64) -> f64 {
    10.0_f64.powf(db / 20.0)
}

/// First-order attack/release smoother in dB.
///
/// Rising targets are tracked with the attack time constant, falling targets
/// with the (slower) release one, so gain jumps up fast when noise appears
/// and decays gently when it goes away.
#[derive(Debug, Clone)]
pub struct Smoother {
    value_db: f64,
    tau_attack: f64,
    tau_release: f64,
}

impl Smoother {
    pub fn new(init_db: f64, tau_attack: f64, tau_release: f64) -> Self {
        Self {
            value_db: init_db,
            tau_attack,
            tau_release,
        }
    }

    pub fn value_db(&self) -> f64 {
        self.value_db
    }

    /// Advance the smoother by `dt` seconds toward `target_db` and return
    /// the new value. Non-positive `dt` leaves the value unchanged.
    pub fn step(&mut self, target_db: f64, dt: f64) -> f64 {
        if dt <= 0.0 {
            return self.value_db;
        }
        let tau = if target_db < self.value_db {
            self.tau_release
        } else {
            self.tau_attack
        };
        let alpha = 1.0 - (-dt / tau).exp();
        self.value_db += alpha * (target_db - self.value_db);
        self.value_db
    }
}

/// Soft limiter: inside the threshold samples pass untouched; beyond it the
/// excess is compressed so the output stays bounded instead of clipping.
pub fn soft_limit(sample: f64, threshold: f64) -> f64 {
    let abs = sample.abs();
    if abs <= threshold {
        sample
    } else {
        let exceeded = (abs - threshold) / (1.0 + abs - threshold);
        sample.signum() * (threshold + exceeded)
    }
}

/// Scale a chunk of interleaved samples by a linear gain, soft-limiting and
/// clamping to the sample range.
pub fn apply_gain_and_limit(input: &[i16], gain_lin: f64) -> Vec<i16> {
    let max_i16 = f64::from(i16::MAX);
    let threshold = 0.98 * max_i16;
    input
        .iter()
        .map(|&s| {
            let scaled = soft_limit(f64::from(s) * gain_lin, threshold);
            scaled.clamp(-max_i16, max_i16) as i16
        })
        .collect()
}
