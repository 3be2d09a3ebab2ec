use rand::random_range;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The authoritative speed / cabin-noise record owned by the server.
///
/// Wire keys are `cabinDb` and `speedKmh`; every reader of `GET /state`
/// observes the same record verbatim.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CabinState {
    /// Cabin noise level in dB SPL, [30.0, 100.0] by UI convention
    pub cabin_db: f64,
    /// Vehicle speed in km/h, [0.0, 200.0] by UI convention
    pub speed_kmh: f64,
}

impl Default for CabinState {
    fn default() -> Self {
        Self {
            cabin_db: 60.0,
            speed_kmh: 60.0,
        }
    }
}

/// Partial update of the shared record, as POSTed to `/update`.
///
/// Absent fields are left untouched by the server. Present fields carry raw
/// JSON values: the server coerces each one to a float and silently drops
/// fields that do not coerce.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cabin_db: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed_kmh: Option<Value>,
}

impl StateUpdate {
    /// Update intent carrying both slider values, the shape the control
    /// surface sends.
    pub fn both(cabin_db: f64, speed_kmh: f64) -> Self {
        Self {
            cabin_db: Some(Value::from(cabin_db)),
            speed_kmh: Some(Value::from(speed_kmh)),
        }
    }
}

/// One synthetic speed reading from the stub sensor endpoint
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SpeedReading {
    pub speed: f64,
}

impl SpeedReading {
    /// Draw one independent reading, uniform in [50, 70)
    pub fn simulate() -> Self {
        Self {
            speed: random_range(50.0..70.0),
        }
    }
}
