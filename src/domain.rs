use serde::{Deserialize, Serialize};

/// simulated river water-quality reading
///
/// this is the only record the dashboard serves. field names are the json
/// keys returned by `/get_data`, so renaming one is a wire change.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// water temperature in celsius (never below 0)
    pub temperature: f64,
    /// total dissolved solids in ppm (never below 0)
    pub tds: f64,
    /// turbidity in NTU
    pub turbidity: f64,
    /// acidity, always within [0, 14]
    pub ph: f64,
    /// chemical oxygen demand in mg/L
    pub cod: f64,
    /// biochemical oxygen demand in mg/L
    pub bod: f64,
    /// unix timestamp in seconds of the last update
    pub timestamp: f64,
}

impl Reading {
    /// the hard-coded values the dashboard starts from
    pub fn seed(timestamp: f64) -> Self {
        Self {
            temperature: 29.5,
            tds: 750.0,
            turbidity: 15.2,
            ph: 5.8,
            cod: 55.0,
            bod: 12.0,
            timestamp,
        }
    }
}

/// current wall-clock time as fractional seconds since the unix epoch
///
/// a clock set before 1970 reads as 0.0 rather than failing.
pub fn unix_now() -> f64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}
