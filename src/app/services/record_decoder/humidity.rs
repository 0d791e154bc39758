//! Relative humidity derived from air temperature and dew point

use crate::constants::magnus;

/// Relative humidity in percent, rounded to one decimal
///
/// Uses the Magnus approximation of saturation vapour pressure. Inputs are
/// in °C; a null input yields a null result.
pub fn relative_humidity(temperature: Option<f64>, dew_point: Option<f64>) -> Option<f64> {
    let (t, td) = (temperature?, dew_point?);
    let saturation = |c: f64| (magnus::B * c / (magnus::C + c)).exp();
    let rh = 100.0 * saturation(td) / saturation(t);
    rh.is_finite().then(|| (rh * 10.0).round() / 10.0)
}
