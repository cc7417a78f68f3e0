pub const KELVIN_OFFSET: f64 = 273.15;

/// Kelvin to whole degrees Celsius. Halves round toward +∞, so a reading
/// of exactly -0.5 °C becomes 0.
pub fn kelvin_to_celsius(kelvin: f64) -> i64 {
    (kelvin - KELVIN_OFFSET + 0.5).floor() as i64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exact_values() {
        assert_eq!(kelvin_to_celsius(293.15), 20);
        assert_eq!(kelvin_to_celsius(273.15), 0);
        assert_eq!(kelvin_to_celsius(0.0), -273);
    }

    #[test]
    fn rounds_to_nearest() {
        assert_eq!(kelvin_to_celsius(285.4), 12);
        assert_eq!(kelvin_to_celsius(285.8), 13);
        assert_eq!(kelvin_to_celsius(263.0), -10);
    }

    #[test]
    fn below_freezing() {
        assert_eq!(kelvin_to_celsius(271.0), -2);
        assert_eq!(kelvin_to_celsius(270.5), -3);
    }
}
