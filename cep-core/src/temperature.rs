/// Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 1.8 + 32.0
}

/// Celsius to Kelvin.
///
/// The offset is 273, not 273.15 — the documented behavior of this system,
/// kept as-is.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    celsius + 273.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn fahrenheit_conversion() {
        assert!(close(celsius_to_fahrenheit(0.0), 32.0));
        assert!(close(celsius_to_fahrenheit(100.0), 212.0));
        assert!(close(celsius_to_fahrenheit(28.5), 83.3));
        assert!(close(celsius_to_fahrenheit(-40.0), -40.0));
    }

    #[test]
    fn kelvin_conversion_uses_fixed_273_offset() {
        assert_eq!(celsius_to_kelvin(0.0), 273.0);
        assert_eq!(celsius_to_kelvin(28.5), 301.5);
        assert_eq!(celsius_to_kelvin(-273.0), 0.0);
        assert_eq!(celsius_to_kelvin(-10.25), 262.75);
    }
}
