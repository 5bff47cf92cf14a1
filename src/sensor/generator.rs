use rand::Rng;

use crate::models::reading::SensorReading;

/// Produces a plausible reading with uniformly distributed values
///
/// Stateless, safe to call from any task
pub fn generate() -> SensorReading {
    let mut rng = rand::thread_rng();
    SensorReading {
        water_level: round1(rng.gen_range(40.0..=95.0)),
        ph_level: round1(rng.gen_range(5.5..=8.5)),
        temperature: round1(rng.gen_range(18.0..=28.0)),
        humidity: round1(rng.gen_range(50.0..=85.0)),
        tds_level: rng.gen_range(600.0f64..=1500.0).round(),
        dissolved_oxygen: round1(rng.gen_range(5.0..=8.0)),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_generated_values_stay_in_range() {
        for _ in 0..1000 {
            let reading = generate();
            assert!((40.0..=95.0).contains(&reading.water_level));
            assert!((5.5..=8.5).contains(&reading.ph_level));
            assert!((18.0..=28.0).contains(&reading.temperature));
            assert!((50.0..=85.0).contains(&reading.humidity));
            assert!((600.0..=1500.0).contains(&reading.tds_level));
            assert!((5.0..=8.0).contains(&reading.dissolved_oxygen));
        }
    }

    #[test]
    fn test_generated_values_are_rounded() {
        for _ in 0..100 {
            let reading = generate();
            assert_eq!(reading.tds_level, reading.tds_level.round());
            let scaled = reading.ph_level * 10.0;
            assert!((scaled - scaled.round()).abs() < 1e-9);
        }
    }
}
