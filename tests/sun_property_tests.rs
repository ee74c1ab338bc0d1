use horizon::geo::{Coordinates, PolarCondition, SunTimes};
use horizon::weather::{TemperatureUnit, WeatherReading};
use proptest::prelude::*;

/// Generate valid latitude values
fn latitude_strategy() -> impl Strategy<Value = f64> {
    -90.0..=90.0
}

/// Generate valid longitude values
fn longitude_strategy() -> impl Strategy<Value = f64> {
    -180.0..=180.0
}

/// Local mean solar time offset for a longitude.
fn solar_offset_minutes(longitude: f64) -> i32 {
    (longitude * 4.0).round() as i32
}

mod sun_time_tests {
    use super::*;

    proptest! {
        /// Every input produces minutes of day, including polar fallbacks.
        #[test]
        fn test_results_are_minutes_of_day(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            day in 1u32..=366,
            offset in -720i32..=840
        ) {
            let times = SunTimes::compute(lat, lon, day, offset);
            prop_assert!(times.sunrise <= 1439);
            prop_assert!(times.sunset <= 1439);
        }

        /// Away from the poles, in local solar time, the sun rises before it sets.
        #[test]
        fn test_sunrise_before_sunset_below_60_degrees(
            lat in -60.0f64..=60.0,
            lon in longitude_strategy(),
            day in 1u32..=365
        ) {
            let times = SunTimes::compute(lat, lon, day, solar_offset_minutes(lon));
            prop_assert_eq!(times.condition, PolarCondition::Normal);
            prop_assert!(
                times.sunrise < times.sunset,
                "sunrise {} not before sunset {} at lat {}, lon {}, day {}",
                times.sunrise, times.sunset, lat, lon, day
            );
        }

        /// Solar noon sits roughly halfway between sunrise and sunset.
        #[test]
        fn test_events_are_symmetric_around_noon(
            lat in -50.0f64..=50.0,
            lon in longitude_strategy(),
            day in 1u32..=365
        ) {
            let times = SunTimes::compute(lat, lon, day, solar_offset_minutes(lon));
            let midpoint = (times.sunrise as i32 + times.sunset as i32) / 2;
            // Equation of time stays within about 17 minutes.
            prop_assert!((midpoint - 720).abs() <= 25, "midpoint {}", midpoint);
        }

        /// The calculation is deterministic.
        #[test]
        fn test_same_input_same_output(
            lat in latitude_strategy(),
            lon in longitude_strategy(),
            day in 1u32..=366
        ) {
            prop_assert_eq!(
                SunTimes::compute(lat, lon, day, 0),
                SunTimes::compute(lat, lon, day, 0)
            );
        }
    }

    #[test]
    fn test_polar_sentinels() {
        // Svalbard in deep winter and high summer.
        assert_eq!(SunTimes::compute(78.2, 15.6, 355, 60), SunTimes::POLAR_NIGHT);
        assert_eq!(SunTimes::compute(78.2, 15.6, 172, 120), SunTimes::POLAR_DAY);
        assert_eq!((SunTimes::POLAR_NIGHT.sunrise, SunTimes::POLAR_NIGHT.sunset), (720, 720));
        assert_eq!((SunTimes::POLAR_DAY.sunrise, SunTimes::POLAR_DAY.sunset), (0, 1439));
    }

    #[test]
    fn test_southern_hemisphere_has_long_december_days() {
        let cape_town = Coordinates::new(-33.9, 18.4).unwrap();
        let december = chrono::NaiveDate::from_ymd_opt(2026, 12, 21).unwrap();
        let june = chrono::NaiveDate::from_ymd_opt(2026, 6, 21).unwrap();

        let summer = SunTimes::for_date(cape_town, december, 120);
        let winter = SunTimes::for_date(cape_town, june, 120);
        assert!(summer.daylight_minutes() > winter.daylight_minutes() + 180);
    }
}

mod weather_record_tests {
    use super::*;

    fn unit_strategy() -> impl Strategy<Value = TemperatureUnit> {
        prop_oneof![
            Just(TemperatureUnit::Celsius),
            Just(TemperatureUnit::Fahrenheit)
        ]
    }

    proptest! {
        #[test]
        fn test_record_preserves_reading(
            temperature in -100i32..=150,
            condition in 0u16..=99,
            is_day in any::<bool>(),
            unit in unit_strategy()
        ) {
            let reading = WeatherReading { temperature, condition, is_day, unit };
            prop_assert_eq!(WeatherReading::from_record(&reading.to_record()), Some(reading));
        }

        /// Arbitrary text never panics the parser.
        #[test]
        fn test_arbitrary_records_do_not_panic(record in ".{0,40}") {
            let _ = WeatherReading::from_record(&record);
        }
    }

    #[test]
    fn test_legacy_record_is_fahrenheit() {
        let reading = WeatherReading::from_record("70|2|true").unwrap();
        assert_eq!(reading.unit, TemperatureUnit::Fahrenheit);
        assert_eq!(reading.temperature, 70);
    }

    #[test]
    fn test_malformed_records_are_absent() {
        for record in ["", "a|1|true|true", "20|x|true", "20|1|yes", "20|1", "1|2|true|true|5"] {
            assert_eq!(WeatherReading::from_record(record), None, "{record}");
        }
    }
}
