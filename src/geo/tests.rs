#[cfg(test)]
mod solar_tests {
    use crate::geo::solar::*;
    use crate::geo::Coordinates;
    use chrono::NaiveDate;

    #[test]
    fn test_coordinate_validation() {
        assert!(Coordinates::new(40.7128, -74.0060).is_ok());
        assert!(Coordinates::new(90.0, 180.0).is_ok());
        assert!(Coordinates::new(-90.0, -180.0).is_ok());

        assert!(Coordinates::new(91.0, 0.0).is_err());
        assert!(Coordinates::new(-91.0, 0.0).is_err());
        assert!(Coordinates::new(0.0, 181.0).is_err());
        assert!(Coordinates::new(0.0, -360.0).is_err());
    }

    #[test]
    fn test_from_parts_requires_both_values() {
        assert!(Coordinates::from_parts(Some(51.5), None).is_none());
        assert!(Coordinates::from_parts(None, Some(-0.12)).is_none());
        assert!(Coordinates::from_parts(Some(120.0), Some(0.0)).is_none());
        assert_eq!(
            Coordinates::from_parts(Some(51.5), Some(-0.12)),
            Some(Coordinates {
                latitude: 51.5,
                longitude: -0.12
            })
        );
    }

    #[test]
    fn test_coordinate_display() {
        let coords = Coordinates::new(51.5, -0.12).unwrap();
        assert_eq!(coords.to_string(), "51.500°N, 0.120°W");
        let coords = Coordinates::new(-33.9249, 18.4241).unwrap();
        assert_eq!(coords.to_string(), "33.925°S, 18.424°E");
    }

    /// London around the June solstice, BST (UTC+1).
    #[test]
    fn test_london_summer_solstice() {
        let times = SunTimes::compute(51.5, -0.12, 172, 60);

        assert_eq!(times.condition, PolarCondition::Normal);
        assert!(times.sunrise < 6 * 60, "sunrise was {}", times.sunrise);
        assert!(times.sunset > 20 * 60, "sunset was {}", times.sunset);
        // Published values are 04:43 and 21:21.
        assert!((275..=290).contains(&times.sunrise));
        assert!((1275..=1290).contains(&times.sunset));
    }

    #[test]
    fn test_equator_equinox_is_about_twelve_hours() {
        let times = SunTimes::compute(0.0, 0.0, 80, 0);

        assert_eq!(times.condition, PolarCondition::Normal);
        assert!((350..=380).contains(&times.sunrise));
        assert!((1080..=1100).contains(&times.sunset));
        assert!((700..=740).contains(&times.daylight_minutes()));
    }

    #[test]
    fn test_southern_hemisphere_winter() {
        // Cape Town, June 21, SAST (UTC+2): roughly 07:52 / 17:45.
        let times = SunTimes::compute(-33.9249, 18.4241, 172, 120);

        assert!((460..=480).contains(&times.sunrise));
        assert!((1055..=1075).contains(&times.sunset));
    }

    #[test]
    fn test_polar_day_fallback() {
        // Longyearbyen in June: midnight sun.
        let times = SunTimes::compute(78.2232, 15.6267, 172, 120);

        assert_eq!(times.condition, PolarCondition::PolarDay);
        assert_eq!(times.sunrise, 0);
        assert_eq!(times.sunset, 1439);
    }

    #[test]
    fn test_polar_night_fallback() {
        // Longyearbyen in December: the sun never rises.
        let times = SunTimes::compute(78.2232, 15.6267, 355, 60);

        assert_eq!(times.condition, PolarCondition::PolarNight);
        assert_eq!(times.sunrise, 720);
        assert_eq!(times.sunset, 720);
    }

    #[test]
    fn test_polar_conditions_flip_in_the_south() {
        // McMurdo: polar night in June, polar day in December.
        assert_eq!(
            SunTimes::compute(-77.846, 166.676, 172, 720),
            SunTimes::POLAR_NIGHT
        );
        assert_eq!(
            SunTimes::compute(-77.846, 166.676, 355, 780),
            SunTimes::POLAR_DAY
        );
    }

    #[test]
    fn test_for_date_uses_ordinal() {
        let coords = Coordinates::new(51.5, -0.12).unwrap();
        let date = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();

        assert_eq!(
            SunTimes::for_date(coords, date, 60),
            SunTimes::compute(51.5, -0.12, 172, 60)
        );
    }

    #[test]
    fn test_results_stay_in_range_for_extreme_offsets() {
        for offset in [-720, -300, 0, 345, 840] {
            let times = SunTimes::compute(40.7128, -74.0060, 15, offset);
            assert!(times.sunrise <= 1439);
            assert!(times.sunset <= 1439);
        }
    }

    #[test]
    fn test_non_finite_input_does_not_hang() {
        let times = SunTimes::compute(45.0, f64::INFINITY, 100, 0);
        assert!(times.sunrise <= 1439);
        assert!(times.sunset <= 1439);
    }
}
