#![forbid(unsafe_code)]
use chrono::NaiveDate;
use permanence::{
    date_range, is_holiday, is_weekend, normalize_date, parse_date_lenient, points_for, DutyValue,
    HolidaySet,
};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

#[test]
fn weekend_detection() {
    assert!(is_weekend(d(2026, 3, 7))); // samedi
    assert!(is_weekend(d(2026, 3, 8))); // dimanche
    assert!(!is_weekend(d(2026, 3, 3))); // mardi
    assert!(!is_weekend(d(2026, 3, 6))); // vendredi
}

#[test]
fn holiday_set_membership() {
    let holidays = HolidaySet::default_fr();
    assert!(is_holiday(d(2026, 7, 14), &holidays));
    assert!(is_holiday(d(2025, 12, 25), &holidays));
    assert!(!is_holiday(d(2026, 7, 15), &holidays));
    // année non couverte : jour ordinaire
    assert!(!is_holiday(d(2030, 7, 14), &holidays));
}

#[test]
fn custom_holiday_set() {
    let holidays = HolidaySet::from_dates([d(2026, 3, 3)]);
    assert!(is_holiday(d(2026, 3, 3), &holidays));
    assert!(!is_holiday(d(2026, 7, 14), &holidays));
    assert_eq!(holidays.len(), 1);
}

#[test]
fn date_range_inclusive_and_ascending() {
    let dates: Vec<_> = date_range(d(2026, 3, 1), d(2026, 3, 5)).collect();
    assert_eq!(dates.len(), 5);
    assert_eq!(dates[0], d(2026, 3, 1));
    assert_eq!(dates[4], d(2026, 3, 5));
    for window in dates.windows(2) {
        assert!(window[0] < window[1]);
    }
}

#[test]
fn date_range_is_restartable() {
    let first: Vec<_> = date_range(d(2026, 2, 27), d(2026, 3, 2)).collect();
    let second: Vec<_> = date_range(d(2026, 2, 27), d(2026, 3, 2)).collect();
    assert_eq!(first, second);
    assert_eq!(first.len(), 4); // traverse la fin de mois
}

#[test]
fn date_range_single_day() {
    let dates: Vec<_> = date_range(d(2026, 3, 3), d(2026, 3, 3)).collect();
    assert_eq!(dates, vec![d(2026, 3, 3)]);
}

#[test]
fn normalize_accepts_canonical_and_rfc3339() {
    assert_eq!(normalize_date("2026-03-03").unwrap(), "2026-03-03");
    assert_eq!(normalize_date("  2026-03-03 ").unwrap(), "2026-03-03");
    assert_eq!(
        normalize_date("2026-03-03T12:30:00Z").unwrap(),
        "2026-03-03"
    );
    assert_eq!(
        normalize_date("2026-03-03T23:59:59+01:00").unwrap(),
        "2026-03-03"
    );
}

#[test]
fn normalize_rejects_garbage() {
    assert!(normalize_date("pas une date").is_err());
    assert!(normalize_date("2026-13-40").is_err());
    assert!(parse_date_lenient("03/03/2026").is_err());
}

#[test]
fn points_weekday_weekend_holiday() {
    let holidays = HolidaySet::default_fr();
    let value = DutyValue::default();
    // mardi ordinaire
    assert_eq!(points_for(d(2026, 3, 3), &value, &holidays), 1.0);
    // samedi ordinaire
    assert_eq!(points_for(d(2026, 3, 7), &value, &holidays), 1.5);
    // 14 juillet 2026, un mardi
    assert_eq!(points_for(d(2026, 7, 14), &value, &holidays), 2.0);
}

#[test]
fn holiday_takes_precedence_over_weekend() {
    let holidays = HolidaySet::default_fr();
    let value = DutyValue {
        base_weight: 2.0,
        weekend_multiplier: 1.5,
        holiday_multiplier: 3.0,
    };
    // 15 août 2026 tombe un samedi : multiplicateur férié seul, pas de cumul
    assert_eq!(points_for(d(2026, 8, 15), &value, &holidays), 6.0);
}
