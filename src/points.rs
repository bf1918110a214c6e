use crate::calendar::{is_holiday, is_weekend, HolidaySet};
use crate::model::DutyValue;
use chrono::NaiveDate;

/// Valeur en points d'une garde à une date donnée.
///
/// Le jour férié prime sur le week-end : un férié tombant un samedi ne
/// cumule pas les deux multiplicateurs.
pub fn points_for(date: NaiveDate, value: &DutyValue, holidays: &HolidaySet) -> f64 {
    if is_holiday(date, holidays) {
        value.base_weight * value.holiday_multiplier
    } else if is_weekend(date) {
        value.base_weight * value.weekend_multiplier
    } else {
        value.base_weight
    }
}
