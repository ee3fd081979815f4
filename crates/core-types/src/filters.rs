use crate::dates::parse_datetime;
use crate::error::CoreError;
use chrono::NaiveDateTime;
use serde::Serialize;

/// The request-scoped narrowing criteria applied before any aggregation.
///
/// Both bounds are inclusive. A bare date bound means midnight of that day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct FilterSet {
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl FilterSet {
    /// Builds a filter set from raw request parameters.
    ///
    /// Absent and empty parameters mean "no bound". Anything else must parse as a
    /// date or date-time, or the whole filter set is rejected.
    pub fn from_params(start_date: Option<&str>, end_date: Option<&str>) -> Result<Self, CoreError> {
        Ok(Self {
            start_date: parse_bound("start_date", start_date)?,
            end_date: parse_bound("end_date", end_date)?,
        })
    }

    pub fn has_bounds(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }

    /// Whether a date satisfies both bounds.
    pub fn contains(&self, date: &NaiveDateTime) -> bool {
        self.start_date.is_none_or(|start| *date >= start)
            && self.end_date.is_none_or(|end| *date <= end)
    }
}

fn parse_bound(field: &str, raw: Option<&str>) -> Result<Option<NaiveDateTime>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_datetime(raw).map(Some).ok_or_else(|| {
            CoreError::InvalidInput(field.to_string(), format!("'{raw}' is not a valid date"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap().and_hms_opt(0, 0, 0).unwrap()
    }

    #[test]
    fn empty_params_carry_no_bounds() {
        let filters = FilterSet::from_params(Some(""), None).unwrap();
        assert!(!filters.has_bounds());
        assert!(filters.contains(&day(1)));
    }

    #[test]
    fn malformed_dates_are_rejected() {
        let err = FilterSet::from_params(Some("2024-01-01"), Some("yesterday")).unwrap_err();
        assert_eq!(
            err,
            CoreError::InvalidInput("end_date".into(), "'yesterday' is not a valid date".into())
        );
    }

    #[test]
    fn bounds_are_inclusive() {
        let filters = FilterSet::from_params(Some("2024-01-02"), Some("2024-01-04")).unwrap();
        assert!(!filters.contains(&day(1)));
        assert!(filters.contains(&day(2)));
        assert!(filters.contains(&day(4)));
        assert!(!filters.contains(&day(5)));
    }
}
