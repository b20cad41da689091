use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};

/// Single-letter classification of a day's attendance.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
pub enum AttendanceFlag {
    #[serde(rename = "P")]
    #[strum(serialize = "P")]
    Present,
    #[serde(rename = "D")]
    #[strum(serialize = "D")]
    Delayed,
    #[serde(rename = "L")]
    #[strum(serialize = "L")]
    Leave,
    #[serde(rename = "W")]
    #[strum(serialize = "W")]
    Weekend,
    #[serde(rename = "H")]
    #[strum(serialize = "H")]
    Holiday,
    #[serde(rename = "V")]
    #[strum(serialize = "V")]
    Visit,
    #[serde(rename = "A")]
    #[strum(serialize = "A")]
    Absent,
    /// A future day nothing else applies to.
    #[serde(rename = "")]
    #[strum(serialize = "")]
    Blank,
}

/// One real clock-in/out for one employee on one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttendancePunch {
    pub employee_id: u64,
    pub date: NaiveDate,
    pub in_time: Option<String>,
    pub out_time: Option<String>,
    /// Resolved when the punch was recorded.
    pub flag: Option<AttendanceFlag>,
}

/// A day of the timeline: the stored punch, or a placeholder computed for a
/// day without one. Placeholders are never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DailyAttendanceRecord {
    Punch(AttendancePunch),
    Synthesized { date: NaiveDate, flag: AttendanceFlag },
}

impl DailyAttendanceRecord {
    pub fn date(&self) -> NaiveDate {
        match self {
            DailyAttendanceRecord::Punch(p) => p.date,
            DailyAttendanceRecord::Synthesized { date, .. } => *date,
        }
    }

    pub fn flag(&self) -> Option<AttendanceFlag> {
        match self {
            DailyAttendanceRecord::Punch(p) => p.flag,
            DailyAttendanceRecord::Synthesized { flag, .. } => Some(*flag),
        }
    }

    pub fn in_time(&self) -> Option<&str> {
        match self {
            DailyAttendanceRecord::Punch(p) => p.in_time.as_deref(),
            DailyAttendanceRecord::Synthesized { .. } => None,
        }
    }

    pub fn out_time(&self) -> Option<&str> {
        match self {
            DailyAttendanceRecord::Punch(p) => p.out_time.as_deref(),
            DailyAttendanceRecord::Synthesized { .. } => None,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        matches!(self, DailyAttendanceRecord::Synthesized { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn flag_letters() {
        assert_eq!(AttendanceFlag::Delayed.to_string(), "D");
        assert_eq!(AttendanceFlag::Blank.as_ref(), "");
        assert_eq!(AttendanceFlag::from_str("V").unwrap(), AttendanceFlag::Visit);
        assert!(AttendanceFlag::from_str("X").is_err());
    }

    #[test]
    fn blank_flag_serializes_empty() {
        let json = serde_json::to_string(&AttendanceFlag::Blank).unwrap();
        assert_eq!(json, "\"\"");
    }

    #[test]
    fn punch_accessors() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 11).unwrap();
        let record = DailyAttendanceRecord::Punch(AttendancePunch {
            employee_id: 7,
            date,
            in_time: Some("09:01:00".into()),
            out_time: None,
            flag: Some(AttendanceFlag::Delayed),
        });
        assert_eq!(record.date(), date);
        assert_eq!(record.in_time(), Some("09:01:00"));
        assert_eq!(record.out_time(), None);
        assert!(!record.is_synthesized());
    }
}
