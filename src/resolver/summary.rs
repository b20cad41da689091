use serde::Serialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceFlag, DailyAttendanceRecord};

/// Per-flag day counts over a synthesized timeline.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FlagSummary {
    pub present: u32,
    pub delayed: u32,
    pub leave: u32,
    pub weekend: u32,
    pub holiday: u32,
    pub visit: u32,
    pub absent: u32,
    /// Future days with nothing scheduled.
    pub blank: u32,
    /// Punches stored without a flag.
    pub unflagged: u32,
}

impl FlagSummary {
    pub fn from_records(records: &[DailyAttendanceRecord]) -> Self {
        let mut summary = Self::default();
        for record in records {
            let slot = match record.flag() {
                Some(AttendanceFlag::Present) => &mut summary.present,
                Some(AttendanceFlag::Delayed) => &mut summary.delayed,
                Some(AttendanceFlag::Leave) => &mut summary.leave,
                Some(AttendanceFlag::Weekend) => &mut summary.weekend,
                Some(AttendanceFlag::Holiday) => &mut summary.holiday,
                Some(AttendanceFlag::Visit) => &mut summary.visit,
                Some(AttendanceFlag::Absent) => &mut summary.absent,
                Some(AttendanceFlag::Blank) => &mut summary.blank,
                None => &mut summary.unflagged,
            };
            *slot += 1;
        }
        summary
    }

    /// Days the employee actually showed up.
    pub fn attended(&self) -> u32 {
        self.present + self.delayed + self.unflagged
    }
}
