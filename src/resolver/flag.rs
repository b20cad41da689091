use chrono::NaiveTime;

use crate::model::attendance::AttendanceFlag;

const WALL_CLOCK_FORMATS: [&str; 4] = ["%H:%M:%S", "%H:%M", "%I:%M:%S %p", "%I:%M %p"];

/// Accepts 24-hour `HH:MM[:SS]` and 12-hour `h:MM[:SS] AM` forms.
pub fn parse_wall_clock(value: &str) -> Option<NaiveTime> {
    let value = value.trim();
    WALL_CLOCK_FORMATS
        .iter()
        .find_map(|fmt| NaiveTime::parse_from_str(value, fmt).ok())
}

/// Classifies clock-in times against the shift start.
#[derive(Debug, Clone, Copy)]
pub struct FlagResolver {
    shift_start: NaiveTime,
}

impl FlagResolver {
    pub fn new(shift_start: NaiveTime) -> Self {
        Self { shift_start }
    }

    /// Arriving at the shift start itself is on time. Anything unreadable is
    /// treated as delayed.
    pub fn resolve(&self, in_time: &str) -> AttendanceFlag {
        match parse_wall_clock(in_time) {
            Some(t) => self.resolve_time(t),
            None => AttendanceFlag::Delayed,
        }
    }

    pub fn resolve_time(&self, in_time: NaiveTime) -> AttendanceFlag {
        if in_time <= self.shift_start {
            AttendanceFlag::Present
        } else {
            AttendanceFlag::Delayed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> FlagResolver {
        FlagResolver::new(NaiveTime::from_hms_opt(9, 0, 0).unwrap())
    }

    #[test]
    fn on_time_and_delayed() {
        let r = resolver();
        assert_eq!(r.resolve("08:55:10"), AttendanceFlag::Present);
        assert_eq!(r.resolve("09:00"), AttendanceFlag::Present);
        assert_eq!(r.resolve("09:00:01"), AttendanceFlag::Delayed);
        assert_eq!(r.resolve("13:30"), AttendanceFlag::Delayed);
    }

    #[test]
    fn twelve_hour_clock() {
        let r = resolver();
        assert_eq!(r.resolve("8:45:00 AM"), AttendanceFlag::Present);
        assert_eq!(r.resolve("9:15 am"), AttendanceFlag::Delayed);
        assert_eq!(r.resolve("1:00:00 PM"), AttendanceFlag::Delayed);
    }

    #[test]
    fn unparsable_is_delayed() {
        let r = resolver();
        assert_eq!(r.resolve(""), AttendanceFlag::Delayed);
        assert_eq!(r.resolve("quarter past nine"), AttendanceFlag::Delayed);
        assert_eq!(r.resolve("25:00"), AttendanceFlag::Delayed);
    }
}
