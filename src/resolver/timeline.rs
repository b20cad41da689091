use std::collections::HashMap;
use std::collections::hash_map::Entry;

use chrono::{Datelike, NaiveDate, Weekday};

use crate::model::attendance::{AttendanceFlag, AttendancePunch, DailyAttendanceRecord};
use crate::model::interval::{ApprovedInterval, IntervalCategory};

/// Approved coverage for one employee. Leaves and visits are expected to be
/// that employee's already; holidays are global. Only approved entries
/// belong here.
#[derive(Debug, Default, Clone)]
pub struct AttendanceCalendar {
    pub holidays: Vec<ApprovedInterval>,
    pub leaves: Vec<ApprovedInterval>,
    pub visits: Vec<ApprovedInterval>,
}

impl AttendanceCalendar {
    pub fn from_intervals(intervals: impl IntoIterator<Item = ApprovedInterval>) -> Self {
        let mut calendar = Self::default();
        for interval in intervals {
            match interval.category {
                IntervalCategory::Holiday => calendar.holidays.push(interval),
                IntervalCategory::Leave { .. } => calendar.leaves.push(interval),
                IntervalCategory::Visit { .. } => calendar.visits.push(interval),
            }
        }
        calendar
    }

    fn covers(intervals: &[ApprovedInterval], date: NaiveDate) -> bool {
        intervals.iter().any(|i| i.contains(date))
    }
}

/// Fills a date range with one record per day.
#[derive(Debug, Clone, Copy)]
pub struct TimelineSynthesizer {
    weekend: Weekday,
}

impl TimelineSynthesizer {
    pub fn new(weekend: Weekday) -> Self {
        Self { weekend }
    }

    /// Returns `[start, end]` newest first. Days with a punch get the punch
    /// as-is; the rest get a placeholder flag. When several punches share a
    /// date the first one wins. `start > end` yields nothing.
    pub fn synthesize(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        today: NaiveDate,
        punches: &[AttendancePunch],
        calendar: &AttendanceCalendar,
    ) -> Vec<DailyAttendanceRecord> {
        if start > end {
            return Vec::new();
        }

        let mut by_date: HashMap<NaiveDate, &AttendancePunch> = HashMap::new();
        for punch in punches {
            match by_date.entry(punch.date) {
                Entry::Vacant(slot) => {
                    slot.insert(punch);
                }
                Entry::Occupied(_) => {
                    tracing::warn!(
                        employee_id = punch.employee_id,
                        date = %punch.date,
                        "duplicate punch for day, keeping the first"
                    );
                }
            }
        }

        let mut records: Vec<DailyAttendanceRecord> = start
            .iter_days()
            .take_while(|d| *d <= end)
            .map(|date| match by_date.get(&date) {
                Some(punch) => DailyAttendanceRecord::Punch((*punch).clone()),
                None => DailyAttendanceRecord::Synthesized {
                    date,
                    flag: self.placeholder_flag(date, today, calendar),
                },
            })
            .collect();

        records.reverse();
        records
    }

    /// Flag for a day nobody punched: weekend, holiday, leave, visit, then
    /// absent. Absent turns blank for days after `today`.
    pub fn placeholder_flag(
        &self,
        date: NaiveDate,
        today: NaiveDate,
        calendar: &AttendanceCalendar,
    ) -> AttendanceFlag {
        let flag = if date.weekday() == self.weekend {
            AttendanceFlag::Weekend
        } else if AttendanceCalendar::covers(&calendar.holidays, date) {
            AttendanceFlag::Holiday
        } else if AttendanceCalendar::covers(&calendar.leaves, date) {
            AttendanceFlag::Leave
        } else if AttendanceCalendar::covers(&calendar.visits, date) {
            AttendanceFlag::Visit
        } else {
            AttendanceFlag::Absent
        };

        if flag == AttendanceFlag::Absent && date > today {
            AttendanceFlag::Blank
        } else {
            flag
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    const EMP: u64 = 42;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn friday_off() -> TimelineSynthesizer {
        TimelineSynthesizer::new(Weekday::Fri)
    }

    fn punch(date: NaiveDate, flag: AttendanceFlag) -> AttendancePunch {
        AttendancePunch {
            employee_id: EMP,
            date,
            in_time: Some("08:50:00".into()),
            out_time: Some("17:05:00".into()),
            flag: Some(flag),
        }
    }

    fn flags(records: &[DailyAttendanceRecord]) -> Vec<(NaiveDate, Option<AttendanceFlag>)> {
        records.iter().map(|r| (r.date(), r.flag())).collect()
    }

    #[test]
    fn empty_inputs_mark_every_past_day_absent() {
        // 2024-06-01 is a Saturday, none of these days is a Friday
        let records = friday_off().synthesize(
            d(2024, 6, 1),
            d(2024, 6, 3),
            d(2024, 7, 1),
            &[],
            &AttendanceCalendar::default(),
        );
        assert_eq!(
            flags(&records),
            vec![
                (d(2024, 6, 3), Some(AttendanceFlag::Absent)),
                (d(2024, 6, 2), Some(AttendanceFlag::Absent)),
                (d(2024, 6, 1), Some(AttendanceFlag::Absent)),
            ]
        );
        assert!(records.iter().all(|r| r.is_synthesized()));
    }

    #[test]
    fn one_record_per_day_newest_first() {
        let start = d(2024, 1, 15);
        let end = d(2024, 3, 15);
        let records = friday_off().synthesize(
            start,
            end,
            d(2024, 2, 1),
            &[punch(d(2024, 2, 1), AttendanceFlag::Present)],
            &AttendanceCalendar::default(),
        );

        let expected = (end - start).num_days() as usize + 1;
        assert_eq!(records.len(), expected);
        let unique: HashSet<_> = records.iter().map(|r| r.date()).collect();
        assert_eq!(unique.len(), expected);
        assert_eq!(records.first().map(|r| r.date()), Some(end));
        assert_eq!(records.last().map(|r| r.date()), Some(start));
        assert!(records.windows(2).all(|w| w[0].date() > w[1].date()));
    }

    #[test]
    fn single_day_range() {
        let day = d(2024, 6, 4);
        let records =
            friday_off().synthesize(day, day, day, &[], &AttendanceCalendar::default());
        assert_eq!(flags(&records), vec![(day, Some(AttendanceFlag::Absent))]);
    }

    #[test]
    fn inverted_range_is_empty() {
        let records = friday_off().synthesize(
            d(2024, 6, 3),
            d(2024, 6, 1),
            d(2024, 6, 3),
            &[punch(d(2024, 6, 2), AttendanceFlag::Present)],
            &AttendanceCalendar::default(),
        );
        assert!(records.is_empty());
    }

    #[test]
    fn punch_wins_over_leave() {
        let calendar = AttendanceCalendar::from_intervals([ApprovedInterval::new(
            d(2024, 6, 10),
            d(2024, 6, 12),
            IntervalCategory::Leave { employee_id: EMP },
        )]);
        let real = punch(d(2024, 6, 11), AttendanceFlag::Present);

        let records = friday_off().synthesize(
            d(2024, 6, 10),
            d(2024, 6, 12),
            d(2024, 6, 30),
            std::slice::from_ref(&real),
            &calendar,
        );

        assert_eq!(records[0], DailyAttendanceRecord::Synthesized {
            date: d(2024, 6, 12),
            flag: AttendanceFlag::Leave,
        });
        assert_eq!(records[1], DailyAttendanceRecord::Punch(real));
        assert_eq!(records[2].flag(), Some(AttendanceFlag::Leave));
    }

    #[test]
    fn punches_pass_through_unchanged() {
        let mut odd = punch(d(2024, 6, 7), AttendanceFlag::Delayed);
        odd.out_time = None;
        let unflagged = AttendancePunch {
            flag: None,
            ..punch(d(2024, 6, 8), AttendanceFlag::Present)
        };

        // 2024-06-07 is a Friday, the punch still wins
        let records = friday_off().synthesize(
            d(2024, 6, 7),
            d(2024, 6, 8),
            d(2024, 6, 8),
            &[odd.clone(), unflagged.clone()],
            &AttendanceCalendar::default(),
        );
        assert_eq!(
            records,
            vec![
                DailyAttendanceRecord::Punch(unflagged),
                DailyAttendanceRecord::Punch(odd),
            ]
        );
    }

    #[test]
    fn precedence_weekend_holiday_leave_visit() {
        // Friday 2024-06-14 is covered by everything
        let everything = AttendanceCalendar::from_intervals([
            ApprovedInterval::new(d(2024, 6, 13), d(2024, 6, 17), IntervalCategory::Visit {
                employee_id: EMP,
            }),
            ApprovedInterval::new(d(2024, 6, 13), d(2024, 6, 16), IntervalCategory::Leave {
                employee_id: EMP,
            }),
            ApprovedInterval::new(d(2024, 6, 14), d(2024, 6, 15), IntervalCategory::Holiday),
        ]);
        let today = d(2024, 6, 30);
        let s = friday_off();

        assert_eq!(s.placeholder_flag(d(2024, 6, 14), today, &everything), AttendanceFlag::Weekend);
        assert_eq!(s.placeholder_flag(d(2024, 6, 15), today, &everything), AttendanceFlag::Holiday);
        assert_eq!(s.placeholder_flag(d(2024, 6, 16), today, &everything), AttendanceFlag::Leave);
        assert_eq!(s.placeholder_flag(d(2024, 6, 17), today, &everything), AttendanceFlag::Visit);
        assert_eq!(s.placeholder_flag(d(2024, 6, 18), today, &everything), AttendanceFlag::Absent);
    }

    #[test]
    fn future_absent_becomes_blank() {
        let today = d(2024, 6, 18);
        let tomorrow = d(2024, 6, 19);
        let s = friday_off();
        let empty = AttendanceCalendar::default();

        assert_eq!(s.placeholder_flag(tomorrow, today, &empty), AttendanceFlag::Blank);
        assert_eq!(s.placeholder_flag(today, today, &empty), AttendanceFlag::Absent);
    }

    #[test]
    fn future_covered_days_keep_their_flag() {
        let today = d(2024, 6, 18);
        let calendar = AttendanceCalendar::from_intervals([
            ApprovedInterval::new(d(2024, 6, 20), d(2024, 6, 20), IntervalCategory::Holiday),
            ApprovedInterval::new(d(2024, 6, 22), d(2024, 6, 23), IntervalCategory::Leave {
                employee_id: EMP,
            }),
        ]);

        let records = friday_off().synthesize(d(2024, 6, 19), d(2024, 6, 24), today, &[], &calendar);
        assert_eq!(
            flags(&records),
            vec![
                (d(2024, 6, 24), Some(AttendanceFlag::Blank)),
                (d(2024, 6, 23), Some(AttendanceFlag::Leave)),
                (d(2024, 6, 22), Some(AttendanceFlag::Leave)),
                (d(2024, 6, 21), Some(AttendanceFlag::Weekend)),
                (d(2024, 6, 20), Some(AttendanceFlag::Holiday)),
                (d(2024, 6, 19), Some(AttendanceFlag::Blank)),
            ]
        );
    }

    #[test]
    fn first_duplicate_punch_wins() {
        let day = d(2024, 6, 4);
        let first = punch(day, AttendanceFlag::Delayed);
        let second = punch(day, AttendanceFlag::Present);

        let records = friday_off().synthesize(
            day,
            day,
            day,
            &[first.clone(), second],
            &AttendanceCalendar::default(),
        );
        assert_eq!(records, vec![DailyAttendanceRecord::Punch(first)]);
    }

    #[test]
    fn configurable_weekend() {
        // 2024-06-02 is a Sunday
        let records = TimelineSynthesizer::new(Weekday::Sun).synthesize(
            d(2024, 6, 1),
            d(2024, 6, 3),
            d(2024, 6, 30),
            &[],
            &AttendanceCalendar::default(),
        );
        assert_eq!(records[1].flag(), Some(AttendanceFlag::Weekend));
        assert_eq!(records[0].flag(), Some(AttendanceFlag::Absent));
    }

    #[test]
    fn synthesis_is_idempotent() {
        let calendar = AttendanceCalendar::from_intervals([ApprovedInterval::new(
            d(2024, 6, 3),
            d(2024, 6, 5),
            IntervalCategory::Visit { employee_id: EMP },
        )]);
        let punches = [punch(d(2024, 6, 2), AttendanceFlag::Present)];
        let s = friday_off();

        let a = s.synthesize(d(2024, 6, 1), d(2024, 6, 30), d(2024, 6, 15), &punches, &calendar);
        let b = s.synthesize(d(2024, 6, 1), d(2024, 6, 30), d(2024, 6, 15), &punches, &calendar);
        assert_eq!(a, b);
    }
}
