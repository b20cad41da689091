use chrono::{NaiveDate, NaiveTime};
use sqlx::{FromRow, MySqlPool};

use crate::model::attendance::AttendancePunch;
use crate::model::geo_zone::{GeoZone, ZoneKind};
use crate::model::interval::{ApprovalStatus, ApprovedInterval};
use crate::resolver::parse::{RawInterval, RawPunch, RawZone, parse_lenient};
use crate::resolver::timeline::AttendanceCalendar;

pub async fn init_db(database_url: &str) -> Result<MySqlPool, sqlx::Error> {
    MySqlPool::connect(database_url).await
}

#[derive(FromRow)]
struct PunchRow {
    employee_id: u64,
    date: NaiveDate,
    in_time: Option<NaiveTime>,
    out_time: Option<NaiveTime>,
    flag: Option<String>,
}

impl From<PunchRow> for RawPunch {
    fn from(row: PunchRow) -> Self {
        let fmt = |t: NaiveTime| t.format("%H:%M:%S").to_string();
        RawPunch {
            employee_id: row.employee_id,
            date: row.date.to_string(),
            in_time: row.in_time.map(fmt),
            out_time: row.out_time.map(fmt),
            flag: row.flag,
        }
    }
}

#[derive(FromRow)]
struct IntervalRow {
    category: String,
    employee_id: Option<u64>,
    from_date: NaiveDate,
    to_date: NaiveDate,
}

impl From<IntervalRow> for RawInterval {
    fn from(row: IntervalRow) -> Self {
        RawInterval {
            category: row.category,
            employee_id: row.employee_id,
            from: row.from_date.to_string(),
            to: row.to_date.to_string(),
        }
    }
}

#[derive(FromRow)]
struct ZoneRow {
    name: String,
    latitude: Option<f64>,
    longitude: Option<f64>,
    radius: Option<f64>,
}

impl ZoneRow {
    fn into_raw(self, kind: ZoneKind) -> RawZone {
        RawZone {
            name: self.name,
            kind,
            latitude: self.latitude,
            longitude: self.longitude,
            radius: self.radius,
        }
    }
}

/// Stored punches of one employee within `[from, to]`.
pub async fn fetch_punches(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<AttendancePunch>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PunchRow>(
        r#"
        SELECT employee_id, date, in_time, out_time, flag
        FROM attendance
        WHERE employee_id = ?
        AND date BETWEEN ? AND ?
        ORDER BY date DESC, id ASC
        "#,
    )
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await?;

    Ok(parse_lenient("punch", rows.into_iter().map(RawPunch::from)).0)
}

/// Holidays overlapping `[from, to]`.
pub async fn fetch_holidays(
    pool: &MySqlPool,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ApprovedInterval>, sqlx::Error> {
    let rows = sqlx::query_as::<_, IntervalRow>(
        r#"
        SELECT 'holiday' AS category, CAST(NULL AS UNSIGNED) AS employee_id, from_date, to_date
        FROM holidays
        WHERE from_date <= ?
        AND to_date >= ?
        "#,
    )
    .bind(to)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(parse_lenient("holiday", rows.into_iter().map(RawInterval::from)).0)
}

/// Approved leave and visit applications of one employee overlapping
/// `[from, to]`.
pub async fn fetch_approved_applications(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<Vec<ApprovedInterval>, sqlx::Error> {
    let rows = sqlx::query_as::<_, IntervalRow>(
        r#"
        SELECT kind AS category, employee_id, from_date, to_date
        FROM applications
        WHERE employee_id = ?
        AND status = ?
        AND from_date <= ?
        AND to_date >= ?
        "#,
    )
    .bind(employee_id)
    .bind(ApprovalStatus::Approved.as_ref())
    .bind(to)
    .bind(from)
    .fetch_all(pool)
    .await?;

    Ok(parse_lenient("application", rows.into_iter().map(RawInterval::from)).0)
}

/// Everything the timeline needs for one employee, fetched concurrently.
pub async fn fetch_timeline_inputs(
    pool: &MySqlPool,
    employee_id: u64,
    from: NaiveDate,
    to: NaiveDate,
) -> Result<(Vec<AttendancePunch>, AttendanceCalendar), sqlx::Error> {
    let (punches, holidays, applications) = futures::try_join!(
        fetch_punches(pool, employee_id, from, to),
        fetch_holidays(pool, from, to),
        fetch_approved_applications(pool, employee_id, from, to),
    )?;

    let calendar = AttendanceCalendar::from_intervals(holidays.into_iter().chain(applications));
    Ok((punches, calendar))
}

/// Branch of an employee. `None` when the employee does not exist,
/// `Some(None)` when they have no branch assigned.
pub async fn fetch_employee_branch(
    pool: &MySqlPool,
    employee_id: u64,
) -> Result<Option<Option<u64>>, sqlx::Error> {
    sqlx::query_scalar::<_, Option<u64>>("SELECT branch_id FROM employees WHERE id = ?")
        .bind(employee_id)
        .fetch_optional(pool)
        .await
}

/// Usable zones of one branch, and how many stored rows were left out for
/// missing or invalid geometry.
#[derive(Debug, Default, PartialEq)]
pub struct BranchZones {
    pub zones: Vec<GeoZone>,
    pub skipped: usize,
}

impl BranchZones {
    fn from_raws(branch_id: u64, raws: impl IntoIterator<Item = RawZone>) -> Self {
        let (zones, skipped) = parse_lenient("zone", raws);
        if skipped > 0 {
            tracing::warn!(branch_id, skipped, "branch has zones without usable geometry");
        }
        Self { zones, skipped }
    }
}

/// Branch geofence followed by its hotspots.
pub async fn fetch_branch_zones(
    pool: &MySqlPool,
    branch_id: u64,
) -> Result<BranchZones, sqlx::Error> {
    let branch = sqlx::query_as::<_, ZoneRow>(
        "SELECT name, latitude, longitude, radius FROM branches WHERE id = ?",
    )
    .bind(branch_id)
    .fetch_optional(pool)
    .await?;

    let hotspots = sqlx::query_as::<_, ZoneRow>(
        "SELECT name, latitude, longitude, radius FROM hotspots WHERE branch_id = ? ORDER BY id",
    )
    .bind(branch_id)
    .fetch_all(pool)
    .await?;

    let raws = branch
        .map(|b| b.into_raw(ZoneKind::Branch))
        .into_iter()
        .chain(hotspots.into_iter().map(|h| h.into_raw(ZoneKind::Hotspot)));

    Ok(BranchZones::from_raws(branch_id, raws))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, radius: Option<f64>) -> ZoneRow {
        ZoneRow {
            name: name.into(),
            latitude: Some(23.8103),
            longitude: Some(90.4125),
            radius,
        }
    }

    #[test]
    fn branch_zones_count_unusable_rows() {
        let raws = vec![
            row("Head office", Some(100.0)).into_raw(ZoneKind::Branch),
            row("Gate", None).into_raw(ZoneKind::Hotspot),
            row("Canteen", Some(0.0)).into_raw(ZoneKind::Hotspot),
            row("Annex", Some(40.0)).into_raw(ZoneKind::Hotspot),
        ];
        let zones = BranchZones::from_raws(7, raws);

        assert_eq!(zones.skipped, 2);
        let names: Vec<_> = zones.zones.iter().map(GeoZone::name).collect();
        assert_eq!(names, vec!["Head office", "Annex"]);
    }
}
