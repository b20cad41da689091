use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::config::Config;
use crate::model::attendance::{AttendancePunch, DailyAttendanceRecord};
use crate::model::geo_zone::{GeoPoint, GeoZone, GeofenceResult};
use crate::model::interval::ApprovedInterval;
use crate::resolver::flag::FlagResolver;
use crate::resolver::geofence;
use crate::resolver::parse::{RawInterval, RawPunch, RawZone, parse_lenient};
use crate::resolver::timeline::{AttendanceCalendar, TimelineSynthesizer};

#[derive(Serialize, ToSchema)]
pub struct TimelineEntry {
    #[schema(example = "2024-06-11", format = "date", value_type = String)]
    pub date: NaiveDate,
    #[schema(example = "08:57:12")]
    pub in_time: Option<String>,
    #[schema(example = "17:02:40")]
    pub out_time: Option<String>,
    /// One of P, D, L, W, H, V, A or empty for a future day
    #[schema(example = "P")]
    pub flag: Option<String>,
    /// true when no punch exists for the day
    #[schema(example = false)]
    pub synthesized: bool,
}

impl From<&DailyAttendanceRecord> for TimelineEntry {
    fn from(record: &DailyAttendanceRecord) -> Self {
        TimelineEntry {
            date: record.date(),
            in_time: record.in_time().map(str::to_string),
            out_time: record.out_time().map(str::to_string),
            flag: record.flag().map(|f| f.to_string()),
            synthesized: record.is_synthesized(),
        }
    }
}

#[derive(Serialize, ToSchema)]
pub struct TimelineResponse {
    pub data: Vec<TimelineEntry>,
    /// Entries dropped because they could not be read
    #[schema(example = 0)]
    pub skipped: usize,
}

impl TimelineResponse {
    pub fn from_records(records: &[DailyAttendanceRecord], skipped: usize) -> Self {
        Self {
            data: records.iter().map(TimelineEntry::from).collect(),
            skipped,
        }
    }
}

/// Rejects ranges covering more than `max_days` days. An inverted range
/// covers nothing and passes.
pub fn check_timeline_range(
    start: NaiveDate,
    end: NaiveDate,
    max_days: u32,
) -> Result<(), HttpResponse> {
    if start > end {
        return Ok(());
    }
    let days = (end - start).num_days() + 1;
    if days > i64::from(max_days) {
        return Err(HttpResponse::BadRequest().json(serde_json::json!({
            "message": format!("Date range covers {days} days, at most {max_days} allowed")
        })));
    }
    Ok(())
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveTimeline {
    #[schema(example = "2024-06-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-30", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Defaults to the server's local date
    #[schema(example = "2024-06-15", format = "date", value_type = Option<String>)]
    pub today: Option<NaiveDate>,
    #[serde(default)]
    pub punches: Vec<RawPunch>,
    /// Approved holidays, and approved leaves and visits of the same employee
    #[serde(default)]
    pub intervals: Vec<RawInterval>,
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveGeofence {
    #[schema(example = 23.8105)]
    pub latitude: f64,
    #[schema(example = 90.4127)]
    pub longitude: f64,
    #[serde(default)]
    pub zones: Vec<RawZone>,
}

#[derive(Serialize, ToSchema)]
pub struct GeofenceResponse {
    #[schema(example = true)]
    pub contained: bool,
    /// Distance to the nearest zone center; null when there were no zones
    #[schema(example = 27.4)]
    pub distance_m: Option<f64>,
    #[schema(example = "Head office")]
    pub nearest_zone: Option<String>,
    #[schema(example = 0)]
    pub skipped: usize,
}

impl GeofenceResponse {
    pub fn new(result: GeofenceResult, skipped: usize) -> Self {
        Self {
            contained: result.contained,
            distance_m: result.distance_m.is_finite().then_some(result.distance_m),
            nearest_zone: result.nearest_zone,
            skipped,
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct ResolveFlag {
    #[schema(example = "09:04:31")]
    pub in_time: String,
}

/// Builds a gap-filled attendance timeline from the supplied documents
#[utoipa::path(
    post,
    path = "/api/resolve/timeline",
    request_body = ResolveTimeline,
    responses(
        (status = 200, description = "One entry per day, newest first", body = TimelineResponse),
        (status = 400, description = "Date range too long", body = Object, example = json!({
            "message": "Date range covers 400 days, at most 366 allowed"
        }))
    ),
    tag = "Resolve"
)]
pub async fn resolve_timeline(
    config: web::Data<Config>,
    payload: web::Json<ResolveTimeline>,
) -> impl Responder {
    let payload = payload.into_inner();
    if let Err(resp) =
        check_timeline_range(payload.start_date, payload.end_date, config.max_timeline_days)
    {
        return resp;
    }
    let today = payload.today.unwrap_or_else(|| Local::now().date_naive());

    let (punches, skipped_punches): (Vec<AttendancePunch>, _) =
        parse_lenient("punch", payload.punches);
    let (intervals, skipped_intervals): (Vec<ApprovedInterval>, _) =
        parse_lenient("interval", payload.intervals);

    let records = TimelineSynthesizer::new(config.weekend_day).synthesize(
        payload.start_date,
        payload.end_date,
        today,
        &punches,
        &AttendanceCalendar::from_intervals(intervals),
    );

    HttpResponse::Ok().json(TimelineResponse::from_records(
        &records,
        skipped_punches + skipped_intervals,
    ))
}

/// Checks a GPS reading against the supplied zones
#[utoipa::path(
    post,
    path = "/api/resolve/geofence",
    request_body = ResolveGeofence,
    responses(
        (status = 200, description = "Containment and nearest distance", body = GeofenceResponse)
    ),
    tag = "Resolve"
)]
pub async fn resolve_geofence(payload: web::Json<ResolveGeofence>) -> impl Responder {
    let payload = payload.into_inner();
    let point = GeoPoint::new(payload.latitude, payload.longitude);

    let (zones, skipped): (Vec<GeoZone>, _) = parse_lenient("zone", payload.zones);
    let result = geofence::validate(point, &zones);

    HttpResponse::Ok().json(GeofenceResponse::new(result, skipped))
}

/// Classifies a clock-in time against the configured shift start
#[utoipa::path(
    post,
    path = "/api/resolve/flag",
    request_body = ResolveFlag,
    responses(
        (status = 200, description = "P when on time, D otherwise", body = Object, example = json!({
            "flag": "P"
        }))
    ),
    tag = "Resolve"
)]
pub async fn resolve_flag(
    config: web::Data<Config>,
    payload: web::Json<ResolveFlag>,
) -> impl Responder {
    let flag = FlagResolver::new(config.shift_start).resolve(&payload.in_time);
    HttpResponse::Ok().json(serde_json::json!({ "flag": flag }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::attendance::AttendanceFlag;

    #[test]
    fn infinite_distance_becomes_null() {
        let response = GeofenceResponse::new(geofence::validate(GeoPoint::new(0.0, 0.0), &[]), 0);
        assert_eq!(response.distance_m, None);
        assert!(!response.contained);
    }

    #[test]
    fn entry_from_placeholder() {
        let date = NaiveDate::from_ymd_opt(2024, 6, 19).unwrap();
        let entry = TimelineEntry::from(&DailyAttendanceRecord::Synthesized {
            date,
            flag: AttendanceFlag::Blank,
        });
        assert_eq!(entry.flag.as_deref(), Some(""));
        assert!(entry.synthesized);
        assert_eq!(entry.in_time, None);
    }

    #[test]
    fn timeline_range_is_capped() {
        let d = |y, m, day| NaiveDate::from_ymd_opt(y, m, day).unwrap();

        // 2024 is a leap year: 366 days
        assert!(check_timeline_range(d(2024, 1, 1), d(2024, 12, 31), 366).is_ok());

        let too_long = check_timeline_range(d(2024, 1, 1), d(2025, 1, 1), 366).unwrap_err();
        assert_eq!(too_long.status(), actix_web::http::StatusCode::BAD_REQUEST);

        let far_future = NaiveDate::from_ymd_opt(200_000, 12, 31).unwrap();
        assert!(check_timeline_range(d(2024, 1, 1), far_future, 366).is_err());

        assert!(check_timeline_range(d(2024, 6, 30), d(2024, 6, 1), 366).is_ok());
        assert!(check_timeline_range(d(2024, 6, 1), d(2024, 6, 1), 1).is_ok());
    }
}
