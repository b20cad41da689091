use actix_web::{HttpResponse, Responder, web};
use chrono::{Local, NaiveDate};
use serde::Deserialize;
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::api::resolve::{GeofenceResponse, TimelineResponse, check_timeline_range};
use crate::config::Config;
use crate::db;
use crate::model::attendance::DailyAttendanceRecord;
use crate::model::geo_zone::GeoPoint;
use crate::model::interval::ApprovalStatus;
use crate::resolver::flag::FlagResolver;
use crate::resolver::geofence;
use crate::resolver::summary::FlagSummary;
use crate::resolver::timeline::TimelineSynthesizer;
use crate::utils::zone_cache::ZoneCache;

#[derive(Deserialize, ToSchema)]
pub struct CheckIn {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = 23.8105)]
    pub latitude: f64,
    #[schema(example = 90.4127)]
    pub longitude: f64,
}

#[derive(Deserialize, ToSchema)]
pub struct CheckOut {
    #[schema(example = 1000)]
    pub employee_id: u64,
}

#[derive(Deserialize, IntoParams)]
pub struct TimelineQuery {
    /// Employee whose attendance is requested
    #[param(example = 1000)]
    pub employee_id: u64,
    /// First day, inclusive
    #[param(value_type = String, format = Date, example = "2024-06-01")]
    pub from: NaiveDate,
    /// Last day, inclusive
    #[param(value_type = String, format = Date, example = "2024-06-30")]
    pub to: NaiveDate,
}

/// Check-in endpoint
#[utoipa::path(
    post,
    path = "/api/attendance/check-in",
    request_body = CheckIn,
    responses(
        (status = 200, description = "Checked in", body = Object, example = json!({
            "message": "Checked in successfully",
            "flag": "P",
            "approval_status": "approved",
            "geofence": { "contained": true, "distance_m": 27.4, "nearest_zone": "Head office", "skipped": 0 }
        })),
        (status = 400, description = "Already checked in today or bad coordinates", body = Object, example = json!({
            "message": "Already checked in today"
        })),
        (status = 404, description = "Employee not found"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_in(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    zone_cache: web::Data<ZoneCache>,
    payload: web::Json<CheckIn>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let point = GeoPoint::new(payload.latitude, payload.longitude);
    if !point.is_valid() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Coordinates out of range"
        })));
    }

    let branch = db::fetch_employee_branch(pool.get_ref(), employee_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Branch lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let branch_id = match branch {
        Some(branch_id) => branch_id,
        None => {
            return Ok(HttpResponse::NotFound().json(serde_json::json!({
                "message": "Employee not found"
            })));
        }
    };

    let zones = match branch_id {
        Some(branch_id) => zone_cache
            .zones_for(pool.get_ref(), branch_id)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, employee_id, branch_id, "Zone lookup failed");
                actix_web::error::ErrorInternalServerError("Internal Server Error")
            })?,
        None => Default::default(),
    };

    let result = geofence::validate(point, &zones.zones);
    // no zones means nothing to validate against, so it waits for a reviewer
    let approval = if result.contained {
        ApprovalStatus::Approved
    } else {
        ApprovalStatus::Pending
    };

    let now = Local::now().naive_local();
    let flag = FlagResolver::new(config.shift_start).resolve_time(now.time());

    let insert = sqlx::query(
        r#"
        INSERT INTO attendance
            (employee_id, date, in_time, flag, approval_status, latitude, longitude, distance_m)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(employee_id)
    .bind(now.date())
    .bind(now.time())
    .bind(flag.as_ref())
    .bind(approval.as_ref())
    .bind(point.latitude)
    .bind(point.longitude)
    .bind(result.distance_m.is_finite().then_some(result.distance_m))
    .execute(pool.get_ref())
    .await;

    match insert {
        Ok(_) => {
            tracing::info!(
                employee_id,
                flag = %flag,
                contained = result.contained,
                distance_m = result.distance_m,
                "Checked in"
            );
            Ok(HttpResponse::Ok().json(serde_json::json!({
                "message": "Checked in successfully",
                "flag": flag,
                "approval_status": approval,
                "geofence": GeofenceResponse::new(result, zones.skipped),
            })))
        }

        Err(e) => {
            // Duplicate check-in for same day
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.code().as_deref() == Some("23000") {
                    return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                        "message": "Already checked in today"
                    })));
                }
            }

            tracing::error!(error = %e, employee_id, "Check-in failed");
            Err(actix_web::error::ErrorInternalServerError(
                "Internal Server Error",
            ))
        }
    }
}

/// Check-out endpoint
#[utoipa::path(
    put,
    path = "/api/attendance/check-out",
    request_body = CheckOut,
    responses(
        (status = 200, description = "Checked out successfully", body = Object, example = json!({
            "message": "Checked out successfully"
        })),
        (status = 400, description = "No active check-in found for today", body = Object, example = json!({
            "message": "No active check-in found for today"
        })),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn check_out(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CheckOut>,
) -> actix_web::Result<impl Responder> {
    let employee_id = payload.employee_id;
    let now = Local::now().naive_local();

    let result = sqlx::query(
        r#"
        UPDATE attendance
        SET out_time = ?
        WHERE employee_id = ?
        AND date = ?
        AND out_time IS NULL
        "#,
    )
    .bind(now.time())
    .bind(employee_id)
    .bind(now.date())
    .execute(pool.get_ref())
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, "Check-out failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "No active check-in found for today"
        })));
    }

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Checked out successfully"
    })))
}

async fn load_timeline(
    pool: &MySqlPool,
    config: &Config,
    query: &TimelineQuery,
) -> actix_web::Result<Vec<DailyAttendanceRecord>> {
    if query.from > query.to {
        return Ok(Vec::new());
    }

    let employee_id = query.employee_id;
    let (punches, calendar) = db::fetch_timeline_inputs(pool, employee_id, query.from, query.to)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, employee_id, "Failed to load timeline inputs");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let today = Local::now().date_naive();
    Ok(TimelineSynthesizer::new(config.weekend_day).synthesize(
        query.from,
        query.to,
        today,
        &punches,
        &calendar,
    ))
}

/// Daily attendance of one employee with every gap filled
#[utoipa::path(
    get,
    path = "/api/attendance/timeline",
    params(TimelineQuery),
    responses(
        (status = 200, description = "One entry per day, newest first", body = TimelineResponse),
        (status = 400, description = "Date range too long"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn timeline(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<TimelineQuery>,
) -> actix_web::Result<impl Responder> {
    if let Err(resp) = check_timeline_range(query.from, query.to, config.max_timeline_days) {
        return Ok(resp);
    }
    let records = load_timeline(pool.get_ref(), config.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(TimelineResponse::from_records(&records, 0)))
}

/// Day counts per flag over the same range as the timeline
#[utoipa::path(
    get,
    path = "/api/attendance/summary",
    params(TimelineQuery),
    responses(
        (status = 200, description = "Counts per flag", body = FlagSummary),
        (status = 400, description = "Date range too long"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Attendance"
)]
pub async fn summary(
    pool: web::Data<MySqlPool>,
    config: web::Data<Config>,
    query: web::Query<TimelineQuery>,
) -> actix_web::Result<impl Responder> {
    if let Err(resp) = check_timeline_range(query.from, query.to, config.max_timeline_days) {
        return Ok(resp);
    }
    let records = load_timeline(pool.get_ref(), config.get_ref(), &query).await?;
    Ok(HttpResponse::Ok().json(FlagSummary::from_records(&records)))
}
