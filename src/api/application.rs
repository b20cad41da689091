//! Leave and field-visit applications. Both share one table and one
//! pending -> approved | rejected workflow; only approved ones reach the
//! attendance timeline.

use actix_web::{HttpResponse, Responder, web};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{MySqlPool, prelude::FromRow};
use strum_macros::AsRefStr;
use utoipa::{IntoParams, ToSchema};

use crate::model::interval::ApprovalStatus;

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum ApplicationKind {
    Leave,
    Visit,
}

#[derive(Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LeaveType {
    Annual,
    Sick,
    Unpaid,
}

impl LeaveType {
    fn as_str(&self) -> &str {
        match self {
            LeaveType::Annual => "annual",
            LeaveType::Sick => "sick",
            LeaveType::Unpaid => "unpaid",
        }
    }
}

#[derive(Deserialize, ToSchema)]
pub struct CreateApplication {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    /// Required for leave, ignored for visits
    #[schema(example = "sick")]
    pub leave_type: Option<LeaveType>,
    #[schema(example = "Client site survey")]
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, FromRow, ToSchema)]
pub struct ApplicationResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "sick")]
    pub leave_type: Option<String>,
    #[schema(example = "Client site survey")]
    pub reason: Option<String>,
    #[schema(example = "pending")]
    pub status: String,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
pub struct ApplicationListResponse {
    pub data: Vec<ApplicationResponse>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

#[derive(Deserialize, IntoParams)]
pub struct ApplicationFilter {
    /// Filter by employee ID
    #[param(example = 1000)]
    pub employee_id: Option<u64>,
    /// Filter by status: pending, approved or rejected
    #[param(example = "pending")]
    pub status: Option<String>,
    /// Pagination page number (start with 1)
    #[param(example = 1)]
    pub page: Option<u64>,
    /// Items per page, at most 100
    #[param(example = 10)]
    pub per_page: Option<u64>,
}

// Helper enum for typed SQLx binding
enum FilterValue<'a> {
    U64(u64),
    Str(&'a str),
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, employee_id, from_date AS start_date, to_date AS end_date,
           leave_type, reason, status, created_at
    FROM applications
"#;

async fn create(
    kind: ApplicationKind,
    pool: &MySqlPool,
    payload: CreateApplication,
) -> actix_web::Result<HttpResponse> {
    let employee_id = payload.employee_id;

    if payload.start_date > payload.end_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "start_date cannot be after end_date"
        })));
    }

    let leave_type = match (kind, &payload.leave_type) {
        (ApplicationKind::Leave, None) => {
            return Ok(HttpResponse::BadRequest().json(serde_json::json!({
                "message": "leave_type is required. Allowed: annual, sick, unpaid"
            })));
        }
        (ApplicationKind::Leave, Some(t)) => Some(t.as_str()),
        (ApplicationKind::Visit, _) => None,
    };

    sqlx::query(
        r#"
        INSERT INTO applications
            (kind, employee_id, from_date, to_date, leave_type, reason, status)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(kind.as_ref())
    .bind(employee_id)
    .bind(payload.start_date)
    .bind(payload.end_date)
    .bind(leave_type)
    .bind(payload.reason.as_deref())
    .bind(ApprovalStatus::Pending.as_ref())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, employee_id, kind = kind.as_ref(), "Failed to create application");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Application submitted",
        "status": ApprovalStatus::Pending
    })))
}

async fn decide(
    kind: ApplicationKind,
    pool: &MySqlPool,
    id: u64,
    decision: ApprovalStatus,
) -> actix_web::Result<HttpResponse> {
    let result = sqlx::query(
        r#"
        UPDATE applications
        SET status = ?
        WHERE id = ?
        AND kind = ?
        AND status = ?
        "#,
    )
    .bind(decision.as_ref())
    .bind(id)
    .bind(kind.as_ref())
    .bind(ApprovalStatus::Pending.as_ref())
    .execute(pool)
    .await
    .map_err(|e| {
        tracing::error!(error = %e, id, kind = kind.as_ref(), "Application decision failed");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    if result.rows_affected() == 0 {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "Application not found or already processed"
        })));
    }

    tracing::info!(id, kind = kind.as_ref(), status = decision.as_ref(), "Application processed");
    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": format!("Application {}", decision.as_ref())
    })))
}

async fn get_one(
    kind: ApplicationKind,
    pool: &MySqlPool,
    id: u64,
) -> actix_web::Result<HttpResponse> {
    let sql = format!("{SELECT_COLUMNS} WHERE id = ? AND kind = ?");
    let application = sqlx::query_as::<_, ApplicationResponse>(&sql)
        .bind(id)
        .bind(kind.as_ref())
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, id, "Failed to fetch application");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    match application {
        Some(data) => Ok(HttpResponse::Ok().json(data)),
        None => Ok(HttpResponse::NotFound().json(serde_json::json!({
            "message": "Application not found"
        }))),
    }
}

/// `(page, per_page, offset)`. The page is held within `u32`, which keeps
/// the offset far from overflowing.
fn paginate(page: Option<u64>, per_page: Option<u64>) -> (u32, u32, u64) {
    let per_page = per_page.unwrap_or(10).clamp(1, 100) as u32;
    let page = page.unwrap_or(1).clamp(1, u64::from(u32::MAX)) as u32;
    let offset = u64::from(page - 1) * u64::from(per_page);
    (page, per_page, offset)
}

async fn list(
    kind: ApplicationKind,
    pool: &MySqlPool,
    query: &ApplicationFilter,
) -> actix_web::Result<HttpResponse> {
    // -------------------------
    // Pagination
    // -------------------------
    let (page, per_page, offset) = paginate(query.page, query.per_page);

    // -------------------------
    // WHERE clause
    // -------------------------
    let mut where_sql = String::from(" WHERE kind = ?");
    let mut args: Vec<FilterValue> = vec![FilterValue::Str(kind.as_ref())];

    if let Some(emp_id) = query.employee_id {
        where_sql.push_str(" AND employee_id = ?");
        args.push(FilterValue::U64(emp_id));
    }

    if let Some(status) = query.status.as_deref() {
        where_sql.push_str(" AND status = ?");
        args.push(FilterValue::Str(status));
    }

    // -------------------------
    // COUNT query
    // -------------------------
    let count_sql = format!("SELECT COUNT(*) FROM applications{}", where_sql);

    let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
    for arg in &args {
        count_q = match arg {
            FilterValue::U64(v) => count_q.bind(*v),
            FilterValue::Str(s) => count_q.bind(*s),
        };
    }

    let total = count_q.fetch_one(pool).await.map_err(|e| {
        tracing::error!(error = %e, "Failed to count applications");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    // -------------------------
    // DATA query
    // -------------------------
    let data_sql = format!(
        "{SELECT_COLUMNS}{where_sql} ORDER BY created_at DESC LIMIT ? OFFSET ?"
    );

    let mut data_q = sqlx::query_as::<_, ApplicationResponse>(&data_sql);
    for arg in args {
        data_q = match arg {
            FilterValue::U64(v) => data_q.bind(v),
            FilterValue::Str(s) => data_q.bind(s),
        };
    }

    let data = data_q
        .bind(per_page)
        .bind(offset)
        .fetch_all(pool)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch application list");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(ApplicationListResponse {
        data,
        page,
        per_page,
        total,
    }))
}

/* =========================
Leave
========================= */

#[utoipa::path(
    post,
    path = "/api/leave",
    request_body = CreateApplication,
    responses(
        (status = 200, description = "Leave application submitted", body = Object, example = json!({
            "message": "Application submitted",
            "status": "pending"
        })),
        (status = 400, description = "Bad request")
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateApplication>,
) -> actix_web::Result<impl Responder> {
    create(ApplicationKind::Leave, pool.get_ref(), payload.into_inner()).await
}

#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/approve",
    params(("leave_id" = u64, Path, description = "ID of the leave application to approve")),
    responses(
        (status = 200, description = "Leave approved"),
        (status = 400, description = "Not found or already processed")
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide(ApplicationKind::Leave, pool.get_ref(), path.into_inner(), ApprovalStatus::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/leave/{leave_id}/reject",
    params(("leave_id" = u64, Path, description = "ID of the leave application to reject")),
    responses(
        (status = 200, description = "Leave rejected"),
        (status = 400, description = "Not found or already processed")
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide(ApplicationKind::Leave, pool.get_ref(), path.into_inner(), ApprovalStatus::Rejected).await
}

#[utoipa::path(
    get,
    path = "/api/leave/{leave_id}",
    params(("leave_id" = u64, Path, description = "ID of the leave application")),
    responses(
        (status = 200, description = "Leave application", body = ApplicationResponse),
        (status = 404, description = "Not found")
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    get_one(ApplicationKind::Leave, pool.get_ref(), path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/leave",
    params(ApplicationFilter),
    responses((status = 200, description = "Paginated leave applications", body = ApplicationListResponse)),
    tag = "Leave"
)]
pub async fn leave_list(
    pool: web::Data<MySqlPool>,
    query: web::Query<ApplicationFilter>,
) -> actix_web::Result<impl Responder> {
    list(ApplicationKind::Leave, pool.get_ref(), &query).await
}

/* =========================
Field visit
========================= */

#[utoipa::path(
    post,
    path = "/api/visit",
    request_body = CreateApplication,
    responses(
        (status = 200, description = "Visit application submitted", body = Object, example = json!({
            "message": "Application submitted",
            "status": "pending"
        })),
        (status = 400, description = "Bad request")
    ),
    tag = "Visit"
)]
pub async fn create_visit(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateApplication>,
) -> actix_web::Result<impl Responder> {
    create(ApplicationKind::Visit, pool.get_ref(), payload.into_inner()).await
}

#[utoipa::path(
    put,
    path = "/api/visit/{visit_id}/approve",
    params(("visit_id" = u64, Path, description = "ID of the visit application to approve")),
    responses(
        (status = 200, description = "Visit approved"),
        (status = 400, description = "Not found or already processed")
    ),
    tag = "Visit"
)]
pub async fn approve_visit(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide(ApplicationKind::Visit, pool.get_ref(), path.into_inner(), ApprovalStatus::Approved).await
}

#[utoipa::path(
    put,
    path = "/api/visit/{visit_id}/reject",
    params(("visit_id" = u64, Path, description = "ID of the visit application to reject")),
    responses(
        (status = 200, description = "Visit rejected"),
        (status = 400, description = "Not found or already processed")
    ),
    tag = "Visit"
)]
pub async fn reject_visit(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    decide(ApplicationKind::Visit, pool.get_ref(), path.into_inner(), ApprovalStatus::Rejected).await
}

#[utoipa::path(
    get,
    path = "/api/visit/{visit_id}",
    params(("visit_id" = u64, Path, description = "ID of the visit application")),
    responses(
        (status = 200, description = "Visit application", body = ApplicationResponse),
        (status = 404, description = "Not found")
    ),
    tag = "Visit"
)]
pub async fn get_visit(
    pool: web::Data<MySqlPool>,
    path: web::Path<u64>,
) -> actix_web::Result<impl Responder> {
    get_one(ApplicationKind::Visit, pool.get_ref(), path.into_inner()).await
}

#[utoipa::path(
    get,
    path = "/api/visit",
    params(ApplicationFilter),
    responses((status = 200, description = "Paginated visit applications", body = ApplicationListResponse)),
    tag = "Visit"
)]
pub async fn visit_list(
    pool: web::Data<MySqlPool>,
    query: web::Query<ApplicationFilter>,
) -> actix_web::Result<impl Responder> {
    list(ApplicationKind::Visit, pool.get_ref(), &query).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_matches_stored_value() {
        assert_eq!(ApplicationKind::Leave.as_ref(), "leave");
        assert_eq!(ApplicationKind::Visit.as_ref(), "visit");
    }

    #[test]
    fn leave_type_wire_names() {
        let t: LeaveType = serde_json::from_str("\"unpaid\"").unwrap();
        assert_eq!(t.as_str(), "unpaid");
    }

    #[test]
    fn pagination_is_clamped() {
        assert_eq!(paginate(None, None), (1, 10, 0));
        assert_eq!(paginate(Some(0), Some(0)), (1, 1, 0));
        assert_eq!(paginate(Some(3), Some(500)), (3, 100, 200));

        let (page, per_page, offset) = paginate(Some(u64::MAX), Some(u64::MAX));
        assert_eq!(page, u32::MAX);
        assert_eq!(per_page, 100);
        assert_eq!(offset, (u64::from(u32::MAX) - 1) * 100);
    }
}
