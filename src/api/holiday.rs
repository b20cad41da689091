use actix_web::{HttpResponse, Responder, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, MySqlPool};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateHoliday {
    #[schema(example = "Eid-ul-Adha")]
    pub title: String,
    #[schema(example = "2024-06-16", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2024-06-18", format = "date", value_type = String)]
    pub to_date: NaiveDate,
}

#[derive(Serialize, FromRow, ToSchema)]
pub struct HolidayResponse {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Eid-ul-Adha")]
    pub title: String,
    #[schema(example = "2024-06-16", format = "date", value_type = String)]
    pub from_date: NaiveDate,
    #[schema(example = "2024-06-18", format = "date", value_type = String)]
    pub to_date: NaiveDate,
}

#[derive(Deserialize, IntoParams)]
pub struct HolidayFilter {
    /// Only holidays touching this year
    #[param(example = 2024)]
    pub year: Option<i32>,
}

/// Holidays count as approved once recorded
#[utoipa::path(
    post,
    path = "/api/holiday",
    request_body = CreateHoliday,
    responses(
        (status = 200, description = "Holiday recorded", body = Object, example = json!({
            "message": "Holiday created"
        })),
        (status = 400, description = "Bad request"),
        (status = 500, description = "Internal server error")
    ),
    tag = "Holiday"
)]
pub async fn create_holiday(
    pool: web::Data<MySqlPool>,
    payload: web::Json<CreateHoliday>,
) -> actix_web::Result<impl Responder> {
    if payload.title.trim().is_empty() {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "title must not be empty"
        })));
    }
    if payload.from_date > payload.to_date {
        return Ok(HttpResponse::BadRequest().json(serde_json::json!({
            "message": "from_date cannot be after to_date"
        })));
    }

    sqlx::query("INSERT INTO holidays (title, from_date, to_date) VALUES (?, ?, ?)")
        .bind(payload.title.trim())
        .bind(payload.from_date)
        .bind(payload.to_date)
        .execute(pool.get_ref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to create holiday");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    Ok(HttpResponse::Ok().json(serde_json::json!({
        "message": "Holiday created"
    })))
}

#[utoipa::path(
    get,
    path = "/api/holiday",
    params(HolidayFilter),
    responses(
        (status = 200, description = "Holidays, latest first", body = [HolidayResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Holiday"
)]
pub async fn list_holidays(
    pool: web::Data<MySqlPool>,
    query: web::Query<HolidayFilter>,
) -> actix_web::Result<impl Responder> {
    let holidays = match query.year {
        Some(year) => {
            sqlx::query_as::<_, HolidayResponse>(
                r#"
                SELECT id, title, from_date, to_date
                FROM holidays
                WHERE YEAR(from_date) <= ? AND YEAR(to_date) >= ?
                ORDER BY from_date DESC
                "#,
            )
            .bind(year)
            .bind(year)
            .fetch_all(pool.get_ref())
            .await
        }
        None => {
            sqlx::query_as::<_, HolidayResponse>(
                "SELECT id, title, from_date, to_date FROM holidays ORDER BY from_date DESC",
            )
            .fetch_all(pool.get_ref())
            .await
        }
    }
    .map_err(|e| {
        tracing::error!(error = %e, "Failed to fetch holidays");
        actix_web::error::ErrorInternalServerError("Internal Server Error")
    })?;

    Ok(HttpResponse::Ok().json(holidays))
}
