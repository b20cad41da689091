use actix_web::{HttpResponse, Responder, web};
use serde::{Deserialize, Serialize};
use sqlx::MySqlPool;
use utoipa::{IntoParams, ToSchema};

use crate::model::geo_zone::{GeoZone, ZoneKind};
use crate::utils::zone_cache::ZoneCache;

#[derive(Serialize, ToSchema)]
pub struct ZoneResponse {
    #[schema(example = "Head office")]
    pub name: String,
    #[schema(example = "branch", value_type = String)]
    pub kind: ZoneKind,
    #[schema(example = 23.8103)]
    pub latitude: f64,
    #[schema(example = 90.4125)]
    pub longitude: f64,
    #[schema(example = 100.0)]
    pub radius: f64,
}

impl From<&GeoZone> for ZoneResponse {
    fn from(zone: &GeoZone) -> Self {
        ZoneResponse {
            name: zone.name().to_string(),
            kind: zone.kind(),
            latitude: zone.center().latitude,
            longitude: zone.center().longitude,
            radius: zone.radius_m(),
        }
    }
}

#[derive(Deserialize, IntoParams)]
pub struct ZoneQuery {
    /// Reload from the database instead of the cache
    #[param(example = false)]
    pub refresh: Option<bool>,
}

/// Zones a check-in from this branch is validated against
#[utoipa::path(
    get,
    path = "/api/branch/{branch_id}/zones",
    params(
        ("branch_id" = u64, Path, description = "Branch ID"),
        ZoneQuery
    ),
    responses(
        (status = 200, description = "Branch geofence followed by its hotspots", body = [ZoneResponse]),
        (status = 500, description = "Internal server error")
    ),
    tag = "Branch"
)]
pub async fn branch_zones(
    pool: web::Data<MySqlPool>,
    zone_cache: web::Data<ZoneCache>,
    path: web::Path<u64>,
    query: web::Query<ZoneQuery>,
) -> actix_web::Result<impl Responder> {
    let branch_id = path.into_inner();

    if query.refresh.unwrap_or(false) {
        zone_cache.invalidate(branch_id).await;
    }

    let zones = zone_cache
        .zones_for(pool.get_ref(), branch_id)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, branch_id, "Zone lookup failed");
            actix_web::error::ErrorInternalServerError("Internal Server Error")
        })?;

    let data: Vec<ZoneResponse> = zones.zones.iter().map(ZoneResponse::from).collect();
    Ok(HttpResponse::Ok().json(data))
}
