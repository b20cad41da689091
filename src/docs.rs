use crate::api::application::{
    ApplicationListResponse, ApplicationResponse, CreateApplication, LeaveType,
};
use crate::api::attendance::{CheckIn, CheckOut};
use crate::api::branch::ZoneResponse;
use crate::api::holiday::{CreateHoliday, HolidayResponse};
use crate::api::resolve::{
    GeofenceResponse, ResolveFlag, ResolveGeofence, ResolveTimeline, TimelineEntry,
    TimelineResponse,
};
use crate::resolver::parse::{RawInterval, RawPunch, RawZone};
use crate::resolver::summary::FlagSummary;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Attendance API",
        version = "1.0.0",
        description = r#"
## Attendance reconciliation & geofencing

- **Check-in / check-out** validated against the employee's branch geofence
  and its hotspots, flagged on-time (`P`) or delayed (`D`)
- **Timelines** with one entry per day: the stored punch, or a placeholder
  flagged `W` weekend, `H` holiday, `L` leave, `V` visit, `A` absent, or
  empty for a future day
- **Holidays, leave and field-visit applications**, the calendars timelines
  are built from
- **Resolve** endpoints run the same computations on data supplied in the
  request

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::resolve::resolve_timeline,
        crate::api::resolve::resolve_geofence,
        crate::api::resolve::resolve_flag,

        crate::api::attendance::check_in,
        crate::api::attendance::check_out,
        crate::api::attendance::timeline,
        crate::api::attendance::summary,

        crate::api::holiday::create_holiday,
        crate::api::holiday::list_holidays,

        crate::api::application::create_leave,
        crate::api::application::approve_leave,
        crate::api::application::reject_leave,
        crate::api::application::get_leave,
        crate::api::application::leave_list,
        crate::api::application::create_visit,
        crate::api::application::approve_visit,
        crate::api::application::reject_visit,
        crate::api::application::get_visit,
        crate::api::application::visit_list,

        crate::api::branch::branch_zones
    ),
    components(
        schemas(
            RawPunch,
            RawInterval,
            RawZone,
            ResolveTimeline,
            ResolveGeofence,
            ResolveFlag,
            TimelineEntry,
            TimelineResponse,
            GeofenceResponse,
            FlagSummary,
            CheckIn,
            CheckOut,
            CreateHoliday,
            HolidayResponse,
            LeaveType,
            CreateApplication,
            ApplicationResponse,
            ApplicationListResponse,
            ZoneResponse
        )
    ),
    tags(
        (name = "Resolve", description = "Stateless attendance computations"),
        (name = "Attendance", description = "Check-in, check-out and timelines"),
        (name = "Holiday", description = "Company holidays"),
        (name = "Leave", description = "Leave applications"),
        (name = "Visit", description = "Field-visit applications"),
        (name = "Branch", description = "Branch geofences"),
    )
)]
pub struct ApiDoc;
