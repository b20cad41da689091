//! Turns loosely shaped documents into the typed inputs of the resolver.
//! Bad entries are skipped one at a time so a single broken record never
//! blanks out a whole timeline.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate};
use derive_more::Display;
use serde::Deserialize;
use utoipa::ToSchema;

use crate::model::attendance::{AttendanceFlag, AttendancePunch};
use crate::model::geo_zone::{GeoPoint, GeoZone, ZoneKind};
use crate::model::interval::{ApprovedInterval, IntervalCategory};

#[derive(Debug, Display, PartialEq)]
pub enum ParseError {
    #[display(fmt = "invalid date '{}'", _0)]
    Date(String),
    #[display(fmt = "unknown flag '{}'", _0)]
    Flag(String),
    #[display(fmt = "unknown category '{}'", _0)]
    Category(String),
    #[display(fmt = "missing field '{}'", _0)]
    Missing(&'static str),
    #[display(fmt = "{}", _0)]
    Zone(String),
}

impl std::error::Error for ParseError {}

/// Accepts `YYYY-MM-DD` or an RFC 3339 timestamp (its own calendar date).
pub fn parse_date(value: &str) -> Result<NaiveDate, ParseError> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| ParseError::Date(value.to_string()))
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RawPunch {
    #[schema(example = 1000)]
    pub employee_id: u64,
    #[schema(example = "2024-06-11")]
    pub date: String,
    #[schema(example = "08:57:12")]
    pub in_time: Option<String>,
    #[schema(example = "17:02:40")]
    pub out_time: Option<String>,
    #[schema(example = "P")]
    pub flag: Option<String>,
}

impl TryFrom<RawPunch> for AttendancePunch {
    type Error = ParseError;

    fn try_from(raw: RawPunch) -> Result<Self, Self::Error> {
        let flag = match raw.flag.as_deref() {
            None => None,
            Some(f) => {
                Some(AttendanceFlag::from_str(f).map_err(|_| ParseError::Flag(f.to_string()))?)
            }
        };
        Ok(AttendancePunch {
            employee_id: raw.employee_id,
            date: parse_date(&raw.date)?,
            in_time: raw.in_time,
            out_time: raw.out_time,
            flag,
        })
    }
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RawInterval {
    /// holiday, leave or visit
    #[schema(example = "leave")]
    pub category: String,
    /// Required for leave and visit.
    #[schema(example = 1000)]
    pub employee_id: Option<u64>,
    #[schema(example = "2024-06-10")]
    pub from: String,
    #[schema(example = "2024-06-12")]
    pub to: String,
}

impl TryFrom<RawInterval> for ApprovedInterval {
    type Error = ParseError;

    fn try_from(raw: RawInterval) -> Result<Self, Self::Error> {
        let category = match raw.category.trim().to_ascii_lowercase().as_str() {
            "holiday" => IntervalCategory::Holiday,
            "leave" => IntervalCategory::Leave {
                employee_id: raw.employee_id.ok_or(ParseError::Missing("employee_id"))?,
            },
            "visit" => IntervalCategory::Visit {
                employee_id: raw.employee_id.ok_or(ParseError::Missing("employee_id"))?,
            },
            _ => return Err(ParseError::Category(raw.category)),
        };
        Ok(ApprovedInterval::new(
            parse_date(&raw.from)?,
            parse_date(&raw.to)?,
            category,
        ))
    }
}

/// Branch or hotspot as stored; any of the geometry may be missing on a
/// branch that has no geofence configured yet.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RawZone {
    #[schema(example = "Head office")]
    pub name: String,
    #[schema(example = "branch", value_type = String)]
    pub kind: ZoneKind,
    #[schema(example = 23.8103)]
    pub latitude: Option<f64>,
    #[schema(example = 90.4125)]
    pub longitude: Option<f64>,
    #[schema(example = 100.0)]
    pub radius: Option<f64>,
}

impl TryFrom<RawZone> for GeoZone {
    type Error = ParseError;

    fn try_from(raw: RawZone) -> Result<Self, Self::Error> {
        let latitude = raw.latitude.ok_or(ParseError::Missing("latitude"))?;
        let longitude = raw.longitude.ok_or(ParseError::Missing("longitude"))?;
        let radius = raw.radius.ok_or(ParseError::Missing("radius"))?;
        GeoZone::new(raw.name, raw.kind, GeoPoint::new(latitude, longitude), radius)
            .map_err(|e| ParseError::Zone(e.to_string()))
    }
}

/// Converts every entry it can, logging and counting the rest.
pub fn parse_lenient<R, T>(what: &str, raws: impl IntoIterator<Item = R>) -> (Vec<T>, usize)
where
    T: TryFrom<R, Error = ParseError>,
{
    let mut parsed = Vec::new();
    let mut skipped = 0usize;
    for (index, raw) in raws.into_iter().enumerate() {
        match T::try_from(raw) {
            Ok(value) => parsed.push(value),
            Err(e) => {
                tracing::warn!(kind = what, index, error = %e, "skipping malformed entry");
                skipped += 1;
            }
        }
    }
    (parsed, skipped)
}
