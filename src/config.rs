use std::env;

use anyhow::{Context, Result, anyhow};
use chrono::{NaiveTime, Weekday};
use dotenvy::dotenv;

use crate::resolver::flag::parse_wall_clock;

#[derive(Clone)]
pub struct Config {
    pub database_url: String,
    pub server_addr: String,
    pub api_prefix: String,

    // Rate limiting
    pub rate_compute_per_min: u32,
    pub rate_protected_per_min: u32,

    // Attendance rules
    pub weekend_day: Weekday,
    pub shift_start: NaiveTime,

    /// Longest range a timeline request may cover, in days
    pub max_timeline_days: u32,

    pub zone_cache_ttl_secs: u64,
    pub log_dir: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        Ok(Self {
            server_addr: env::var("SERVER_ADDR").context("SERVER_ADDR must be set")?,
            database_url: env::var("DATABASE_URL").context("DATABASE_URL must be set")?,
            api_prefix: env::var("API_PREFIX").unwrap_or_else(|_| "/api".to_string()),

            rate_compute_per_min: parse_var("RATE_COMPUTE_PER_MIN", "600")?,
            rate_protected_per_min: parse_var("RATE_PROTECTED_PER_MIN", "1000")?,

            weekend_day: parse_weekday(&var_or("WEEKEND_DAY", "Fri"))?,
            shift_start: parse_shift_start(&var_or("SHIFT_START", "09:00"))?,

            max_timeline_days: parse_var("MAX_TIMELINE_DAYS", "366")?,

            zone_cache_ttl_secs: parse_var("ZONE_CACHE_TTL_SECS", "300")?,
            log_dir: var_or("LOG_DIR", "logs"),
        })
    }
}

fn var_or(key: &str, default: &str) -> String {
    env::var(key).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(key: &str, default: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    var_or(key, default)
        .parse()
        .with_context(|| format!("{key} is not a valid number"))
}

/// Accepts chrono weekday names, e.g. `Fri` or `friday`.
pub fn parse_weekday(value: &str) -> Result<Weekday> {
    value
        .trim()
        .parse::<Weekday>()
        .map_err(|_| anyhow!("WEEKEND_DAY '{value}' is not a weekday"))
}

pub fn parse_shift_start(value: &str) -> Result<NaiveTime> {
    parse_wall_clock(value).ok_or_else(|| anyhow!("SHIFT_START '{value}' is not a time of day"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn weekday_names() {
        assert_eq!(parse_weekday("Fri").unwrap(), Weekday::Fri);
        assert_eq!(parse_weekday("sunday").unwrap(), Weekday::Sun);
        assert!(parse_weekday("someday").is_err());
    }

    #[test]
    fn shift_start_forms() {
        assert_eq!(
            parse_shift_start("09:30").unwrap(),
            NaiveTime::from_hms_opt(9, 30, 0).unwrap()
        );
        assert_eq!(
            parse_shift_start("10:00:15").unwrap(),
            NaiveTime::from_hms_opt(10, 0, 15).unwrap()
        );
        assert!(parse_shift_start("nine").is_err());
    }
}
