pub mod attendance;
pub mod geo_zone;
pub mod interval;
