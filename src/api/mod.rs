pub mod application;
pub mod attendance;
pub mod branch;
pub mod holiday;
pub mod resolve;
