//! Pure attendance and geofence computations. Nothing in here performs I/O
//! or keeps state between calls; callers pass every input explicitly.

pub mod distance;
pub mod flag;
pub mod geofence;
pub mod parse;
pub mod summary;
pub mod timeline;
