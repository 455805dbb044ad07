pub mod areas;
pub mod artifacts;
