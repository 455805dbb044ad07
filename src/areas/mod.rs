pub mod config;
pub mod database;
pub mod index;
pub mod refs;
pub mod repository;
pub mod status;
pub mod vcs;
pub mod workspace;
