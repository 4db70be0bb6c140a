//! Event payloads produced by services.
pub mod audio;
pub mod collision;
