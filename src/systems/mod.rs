//! Stateless services that run over scenes.
//!
//! - `collision` – overlap tests, intersection depth, contact side and the
//!   pairwise scene detector
pub mod collision;
