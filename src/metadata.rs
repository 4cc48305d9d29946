//! Metadata domain contracts.
//!
//! Owns the per-animation descriptor and the frame-order checks applied at every
//! cache boundary.

pub mod animation_types;
pub mod order_contract;

pub use animation_types::{Metadata, Playback};
pub use order_contract::{check_metadata, OrderViolation};
