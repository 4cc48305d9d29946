//! Ledframe: Pixel-Matrix Animation Cache
//!
//! Stores frame-based animations for a 16x16 RGB LED matrix. A client uploads
//! every animation at once; the server validates the upload, assigns its own
//! frame IDs, swaps the in-memory cache and persists the result. Reads are
//! served from the cache alone.

pub mod cli;
pub mod config;
pub mod error;
pub mod frame;
pub mod logging;
pub mod metadata;
pub mod pixel;
pub mod store;
pub mod sync;
pub mod transfer;
pub mod types;
pub mod validation;
