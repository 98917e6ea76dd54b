//! AprilTag calibration board generation.
//!
//! This library turns a grid/layout configuration into printable calibration
//! boards: tag bitmaps are rasterized into a page-sized canvas, exported as
//! PNG and PDF, and described in a shared specifications text file.

// Module declarations
pub mod board;
pub mod config;
pub mod constants;
pub mod error;
pub mod export;
pub mod family;
pub mod generator;

pub use error::{BoardError, Result};
