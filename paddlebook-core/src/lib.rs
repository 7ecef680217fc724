//! # Paddlebook Core Library
//!
//! This crate contains the shared types and business logic for the
//! paddlebook club-equipment booking service.
//!
//! ## Module Organization
//!
//! - `models`: Database models (users, inventory items, bookings)
//! - `auth`: Authentication and authorization utilities
//! - `availability`: Booking-conflict detection
//! - `db`: Connection pool and migration runner

pub mod auth;
pub mod availability;
pub mod db;
pub mod models;

/// Current version of the paddlebook core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
