//! # Tasks Module
//!
//! Per-user task lists. Every operation addressed by task id passes the
//! `OwnershipGuard` before touching the row.

pub mod guard;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod routes;
pub mod services;
pub mod validators;


pub use routes::tasks_routes;
