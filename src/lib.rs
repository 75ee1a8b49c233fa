//! Insurance Funnel API Library
//!
//! Typed procedures for an insurance sales funnel: browsing plans, submitting
//! client inquiries, scheduling consultations and tracking their status.
//!
//! # Modules
//!
//! - `app`: HTTP router and OpenAPI document.
//! - `config`: Configuration management.
//! - `db`: Database connection pool and schema bootstrap.
//! - `errors`: Error handling types.
//! - `handlers`: HTTP request handlers.
//! - `models`: Records, enumerations and procedure inputs.
//! - `procedures`: One handler per procedure.
//! - `registry`: Procedure names, kinds and dispatch.
//! - `store`: Persistence boundary (Postgres and in-memory).
//! - `validation`: Input contracts.

pub mod app;
pub mod config;
pub mod db;
pub mod errors;
pub mod handlers;
pub mod models;
pub mod procedures;
pub mod registry;
pub mod store;
pub mod validation;
