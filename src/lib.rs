//! Consiglio: a small tip-of-the-day service.
//!
//! Durable tips live in Postgres, session-scoped draft tips in Redis, and a
//! cron worker samples a random tip on a fixed cadence. Reads go through
//! explicit in-process caches that are evicted synchronously on every write.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
