//! carta: a restaurant catalog service.
//!
//! Menus contain submenus, submenus contain dishes. Counts of children are
//! derived on every read, and assembled responses are kept in a best-effort
//! cache that every committed write invalidates.

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;
