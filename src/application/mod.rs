//! Catalog services: validation, aggregation and cache coherence around the repositories.

pub mod aggregates;
pub mod dishes;
pub mod error;
pub mod menus;
pub mod repos;
pub mod submenus;
pub mod tree;
