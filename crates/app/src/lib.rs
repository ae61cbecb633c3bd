//! Trolley application services: catalog and order clients, checkout and
//! configuration.

pub mod catalog;
pub mod checkout;
pub mod config;
pub mod context;
pub mod observability;
pub mod orders;
