//! Cart-and-filtering core of a demo food-delivery storefront.

pub mod config;
pub mod error;
pub mod shop;
pub mod telemetry;
