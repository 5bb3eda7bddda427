//! Core library for the RunSession client
//!
//! This crate contains everything that does not touch the network:
//! - RunSession, task-search and SLX data model
//! - Mapping task-search results into RunSession creation requests
//! - Analytics over fetched RunSession documents

pub mod analytics;
pub mod error;
pub mod mapper;
pub mod model;

pub use error::Error;
pub type Result<T> = std::result::Result<T, Error>;
