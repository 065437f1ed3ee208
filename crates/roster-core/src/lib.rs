// Library root for the roster core: data model, entity store, randomization
// engine, persistence and configuration. The terminal front end in
// `roster-tui` consumes this crate's public API.

pub mod activity;
pub mod config;
pub mod csv_io;
pub mod ids;
pub mod model;
pub mod persist;
pub mod randomize;
pub mod store;
