pub mod config;
pub mod delivery;
pub mod filter;
pub mod format;
pub mod gateway;
pub mod handler;
pub mod ical;
pub mod memory;
pub mod model;
pub mod query;
pub mod sanity;
pub mod schedule;
pub mod temporal;
pub mod view;
