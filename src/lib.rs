//! # Sport Sync
//!
//! Scrapes Swedish sport TV-guide pages into one normalized, de-duplicated
//! schedule of broadcast events and answers live, upcoming and favorite
//! queries over it.
//!
//! ## Modules
//!
//! | Module | Role |
//! |--------|------|
//! | [`scrapers`] | Source adapters, HTTP transport, markup heuristics |
//! | [`classifier`] | Sport, team, channel, league, live and time heuristics |
//! | [`aggregator`] | Concurrent refresh cycle with per-source isolation |
//! | [`dedup`] | Cross-source merge of the same broadcast |
//! | [`store`] | Atomically replaced snapshot |
//! | [`views`] / [`favorites`] | Read-only queries |
//! | [`config`] / [`cli`] | Settings from flags, environment and YAML |
//! | [`outputs`] | JSON snapshot writer |

pub mod aggregator;
pub mod classifier;
pub mod cli;
pub mod config;
pub mod dedup;
pub mod favorites;
pub mod models;
pub mod outputs;
pub mod scrapers;
pub mod store;
pub mod utils;
pub mod views;
