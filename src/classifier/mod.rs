//! Pure text classifiers shared by every source adapter.
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`sport`] | Keyword-based sport detection and sport display metadata |
//! | [`teams`] | Home/away extraction and title renormalization |
//! | [`fields`] | Channel, league, live-flag and time-token heuristics |
//!
//! Everything here is deterministic and allocation-light; the keyword, channel
//! and league tables are built once on first use and shared read-only by all
//! adapter tasks.

pub mod fields;
pub mod sport;
pub mod teams;
