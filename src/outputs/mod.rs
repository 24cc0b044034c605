//! Output generation.
//!
//! # Submodules
//!
//! - [`json`]: Writes the current snapshot and all of its views as one JSON
//!   document for external consumers
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── snapshot.json   # replaced after every refresh cycle
//! ```

pub mod json;
