//! Local output files produced alongside Notion publishing.
//!
//! - [`json`]: writes the [`RunReport`](crate::models::RunReport) snapshot
//!
//! # Output Structure
//!
//! ```text
//! json_output_dir/
//! └── 2026-10-18/
//!     ├── page.json
//!     └── database.json
//! ```

pub mod json;
