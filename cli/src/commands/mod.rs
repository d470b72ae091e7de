//! CLI Commands
//!
//! All sigmatch CLI commands organized as separate modules.

mod hash;
mod scan;

pub use hash::{hash_files, Algorithm};
pub use scan::scan_file;
