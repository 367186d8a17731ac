//! Output modules.
//!
//! This module writes the results file and unpacks model responses
//! into a directory tree.

pub mod demux;
pub mod results;

pub use demux::save_results;
pub use results::save_to_file;
