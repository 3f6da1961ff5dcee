//! CLI command implementations.
//!
//! - **compile**: build a report context from local JSON files
//! - **generate**: run the full generation workflow against the data directory
//! - **fields**: print a report's template field vocabulary
//! - **init**: write a default configuration file

pub mod compile;
pub mod fields;
pub mod generate;
pub mod init;

pub use compile::{compile_report, CompileConfig};
pub use fields::print_fields;
pub use generate::{generate_report, GenerateConfig};
pub use init::init_config;
