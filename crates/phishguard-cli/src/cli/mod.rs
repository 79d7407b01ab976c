//! CLI subcommand implementations for the `phishguard` binary.

pub mod features_cmd;
pub mod model_cmd;
pub mod output;
pub mod scan_cmd;
