//! Command handlers, one module per subcommand family.

pub mod completion;
pub mod config_cmd;
pub mod control;
pub mod init;
pub mod log_cmd;
pub mod query;
pub mod refs_cmd;
pub mod stage;
pub mod status;
pub mod version;
