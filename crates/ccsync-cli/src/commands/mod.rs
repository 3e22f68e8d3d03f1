//! Command implementations for claude-code-sync

pub mod doctor;
pub mod init;
pub mod key;
pub mod pull;
pub mod push;
pub mod reset;
pub mod status;
pub mod update;
pub mod verify;

pub use doctor::run_doctor;
pub use init::run_init;
pub use key::{run_export_key, run_import_key};
pub use pull::run_pull;
pub use push::run_push;
pub use reset::{run_reset, run_unlink};
pub use status::run_status;
pub use update::{run_check_update, run_version};
pub use verify::run_verify;
