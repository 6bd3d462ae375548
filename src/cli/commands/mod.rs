mod init;
mod reset_password;
mod sweep;

pub use init::cmd_init;
pub use reset_password::cmd_reset_password;
pub use sweep::cmd_sweep;
