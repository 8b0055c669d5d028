mod command_result;
pub mod init;
pub mod optimize;

pub use command_result::*;
