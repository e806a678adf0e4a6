//! Settings database: initialization and the settings store

pub mod init;
pub mod settings;

pub use init::*;
pub use settings::*;
