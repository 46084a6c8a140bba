//! Client configuration

pub mod options;
pub mod settings;

pub use options::{ClientOptions, OperationPaths};
pub use settings::Settings;
