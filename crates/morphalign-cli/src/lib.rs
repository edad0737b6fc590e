pub mod cli;
pub mod commands;

pub use cli::{AlignArgs, Cli, Commands, ConfigError, FilterKind, NormalizeKind};
pub use commands::{align, run};
