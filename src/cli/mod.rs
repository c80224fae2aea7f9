pub mod commands;
pub mod handlers;
pub mod output;

pub use commands::{
    CliArgs, Commands, ConfigArgs, ImageArgs, LocateArgs, OutputFormatArg, PatchArgs, RunArgs,
};
pub use output::{OutputFormat, OutputFormatter};
