use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Build the Mozilla Bitbar test archive and run device recipes
#[derive(Parser, Debug)]
#[command(
    name = "bitbar-workflow",
    about = "Build the Mozilla Bitbar test archive and run device recipes",
    version,
    long_about = "bitbar-workflow prepares recipes for the Bitbar device cloud. It builds the \
                  Docker test archive, points the recipe's upload_file step at the application \
                  package and the archive, and hands the recipe to the recipe runner."
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, global = true, value_name = "LEVEL", help = "Set logging level")]
    pub log_level: Option<String>,

    #[arg(short = 'v', long, global = true, help = "Enable debug logging")]
    pub verbose: bool,

    #[arg(
        short = 'q',
        long,
        global = true,
        conflicts_with = "verbose",
        help = "Quiet mode - suppress non-error output"
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    #[command(
        about = "Build the test archive, patch the recipe and run it",
        long_about = "Builds the test archive with build.sh, writes a temporary copy of the \
                      recipe whose upload_file step names the APK and the archive, and runs it.\n\n\
                      Examples:\n  \
                      bitbar-workflow run --recipe recipe.yml \\\n      \
                      --mozilla-bitbar-docker-dir ./mozilla-bitbar-docker \\\n      \
                      --testdroid-apk Testdroid.apk\n  \
                      bitbar-workflow run ... -- --project-name mozilla"
    )]
    Run(RunArgs),

    #[command(
        about = "Patch the newest private archive into a recipe and run it",
        long_about = "Optionally clones the runner and Docker repositories and builds the \
                      archive, then writes the newest private archive from the build directory \
                      into the recipe in place and runs it.\n\n\
                      Examples:\n  \
                      bitbar-workflow image --recipe recipe.yml --clone --build\n  \
                      bitbar-workflow image --recipe recipe.yml --mozilla-bitbar-docker-dir ./docker"
    )]
    Image(ImageArgs),

    #[command(
        about = "Set upload_file paths in a recipe",
        long_about = "Updates the recipe's upload_file step, or inserts one before the final two \
                      steps, without building or running anything.\n\n\
                      Examples:\n  \
                      bitbar-workflow patch --recipe recipe.yml --application app.apk\n  \
                      bitbar-workflow patch --recipe recipe.yml --test tests.zip -o patched.yml"
    )]
    Patch(PatchArgs),

    #[command(
        about = "Show the newest public and private artifacts",
        long_about = "Selects the public and private artifacts among the two newest files of a \
                      build directory.\n\n\
                      Examples:\n  \
                      bitbar-workflow locate mozilla-bitbar-docker/build\n  \
                      bitbar-workflow locate build --format json"
    )]
    Locate(LocateArgs),

    #[command(about = "Show the effective configuration")]
    Config(ConfigArgs),
}

#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    #[arg(long, value_name = "FILE", help = "Recipe to patch and run")]
    pub recipe: PathBuf,

    #[arg(
        long = "mozilla-bitbar-docker-dir",
        value_name = "DIR",
        help = "Directory containing build.sh and version"
    )]
    pub docker_dir: PathBuf,

    #[arg(long, value_name = "FILE", help = "Application package to upload")]
    pub testdroid_apk: PathBuf,

    #[arg(long, help = "Keep the patched temporary recipe after the run")]
    pub keep_recipe: bool,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        value_name = "RUNNER_ARGS",
        help = "Arguments passed to the recipe runner, optionally after --"
    )]
    pub runner_args: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct ImageArgs {
    #[arg(long, value_name = "FILE", help = "Recipe to patch in place and run")]
    pub recipe: PathBuf,

    #[arg(
        long = "mozilla-bitbar-docker-dir",
        value_name = "DIR",
        help = "Docker build definition directory (defaults to the clone location)"
    )]
    pub docker_dir: Option<PathBuf>,

    #[arg(long, help = "Clone the runner and Docker repositories first")]
    pub clone: bool,

    #[arg(long, help = "Run build.sh before locating artifacts")]
    pub build: bool,

    #[arg(
        trailing_var_arg = true,
        allow_hyphen_values = true,
        num_args = 0..,
        value_name = "RUNNER_ARGS",
        help = "Arguments passed to the recipe runner, optionally after --"
    )]
    pub runner_args: Vec<String>,
}

#[derive(Parser, Debug, Clone)]
pub struct PatchArgs {
    #[arg(long, value_name = "FILE", help = "Recipe to patch")]
    pub recipe: PathBuf,

    #[arg(long, value_name = "FILE", help = "Value for application_filename")]
    pub application: Option<PathBuf>,

    #[arg(long, value_name = "FILE", help = "Value for test_filename")]
    pub test: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Write the patched recipe here instead of in place"
    )]
    pub output: Option<PathBuf>,
}

#[derive(Parser, Debug, Clone)]
pub struct LocateArgs {
    #[arg(value_name = "BUILD_DIR", help = "Directory holding built archives")]
    pub build_dir: PathBuf,

    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(Parser, Debug, Clone)]
pub struct ConfigArgs {
    #[arg(
        short = 'f',
        long,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub format: OutputFormatArg,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormatArg {
    Json,
    Yaml,
    Human,
}

impl From<OutputFormatArg> for super::output::OutputFormat {
    fn from(arg: OutputFormatArg) -> Self {
        match arg {
            OutputFormatArg::Json => super::output::OutputFormat::Json,
            OutputFormatArg::Yaml => super::output::OutputFormat::Yaml,
            OutputFormatArg::Human => super::output::OutputFormat::Human,
        }
    }
}
