use bitbar_workflow::cli::commands::{CliArgs, Commands};
use bitbar_workflow::cli::handlers::{
    handle_config, handle_image, handle_locate, handle_patch, handle_run,
};
use bitbar_workflow::util::{init_logging, LoggingConfig};
use bitbar_workflow::{WorkflowConfig, NAME, VERSION};

use clap::Parser;
use tracing::{debug, error};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let args = CliArgs::parse();
    init_logging(LoggingConfig::from_args(
        args.log_level.as_deref(),
        args.verbose,
        args.quiet,
    ));

    debug!("{} v{} starting", NAME, VERSION);
    debug!("Arguments: {:?}", args);

    let config = WorkflowConfig::default();
    if let Err(e) = config.validate() {
        error!("Configuration error: {}", e);
        eprintln!("\nPlease check your BITBAR_WORKFLOW_* environment variables.");
        std::process::exit(1);
    }

    let exit_code = match &args.command {
        Commands::Run(run_args) => handle_run(run_args, &config, args.quiet).await,
        Commands::Image(image_args) => handle_image(image_args, &config, args.quiet).await,
        Commands::Patch(patch_args) => handle_patch(patch_args, args.quiet),
        Commands::Locate(locate_args) => handle_locate(locate_args),
        Commands::Config(config_args) => handle_config(config_args, &config),
    };

    std::process::exit(exit_code);
}
