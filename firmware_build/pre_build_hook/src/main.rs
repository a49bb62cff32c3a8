use clap::Parser;
use log::{error, LevelFilter};
use pre_build_hook::{register_user_setup_hook, BuildEnv, HOOK_TARGET};
use std::path::PathBuf;
use std::process::ExitCode;

/// Runs the firmware's pre-build actions for one build target
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Root of the firmware project (the folder holding include/)
    #[arg(long, default_value = ".")]
    project_dir: PathBuf,

    /// Folder the build system installs libraries into
    #[arg(long, default_value = "lib")]
    lib_dir: PathBuf,

    /// Build target about to be compiled
    #[arg(long, default_value = HOOK_TARGET)]
    target: String,

    /// Also write log files here. Without it the hook only logs to the console.
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let args = Args::parse();

    let logger = match &args.log_dir {
        Some(log_dir) => logging::init_logger(log_dir, LevelFilter::Info),
        None => logging::init_console_logger(LevelFilter::Info),
    };
    if let Err(e) = logger {
        eprintln!("Logging disabled: {}", e);
    }

    let mut env = BuildEnv::new(args.project_dir, args.lib_dir);
    register_user_setup_hook(&mut env);

    match env.run_pre_actions(&args.target) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            error!("Pre-build action for {} failed: {}", args.target, e);
            ExitCode::FAILURE
        }
    }
}
