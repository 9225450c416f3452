use std::process::ExitCode;

use clap::Parser;

use tinylink::cli::{Cli, Commands, ConfigCommands};
use tinylink::errors::TinylinkError;
use tinylink::runtime::modes;

#[actix_web::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Some(Commands::Config {
            action: ConfigCommands::Generate { output_path, force },
        }) => modes::config_generate(output_path, force)
            .map(|_| ())
            .map_err(anyhow::Error::from),
        Some(Commands::Serve) | None => serve(cli.config.as_deref()).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<TinylinkError>() {
                Some(err) => eprintln!("{}", err.format_colored()),
                None => eprintln!("[ERROR] {:#}", e),
            }
            ExitCode::FAILURE
        }
    }
}

async fn serve(config_path: Option<&str>) -> anyhow::Result<()> {
    tinylink::config::init_config(config_path)?;
    let config = tinylink::config::get_config();

    // guard 必须存活到进程结束，保证日志写完
    let _guard = tinylink::system::logging::init_logging(&config.logging)?;

    modes::run_server(&config).await
}
