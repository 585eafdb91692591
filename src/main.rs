mod app;
mod cli;
mod dashboard;

use anyhow::Result;
use vendcast_core::{AppError, Config};

use crate::app::App;
use crate::cli::{Command, USAGE};

#[tokio::main]
async fn main() -> Result<()> {
    vendcast_core::init()?;

    let command = match Command::parse(std::env::args().skip(1)) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}\n\n{}", e, USAGE);
            std::process::exit(2);
        }
    };

    let config = match Config::load_validated(None) {
        Ok((config, _)) => config,
        Err(e) => exit_with(e.into()),
    };

    let app = match App::new(config) {
        Ok(app) => app,
        Err(e) => exit_with(e),
    };
    tracing::info!("Vendcast started (config: {})", app.config().config_dir.display());

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    if let Err(e) = app.run(command, &mut out).await {
        exit_with(e);
    }

    Ok(())
}

fn exit_with(error: AppError) -> ! {
    tracing::error!("{}", error);
    eprintln!("{}", error.user_message());
    std::process::exit(1);
}
