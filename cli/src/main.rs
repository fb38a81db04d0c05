use clap::{Parser, Subcommand};
use lucky_draw_cli::{CliContext, commands, logging, readline};
use lucky_draw_core::context::{AppConfig, AppConfigExt};
use std::io::Write;

#[tokio::main]
async fn main() -> Result<(), String> {
    let loaded = AppConfig::load();
    let debug_logging = loaded.as_ref().is_ok_and(|c| c.debug_logging);
    let _log_guard = logging::init(debug_logging);

    let config = match loaded {
        Ok(config) => {
            // Writes back keys added since the file was created
            if let Err(e) = config.save() {
                tracing::warn!(error = %e, "Could not update configuration file");
            }
            config
        }
        Err(e) => {
            tracing::warn!(error = %e, "Using default configuration");
            AppConfig::default()
        }
    };

    let ctx = CliContext::start(config)?;
    let result = run_prompt(&ctx).await;
    let shutdown = ctx.shutdown().await;
    result.and(shutdown)
}

async fn run_prompt(ctx: &CliContext) -> Result<(), String> {
    loop {
        let line = tokio::task::spawn_blocking(readline)
            .await
            .map_err(|e| e.to_string())??;
        let Some(line) = line else {
            // End of input
            return Ok(());
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match respond(line, ctx).await {
            Ok(quit) => {
                if quit {
                    return Ok(());
                }
            }
            Err(err) => {
                write!(std::io::stdout(), "{err}").map_err(|e| e.to_string())?;
                std::io::stdout().flush().map_err(|e| e.to_string())?;
            }
        }
    }
}

#[derive(Parser)]
#[command(version, about = "lucky draw")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Load participants from an .xlsx or .csv file
    Load { path: String },
    Start,
    Stop,
    Next,
    Status,
    Winners,
    Config,
    Exit,
}

async fn respond(line: &str, ctx: &CliContext) -> Result<bool, String> {
    let mut args = shlex::split(line).ok_or("error: Invalid quoting")?;
    args.insert(0, "lucky-draw".to_string());
    let cli = Cli::try_parse_from(args).map_err(|e| e.to_string())?;

    match &cli.command {
        Some(Commands::Load { path }) => commands::load(path, ctx).await?,
        Some(Commands::Start) => commands::start(ctx).await?,
        Some(Commands::Stop) => commands::stop(ctx).await?,
        Some(Commands::Next) => commands::next(ctx).await?,
        Some(Commands::Status) => commands::show_status(ctx).await?,
        Some(Commands::Winners) => commands::show_winners(ctx).await?,
        Some(Commands::Config) => commands::show_config(ctx)?,
        Some(Commands::Exit) => {
            commands::exit()?;
            return Ok(true);
        }
        None => {}
    }
    Ok(false)
}
