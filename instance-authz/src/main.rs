use clap::Parser;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{error, info};

use instance_authz::app_state::AppState;
use instance_authz::http::setup_http_server;
use instance_authz::init_telemetry;
use instance_authz::scheduler::setup_scope_cache_refresh;
use instance_authz::settings::config::Settings;

#[derive(Parser)]
#[command(name = "instance-authz")]
#[command(about = "Access control service for instance storage")]
#[clap(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Show current configuration and exit
    Config,
    /// Start the service (default)
    Run,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command.as_ref().unwrap_or(&Commands::Run) {
        Commands::Config => {
            let settings = Settings::new()?;
            println!("{settings:#?}");
            return Ok(());
        }
        Commands::Run => {}
    }

    let settings = Settings::new()?;
    init_telemetry::init_tracing(settings.debug)?;
    let app_state = AppState::new(settings)?;

    let mut tasks = vec![
        (
            "scope cache refresh",
            setup_scope_cache_refresh(app_state.clone()).await?,
        ),
        (
            "http server",
            setup_http_server(app_state.clone(), &app_state.settings.api.bind_address).await?,
        ),
    ];

    while !tasks.is_empty() {
        sleep(Duration::from_millis(200)).await;

        let (finished, running): (Vec<_>, Vec<_>) = tasks
            .into_iter()
            .partition(|(_, handle)| handle.is_finished());
        tasks = running;

        for (name, handle) in finished {
            match handle.await {
                Ok(Ok(())) => info!("Task {} finished", name),
                Ok(Err(e)) => {
                    error!("Task {} failed: {:#}", name, e);
                    app_state.stop_flag.stop();
                }
                Err(e) => {
                    error!("Task {} panicked: {}", name, e);
                    app_state.stop_flag.stop();
                }
            }
        }
    }

    info!("All tasks are done");
    Ok(())
}
