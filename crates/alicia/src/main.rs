//! Process entry point: loads configuration, opens the data source,
//! spawns the four listeners and the tick loop, and waits for a
//! shutdown signal. Exits 1 on any fatal initialization error.

use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::{error, info, warn};
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use alicia_data::DataDirector;
use alicia_net::{run_listener, ClientRegistry, Inbound, ScrambleKind};
use alicia_server::directors::{lobby::LobbyDirector, messenger::MessengerDirector, race::RaceDirector, ranch::RanchDirector};
use alicia_server::{ServerConfig, ServerInstance, ServerTick};

/// The Lobby/Ranch/Race/Messenger server.
#[derive(Parser, Debug)]
#[command(name = "alicia-server", version, about)]
struct Cli {
    /// Directory holding `config.yaml` and, for a file-backed data
    /// source, the entity store. Defaults to the current directory.
    resource_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let resource_dir = cli.resource_dir.unwrap_or_else(|| PathBuf::from("."));

    let _log_guard = init_tracing(&resource_dir);

    let runtime = match tokio::runtime::Builder::new_multi_thread().enable_all().build() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("failed to start async runtime: {e}");
            return ExitCode::FAILURE;
        }
    };

    match runtime.block_on(run(resource_dir)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "fatal error during startup");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(resource_dir: &Path) -> tracing_appender::non_blocking::WorkerGuard {
    let file_appender = tracing_appender::rolling::daily(resource_dir.join("logs"), "alicia-server.log");
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(non_blocking.and(std::io::stdout))
        .init();

    guard
}

async fn run(resource_dir: PathBuf) -> anyhow::Result<()> {
    let config = ServerConfig::load(&resource_dir.join("config.yaml"))?;
    info!(brand = %config.general.brand, "loaded configuration");

    let base_path = resource_dir.join(&config.data.file.base_path);
    let data = DataDirector::open_file_backed(&base_path)?;
    let instance = ServerInstance::new(config.clone(), data);

    let lobby_registry = ClientRegistry::default();
    let ranch_registry = ClientRegistry::default();
    let race_registry = ClientRegistry::default();
    let messenger_registry = ClientRegistry::default();

    let lobby = Arc::new(LobbyDirector::new(instance.clone(), lobby_registry.clone()));
    let ranch = Arc::new(RanchDirector::new(instance.clone(), ranch_registry.clone()));
    let race = Arc::new(RaceDirector::new(instance.clone(), race_registry.clone()));
    let messenger = Arc::new(MessengerDirector::new(instance.clone(), messenger_registry.clone()));

    let mut tasks = Vec::new();

    if config.lobby.enabled {
        tasks.push(spawn_listener(
            "lobby",
            config.lobby.listen.resolve()?,
            ScrambleKind::Rolling { scramble_outbound: false },
            lobby_registry,
            lobby.clone(),
            |d, e| d.handle_inbound(e),
        ));
    }
    if config.ranch.enabled {
        tasks.push(spawn_listener(
            "ranch",
            config.ranch.listen.resolve()?,
            ScrambleKind::Rolling { scramble_outbound: false },
            ranch_registry,
            ranch.clone(),
            |d, e| d.handle_inbound(e),
        ));
    }
    if config.race.enabled {
        tasks.push(spawn_listener(
            "race",
            config.race.listen.resolve()?,
            ScrambleKind::Rolling { scramble_outbound: false },
            race_registry,
            race.clone(),
            |d, e| d.handle_inbound(e),
        ));
    }
    if config.messenger.enabled {
        tasks.push(spawn_listener(
            "messenger",
            config.messenger.listen.resolve()?,
            ScrambleKind::Messenger,
            messenger_registry,
            messenger.clone(),
            |d, e| d.handle_inbound(e),
        ));
    }

    let ticker = ServerTick::new(instance.clone(), lobby.clone(), ranch.clone(), race.clone());
    let tick_task = tokio::spawn(async move {
        // 50 Hz target cadence; a `MissedTickBehavior::Delay` interval
        // (the default) yields the remainder of the period on overshoot
        // rather than bursting to catch up, matching the reference's
        // `sleep(1000/50 - elapsed)` tick loop.
        let mut interval = tokio::time::interval(std::time::Duration::from_millis(20));
        loop {
            interval.tick().await;
            ticker.run_once();
        }
    });
    tasks.push(tick_task);

    wait_for_shutdown_signal().await;
    info!("shutdown signal received, stopping");

    for task in &tasks {
        task.abort();
    }
    instance.shutdown();

    Ok(())
}

/// Spawns one listener's accept loop plus the task draining its
/// inbound channel into `handle`. `handle` is a plain function pointer
/// rather than a closure capturing `director` because each director
/// has a distinct concrete type; this keeps the call site monomorphic
/// per service instead of behind a trait object.
fn spawn_listener<D: Send + Sync + 'static>(
    name: &'static str,
    addr: std::net::SocketAddr,
    scramble_kind: ScrambleKind,
    registry: ClientRegistry,
    director: Arc<D>,
    handle: fn(&D, Inbound) -> alicia_server::DirectorResult<()>,
) -> tokio::task::JoinHandle<()> {
    let (tx, rx) = flume::unbounded();

    tokio::spawn(async move {
        if let Err(e) = run_listener(addr, scramble_kind, tx, registry).await {
            error!(service = name, error = %e, "listener accept loop exited");
        }
    });

    tokio::spawn(async move {
        while let Ok(event) = rx.recv_async().await {
            if let Err(e) = handle(&director, event) {
                warn!(service = name, error = %e, "error handling inbound event");
            }
        }
    })
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
