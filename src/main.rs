#![cfg_attr(not(test), deny(clippy::panic))]

use ad_carousel::config;
use ad_carousel::engine::{AdEngine, EngineEvent, HostEvent};
use ad_carousel::host::{HostApi, Participant, ParticipantId, ServerInfo};
use ad_carousel::locale::{GeoResolver, NullGeoResolver, PrefixGeoResolver};
use ad_carousel::logging;
use clap::Parser;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::AsyncBufReadExt;
use tokio::sync::mpsc::UnboundedSender;
use uuid::Uuid;

/// Ad Carousel -- timed advertisement rotation and templated messaging for game servers
#[derive(Parser, Debug)]
#[command(name = "ad-carousel")]
#[command(about = "Timed advertisement rotation and templated messaging engine")]
#[command(version)]
struct Cli {
    /// Path to the advertisement configuration document. Created with
    /// documented defaults if missing.
    #[arg(long, env = "AD_CAROUSEL_CONFIG_PATH", default_value = "ad-carousel.json")]
    config: PathBuf,

    /// Validate the configuration and exit without starting the engine.
    #[arg(long, short = 'c', conflicts_with = "print_config")]
    validate_config: bool,

    /// Print the loaded configuration to stdout (as JSON) and exit.
    /// Useful for debugging loading and environment overrides.
    #[arg(long, conflicts_with = "validate_config")]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Loading never fails: missing documents are created, malformed ones
    // degrade to defaults.
    let cfg = config::load_document(&cli.config);

    if cli.print_config {
        let json = serde_json::to_string_pretty(&cfg)
            .map_err(|e| anyhow::anyhow!("Failed to serialize config: {e}"))?;
        println!("{json}");
        return Ok(());
    }

    let validation_result = config::validate(&cfg);

    if cli.validate_config {
        match validation_result {
            Ok(()) => {
                println!("Configuration validation passed");
                println!();
                println!("Configuration summary:");
                println!("  Ad groups: {}", cfg.ads.len());
                println!("  Welcome message: {}", cfg.welcome_message.is_some());
                println!("  Center overlay mode: {}", cfg.use_center_overlay);
                println!("  Overlay duration: {}s", cfg.overlay_duration);
                println!("  Default locale: {}", cfg.default_locale);
                println!("  Geolocation database: {}", cfg.geo_database.is_some());
                return Ok(());
            }
            Err(e) => {
                eprintln!("Configuration validation failed:\n{e}");
                std::process::exit(1);
            }
        }
    }

    logging::init_with_config(&cfg.logging);

    // In normal operation validation issues are warnings: the scheduler
    // skips what it cannot arm and everything else keeps serving.
    if let Err(e) = validation_result {
        tracing::warn!(%e, "Configuration has issues; unusable parts will be skipped");
    }

    tracing::info!(
        config = %cli.config.display(),
        groups = cfg.ads.len(),
        "Starting ad-carousel"
    );

    let geo: Arc<dyn GeoResolver> = match &cfg.geo_database {
        Some(path) => Arc::new(PrefixGeoResolver::from_file(path)),
        None => Arc::new(NullGeoResolver),
    };

    let host = Arc::new(ConsoleHost::new());
    let tick_rate = cfg.tick_rate.max(1);

    let (engine, events, events_rx) =
        AdEngine::new(host.clone(), geo, cfg, cli.config.clone());
    let engine_task = tokio::spawn(engine.run(events_rx));

    // Seed the console participant so welcomes and broadcasts have a target.
    let operator = host.operator();
    let _ = events.send(EngineEvent::Host(HostEvent::ParticipantAuthorized {
        participant: operator.id,
        source_address: "127.0.0.1:27015".to_string(),
    }));
    let _ = events.send(EngineEvent::Host(HostEvent::ParticipantFullyConnected(
        operator,
    )));

    // Tick driver for overlay refreshes.
    let tick_events = events.clone();
    let tick_task = tokio::spawn(async move {
        let period = Duration::from_secs_f64(1.0 / f64::from(tick_rate));
        let mut ticker = tokio::time::interval(period);
        loop {
            ticker.tick().await;
            if tick_events
                .send(EngineEvent::Host(HostEvent::Tick))
                .is_err()
            {
                break;
            }
        }
    });

    console_loop(&events).await;

    tick_task.abort();
    let _ = events.send(EngineEvent::Shutdown);
    let _ = engine_task.await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Minimal interactive console: `reload` re-reads the configuration
/// document, `quit` (or ctrl-c) shuts down.
async fn console_loop(events: &UnboundedSender<EngineEvent>) {
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            line = lines.next_line() => match line {
                Ok(Some(command)) => match command.trim() {
                    "reload" => {
                        let _ = events.send(EngineEvent::ReloadRequested);
                    }
                    "quit" | "exit" => break,
                    "" => {}
                    other => {
                        tracing::warn!(command = other, "Unknown console command (try 'reload' or 'quit')");
                    }
                },
                // Stdin closed (detached/daemonized): wait for ctrl-c.
                _ => {
                    let _ = tokio::signal::ctrl_c().await;
                    break;
                }
            },
        }
    }
}

/// Terminal-backed host for running the engine standalone: one synthetic
/// participant, rendering surfaces printed to stdout. Real deployments
/// implement [`HostApi`] against their platform instead.
struct ConsoleHost {
    operator: Participant,
    /// The overlay surface is re-sent every tick while active; printing only
    /// on change keeps the terminal readable.
    last_overlay: Mutex<HashMap<ParticipantId, String>>,
}

impl ConsoleHost {
    fn new() -> Self {
        Self {
            operator: Participant {
                id: Uuid::new_v4(),
                slot: 0,
                name: "Operator".to_string(),
                address: Some("127.0.0.1:27015".to_string()),
                is_bot: false,
                is_alive: true,
            },
            last_overlay: Mutex::new(HashMap::new()),
        }
    }

    fn operator(&self) -> Participant {
        self.operator.clone()
    }
}

impl HostApi for ConsoleHost {
    fn participants(&self) -> Vec<Participant> {
        vec![self.operator.clone()]
    }

    fn send_chat_line(&self, participant: &Participant, text: &str) {
        println!("[chat -> {}]{text}", participant.name);
    }

    fn send_center_text(&self, participant: &Participant, text: &str) {
        println!("[center -> {}] {text}", participant.name);
    }

    fn send_center_overlay(&self, participant: &Participant, text: &str) {
        let Ok(mut last) = self.last_overlay.lock() else {
            return;
        };
        if last.get(&participant.id).map(String::as_str) != Some(text) {
            last.insert(participant.id, text.to_string());
            println!("[overlay -> {}] {text}", participant.name);
        }
    }

    fn server_info(&self) -> ServerInfo {
        ServerInfo {
            map_name: "lobby".to_string(),
            ip: "127.0.0.1".to_string(),
            port: 27015,
            max_participants: 64,
            occupied: 1,
        }
    }
}
