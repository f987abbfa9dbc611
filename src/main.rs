use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::Result;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

mod app;
mod config;
mod constants;
mod error;
mod ethereum;
mod event;
mod handler;
mod network;
mod theme;
mod tui;
mod ui;

use crate::{
    app::App,
    constants::{GATEWAY_CHANNEL_CAPACITY, TICK_RATE},
    ethereum::{EthClient, Network},
    event::{Action, GatewayEvent},
    handler::handle_event,
    network::GatewayWorker,
};

// LazyEth version from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

// ASCII art logo
const LOGO: &str = r#"
██╗      █████╗ ███████╗██╗   ██╗███████╗████████╗██╗  ██╗
██║     ██╔══██╗╚══███╔╝╚██╗ ██╔╝██╔════╝╚══██╔══╝██║  ██║
██║     ███████║  ███╔╝  ╚████╔╝ █████╗     ██║   ███████║
██║     ██╔══██║ ███╔╝    ╚██╔╝  ██╔══╝     ██║   ██╔══██║
███████╗██║  ██║███████╗   ██║   ███████╗   ██║   ██║  ██║
╚══════╝╚═╝  ╚═╝╚══════╝   ╚═╝   ╚══════╝   ╚═╝   ╚═╝  ╚═╝
"#;

/// LazyEth - Terminal UI for the Ethereum blockchain
#[derive(Parser)]
#[command(version = VERSION, about, long_about = None)]
struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    command: Option<Commands>,

    /// Start on a specific built-in network instead of the saved one
    #[arg(short, long, value_enum)]
    network: Option<NetworkArg>,
}

#[derive(Subcommand)]
enum Commands {
    /// Display version with ASCII art
    Version,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum NetworkArg {
    Mainnet,
    Sepolia,
    Localnet,
}

impl From<NetworkArg> for Network {
    fn from(arg: NetworkArg) -> Self {
        match arg {
            NetworkArg::Mainnet => Network::Mainnet,
            NetworkArg::Sepolia => Network::Sepolia,
            NetworkArg::Localnet => Network::Localnet,
        }
    }
}

/// Application entry point
#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();
    if let Some(Commands::Version) = cli.command {
        println!("{}", LOGO);
        println!("LazyEth v{}", VERSION);
        println!("A terminal UI for exploring the Ethereum blockchain");
        return Ok(());
    }

    let mut settings = config::load_settings();
    if let Some(network) = cli.network {
        settings.selected_network = network.into();
    }

    // The gateway client is built once here and handed to the worker; the
    // state machine itself never sees it.
    let api_key = config::api_key_from_env();
    let client = EthClient::new(settings.selected_network.clone(), api_key.clone());

    let (gateway_sender, mut gateway_receiver) =
        mpsc::channel::<GatewayEvent>(GATEWAY_CHANNEL_CAPACITY);
    let runtime = tokio::runtime::Handle::current();
    let mut worker = GatewayWorker::new(client, api_key, runtime, gateway_sender);

    let mut terminal = tui::init()?;
    let mut app = App::new(settings);

    // The block height is requested before the first frame is drawn; the UI
    // stays fully interactive while it resolves.
    dispatch(&mut app, &mut worker, Action::RefreshHeight);

    let result = run_app(&mut terminal, &mut app, &mut worker, &mut gateway_receiver).await;

    tui::restore()?;
    result
}

/// Main application loop.
async fn run_app(
    terminal: &mut tui::Tui,
    app: &mut App,
    worker: &mut GatewayWorker,
    gateway_receiver: &mut mpsc::Receiver<GatewayEvent>,
) -> Result<()> {
    let mut last_tick = Instant::now();

    loop {
        if app.exit {
            break;
        }

        terminal.draw(|frame| ui::render(app, frame))?;

        // Poll for terminal events with a small timeout, then drain any
        // pending gateway completions without blocking.
        let mut terminal_event_seen = false;
        if crossterm::event::poll(Duration::from_millis(1))? {
            terminal_event_seen = true;
            match crossterm::event::read() {
                Ok(crossterm::event::Event::Resize(_, _)) => continue,
                Ok(event) => {
                    if let Some(action) = handle_event(app, event) {
                        dispatch(app, worker, action);
                    }
                }
                Err(_) => app.exit = true,
            }
        }

        loop {
            match gateway_receiver.try_recv() {
                Ok(gateway_event) => dispatch(app, worker, Action::from(gateway_event)),
                Err(mpsc::error::TryRecvError::Empty) => break,
                Err(mpsc::error::TryRecvError::Disconnected) => {
                    app.exit = true;
                    break;
                }
            }
        }

        if last_tick.elapsed() >= TICK_RATE {
            last_tick = Instant::now();
        }

        if !terminal_event_seen {
            let remaining = TICK_RATE
                .checked_sub(last_tick.elapsed())
                .unwrap_or_else(|| Duration::from_millis(5));
            tokio::time::sleep(remaining.min(Duration::from_millis(50))).await;
        }
    }
    Ok(())
}

/// Runs a transition and executes the effects it requests. Effect failures
/// (clipboard, for now) are folded back into the state as a message popup.
fn dispatch(app: &mut App, worker: &mut GatewayWorker, action: Action) {
    for effect in app.update(action) {
        if let Err(e) = worker.run(effect) {
            app.update(Action::ShowMessage(format!("Error: {e}")));
        }
    }
}
