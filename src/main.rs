use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use env_logger::Env;
use log::{error, info};
use tokio::sync::Mutex;

use framewatch::application::Poller;
use framewatch::domain::{ConfigRepository, Settings};
use framewatch::infrastructure::presentation::alert::Alert;
use framewatch::infrastructure::presentation::{console, dashboard_server, terminal_view};
use framewatch::infrastructure::{HttpFetcher, TomlConfigRepository};

#[derive(Parser)]
#[clap(author, version, about)]
struct Args {
    #[clap(
        short,
        long,
        help = "Specify the config file.",
        default_value = "./framewatch.toml"
    )]
    config_path: String,
    #[clap(long, env = "FRAMEWATCH_BASE_URL", help = "Base URL of the frame API.")]
    base_url: Option<String>,
    #[clap(
        long,
        env = "FRAMEWATCH_API_KEY",
        hide_env_values = true,
        help = "Key sent as the X-api-key header."
    )]
    api_key: Option<String>,
    #[clap(long, help = "Per-request timeout in milliseconds. [default: 6000]")]
    timeout_ms: Option<u64>,
    #[clap(
        short('i'),
        long,
        help = "Polling interval in milliseconds. [default: 3000]"
    )]
    interval_ms: Option<u64>,
    #[clap(long, help = "Resource fetched on every tick. [default: enrichedframe]")]
    resource: Option<String>,
    #[clap(
        short,
        long,
        help = "Address of the dashboard API. [default: 127.0.0.1:8080]"
    )]
    listen: Option<SocketAddr>,
    #[clap(long, help = "Do not print the records table on updates.")]
    no_table: bool,
    #[clap(long, help = "Fetch just once, print the records and exit.")]
    once: bool,
}
impl Args {
    fn settings(&self) -> Settings {
        Settings {
            base_url: self.base_url.clone(),
            api_key: self.api_key.clone(),
            timeout_ms: self.timeout_ms,
            interval_ms: self.interval_ms,
            resource: self.resource.clone(),
            listen: self.listen,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    env_logger::Builder::from_env(Env::default().default_filter_or("framewatch=info")).init();

    info!("config_path: {}", args.config_path);

    let settings = TomlConfigRepository::new(&args.config_path)
        .get()
        .await?
        .overlay(args.settings());

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let connection = match Alert::new().require_connection(&settings, stdin).await? {
        Some(x) => x,
        None => return Ok(()),
    };
    let poll_config = settings.poll()?;

    info!("base_url:    {}", connection.base_url);
    info!("api_key:     {}", connection.api_key);
    info!("timeout_ms:  {}", connection.timeout.as_millis());
    info!("interval_ms: {}", poll_config.period.as_millis());

    let fetcher = HttpFetcher::new(&connection)?;

    if args.once {
        let poller = Poller::new(fetcher, poll_config);
        println!("{}", terminal_view::render_once(&poller).await?);
        return Ok(());
    }

    let poller = Poller::start(fetcher, poll_config);
    let state = poller.subscribe();
    let poller = Arc::new(Mutex::new(poller));

    if !args.no_table {
        tokio::spawn(terminal_view::run(state.clone()));
    }

    let listen = settings.listen();
    let listener = tokio::net::TcpListener::bind(listen).await?;
    info!("dashboard API on http://{}/api/state", listener.local_addr()?);
    info!("commands: t (toggle), f (fetch once), q (quit)");

    let router = dashboard_server::router(poller.clone(), state);

    tokio::select! {
        _quit = console::run(poller) => (),
        result = axum::serve(listener, router).into_future() => {
            if let Err(why) = result {
                error!("{why}")
            }
        },
    }

    Ok(())
}
