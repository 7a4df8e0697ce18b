use chatdesk::core::config::{self, CliOverrides, Theme};
use chatdesk::core::dispatch::Dispatcher;
use chatdesk::{logging, tui};
use clap::Parser;
use std::path::Path;

#[derive(Parser)]
#[command(name = "chatdesk", about = "Terminal client for the document chat backend")]
struct Args {
    /// Backend base URL (overrides API_URL and the config file)
    #[arg(long)]
    api_url: Option<String>,

    /// Run without signing in
    #[arg(long)]
    no_auth: bool,

    /// Colour scheme
    #[arg(long, value_enum)]
    theme: Option<Theme>,

    /// Log level written to chatdesk.log (error, warn, info, debug, trace)
    #[arg(long)]
    log_level: Option<String>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger in the current directory. Must be up before config loading,
    // which logs.
    if let Err(e) = logging::init(Path::new("chatdesk.log")) {
        eprintln!("chatdesk: logging disabled: {e}");
    }

    let file_config = config::load_config();
    let overrides = CliOverrides {
        api_url: args.api_url,
        theme: args.theme,
        log_level: args.log_level,
        no_auth: args.no_auth,
    };
    let resolved = match &file_config {
        Ok(cfg) => config::resolve(cfg, &overrides),
        Err(_) => config::resolve(&config::ChatdeskConfig::default(), &overrides),
    };

    logging::apply_level(resolved.log_level);

    if let Err(e) = &file_config {
        log::warn!("Ignoring config file: {}", e);
    }
    log::info!(
        "Chatdesk starting up against {} (auth {})",
        resolved.api_base_url,
        if resolved.use_auth { "on" } else { "off" }
    );

    let dispatcher = Dispatcher::from_config(&resolved).map_err(std::io::Error::other)?;
    tui::run(resolved, dispatcher)
}
