use clap::{Parser, Subcommand};
use lorem_picsum::{config, page, server};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

fn version_string() -> &'static str {
    let hash = env!("GIT_HASH");
    if hash.is_empty() {
        env!("CARGO_PKG_VERSION")
    } else {
        // Leaked once at startup
        Box::leak(format!("{}@{hash}", env!("CARGO_PKG_VERSION")).into_boxed_str())
    }
}

#[derive(Parser)]
#[command(name = "lorem-picsum")]
#[command(about = "Placeholder image server")]
#[command(long_about = "\
Placeholder image server

Serves filler images with centered text on demand:

  GET /lorem?w=300&h=200&fs=20&s=Hello&p=1&t=png

  w, h   width and height in pixels       (default 180 x 120)
  fs     font size                        (default 14)
  s      text to draw                     (default none)
  p      1 to add a WIDTH x HEIGHT label
  t      png | gif | anything else = jpeg

Malformed values fall back to their defaults.

Runtime files, relative to the working directory:

  fonts/DejaVuSansMono.ttf      # monospace font (required, bundled)
  templates/home.html           # landing page at / (required)
  assets/                       # served under /assets/

Run 'lorem-picsum gen-config' to generate a documented lorem.toml.")]
#[command(version = version_string())]
struct Cli {
    /// Config file (missing file = stock defaults)
    #[arg(long, default_value = "lorem.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(clap::Args, Clone, Default)]
struct ServeArgs {
    /// Address to bind, overrides `server.addr` (e.g. 127.0.0.1:8080)
    #[arg(long)]
    addr: Option<String>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Print a stock lorem.toml with all options documented
    GenConfig,
    /// Print the stock landing page template (templates/home.html)
    GenTemplate,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve(ServeArgs::default())) {
        Command::Serve(args) => {
            init_tracing();
            let mut config = config::load_config(&cli.config)?;
            if let Some(addr) = args.addr {
                config.server.addr = addr;
            }
            config.validate()?;
            let runtime = tokio::runtime::Runtime::new()?;
            runtime.block_on(server::serve(&config))?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
        Command::GenTemplate => {
            println!("{}", page::stock_template());
        }
    }

    Ok(())
}

/// Install the fmt subscriber; `RUST_LOG` overrides the default filter.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("lorem_picsum=info,poem=info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
