use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dragon_scales::client::{EntityGraphClient, HttpEntityClient};
use dragon_scales::config::Config;
use dragon_scales::graph::GraphLoader;
use dragon_scales::models::{ContentBlockId, EntityId};
use dragon_scales::view::EntityView;
use dragon_scales::workspace::Workspace;
use dragon_scales::{api, render, tree};

#[derive(Parser)]
#[command(name = "dscales")]
#[command(about = "Hierarchical notebooks with versioned content blocks")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Port for HTTP API
        #[arg(short, long)]
        port: Option<u16>,

        /// Address to bind
        #[arg(long)]
        host: Option<String>,
    },
    /// Print the descendant tree of an entity
    Tree {
        /// Entity id
        id: String,
    },
    /// Print an entity's comments and children in chronological order
    Timeline {
        /// Entity id
        id: String,
    },
    /// Print every version of a content block
    History {
        /// Content block id
        block_id: String,
    },
}

/// Initialize tracing to stderr, honoring `RUST_LOG` over the configured filter.
fn init_tracing(default_filter: &str) {
    let filter = tracing_subscriber::EnvFilter::new(
        std::env::var("RUST_LOG").unwrap_or_else(|_| default_filter.into()),
    );

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn serve(config: &Config) -> anyhow::Result<()> {
    let workspace = Workspace::new();
    let app = api::create_router(workspace);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("dragon-scales server listening on http://{}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let mut config = Config::load();
    init_tracing(&config.log_filter);

    let client = HttpEntityClient::new(config.api_url.clone());

    match cli.command {
        Some(Commands::Serve { port, host }) => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            serve(&config).await?;
        }
        Some(Commands::Tree { id }) => {
            let id = EntityId::from(id);
            let loader = GraphLoader::new(client);
            let nodes = tree::load(&loader, &id).await?;
            print!("{}", render::render_tree(&nodes));
        }
        Some(Commands::Timeline { id }) => {
            let entity = client.resolve_entity(&EntityId::from(id)).await?;
            let mut view = EntityView::new(entity);
            view.load(&client).await;
            if let Some(parent) = view.parent_name() {
                println!("{} (in {})", view.entity().name, parent);
            } else {
                println!("{}", view.entity().name);
            }
            print!("{}", render::render_timeline(&view.render_order()));
        }
        Some(Commands::History { block_id }) => {
            let block_id = ContentBlockId::from(block_id);
            for (index, version) in client.get_history(&block_id).await?.iter().enumerate() {
                println!("[{}] {}", index, version);
            }
        }
        None => serve(&config).await?,
    }

    Ok(())
}
