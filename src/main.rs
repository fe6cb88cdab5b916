use anyhow::Result;
use clap::{Parser, Subcommand};
use pet_mall::{
    cart::helpers::format_line_summary,
    catalog::{FetchOutcome, ProductFilter},
    config::Settings,
    router::create_app_router, server::AppState, MallClient,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

#[derive(Parser)]
#[command(
    about = env!("CARGO_PKG_DESCRIPTION"),
    version = env!("CARGO_PKG_VERSION")
)]
pub struct Args {
    #[arg(long, help = "(Optional) Path to a TOML settings file.")]
    pub config: Option<String>,

    #[arg(long, help = "(Optional) Session token, overrides the settings file.")]
    pub token: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Runs the in-memory development backend.
    Serve {
        #[arg(long, default_value = "0.0.0.0:8080")]
        addr: SocketAddr,
    },
    /// Lists products page by page.
    Browse {
        #[arg(long, help = "(Optional) Category id to filter by.")]
        category: Option<i64>,

        #[arg(long, help = "(Optional) Search keyword.")]
        keyword: Option<String>,

        #[arg(long, default_value_t = 1, help = "Number of pages to fetch.")]
        pages: u32,
    },
    /// Shows the cart and its summary.
    Cart {
        #[arg(long, help = "(Optional) Product id to add before listing.")]
        add: Option<i64>,
    },
}

async fn serve(addr: SocketAddr) -> Result<()> {
    // Initialize application state
    let state = Arc::new(AppState::seeded());

    // Build application router with all routes and middleware
    let app = create_app_router(state);

    info!("Development mall backend on http://{addr}/api");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Received Ctrl-C. Shutting down...");
        })
        .await?;
    Ok(())
}

async fn browse(client: &MallClient, category: Option<i64>, keyword: Option<String>, pages: u32) {
    let catalog = client.catalog();
    catalog.load_filtered(ProductFilter { category_id: category, keyword }).await;

    let categories = catalog.categories();
    if !categories.is_empty() {
        let names: Vec<String> = categories.iter().map(|c| format!("{} ({})", c.name, c.id)).collect();
        println!("Categories: {}", names.join(", "));
    }

    for _ in 1..pages {
        if catalog.load_more().await != FetchOutcome::Loaded {
            break;
        }
    }

    for product in catalog.products() {
        let discount = product
            .discount_percentage()
            .map(|pct| format!(" (-{pct}%)"))
            .unwrap_or_default();
        println!("#{:<4} {:<40} {:>8.2}{}", product.id, product.name, product.price, discount);
    }
    println!(
        "{} product(s), page {}, more available: {}",
        catalog.products().len(),
        catalog.page(),
        catalog.has_more()
    );
}

async fn cart(client: &MallClient, add: Option<i64>) {
    let cart = client.cart();
    if let Some(product_id) = add {
        if cart.add_product(product_id, 1).await.is_err() {
            return;
        }
    } else if cart.load().await.is_err() {
        return;
    }

    let lines = cart.lines();
    if lines.is_empty() {
        println!("Cart is empty.");
        return;
    }
    println!("{}", format_line_summary(&lines));

    let summary = cart.summary();
    println!(
        "{} item(s), {} selected, subtotal {:.2}",
        summary.total_line_count, summary.selected_line_count, summary.selected_subtotal
    );
    if let Some(discount) = summary.discount {
        println!("You save {discount:.2}");
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let args = Args::parse();

    if let Command::Serve { addr } = args.command {
        return serve(addr).await;
    }

    let mut settings = Settings::load(args.config.as_deref())?;
    if args.token.is_some() {
        settings.token = args.token;
    }
    let client = MallClient::connect(&settings)?;

    match args.command {
        Command::Browse {
            category,
            keyword,
            pages,
        } => browse(&client, category, keyword, pages).await,
        Command::Cart { add } => cart(&client, add).await,
        Command::Serve { .. } => {}
    }

    Ok(())
}
