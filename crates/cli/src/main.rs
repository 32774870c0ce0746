//! Knitwear CLI - drive the storefront cart, wishlist and checkout from a shell.
//!
//! State is read from and written back to `KNITWEAR_STATE_DIR`, so successive
//! invocations behave like one browsing session.
//!
//! # Usage
//!
//! ```bash
//! # Add a sweater to the cart (twice adds quantity 2)
//! kw-cli cart add --id 1 --name "Cable Knit" --price "₹715.00" --size M
//!
//! # Change or remove a line (quantity <= 0 removes)
//! kw-cli cart update --id 1 --quantity 3
//!
//! # Save or unsave a product
//! kw-cli wishlist toggle --id 9 --name "Beanie" --price "₹349.00"
//!
//! # Place the order
//! kw-cli checkout --first-name Asha --last-name Rao --email asha@example.in ...
//!
//! # Preview the variants a color/size grid would create
//! kw-cli variants generate --colors Red,Blue --sizes S,M,L --price 999
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Args, Parser, Subcommand};
use knitwear_core::{ProductId, VariantId};
use knitwear_storefront::error::Result;
use knitwear_storefront::{ProductSummary, ProductVariant, StorefrontConfig, VariantSelection};
use sentry::integrations::tracing as sentry_tracing;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "kw-cli")]
#[command(author, version, about = "Knitwear storefront CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the shopping cart
    Cart {
        #[command(subcommand)]
        action: CartCommand,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: WishlistCommand,
    },
    /// Submit the cart as an order
    Checkout(commands::checkout::CheckoutArgs),
    /// Product variant tools
    Variants {
        #[command(subcommand)]
        action: VariantsCommand,
    },
}

#[derive(Subcommand)]
enum CartCommand {
    /// Add one unit of a product
    Add(ProductArgs),
    /// Remove a product line
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Set the quantity of a line (zero or negative removes it)
    Update {
        #[arg(long)]
        id: i64,

        #[arg(short, long, allow_hyphen_values = true)]
        quantity: i64,
    },
    /// Empty the cart
    Clear,
    /// Print the cart
    Show,
}

#[derive(Subcommand)]
enum WishlistCommand {
    /// Save a product, or unsave it if already saved
    Toggle(ProductArgs),
    /// Save a product
    Add(ProductArgs),
    /// Unsave a product
    Remove {
        #[arg(long)]
        id: i64,
    },
    /// Print the wishlist
    Show,
}

#[derive(Subcommand)]
enum VariantsCommand {
    /// Expand colors x sizes into variant drafts
    Generate(commands::variants::GenerateArgs),
}

/// Product fields as the product page would pass them.
#[derive(Args)]
struct ProductArgs {
    /// Product id
    #[arg(long)]
    id: i64,

    /// Product name
    #[arg(short, long)]
    name: String,

    /// Display price, e.g. "₹1,299.00"
    #[arg(short, long)]
    price: String,

    /// Original price before discount
    #[arg(long)]
    original_price: Option<String>,

    #[arg(short, long, default_value = "")]
    category: String,

    #[arg(long, default_value = "")]
    image: String,

    /// Backend variant id for the selected size/color
    #[arg(long)]
    variant_id: Option<i64>,

    /// Price of the selected variant, if it differs
    #[arg(long)]
    variant_price: Option<String>,

    #[arg(long)]
    size: Option<String>,

    #[arg(long)]
    color: Option<String>,
}

impl ProductArgs {
    fn product(&self) -> ProductSummary {
        let variants = self
            .variant_id
            .map(|id| ProductVariant {
                id: VariantId::new(id),
                size: self.size.clone(),
                color: self.color.clone(),
                price: self.variant_price.clone(),
            })
            .into_iter()
            .collect();

        ProductSummary {
            id: ProductId::new(self.id),
            name: self.name.clone(),
            category: self.category.clone(),
            price: self.price.clone(),
            original_price: self.original_price.clone(),
            image: self.image.clone(),
            variants,
        }
    }

    fn selection(&self) -> VariantSelection {
        VariantSelection {
            size: self.size.clone(),
            color: self.color.clone(),
        }
    }
}

/// Log filter used when `RUST_LOG` is unset. The binary's own events live
/// under `kw_cli`, and they are the command output.
const DEFAULT_LOG_FILTER: &str = "knitwear_storefront=info,kw_cli=info";

fn init_sentry(config: &StorefrontConfig) -> Option<sentry::ClientInitGuard> {
    let dsn = config.sentry_dsn.as_ref()?;

    let guard = sentry::init((
        dsn.as_str(),
        sentry::ClientOptions {
            release: sentry::release_name!(),
            attach_stacktrace: true,
            ..Default::default()
        },
    ));

    tracing::info!("Sentry initialized");
    Some(guard)
}

fn sentry_event_filter(metadata: &tracing::Metadata<'_>) -> sentry_tracing::EventFilter {
    match *metadata.level() {
        tracing::Level::ERROR | tracing::Level::WARN => sentry_tracing::EventFilter::Event,
        tracing::Level::INFO | tracing::Level::DEBUG => sentry_tracing::EventFilter::Breadcrumb,
        _ => sentry_tracing::EventFilter::Ignore,
    }
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .with(sentry_tracing::layer().event_filter(sentry_event_filter))
        .init();

    let cli = Cli::parse();

    let config = match StorefrontConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Invalid configuration: {e}");
            std::process::exit(2);
        }
    };
    let _sentry_guard = init_sentry(&config);

    if let Err(e) = run(cli, &config).await {
        e.report();
        tracing::error!("{}", e.user_message());
        std::process::exit(1);
    }
}

async fn run(cli: Cli, config: &StorefrontConfig) -> Result<()> {
    match cli.command {
        Commands::Cart { action } => match action {
            CartCommand::Add(args) => {
                commands::cart::add(config, &args.product(), &args.selection())?;
            }
            CartCommand::Remove { id } => commands::cart::remove(config, ProductId::new(id))?,
            CartCommand::Update { id, quantity } => {
                commands::cart::update(config, ProductId::new(id), quantity)?;
            }
            CartCommand::Clear => commands::cart::clear(config)?,
            CartCommand::Show => commands::cart::show(config),
        },
        Commands::Wishlist { action } => match action {
            WishlistCommand::Toggle(args) => commands::wishlist::toggle(config, &args.product())?,
            WishlistCommand::Add(args) => commands::wishlist::add(config, &args.product())?,
            WishlistCommand::Remove { id } => {
                commands::wishlist::remove(config, ProductId::new(id))?;
            }
            WishlistCommand::Show => commands::wishlist::show(config),
        },
        Commands::Checkout(args) => commands::checkout::run(config, args).await?,
        Commands::Variants { action } => match action {
            VariantsCommand::Generate(args) => commands::variants::generate(config, &args)?,
        },
    }
    Ok(())
}
