//! Variant generation preview.
//!
//! Expands the color and size lists a seller enters into the product
//! variants that would be created, one per combination.

use clap::Args;
use knitwear_core::{VariantTemplate, generate_variants, parse_price};
use knitwear_storefront::StorefrontConfig;
use knitwear_storefront::error::{Result, StorefrontError};

#[derive(Args)]
pub struct GenerateArgs {
    /// Comma-separated colors
    #[arg(long, value_delimiter = ',')]
    colors: Vec<String>,

    /// Comma-separated sizes
    #[arg(long, value_delimiter = ',')]
    sizes: Vec<String>,

    /// Price applied to every variant
    #[arg(short, long)]
    price: String,

    /// Stock applied to every variant
    #[arg(long, default_value_t = 0)]
    stock: u32,
}

/// # Errors
///
/// Returns an error if the price is unparsable or no colors or sizes were
/// given.
pub fn generate(config: &StorefrontConfig, args: &GenerateArgs) -> Result<()> {
    let template = VariantTemplate {
        price: parse_price(&args.price)?,
        stock: args.stock,
    };

    let drafts = generate_variants(&args.colors, &args.sizes, template);
    if drafts.is_empty() {
        return Err(StorefrontError::BadRequest(
            "at least one color or size is required".to_string(),
        ));
    }

    for draft in &drafts {
        tracing::info!(
            "{:<20} {} (stock {})",
            draft.title(),
            config.currency.format(draft.price),
            draft.stock
        );
    }
    tracing::info!("{} variant(s)", drafts.len());
    Ok(())
}
