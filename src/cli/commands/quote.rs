use crate::cli::commands::{apply_limits, LoadedSnapshot};
use crate::cli::{display::QuoteDisplay, QuoteArgs};
use crate::core::{Config, OutGivenInRequest, SwapError, SwapResult};
use crate::routing::{
    AsyncRouteGenerator, ChannelDelegate, QuoteBook, QuoteSlot, RouteGenerator, RouteQuote,
    SyncRouteGenerator,
};
use crate::utils::resolve_denom;
use colored::*;
use console::style;
use log::info;
use std::sync::Arc;

pub async fn execute(args: QuoteArgs, config: &Config) -> SwapResult<()> {
    if !args.json {
        println!("{}", "🚀 Swap Route Quote Tool".bold().cyan());
    }

    let config = apply_limits(config, &args.limits)?;

    // Create progress bar
    let pb = QuoteDisplay::create_progress_bar("Loading pool snapshot...");
    let snapshot = LoadedSnapshot::load(&config, &args.snapshot)?;

    let request = OutGivenInRequest::new(
        resolve_denom(&args.denom_in),
        args.amount,
        resolve_denom(&args.denom_out),
    );

    info!(
        "Quoting {} (max hops: {}, max routes: {})",
        request.key(),
        config.max_pools_in_route,
        config.max_routes_per_request
    );

    pb.set_message("Searching routes...");
    let outcome = if args.use_async {
        quote_async(&config, snapshot, request).await?
    } else {
        quote_sync(&config, snapshot, request)?
    };
    pb.finish_and_clear();

    match outcome {
        Ok(quote) if args.json => {
            println!("{}", serde_json::to_string_pretty(&quote)?);
        }
        Ok(quote) => {
            println!("\n{}", "🏆 Best Quote Found".bold().green());
            QuoteDisplay::display_quote(&quote);
            if quote.result.split.len() <= 1 {
                println!(
                    "{}",
                    style("💡 Tip: Use `swaproute routes` to compare candidate routes").dim()
                );
            }
        }
        Err(e) if e.is_no_route() || e.is_insufficient_liquidity() => {
            println!("{} {}", "❌".red(), e.to_string().red().bold());
        }
        Err(e) => return Err(e),
    }

    Ok(())
}

/// Inline generator with a quote book as its delegate.
fn quote_sync(
    config: &Config,
    snapshot: LoadedSnapshot,
    request: OutGivenInRequest,
) -> SwapResult<SwapResult<RouteQuote>> {
    let generator = SyncRouteGenerator::from_config(config)?;
    snapshot.install(&generator, config);

    let book = Arc::new(QuoteBook::new());
    book.track(QuoteSlot::Trade, &request);
    generator.set_token_in_delegate(book.clone());
    generator.request_token_out_by_token_in(request);

    match (book.quote(QuoteSlot::Trade), book.error(QuoteSlot::Trade)) {
        (Some(quote), _) => Ok(Ok(quote)),
        (None, Some(error)) => Ok(Err(error)),
        (None, None) => Err(SwapError::Other("No outcome delivered".to_string())),
    }
}

/// Background generator whose outcome arrives over a channel.
async fn quote_async(
    config: &Config,
    snapshot: LoadedSnapshot,
    request: OutGivenInRequest,
) -> SwapResult<SwapResult<RouteQuote>> {
    let generator = AsyncRouteGenerator::from_config(config)?;
    snapshot.install(&generator, config);

    let (delegate, mut outcomes) = ChannelDelegate::new();
    generator.set_token_in_delegate(Arc::new(delegate));
    generator.request_token_out_by_token_in(request);

    outcomes
        .recv()
        .await
        .map(|outcome| outcome.into_result())
        .ok_or_else(|| SwapError::Other("No outcome delivered".to_string()))
}
