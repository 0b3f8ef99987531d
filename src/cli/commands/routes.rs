use crate::cli::commands::{apply_limits, LoadedSnapshot};
use crate::cli::{display::QuoteDisplay, RoutesArgs};
use crate::core::{Config, SwapResult};
use crate::routing::SyncRouteGenerator;
use crate::utils::resolve_denom;
use colored::*;
use log::info;

pub async fn execute(args: RoutesArgs, config: &Config) -> SwapResult<()> {
    println!("{}", "🚀 Swap Route Discovery Tool".bold().cyan());

    let config = apply_limits(config, &args.limits)?;
    let pb = QuoteDisplay::create_progress_bar("Loading pool snapshot...");
    let snapshot = LoadedSnapshot::load(&config, &args.snapshot)?;

    let generator = SyncRouteGenerator::from_config(&config)?;
    snapshot.install(&generator, &config);

    let denom_in = resolve_denom(&args.denom_in);
    let denom_out = resolve_denom(&args.denom_out);
    info!("Searching routes {} -> {}", denom_in, denom_out);

    pb.set_message("Searching routes...");
    let routes = generator.candidate_routes(&denom_in, &denom_out);
    pb.finish_and_clear();

    if routes.is_empty() {
        println!(
            "{}",
            format!(
                "❌ No route within {} hops from {} to {}",
                config.max_pools_in_route, denom_in, denom_out
            )
            .red()
            .bold()
        );
        return Ok(());
    }

    QuoteDisplay::display_routes(&routes);
    Ok(())
}
