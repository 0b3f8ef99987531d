use crate::core::{PoolInfo, PoolState, PoolType, Route};
use crate::discovery::ScoredRoute;
use crate::routing::RouteQuote;
use crate::utils::{format_number, format_percent, format_price};
use colored::*;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use rust_decimal::Decimal;

/// Display helper for quotes, routes and pools
pub struct QuoteDisplay;

impl QuoteDisplay {
    /// Display a delivered quote
    pub fn display_quote(quote: &RouteQuote) {
        let result = &quote.result;

        println!(
            "{} {}",
            style("►").cyan(),
            format_route(&quote.route).bold()
        );
        println!(
            "  {} {} → {} {}",
            format_number(result.split.iter().map(|leg| leg.amount_in).sum()),
            quote.route.token_in_denom,
            format_number(result.amount).bright_green().bold(),
            quote.route.token_out_denom
        );
        println!(
            "  Price Impact: {} | Fee: {} ({} {})",
            format_impact(result.price_impact),
            format_percent(result.swap_fee),
            format_number(result.token_in_fee_amount),
            quote.route.token_in_denom
        );
        println!(
            "  Spot: {} → {} | Effective: {} | Without fee: {}",
            format_price(result.before_spot_price_out_over_in, 6),
            format_price(result.after_spot_price_out_over_in, 6),
            format_price(result.effective_price_out_over_in, 6),
            format_price(result.before_spot_price_without_swap_fee_out_over_in, 6)
        );

        if result.multi_hop_incentive_discount {
            println!("  {}", "Incentive fee discount applied".yellow());
        }

        if result.split.len() > 1 {
            println!("  {}", style("Split").bold());
            for leg in &result.split {
                println!(
                    "    {} in → {} out  {}",
                    format_number(leg.amount_in),
                    format_number(leg.amount_out),
                    style(format_route(&leg.route)).dim()
                );
            }
        }
        println!();
    }

    /// Display ranked candidate routes
    pub fn display_routes(routes: &[ScoredRoute]) {
        println!("\n{}", style("🧭 Candidate Routes").bold().underlined());

        for (i, candidate) in routes.iter().enumerate() {
            let marker = if candidate.incentivized {
                " ★ incentivized".yellow()
            } else {
                "".normal()
            };
            println!(
                "{}. {}{}",
                i + 1,
                format_route(&candidate.route).bold(),
                marker
            );
            println!(
                "   Hops: {} | Spot price: {}",
                candidate.route.len(),
                format_price(candidate.spot_price, 8)
            );
        }
    }

    /// Display pool list
    pub fn display_pool_list(pools: &[PoolInfo], detailed: bool) {
        println!("\n{}", style("🏊 Available Pools").bold().underlined());

        for (i, pool) in pools.iter().enumerate() {
            let denoms: Vec<&str> = pool.denoms().collect();
            println!(
                "{}. {} Pool {}: {}",
                i + 1,
                format_pool_type(pool.pool_type()).bold(),
                pool.id,
                denoms.join("/")
            );

            if detailed {
                println!("   Fee: {}", format_percent(pool.swap_fee));
                for asset in &pool.assets {
                    match (&pool.pool_state, asset.weight) {
                        (PoolState::Weighted, Some(weight)) => println!(
                            "   {} {} (weight {})",
                            format_number(asset.amount),
                            asset.denom,
                            weight
                        ),
                        _ => println!("   {} {}", format_number(asset.amount), asset.denom),
                    }
                }
                if let PoolState::Stable { amp_factor } = pool.pool_state {
                    println!("   Amplification Factor: {}", amp_factor);
                }
                if let Err(reason) = pool.validate() {
                    println!("   {}", format!("Invalid: {}", reason).red());
                }
                println!();
            }
        }
    }

    /// Create a progress bar for operations
    pub fn create_progress_bar(message: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_chars("⠁⠂⠄⡀⢀⠠⠐⠈ "),
        );
        pb.set_message(message.to_string());
        pb.enable_steady_tick(std::time::Duration::from_millis(80));
        pb
    }
}

fn format_route(route: &Route) -> String {
    if route.is_empty() {
        format!("{} → {} (no hops)", route.token_in_denom, route.token_out_denom)
    } else {
        route.to_string()
    }
}

fn format_pool_type(pool_type: PoolType) -> ColoredString {
    let label = pool_type.to_string();
    match pool_type {
        PoolType::Weighted => label.blue(),
        PoolType::Stable => label.green(),
    }
}

/// Format price impact with color
fn format_impact(impact: Decimal) -> ColoredString {
    let impact_str = format_percent(impact);
    if impact < Decimal::new(1, 3) {
        impact_str.green()
    } else if impact < Decimal::new(1, 2) {
        impact_str.yellow()
    } else {
        impact_str.red()
    }
}
