use rust_decimal::Decimal;

/// Resolve a token symbol to its base denom; anything else is taken as a denom already
pub fn resolve_denom(input: &str) -> String {
    match input.to_uppercase().as_str() {
        "OSMO" => "uosmo".to_string(),
        "ATOM" => "uatom".to_string(),
        "ION" => "uion".to_string(),
        "USDC" => "uusdc".to_string(),
        "USDT" => "uusdt".to_string(),
        _ => input.to_string(),
    }
}

/// Format large numbers with thousands separators
pub fn format_number(n: u128) -> String {
    let s = n.to_string();
    let mut result = String::new();
    let mut count = 0;

    for ch in s.chars().rev() {
        if count == 3 {
            result.push(',');
            count = 0;
        }
        result.push(ch);
        count += 1;
    }

    result.chars().rev().collect()
}

/// Render a rate such as a fee or price impact as a percentage
pub fn format_percent(rate: Decimal) -> String {
    format!("{:.3}%", rate * Decimal::ONE_HUNDRED)
}

/// Trim a price to `digits` decimal places for display
pub fn format_price(price: Decimal, digits: u32) -> String {
    price.round_dp(digits).normalize().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_resolve_denom() {
        assert_eq!(resolve_denom("OSMO"), "uosmo");
        assert_eq!(resolve_denom("usdc"), "uusdc"); // Case insensitive
        assert_eq!(resolve_denom("uatom"), "uatom");
        assert_eq!(
            resolve_denom("ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"),
            "ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2"
        );
    }

    #[test]
    fn test_format_number() {
        assert_eq!(format_number(1234567890), "1,234,567,890");
        assert_eq!(format_number(1000), "1,000");
        assert_eq!(format_number(999), "999");
        assert_eq!(format_number(0), "0");
    }

    #[test]
    fn test_format_percent_and_price() {
        assert_eq!(format_percent(Decimal::from_str("0.003").unwrap()), "0.300%");
        assert_eq!(format_price(Decimal::from_str("9.970000").unwrap(), 4), "9.97");
        assert_eq!(format_price(Decimal::from_str("0.123456").unwrap(), 3), "0.123");
    }
}
