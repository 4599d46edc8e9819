//! Recommended actions per crisis type and alert level

use vigil_core::{AlertLevel, CrisisType};

/// Crisis-specific actions: (critical, elevated, watch)
fn crisis_actions(crisis_type: CrisisType) -> (&'static str, &'static str, &'static str) {
    match crisis_type {
        CrisisType::BankingCrisis => (
            "Cut counterparty exposure to weakly capitalized banks",
            "Buy protection on financials via bank CDS or puts",
            "Track interbank funding spreads and deposit flows",
        ),
        CrisisType::HousingBubble => (
            "Exit leveraged real-estate and homebuilder exposure",
            "Hedge mortgage credit exposure",
            "Track mortgage origination standards and price-to-income",
        ),
        CrisisType::CurrencyCrisis => (
            "Hedge or unwind exposure to the affected currency",
            "Reduce unhedged foreign-currency debt holdings",
            "Track reserve adequacy and capital flows",
        ),
        CrisisType::Recession => (
            "Rotate into defensive sectors and high-quality duration",
            "Reduce cyclical and high-yield credit exposure",
            "Track jobless claims, PMIs and the yield curve",
        ),
        CrisisType::MarketCrash => (
            "Reduce gross equity exposure and margin usage",
            "Buy index put protection while volatility is cheap",
            "Track valuation extremes and margin debt",
        ),
        CrisisType::SovereignDebt => (
            "Exit exposure to the affected sovereign and its banks",
            "Buy sovereign CDS protection",
            "Track bond auctions and fiscal slippage",
        ),
        CrisisType::InflationSpiral => (
            "Shift into real assets and inflation-linked bonds",
            "Shorten nominal duration",
            "Track wage settlements and inflation expectations",
        ),
        CrisisType::LiquidityCrisis => (
            "Raise cash buffers and secure committed funding lines",
            "Reduce positions in illiquid instruments",
            "Track funding spreads and commercial paper issuance",
        ),
    }
}

/// Ordered recommended actions, most urgent first
pub fn recommended_actions(crisis_type: CrisisType, level: AlertLevel) -> Vec<String> {
    let (critical, elevated, watch) = crisis_actions(crisis_type);
    let actions: Vec<&str> = match level {
        AlertLevel::Black => vec![
            "Activate the crisis response plan",
            critical,
            elevated,
            "Move to daily risk reviews",
            watch,
        ],
        AlertLevel::Red => vec![critical, elevated, "Run full-portfolio stress tests", watch],
        AlertLevel::Orange => vec![elevated, "Run full-portfolio stress tests", watch],
        AlertLevel::Yellow => vec![watch, "Increase monitoring frequency"],
        AlertLevel::Green => vec!["Continue routine monitoring"],
    };
    actions.into_iter().map(String::from).collect()
}
