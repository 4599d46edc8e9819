use serde::{Deserialize, Serialize};
use std::fmt;

/// Crisis categories the engine scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrisisType {
    BankingCrisis,
    HousingBubble,
    CurrencyCrisis,
    Recession,
    MarketCrash,
    SovereignDebt,
    InflationSpiral,
    LiquidityCrisis,
}

impl CrisisType {
    /// All crisis types in declaration order
    pub const ALL: [CrisisType; 8] = [
        CrisisType::BankingCrisis,
        CrisisType::HousingBubble,
        CrisisType::CurrencyCrisis,
        CrisisType::Recession,
        CrisisType::MarketCrash,
        CrisisType::SovereignDebt,
        CrisisType::InflationSpiral,
        CrisisType::LiquidityCrisis,
    ];

    /// Machine tag (matches the serde representation)
    pub fn as_str(&self) -> &'static str {
        match self {
            CrisisType::BankingCrisis => "banking_crisis",
            CrisisType::HousingBubble => "housing_bubble",
            CrisisType::CurrencyCrisis => "currency_crisis",
            CrisisType::Recession => "recession",
            CrisisType::MarketCrash => "market_crash",
            CrisisType::SovereignDebt => "sovereign_debt",
            CrisisType::InflationSpiral => "inflation_spiral",
            CrisisType::LiquidityCrisis => "liquidity_crisis",
        }
    }

    /// Human-readable name
    pub fn display_name(&self) -> &'static str {
        match self {
            CrisisType::BankingCrisis => "Banking Crisis",
            CrisisType::HousingBubble => "Housing Bubble",
            CrisisType::CurrencyCrisis => "Currency Crisis",
            CrisisType::Recession => "Recession",
            CrisisType::MarketCrash => "Market Crash",
            CrisisType::SovereignDebt => "Sovereign Debt Crisis",
            CrisisType::InflationSpiral => "Inflation Spiral",
            CrisisType::LiquidityCrisis => "Liquidity Crisis",
        }
    }
}

impl fmt::Display for CrisisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}
