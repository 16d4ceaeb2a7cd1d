use serde::Serialize;

use super::history::IndicatorHistory;

/// Read-only copy of an entity handed to the host for rendering.
///
/// Partner collections keep the entity's registration order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntitySnapshot {
    pub name: String,
    pub gdp: f64,
    pub unemployment: f64,
    pub inflation: f64,
    pub reserves: f64,
    pub year: u32,
    pub trade_partners: Vec<(String, f64)>,
    pub export_demand: Vec<(String, f64)>,
    pub imports: Vec<(String, f64)>,
    pub history: IndicatorHistory,
}

impl EntitySnapshot {
    pub fn tariff_of(&self, partner: &str) -> Option<f64> {
        lookup(&self.trade_partners, partner)
    }

    pub fn export_demand_of(&self, partner: &str) -> Option<f64> {
        lookup(&self.export_demand, partner)
    }

    pub fn imports_of(&self, partner: &str) -> Option<f64> {
        lookup(&self.imports, partner)
    }

    pub fn to_json_pretty(&self) -> anyhow::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn lookup(entries: &[(String, f64)], partner: &str) -> Option<f64> {
    entries
        .iter()
        .find(|(name, _)| name == partner)
        .map(|(_, value)| *value)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PartnerSummary {
    pub partner: String,
    pub tariff: f64,
    pub exports: f64,
    pub imports: f64,
    pub balance: f64,
}

/// Headline indicators plus the trade table shown on the overview screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicSummary {
    pub name: String,
    pub year: u32,
    pub gdp: f64,
    pub unemployment: f64,
    pub inflation: f64,
    pub foreign_reserves: f64,
    pub total_exports: f64,
    pub total_imports: f64,
    pub trade_balance: f64,
    pub partners: Vec<PartnerSummary>,
}
