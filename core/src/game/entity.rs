use std::fmt;

use anyhow::{Result, bail, ensure};
use serde::Serialize;
use tracing::{debug, info, warn};

use super::events::{MacroEvent, roll_event};
use super::history::IndicatorHistory;
use super::random::EconomyRng;
use super::snapshot::{EconomicSummary, EntitySnapshot, PartnerSummary};
use super::{
    BASE_GROWTH_PCT_RANGE, CONTRACTION_UNEMPLOYMENT_WEIGHT, DEFICIT_GDP_WEIGHT, DEFAULT_TARIFF,
    EXPORT_DEMAND_RANGE, EXPORT_GDP_WEIGHT, EXPORT_VALUE_RATIO, GROWTH_UNEMPLOYMENT_WEIGHT,
    IMPORT_GROWTH_ELASTICITY, IMPORT_INFLATION_DAMPING, IMPORT_RANGE, INFLATION_BASELINE_DRIFT,
    INITIAL_FOREIGN_RESERVES, MAX_RETALIATION_CHANCE, RETALIATION_DEMAND_FACTOR,
    RETALIATION_SLOPE, RETALIATION_TARIFF_FLOOR, RETALIATION_TARIFF_THRESHOLD,
    SURPLUS_GDP_WEIGHT, TARIFF_INFLATION_WEIGHT, TARIFF_REVENUE_GDP_WEIGHT, UNEMPLOYMENT_STEP,
};

/// This entity's one-directional view of a trading relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeLink {
    pub partner: String,
    pub tariff: f64,
    pub export_demand: f64,
    pub imports: f64,
}

impl TradeLink {
    /// Export value after this entity's own tariff toward the partner is applied.
    pub fn export_value(&self) -> f64 {
        self.export_demand * (1.0 - self.tariff) * EXPORT_VALUE_RATIO
    }

    pub fn tariff_revenue(&self) -> f64 {
        self.imports * self.tariff
    }

    fn retaliation_chance(&self) -> Option<f64> {
        (self.tariff > RETALIATION_TARIFF_THRESHOLD).then(|| {
            ((self.tariff - RETALIATION_TARIFF_FLOOR) * RETALIATION_SLOPE)
                .min(MAX_RETALIATION_CHANCE)
        })
    }
}

/// Outcome reported to the host for a completed `advance_year` call.
#[derive(Debug, Clone, PartialEq)]
pub enum YearEvent {
    /// The partner cut its demand for our exports. The year was not closed.
    Retaliation { partner: String },
    Shock(MacroEvent),
}

impl YearEvent {
    pub fn message(&self) -> String {
        match self {
            YearEvent::Retaliation { partner } => format!(
                "警告: {} が高関税への報復として貿易制限を実施しました！",
                partner
            ),
            YearEvent::Shock(event) => format!("イベント: {}!", event.label()),
        }
    }
}

impl fmt::Display for YearEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

/// Indicators computed for the year before anything is written back.
struct YearOutcome {
    gdp: f64,
    gdp_change: f64,
    unemployment: f64,
    inflation: f64,
    foreign_reserves: f64,
    trade_balance: f64,
}

#[derive(Debug, Clone)]
pub struct EconomicEntity {
    name: String,
    pub(crate) gdp: f64,
    pub(crate) unemployment: f64,
    pub(crate) inflation: f64,
    pub(crate) foreign_reserves: f64,
    links: Vec<TradeLink>,
    year: u32,
    history: IndicatorHistory,
}

impl EconomicEntity {
    pub fn new(name: impl Into<String>, gdp: f64, unemployment: f64, inflation: f64) -> Self {
        Self {
            name: name.into(),
            gdp,
            unemployment,
            inflation,
            foreign_reserves: INITIAL_FOREIGN_RESERVES,
            links: Vec::new(),
            year: 1,
            history: IndicatorHistory::starting_at(gdp, unemployment, inflation),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn gdp(&self) -> f64 {
        self.gdp
    }

    pub fn unemployment(&self) -> f64 {
        self.unemployment
    }

    pub fn inflation(&self) -> f64 {
        self.inflation
    }

    pub fn foreign_reserves(&self) -> f64 {
        self.foreign_reserves
    }

    pub fn year(&self) -> u32 {
        self.year
    }

    pub fn history(&self) -> &IndicatorHistory {
        &self.history
    }

    /// Trading relationships in the order they were first registered.
    pub fn trade_links(&self) -> &[TradeLink] {
        &self.links
    }

    pub fn trade_link(&self, partner: &str) -> Option<&TradeLink> {
        self.links.iter().find(|link| link.partner == partner)
    }

    pub fn tariff_toward(&self, partner: &str) -> Option<f64> {
        self.trade_link(partner).map(|link| link.tariff)
    }

    pub fn average_tariff(&self) -> f64 {
        if self.links.is_empty() {
            return 0.0;
        }
        self.links.iter().map(|link| link.tariff).sum::<f64>() / self.links.len() as f64
    }

    /// Registers (or re-registers) a relationship with freshly drawn demand and imports.
    ///
    /// A repeated registration keeps the partner's position but discards any drift.
    pub fn add_trade_partner<R: EconomyRng + ?Sized>(
        &mut self,
        partner: impl Into<String>,
        tariff: Option<f64>,
        rng: &mut R,
    ) {
        let partner = partner.into();
        let tariff = tariff.unwrap_or(DEFAULT_TARIFF);
        let export_demand = rng.draw_uniform(EXPORT_DEMAND_RANGE.0, EXPORT_DEMAND_RANGE.1);
        let imports = rng.draw_uniform(IMPORT_RANGE.0, IMPORT_RANGE.1);
        let link = TradeLink {
            partner,
            tariff,
            export_demand,
            imports,
        };
        match self.links.iter_mut().find(|existing| existing.partner == link.partner) {
            Some(existing) => {
                debug!(entity = %self.name, partner = %link.partner, "trade relationship reset");
                *existing = link;
            }
            None => self.links.push(link),
        }
    }

    /// Returns `false` without touching anything when `partner` was never registered.
    pub fn set_tariff(&mut self, partner: &str, rate: f64) -> bool {
        match self.links.iter_mut().find(|link| link.partner == partner) {
            Some(link) => {
                link.tariff = rate;
                true
            }
            None => {
                warn!(entity = %self.name, partner, "tariff change for unknown partner ignored");
                false
            }
        }
    }

    /// Simulates one year.
    ///
    /// When a partner retaliates against a tariff above 0.25 the call returns
    /// right after shrinking that partner's export demand: no macro event is
    /// drawn, nothing is appended to the history and `year` stays put, even
    /// though GDP, unemployment, inflation, reserves and imports have already
    /// moved. History length and `year` therefore always advance together.
    ///
    /// Fails without mutating anything when GDP is zero or non-finite before
    /// the update, or would be exactly zero or non-finite after it.
    pub fn advance_year<R: EconomyRng + ?Sized>(&mut self, rng: &mut R) -> Result<Option<YearEvent>> {
        ensure!(
            self.gdp.is_finite() && self.gdp != 0.0,
            "{} の GDP が {} のため年次更新を計算できません",
            self.name,
            self.gdp
        );

        let outcome = self.compute_year(rng);
        if !outcome.gdp.is_finite() || outcome.gdp == 0.0 {
            warn!(entity = %self.name, gdp = outcome.gdp, "degenerate GDP, year aborted");
            bail!(
                "{} の GDP が {} に達するため年次更新を中断しました",
                self.name,
                outcome.gdp
            );
        }
        self.commit(&outcome);
        debug!(
            entity = %self.name,
            year = self.year,
            gdp = self.gdp,
            unemployment = self.unemployment,
            inflation = self.inflation,
            trade_balance = outcome.trade_balance,
            "annual indicators updated"
        );

        if let Some(partner) = self.check_retaliation(rng) {
            info!(entity = %self.name, partner = %partner, "partner retaliated, year not closed");
            return Ok(Some(YearEvent::Retaliation { partner }));
        }

        let event = roll_event(rng).map(|event| {
            let effect = event.effect(self.gdp, rng);
            self.gdp += effect.gdp;
            self.unemployment += effect.unemployment;
            self.inflation += effect.inflation;
            info!(entity = %self.name, event = ?event, gdp_delta = effect.gdp, "macro event");
            YearEvent::Shock(event)
        });

        self.history.record(
            self.gdp,
            self.unemployment,
            self.inflation,
            outcome.trade_balance,
        );
        self.year += 1;
        Ok(event)
    }

    fn compute_year<R: EconomyRng + ?Sized>(&self, rng: &mut R) -> YearOutcome {
        let base_growth = rng.draw_uniform(BASE_GROWTH_PCT_RANGE.0, BASE_GROWTH_PCT_RANGE.1);
        let mut gdp_change = self.gdp * base_growth / 100.0;

        let mut trade_balance = 0.0;
        for link in &self.links {
            let export_value = link.export_value();
            gdp_change += export_value * EXPORT_GDP_WEIGHT;
            gdp_change += link.tariff_revenue() * TARIFF_REVENUE_GDP_WEIGHT;
            trade_balance += export_value - link.imports;
        }

        let foreign_reserves = self.foreign_reserves + trade_balance;

        if trade_balance > 0.0 {
            gdp_change += trade_balance * SURPLUS_GDP_WEIGHT;
        } else {
            gdp_change -= trade_balance.abs() * DEFICIT_GDP_WEIGHT;
        }

        let inflation = self.inflation + self.average_tariff() * TARIFF_INFLATION_WEIGHT
            - INFLATION_BASELINE_DRIFT;

        let unemployment_change = if gdp_change > 0.0 {
            -(gdp_change / self.gdp * GROWTH_UNEMPLOYMENT_WEIGHT).min(UNEMPLOYMENT_STEP)
        } else {
            (gdp_change.abs() / self.gdp * CONTRACTION_UNEMPLOYMENT_WEIGHT).max(UNEMPLOYMENT_STEP)
        };

        YearOutcome {
            gdp: self.gdp + gdp_change,
            gdp_change,
            unemployment: self.unemployment + unemployment_change,
            inflation,
            foreign_reserves,
            trade_balance,
        }
    }

    fn commit(&mut self, outcome: &YearOutcome) {
        self.gdp = outcome.gdp;
        self.unemployment = outcome.unemployment;
        self.inflation = outcome.inflation;
        self.foreign_reserves = outcome.foreign_reserves;

        let growth_factor = 1.0 + outcome.gdp_change / self.gdp * IMPORT_GROWTH_ELASTICITY;
        let inflation_factor = 1.0 + self.inflation / 100.0 * IMPORT_INFLATION_DAMPING;
        for link in &mut self.links {
            link.imports *= growth_factor;
            link.imports /= inflation_factor;
        }
    }

    fn check_retaliation<R: EconomyRng + ?Sized>(&mut self, rng: &mut R) -> Option<String> {
        for link in &mut self.links {
            let Some(chance) = link.retaliation_chance() else {
                continue;
            };
            if rng.draw_unit() < chance {
                link.export_demand *= RETALIATION_DEMAND_FACTOR;
                return Some(link.partner.clone());
            }
        }
        None
    }

    pub fn economic_summary(&self) -> EconomicSummary {
        let partners: Vec<PartnerSummary> = self
            .links
            .iter()
            .map(|link| PartnerSummary {
                partner: link.partner.clone(),
                tariff: link.tariff,
                exports: link.export_demand * EXPORT_VALUE_RATIO,
                imports: link.imports,
                balance: link.export_demand * EXPORT_VALUE_RATIO - link.imports,
            })
            .collect();
        let total_exports = partners.iter().map(|row| row.exports).sum::<f64>();
        let total_imports = partners.iter().map(|row| row.imports).sum::<f64>();
        EconomicSummary {
            name: self.name.clone(),
            year: self.year,
            gdp: self.gdp,
            unemployment: self.unemployment,
            inflation: self.inflation,
            foreign_reserves: self.foreign_reserves,
            total_exports,
            total_imports,
            trade_balance: total_exports - total_imports,
            partners,
        }
    }

    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            name: self.name.clone(),
            gdp: self.gdp,
            unemployment: self.unemployment,
            inflation: self.inflation,
            reserves: self.foreign_reserves,
            year: self.year,
            trade_partners: self
                .links
                .iter()
                .map(|link| (link.partner.clone(), link.tariff))
                .collect(),
            export_demand: self
                .links
                .iter()
                .map(|link| (link.partner.clone(), link.export_demand))
                .collect(),
            imports: self
                .links
                .iter()
                .map(|link| (link.partner.clone(), link.imports))
                .collect(),
            history: self.history.clone(),
        }
    }

    #[cfg(test)]
    pub(crate) fn link_mut(&mut self, partner: &str) -> Option<&mut TradeLink> {
        self.links.iter_mut().find(|link| link.partner == partner)
    }
}
