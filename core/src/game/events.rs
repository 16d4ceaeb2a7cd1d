use std::fmt;
use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use super::random::{EconomyRng, WeightTable};

/// One-off macroeconomic shock drawn at the end of a regular year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MacroEvent {
    Boom,
    Recession,
    TechBreakthrough,
    NaturalDisaster,
    EnergyPriceCrash,
    EnergyPriceSpike,
}

/// Draw order of the categorical roll. `None` is the quiet-year outcome.
const EVENT_TABLE: [(Option<MacroEvent>, f64); 7] = [
    (Some(MacroEvent::Boom), 0.1),
    (Some(MacroEvent::Recession), 0.1),
    (Some(MacroEvent::TechBreakthrough), 0.15),
    (Some(MacroEvent::NaturalDisaster), 0.05),
    (Some(MacroEvent::EnergyPriceCrash), 0.1),
    (Some(MacroEvent::EnergyPriceSpike), 0.1),
    (None, 0.45),
];

static EVENT_WEIGHTS: LazyLock<WeightTable> = LazyLock::new(|| {
    WeightTable::new(&EVENT_TABLE.map(|(_, weight)| weight))
        .expect("event table weights are positive constants")
});

#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ShockEffect {
    pub(crate) gdp: f64,
    pub(crate) unemployment: f64,
    pub(crate) inflation: f64,
}

impl MacroEvent {
    pub const ALL: [MacroEvent; 6] = [
        MacroEvent::Boom,
        MacroEvent::Recession,
        MacroEvent::TechBreakthrough,
        MacroEvent::NaturalDisaster,
        MacroEvent::EnergyPriceCrash,
        MacroEvent::EnergyPriceSpike,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MacroEvent::Boom => "世界経済の好況",
            MacroEvent::Recession => "世界経済の景気後退",
            MacroEvent::TechBreakthrough => "技術革新",
            MacroEvent::NaturalDisaster => "自然災害",
            MacroEvent::EnergyPriceCrash => "エネルギー価格の暴落",
            MacroEvent::EnergyPriceSpike => "エネルギー価格の高騰",
        }
    }

    pub fn weight(self) -> f64 {
        EVENT_TABLE
            .iter()
            .find(|(event, _)| *event == Some(self))
            .map(|(_, weight)| *weight)
            .unwrap_or(0.0)
    }

    /// GDP share range of the shock; the sign comes from `gdp_sign`.
    fn gdp_share_range(self) -> (f64, f64) {
        match self {
            MacroEvent::Boom => (0.02, 0.04),
            MacroEvent::Recession => (0.01, 0.03),
            MacroEvent::TechBreakthrough => (0.015, 0.035),
            MacroEvent::NaturalDisaster => (0.01, 0.02),
            MacroEvent::EnergyPriceCrash => (0.01, 0.025),
            MacroEvent::EnergyPriceSpike => (0.01, 0.02),
        }
    }

    fn gdp_sign(self) -> f64 {
        match self {
            MacroEvent::Boom | MacroEvent::TechBreakthrough | MacroEvent::EnergyPriceCrash => 1.0,
            MacroEvent::Recession | MacroEvent::NaturalDisaster | MacroEvent::EnergyPriceSpike => {
                -1.0
            }
        }
    }

    fn fixed_deltas(self) -> (f64, f64) {
        match self {
            MacroEvent::Boom => (-0.7, -0.5),
            MacroEvent::Recession => (0.9, 0.8),
            MacroEvent::TechBreakthrough => (-0.5, -0.3),
            MacroEvent::NaturalDisaster => (0.4, 0.3),
            MacroEvent::EnergyPriceCrash => (-0.3, -1.2),
            MacroEvent::EnergyPriceSpike => (0.5, 1.5),
        }
    }

    pub(crate) fn effect<R: EconomyRng + ?Sized>(self, gdp: f64, rng: &mut R) -> ShockEffect {
        let (low, high) = self.gdp_share_range();
        let share = rng.draw_uniform(low, high);
        let (unemployment, inflation) = self.fixed_deltas();
        ShockEffect {
            gdp: self.gdp_sign() * gdp * share,
            unemployment,
            inflation,
        }
    }
}

impl fmt::Display for MacroEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

pub(crate) fn roll_event<R: EconomyRng + ?Sized>(rng: &mut R) -> Option<MacroEvent> {
    let idx = rng.draw_weighted(&EVENT_WEIGHTS);
    EVENT_TABLE.get(idx).and_then(|(event, _)| *event)
}
