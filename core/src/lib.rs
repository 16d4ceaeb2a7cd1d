mod game;

pub use game::{
    CountryDefinition, EconomicEntity, EconomicSummary, EconomyRng, EntitySnapshot, HistoryPoint,
    IndicatorHistory, MacroEvent, PartnerSummary, TradeLink, WeightTable, WorldBuilder,
    WorldDefinition, WorldState, YearEvent,
};
