mod bootstrap;
mod constants;
pub(crate) use constants::*;
mod country;
mod entity;
mod events;
mod history;
mod random;
mod snapshot;
mod state;

pub use bootstrap::WorldBuilder;
pub use country::{CountryDefinition, WorldDefinition};
pub use entity::{EconomicEntity, TradeLink, YearEvent};
pub use events::MacroEvent;
pub use history::{HistoryPoint, IndicatorHistory};
pub use random::{EconomyRng, WeightTable};
pub use snapshot::{EconomicSummary, EntitySnapshot, PartnerSummary};
pub use state::WorldState;
