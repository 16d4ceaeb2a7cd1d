use anyhow::Result;
#[cfg(test)]
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::{
    bootstrap::WorldBuilder,
    country::WorldDefinition,
    entity::{EconomicEntity, YearEvent},
    snapshot::{EconomicSummary, EntitySnapshot},
};

/// The player economy and its fixed set of partners.
///
/// Only the player is simulated. Partners keep the indicators and the
/// relationship toward the player they were created with.
pub struct WorldState {
    rng: StdRng,
    player: EconomicEntity,
    partners: Vec<EconomicEntity>,
}

impl WorldState {
    pub fn from_definition(definition: WorldDefinition) -> Result<Self> {
        WorldBuilder::new(definition).build()
    }

    pub fn from_definition_with_rng(definition: WorldDefinition, rng: StdRng) -> Result<Self> {
        WorldBuilder::new(definition).with_rng(rng).build()
    }

    #[cfg(test)]
    pub fn from_definition_with_seed(definition: WorldDefinition, seed: u64) -> Result<Self> {
        WorldBuilder::new(definition)
            .with_rng(StdRng::seed_from_u64(seed))
            .build()
    }

    pub(crate) fn new(player: EconomicEntity, partners: Vec<EconomicEntity>, rng: StdRng) -> Self {
        Self {
            rng,
            player,
            partners,
        }
    }

    pub fn player(&self) -> &EconomicEntity {
        &self.player
    }

    pub fn partners(&self) -> &[EconomicEntity] {
        &self.partners
    }

    pub fn year(&self) -> u32 {
        self.player.year()
    }

    pub fn find_partner(&self, name: &str) -> Option<&EconomicEntity> {
        self.partners.iter().find(|partner| partner.name() == name)
    }

    /// Resolves a 1-based partner number or a case-insensitive partner name.
    pub fn find_partner_index(&self, name_or_index: &str) -> Option<usize> {
        if let Ok(id) = name_or_index.parse::<usize>() {
            if id > 0 && id <= self.partners.len() {
                return Some(id - 1);
            }
        }

        let name_lower = name_or_index.to_lowercase();
        self.partners
            .iter()
            .position(|partner| partner.name().to_lowercase() == name_lower)
    }

    pub fn entity(&self, name: &str) -> Option<&EconomicEntity> {
        if self.player.name() == name {
            return Some(&self.player);
        }
        self.find_partner(name)
    }

    pub fn snapshot_of(&self, name: &str) -> Option<EntitySnapshot> {
        self.entity(name).map(EconomicEntity::snapshot)
    }

    pub fn player_snapshot(&self) -> EntitySnapshot {
        self.player.snapshot()
    }

    pub fn player_summary(&self) -> EconomicSummary {
        self.player.economic_summary()
    }

    pub fn set_tariff(&mut self, partner: &str, rate: f64) -> bool {
        self.player.set_tariff(partner, rate)
    }

    pub fn advance_year(&mut self) -> Result<Option<YearEvent>> {
        self.player.advance_year(&mut self.rng)
    }

    #[cfg(test)]
    pub fn player_mut(&mut self) -> &mut EconomicEntity {
        &mut self.player
    }
}
