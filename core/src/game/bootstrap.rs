use anyhow::Result;
use rand::{SeedableRng, rngs::StdRng};
use tracing::debug;

use super::{
    country::{CountryDefinition, WorldDefinition},
    entity::EconomicEntity,
    state::WorldState,
};

pub struct WorldBuilder {
    definition: WorldDefinition,
    rng: StdRng,
}

impl WorldBuilder {
    pub fn new(definition: WorldDefinition) -> Self {
        Self {
            definition,
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn with_seed(self, seed: u64) -> Self {
        self.with_rng(StdRng::seed_from_u64(seed))
    }

    pub fn build(self) -> Result<WorldState> {
        self.definition.validate()?;
        let WorldBuilder {
            definition,
            mut rng,
        } = self;

        let mut player = initialise_entity(&definition.player);
        let mut partners: Vec<EconomicEntity> =
            definition.partners.iter().map(initialise_entity).collect();
        wire_trade_relations(&definition, &mut player, &mut partners, &mut rng);

        debug!(
            player = %player.name(),
            partners = partners.len(),
            "world initialised"
        );
        Ok(WorldState::new(player, partners, rng))
    }
}

fn initialise_entity(definition: &CountryDefinition) -> EconomicEntity {
    EconomicEntity::new(
        definition.name.clone(),
        definition.gdp,
        definition.unemployment,
        definition.inflation,
    )
}

/// Player and partner each register the other with independent draws.
fn wire_trade_relations(
    definition: &WorldDefinition,
    player: &mut EconomicEntity,
    partners: &mut [EconomicEntity],
    rng: &mut StdRng,
) {
    for (partner, partner_definition) in partners.iter_mut().zip(&definition.partners) {
        player.add_trade_partner(partner.name(), definition.player.tariff, rng);
        partner.add_trade_partner(player.name(), partner_definition.tariff, rng);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_rejects_invalid_definitions() {
        let mut definition = WorldDefinition::default();
        definition.partners[1].name = definition.player.name.clone();
        assert!(WorldBuilder::new(definition).with_seed(1).build().is_err());
    }

    #[test]
    fn relationships_are_registered_both_ways() {
        let world = WorldBuilder::new(WorldDefinition::default())
            .with_seed(5)
            .build()
            .unwrap();
        let player = world.player();
        assert_eq!(player.trade_links().len(), world.partners().len());
        for (link, partner) in player.trade_links().iter().zip(world.partners()) {
            assert_eq!(link.partner, partner.name());
            assert_eq!(partner.trade_links().len(), 1);
            assert_eq!(partner.trade_links()[0].partner, player.name());
        }
    }

    #[test]
    fn mirrored_relationships_draw_independently() {
        let world = WorldBuilder::new(WorldDefinition::default())
            .with_seed(6)
            .build()
            .unwrap();
        let player = world.player();
        let any_differs = world.partners().iter().any(|partner| {
            let outward = player.trade_link(partner.name()).unwrap();
            let inward = &partner.trade_links()[0];
            outward.export_demand != inward.export_demand || outward.imports != inward.imports
        });
        assert!(any_differs);
    }

    #[test]
    fn configured_tariffs_apply_per_side() {
        let mut definition = WorldDefinition::default();
        definition.player.tariff = Some(0.2);
        definition.partners[0].tariff = Some(0.05);
        let world = WorldBuilder::new(definition).with_seed(7).build().unwrap();
        let first = &world.partners()[0];
        assert_eq!(world.player().tariff_toward(first.name()), Some(0.2));
        assert_eq!(first.tariff_toward(world.player().name()), Some(0.05));
        let second = &world.partners()[1];
        assert_eq!(second.tariff_toward(world.player().name()), Some(0.1));
    }
}
