//! Loot generation and looting

use super::ItemRegistry;
use crate::container::{Container, LootContainer};
use crate::error::{InventoryError, Result};
use crate::space::SpaceType;
use crate::types::{ContainerId, ContainerKind, ItemId, ItemLocation};
use rand::Rng;

/// Outcome of [`ItemRegistry::take_all_loot`]
#[derive(Debug, Default)]
pub struct TakeAllReport {
    /// Items now at the target
    pub moved: Vec<ItemId>,
    /// Items left in the loot container and why
    pub failed: Vec<(ItemId, InventoryError)>,
}

impl TakeAllReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

impl ItemRegistry {
    /// Roll a loot container's table and create the dropped items inside
    /// it. Does nothing if the table was already rolled, unless `force`,
    /// in which case existing loot is cleared first.
    pub fn generate_loot<R: Rng>(
        &mut self,
        loot: ContainerId,
        rng: &mut R,
        force: bool,
    ) -> Result<Vec<ItemId>> {
        let container = self.loot(loot)?;
        if container.is_generated() && !force {
            return Ok(Vec::new());
        }
        let table = container.loot_table().to_vec();
        if force {
            self.clear_loot(loot)?;
        }

        let mut created = Vec::new();
        for entry in &table {
            if !rng.gen_bool(entry.probability()) {
                continue;
            }
            let low = entry.min_count.min(entry.max_count);
            let high = entry.min_count.max(entry.max_count);
            let count = rng.gen_range(low..=high);
            for _ in 0..count {
                created.push(self.create_item(entry.config.clone(), ItemLocation::anywhere(loot))?);
            }
        }

        if let Some(container) = self.container_as_mut::<LootContainer>(loot) {
            container.set_generated(true);
        }
        log::debug!("Generated {} loot items in {}", created.len(), loot);
        Ok(created)
    }

    /// Move one item out of a loot container
    pub fn take_loot_item(
        &mut self,
        loot: ContainerId,
        item: ItemId,
        target: ItemLocation,
    ) -> Result<()> {
        if !self.loot(loot)?.contains_item(item) {
            return Err(InventoryError::ItemNotFound(item));
        }
        self.move_to(item, target)
    }

    /// Move every item out of a loot container. Items the target refuses
    /// stay behind and are reported.
    pub fn take_all_loot(&mut self, loot: ContainerId, target: ItemLocation) -> Result<TakeAllReport> {
        let items = self.loot(loot)?.all_items();
        let mut report = TakeAllReport::default();
        for item in items {
            match self.move_to(item, target) {
                Ok(()) => report.moved.push(item),
                Err(err) => report.failed.push((item, err)),
            }
        }
        if !report.is_complete() {
            log::warn!(
                "Took {} of {} loot items from {}",
                report.moved.len(),
                report.moved.len() + report.failed.len(),
                loot
            );
        }
        Ok(report)
    }

    /// Send all items in a loot container to the void and allow the table
    /// to be rolled again. Returns how many items were removed.
    pub fn clear_loot(&mut self, loot: ContainerId) -> Result<usize> {
        let items = self.loot(loot)?.all_items();
        for item in &items {
            self.move_item(*item, ItemLocation::void())?;
        }
        if let Some(container) = self.container_as_mut::<LootContainer>(loot) {
            container.set_generated(false);
        }
        Ok(items.len())
    }

    fn loot(&self, id: ContainerId) -> Result<&LootContainer> {
        if !self.is_registered(id) {
            log::error!("Loot container {} is not registered", id);
            return Err(InventoryError::ContainerNotFound(id));
        }
        self.container_as::<LootContainer>(id)
            .ok_or(InventoryError::ContainerKindMismatch {
                container: id,
                expected: ContainerKind::Loot,
            })
    }

    /// `ANY` targets on slotted spaces go to the recommended slot
    fn move_to(&mut self, item: ItemId, target: ItemLocation) -> Result<()> {
        let slotted = self
            .container(target.container)
            .is_some_and(|container| container.space().space_type() != SpaceType::Unordered);
        if target.slot.is_any() && slotted {
            self.move_item_anywhere(item, target.container).map(|_| ())
        } else {
            self.move_item(item, target)
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::config::LootEntry;
    use crate::container::{BagContainer, LootContainer};
    use crate::registry::ItemRegistry;
    use crate::types::{ContainerId, ItemLocation};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn loot_registry(table: Vec<LootEntry>) -> (ItemRegistry, ContainerId) {
        let mut registry = ItemRegistry::new();
        let loot = registry.register_container(LootContainer::with_table(table)).unwrap();
        (registry, loot)
    }

    #[test]
    fn test_generate_once_unless_forced() {
        let (mut registry, loot) = loot_registry(vec![LootEntry::new("coin").with_count(3, 3)]);
        let mut rng = StdRng::seed_from_u64(1);

        let first = registry.generate_loot(loot, &mut rng, false).unwrap();
        assert_eq!(first.len(), 3);
        assert!(registry.generate_loot(loot, &mut rng, false).unwrap().is_empty());

        let second = registry.generate_loot(loot, &mut rng, true).unwrap();
        assert_eq!(second.len(), 3);
        assert_eq!(registry.items_in_container(loot), second);
        for item in first {
            assert_eq!(registry.item_location(item), Some(ItemLocation::void()));
        }
    }

    #[test]
    fn test_zero_chance_never_drops() {
        let (mut registry, loot) = loot_registry(vec![LootEntry::new("relic").with_chance(0.0)]);
        let mut rng = StdRng::seed_from_u64(99);
        assert!(registry.generate_loot(loot, &mut rng, false).unwrap().is_empty());
        assert!(registry.container_as::<LootContainer>(loot).unwrap().is_generated());
    }

    #[test]
    fn test_counts_stay_in_range() {
        let (mut registry, loot) = loot_registry(vec![LootEntry::new("arrow").with_count(2, 5)]);
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let created = registry.generate_loot(loot, &mut rng, true).unwrap();
            assert!((2..=5).contains(&created.len()));
        }
    }

    #[test]
    fn test_take_all_reports_leftovers() {
        let (mut registry, loot) = loot_registry(vec![LootEntry::new("gem").with_count(3, 3)]);
        let bag = registry.register_container(BagContainer::grid(2, 1)).unwrap();
        registry
            .generate_loot(loot, &mut StdRng::seed_from_u64(3), false)
            .unwrap();

        let report = registry.take_all_loot(loot, ItemLocation::anywhere(bag)).unwrap();
        assert_eq!(report.moved.len(), 2);
        assert_eq!(report.failed.len(), 1);
        assert_eq!(registry.items_in_container(bag).len(), 2);
        assert_eq!(registry.items_in_container(loot), vec![report.failed[0].0]);
    }

    #[test]
    fn test_take_single_item() {
        let (mut registry, loot) = loot_registry(vec![LootEntry::new("gem")]);
        let bag = registry.register_container(BagContainer::grid(2, 1)).unwrap();
        let created = registry
            .generate_loot(loot, &mut StdRng::seed_from_u64(3), false)
            .unwrap();

        registry
            .take_loot_item(loot, created[0], ItemLocation::new(bag, 1))
            .unwrap();
        assert_eq!(registry.item_location(created[0]), Some(ItemLocation::new(bag, 1)));
        assert!(registry
            .take_loot_item(loot, created[0], ItemLocation::new(bag, 0))
            .is_err());
    }

    #[test]
    fn test_items_cannot_be_dropped_into_loot() {
        let (mut registry, loot) = loot_registry(Vec::new());
        let item = registry.create_item("coin", ItemLocation::void()).unwrap();
        assert!(registry.move_item(item, ItemLocation::anywhere(loot)).is_err());
    }

    #[test]
    fn test_nan_chance_from_config_never_drops() {
        let config = crate::config::InventoryConfig::from_toml_str(
            r#"
            [[loot_tables.chest]]
            config = "cursed_idol"
            drop_chance = nan

            [[loot_tables.chest]]
            config = "gold_coin"
            "#,
        )
        .unwrap();
        let (mut registry, loot) = loot_registry(config.loot_table("chest").unwrap().to_vec());

        let created = registry
            .generate_loot(loot, &mut StdRng::seed_from_u64(11), false)
            .unwrap();
        assert_eq!(created.len(), 1);
        assert_eq!(registry.item(created[0]).unwrap().config.as_str(), "gold_coin");
    }
}
