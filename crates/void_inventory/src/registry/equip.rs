//! Equip and unequip on top of the move protocol

use super::ItemRegistry;
use crate::container::EquipmentContainer;
use crate::error::{InventoryError, Result};
use crate::types::{ContainerId, ContainerKind, ItemId, ItemLocation, SlotIndex};
use void_core::Tag;

impl ItemRegistry {
    /// Equip `item` into slot (`slot_type`, `index`) of an equipment
    /// container. A previous occupant is moved to the void container first
    /// and returned. If the new item is refused, the occupant is put back.
    pub fn equip_item(
        &mut self,
        equipment: ContainerId,
        item: ItemId,
        slot_type: &Tag,
        index: u32,
    ) -> Result<Option<ItemId>> {
        let (slot, occupant) = self.equipment_slot(equipment, slot_type, index)?;
        if !self.items.contains_key(&item) {
            return Err(InventoryError::ItemNotFound(item));
        }
        if occupant == Some(item) {
            return Ok(None);
        }

        let target = ItemLocation::new(equipment, slot);
        if let Some(previous) = occupant {
            self.move_item(previous, ItemLocation::void())?;
        }
        if let Err(err) = self.move_item(item, target) {
            if let Some(previous) = occupant {
                if let Err(restore) = self.move_item(previous, target) {
                    log::error!(
                        "Could not restore item {} to {} after failed equip: {}",
                        previous,
                        target,
                        restore
                    );
                }
            }
            return Err(err);
        }
        log::debug!("Equipped item {} into {} #{} of {}", item, slot_type, index, equipment);
        Ok(occupant)
    }

    /// Move the item in slot (`slot_type`, `index`) to the void container
    pub fn unequip_item(
        &mut self,
        equipment: ContainerId,
        slot_type: &Tag,
        index: u32,
    ) -> Result<ItemId> {
        let (_, occupant) = self.equipment_slot(equipment, slot_type, index)?;
        let item = occupant.ok_or_else(|| InventoryError::SlotEmpty {
            container: equipment,
            slot_type: slot_type.clone(),
            index,
        })?;
        self.move_item(item, ItemLocation::void())?;
        log::debug!("Unequipped item {} from {} #{} of {}", item, slot_type, index, equipment);
        Ok(item)
    }

    fn equipment(&self, id: ContainerId) -> Result<&EquipmentContainer> {
        if !self.is_registered(id) {
            log::error!("Equipment container {} is not registered", id);
            return Err(InventoryError::ContainerNotFound(id));
        }
        self.container_as::<EquipmentContainer>(id)
            .ok_or(InventoryError::ContainerKindMismatch {
                container: id,
                expected: ContainerKind::Equipment,
            })
    }

    /// Space slot and current occupant of an enabled equipment slot
    fn equipment_slot(
        &self,
        id: ContainerId,
        slot_type: &Tag,
        index: u32,
    ) -> Result<(SlotIndex, Option<ItemId>)> {
        let equipment = self.equipment(id)?;
        let (slot, info) =
            equipment
                .find_slot(slot_type, index)
                .ok_or_else(|| InventoryError::SlotNotFound {
                    container: id,
                    slot_type: slot_type.clone(),
                    index,
                })?;
        if !info.enabled {
            return Err(InventoryError::SlotDisabled {
                container: id,
                slot_type: slot_type.clone(),
                index,
            });
        }
        Ok((slot, info.equipped))
    }
}

#[cfg(test)]
mod tests {
    use crate::container::{slot_types, EquipmentContainer};
    use crate::error::InventoryError;
    use crate::registry::ItemRegistry;
    use crate::types::{ContainerId, ItemLocation};
    use void_core::Tag;

    #[test]
    fn test_equip_and_unequip() {
        let mut registry = ItemRegistry::new();
        let equipment = registry
            .register_container(EquipmentContainer::with_default_slots())
            .unwrap();
        let head = Tag::new(slot_types::HEAD);
        let helmet = registry.create_item("helmet", ItemLocation::void()).unwrap();

        assert_eq!(registry.equip_item(equipment, helmet, &head, 0).unwrap(), None);
        assert_eq!(registry.item_location(helmet), Some(ItemLocation::new(equipment, 0)));
        // Re-equipping the same item is a no-op
        assert_eq!(registry.equip_item(equipment, helmet, &head, 0).unwrap(), None);

        assert_eq!(registry.unequip_item(equipment, &head, 0).unwrap(), helmet);
        assert_eq!(registry.item_location(helmet), Some(ItemLocation::void()));
        assert!(matches!(
            registry.unequip_item(equipment, &head, 0),
            Err(InventoryError::SlotEmpty { .. })
        ));
    }

    #[test]
    fn test_equip_errors() {
        let mut registry = ItemRegistry::new();
        let equipment = registry
            .register_container(EquipmentContainer::with_default_slots())
            .unwrap();
        let item = registry.create_item("ring", ItemLocation::void()).unwrap();
        let wings = Tag::new("Equipment.Wings");
        let head = Tag::new(slot_types::HEAD);

        assert!(matches!(
            registry.equip_item(equipment, item, &wings, 0),
            Err(InventoryError::SlotNotFound { .. })
        ));
        assert!(matches!(
            registry.equip_item(ContainerId::VOID, item, &head, 0),
            Err(InventoryError::ContainerKindMismatch { .. })
        ));
        assert!(matches!(
            registry.equip_item(ContainerId(77), item, &head, 0),
            Err(InventoryError::ContainerNotFound(_))
        ));

        registry
            .container_as_mut::<EquipmentContainer>(equipment)
            .unwrap()
            .set_slot_enabled(&head, 0, false);
        assert!(matches!(
            registry.equip_item(equipment, item, &head, 0),
            Err(InventoryError::SlotDisabled { .. })
        ));
        assert_eq!(registry.item_location(item), Some(ItemLocation::void()));
    }

    #[test]
    fn test_refused_equip_restores_previous_item() {
        let mut registry = ItemRegistry::new();
        let mut gear = EquipmentContainer::with_default_slots();
        let head = Tag::new(slot_types::HEAD);
        gear.restrict_slot(&head, 0, ["leather_cap", "iron_helm"]);
        let equipment = registry.register_container(gear).unwrap();

        let cap = registry.create_item("leather_cap", ItemLocation::void()).unwrap();
        let sword = registry.create_item("sword", ItemLocation::void()).unwrap();
        registry.equip_item(equipment, cap, &head, 0).unwrap();

        let err = registry.equip_item(equipment, sword, &head, 0).unwrap_err();
        assert!(matches!(err, InventoryError::AdmissionDenied { .. }));
        assert_eq!(registry.item_location(cap), Some(ItemLocation::new(equipment, 0)));
        assert_eq!(registry.item_location(sword), Some(ItemLocation::void()));
        let gear = registry.container_as::<EquipmentContainer>(equipment).unwrap();
        assert_eq!(gear.equipped_item(&head, 0), Some(cap));
    }
}
