//! Design mutation API.
//!
//! Every operation is atomic: the referenced catalog part and instance
//! are resolved before anything changes, so a failed mutation leaves the
//! design exactly as it was. Each applied mutation is recorded on the
//! history manager (clearing the redo stack) and is followed by a full
//! recomputation of derived metadata, validation, and pricing.

use super::DesignSession;
use crate::commands::*;
use crate::design::{InstanceId, PlacedInstance};
use playkit_core::{DesignError, Position, Result, Rotation};

impl DesignSession {
    /// Place a catalog part in the design.
    ///
    /// Fails with a catalog miss if the id is unknown or unpublished;
    /// the design is left unchanged in that case.
    pub fn add_part(
        &mut self,
        part_id: &str,
        position: Position,
        rotation: Rotation,
    ) -> Result<InstanceId> {
        self.catalog().get(part_id)?;

        let id = self.design_mut().generate_id();
        let instance = PlacedInstance::new(id, part_id, position, rotation);
        self.push_command(DesignCommand::AddPart(AddPart {
            id,
            instance: Some(instance),
        }));
        tracing::debug!(instance_id = id, part_id, "Added part");
        Ok(id)
    }

    /// Move a placed instance to a new position.
    pub fn move_part(&mut self, instance_id: InstanceId, new_position: Position) -> Result<()> {
        let from = self.require_instance(instance_id)?.position;
        self.push_command(DesignCommand::MovePart(MovePart {
            id: instance_id,
            from,
            to: new_position,
        }));
        Ok(())
    }

    /// Rotate a placed instance.
    pub fn rotate_part(&mut self, instance_id: InstanceId, new_rotation: Rotation) -> Result<()> {
        let from = self.require_instance(instance_id)?.rotation;
        self.push_command(DesignCommand::RotatePart(RotatePart {
            id: instance_id,
            from,
            to: new_rotation.normalized(),
        }));
        Ok(())
    }

    /// Remove a placed instance.
    pub fn remove_part(&mut self, instance_id: InstanceId) -> Result<()> {
        self.require_instance(instance_id)?;
        self.push_command(DesignCommand::RemovePart(RemovePart {
            id: instance_id,
            index: 0,
            instance: None,
        }));
        tracing::debug!(instance_id, "Removed part");
        Ok(())
    }

    /// Set a user customization override on an instance. An empty value
    /// clears the key.
    pub fn set_customization(
        &mut self,
        instance_id: InstanceId,
        key: &str,
        value: &str,
    ) -> Result<()> {
        let instance = self.require_instance(instance_id)?;
        let old = instance.customizations.get(key).cloned();
        let new = if value.is_empty() {
            None
        } else {
            Some(value.to_string())
        };
        self.push_command(DesignCommand::SetCustomization(SetCustomization {
            id: instance_id,
            key: key.to_string(),
            old,
            new,
        }));
        Ok(())
    }

    /// Remove every instance as a single undoable step.
    pub fn clear(&mut self) {
        let ids: Vec<InstanceId> = self.design().instances().iter().map(|i| i.id).collect();
        if ids.is_empty() {
            return;
        }
        let commands = ids
            .into_iter()
            .map(|id| {
                DesignCommand::RemovePart(RemovePart {
                    id,
                    index: 0,
                    instance: None,
                })
            })
            .collect();
        self.push_command(DesignCommand::Composite(Composite {
            name: "Clear Design".to_string(),
            commands,
        }));
    }

    fn require_instance(&self, instance_id: InstanceId) -> Result<&PlacedInstance> {
        self.design()
            .instance(instance_id)
            .ok_or_else(|| DesignError::InstanceNotFound { instance_id }.into())
    }
}
