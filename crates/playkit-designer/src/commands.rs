//! Invertible design mutations.
//!
//! Every mutation of the design model is expressed as a command that can
//! be applied and reverted, so the history manager can replay either
//! direction. Commands that remove an instance stash it (with its list
//! index) while it is off the design, mirroring ownership back and forth.

use crate::design::{Design, InstanceId, PlacedInstance};
use playkit_core::{Position, Rotation};

#[derive(Debug, Clone)]
pub enum DesignCommand {
    AddPart(AddPart),
    RemovePart(RemovePart),
    MovePart(MovePart),
    RotatePart(RotatePart),
    SetCustomization(SetCustomization),
    Composite(Composite),
}

#[derive(Debug, Clone)]
pub struct AddPart {
    pub id: InstanceId,
    /// Some while off the design (before apply / after undo).
    pub instance: Option<PlacedInstance>,
}

#[derive(Debug, Clone)]
pub struct RemovePart {
    pub id: InstanceId,
    /// List index the instance occupied, so undo restores ordering.
    pub index: usize,
    /// Some while removed from the design.
    pub instance: Option<PlacedInstance>,
}

#[derive(Debug, Clone)]
pub struct MovePart {
    pub id: InstanceId,
    pub from: Position,
    pub to: Position,
}

#[derive(Debug, Clone)]
pub struct RotatePart {
    pub id: InstanceId,
    pub from: Rotation,
    pub to: Rotation,
}

#[derive(Debug, Clone)]
pub struct SetCustomization {
    pub id: InstanceId,
    pub key: String,
    pub old: Option<String>,
    pub new: Option<String>,
}

/// Ordered child commands applied in order and reverted in reverse.
#[derive(Debug, Clone)]
pub struct Composite {
    pub name: String,
    pub commands: Vec<DesignCommand>,
}

fn set_customization(design: &mut Design, id: InstanceId, key: &str, value: &Option<String>) {
    if let Some(instance) = design.instance_mut(id) {
        match value {
            Some(v) => {
                instance.customizations.insert(key.to_string(), v.clone());
            }
            None => {
                instance.customizations.remove(key);
            }
        }
    }
}

impl DesignCommand {
    /// Human name for history display.
    pub fn name(&self) -> &str {
        match self {
            DesignCommand::AddPart(_) => "Add Part",
            DesignCommand::RemovePart(_) => "Remove Part",
            DesignCommand::MovePart(_) => "Move Part",
            DesignCommand::RotatePart(_) => "Rotate Part",
            DesignCommand::SetCustomization(_) => "Customize Part",
            DesignCommand::Composite(cmd) => &cmd.name,
        }
    }

    /// Apply the forward mutation.
    pub fn apply(&mut self, design: &mut Design) {
        match self {
            DesignCommand::AddPart(cmd) => {
                if let Some(instance) = cmd.instance.take() {
                    design.push_instance(instance);
                }
            }
            DesignCommand::RemovePart(cmd) => {
                if let Some((index, instance)) = design.remove_instance(cmd.id) {
                    cmd.index = index;
                    cmd.instance = Some(instance);
                }
            }
            DesignCommand::MovePart(cmd) => {
                if let Some(instance) = design.instance_mut(cmd.id) {
                    instance.position = cmd.to;
                }
            }
            DesignCommand::RotatePart(cmd) => {
                if let Some(instance) = design.instance_mut(cmd.id) {
                    instance.rotation = cmd.to;
                }
            }
            DesignCommand::SetCustomization(cmd) => {
                set_customization(design, cmd.id, &cmd.key, &cmd.new);
            }
            DesignCommand::Composite(cmd) => {
                for child in &mut cmd.commands {
                    child.apply(design);
                }
            }
        }
    }

    /// Revert the mutation.
    pub fn revert(&mut self, design: &mut Design) {
        match self {
            DesignCommand::AddPart(cmd) => {
                if let Some((_, instance)) = design.remove_instance(cmd.id) {
                    cmd.instance = Some(instance);
                }
            }
            DesignCommand::RemovePart(cmd) => {
                if let Some(instance) = cmd.instance.take() {
                    design.insert_instance(cmd.index, instance);
                }
            }
            DesignCommand::MovePart(cmd) => {
                if let Some(instance) = design.instance_mut(cmd.id) {
                    instance.position = cmd.from;
                }
            }
            DesignCommand::RotatePart(cmd) => {
                if let Some(instance) = design.instance_mut(cmd.id) {
                    instance.rotation = cmd.from;
                }
            }
            DesignCommand::SetCustomization(cmd) => {
                set_customization(design, cmd.id, &cmd.key, &cmd.old);
            }
            DesignCommand::Composite(cmd) => {
                for child in cmd.commands.iter_mut().rev() {
                    child.revert(design);
                }
            }
        }
    }
}
