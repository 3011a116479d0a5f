use tracing::debug;

use super::RuleSet;
use crate::{candy_machine::CandyMachineState, constants::DEFAULT_GROUP, errors::GuardError};

/// The guard group a mint attempt runs under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedGroup {
    pub label: String,
    /// `None` when the candy machine has no guard configuration for the
    /// label and no default to fall back on.
    pub rules: Option<RuleSet>,
}

impl SelectedGroup {
    pub fn is_default(&self) -> bool {
        self.label == DEFAULT_GROUP
    }

    /// Group argument of the mint instruction; the default set is addressed
    /// by omitting it.
    pub fn group_arg(&self) -> Option<String> {
        if self.is_default() {
            None
        } else {
            Some(self.label.clone())
        }
    }

    pub fn require_rules(&self) -> Result<&RuleSet, GuardError> {
        self.rules
            .as_ref()
            .ok_or_else(|| GuardError::NoGuardConfigured(self.label.clone()))
    }
}

/// Resolves `label` against the candy machine's guard layer: the matching
/// override group, otherwise the default rule set.
pub fn select_group(candy_machine: &CandyMachineState, label: &str) -> SelectedGroup {
    let candy_guard = match &candy_machine.candy_guard {
        Some(candy_guard) => candy_guard,
        None => {
            debug!("No candy guard, '{}' resolves to an empty default", label);
            return SelectedGroup {
                label: DEFAULT_GROUP.to_string(),
                rules: None,
            };
        }
    };

    if label != DEFAULT_GROUP {
        if let Some(group) = candy_guard.group(label) {
            return SelectedGroup {
                label: group.label().to_string(),
                rules: Some(group.clone()),
            };
        }
        debug!("Group '{}' not found, using the default guard set", label);
    }

    SelectedGroup {
        label: DEFAULT_GROUP.to_string(),
        rules: Some(candy_guard.default.clone()),
    }
}
