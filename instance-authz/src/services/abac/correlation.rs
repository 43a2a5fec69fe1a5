//! Routing of decision results back to the instances and actions they concern.

use instance_authz_core::authorization::InstanceAction;
use instance_authz_core::claims::Principal;
use instance_authz_core::xacml::{attributes, XacmlJsonResult};
use std::collections::{BTreeSet, HashMap};
use tracing::debug;

use super::validator::DecisionValidator;

/// Accepted actions keyed by instance id.
///
/// Built from results in any order: the permitted set of an instance is the
/// union of every accepted result naming it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermittedActions {
    by_instance: HashMap<String, BTreeSet<InstanceAction>>,
}

impl PermittedActions {
    pub fn from_results(
        results: &[XacmlJsonResult],
        caller: &Principal,
        validator: &dyn DecisionValidator,
    ) -> Self {
        let mut by_instance: HashMap<String, BTreeSet<InstanceAction>> = HashMap::new();

        for result in results {
            if !validator.validate(result, caller) {
                continue;
            }
            let Some(instance_id) = result.resource_attribute(attributes::INSTANCE_ID) else {
                debug!("Accepted result without instance id, ignoring");
                continue;
            };
            let Some(action) = result
                .action_attribute(attributes::ACTION_ID)
                .and_then(InstanceAction::from_str)
            else {
                debug!(instance_id, "Accepted result without known action, ignoring");
                continue;
            };
            by_instance
                .entry(instance_id.to_string())
                .or_default()
                .insert(action);
        }

        Self { by_instance }
    }

    /// Permitted actions for an instance, `None` if nothing was permitted
    pub fn for_instance(&self, instance_id: &str) -> Option<&BTreeSet<InstanceAction>> {
        self.by_instance.get(instance_id)
    }

    pub fn is_permitted(&self, instance_id: &str, action: InstanceAction) -> bool {
        self.for_instance(instance_id)
            .is_some_and(|actions| actions.contains(&action))
    }
}

/// Accepted actions of a response about a single resource
pub fn permitted_actions(
    results: &[XacmlJsonResult],
    caller: &Principal,
    validator: &dyn DecisionValidator,
) -> BTreeSet<InstanceAction> {
    results
        .iter()
        .filter(|result| validator.validate(result, caller))
        .filter_map(|result| result.action_attribute(attributes::ACTION_ID))
        .filter_map(InstanceAction::from_str)
        .collect()
}
