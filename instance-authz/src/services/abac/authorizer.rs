use instance_authz_core::authorization::InstanceAction;
use instance_authz_core::claims::Principal;
use instance_authz_core::instances::{Instance, MessageBoxInstance};
use instance_authz_core::xacml::{XacmlJsonRequestRoot, XacmlJsonResponse};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use super::correlation::{permitted_actions, PermittedActions};
use super::request::{single_decision_request, MultiDecisionRequest};
use super::validator::DecisionValidator;
use crate::pdp::PolicyDecisionPoint;
use crate::services::error::AuthorizationError;
use crate::services::required_scope::contains_required_scope;

const MESSAGE_BOX_ACTIONS: [InstanceAction; 3] = [
    InstanceAction::Read,
    InstanceAction::Write,
    InstanceAction::Delete,
];

/// Fine-grained instance authorization delegated to the policy decision point
#[derive(Clone)]
pub struct InstanceAuthorizer {
    pdp: Arc<dyn PolicyDecisionPoint>,
    validator: Arc<dyn DecisionValidator>,
}

impl InstanceAuthorizer {
    pub fn new(pdp: Arc<dyn PolicyDecisionPoint>, validator: Arc<dyn DecisionValidator>) -> Self {
        Self { pdp, validator }
    }

    /// Instances the caller may read at all, as summaries flagged with write
    /// and delete permissions. Output follows input order, one entry per instance id.
    #[instrument(skip_all, fields(instances = instances.len()))]
    pub async fn authorize_message_box_instances(
        &self,
        caller: &Principal,
        instances: &[Instance],
    ) -> Result<Vec<MessageBoxInstance>, AuthorizationError> {
        let permitted = self
            .authorize_batch(caller, &MESSAGE_BOX_ACTIONS, instances)
            .await?;

        let mut seen = HashSet::new();
        let summaries: Vec<MessageBoxInstance> = instances
            .iter()
            .filter_map(|instance| {
                let id = instance.id.as_deref()?;
                let actions = permitted.for_instance(id)?;
                if !seen.insert(id) {
                    return None;
                }
                let mut summary = MessageBoxInstance::from(instance);
                summary.authorized_for_write = actions.contains(&InstanceAction::Write);
                summary.allow_delete = actions.contains(&InstanceAction::Delete);
                Some(summary)
            })
            .collect();

        debug!("{} of {} instances authorized", summaries.len(), instances.len());
        Ok(summaries)
    }

    /// The subset of `instances` the caller may read
    #[instrument(skip_all, fields(instances = instances.len()))]
    pub async fn authorize_instances(
        &self,
        caller: &Principal,
        instances: &[Instance],
    ) -> Result<Vec<Instance>, AuthorizationError> {
        let permitted = self
            .authorize_batch(caller, &[InstanceAction::Read], instances)
            .await?;

        let mut seen = HashSet::new();
        let authorized: Vec<Instance> = instances
            .iter()
            .filter(|instance| {
                instance.id.as_deref().is_some_and(|id| {
                    permitted.is_permitted(id, InstanceAction::Read) && seen.insert(id)
                })
            })
            .cloned()
            .collect();

        debug!("{} of {} instances readable", authorized.len(), instances.len());
        Ok(authorized)
    }

    /// Single decision for one action on one instance, optionally for a specific task.
    /// A missing or unreadable decision is a deny.
    #[instrument(skip(self, caller, instance), fields(instance_id = ?instance.id))]
    pub async fn authorize_instance_action(
        &self,
        caller: &Principal,
        instance: &Instance,
        action: InstanceAction,
        task: Option<&str>,
    ) -> Result<bool, AuthorizationError> {
        let request = single_decision_request(caller, instance, action, task)?;
        let response = self.decide(&request).await?;

        let permitted = response
            .results()
            .first()
            .is_some_and(|result| self.validator.validate(result, caller));
        debug!(permitted, "Instance action decision");
        Ok(permitted)
    }

    /// The subset of `actions` the caller may perform on `instance`, in one round trip
    #[instrument(skip(self, caller, instance), fields(instance_id = ?instance.id))]
    pub async fn authorize_any_of_instance_actions(
        &self,
        caller: &Principal,
        instance: &Instance,
        actions: &[InstanceAction],
    ) -> Result<Vec<InstanceAction>, AuthorizationError> {
        let request =
            MultiDecisionRequest::new(caller, actions, std::slice::from_ref(instance), None)?;
        if request.is_empty() {
            return Ok(vec![]);
        }

        let response = self.decide(&request.into_xacml()).await?;
        let permitted = permitted_actions(response.results(), caller, self.validator.as_ref());

        // Requested order
        let mut result: Vec<InstanceAction> = Vec::with_capacity(permitted.len());
        for action in actions {
            if permitted.contains(action) && !result.contains(action) {
                result.push(*action);
            }
        }
        Ok(result)
    }

    /// See [`contains_required_scope`]
    pub fn contains_required_scope(&self, caller: &Principal, allowed_scopes: &[&str]) -> bool {
        contains_required_scope(caller, allowed_scopes)
    }

    async fn authorize_batch(
        &self,
        caller: &Principal,
        actions: &[InstanceAction],
        instances: &[Instance],
    ) -> Result<PermittedActions, AuthorizationError> {
        let request = MultiDecisionRequest::new(caller, actions, instances, None)?;
        if request.is_empty() {
            return Ok(PermittedActions::default());
        }

        debug!(
            decisions = request.references().len(),
            "Sending multi decision request"
        );
        let response = self.decide(&request.into_xacml()).await?;
        Ok(PermittedActions::from_results(
            response.results(),
            caller,
            self.validator.as_ref(),
        ))
    }

    /// Malformed responses carry no decision and are answered as empty
    async fn decide(
        &self,
        request: &XacmlJsonRequestRoot,
    ) -> Result<XacmlJsonResponse, AuthorizationError> {
        match self.pdp.get_decision(request).await {
            Ok(response) => Ok(response),
            Err(err) if err.is_malformed_response() => {
                warn!("Treating malformed decision response as deny: {}", err);
                Ok(XacmlJsonResponse::default())
            }
            Err(err) => Err(err.into()),
        }
    }
}
