//! Construction of XACML decision requests for instances.
//!
//! A batched request is modelled as three ordered category lists plus an
//! explicit list of index triples. Every triple becomes one request
//! reference, so the reference list is exactly the set of decisions the
//! decision point is asked to make.

use instance_authz_core::authorization::InstanceAction;
use instance_authz_core::claims::{ClaimName, Principal};
use instance_authz_core::instances::Instance;
use instance_authz_core::xacml::{
    attributes, XacmlJsonAttribute, XacmlJsonCategory, XacmlJsonMultiRequests, XacmlJsonRequest,
    XacmlJsonRequestReference, XacmlJsonRequestRoot, INTEGER_DATA_TYPE,
};

use crate::services::error::AuthorizationError;

const SUBJECT_PREFIX: &str = "s";
const ACTION_PREFIX: &str = "a";
const RESOURCE_PREFIX: &str = "r";

/// Indexes of one subject, action and resource forming a single decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DecisionReference {
    pub subject: usize,
    pub action: usize,
    pub resource: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MultiDecisionRequest {
    subjects: Vec<XacmlJsonCategory>,
    actions: Vec<XacmlJsonCategory>,
    resources: Vec<XacmlJsonCategory>,
    references: Vec<DecisionReference>,
}

impl MultiDecisionRequest {
    /// One subject for `caller`, one action per distinct entry of `actions`
    /// and one resource per instance, crossed into `actions × instances` decisions.
    pub fn new(
        caller: &Principal,
        actions: &[InstanceAction],
        instances: &[Instance],
        task: Option<&str>,
    ) -> Result<Self, AuthorizationError> {
        let subject = subject_category(caller, reference_id(SUBJECT_PREFIX, 0))?;

        let mut distinct_actions: Vec<InstanceAction> = Vec::with_capacity(actions.len());
        for action in actions {
            if !distinct_actions.contains(action) {
                distinct_actions.push(*action);
            }
        }

        let actions: Vec<XacmlJsonCategory> = distinct_actions
            .iter()
            .enumerate()
            .map(|(i, action)| action_category(*action, reference_id(ACTION_PREFIX, i)))
            .collect();

        let resources: Vec<XacmlJsonCategory> = instances
            .iter()
            .enumerate()
            .map(|(i, instance)| {
                resource_category(instance, task, reference_id(RESOURCE_PREFIX, i))
            })
            .collect();

        let mut references = Vec::with_capacity(actions.len() * resources.len());
        for action in 0..actions.len() {
            for resource in 0..resources.len() {
                references.push(DecisionReference {
                    subject: 0,
                    action,
                    resource,
                });
            }
        }

        Ok(Self {
            subjects: vec![subject],
            actions,
            resources,
            references,
        })
    }

    pub fn subjects(&self) -> &[XacmlJsonCategory] {
        &self.subjects
    }

    pub fn actions(&self) -> &[XacmlJsonCategory] {
        &self.actions
    }

    pub fn resources(&self) -> &[XacmlJsonCategory] {
        &self.resources
    }

    pub fn references(&self) -> &[DecisionReference] {
        &self.references
    }

    pub fn is_empty(&self) -> bool {
        self.references.is_empty()
    }

    pub fn into_xacml(self) -> XacmlJsonRequestRoot {
        let request_reference = self
            .references
            .iter()
            .map(|r| XacmlJsonRequestReference {
                reference_id: vec![
                    category_id(&self.subjects[r.subject]),
                    category_id(&self.actions[r.action]),
                    category_id(&self.resources[r.resource]),
                ],
            })
            .collect();

        XacmlJsonRequestRoot {
            request: XacmlJsonRequest {
                access_subject: self.subjects,
                action: self.actions,
                resource: self.resources,
                multi_requests: Some(XacmlJsonMultiRequests { request_reference }),
                ..Default::default()
            },
        }
    }
}

/// A plain request for one decision, without multi request references
pub fn single_decision_request(
    caller: &Principal,
    instance: &Instance,
    action: InstanceAction,
    task: Option<&str>,
) -> Result<XacmlJsonRequestRoot, AuthorizationError> {
    Ok(XacmlJsonRequestRoot {
        request: XacmlJsonRequest {
            access_subject: vec![subject_category(caller, reference_id(SUBJECT_PREFIX, 0))?],
            action: vec![action_category(action, reference_id(ACTION_PREFIX, 0))],
            resource: vec![resource_category(instance, task, reference_id(RESOURCE_PREFIX, 0))],
            ..Default::default()
        },
    })
}

fn reference_id(prefix: &str, index: usize) -> String {
    format!("{prefix}{}", index + 1)
}

fn category_id(category: &XacmlJsonCategory) -> String {
    category.id.clone().unwrap_or_default()
}

/// Every `urn:` claim of the caller becomes a subject attribute
fn subject_category(caller: &Principal, id: String) -> Result<XacmlJsonCategory, AuthorizationError> {
    if !caller.is_authenticated() {
        return Err(AuthorizationError::MissingCaller);
    }

    let attributes = caller
        .claims()
        .filter(|claim| claim.claim_type.starts_with("urn:"))
        .map(|claim| {
            let attribute = XacmlJsonAttribute::new(&claim.claim_type, &claim.value);
            if claim.claim_type == ClaimName::AuthenticationLevel.as_str() {
                attribute.with_data_type(INTEGER_DATA_TYPE)
            } else {
                attribute
            }
        })
        .collect();

    Ok(XacmlJsonCategory::new(id, attributes))
}

fn action_category(action: InstanceAction, id: String) -> XacmlJsonCategory {
    XacmlJsonCategory::new(
        id,
        vec![XacmlJsonAttribute::new(attributes::ACTION_ID, action.as_str()).included_in_result()],
    )
}

/// Resource attributes of an instance. An explicit `task` takes the place of
/// the process state; otherwise the current task or the end event is used.
fn resource_category(instance: &Instance, task: Option<&str>, id: String) -> XacmlJsonCategory {
    let mut resource = Vec::with_capacity(5);

    if let Some(instance_id) = &instance.id {
        resource.push(
            XacmlJsonAttribute::new(attributes::INSTANCE_ID, instance_id).included_in_result(),
        );
    }
    resource.push(XacmlJsonAttribute::new(attributes::ORG, &instance.org));
    resource.push(XacmlJsonAttribute::new(attributes::APP, instance.app_name()));
    if let Some(party_id) = instance.party_id() {
        resource.push(XacmlJsonAttribute::new(attributes::PARTY_ID, party_id));
    }

    match task.or_else(|| instance.current_task_id()) {
        Some(task) => resource.push(XacmlJsonAttribute::new(attributes::TASK, task)),
        None => {
            if let Some(end_event) = instance.end_event() {
                resource.push(XacmlJsonAttribute::new(attributes::END_EVENT, end_event));
            }
        }
    }

    XacmlJsonCategory::new(id, resource)
}
