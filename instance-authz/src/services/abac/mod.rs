//! Attribute based authorization of instances.
//!
//! Builds batched XACML multi-decision requests (one subject, one action
//! per requested action type, one resource per instance), hands them to the
//! [`PolicyDecisionPoint`](crate::pdp::PolicyDecisionPoint) and routes the
//! accepted results back to the instances they concern.

mod authorizer;
pub mod correlation;
pub mod request;
pub mod validator;


pub use authorizer::InstanceAuthorizer;
pub use correlation::PermittedActions;
pub use request::{single_decision_request, DecisionReference, MultiDecisionRequest};
pub use validator::{DecisionValidator, PermitDecisionValidator};
