//! Types for the XACML 3.0 JSON profile used to talk to the policy decision point.

pub mod request;
pub mod response;

pub use request::{
    XacmlJsonAttribute, XacmlJsonCategory, XacmlJsonMultiRequests, XacmlJsonRequest,
    XacmlJsonRequestReference, XacmlJsonRequestRoot,
};
pub use response::{
    XacmlJsonAttributeAssignment, XacmlJsonCategoryResult, XacmlJsonObligationOrAdvice,
    XacmlJsonResponse, XacmlJsonResult, XacmlJsonResultAttribute, XacmlJsonStatus,
    XacmlJsonStatusCode,
};

pub const DEFAULT_DATA_TYPE: &str = "http://www.w3.org/2001/XMLSchema#string";
pub const INTEGER_DATA_TYPE: &str = "http://www.w3.org/2001/XMLSchema#integer";

pub mod categories {
    pub const ACCESS_SUBJECT: &str =
        "urn:oasis:names:tc:xacml:1.0:subject-category:access-subject";
    pub const ACTION: &str = "urn:oasis:names:tc:xacml:3.0:attribute-category:action";
    pub const RESOURCE: &str = "urn:oasis:names:tc:xacml:3.0:attribute-category:resource";
}

pub mod attributes {
    pub const ACTION_ID: &str = "urn:oasis:names:tc:xacml:1.0:action:action-id";
    pub const ORG: &str = "urn:altinn:org";
    pub const APP: &str = "urn:altinn:app";
    pub const INSTANCE_ID: &str = "urn:altinn:instance-id";
    pub const PARTY_ID: &str = "urn:altinn:partyid";
    pub const TASK: &str = "urn:altinn:task";
    pub const END_EVENT: &str = "urn:altinn:end-event";
    pub const MINIMUM_AUTHENTICATION_LEVEL: &str = "urn:altinn:minimum-authenticationlevel";
    pub const MINIMUM_AUTHENTICATION_LEVEL_ORG: &str =
        "urn:altinn:minimum-authenticationlevel-org";
}

pub mod decisions {
    pub const PERMIT: &str = "Permit";
    pub const DENY: &str = "Deny";
    pub const NOT_APPLICABLE: &str = "NotApplicable";
    pub const INDETERMINATE: &str = "Indeterminate";
}
