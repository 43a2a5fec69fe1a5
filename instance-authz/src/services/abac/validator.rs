use instance_authz_core::claims::Principal;
use instance_authz_core::xacml::{attributes, XacmlJsonResult};
use tracing::debug;

/// Decides whether a single decision result grants access to `caller`
pub trait DecisionValidator: Send + Sync {
    fn validate(&self, result: &XacmlJsonResult, caller: &Principal) -> bool;
}

/// Accepts `Permit` results whose minimum authentication level obligations
/// are met by the caller's authentication level.
#[derive(Debug, Clone, Copy, Default)]
pub struct PermitDecisionValidator;

impl PermitDecisionValidator {
    /// The level required by the named obligation. `Err` if it cannot be read.
    fn required_level(result: &XacmlJsonResult, obligation: &str) -> Option<Result<u32, ()>> {
        result
            .obligations
            .iter()
            .flat_map(|o| o.attribute_assignment.iter())
            .find(|a| a.category.as_deref() == Some(obligation) || a.attribute_id == obligation)
            .map(|a| a.value.trim().parse().map_err(|_| ()))
    }
}

impl DecisionValidator for PermitDecisionValidator {
    fn validate(&self, result: &XacmlJsonResult, caller: &Principal) -> bool {
        if !result.is_permit() {
            return false;
        }

        let level = caller.authentication_level().unwrap_or(0);

        if caller.org().is_some() {
            if let Some(required) =
                Self::required_level(result, attributes::MINIMUM_AUTHENTICATION_LEVEL_ORG)
            {
                return required.is_ok_and(|required| level >= required);
            }
        }

        match Self::required_level(result, attributes::MINIMUM_AUTHENTICATION_LEVEL) {
            Some(Ok(required)) if level < required => {
                debug!(level, required, "Authentication level too low");
                false
            }
            Some(Err(())) => false,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use instance_authz_core::claims::{Claim, ClaimName};
    use instance_authz_core::xacml::{XacmlJsonAttributeAssignment, XacmlJsonObligationOrAdvice};

    fn result(decision: &str, obligations: Vec<(&str, &str)>) -> XacmlJsonResult {
        XacmlJsonResult {
            decision: decision.to_string(),
            obligations: obligations
                .into_iter()
                .map(|(category, value)| XacmlJsonObligationOrAdvice {
                    id: Some("urn:altinn:obligation:authenticationLevel1".to_string()),
                    attribute_assignment: vec![XacmlJsonAttributeAssignment {
                        attribute_id: "urn:altinn:obligation-assignment:1".to_string(),
                        value: value.to_string(),
                        category: Some(category.to_string()),
                        data_type: None,
                    }],
                })
                .collect(),
            ..Default::default()
        }
    }

    fn user(level: &str) -> Principal {
        Principal::with_claims(
            "Bearer",
            vec![
                Claim::named(ClaimName::UserId, "1337"),
                Claim::named(ClaimName::AuthenticationLevel, level),
            ],
        )
    }

    #[test]
    fn test_only_permit_is_accepted() {
        let validator = PermitDecisionValidator;
        assert!(validator.validate(&result("Permit", vec![]), &user("2")));
        assert!(!validator.validate(&result("Deny", vec![]), &user("2")));
        assert!(!validator.validate(&result("NotApplicable", vec![]), &user("2")));
        assert!(!validator.validate(&result("Indeterminate", vec![]), &user("2")));
    }

    #[test]
    fn test_minimum_authentication_level() {
        let validator = PermitDecisionValidator;
        let permit = result("Permit", vec![(attributes::MINIMUM_AUTHENTICATION_LEVEL, "3")]);
        assert!(!validator.validate(&permit, &user("2")));
        assert!(validator.validate(&permit, &user("3")));
        assert!(validator.validate(&permit, &user("4")));

        let garbage = result("Permit", vec![(attributes::MINIMUM_AUTHENTICATION_LEVEL, "high")]);
        assert!(!validator.validate(&garbage, &user("4")));
    }

    #[test]
    fn test_org_level_obligation_applies_to_org_callers() {
        let validator = PermitDecisionValidator;
        let permit = result(
            "Permit",
            vec![
                (attributes::MINIMUM_AUTHENTICATION_LEVEL_ORG, "3"),
                (attributes::MINIMUM_AUTHENTICATION_LEVEL, "4"),
            ],
        );

        let org = Principal::with_claims(
            "Bearer",
            vec![
                Claim::named(ClaimName::Org, "ttd"),
                Claim::named(ClaimName::AuthenticationLevel, "3"),
            ],
        );
        assert!(validator.validate(&permit, &org));

        // End users are held to the user level
        assert!(!validator.validate(&permit, &user("3")));
    }
}
