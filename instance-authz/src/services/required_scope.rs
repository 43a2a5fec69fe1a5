use instance_authz_core::claims::{ClaimName, Principal};

/// True if any of `allowed_scopes` occurs in the caller's raw scope claim,
/// ignoring case.
///
/// This is a substring test on the whole claim, not a token match. The
/// federation identity's scope claim is preferred over a bare `scope` claim.
pub fn contains_required_scope(caller: &Principal, allowed_scopes: &[&str]) -> bool {
    let claim = caller
        .federation_identity()
        .and_then(|identity| identity.claim(ClaimName::AltinnScope))
        .or_else(|| caller.claim(ClaimName::Scope));

    let Some(claim) = claim else {
        return false;
    };

    let claim = claim.to_lowercase();
    allowed_scopes
        .iter()
        .filter(|scope| !scope.is_empty())
        .any(|scope| claim.contains(&scope.to_lowercase()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use instance_authz_core::claims::{Claim, ClaimsIdentity, FEDERATION_AUTHENTICATION_TYPE};

    #[test]
    fn test_substring_match_ignores_case() {
        let caller = Principal::with_claims(
            "Bearer",
            vec![Claim::named(ClaimName::Scope, "altinn:serviceowner/Instances.Read openid")],
        );
        assert!(contains_required_scope(&caller, &["altinn:serviceowner/instances.read"]));
        assert!(contains_required_scope(&caller, &["other", "serviceowner"]));
        assert!(!contains_required_scope(&caller, &["altinn:instances.write"]));
        assert!(!contains_required_scope(&caller, &[]));
        assert!(!contains_required_scope(&caller, &[""]));
    }

    #[test]
    fn test_prefers_federation_identity_claim() {
        let caller = Principal::new(vec![
            ClaimsIdentity::new(
                "Bearer",
                vec![Claim::named(ClaimName::Scope, "altinn:instances.read")],
            ),
            ClaimsIdentity::new(
                FEDERATION_AUTHENTICATION_TYPE,
                vec![Claim::named(ClaimName::AltinnScope, "altinn:admin")],
            ),
        ]);
        assert!(contains_required_scope(&caller, &["altinn:admin"]));
        assert!(!contains_required_scope(&caller, &["altinn:instances.read"]));
    }

    #[test]
    fn test_falls_back_to_scope_claim() {
        let caller = Principal::new(vec![
            ClaimsIdentity::new(FEDERATION_AUTHENTICATION_TYPE, vec![]),
            ClaimsIdentity::new(
                "Bearer",
                vec![Claim::named(ClaimName::Scope, "altinn:instances.read")],
            ),
        ]);
        assert!(contains_required_scope(&caller, &["altinn:instances.read"]));

        let no_scope = Principal::with_claims("Bearer", vec![]);
        assert!(!contains_required_scope(&no_scope, &["altinn:instances.read"]));
    }
}
