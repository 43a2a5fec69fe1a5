use serde::{Deserialize, Serialize};

use crate::scopes::Scopes;

/// Authentication type used by identities issued through the federation login.
pub const FEDERATION_AUTHENTICATION_TYPE: &str = "AuthenticationTypes.Federation";

/// The claim names this service reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ClaimName {
    Scope,
    AltinnScope,
    Org,
    OrgNumber,
    UserId,
    PartyId,
    AuthenticationLevel,
    AuthorizationDetails,
}

impl ClaimName {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClaimName::Scope => "scope",
            ClaimName::AltinnScope => "urn:altinn:scope",
            ClaimName::Org => "urn:altinn:org",
            ClaimName::OrgNumber => "urn:altinn:orgNumber",
            ClaimName::UserId => "urn:altinn:userid",
            ClaimName::PartyId => "urn:altinn:partyid",
            ClaimName::AuthenticationLevel => "urn:altinn:authlevel",
            ClaimName::AuthorizationDetails => "authorization_details",
        }
    }

    /// Claim names recognized as carrying the scope claim, in lookup order.
    pub const SCOPE_CLAIMS: [ClaimName; 2] = [ClaimName::Scope, ClaimName::AltinnScope];
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    #[serde(rename = "type")]
    pub claim_type: String,
    pub value: String,
}

impl Claim {
    pub fn new(claim_type: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            claim_type: claim_type.into(),
            value: value.into(),
        }
    }

    pub fn named(name: ClaimName, value: impl Into<String>) -> Self {
        Self::new(name.as_str(), value)
    }
}

/// A set of claims asserted by one authentication mechanism.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimsIdentity {
    pub authentication_type: Option<String>,
    #[serde(default)]
    pub claims: Vec<Claim>,
}

impl ClaimsIdentity {
    pub fn new(authentication_type: impl Into<String>, claims: Vec<Claim>) -> Self {
        Self {
            authentication_type: Some(authentication_type.into()),
            claims,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.authentication_type
            .as_deref()
            .is_some_and(|t| !t.is_empty())
    }

    pub fn claim(&self, name: ClaimName) -> Option<&str> {
        self.claims
            .iter()
            .find(|c| c.claim_type == name.as_str())
            .map(|c| c.value.as_str())
    }
}

/// How the caller's token relates to the instances it touches.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallerKind {
    /// An individual user, possibly acting through an app.
    EndUser,
    /// A system user acting on behalf of an organisation.
    SystemUser,
    /// An organisation (service owner) backend token.
    ServiceOwner,
}

/// The authenticated principal of the current request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub identities: Vec<ClaimsIdentity>,
}

impl Principal {
    pub fn new(identities: Vec<ClaimsIdentity>) -> Self {
        Self { identities }
    }

    /// Principal with a single identity of the given authentication type.
    pub fn with_claims(authentication_type: &str, claims: Vec<Claim>) -> Self {
        Self::new(vec![ClaimsIdentity::new(authentication_type, claims)])
    }

    pub fn is_authenticated(&self) -> bool {
        self.identities.iter().any(ClaimsIdentity::is_authenticated)
    }

    /// All claims across all identities, in identity order.
    pub fn claims(&self) -> impl Iterator<Item = &Claim> {
        self.identities.iter().flat_map(|i| i.claims.iter())
    }

    /// First value of the named claim across all identities.
    pub fn claim(&self, name: ClaimName) -> Option<&str> {
        self.identities.iter().find_map(|i| i.claim(name))
    }

    /// The scope claim. The first recognized scope claim name present wins.
    pub fn scopes(&self) -> Scopes<'_> {
        Scopes::new(
            ClaimName::SCOPE_CLAIMS
                .iter()
                .find_map(|name| self.claim(*name)),
        )
    }

    /// The identity issued by the federation login, if any.
    pub fn federation_identity(&self) -> Option<&ClaimsIdentity> {
        self.identities.iter().find(|i| {
            i.authentication_type.as_deref() == Some(FEDERATION_AUTHENTICATION_TYPE)
        })
    }

    pub fn org(&self) -> Option<&str> {
        self.claim(ClaimName::Org)
    }

    pub fn user_id(&self) -> Option<&str> {
        self.claim(ClaimName::UserId)
    }

    pub fn authentication_level(&self) -> Option<u32> {
        self.claim(ClaimName::AuthenticationLevel)
            .and_then(|v| v.trim().parse().ok())
    }

    pub fn caller_kind(&self) -> CallerKind {
        if self
            .claim(ClaimName::AuthorizationDetails)
            .is_some_and(|details| details.contains("urn:altinn:systemuser"))
        {
            return CallerKind::SystemUser;
        }
        if self.org().is_some() && self.user_id().is_none() {
            return CallerKind::ServiceOwner;
        }
        CallerKind::EndUser
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_claim_prefers_first_recognized_name() {
        let principal = Principal::with_claims(
            "Bearer",
            vec![
                Claim::named(ClaimName::AltinnScope, "altinn:instances.write"),
                Claim::named(ClaimName::Scope, "altinn:instances.read"),
            ],
        );
        assert_eq!(principal.scopes().raw(), Some("altinn:instances.read"));

        let principal = Principal::with_claims(
            "Bearer",
            vec![Claim::named(ClaimName::AltinnScope, "altinn:instances.write")],
        );
        assert_eq!(principal.scopes().raw(), Some("altinn:instances.write"));
    }

    #[test]
    fn test_missing_scope_claim_yields_empty_scopes() {
        let principal = Principal::with_claims("Bearer", vec![]);
        assert!(principal.scopes().is_empty());
        assert_eq!(principal.scopes().raw(), None);
    }

    #[test]
    fn test_authentication_requires_authentication_type() {
        assert!(!Principal::default().is_authenticated());
        assert!(!Principal::new(vec![ClaimsIdentity::default()]).is_authenticated());
        assert!(Principal::with_claims("Bearer", vec![]).is_authenticated());
    }

    #[test]
    fn test_caller_kind() {
        let service_owner =
            Principal::with_claims("Bearer", vec![Claim::named(ClaimName::Org, "ttd")]);
        assert_eq!(service_owner.caller_kind(), CallerKind::ServiceOwner);

        let app_user = Principal::with_claims(
            "Bearer",
            vec![
                Claim::named(ClaimName::Org, "ttd"),
                Claim::named(ClaimName::UserId, "1337"),
            ],
        );
        assert_eq!(app_user.caller_kind(), CallerKind::EndUser);

        let system_user = Principal::with_claims(
            "Bearer",
            vec![
                Claim::named(ClaimName::Org, "ttd"),
                Claim::named(
                    ClaimName::AuthorizationDetails,
                    r#"{"type":"urn:altinn:systemuser","systemuser_id":["abc"]}"#,
                ),
            ],
        );
        assert_eq!(system_user.caller_kind(), CallerKind::SystemUser);
    }

    #[test]
    fn test_authentication_level_parses_number() {
        let principal = Principal::with_claims(
            "Bearer",
            vec![Claim::named(ClaimName::AuthenticationLevel, "3")],
        );
        assert_eq!(principal.authentication_level(), Some(3));

        let principal = Principal::with_claims(
            "Bearer",
            vec![Claim::named(ClaimName::AuthenticationLevel, "high")],
        );
        assert_eq!(principal.authentication_level(), None);
    }
}
