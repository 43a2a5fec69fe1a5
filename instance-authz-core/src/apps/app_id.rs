use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid app id '{0}', expected '{{org}}/{{app}}'")]
pub struct InvalidAppId(pub String);

/// An application id of the form `{org}/{app}`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AppId<'a> {
    pub org: &'a str,
    pub app: &'a str,
}

impl<'a> AppId<'a> {
    /// Split `{org}/{app}`. Exactly one separator and two non-empty parts are required.
    pub fn parse(app_id: &'a str) -> Result<Self, InvalidAppId> {
        match app_id.split_once('/') {
            Some((org, app)) if !org.is_empty() && !app.is_empty() && !app.contains('/') => {
                Ok(Self { org, app })
            }
            _ => Err(InvalidAppId(app_id.to_string())),
        }
    }
}

impl fmt::Display for AppId<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.org, self.app)
    }
}
