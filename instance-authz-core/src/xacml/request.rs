use serde::{Deserialize, Serialize};

use super::DEFAULT_DATA_TYPE;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonAttribute {
    pub attribute_id: String,
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issuer: Option<String>,
    pub data_type: String,
    #[serde(default)]
    pub include_in_result: bool,
}

impl XacmlJsonAttribute {
    pub fn new(attribute_id: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            attribute_id: attribute_id.into(),
            value: value.into(),
            issuer: None,
            data_type: DEFAULT_DATA_TYPE.to_string(),
            include_in_result: false,
        }
    }

    pub fn with_data_type(mut self, data_type: &str) -> Self {
        self.data_type = data_type.to_string();
        self
    }

    /// Ask the decision point to echo this attribute in the result
    pub fn included_in_result(mut self) -> Self {
        self.include_in_result = true;
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub attribute: Vec<XacmlJsonAttribute>,
}

impl XacmlJsonCategory {
    pub fn new(id: impl Into<String>, attribute: Vec<XacmlJsonAttribute>) -> Self {
        Self {
            category_id: None,
            id: Some(id.into()),
            attribute,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonRequestReference {
    pub reference_id: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonMultiRequests {
    pub request_reference: Vec<XacmlJsonRequestReference>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonRequest {
    #[serde(default)]
    pub return_policy_id_list: bool,
    #[serde(default)]
    pub access_subject: Vec<XacmlJsonCategory>,
    #[serde(default)]
    pub action: Vec<XacmlJsonCategory>,
    #[serde(default)]
    pub resource: Vec<XacmlJsonCategory>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_requests: Option<XacmlJsonMultiRequests>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XacmlJsonRequestRoot {
    #[serde(rename = "Request")]
    pub request: XacmlJsonRequest,
}
