use serde::{Deserialize, Serialize};

use super::{categories, decisions};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonStatusCode {
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonStatus {
    pub status_message: Option<String>,
    pub status_code: Option<XacmlJsonStatusCode>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonAttributeAssignment {
    pub attribute_id: String,
    pub value: String,
    pub category: Option<String>,
    pub data_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonObligationOrAdvice {
    pub id: Option<String>,
    #[serde(default)]
    pub attribute_assignment: Vec<XacmlJsonAttributeAssignment>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonResultAttribute {
    pub attribute_id: String,
    pub value: String,
    pub data_type: Option<String>,
}

/// An attribute category echoed back by the decision point
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonCategoryResult {
    pub category_id: String,
    #[serde(default)]
    pub attribute: Vec<XacmlJsonResultAttribute>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct XacmlJsonResult {
    pub decision: String,
    pub status: Option<XacmlJsonStatus>,
    #[serde(default)]
    pub obligations: Vec<XacmlJsonObligationOrAdvice>,
    #[serde(default)]
    pub associated_advice: Vec<XacmlJsonObligationOrAdvice>,
    #[serde(default)]
    pub category: Vec<XacmlJsonCategoryResult>,
}

impl XacmlJsonResult {
    pub fn is_permit(&self) -> bool {
        self.decision == decisions::PERMIT
    }

    /// Value of an echoed attribute within the given category
    pub fn attribute_value(&self, category_id: &str, attribute_id: &str) -> Option<&str> {
        self.category
            .iter()
            .filter(|c| c.category_id == category_id)
            .flat_map(|c| c.attribute.iter())
            .find(|a| a.attribute_id == attribute_id)
            .map(|a| a.value.as_str())
    }

    pub fn resource_attribute(&self, attribute_id: &str) -> Option<&str> {
        self.attribute_value(categories::RESOURCE, attribute_id)
    }

    pub fn action_attribute(&self, attribute_id: &str) -> Option<&str> {
        self.attribute_value(categories::ACTION, attribute_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct XacmlJsonResponse {
    #[serde(rename = "Response")]
    pub response: Option<Vec<XacmlJsonResult>>,
}

impl XacmlJsonResponse {
    pub fn results(&self) -> &[XacmlJsonResult] {
        self.response.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xacml::attributes;

    #[test]
    fn test_parses_decision_with_echoed_categories() {
        let json = r#"{
            "Response": [{
                "Decision": "Permit",
                "Status": {"StatusCode": {"Value": "urn:oasis:names:tc:xacml:1.0:status:ok"}},
                "Obligations": [{
                    "Id": "urn:altinn:obligation:authenticationLevel1",
                    "AttributeAssignment": [{
                        "AttributeId": "urn:altinn:obligation-assignment-1",
                        "Value": "2",
                        "Category": "urn:altinn:minimum-authenticationlevel",
                        "DataType": "http://www.w3.org/2001/XMLSchema#integer"
                    }]
                }],
                "Category": [
                    {
                        "CategoryId": "urn:oasis:names:tc:xacml:3.0:attribute-category:action",
                        "Attribute": [{"AttributeId": "urn:oasis:names:tc:xacml:1.0:action:action-id", "Value": "read"}]
                    },
                    {
                        "CategoryId": "urn:oasis:names:tc:xacml:3.0:attribute-category:resource",
                        "Attribute": [{"AttributeId": "urn:altinn:instance-id", "Value": "1000/abc"}]
                    }
                ]
            }]
        }"#;

        let response: XacmlJsonResponse = serde_json::from_str(json).unwrap();
        let result = &response.results()[0];
        assert!(result.is_permit());
        assert_eq!(result.action_attribute(attributes::ACTION_ID), Some("read"));
        assert_eq!(
            result.resource_attribute(attributes::INSTANCE_ID),
            Some("1000/abc")
        );
        assert_eq!(result.resource_attribute(attributes::ACTION_ID), None);
        assert_eq!(result.obligations[0].attribute_assignment[0].value, "2");
    }

    #[test]
    fn test_null_response_has_no_results() {
        let response: XacmlJsonResponse = serde_json::from_str(r#"{"Response": null}"#).unwrap();
        assert!(response.results().is_empty());

        let response: XacmlJsonResponse = serde_json::from_str("{}").unwrap();
        assert!(response.results().is_empty());
    }
}
