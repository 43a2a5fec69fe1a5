use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
#[readonly::make]
pub struct ApiServer {
    pub bind_address: String,
}

impl Default for ApiServer {
    fn default() -> Self {
        ApiServer {
            bind_address: "0.0.0.0:5050".to_string(),
        }
    }
}
