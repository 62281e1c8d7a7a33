use serde::Serialize;
use serde_json::{json, Map, Value};

/// API Gateway proxy response. `body` carries the JSON payload already encoded.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: Map<String, Value>,
    pub body: String,
}

fn default_headers() -> Map<String, Value> {
    let mut headers = Map::new();
    headers.insert("Access-Control-Allow-Origin".to_string(), json!("*"));
    headers.insert("Access-Control-Allow-Credentials".to_string(), json!(true));
    headers.insert("Content-Type".to_string(), json!("application/json"));
    headers
}

impl ApiResponse {
    pub fn new<T: Serialize>(status_code: u16, payload: &T) -> Self {
        // serializing our own payload types never fails; fall back to an empty object
        let body = serde_json::to_string(payload).unwrap_or_else(|_| "{}".to_string());
        ApiResponse {
            status_code,
            headers: default_headers(),
            body,
        }
    }

    pub fn ok<T: Serialize>(payload: &T) -> Self {
        Self::new(200, payload)
    }

    pub fn bad_request(message: &str) -> Self {
        Self::new(400, &json!({ "message": message }))
    }

    pub fn internal_error(message: &str, error: &str) -> Self {
        Self::new(500, &json!({ "message": message, "error": error }))
    }

    #[cfg(test)]
    pub fn payload(&self) -> serde_json::Value {
        serde_json::from_str(&self.body).unwrap_or(serde_json::Value::Null)
    }
}
