use std::convert::TryFrom;
use std::str::FromStr;

use serde_json::Value;

use crate::error::ControlRequestError;
use crate::instance::Action;

/// Fields pulled out of an invocation event, before any validation.
#[derive(Debug, PartialEq, Default)]
pub struct RawControlRequest {
    pub action: Option<String>,
    pub instance_id: Option<String>,
}

#[derive(Debug, PartialEq)]
pub struct ControlRequest {
    pub action: Action,
    pub instance_id: String,
}

impl FromStr for Action {
    type Err = ControlRequestError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "start" => Ok(Action::Start),
            "stop" => Ok(Action::Stop),
            _ => Err(ControlRequestError::InvalidAction),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(flag) => *flag,
        Value::Number(number) => number.as_f64().map_or(false, |n| n != 0.0),
        Value::String(text) => !text.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

impl RawControlRequest {
    /// Accepts both API Gateway proxy events, whose `body` is a JSON string, and
    /// direct invocations carrying the fields at the top level or in an object `body`.
    pub fn from_event(event: &Value) -> Result<Self, ControlRequestError> {
        match event.get("body").filter(|body| is_truthy(body)) {
            Some(Value::String(text)) => {
                let body: Value = serde_json::from_str(text)
                    .map_err(|_| ControlRequestError::InvalidJsonBody)?;
                if body.is_null() {
                    return Err(ControlRequestError::InvalidJsonBody);
                }
                Self::from_body(&body)
            }
            Some(body) => Self::from_body(body),
            None => Ok(Self::from_fields(event)),
        }
    }

    /// A body whose `action` is set but is not text cannot be read as a request.
    fn from_body(body: &Value) -> Result<Self, ControlRequestError> {
        match body.get("action") {
            Some(action) if is_truthy(action) && !action.is_string() => {
                Err(ControlRequestError::InvalidJsonBody)
            }
            _ => Ok(Self::from_fields(body)),
        }
    }

    fn from_fields(fields: &Value) -> Self {
        let text = |key: &str| {
            fields
                .get(key)
                .and_then(Value::as_str)
                .map(|value| value.to_string())
        };
        RawControlRequest {
            action: text("action"),
            instance_id: text("instanceId"),
        }
    }
}

impl TryFrom<RawControlRequest> for ControlRequest {
    type Error = ControlRequestError;

    fn try_from(raw: RawControlRequest) -> Result<Self, Self::Error> {
        let instance_id = raw
            .instance_id
            .filter(|id| !id.is_empty())
            .ok_or(ControlRequestError::MissingInstanceId)?;
        let action = raw
            .action
            .ok_or(ControlRequestError::InvalidAction)?
            .parse::<Action>()?;
        Ok(ControlRequest {
            action,
            instance_id,
        })
    }
}

impl ControlRequest {
    pub fn from_event(event: &Value) -> Result<Self, ControlRequestError> {
        Self::try_from(RawControlRequest::from_event(event)?)
    }
}
