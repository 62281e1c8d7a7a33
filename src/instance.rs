use serde::Serialize;

pub const UNKNOWN_NAME: &str = "Unknown";
pub const UNKNOWN_STATE: &str = "unknown";

#[derive(Debug, PartialEq, Clone, Serialize)]
pub struct InstanceSummary {
    pub id: String,
    pub name: String,
    pub state: String,
    #[serde(rename = "type")]
    pub instance_type: String,
    #[serde(rename = "publicIp")]
    pub public_ip: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Action {
    Start,
    Stop,
}

impl Action {
    pub fn as_str(&self) -> &'static str {
        match self {
            Action::Start => "start",
            Action::Stop => "stop",
        }
    }
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateName {
    pub code: Option<i64>,
    pub name: Option<String>,
}

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct StateChange {
    pub instance_id: Option<String>,
    pub current_state: Option<StateName>,
    pub previous_state: Option<StateName>,
}

/// What the provider returned after accepting a start or stop command.
#[derive(Debug, PartialEq, Clone, Serialize)]
pub enum CommandAcknowledgement {
    #[serde(rename = "StartingInstances")]
    Starting(Vec<StateChange>),
    #[serde(rename = "StoppingInstances")]
    Stopping(Vec<StateChange>),
}
