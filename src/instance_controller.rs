use serde::Serialize;
use serde_json::Value;
use tracing::{error, info, warn};

use crate::control_request::ControlRequest;
use crate::ec2_instance_client::Control;
use crate::instance::CommandAcknowledgement;
use crate::response::ApiResponse;

#[derive(Serialize)]
struct CommandOutput {
    message: String,
    details: CommandAcknowledgement,
}

/// Sends a start or stop command for one instance. Only confirms the provider
/// accepted the command; the instance may still be transitioning.
pub async fn control_instance<C: Control + Sync>(client: &C, event: Value) -> ApiResponse {
    info!(event = %event, "received event");

    let request = match ControlRequest::from_event(&event) {
        Ok(request) => request,
        Err(err) => {
            warn!(reason = %err, "rejected control request");
            return ApiResponse::bad_request(&err.to_string());
        }
    };

    let action = request.action.as_str();
    match client.send_command(request.action, &request.instance_id).await {
        Ok(details) => {
            info!(instance_id = %request.instance_id, action, "command executed successfully");
            ApiResponse::ok(&CommandOutput {
                message: format!(
                    "Instance {} {} command sent successfully.",
                    request.instance_id, action
                ),
                details,
            })
        }
        Err(err) => {
            error!(instance_id = %request.instance_id, action, error = %err, "error executing command");
            ApiResponse::internal_error("Error executing command", &err.to_string())
        }
    }
}
