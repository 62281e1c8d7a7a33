use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::ec2_instance_client::Describe;
use crate::instance::InstanceSummary;
use crate::response::ApiResponse;

#[derive(Serialize)]
struct InstanceListOutput {
    message: &'static str,
    data: Vec<InstanceSummary>,
}

pub async fn list_instances<D: Describe + Sync>(client: &D, event: Value) -> ApiResponse {
    info!(event = %event, "received event");

    match client.describe_active_instances().await {
        Ok(instances) => {
            info!(count = instances.len(), "instances fetched");
            ApiResponse::ok(&InstanceListOutput {
                message: "Instances fetched successfully",
                data: instances,
            })
        }
        Err(err) => {
            error!(error = %err, "error fetching instances");
            ApiResponse::internal_error("Error fetching instances", &err.to_string())
        }
    }
}
