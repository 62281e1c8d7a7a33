use async_trait::async_trait;
use rusoto_core::Region;
use rusoto_ec2::{
    DescribeInstancesRequest, Ec2, Ec2Client, Filter, Instance, InstanceState,
    InstanceStateChange, StartInstancesRequest, StopInstancesRequest,
};
use tracing::info;

use crate::error::InfraProxyError;
use crate::instance::{
    Action, CommandAcknowledgement, InstanceSummary, StateChange, StateName, UNKNOWN_NAME,
    UNKNOWN_STATE,
};

const LISTED_STATES: [&str; 4] = ["running", "stopped", "pending", "stopping"];

#[async_trait]
pub trait Describe {
    async fn describe_active_instances(&self) -> Result<Vec<InstanceSummary>, InfraProxyError>;
}

#[async_trait]
pub trait Control {
    async fn send_command(
        &self,
        action: Action,
        instance_id: &str,
    ) -> Result<CommandAcknowledgement, InfraProxyError>;
}

#[derive(Clone)]
pub struct Ec2InstanceClient {
    client: Ec2Client,
}

#[async_trait]
impl Describe for Ec2InstanceClient {
    async fn describe_active_instances(&self) -> Result<Vec<InstanceSummary>, InfraProxyError> {
        let request = DescribeInstancesRequest {
            filters: Some(vec![Filter {
                name: Some("instance-state-name".to_string()),
                values: Some(LISTED_STATES.iter().map(|state| state.to_string()).collect()),
            }]),
            ..DescribeInstancesRequest::default()
        };

        let result = self.client.describe_instances(request).await?;

        let mut summaries = Vec::<InstanceSummary>::new();
        for reservation in result.reservations.unwrap_or_default() {
            for instance in reservation.instances.unwrap_or_default() {
                summaries.push(summarize(instance));
            }
        }
        Ok(summaries)
    }
}

#[async_trait]
impl Control for Ec2InstanceClient {
    async fn send_command(
        &self,
        action: Action,
        instance_id: &str,
    ) -> Result<CommandAcknowledgement, InfraProxyError> {
        let instance_ids = vec![instance_id.to_string()];
        info!(instance_id, action = action.as_str(), "sending lifecycle command");
        match action {
            Action::Start => {
                let result = self
                    .client
                    .start_instances(StartInstancesRequest {
                        instance_ids,
                        ..StartInstancesRequest::default()
                    })
                    .await?;
                Ok(CommandAcknowledgement::Starting(state_changes(
                    result.starting_instances,
                )))
            }
            Action::Stop => {
                let result = self
                    .client
                    .stop_instances(StopInstancesRequest {
                        instance_ids,
                        ..StopInstancesRequest::default()
                    })
                    .await?;
                Ok(CommandAcknowledgement::Stopping(state_changes(
                    result.stopping_instances,
                )))
            }
        }
    }
}

impl Ec2InstanceClient {
    pub fn new(region: Region) -> Self {
        Self::new_with_client(Ec2Client::new(region))
    }

    pub fn new_with_client(client: Ec2Client) -> Self {
        Ec2InstanceClient { client }
    }
}

fn summarize(instance: Instance) -> InstanceSummary {
    let name = instance
        .tags
        .unwrap_or_default()
        .into_iter()
        .find(|tag| tag.key.as_deref() == Some("Name"))
        .and_then(|tag| tag.value)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string());
    let state = instance
        .state
        .and_then(|state| state.name)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| UNKNOWN_STATE.to_string());

    InstanceSummary {
        id: instance.instance_id.unwrap_or_default(),
        name,
        state,
        instance_type: instance.instance_type.unwrap_or_default(),
        public_ip: instance.public_ip_address.filter(|ip| !ip.is_empty()),
    }
}

fn state_changes(changes: Option<Vec<InstanceStateChange>>) -> Vec<StateChange> {
    let state_name = |state: InstanceState| StateName {
        code: state.code,
        name: state.name,
    };
    changes
        .unwrap_or_default()
        .into_iter()
        .map(|change| StateChange {
            instance_id: change.instance_id,
            current_state: change.current_state.map(state_name),
            previous_state: change.previous_state.map(state_name),
        })
        .collect()
}
