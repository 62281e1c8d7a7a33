use infra_proxy::config::{init_tracing, Config};
use infra_proxy::ec2_instance_client::Ec2InstanceClient;
use infra_proxy::instance_controller::control_instance;
use infra_proxy::response::ApiResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let config = Config::from_env()?;
    let client = Ec2InstanceClient::new(config.ec2_region);

    let client = &client;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiResponse, Error>(control_instance(client, event.payload).await)
    }))
    .await?;
    Ok(())
}
