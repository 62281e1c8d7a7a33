use infra_proxy::config::{init_tracing, Config};
use infra_proxy::cost_explorer_client::CostExplorerReportClient;
use infra_proxy::cost_reporter::report_costs;
use infra_proxy::response::ApiResponse;
use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Error> {
    init_tracing();
    let config = Config::from_env()?;
    let client = CostExplorerReportClient::new(config.cost_explorer_region);

    let client = &client;
    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| async move {
        Ok::<ApiResponse, Error>(report_costs(client, event.payload).await)
    }))
    .await?;
    Ok(())
}
