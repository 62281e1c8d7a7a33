use serde::Serialize;
use serde_json::Value;
use tracing::{error, info};

use crate::billing_period::{BillingPeriod, FormattedPeriod};
use crate::cost::ServiceCost;
use crate::cost_explorer_client::CostQuery;
use crate::error::InfraProxyError;
use crate::response::ApiResponse;

#[derive(Serialize)]
struct CostReportOutput {
    message: &'static str,
    data: Vec<ServiceCost>,
    period: FormattedPeriod,
}

pub async fn report_costs<Q: CostQuery + Sync>(client: &Q, event: Value) -> ApiResponse {
    info!(event = %event, "received event");

    let result = match BillingPeriod::current() {
        Ok(period) => report_for_period(client, period).await,
        Err(err) => Err(err),
    };
    match result {
        Ok(response) => response,
        Err(err) => {
            error!(error = %err, "error fetching costs");
            ApiResponse::internal_error("Error fetching costs", &err.to_string())
        }
    }
}

async fn report_for_period<Q: CostQuery + Sync>(
    client: &Q,
    period: BillingPeriod,
) -> Result<ApiResponse, InfraProxyError> {
    let costs = client.service_costs(&period).await?;
    info!(services = costs.len(), "costs fetched");
    Ok(ApiResponse::ok(&CostReportOutput {
        message: "Costs fetched successfully",
        data: costs,
        period: period.formatted(),
    }))
}
