use crate::billing_period::BillingPeriod;
use crate::cost::ServiceCost;
use crate::error::InfraProxyError;
use async_trait::async_trait;

use bigdecimal::{BigDecimal, ToPrimitive};
use rusoto_ce::{
    CostExplorer, CostExplorerClient, DateInterval, GetCostAndUsageRequest, GroupDefinition,
    ResultByTime,
};
use rusoto_core::Region;
use std::str::FromStr;
use tracing::{info, warn};

const COST_METRIC: &str = "UnblendedCost";
const GRANULARITY: &str = "MONTHLY";
const GROUP_DIMENSION: &str = "SERVICE";

#[async_trait]
pub trait CostQuery {
    /// Positive per-service costs over `period`, most expensive first.
    async fn service_costs(&self, period: &BillingPeriod)
        -> Result<Vec<ServiceCost>, InfraProxyError>;
}

#[derive(Clone)]
pub struct CostExplorerReportClient {
    client: CostExplorerClient,
}

#[async_trait]
impl CostQuery for CostExplorerReportClient {
    async fn service_costs(
        &self,
        period: &BillingPeriod,
    ) -> Result<Vec<ServiceCost>, InfraProxyError> {
        let formatted = period.formatted();
        info!(start = %formatted.start, end = %formatted.end, "querying cost and usage");
        let response = self
            .client
            .get_cost_and_usage(GetCostAndUsageRequest {
                time_period: DateInterval {
                    start: formatted.start,
                    end: formatted.end,
                },
                granularity: GRANULARITY.to_string(),
                metrics: vec![COST_METRIC.to_string()],
                group_by: Some(vec![GroupDefinition {
                    key: Some(GROUP_DIMENSION.to_string()),
                    type_: Some("DIMENSION".to_string()),
                }]),
                ..Default::default()
            })
            .await?;
        Ok(Self::summarize_results(response.results_by_time))
    }
}

impl CostExplorerReportClient {
    pub fn new(region: Region) -> Self {
        Self::new_with_client(CostExplorerClient::new(region))
    }

    pub fn new_with_client(client: CostExplorerClient) -> Self {
        CostExplorerReportClient { client }
    }

    fn summarize_results(results: Option<Vec<ResultByTime>>) -> Vec<ServiceCost> {
        let zero = BigDecimal::from(0);
        let mut costs = Vec::<(BigDecimal, ServiceCost)>::new();
        for result in results.unwrap_or_default() {
            for group in result.groups.unwrap_or_default() {
                let service_name = group
                    .keys
                    .and_then(|keys| keys.into_iter().next())
                    .unwrap_or_default();
                let metric = match group
                    .metrics
                    .and_then(|mut metrics| metrics.remove(COST_METRIC))
                {
                    Some(metric) => metric,
                    None => continue,
                };
                let amount = match metric
                    .amount
                    .as_deref()
                    .map(|amount| BigDecimal::from_str(amount.trim()))
                {
                    Some(Ok(amount)) => amount,
                    Some(Err(_)) => {
                        warn!(service = %service_name, amount = ?metric.amount, "unparseable cost amount");
                        continue;
                    }
                    None => continue,
                };
                if amount <= zero {
                    continue;
                }
                let formatted = match amount.to_f64() {
                    Some(value) => format!("{:.4}", value),
                    None => continue,
                };
                // ordering follows the displayed amount; ties keep provider order
                let displayed = match BigDecimal::from_str(&formatted) {
                    Ok(displayed) => displayed,
                    Err(_) => continue,
                };
                costs.push((
                    displayed,
                    ServiceCost {
                        service_name,
                        amount: formatted,
                        unit: metric.unit.unwrap_or_default(),
                    },
                ));
            }
        }

        costs.sort_by(|(left, _), (right, _)| right.cmp(left));
        costs.into_iter().map(|(_, cost)| cost).collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::billing_period::BillingPeriod;
    use crate::cost::ServiceCost;
    use crate::cost_explorer_client::{CostExplorerReportClient, CostQuery};
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use crate::test_support::request_text;
    use rusoto_ce::{CostExplorerClient, Group, MetricValue, ResultByTime};
    use rusoto_core::signature::SignedRequest;
    use serde_json::{json, Value};
    use rusoto_mock::{
        MockCredentialsProvider, MockRequestDispatcher, MockResponseReader, ReadMockResponse,
    };
    use std::collections::HashMap;
    use std::convert::TryFrom;
    use std::str::FromStr;

    fn period() -> BillingPeriod {
        BillingPeriod::try_from(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()).unwrap()
    }

    fn group(service: &str, amount: Option<&str>) -> Group {
        let mut metrics = HashMap::new();
        metrics.insert(
            "UnblendedCost".to_string(),
            MetricValue {
                amount: amount.map(|amount| amount.to_string()),
                unit: Some("USD".to_string()),
            },
        );
        Group {
            keys: Some(vec![service.to_string()]),
            metrics: Some(metrics),
        }
    }

    fn result(groups: Vec<Group>) -> ResultByTime {
        ResultByTime {
            groups: Some(groups),
            ..Default::default()
        }
    }

    fn cost(service: &str, amount: &str) -> ServiceCost {
        ServiceCost {
            service_name: service.to_string(),
            amount: amount.to_string(),
            unit: "USD".to_string(),
        }
    }

    #[tokio::test]
    async fn test_service_costs() {
        let mock = CostExplorerClient::new_with(
            MockRequestDispatcher::default()
                .with_body(&*MockResponseReader::read_response(
                    "test_resources/valid",
                    "get_cost_and_usage.json",
                ))
                .with_request_checker(|request: &SignedRequest| {
                    let sent: Value = serde_json::from_str(&request_text(request)).unwrap();
                    assert_eq!(
                        sent["TimePeriod"],
                        json!({ "Start": "2024-03-01", "End": "2024-03-16" })
                    );
                    assert_eq!(sent["Granularity"], json!("MONTHLY"));
                    assert_eq!(sent["Metrics"], json!(["UnblendedCost"]));
                    assert_eq!(
                        sent["GroupBy"],
                        json!([{ "Type": "DIMENSION", "Key": "SERVICE" }])
                    );
                }),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CostExplorerReportClient::new_with_client(mock);
        let result = client.service_costs(&period()).await;

        assert_eq!(
            result.unwrap(),
            vec![
                cost("AmazonCloudWatch", "12.3000"),
                cost("Amazon Simple Storage Service", "5.2000"),
                cost("AWS Lambda", "0.0000"),
            ]
        );
    }

    #[tokio::test]
    async fn test_service_costs_error() {
        let mock = CostExplorerClient::new_with(
            MockRequestDispatcher::with_status(400).with_body(&*MockResponseReader::read_response(
                "test_resources/error",
                "ce_access_denied.json",
            )),
            MockCredentialsProvider,
            Default::default(),
        );

        let client = CostExplorerReportClient::new_with_client(mock);
        let result = client.service_costs(&period()).await;

        assert_eq!(
            result.unwrap_err().to_string(),
            "User: arn:aws:sts::123456789012:assumed-role/report-costs is not authorized to perform: ce:GetCostAndUsage"
        );
    }

    #[test]
    fn test_zero_amount_is_dropped() {
        let costs = CostExplorerReportClient::summarize_results(Some(vec![result(vec![
            group("EC2", Some("0")),
            group("S3", Some("5.2")),
        ])]));
        assert_eq!(costs, vec![cost("S3", "5.2000")]);
    }

    #[test]
    fn test_groups_are_flattened_across_periods_and_sorted() {
        let costs = CostExplorerReportClient::summarize_results(Some(vec![
            result(vec![group("S3", Some("1.25")), group("EC2", Some("40.5"))]),
            result(vec![group("Route 53", Some("3")), group("KMS", Some("-2"))]),
        ]));
        assert_eq!(
            costs,
            vec![
                cost("EC2", "40.5000"),
                cost("Route 53", "3.0000"),
                cost("S3", "1.2500"),
            ]
        );

        let amounts: Vec<BigDecimal> = costs
            .iter()
            .map(|cost| BigDecimal::from_str(&cost.amount).unwrap())
            .collect();
        assert!(amounts.windows(2).all(|pair| pair[0] >= pair[1]));
        assert!(amounts.iter().all(|amount| *amount > BigDecimal::from(0)));
    }

    #[test]
    fn test_unparseable_or_missing_amounts_are_dropped() {
        let costs = CostExplorerReportClient::summarize_results(Some(vec![result(vec![
            group("Support", Some("n/a")),
            group("Shield", None),
            group("SNS", Some("0.12345")),
        ])]));
        assert_eq!(costs, vec![cost("SNS", "0.1235")]);
    }

    #[test]
    fn test_equal_displayed_amounts_keep_provider_order() {
        let costs = CostExplorerReportClient::summarize_results(Some(vec![result(vec![
            group("SQS", Some("0.00001")),
            group("Lambda", Some("0.00002")),
            group("KMS", Some("0.00004")),
            group("EC2", Some("2")),
        ])]));
        assert_eq!(
            costs,
            vec![
                cost("EC2", "2.0000"),
                cost("SQS", "0.0000"),
                cost("Lambda", "0.0000"),
                cost("KMS", "0.0000"),
            ]
        );
    }

    #[test]
    fn test_no_results() {
        assert!(CostExplorerReportClient::summarize_results(None).is_empty());
        assert!(CostExplorerReportClient::summarize_results(Some(vec![ResultByTime::default()]))
            .is_empty());
    }
}
