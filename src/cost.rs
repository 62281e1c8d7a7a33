use serde::Serialize;

#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceCost {
    pub service_name: String,
    /// Decimal amount with exactly four fractional digits.
    pub amount: String,
    pub unit: String,
}
