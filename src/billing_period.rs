use std::convert::TryFrom;

use chrono::{Datelike, Local, NaiveDate};
use serde::Serialize;

use crate::error::InfraProxyError;

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Month-to-date window queried for costs: from the first of the month up to and
/// excluding tomorrow, so today's spend is included.
#[derive(Debug, PartialEq, Clone, Copy)]
pub struct BillingPeriod {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

#[derive(Debug, PartialEq, Serialize)]
pub struct FormattedPeriod {
    pub start: String,
    pub end: String,
}

impl TryFrom<NaiveDate> for BillingPeriod {
    type Error = InfraProxyError;

    fn try_from(today: NaiveDate) -> Result<Self, Self::Error> {
        let start = today.with_day(1).ok_or(InfraProxyError::NoneValue)?;
        let end = today.succ_opt().ok_or(InfraProxyError::NoneValue)?;
        Ok(BillingPeriod { start, end })
    }
}

impl BillingPeriod {
    pub fn current() -> Result<Self, InfraProxyError> {
        Self::try_from(Local::now().date_naive())
    }

    pub fn formatted(&self) -> FormattedPeriod {
        FormattedPeriod {
            start: self.start.format(DATE_FORMAT).to_string(),
            end: self.end.format(DATE_FORMAT).to_string(),
        }
    }
}
