use std::error::Error;

use once_cell::sync::Lazy;
use regex::Regex;
use rusoto_ce::GetCostAndUsageError;
use rusoto_core::RusotoError;
use rusoto_ec2::{DescribeInstancesError, StartInstancesError, StopInstancesError};
use serde_json::Value;
use std::fmt;
use std::fmt::{Display, Formatter};

static XML_ERROR_MESSAGE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<Message>(.*?)</Message>").expect("valid message pattern"));

/// Failure of a provider call. The `Display` output is what callers see under `error`.
#[derive(Debug, PartialEq)]
pub enum InfraProxyError {
    NoneValue,
    DescribeInstancesError(RusotoError<DescribeInstancesError>),
    StartInstancesError(RusotoError<StartInstancesError>),
    StopInstancesError(RusotoError<StopInstancesError>),
    GetCostAndUsageError(RusotoError<GetCostAndUsageError>),
}

impl Display for InfraProxyError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            InfraProxyError::NoneValue => write!(f, "Value is None"),
            InfraProxyError::DescribeInstancesError(ref error) => provider_message(error, f),
            InfraProxyError::StartInstancesError(ref error) => provider_message(error, f),
            InfraProxyError::StopInstancesError(ref error) => provider_message(error, f),
            InfraProxyError::GetCostAndUsageError(ref error) => provider_message(error, f),
        }
    }
}

/// Errors rusoto has no variant for come back as `Unknown` with the raw response body.
/// Those are reduced to the message the provider put in the body.
fn provider_message<E: Error + 'static>(error: &RusotoError<E>, f: &mut Formatter) -> fmt::Result {
    match error {
        RusotoError::Unknown(response) => match error_body_message(&response.body) {
            Some(message) => write!(f, "{}", message),
            None => Display::fmt(error, f),
        },
        _ => Display::fmt(error, f),
    }
}

/// Message of an EC2 (`<Errors><Error><Message>`) or JSON-protocol (`Message` /
/// `message`) error body.
fn error_body_message(body: &[u8]) -> Option<String> {
    let body = std::str::from_utf8(body).ok()?.trim();
    if body.starts_with('{') {
        let json: Value = serde_json::from_str(body).ok()?;
        return json
            .get("Message")
            .or_else(|| json.get("message"))
            .and_then(Value::as_str)
            .map(|message| message.to_string());
    }
    XML_ERROR_MESSAGE
        .captures(body)
        .map(|captures| unescape_xml(captures[1].trim()))
}

fn unescape_xml(text: &str) -> String {
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&apos;", "'")
        .replace("&amp;", "&")
}

impl Error for InfraProxyError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match *self {
            InfraProxyError::DescribeInstancesError(ref error) => Some(error),
            InfraProxyError::StartInstancesError(ref error) => Some(error),
            InfraProxyError::StopInstancesError(ref error) => Some(error),
            InfraProxyError::GetCostAndUsageError(ref error) => Some(error),
            _ => None,
        }
    }
}

impl From<RusotoError<DescribeInstancesError>> for InfraProxyError {
    fn from(e: RusotoError<DescribeInstancesError>) -> InfraProxyError {
        InfraProxyError::DescribeInstancesError(e)
    }
}

impl From<RusotoError<StartInstancesError>> for InfraProxyError {
    fn from(e: RusotoError<StartInstancesError>) -> InfraProxyError {
        InfraProxyError::StartInstancesError(e)
    }
}

impl From<RusotoError<StopInstancesError>> for InfraProxyError {
    fn from(e: RusotoError<StopInstancesError>) -> InfraProxyError {
        InfraProxyError::StopInstancesError(e)
    }
}

impl From<RusotoError<GetCostAndUsageError>> for InfraProxyError {
    fn from(e: RusotoError<GetCostAndUsageError>) -> InfraProxyError {
        InfraProxyError::GetCostAndUsageError(e)
    }
}

/// Rejection of a start/stop request before any provider call. `Display` is the
/// message returned with HTTP 400.
#[derive(Debug, PartialEq)]
pub enum ControlRequestError {
    InvalidJsonBody,
    MissingInstanceId,
    InvalidAction,
}

impl Display for ControlRequestError {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        match *self {
            ControlRequestError::InvalidJsonBody => write!(f, "Invalid JSON body"),
            ControlRequestError::MissingInstanceId => {
                write!(f, "Missing required parameter: instanceId")
            }
            ControlRequestError::InvalidAction => {
                write!(f, "Invalid action. Provide 'action': 'start' or 'stop'.")
            }
        }
    }
}

impl Error for ControlRequestError {}
