pub mod billing_period;
pub mod config;
pub mod control_request;
pub mod cost;
pub mod cost_explorer_client;
pub mod cost_reporter;
pub mod ec2_instance_client;
pub mod error;
pub mod instance;
pub mod instance_controller;
pub mod instance_lister;
pub mod response;

#[cfg(test)]
mod test_support;
