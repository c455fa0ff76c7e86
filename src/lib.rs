pub mod aggregate;
pub mod catalog;
pub mod clusters;
pub mod config;
pub mod eligibility;
pub mod error;
pub mod grades;
pub mod output;
pub mod report;
pub mod results;
pub mod server;
