#![warn(rust_2018_idioms)]

pub mod adapter;
pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod handler;
pub mod healthcheck;
pub mod model;
pub mod pipeline;
pub mod port;
#[cfg(any(test, feature = "test-support"))]
#[doc(hidden)]
pub mod test_support;
pub mod view;

pub use healthcheck::{healthcheck, healthcheck_with_port};
