//! Library entrypoint for tickwatch.
//!
//! This file exists mainly to make testing easy (integration tests under
//! `tests/` can import the app state, router, stores and the conversation
//! engine).

use std::sync::Arc;

pub mod auth;
pub mod config;
pub mod models;

pub mod services;

pub mod controllers;
pub mod routes;

use services::alert_store::AlertStore;
use services::feed::PriceFeed;
use services::flow_manager::FlowManager;
use services::telegram::Notifier;

/// Shared application state. Cloned freely: the stores are behind `Arc`,
/// and the feed/notifier are trait objects so tests can swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub alerts: Arc<AlertStore>,
    pub flows: Arc<FlowManager>,
    pub feed: Arc<dyn PriceFeed>,
    pub notifier: Arc<dyn Notifier>,
}
