pub mod api;
pub mod config;
pub mod crawler;
pub mod domain;
pub mod error;
pub mod extractor;
pub mod findings;
pub mod http_client;
pub mod narrator;
pub mod orchestrator;
pub mod translator;
pub mod url_norm;
pub mod validate;
