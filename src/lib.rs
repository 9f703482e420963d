//! Credit Risk Dashboard Library
//!
//! Server-rendered dashboard that looks up a loan applicant, queries the
//! remote scoring API and charts the default probability, the applicant's
//! personal attributes and feature distributions.
//!
//! # Modules
//!
//! - `api`: HTTP-facing components.
//! - `core`: Validation, decoding and chart logic.
//! - `integrations`: Remote scoring API integration.
//! - `config`: Configuration management.
//! - `dashboard`: Orchestration of the three scoring API steps.
//! - `dates`: Spreadsheet day-count decoding.
//! - `distribution`: Population histogram chart.
//! - `errors`: Error handling types.
//! - `gauge`: Risk bands, loan decision and gauge chart.
//! - `handlers`: HTTP request handlers and router.
//! - `models`: Domain types and scoring API payloads.
//! - `page`: HTML page rendering.
//! - `reference`: Reference identifier table and guard.
//! - `scoring_client`: Scoring API client.

pub mod api;
pub mod core;
pub mod integrations;

pub mod config;
pub mod dashboard;
pub mod dates;
pub mod distribution;
pub mod errors;
pub mod gauge;
pub mod handlers;
pub mod models;
pub mod page;
pub mod reference;
pub mod scoring_client;
