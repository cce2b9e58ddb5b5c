//! Test Module
//!
//! Cross-component tests for the HealthScan engine.
//!
//! ## Test Categories
//! - `engine_tests`: single-text pipeline properties and worked examples
//! - `batch_tests`: batch, row and concurrent batch processing
//! - `sentiment_tests`: strategy selection and ML fallback through the analyzer
//! - `config_tests`: environment-driven configuration

pub mod sentiment_tests;
