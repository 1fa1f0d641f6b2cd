//! Test Module
//!
//! Test suite for the chatbot core.
//!
//! ## Test Categories
//! - `preprocessing_tests`: normalization, sequence encoding, dataset splitting
//! - `chatbot_tests`: storage, training, adapters and response selection
//! - `relay_tests`: SMS webhook and health endpoint
//! - `config_tests`: environment configuration loading and validation
//! - `seq2seq_tests`: model topology, parameter counts, persistence

pub mod chatbot_tests;
