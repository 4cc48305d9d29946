//! Integration tests for the Ledframe animation cache

mod cli_run;
mod config_integration;
mod store_integration;
mod sync_engine;
mod test_utils;
