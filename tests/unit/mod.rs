//! Unit-level tests against the library's public API

mod config_test;
mod forecaster_test;
