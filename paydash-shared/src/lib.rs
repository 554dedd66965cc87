#![cfg_attr(not(test), forbid(unsafe_code))]
#![deny(warnings, clippy::pedantic)]
#![allow(clippy::module_name_repetitions, clippy::multiple_crate_versions)]

//! Wire models and configuration shared by the `PayDash` client library and CLI.

pub mod config;
pub mod models;
