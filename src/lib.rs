//! # Horizon Library
//!
//! Data-freshness and scheduling engine for a home-screen launcher.
//!
//! The library decides, at any moment, which applications can be launched, whether
//! a previously fetched weather reading is still usable, and whether the display
//! should be dark. The `horizon` binary is a thin CLI over it.
//!
//! ## Architecture
//!
//! - **Scheduling**: `geo` computes sunrise/sunset, `schedule` turns a schedule and the
//!   clock into a dark-mode decision and monitors it for transitions
//! - **Catalog**: `catalog` caches the installed applications and reconciles
//!   favorites and label overrides against them
//! - **Weather**: `weather` caches readings per temperature unit in front of a fetcher
//! - **Persistence**: `state` holds favorites, labels and the last weather reading
//! - **Configuration**: `config` for TOML settings with hot reload of the schedule
//! - **Infrastructure**: `time_source` (real and simulated clocks), signal handling,
//!   logging, CLI parsing and command handlers

// Import macros from logger module for use in all submodules
#[macro_use]
pub mod logger;

pub mod args;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod constants;
pub mod geo;
pub mod schedule;
pub mod signals;
pub mod state;
pub mod time_source;
pub mod utils;
pub mod weather;
