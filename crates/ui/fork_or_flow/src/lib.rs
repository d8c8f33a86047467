//! Fork or Flow: a terminal client for a community of people figuring out
//! whether they want kids.
//!
//! The interesting part is navigation: onboarding, four tabs and detail
//! overlays, all driven by `core::reducer` over `core::state`. Everything a
//! screen does beyond that (likes, RSVPs, drafts) is local and forgotten when
//! the screen goes away.

pub mod action;
pub mod cli;
pub mod components;
pub mod config;
pub mod core;
pub mod data;
pub mod errors;
pub mod screens;
pub mod theme;
pub mod tui;
pub mod ui;
