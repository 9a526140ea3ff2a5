//! # timetally
//!
//! Client core of a Telegram Mini App for scheduling group events.
//!
//! ## Features
//! - Month calendar with per-date time slots and repeat templates
//! - Polls (single or multiple choice) and exclusive bookings
//! - Edit diffs that keep server slot ids stable
//! - Optimistic updates after voting, finalizing and unfinalizing
//! - Invitation deep links and a calendar export companion server

/// Backend REST client and wire types
pub mod api;
/// Configuration management and environment variables
pub mod config;
/// Calendar export: Google Calendar links, `.ics` files and the companion server
pub mod export;
/// Screen flows driving the host and the backend
pub mod flows;
/// Telegram WebApp host abstraction and start-parameter routing
pub mod host;
/// English and Russian UI strings
pub mod i18n;
/// Calendar, slot, template, diff and voting model
pub mod scheduling;
/// Invitation links
pub mod share;
/// Utility functions for datetime, validation, feedback and logging
pub mod utils;
