//! Angler Server
//!
//! Self-hosted phishing simulation platform for security awareness teams.
//! Campaigns, target groups, and scenarios are owned by their creator and
//! shared with teams through role-scoped permissions.

pub mod api;
pub mod auth;
pub mod campaigns;
pub mod config;
pub mod db;
pub mod groups;
pub mod permissions;
pub mod scenarios;
pub mod sharing;
pub mod teams;
