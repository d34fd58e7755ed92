//! Listed - a local business directory with a multi-step onboarding wizard.
//!
//! Businesses register through a session-backed, server-validated wizard
//! that enforces step ordering, keeps partial data across requests, and
//! creates a pending listing only at final submission. Admins review
//! pending listings; only approved ones appear on the public surface.

pub mod config;
pub mod directory;
pub mod logging;
pub mod rest;
pub mod schema;
pub mod telemetry;
pub mod wizard;
