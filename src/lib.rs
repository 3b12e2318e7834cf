//! Absence Engine for HR absence tracking
//!
//! This crate resolves vacations, sick notes, public holidays and working-time
//! rules into per-half-day absence states, and renders them as a flat
//! absence listing and as a colspan-based calendar overview.

#![warn(missing_docs)]

pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod models;
pub mod projection;
pub mod provider;
pub mod resolution;
pub mod service;
