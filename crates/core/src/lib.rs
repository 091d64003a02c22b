//! Core business logic for Amanat.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and transitions live here.
//!
//! # Modules
//!
//! - `auth` - Roles, the acting user and password hashing
//! - `workflow` - Letter statuses, routing table, numbering and transitions
//! - `attachment` - Letter attachments
//! - `dashboard` - Dashboard summary types

pub mod attachment;
pub mod auth;
pub mod dashboard;
pub mod workflow;
