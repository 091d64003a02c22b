//! Letter workflow management for Amanat.
//!
//! This module implements the outgoing-letter state machine, the
//! routing-triggered transitions and official letter numbering.
//!
//! # Modules
//!
//! - `types` - Workflow domain types (statuses, LetterRef, WorkflowAction)
//! - `error` - Workflow-specific error types
//! - `routing` - Lookup table for routing-triggered transitions
//! - `numbering` - Official letter number format
//! - `service` - Action transitions and permission checks

pub mod error;
pub mod numbering;
pub mod routing;
pub mod service;
pub mod types;

#[cfg(test)]
mod numbering_props;
#[cfg(test)]
mod routing_props;
#[cfg(test)]
mod service_props;

pub use error::WorkflowError;
pub use numbering::{LetterNumber, month_from_roman, roman_month};
pub use routing::{RoutingRule, RoutingTable};
pub use service::{Recipient, WorkflowService};
pub use types::{
    IncomingStatus, LetterRef, LetterStatus, OutgoingStatus, RoutingStatus, WorkflowAction,
};
