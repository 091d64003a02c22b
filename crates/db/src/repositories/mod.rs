//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every state-changing letter operation runs in one transaction and writes
//! its activity log entry inside it.

mod letter;

pub mod activity;
pub mod attachment;
pub mod dashboard;
pub mod disposition;
pub mod incoming;
pub mod notification;
pub mod outgoing;
pub mod sequence;
pub mod user;
pub mod workflow;

pub use activity::ActivityRepository;
pub use attachment::LampiranRepository;
pub use dashboard::DashboardRepository;
pub use disposition::{DispositionRepository, RouteInput};
pub use incoming::{
    CreateIncomingInput, IncomingFilter, IncomingLetterRepository, UpdateIncomingInput,
};
pub use notification::NotificationRepository;
pub use outgoing::{
    CreateOutgoingInput, OutgoingFilter, OutgoingLetterRepository, UpdateOutgoingInput,
};
pub use sequence::SequenceRepository;
pub use user::{CreateUserInput, UpdateUserInput, UserFilter, UserRepository};
pub use workflow::{SIGN_MAX_ATTEMPTS, SignInput, ValidateInput, WorkflowRepository};
