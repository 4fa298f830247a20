//! Use case layer: the membership coordinator.
//!
//! Translates inbound connection events into registry operations plus the set
//! of outbound notifications, enforcing room-level policy (connection state
//! machine, display-name uniqueness) on top of raw storage.

mod coordinator;
mod error;
mod notification;

pub use coordinator::MembershipCoordinator;
pub use error::CoordinatorError;
pub use notification::{Audience, Notification, OutboundEvent};
