//! Subscription Operations
//!
//! Admission and cancellation of subscriptions.

pub mod events;
pub mod admit;
pub mod cancel;

pub use events::*;
pub use admit::{AdmitSubscriptionCommand, AdmitSubscriptionUseCase};
pub use cancel::{CancelSubscriptionCommand, CancelSubscriptionUseCase};
