//! The checkout/payment-handoff flow.
//!
//! Payment is a two-phase protocol split by a full redirect to the
//! provider's hosted page. Phase one ([`initiator`]) creates the backend
//! order and persists everything needed to resume; phase two ([`result`])
//! reconstructs the attempt purely from persisted state plus the redirect
//! query parameters. Nothing in memory survives the boundary.

pub mod initiator;
pub mod result;

pub use initiator::{CheckoutOutcome, start_checkout};
pub use result::{Destination, FailParams, SuccessOutcome, SuccessParams, handle_fail, handle_success};
