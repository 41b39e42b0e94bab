//! Service layer: multi-step operations that span core rules and the store.

pub mod checkout;

pub use checkout::{checkout, CheckoutRequest};
