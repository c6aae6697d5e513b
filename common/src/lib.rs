//! FinTrack Common Types
//!
//! This crate contains types shared across FinTrack, including currency
//! codes and the reference currency catalog, the observable state cell used
//! for push-based views, and time helpers.

pub mod currency;
pub mod observable;
pub mod time;

pub use currency::*;
pub use observable::{Observable, Subscription};
pub use time::*;
