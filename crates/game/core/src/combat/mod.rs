//! Bite resolution.
//!
//! Pure functions deciding who loses how many bones when a bite lands. The
//! arena calls [`apply_bite`] once per swing, on the first victim found.
//!
//! # Core Functions
//!
//! - `resolve_bite`: fatal vs partial outcome and drop counts
//! - `is_in_front`: facing gate for the bite
//! - `apply_bite`: knockback plus resource loss on the victim
mod resolve;

pub use resolve::{BiteOutcome, apply_bite, drop_count, is_in_front, resolve_bite, roll_drop_fraction};
