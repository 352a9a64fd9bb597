//! # car-types
//!
//! Record types for the carsync remote car collection.
//!
//! This crate provides the foundational types used across all carsync crates:
//! - [`CarId`] - Store-assigned identity
//! - [`Car`], [`Quantity`], [`Dataset`] - Records as the store returns them
//! - [`CarDraft`], [`CarFields`] - Form input and its validated form
//! - [`ValidationError`] - Why a draft cannot be written

#![warn(missing_docs)]
#![warn(clippy::all)]

mod car;
mod draft;
mod error;
mod ids;

pub use car::{Car, CarFields, Dataset, Quantity};
pub use draft::CarDraft;
pub use error::ValidationError;
pub use ids::CarId;
