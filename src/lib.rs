//! Child care fee-gap estimator for Australian long day care.
//!
//! This crate estimates what a family pays out of pocket once the Child Care
//! Subsidy and, where the child is enrolled in a state-funded preschool or
//! kindergarten program, the ACT, NSW, QLD or VIC top-up have been applied.
//! The calculators work on a single day or a full fortnight and are exposed
//! over HTTP by the [`api`] module.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod config;
pub mod error;
pub mod models;
