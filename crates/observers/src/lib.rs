//! Reusable observers for the carbon solvers.
//!
//! This crate provides [`Observer`] implementations and capability traits that
//! work across solvers.
//!
//! # Modules
//!
//! - [`traits`]: Capability traits for cross-solver observers
//!   ([`HasObjective`], [`HasIteration`], [`HasViolation`], [`CanStopEarly`],
//!   [`CanAssumeWorse`])
//! - [`TracingObserver`]: logs solver progress through `tracing` and enforces
//!   an optional iteration budget
//!
//! [`Observer`]: carbon_core::Observer
//! [`HasObjective`]: traits::HasObjective
//! [`HasIteration`]: traits::HasIteration
//! [`HasViolation`]: traits::HasViolation
//! [`CanStopEarly`]: traits::CanStopEarly
//! [`CanAssumeWorse`]: traits::CanAssumeWorse

pub mod traits;

mod tracing_observer;

pub use tracing_observer::TracingObserver;
