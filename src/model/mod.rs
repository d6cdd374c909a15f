//! Core data structures for the two representations of a filament network.
//!
//! - [`types`] – Point and identifier aliases plus small vector helpers.
//! - [`fiber`] – Continuous polylines ([`Fiber`]) and their snapshot ([`FiberState`]).
//! - [`monomer`] – Discrete particles linked into topologies ([`MonomerState`]).
//!
//! Neither state is mutated piecewise: a [`FiberState`] is replaced wholesale after
//! each fiber-engine step, while a [`MonomerState`] only changes through
//! [`MonomerUpdate`](crate::MonomerUpdate) application.
//!
//! [`Fiber`]: fiber::Fiber
//! [`FiberState`]: fiber::FiberState
//! [`MonomerState`]: monomer::MonomerState

pub mod fiber;
pub mod monomer;
pub mod types;
