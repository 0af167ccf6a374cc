//! Domain types for the approval workflow engine
//!
//! An approval workflow attaches a multi-step, condition-gated review
//! process to arbitrary business documents. The engine reads a document,
//! resolves the workflow definition bound to its collection, and advances
//! the document through ordered steps as authorized users approve,
//! reject, or comment.
//!
//! # Key Concepts
//!
//! - **WorkflowDefinition**: A named, ordered sequence of [`Step`]s bound
//!   to one document collection. At most one active definition exists per
//!   collection.
//! - **Step**: One stage of a workflow, with an assignment rule
//!   ([`Assignment`]) and entry conditions ([`Condition`]). Step order
//!   numbers are strictly increasing and form the traversal path.
//! - **WorkflowState**: The workflow fields carried by a governed
//!   document — its status and current step. Mutated only through the
//!   transition engine, never directly.
//! - **WorkflowLogEntry**: One immutable audit record per accepted
//!   transition. Created once, never updated.
//!
//! # Design Principles
//!
//! 1. Assignment kinds and step types are closed enums — invalid
//!    combinations are unrepresentable.
//! 2. Condition operators are a closed tagged union with exhaustive
//!    matching, not stringly-typed dispatch.
//! 3. Terminal states (`Completed`, `Rejected`) accept no further
//!    transitions.

#![deny(unsafe_code)]

mod action;
mod condition;
mod definition;
mod document;
mod errors;
mod identity;
mod log;

pub use action::*;
pub use condition::*;
pub use definition::*;
pub use document::*;
pub use errors::*;
pub use identity::*;
pub use log::*;
