//! Integration layer - collaborator contracts.
//!
//! This module defines the interfaces the core expects its external
//! collaborators to implement:
//! - Outbound actions (the transport/RPC side)
//! - Key-value state (the persistence side)

pub mod action;
pub mod store;

pub use action::{
    ActionClient, ActionError, ActionResult, BoxedActionClient, Permission, RejectReason, SendOpts,
};
pub use store::{BoxedStore, KeyValueStore, StoreError, StoreResult};
