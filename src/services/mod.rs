//! Flows that span the store and the outbound collaborators

pub mod auth;
pub mod payment;
