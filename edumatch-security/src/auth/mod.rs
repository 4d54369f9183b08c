//! Authorization
//!
//! Role hierarchy used to gate role-restricted views.

pub mod role;

pub use role::Role;
