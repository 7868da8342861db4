//! # Application Module
//!
//! Application services orchestrating the domain and outbound ports.

pub mod resolver;
pub mod service;

pub use resolver::{resolve_document, ResolvedDocument};
pub use service::IdentityOwner;
