//! Core traits for the dependency injection container.

mod implements;
mod resolver;

pub use implements::Implements;
pub use resolver::{Resolver, ResolverCore};
