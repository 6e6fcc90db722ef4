//! # ferrous-inject
//!
//! Constructor, field and method injection for Rust, with the whole dependency
//! graph validated before anything is built.
//!
//! ## Features
//!
//! - **Injection points**: components declare a constructor, assignable fields
//!   and methods through a [`TypeDescriptor`]
//! - **Inheritance by composition**: members of an embedded base type are
//!   inherited, with overridden methods injected only once
//! - **Eager validation**: unbound and cyclic dependencies are reported by
//!   [`ContextConfig::get_context`], never halfway through building a component
//! - **Trait objects**: components can be bound and resolved as `dyn Trait`
//! - **Thread-safe**: a [`Context`] is an immutable `Arc` snapshot
//!
//! ## Quick Start
//!
//! ```rust
//! use ferrous_inject::{Constructor, ContextConfig, Field, Injectable, Resolver, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Database {
//!     url: String,
//! }
//!
//! struct Audit;
//!
//! struct UserService {
//!     db: Arc<Database>,
//!     audit: Option<Arc<Audit>>,
//! }
//!
//! impl Injectable for UserService {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::new()
//!             .constructor(
//!                 Constructor::with::<Database, _>(|db| UserService { db, audit: None }).inject(),
//!             )
//!             .field(Field::inject::<Audit, _>("audit", |s: &mut UserService, a| s.audit = Some(a)))
//!     }
//! }
//!
//! let mut config = ContextConfig::new();
//! config
//!     .bind_instance(Arc::new(Database { url: "postgres://localhost".to_string() }))?
//!     .bind_instance(Arc::new(Audit))?
//!     .bind::<UserService, UserService>()?;
//!
//! let context = config.get_context()?;
//! let users = context.get_required::<UserService>()?;
//! assert_eq!(users.db.url, "postgres://localhost");
//! assert!(users.audit.is_some());
//! # Ok::<(), ferrous_inject::DiError>(())
//! ```
//!
//! ## Validation
//!
//! ```rust
//! use ferrous_inject::{Constructor, ContextConfig, DiError, Injectable, Key, TypeDescriptor};
//! use std::sync::Arc;
//!
//! struct Chicken { _egg: Arc<Egg> }
//! struct Egg { _chicken: Arc<Chicken> }
//!
//! impl Injectable for Chicken {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::new().constructor(Constructor::with::<Egg, _>(|e| Chicken { _egg: e }).inject())
//!     }
//! }
//! impl Injectable for Egg {
//!     fn describe() -> TypeDescriptor<Self> {
//!         TypeDescriptor::new().constructor(Constructor::with::<Chicken, _>(|c| Egg { _chicken: c }).inject())
//!     }
//! }
//!
//! let mut config = ContextConfig::new();
//! config.bind::<Chicken, Chicken>()?.bind::<Egg, Egg>()?;
//!
//! let cycle = config.get_context().unwrap_err().cycle_set().unwrap();
//! assert!(cycle.contains(&Key::of::<Chicken>()));
//! assert!(cycle.contains(&Key::of::<Egg>()));
//! # Ok::<(), DiError>(())
//! ```

// Module declarations
pub mod collection;
pub mod descriptors;
pub mod error;
pub mod graph_export;
pub mod introspect;
pub mod key;
pub mod observer;
pub mod options;
pub mod provider;
pub mod traits;
pub mod validation;

mod registration;

// Re-exports
pub use collection::ContextConfig;
pub use descriptors::BindingDescriptor;
pub use error::{BoxError, DiError, DiResult, IllegalComponentReason};
pub use graph_export::{GraphEdge, GraphExport, GraphMetadata, GraphNode};
pub use introspect::{
    Arguments, Class, Constructor, Field, InjectionPoint, Injectable, Method, Signature,
    TypeDescriptor,
};
pub use key::{key_of, Key};
pub use observer::{DiObserver, LoggingObserver};
pub use options::{ContextOptions, RebindPolicy};
pub use provider::{ComponentProvider, Context, InjectionProvider, InstanceProvider, ProviderKind};
pub use registration::{erase, AnyArc};
pub use traits::{Implements, Resolver, ResolverCore};
pub use validation::{DependencyGraph, Edge, Node};
