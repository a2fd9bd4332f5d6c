//! # Fibre DI
//!
//! A name-keyed dependency injection container for Rust.
//!
//! Services are registered under a string name together with a provider: a
//! constructor or factory function plus a description of its parameters. When
//! a service is first requested, the container checks the dependency graph
//! below it for missing and cyclic dependencies, builds every dependency it
//! needs, and caches the result. Each service is built at most once per
//! container.
//!
//! ## Core Concepts
//!
//! - **Container**: the registry of services and the cache of built instances.
//! - **Provider**: a factory together with its [`Param`] list. A parameter asks
//!   for the service named by its annotation, or, without one, for its own name
//!   converted by [`to_service_name`] (`dep_one` asks for `DepOne`).
//! - **Defaults**: a parameter with a default is optional. It is filled from the
//!   container when its service is registered and from the default otherwise.
//! - **Validation**: cycles are reported as [`Error::CyclicDependency`] before
//!   anything is built. Only the graph below the requested service is checked,
//!   unless [`ValidationMode::Eager`] is configured.
//!
//! ## Quick Start
//!
//! ```
//! use fibre_di::{params, Container, Provider};
//! use std::sync::Arc;
//!
//! struct Database {
//!   url: String,
//! }
//!
//! struct UserService {
//!   db: Arc<Database>,
//!   page_size: Arc<usize>,
//! }
//!
//! let container = Container::new();
//! container
//!   .register_instance("DatabaseUrl", String::from("postgres://localhost/app"))
//!   .unwrap();
//! container
//!   .register_class(Provider::constructor(params![database_url], |args| {
//!     let url: Arc<String> = args.arg(0)?;
//!     Ok(Database { url: (*url).clone() })
//!   }))
//!   .unwrap();
//! container
//!   .register(
//!     "UserService",
//!     Provider::function(params![db: "Database", page_size = 20_usize], |mut args| {
//!       Ok(UserService {
//!         db: args.next_arg()?,
//!         page_size: args.next_arg()?,
//!       })
//!     }),
//!   )
//!   .unwrap();
//!
//! let users = container.get_as::<UserService>("UserService").unwrap();
//! assert_eq!(users.db.url, "postgres://localhost/app");
//! assert_eq!(*users.page_size, 20);
//! assert!(Arc::ptr_eq(&users.db, &container.get_as::<Database>("Database").unwrap()));
//! ```

mod config;
mod container;
mod core;
mod error;
mod global;
mod graph;
mod macros;
mod naming;
mod provider;
mod registry;
mod resolver;

pub use config::{ContainerConfig, ValidationMode};
pub use container::Container;
pub use error::{Error, Result};
pub use global::global;
pub use graph::{check_all, check_graph, DependencyNode, NodeTable, Validation};
pub use naming::to_service_name;
pub use provider::{Args, FactoryResult, Injectable, Instance, Param, Provider, ProviderKind};
