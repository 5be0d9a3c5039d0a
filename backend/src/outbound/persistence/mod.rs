//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! This module provides concrete implementations of domain repository ports
//! backed by PostgreSQL via the Diesel ORM with async support through
//! `diesel-async` and `bb8` connection pooling.
//!
//! # Architecture
//!
//! - **Thin adapters**: Repository implementations only translate between
//!   Diesel models and domain types. No business logic resides here.
//! - **Internal models**: Diesel row structs (`models.rs`) and schema
//!   definitions (`schema.rs`) are internal implementation details, never
//!   exposed to the domain layer.
//! - **Atomic units**: every multi-table write runs in one transaction, and
//!   every store operation runs under the pool's deadline.
//! - **Constraint-driven errors**: uniqueness and reference failures are
//!   recognised by constraint name and mapped to port error variants.
//!
//! # Example
//!
//! ```no_run
//! use atomfit::outbound::persistence::{DbPool, DieselAccountRepository, PoolConfig};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = PoolConfig::new("postgres://localhost/atomfit");
//! let pool = DbPool::new(config).await?;
//! let accounts = DieselAccountRepository::new(pool);
//! # let _ = accounts;
//! # Ok(())
//! # }
//! ```

mod diesel_account_repository;
mod diesel_catalogue_repository;
mod diesel_helpers;
mod diesel_listing_repository;
mod diesel_social_repository;
mod diesel_weight_repository;
mod migrations;
mod models;
mod pool;
mod schema;
mod storage_failure;

pub use diesel_account_repository::DieselAccountRepository;
pub use diesel_catalogue_repository::DieselCatalogueRepository;
pub use diesel_listing_repository::DieselListingRepository;
pub use diesel_social_repository::DieselSocialRepository;
pub use diesel_weight_repository::DieselWeightRepository;
pub use migrations::{MIGRATIONS, MigrationError, run_migrations, run_migrations_async};
pub use pool::{DbPool, PoolConfig, PoolError};
