//! PostgreSQL plumbing shared by the e-shop crates
//!
//! - connection pool setup from [`postgres::PostgresConfig`], with retry and backoff
//! - migration runner for any `MigratorTrait`
//! - `SELECT 1` health probe used by the readiness endpoint
//! - [`BaseRepository`], a thin generic wrapper for primary-key CRUD on SeaORM entities
//!
//! # Features
//!
//! - `postgres` (default) - SeaORM connector, health, repository
//! - `config` - `core_config::FromEnv` for `PostgresConfig`
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_from_config_with_retry(PostgresConfig::from_env()?, None).await?;
//! postgres::run_migrations::<migration::Migrator>(&db, "eshop_api").await?;
//! ```

pub mod common;

#[cfg(feature = "postgres")]
pub mod postgres;

#[cfg(feature = "postgres")]
pub mod repository;

pub use common::{DatabaseError, DatabaseResult};

#[cfg(feature = "postgres")]
pub use repository::BaseRepository;
