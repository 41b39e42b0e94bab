//! # minimart-db: Persistence Layer for the Mini-Market POS
//!
//! This crate owns every read and write of shop data. It offers the
//! [`Store`] capability trait with two implementations: [`Database`]
//! (SQLite via sqlx) and [`MemoryStore`] (in-process, for tests).
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Mini-Market POS Data Flow                           │
//! │                                                                         │
//! │  HTTP handler (POST /api/sales)                                        │
//! │       │  state.store()?.commit_sale(&draft)                            │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                   minimart-db (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Store       │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │  (store.rs)   │───►│  product.rs   │    │  (embedded)  │  │   │
//! │  │   │               │    │  student.rs   │    │              │  │   │
//! │  │   │ Database      │    │  sale.rs      │    │ 001_init.sql │  │   │
//! │  │   │ MemoryStore   │    └───────┬───────┘    └──────────────┘  │   │
//! │  │   └───────────────┘            │                               │   │
//! │  └────────────────────────────────┼────────────────────────────────┘   │
//! │                                   ▼                                     │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │   products · students · sales · sale_items                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - SQLite repositories (product, student, sale)
//! - [`store`] - The `Store` trait and its SQLite implementation
//! - [`memory`] - The in-memory `Store`
//!
//! ## Usage
//!
//! ```rust,ignore
//! use minimart_db::{Database, DbConfig, Store};
//!
//! let db = Database::new(DbConfig::from_url("sqlite://minimart.db")).await?;
//! let products = db.list_active_products(Some("milk")).await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod memory;
pub mod migrations;
pub mod pool;
pub mod repository;
pub mod store;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use memory::MemoryStore;
pub use pool::{Database, DbConfig};
pub use store::Store;

// Repository re-exports for convenience
pub use repository::product::ProductRepository;
pub use repository::sale::SaleRepository;
pub use repository::student::StudentRepository;
