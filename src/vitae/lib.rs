//! # Vitae Architecture
//!
//! Vitae keeps resume data (a personal profile, named categories of dated entries,
//! and layout settings) in **one JSON file** that survives crashes, busy files and
//! corruption. It is a library first; the `vitae` binary is one thin client of it.
//!
//! ## The Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI (main.rs, args.rs, print.rs)                           │
//! │  - Parses arguments, prints results, owns exit codes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs)                                         │
//! │  - Thin facade over commands, shared by every client        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Validation and mutation of the document                  │
//! │  - One store update per operation                           │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (store/)                                     │
//! │  - DocumentStore trait                                      │
//! │  - FileStore (production), InMemoryStore (testing)          │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - The file on disk is always either the previous or the next complete document.
//! - Busy files are retried with a bounded, configurable backoff. A write that still
//!   cannot land is an error; a read that cannot succeed degrades to an empty document.
//! - A file that is not valid JSON is copied to a `corrupt_backup_*.json` file and
//!   replaced with defaults, never edited in place.
//! - Each operation holds the store lock from its load to its save, so concurrent
//!   operations in one process do not lose each other's updates.
//!
//! ## Errors
//!
//! Everything returns [`error::Result`]. Bad input is [`error::VitaeError::Rejected`];
//! every other variant means the store itself failed.
//!
//! ## Module Overview
//!
//! - [`api`]: The API facade
//! - [`commands`]: Document operations and their validation
//! - [`store`]: Storage abstraction, file store, retry policies
//! - [`model`]: `Document`, `Profile`, `Entry`, `Categories`
//! - [`settings`]: Display settings and their coercion rules
//! - [`config`]: Layered configuration
//! - [`display`]: Date formatting for presentation
//! - [`logging`]: `tracing` subscriber setup
//! - [`error`]: Error types

pub mod api;
pub mod commands;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod model;
pub mod settings;
pub mod store;
