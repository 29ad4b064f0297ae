//! # synoblock - IP blocklist ingestion for the Synology auto-block database
//!
//! A scheduled administrative tool that reads IP blocklists from local files
//! and remote URLs, validates and canonicalizes every address, and merges the
//! result into the `AutoBlockIP` deny table used by the DSM firewall.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                       synoblock                          │
//! ├──────────────────────────────────────────────────────────┤
//! │  CLI (clap)                                              │
//! │    └── sources, expiry, backup, clear, dry-run flags     │
//! ├──────────────────────────────────────────────────────────┤
//! │  Fetcher (reqwest + rustls, std::fs)                     │
//! │    └── best-effort per source, failures never abort      │
//! ├──────────────────────────────────────────────────────────┤
//! │  Normalizer                                              │
//! │    └── line tokens -> exploded uppercase standard form   │
//! ├──────────────────────────────────────────────────────────┤
//! │  DenyStore (sqlx + sqlite)                               │
//! │    └── purge-expired, clear-all, replace-by-key upsert   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! Sources are read one at a time in a fixed order (local files first, then
//! URLs); a failing source contributes nothing and the run continues. All
//! database mutations of a run happen inside one transaction. Dry runs open
//! the database read-only and only execute the counting steps.
//!
//! ## Modules
//!
//! - [`backup`] - Timestamped copy of the database file before mutation
//! - [`cli`] - Command-line interface definitions and validation
//! - [`db`] - Deny-list store access and reconciliation
//! - [`expiry`] - Per-run expiration stamping
//! - [`fetcher`] - Local and remote blocklist readers
//! - [`normalizer`] - Tokenization and address canonicalization
//! - [`run`] - Orchestration of one update pass

pub mod backup;
pub mod cli;
pub mod db;
pub mod error;
pub mod expiry;
pub mod fetcher;
pub mod normalizer;
pub mod run;

pub use cli::Cli;
pub use error::SynoblockError;
