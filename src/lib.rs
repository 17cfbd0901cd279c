//! nri-unbound: Unbound DNS resolver statistics for infrastructure monitoring
//!
//! A single run loads the integration config, executes
//! `unbound-control stats`, parses its `key=value` output and prints one
//! protocol-v4 JSON payload describing the resolver entity and its metrics.
//! It is meant to be scheduled by an external agent.
//!
//! ## Modules
//!
//! * `config`: TOML configuration for instance settings and logging, loaded from
//!   `NRI_UNBOUND_CONFIG` or the fixed integration path and validated with
//!   the `validator` crate.
//!
//! * `core`: collection runtime:
//!   - `unbound-control` invocation with a deadline
//!   - Stats output parser
//!   - Payload model and JSON emitter
//!   - Single-pass pipeline and process exit codes
//!
//! * `logger`: `tracing` subscriber setup. Console output goes to standard
//!   error in compact, pretty, or JSON format, with optional systemd
//!   journald integration.
//!
//! ## Features
//!
//! * `journald`: Enables the journald logging layer on Unix (default: enabled).

pub mod config;
pub mod core;
pub mod logger;
