/// Error types shared by the collector and the parser.
pub mod error;

/// `key=value` stats output parser.
pub mod parser;

/// The `DataProducer` trait implemented by collectors.
pub mod traits;

/// Result alias for collector operations.
pub mod types;

/// `unbound-control` command construction and execution.
pub mod unbound;
