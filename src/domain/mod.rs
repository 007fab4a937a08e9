// Closed-form pricing and curve helpers
pub mod analytics;

// Port interfaces
pub mod ports;

// Request and result records
pub mod types;

// Domain-specific error types
pub mod errors;
