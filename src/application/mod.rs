pub mod api;

// Tabular views over API results
pub mod tables;
