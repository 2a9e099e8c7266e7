// Adapters layer: concrete implementations for external systems (CSV files, geocoding HTTP APIs).

pub mod csv_table;
pub mod mapbox;
pub mod opencage;
pub mod provider;
