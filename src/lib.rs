pub mod aggregate;
pub mod events;
pub mod export;
pub mod insights;
pub mod report;
pub mod settings;
pub mod stats;
pub mod synthetic;
pub mod zones;
