//! Dataset model, loading, indexing and synthetic generation

mod data;
mod index;
pub mod loader;
pub mod generator;

#[cfg(test)]
pub(crate) mod fixtures;

pub use data::{
    growth_rate, ClaimCountRow, ClaimMovement, ClaimRecord, Dataset, MethodScore, MethodType,
    PremiumRow, RecordType, UltimateEstimate,
};
pub use index::DatasetIndex;
pub use loader::{load_dataset, load_dataset_from_reader, load_records_csv, load_records_from_reader};
pub use generator::{generate_dataset, GeneratorConfig};
