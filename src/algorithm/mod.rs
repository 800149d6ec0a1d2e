/// Combinations of chosen items and their DNA encoding
pub mod dna;
/// Run orchestration from sampling to packaging
pub mod executor;
/// Weighted item selection and layer validation
pub mod selection;
/// Duplicate detection over accepted DNA
pub mod uniqueness;
