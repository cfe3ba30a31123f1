//! Features Module - request decoding and feature encoding
//!
//! Raw positional input → `ClinicalRecord` → one-hot `FeatureVector` → scaled.

pub mod layout;
pub mod record;
pub mod vector;
pub mod encoder;

// Re-export common types
pub use record::EncodingError;
pub use encoder::NumericTransform;
