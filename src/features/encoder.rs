//! Feature Encoder
//!
//! Clinical record → one-hot vector → scaled vector.
//! Pure functions, no state. The scaler is passed in.

use serde_json::Value;

use super::layout::{one_hot_column, SCALED_COUNT, SCALED_INDICES};
use super::record::{ClinicalRecord, EncodingError};
use super::vector::FeatureVector;

/// Transform over the numeric columns, in `SCALED_COLUMNS` order
pub trait NumericTransform {
    fn transform(&self, values: &mut [f64; SCALED_COUNT]);
}

/// Build the unscaled 20-column vector
///
/// Labels without a column in the one-hot table leave every sibling at 0.
pub fn encode(record: &ClinicalRecord) -> FeatureVector {
    let mut vector = FeatureVector::new();

    vector.set_by_name("Age", record.age);
    vector.set_by_name("RestingBP", record.resting_bp);
    vector.set_by_name("Cholesterol", record.cholesterol);
    vector.set_by_name("FastingBS", record.fasting_bs);
    vector.set_by_name("MaxHR", record.max_hr);
    vector.set_by_name("Oldpeak", record.oldpeak);

    for (field, label) in record.categorical_labels() {
        match one_hot_column(field, label) {
            Some(index) => vector.set(index, 1.0),
            None => tracing::warn!("No column for {}_{}, leaving indicators at 0", field.prefix(), label),
        }
    }

    vector
}

/// Replace the numeric columns with scaled values, in place
pub fn apply_scaler<T: NumericTransform + ?Sized>(vector: &mut FeatureVector, scaler: &T) {
    let mut numeric = SCALED_INDICES.map(|i| vector.values[i]);
    scaler.transform(&mut numeric);

    for (index, value) in SCALED_INDICES.into_iter().zip(numeric) {
        vector.values[index] = value;
    }
}

/// Encode and scale a decoded record
pub fn encode_scaled<T: NumericTransform + ?Sized>(record: &ClinicalRecord, scaler: &T) -> FeatureVector {
    let mut vector = encode(record);
    apply_scaler(&mut vector, scaler);
    vector
}

/// Decode, encode and scale a raw request array
pub fn encode_raw<T: NumericTransform + ?Sized>(
    raw: &[Value],
    scaler: &T,
) -> Result<FeatureVector, EncodingError> {
    let record = ClinicalRecord::from_raw(raw)?;
    Ok(encode_scaled(&record, scaler))
}
