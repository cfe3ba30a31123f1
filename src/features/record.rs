//! Clinical Record - decoded form of the positional request array
//!
//! Input positions:
//! `[Age, Sex, ChestPainType, RestingBP, Cholesterol, FastingBS,
//!   RestingECG, MaxHR, ExerciseAngina, Oldpeak, ST_Slope]`

use serde_json::Value;

use super::layout::CategoricalField;

/// Number of values in a raw request array
pub const RAW_INPUT_LEN: usize = 11;

// ============================================================================
// ERRORS
// ============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EncodingError {
    #[error("expected {expected} input values, got {actual}")]
    WrongLength { expected: usize, actual: usize },

    #[error("input[{index}] ({field}) must be a number")]
    NotNumeric { field: &'static str, index: usize },

    #[error("input[{index}] ({field}) must be an integer category code")]
    NotInteger { field: &'static str, index: usize },

    #[error("input[{index}] ({field}) category code {code} is out of range 0..{len}")]
    CodeOutOfRange {
        field: &'static str,
        index: usize,
        code: i128,
        len: usize,
    },
}

// ============================================================================
// CATEGORICAL FIELDS
// ============================================================================

/// Categorical value decoded from an integer code
pub trait Categorical: Sized + Copy + 'static {
    const FIELD: CategoricalField;

    /// Labels in code order (code `i` decodes to `VARIANTS[i]`)
    const VARIANTS: &'static [Self];

    /// Label used in the training column names
    fn label(&self) -> &'static str;

    fn from_code(code: usize) -> Option<Self> {
        Self::VARIANTS.get(code).copied()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sex {
    Female,
    Male,
}

impl Sex {
    /// Anything other than exactly 1 is female
    pub fn from_flag(value: f64) -> Self {
        if value == 1.0 { Sex::Male } else { Sex::Female }
    }
}

impl Categorical for Sex {
    const FIELD: CategoricalField = CategoricalField::Sex;
    const VARIANTS: &'static [Self] = &[Sex::Female, Sex::Male];

    fn label(&self) -> &'static str {
        match self {
            Sex::Female => "F",
            Sex::Male => "M",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChestPainType {
    TypicalAngina,
    AtypicalAngina,
    NonAnginalPain,
    Asymptomatic,
}

impl Categorical for ChestPainType {
    const FIELD: CategoricalField = CategoricalField::ChestPainType;
    const VARIANTS: &'static [Self] = &[
        ChestPainType::TypicalAngina,
        ChestPainType::AtypicalAngina,
        ChestPainType::NonAnginalPain,
        ChestPainType::Asymptomatic,
    ];

    fn label(&self) -> &'static str {
        match self {
            ChestPainType::TypicalAngina => "TA",
            ChestPainType::AtypicalAngina => "ATA",
            ChestPainType::NonAnginalPain => "NAP",
            ChestPainType::Asymptomatic => "ASY",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestingEcg {
    Normal,
    StTAbnormality,
    LeftVentricularHypertrophy,
}

impl Categorical for RestingEcg {
    const FIELD: CategoricalField = CategoricalField::RestingEcg;
    const VARIANTS: &'static [Self] = &[
        RestingEcg::Normal,
        RestingEcg::StTAbnormality,
        RestingEcg::LeftVentricularHypertrophy,
    ];

    fn label(&self) -> &'static str {
        match self {
            RestingEcg::Normal => "Normal",
            RestingEcg::StTAbnormality => "ST",
            RestingEcg::LeftVentricularHypertrophy => "LVH",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseAngina {
    No,
    Yes,
}

impl ExerciseAngina {
    /// Anything other than exactly 1 is "no"
    pub fn from_flag(value: f64) -> Self {
        if value == 1.0 { ExerciseAngina::Yes } else { ExerciseAngina::No }
    }
}

impl Categorical for ExerciseAngina {
    const FIELD: CategoricalField = CategoricalField::ExerciseAngina;
    const VARIANTS: &'static [Self] = &[ExerciseAngina::No, ExerciseAngina::Yes];

    fn label(&self) -> &'static str {
        match self {
            ExerciseAngina::No => "N",
            ExerciseAngina::Yes => "Y",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

impl Categorical for StSlope {
    const FIELD: CategoricalField = CategoricalField::StSlope;
    const VARIANTS: &'static [Self] = &[StSlope::Up, StSlope::Flat, StSlope::Down];

    fn label(&self) -> &'static str {
        match self {
            StSlope::Up => "Up",
            StSlope::Flat => "Flat",
            StSlope::Down => "Down",
        }
    }
}

// ============================================================================
// CLINICAL RECORD
// ============================================================================

/// One patient's values with categorical codes resolved
#[derive(Debug, Clone, PartialEq)]
pub struct ClinicalRecord {
    pub age: f64,
    pub sex: Sex,
    pub chest_pain_type: ChestPainType,
    pub resting_bp: f64,
    pub cholesterol: f64,
    pub fasting_bs: f64,
    pub resting_ecg: RestingEcg,
    pub max_hr: f64,
    pub exercise_angina: ExerciseAngina,
    pub oldpeak: f64,
    pub st_slope: StSlope,
}

impl ClinicalRecord {
    /// Decode the positional request array
    pub fn from_raw(raw: &[Value]) -> Result<Self, EncodingError> {
        if raw.len() != RAW_INPUT_LEN {
            return Err(EncodingError::WrongLength {
                expected: RAW_INPUT_LEN,
                actual: raw.len(),
            });
        }

        Ok(Self {
            age: number(raw, 0, "Age")?,
            sex: Sex::from_flag(number(raw, 1, "Sex")?),
            chest_pain_type: category(raw, 2, "ChestPainType")?,
            resting_bp: number(raw, 3, "RestingBP")?,
            cholesterol: number(raw, 4, "Cholesterol")?,
            fasting_bs: number(raw, 5, "FastingBS")?,
            resting_ecg: category(raw, 6, "RestingECG")?,
            max_hr: number(raw, 7, "MaxHR")?,
            exercise_angina: ExerciseAngina::from_flag(number(raw, 8, "ExerciseAngina")?),
            oldpeak: number(raw, 9, "Oldpeak")?,
            st_slope: category(raw, 10, "ST_Slope")?,
        })
    }

    /// (field, label) pairs for one-hot expansion
    pub fn categorical_labels(&self) -> [(CategoricalField, &'static str); 5] {
        [
            (Sex::FIELD, self.sex.label()),
            (ChestPainType::FIELD, self.chest_pain_type.label()),
            (RestingEcg::FIELD, self.resting_ecg.label()),
            (ExerciseAngina::FIELD, self.exercise_angina.label()),
            (StSlope::FIELD, self.st_slope.label()),
        ]
    }
}

fn number(raw: &[Value], index: usize, field: &'static str) -> Result<f64, EncodingError> {
    raw[index]
        .as_f64()
        .ok_or(EncodingError::NotNumeric { field, index })
}

fn category<T: Categorical>(
    raw: &[Value],
    index: usize,
    field: &'static str,
) -> Result<T, EncodingError> {
    let value = &raw[index];
    if !value.is_number() {
        return Err(EncodingError::NotNumeric { field, index });
    }

    // u64 covers integers above i64::MAX
    let code = value
        .as_i64()
        .map(i128::from)
        .or_else(|| value.as_u64().map(i128::from))
        .ok_or(EncodingError::NotInteger { field, index })?;

    usize::try_from(code)
        .ok()
        .and_then(T::from_code)
        .ok_or(EncodingError::CodeOutOfRange {
            field,
            index,
            code,
            len: T::VARIANTS.len(),
        })
}

// ============================================================================
// TESTS
// ============================================================================
