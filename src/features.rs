//! Feature vector assembly.
//!
//! The tree was fitted on columns in a specific order. Column names are
//! optional in the export and checked against this order when present, so an
//! export without them relies entirely on [`FEATURE_ORDER`].
//! [`FeatureVector::from_application`] is the only place a vector is built
//! from a request.

use crate::models::LoanApplication;

/// Number of inputs the tree expects.
pub const FEATURE_COUNT: usize = 11;

/// One input column of the loan model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Gender,
    Married,
    Dependents,
    Education,
    SelfEmployed,
    ApplicantIncome,
    CoapplicantIncome,
    LoanAmount,
    LoanTerm,
    CreditHistory,
    PropertyArea,
}

/// Training-time column order.
pub const FEATURE_ORDER: [Feature; FEATURE_COUNT] = [
    Feature::Gender,
    Feature::Married,
    Feature::Dependents,
    Feature::Education,
    Feature::SelfEmployed,
    Feature::ApplicantIncome,
    Feature::CoapplicantIncome,
    Feature::LoanAmount,
    Feature::LoanTerm,
    Feature::CreditHistory,
    Feature::PropertyArea,
];

impl Feature {
    /// JSON field name of this column.
    pub fn name(&self) -> &'static str {
        match self {
            Feature::Gender => "gender",
            Feature::Married => "married",
            Feature::Dependents => "dependents",
            Feature::Education => "education",
            Feature::SelfEmployed => "self_employed",
            Feature::ApplicantIncome => "applicant_income",
            Feature::CoapplicantIncome => "coapplicant_income",
            Feature::LoanAmount => "loan_amount",
            Feature::LoanTerm => "loan_term",
            Feature::CreditHistory => "credit_history",
            Feature::PropertyArea => "property_area",
        }
    }

    fn value(&self, app: &LoanApplication) -> f64 {
        match self {
            Feature::Gender => app.gender as f64,
            Feature::Married => app.married as f64,
            Feature::Dependents => app.dependents as f64,
            Feature::Education => app.education as f64,
            Feature::SelfEmployed => app.self_employed as f64,
            Feature::ApplicantIncome => app.applicant_income,
            Feature::CoapplicantIncome => app.coapplicant_income,
            Feature::LoanAmount => app.loan_amount,
            Feature::LoanTerm => app.loan_term,
            Feature::CreditHistory => app.credit_history,
            Feature::PropertyArea => app.property_area as f64,
        }
    }
}

/// Column names in training order.
pub fn feature_names() -> Vec<String> {
    FEATURE_ORDER.iter().map(|f| f.name().to_string()).collect()
}

/// A single row of model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; FEATURE_COUNT]);

impl FeatureVector {
    pub fn from_application(app: &LoanApplication) -> Self {
        let mut values = [0.0; FEATURE_COUNT];
        for (slot, feature) in values.iter_mut().zip(FEATURE_ORDER.iter()) {
            *slot = feature.value(app);
        }
        Self(values)
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }
}

impl From<[f64; FEATURE_COUNT]> for FeatureVector {
    fn from(values: [f64; FEATURE_COUNT]) -> Self {
        Self(values)
    }
}
