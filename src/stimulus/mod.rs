mod application;
mod boundary;
mod payloads;

pub use application::LoanApplication;
pub use boundary::{
    exact_length_string, over_length_string, FormatCheck, NumericBoundary, ENUM_FIELDS,
    FORMAT_CHECKS, LENGTH_LIMITS, NUMERIC_BOUNDARIES,
};
pub use payloads::{SpecialCharCase, SPECIAL_CHARACTER_CASES};
