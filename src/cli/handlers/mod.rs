pub mod check;
pub mod convert;
pub mod dialects;
pub mod from_json;
pub mod json;
