//! Style: values, declarations, the cascade interface and the compute pass.

pub mod cascade;
pub mod compute;
pub mod parse;
pub mod properties;
pub mod values;
