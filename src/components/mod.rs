//! UI components.

pub mod smoke_field;
