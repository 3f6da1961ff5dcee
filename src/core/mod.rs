//! Sample data model shared by every report component.

pub mod sample;
pub mod value;

pub use sample::{ColumnNames, SampleRecord, SampleSet, Stratum};
pub use value::{format_number, parse_number, RawValue};
