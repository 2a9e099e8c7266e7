pub mod etl;

pub use crate::domain::model::{
    Coordinates, EnrichmentResult, GeocodeOutcome, InputRow, OutcomeCounts, OutputColumns,
    OutputRow,
};
pub use crate::domain::ports::{ConfigProvider, Geocoder, Pipeline, Storage};
pub use crate::utils::error::Result;
