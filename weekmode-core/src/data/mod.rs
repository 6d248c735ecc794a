//! Price data: providers and ingest validation

pub mod csv_import;
pub mod ingest;
pub mod provider;
pub mod yahoo;

pub use csv_import::CsvProvider;
pub use ingest::{ingest, validate_bars};
pub use provider::{
    DataError, DataSource, FetchResult, PriceProvider, StaticProvider, TrailingWindow,
};
pub use yahoo::YahooProvider;
