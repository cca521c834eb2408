//! Tax-year tables, engine settings and logging for the `tax-engine` tool.

pub mod loader;
pub mod logging;
pub mod settings;

pub use loader::{
    StandardDeductionRecord, TableLoadError, TaxBracketRecord, TaxTableLoader, YearParameters,
};
pub use settings::{EngineSettings, SettingsError};
