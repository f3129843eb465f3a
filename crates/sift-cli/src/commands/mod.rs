//! Command implementations.

pub mod audit;
pub mod profile;
pub mod query;

use std::path::Path;

use sift::{AnthropicProvider, Gateway, MockProvider, SiftError};

use crate::cli::ProviderChoice;

/// Build a gateway for the chosen provider.
///
/// The mock provider is scripted with a single empty reply, so offline
/// runs exercise the full pipeline and report "nothing to suggest".
pub fn build_gateway(provider: ProviderChoice) -> Result<Gateway, Box<dyn std::error::Error>> {
    match provider {
        ProviderChoice::Anthropic => Ok(Gateway::new(AnthropicProvider::from_env()?)),
        ProviderChoice::Mock => Ok(Gateway::new(MockProvider::new().reply_with("{}"))),
    }
}

/// Read a data file, tagging failures with the offending path.
pub fn read_data_file(file: &Path) -> Result<String, Box<dyn std::error::Error>> {
    std::fs::read_to_string(file).map_err(|source| {
        SiftError::Io {
            path: file.to_path_buf(),
            source,
        }
        .into()
    })
}
