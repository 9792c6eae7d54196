use serde::{Deserialize, Serialize};

use crate::error::SizeLimitError;

pub const DEFAULT_MAX_VARIABLES: usize = 16;

/// Row counts are `2^n` in a `usize`, so no configuration may go past this.
pub const HARD_MAX_VARIABLES: usize = usize::BITS as usize - 1;

/// Tunables for table construction. Deserializes from partial objects, missing
/// fields fall back to their defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    /// Largest number of distinct atomic symbols a table may enumerate.
    pub max_variables: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_variables: DEFAULT_MAX_VARIABLES,
        }
    }
}

impl EngineConfig {
    pub fn with_max_variables(max_variables: usize) -> Self {
        Self { max_variables }
    }

    /// The limit actually enforced: the configured one, capped at [`HARD_MAX_VARIABLES`].
    pub fn limit(&self) -> usize {
        self.max_variables.min(HARD_MAX_VARIABLES)
    }

    pub fn check_size(&self, variables: usize) -> Result<(), SizeLimitError> {
        let limit = self.limit();

        if variables > limit {
            tracing::warn!(variables, limit, "truth table too large");

            return Err(SizeLimitError { variables, limit });
        }

        Ok(())
    }
}
