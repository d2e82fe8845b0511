//! Demo data seeding options.

use std::fmt;

use clap::Args;
use serde::{Deserialize, Serialize};

/// Controls creation of the demo account at startup.
#[derive(Clone, Args, Serialize, Deserialize)]
pub struct SeedConfig {
    /// Create a demo account before serving.
    #[arg(long, env = "SEED", default_value_t = false)]
    pub seed: bool,

    /// Password of the seeded account.
    #[arg(
        long = "seed-password",
        env = "SEED_PASSWORD",
        default_value = "hello123",
        hide_env_values = true
    )]
    #[serde(skip_serializing)]
    pub seed_password: String,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            seed: false,
            seed_password: "hello123".to_owned(),
        }
    }
}

impl fmt::Debug for SeedConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SeedConfig")
            .field("seed", &self.seed)
            .field("seed_password", &"***")
            .finish()
    }
}
