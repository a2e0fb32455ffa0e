//! Build layer table
//!
//! Packages are grouped into dependency tiers: every package in a tier only
//! depends on packages from earlier tiers. The table is data, not code; a
//! project can replace the built-in one with a `solidum.layers.yaml` file:
//!
//! ```yaml
//! layers:
//!   - ["@sldm/utils"]
//!   - ["@sldm/testing", "@sldm/core"]
//! ```

use crate::error::{ConfigError, PlanError};
use crate::orchestrator::{Job, Layer, Plan};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use tracing::debug;

/// Optional override file in the project root
pub const LAYERS_FILE: &str = "solidum.layers.yaml";

/// Built-in dependency tiers of the framework packages
const DEFAULT_LAYERS: &[&[&str]] = &[
    // No dependencies
    &["@sldm/utils"],
    // Depends on utils
    &["@sldm/testing", "@sldm/core"],
    // Depends on core
    &[
        "@sldm/debug",
        "@sldm/ui",
        "@sldm/ui-chalk",
        "@sldm/router",
        "@sldm/store",
        "@sldm/context",
    ],
    // Depends on multiple packages
    &["@sldm/ssr", "@sldm/storage", "@sldm/integrations"],
    &["@sldm/dev-reports"],
];

/// Ordered package tiers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildLayers {
    pub layers: Vec<Vec<String>>,
}

impl Default for BuildLayers {
    fn default() -> Self {
        Self {
            layers: DEFAULT_LAYERS
                .iter()
                .map(|layer| layer.iter().map(|pkg| pkg.to_string()).collect())
                .collect(),
        }
    }
}

impl BuildLayers {
    /// Parse and validate a YAML layer table
    pub fn from_yaml(content: &str, path: &Path) -> Result<Self, ConfigError> {
        let layers: BuildLayers =
            serde_yaml::from_str(content).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        layers.validate()?;
        Ok(layers)
    }

    /// Load `solidum.layers.yaml` from `root`, or fall back to the built-in table
    pub fn load(root: &Path) -> Result<Self, ConfigError> {
        let path = root.join(LAYERS_FILE);
        if !path.is_file() {
            debug!("no {} found, using built-in build layers", LAYERS_FILE);
            return Ok(Self::default());
        }

        debug!(path = %path.display(), "loading build layers");
        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        Self::from_yaml(&content, &path)
    }

    /// Reject empty names and packages listed more than once
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (index, layer) in self.layers.iter().enumerate() {
            for package in layer {
                if package.trim().is_empty() {
                    return Err(ConfigError::EmptyPackageName(index + 1));
                }
                if !seen.insert(package.as_str()) {
                    return Err(ConfigError::DuplicatePackage(package.clone()));
                }
            }
        }
        Ok(())
    }

    pub fn package_count(&self) -> usize {
        self.layers.iter().map(Vec::len).sum()
    }

    /// Turn the table into a plan, one job per package
    pub fn to_plan<F>(&self, mut make_job: F) -> Result<Plan, PlanError>
    where
        F: FnMut(&str) -> Job,
    {
        let layers = self
            .layers
            .iter()
            .map(|packages| Layer::new(packages.iter().map(|pkg| make_job(pkg)).collect()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Plan::new(layers))
    }
}
