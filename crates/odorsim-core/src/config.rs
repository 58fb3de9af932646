//! Configuration records for distance computation and figure layout.
//!
//! Every knob that changes a scientific result is an explicit field here.
//! String forms (CLI flags, JSON) go through `FromStr`, which rejects
//! unknown names instead of falling back to a default.

use crate::errors::{OdorsimError, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

// =============================================================================
// METRIC
// =============================================================================

/// Pairwise distance metric.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// 1 - Pearson correlation, in [0, 2]
    #[default]
    Correlation,
    /// 1 - cosine similarity, in [0, 2]
    Cosine,
    /// L2 distance
    Euclidean,
    /// L1 distance
    Cityblock,
}

impl Metric {
    /// True for metrics whose values are bounded to [0, 2].
    pub fn is_similarity_based(&self) -> bool {
        matches!(self, Metric::Correlation | Metric::Cosine)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Correlation => "correlation",
            Metric::Cosine => "cosine",
            Metric::Euclidean => "euclidean",
            Metric::Cityblock => "cityblock",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = OdorsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "correlation" => Ok(Metric::Correlation),
            "cosine" => Ok(Metric::Cosine),
            "euclidean" | "l2" => Ok(Metric::Euclidean),
            "cityblock" | "manhattan" | "l1" => Ok(Metric::Cityblock),
            other => Err(OdorsimError::config(format!(
                "unknown distance metric '{}' (expected correlation, cosine, euclidean or cityblock)",
                other
            ))),
        }
    }
}

// =============================================================================
// AGGREGATION
// =============================================================================

/// How trial replicates fold back after trial-mode distance computation.
///
/// There is no default: trial mode callers must say which matrix they want.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrialFold {
    /// Keep the full (odors*trials) x (odors*trials) replicate matrix
    Expanded,
    /// Average each trials x trials block into one odor x odor entry
    BlockMean,
}

/// How the trial axis of a pseudopopulation is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Aggregation {
    /// Average across trials before computing distances
    Mean,
    /// Every trial is its own replicate column
    Trial { fold: TrialFold },
}

impl Aggregation {
    pub fn is_mean(&self) -> bool {
        matches!(self, Aggregation::Mean)
    }
}

impl fmt::Display for Aggregation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Aggregation::Mean => f.write_str("mean"),
            Aggregation::Trial { fold: TrialFold::Expanded } => f.write_str("trial-expanded"),
            Aggregation::Trial { fold: TrialFold::BlockMean } => f.write_str("trial-block-mean"),
        }
    }
}

impl FromStr for Aggregation {
    type Err = OdorsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mean" => Ok(Aggregation::Mean),
            "trial-expanded" => Ok(Aggregation::Trial {
                fold: TrialFold::Expanded,
            }),
            "trial-block-mean" => Ok(Aggregation::Trial {
                fold: TrialFold::BlockMean,
            }),
            "trial" => Err(OdorsimError::config(
                "trial aggregation needs an explicit fold: use 'trial-expanded' or 'trial-block-mean'",
            )),
            other => Err(OdorsimError::config(format!(
                "unknown aggregation mode '{}' (expected mean, trial-expanded or trial-block-mean)",
                other
            ))),
        }
    }
}

// =============================================================================
// DISTANCE CONFIGS
// =============================================================================

/// Per-column standardization applied before chemical distances.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnScaling {
    /// Subtract each column's mean
    pub with_mean: bool,
    /// Divide each column by its population standard deviation
    pub with_std: bool,
}

impl ColumnScaling {
    /// Center and scale to unit variance.
    pub fn standard() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }

    /// Center only.
    pub fn centered() -> Self {
        Self {
            with_mean: true,
            with_std: false,
        }
    }
}

/// Chemical distance configuration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChemDistanceConfig {
    /// Independent per-descriptor scaling; `None` uses the raw values
    pub scaling: Option<ColumnScaling>,
    /// Distance metric
    pub metric: Metric,
}

impl Default for ChemDistanceConfig {
    fn default() -> Self {
        Self {
            scaling: Some(ColumnScaling::centered()),
            metric: Metric::Correlation,
        }
    }
}

/// Neural distance configuration.
///
/// No `Default`: the aggregation mode must always be chosen by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NeuralDistanceConfig {
    pub aggregation: Aggregation,
    pub metric: Metric,
    /// Permute each unit's responses independently (mean mode only)
    #[serde(default)]
    pub shuffle: bool,
}

impl NeuralDistanceConfig {
    pub fn new(aggregation: Aggregation) -> Self {
        Self {
            aggregation,
            metric: Metric::Correlation,
            shuffle: false,
        }
    }

    pub fn with_metric(mut self, metric: Metric) -> Self {
        self.metric = metric;
        self
    }

    pub fn shuffled(mut self) -> Self {
        self.shuffle = true;
        self
    }

    /// Reject combinations that have no defined meaning.
    pub fn validate(&self) -> Result<()> {
        if self.shuffle && !self.aggregation.is_mean() {
            return Err(OdorsimError::config(format!(
                "shuffling is only defined for mean aggregation, got '{}'",
                self.aggregation
            )));
        }
        Ok(())
    }
}

// =============================================================================
// ODOR-SET GROUPING
// =============================================================================

/// Number of sorted odor positions covered by the structural overlay.
pub const OVERLAY_EXTENT: usize = 22;

/// Odor-set grouping scheme used for structural overlay lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OdorSetGrouping {
    /// No subdivisions
    Global,
    /// Boundaries at 4, 7, 11, 14, 18
    Clustered,
    /// Boundaries at 5, 11, 16
    Tiled,
}

impl OdorSetGrouping {
    /// Subdivision boundaries, in sorted odor index units.
    pub fn boundaries(&self) -> &'static [usize] {
        match self {
            OdorSetGrouping::Global => &[],
            OdorSetGrouping::Clustered => &[4, 7, 11, 14, 18],
            OdorSetGrouping::Tiled => &[5, 11, 16],
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            OdorSetGrouping::Global => "global",
            OdorSetGrouping::Clustered => "clustered",
            OdorSetGrouping::Tiled => "tiled",
        }
    }

    /// Display label for row headings ("global" -> "Global").
    pub fn title(&self) -> String {
        title_case(self.name())
    }
}

impl fmt::Display for OdorSetGrouping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OdorSetGrouping {
    type Err = OdorsimError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "global" => Ok(OdorSetGrouping::Global),
            "clustered" => Ok(OdorSetGrouping::Clustered),
            "tiled" => Ok(OdorSetGrouping::Tiled),
            other => Err(OdorsimError::config(format!(
                "unknown odor-set grouping '{}' (expected global, clustered or tiled)",
                other
            ))),
        }
    }
}

/// Upper-case the first letter of every whitespace/underscore separated word.
pub fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}

// =============================================================================
// RUN CONFIG (CLI)
// =============================================================================

/// Serialized run settings, loadable from JSON by the CLI.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunConfig {
    #[serde(default)]
    pub chem: ChemDistanceConfig,
    #[serde(default)]
    pub neural: Option<NeuralDistanceConfig>,
    /// Layer keys, one neural column each
    #[serde(default = "default_layers")]
    pub layers: Vec<String>,
    /// Odor-set groupings, one figure row each
    #[serde(default = "default_groups")]
    pub groups: Vec<OdorSetGrouping>,
    /// Keys plotted by the scatter grid
    #[serde(default = "default_scatter_keys")]
    pub scatter_keys: Vec<String>,
    /// Seed for shuffle controls
    #[serde(default = "default_seed")]
    pub seed: u64,
}

fn default_layers() -> Vec<String> {
    vec!["l2".to_string(), "l3".to_string()]
}

fn default_groups() -> Vec<OdorSetGrouping> {
    vec![
        OdorSetGrouping::Global,
        OdorSetGrouping::Clustered,
        OdorSetGrouping::Tiled,
    ]
}

/// Comparison keys plotted by the scatter grid unless the caller picks their own.
pub fn default_scatter_keys() -> Vec<String> {
    ["Boutons", "tiled_l2", "tiled_l3", "Model", "TeLC L2", "TeLC L3"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_seed() -> u64 {
    42
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            chem: ChemDistanceConfig::default(),
            neural: None,
            layers: default_layers(),
            groups: default_groups(),
            scatter_keys: default_scatter_keys(),
            seed: default_seed(),
        }
    }
}

impl RunConfig {
    /// Parse a run config from JSON text.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        if let Some(neural) = &config.neural {
            neural.validate()?;
        }
        Ok(config)
    }

    /// Load a run config from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json(&json)?;
        info!("Loaded run config from {}", path.display());
        Ok(config)
    }
}
