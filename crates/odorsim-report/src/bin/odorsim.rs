//! odorsim CLI Entry Point
//!
//! ```
//! odorsim chem --input descriptors.npy --out chem_dist.npy
//! odorsim neural --input l2.npy --aggregation mean --shuffle --seed 7 --out l2_dist.npy
//! odorsim heatmaps --chem-dir dist/chem --neural-dir dist/neural --out corrs.svg
//! odorsim scatter --chem descriptors_subset.npy --neural-dir pops/ --out scatter.svg
//! ```
//!
//! Matrices are `.npy` files of f64. Heatmap inputs are finished
//! dissimilarity matrices named `{group}.npy` (chemical) and
//! `{group}_{layer}.npy` (neural). Scatter inputs are raw pseudopopulations
//! named `{key}.npy`, shaped (trial, unit, odor).

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use log::info;
use ndarray::{Array2, ArrayD};
use ndarray_npy::{read_npy, write_npy};
use rand::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};

use odorsim_core::{
    Aggregation, ColumnScaling, KeyedMatrices, KeyedPseudopopulations, Metric,
    NeuralDistanceConfig, OdorSetGrouping, Pseudopopulation, RunConfig,
};
use odorsim_dist::{chem_dist_mat, neural_dist_mat};
use odorsim_report::{heatmap_grid, neural_key, scatter_dist, to_svg};

/// odorsim: chemical vs neural odor dissimilarity
#[derive(Parser, Debug)]
#[command(name = "odorsim")]
#[command(version)]
#[command(about = "Compare chemical and neural odor dissimilarity structure", long_about = None)]
struct Cli {
    /// Run settings JSON; command-line flags override it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Write the resolved run settings to this JSON file
    #[arg(long, global = true)]
    save_config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Chemical dissimilarity matrix from an (odor, descriptor) matrix
    Chem(ChemArgs),

    /// Neural dissimilarity matrix from a (trial, unit, odor) pseudopopulation
    Neural(NeuralArgs),

    /// Heatmap comparison grid from finished dissimilarity matrices
    Heatmaps(HeatmapArgs),

    /// Neural vs chemical distance scatter grid
    Scatter(ScatterArgs),
}

#[derive(Parser, Debug)]
struct ChemArgs {
    /// Descriptor matrix, rows are odors
    #[arg(long, required = true)]
    input: PathBuf,

    /// Output .npy path
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,

    /// Distance metric (correlation, cosine, euclidean, cityblock)
    #[arg(long)]
    metric: Option<String>,

    /// Column scaling: centered, standard or none
    #[arg(long)]
    scaling: Option<String>,
}

#[derive(Parser, Debug)]
struct NeuralArgs {
    /// Pseudopopulation tensor, shaped (trial, unit, odor)
    #[arg(long, required = true)]
    input: PathBuf,

    /// Output .npy path
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,

    /// Aggregation: mean, trial-expanded or trial-block-mean
    #[arg(long)]
    aggregation: Option<String>,

    /// Distance metric (correlation, cosine, euclidean, cityblock)
    #[arg(long)]
    metric: Option<String>,

    /// Shuffle each unit's odor responses independently (mean only)
    #[arg(long)]
    shuffle: bool,

    /// Seed for the shuffle control
    #[arg(long)]
    seed: Option<u64>,
}

#[derive(Parser, Debug)]
struct HeatmapArgs {
    /// Directory holding `{group}.npy` chemical matrices
    #[arg(long, required = true)]
    chem_dir: PathBuf,

    /// Directory holding `{group}_{layer}.npy` neural matrices
    #[arg(long, required = true)]
    neural_dir: PathBuf,

    /// Layer keys, comma-separated
    #[arg(long, value_delimiter = ',')]
    layers: Option<Vec<String>>,

    /// Odor-set groupings, comma-separated
    #[arg(long, value_delimiter = ',')]
    groups: Option<Vec<String>>,

    /// Output .svg path
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,
}

#[derive(Parser, Debug)]
struct ScatterArgs {
    /// Chemical observation matrix for the shared odor subset
    #[arg(long, required = true)]
    chem: PathBuf,

    /// Directory holding `{key}.npy` pseudopopulations
    #[arg(long, required = true)]
    neural_dir: PathBuf,

    /// Comparison keys, comma-separated
    #[arg(long, value_delimiter = ',')]
    keys: Option<Vec<String>>,

    /// Output .svg path
    #[arg(long, short = 'o', required = true)]
    out: PathBuf,
}

fn main() -> Result<()> {
    // Initialize logging
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => RunConfig::load(path)
            .with_context(|| format!("Failed to load run config {}", path.display()))?,
        None => RunConfig::default(),
    };

    match cli.command {
        Commands::Chem(args) => run_chem(args, &mut config)?,
        Commands::Neural(args) => run_neural(args, &mut config)?,
        Commands::Heatmaps(args) => run_heatmaps(args, &mut config)?,
        Commands::Scatter(args) => run_scatter(args, &mut config)?,
    }

    if let Some(path) = &cli.save_config {
        let json = serde_json::to_string_pretty(&config)?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        info!("Saved run settings to {}", path.display());
    }
    Ok(())
}

fn run_chem(args: ChemArgs, config: &mut RunConfig) -> Result<()> {
    if let Some(metric) = &args.metric {
        config.chem.metric = metric.parse::<Metric>()?;
    }
    if let Some(scaling) = &args.scaling {
        config.chem.scaling = parse_scaling(scaling)?;
    }

    let descriptors = load_matrix(&args.input)?;
    info!(
        "Chemical input: {} odors x {} descriptors",
        descriptors.nrows(),
        descriptors.ncols()
    );
    let dist = chem_dist_mat(&descriptors.view(), &config.chem)?;
    write_npy(&args.out, &dist)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    info!("Wrote {}x{} matrix to {}", dist.nrows(), dist.ncols(), args.out.display());
    Ok(())
}

fn run_neural(args: NeuralArgs, config: &mut RunConfig) -> Result<()> {
    let mut neural = match (&args.aggregation, config.neural) {
        (Some(mode), base) => {
            let aggregation = mode.parse::<Aggregation>()?;
            match base {
                Some(base) => NeuralDistanceConfig { aggregation, ..base },
                None => NeuralDistanceConfig::new(aggregation),
            }
        }
        (None, Some(base)) => base,
        (None, None) => bail!("--aggregation is required when the run config has no neural section"),
    };
    if let Some(metric) = &args.metric {
        neural.metric = metric.parse::<Metric>()?;
    }
    if args.shuffle {
        neural = neural.shuffled();
    }
    if let Some(seed) = args.seed {
        config.seed = seed;
    }
    neural.validate()?;
    config.neural = Some(neural);

    let pseudopop = load_pseudopopulation(&args.input)?;
    let mut chacha = ChaCha8Rng::seed_from_u64(config.seed);
    let rng = if neural.shuffle {
        info!("Shuffle control with seed {}", config.seed);
        Some(&mut chacha as &mut dyn RngCore)
    } else {
        None
    };
    let dist = neural_dist_mat(&pseudopop, &neural, rng)?;
    write_npy(&args.out, &dist)
        .with_context(|| format!("Failed to write {}", args.out.display()))?;
    info!("Wrote {}x{} matrix to {}", dist.nrows(), dist.ncols(), args.out.display());
    Ok(())
}

fn run_heatmaps(args: HeatmapArgs, config: &mut RunConfig) -> Result<()> {
    if let Some(layers) = args.layers {
        config.layers = layers;
    }
    if let Some(groups) = &args.groups {
        config.groups = groups
            .iter()
            .map(|g| g.trim().parse::<OdorSetGrouping>())
            .collect::<odorsim_core::Result<Vec<_>>>()?;
    }

    let mut chem = KeyedMatrices::new();
    let mut neural = KeyedMatrices::new();
    for group in &config.groups {
        chem.insert(
            group.name().to_string(),
            load_matrix(&args.chem_dir.join(format!("{}.npy", group.name())))?,
        );
        for layer in &config.layers {
            let key = neural_key(*group, layer);
            let matrix = load_matrix(&args.neural_dir.join(format!("{}.npy", key)))?;
            neural.insert(key, matrix);
        }
    }

    let figure = heatmap_grid(&chem, &neural, &config.layers, &config.groups)?;
    write_svg(&args.out, &to_svg(&figure)?)
}

fn run_scatter(args: ScatterArgs, config: &mut RunConfig) -> Result<()> {
    if let Some(keys) = args.keys {
        config.scatter_keys = keys;
    }

    let chem = load_matrix(&args.chem)?;
    let mut neural = KeyedPseudopopulations::new();
    for key in &config.scatter_keys {
        let path = args.neural_dir.join(format!("{}.npy", key));
        neural.insert(key.clone(), load_pseudopopulation(&path)?);
    }

    let figure = scatter_dist(&chem.view(), &neural, &config.scatter_keys)?;
    write_svg(&args.out, &to_svg(&figure)?)
}

fn parse_scaling(s: &str) -> Result<Option<ColumnScaling>> {
    match s {
        "centered" => Ok(Some(ColumnScaling::centered())),
        "standard" => Ok(Some(ColumnScaling::standard())),
        "none" => Ok(None),
        other => bail!(
            "Unknown scaling '{}' (expected centered, standard or none)",
            other
        ),
    }
}

fn load_matrix(path: &Path) -> Result<Array2<f64>> {
    let matrix: Array2<f64> =
        read_npy(path).with_context(|| format!("Failed to read matrix {}", path.display()))?;
    Ok(matrix)
}

fn load_pseudopopulation(path: &Path) -> Result<Pseudopopulation> {
    let data: ArrayD<f64> = read_npy(path)
        .with_context(|| format!("Failed to read pseudopopulation {}", path.display()))?;
    let pseudopop = Pseudopopulation::from_dyn(data)
        .with_context(|| format!("Invalid pseudopopulation in {}", path.display()))?;
    info!(
        "Loaded {}: {} trials x {} units x {} odors",
        path.display(),
        pseudopop.n_trials(),
        pseudopop.n_units(),
        pseudopop.n_odors()
    );
    Ok(pseudopop)
}

fn write_svg(path: &Path, svg: &str) -> Result<()> {
    std::fs::write(path, svg).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
