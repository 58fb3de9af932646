//! Integration tests for the odorsim CLI
//!
//! Drives the built binary on `.npy` inputs in a temporary directory and
//! checks exit status, stderr and the written outputs.

use ndarray::{Array2, Array3};
use ndarray_npy::{read_npy, write_npy};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::{tempdir, TempDir};

const N_TRIALS: usize = 3;
const N_UNITS: usize = 10;
const N_ODORS: usize = 5;

fn odorsim(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_odorsim"))
        .args(args)
        .output()
        .expect("Failed to execute odorsim")
}

fn assert_success(output: &Output, what: &str) {
    assert!(
        output.status.success(),
        "{} failed: {}",
        what,
        String::from_utf8_lossy(&output.stderr)
    );
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

/// Temp dir holding one random (trial, unit, odor) tensor per name.
fn pseudopop_dir(seed: u64, names: &[&str]) -> TempDir {
    let dir = tempdir().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for name in names {
        let data = Array3::from_shape_simple_fn((N_TRIALS, N_UNITS, N_ODORS), || {
            rng.gen_range(0.0..1.0)
        });
        write_npy(dir.path().join(format!("{}.npy", name)), &data).unwrap();
    }
    dir
}

fn run_neural(input: &Path, out: &Path, extra: &[&str]) -> Output {
    let mut args = vec!["neural", "--input", path_str(input), "--out", path_str(out)];
    args.extend_from_slice(extra);
    odorsim(&args)
}

#[test]
fn test_neural_mean_mode() {
    let dir = pseudopop_dir(1, &["l2"]);
    let out = dir.path().join("l2_dist.npy");
    let output = run_neural(&dir.path().join("l2.npy"), &out, &["--aggregation", "mean"]);
    assert_success(&output, "mean mode");

    let dist: Array2<f64> = read_npy(&out).unwrap();
    assert_eq!(dist.dim(), (N_ODORS, N_ODORS));
    for i in 0..N_ODORS {
        assert_eq!(dist[[i, i]], 0.0);
    }
}

#[test]
fn test_neural_trial_expanded() {
    let dir = pseudopop_dir(2, &["l2"]);
    let out = dir.path().join("l2_trials.npy");
    let output = run_neural(
        &dir.path().join("l2.npy"),
        &out,
        &["--aggregation", "trial-expanded"],
    );
    assert_success(&output, "trial-expanded mode");

    let dist: Array2<f64> = read_npy(&out).unwrap();
    assert_eq!(dist.dim(), (N_ODORS * N_TRIALS, N_ODORS * N_TRIALS));
}

#[test]
fn test_neural_rejects_ambiguous_and_unknown_modes() {
    let dir = pseudopop_dir(3, &["l2"]);
    let input = dir.path().join("l2.npy");

    let out = dir.path().join("trial.npy");
    let output = run_neural(&input, &out, &["--aggregation", "trial"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("explicit fold"));
    assert!(!out.exists());

    let out = dir.path().join("median.npy");
    let output = run_neural(&input, &out, &["--aggregation", "median"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid configuration"));
    assert!(!out.exists());
}

#[test]
fn test_neural_needs_aggregation_source() {
    let dir = pseudopop_dir(4, &["l2"]);
    let out = dir.path().join("none.npy");
    let output = run_neural(&dir.path().join("l2.npy"), &out, &[]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--aggregation is required"));
}

#[test]
fn test_shuffle_seed_is_reproducible() {
    let dir = pseudopop_dir(5, &["l2"]);
    let input = dir.path().join("l2.npy");
    let shuffled = |name: &str, seed: &str| -> Array2<f64> {
        let out = dir.path().join(name);
        let output = run_neural(
            &input,
            &out,
            &["--aggregation", "mean", "--shuffle", "--seed", seed],
        );
        assert_success(&output, "shuffle");
        read_npy(&out).unwrap()
    };
    assert_eq!(shuffled("a.npy", "7"), shuffled("b.npy", "7"));
    assert_ne!(shuffled("c.npy", "7"), shuffled("d.npy", "8"));

    let out = dir.path().join("trial_shuffle.npy");
    let output = run_neural(
        &input,
        &out,
        &["--aggregation", "trial-expanded", "--shuffle"],
    );
    assert!(!output.status.success());
}

#[test]
fn test_saved_config_reloads() {
    let dir = pseudopop_dir(6, &["l3"]);
    let input = dir.path().join("l3.npy");
    let config_path = dir.path().join("run.json");

    let first = dir.path().join("first.npy");
    let output = run_neural(
        &input,
        &first,
        &[
            "--aggregation",
            "trial-block-mean",
            "--metric",
            "cosine",
            "--save-config",
            path_str(&config_path),
        ],
    );
    assert_success(&output, "run with --save-config");

    let saved: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&config_path).unwrap()).unwrap();
    assert_eq!(saved["neural"]["aggregation"]["mode"], "trial");
    assert_eq!(saved["neural"]["aggregation"]["fold"], "block_mean");
    assert_eq!(saved["neural"]["metric"], "cosine");

    // No --aggregation: everything comes from the saved settings
    let second = dir.path().join("second.npy");
    let output = run_neural(&input, &second, &["--config", path_str(&config_path)]);
    assert_success(&output, "run with --config");

    let a: Array2<f64> = read_npy(&first).unwrap();
    let b: Array2<f64> = read_npy(&second).unwrap();
    assert_eq!(a.dim(), (N_ODORS, N_ODORS));
    assert_eq!(a, b);
}

#[test]
fn test_chem_scaling_options() {
    let dir = tempdir().unwrap();
    let mut rng = ChaCha8Rng::seed_from_u64(7);
    let descriptors = Array2::from_shape_simple_fn((N_ODORS, 4), || rng.gen_range(-1.0..1.0));
    let input = dir.path().join("chem.npy");
    write_npy(&input, &descriptors).unwrap();

    let out = dir.path().join("chem_dist.npy");
    let output = odorsim(&[
        "chem",
        "--input",
        path_str(&input),
        "--out",
        path_str(&out),
        "--scaling",
        "standard",
    ]);
    assert_success(&output, "chem");
    let dist: Array2<f64> = read_npy(&out).unwrap();
    assert_eq!(dist.dim(), (N_ODORS, N_ODORS));

    let output = odorsim(&[
        "chem",
        "--input",
        path_str(&input),
        "--out",
        path_str(&dir.path().join("bad.npy")),
        "--scaling",
        "robust",
    ]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown scaling"));
}

#[test]
fn test_heatmaps_and_scatter_write_svg() {
    let pops = pseudopop_dir(8, &["Boutons", "tiled_l2"]);
    let mut rng = ChaCha8Rng::seed_from_u64(9);

    let matrices = tempdir().unwrap();
    let chem_obs = Array2::from_shape_simple_fn((N_ODORS, 4), || rng.gen_range(-1.0..1.0));
    let chem_obs_path = matrices.path().join("chem_obs.npy");
    write_npy(&chem_obs_path, &chem_obs).unwrap();

    let chem_dist: PathBuf = matrices.path().join("global.npy");
    assert_success(
        &odorsim(&[
            "chem",
            "--input",
            path_str(&chem_obs_path),
            "--out",
            path_str(&chem_dist),
        ]),
        "chem",
    );
    assert_success(
        &run_neural(
            &pops.path().join("tiled_l2.npy"),
            &matrices.path().join("global_l2.npy"),
            &["--aggregation", "mean"],
        ),
        "neural",
    );

    let heatmap_svg = matrices.path().join("corrs.svg");
    let output = odorsim(&[
        "heatmaps",
        "--chem-dir",
        path_str(matrices.path()),
        "--neural-dir",
        path_str(matrices.path()),
        "--layers",
        "l2",
        "--groups",
        "global",
        "--out",
        path_str(&heatmap_svg),
    ]);
    assert_success(&output, "heatmaps");
    let svg = std::fs::read_to_string(&heatmap_svg).unwrap();
    assert!(svg.contains("Descriptor odor space"));

    let output = odorsim(&[
        "heatmaps",
        "--chem-dir",
        path_str(matrices.path()),
        "--neural-dir",
        path_str(matrices.path()),
        "--groups",
        "random",
        "--out",
        path_str(&matrices.path().join("bad.svg")),
    ]);
    assert!(!output.status.success());

    let scatter_svg = matrices.path().join("scatter.svg");
    let output = odorsim(&[
        "scatter",
        "--chem",
        path_str(&chem_obs_path),
        "--neural-dir",
        path_str(pops.path()),
        "--keys",
        "Boutons,tiled_l2",
        "--out",
        path_str(&scatter_svg),
    ]);
    assert_success(&output, "scatter");
    let svg = std::fs::read_to_string(&scatter_svg).unwrap();
    assert!(svg.contains("<circle"));
    assert!(svg.contains("PCx L2"));
}
