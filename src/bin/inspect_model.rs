//! Utility to inspect a decision tree artifact and optionally run one prediction.
//!
//! Usage: `inspect_model [ARTIFACT] [--features v0,v1,...,v10]`
//!
//! The artifact defaults to `MODEL_PATH`, then to the file next to the executable.

use dotenvy::dotenv;
use loan_dt_api::features::{FeatureVector, FEATURE_COUNT, FEATURE_ORDER};
use loan_dt_api::model_store::{default_model_path, LoadedModel};
use std::env;
use std::path::PathBuf;

/// Parsed command line.
#[derive(Debug, Default, PartialEq)]
struct Args {
    path: Option<PathBuf>,
    features: Option<[f64; FEATURE_COUNT]>,
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();

    let args = parse_args(env::args().skip(1))?;
    let path = args
        .path
        .or_else(|| env::var("MODEL_PATH").ok().map(PathBuf::from))
        .unwrap_or_else(default_model_path);

    let model = LoadedModel::from_path(&path)?;
    let info = model.info();

    println!("Artifact: {}", info.path);
    println!("SHA-256:  {}", info.sha256);
    println!(
        "Nodes:    {} ({} leaves, depth {})",
        info.node_count, info.leaf_count, info.depth
    );
    println!("Classes:  {:?}", info.classes);
    println!("Features:");
    for (i, feature) in FEATURE_ORDER.iter().enumerate() {
        println!("  {:>2}: {}", i, feature.name());
    }

    if let Some(values) = args.features {
        let status = model.predict(&FeatureVector::from(values))?;
        println!();
        println!("Prediction: {}", status.as_str());
    }

    Ok(())
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<Args> {
    let mut parsed = Args::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        if arg == "--features" {
            let raw = args
                .next()
                .ok_or_else(|| anyhow::anyhow!("--features needs a value"))?;
            parsed.features = Some(parse_features(&raw)?);
        } else if parsed.path.is_none() {
            parsed.path = Some(PathBuf::from(arg));
        } else {
            anyhow::bail!("Unexpected argument: {}", arg);
        }
    }
    Ok(parsed)
}

fn parse_features(raw: &str) -> anyhow::Result<[f64; FEATURE_COUNT]> {
    let parsed = raw
        .split(',')
        .map(|v| v.trim().parse::<f64>())
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| anyhow::anyhow!("Invalid feature value: {}", e))?;

    parsed.try_into().map_err(|v: Vec<f64>| {
        anyhow::anyhow!("Expected {} features, got {}", FEATURE_COUNT, v.len())
    })
}
