use anyhow::{Context, Result};
use comfy_table::Table;
use tracing::info;

use icu_cli::pipeline::{BatchPaths, BatchRun, run_batch};
use icu_ingest::{TableFormat, load_label_options};
use icu_model::{LabelChannel, LabelOptions, WindowPolicy};

use crate::cli::{BatchArgs, ChannelsArgs, OutputFormatArg, WindowPolicyArg};
use crate::summary::apply_table_style;
use crate::types::BatchResult;

pub fn run_label_batch(args: &BatchArgs) -> Result<BatchResult> {
    let mut options = load_options(args.config.as_deref())?;
    if let Some(policy) = args.window_policy {
        options = options.with_window_policy(match policy {
            WindowPolicyArg::AnyFailure => WindowPolicy::AnyFailure,
            WindowPolicyArg::OnsetOnly => WindowPolicy::OnsetOnly,
        });
    }
    let run = BatchRun {
        paths: BatchPaths {
            imputed_dir: args.imputed_dir.clone(),
            endpoint_dir: args.endpoint_dir.clone(),
            static_table: args.static_table.clone(),
            label_dir: args.label_dir.clone(),
            severity_maps: args.severity_maps.clone(),
        },
        batch_idx: args.batch_idx,
        format: match args.format {
            OutputFormatArg::Parquet => TableFormat::Parquet,
            OutputFormatArg::Csv => TableFormat::Csv,
        },
        dry_run: args.dry_run,
    };
    info!(
        batch_idx = run.batch_idx,
        steps_per_hour = options.steps_per_hour,
        policy = ?options.window_policy,
        dry_run = run.dry_run,
        "labelling batch"
    );
    let report = run_batch(&run, &options)?;
    Ok(BatchResult {
        report,
        dry_run: args.dry_run,
        config: args.config.clone(),
    })
}

pub fn run_channels(args: &ChannelsArgs) -> Result<()> {
    let options = load_options(args.config.as_deref())?;
    let windows = &options.windows;
    let mut table = Table::new();
    table.set_header(vec!["Column", "Kind", "Window"]);
    apply_table_style(&mut table);
    for channel in LabelChannel::ALL {
        let (kind, window) = match channel {
            LabelChannel::Mortality => (
                "binary",
                format!("revealed after {}h", windows.mortality_horizon_hours),
            ),
            LabelChannel::CircFailure => (
                "binary",
                format!(
                    "[{}h, {}h) ahead",
                    windows.circ_failure.lhours, windows.circ_failure.rhours
                ),
            ),
            LabelChannel::RespFailure => (
                "binary",
                format!(
                    "[{}h, {}h) ahead",
                    windows.resp_failure.lhours, windows.resp_failure.rhours
                ),
            ),
            LabelChannel::UrineRate => {
                ("regression", format!("next {}h, mL/kg/h", windows.urine_hours))
            }
            LabelChannel::UrineBinary => (
                "binary",
                format!(
                    "next {}h, below {} mL/kg/h",
                    windows.urine_hours, options.oliguria_threshold
                ),
            ),
            LabelChannel::Phenotype => (
                "multiclass",
                format!("revealed after {}h", windows.phenotype_horizon_hours),
            ),
            LabelChannel::RemainingLos => ("regression", "hours until discharge".to_string()),
        };
        table.add_row(vec![channel.column_name().to_string(), kind.to_string(), window]);
    }
    println!("{table}");
    println!(
        "Masked where heart rate was not measured within the last {}h.",
        windows.validity_lookback_hours
    );
    Ok(())
}

fn load_options(path: Option<&std::path::Path>) -> Result<LabelOptions> {
    match path {
        Some(path) => {
            load_label_options(path).with_context(|| format!("load options {}", path.display()))
        }
        None => Ok(LabelOptions::default()),
    }
}
