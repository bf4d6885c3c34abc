mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, Level};
use u_carecut::cores::CoreExtractor;
use u_carecut::dominance::DominanceAnalyzer;
use u_carecut::repository::{discover_instances, InstanceDir};
use u_carecut::AnalysisConfig;

use crate::cli::{Args, Command};

fn main() -> Result<()> {
    let args = Args::parse();
    tracing_subscriber::fmt()
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::INFO })
        .with_target(false)
        .compact()
        .init();

    let (analysis, run): (_, fn(&InstanceDir, &AnalysisConfig) -> Result<()>) = match &args.command {
        Command::Subsumptions(analysis) => (analysis, subsumptions),
        Command::Cores(analysis) => (analysis, cores),
    };
    let config = analysis.config();

    let instances = discover_instances(&analysis.input)
        .with_context(|| format!("failed to list instances in {}", analysis.input.display()))?;
    if instances.is_empty() {
        info!(root = %analysis.input.display(), "No instance folder found");
        return Ok(());
    }

    for_each_instance(&instances, config.parallel, |instance| run(instance, &config))
}

#[cfg(feature = "parallel")]
fn for_each_instance<F>(instances: &[InstanceDir], parallel: bool, f: F) -> Result<()>
where
    F: Fn(&InstanceDir) -> Result<()> + Sync + Send,
{
    use rayon::prelude::*;

    if parallel {
        instances.par_iter().try_for_each(f)
    } else {
        instances.iter().try_for_each(f)
    }
}

#[cfg(not(feature = "parallel"))]
fn for_each_instance<F>(instances: &[InstanceDir], _parallel: bool, f: F) -> Result<()>
where
    F: Fn(&InstanceDir) -> Result<()>,
{
    instances.iter().try_for_each(f)
}

fn subsumptions(instance: &InstanceDir, config: &AnalysisConfig) -> Result<()> {
    let name = instance.name();
    let calendar = instance
        .load_calendar()
        .with_context(|| format!("failed to load operators of `{name}`"))?;

    let outcome = DominanceAnalyzer::new(config.clone()).analyze(&calendar);
    instance
        .write_subsumptions(&outcome.relation)
        .with_context(|| format!("failed to write subsumptions of `{name}`"))?;

    info!(
        instance = %name,
        edges = outcome.relation.edge_count(),
        pairs = outcome.stats.pairs,
        oracle_failures = outcome.stats.oracle_failures,
        "Computed subsumptions"
    );
    Ok(())
}

fn cores(instance: &InstanceDir, config: &AnalysisConfig) -> Result<()> {
    let name = instance.name();
    let loaded = instance
        .load_instance()
        .with_context(|| format!("failed to load `{name}`"))?;

    let cores = CoreExtractor::new(config.clone()).extract(loaded.core_inputs());
    instance
        .write_cores(&cores)
        .with_context(|| format!("failed to write cores of `{name}`"))?;

    info!(instance = %name, cores = cores.len(), "Computed cores");
    Ok(())
}
