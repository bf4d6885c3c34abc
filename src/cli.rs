use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};
use u_carecut::AnalysisConfig;

#[derive(Parser)]
#[command(author, version, about, propagate_version = true)]
pub struct Args {
    /// Log at debug level.
    #[clap(short, long, global = true, env = "CARECUT_VERBOSE")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Compute day dominance from each instance's operator calendar.
    #[clap(name = "subsumptions")]
    Subsumptions(AnalysisArgs),

    /// Extract conflict cores from each instance's daily results.
    ///
    /// Reads the `subsumptions.json` written by the `subsumptions` command.
    #[clap(name = "cores")]
    Cores(AnalysisArgs),
}

#[derive(ClapArgs)]
pub struct AnalysisArgs {
    /// Directory whose sub-directories are instances.
    #[clap(short, long, default_value = "instances", env = "CARECUT_INPUT")]
    pub input: PathBuf,

    /// Wall-clock budget of one matching query; 0 disables it.
    #[clap(long, default_value = "1000", env = "CARECUT_ORACLE_TIME_LIMIT_MS")]
    pub oracle_time_limit_ms: u64,

    /// Process everything on the calling thread.
    #[clap(long, env = "CARECUT_SEQUENTIAL")]
    pub sequential: bool,
}

impl AnalysisArgs {
    #[must_use]
    pub fn config(&self) -> AnalysisConfig {
        let time_limit = (self.oracle_time_limit_ms > 0).then_some(self.oracle_time_limit_ms);
        AnalysisConfig::default()
            .with_parallel(!self.sequential)
            .with_oracle_time_limit_ms(time_limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["carecut", "subsumptions"]);
        assert!(!args.verbose);
        let Command::Subsumptions(analysis) = args.command else {
            panic!("expected subsumptions");
        };
        assert_eq!(analysis.input, PathBuf::from("instances"));
        assert_eq!(analysis.config(), AnalysisConfig::default());
    }

    #[test]
    fn test_flags() {
        let args = Args::parse_from([
            "carecut",
            "-v",
            "cores",
            "-i",
            "data",
            "--oracle-time-limit-ms",
            "0",
            "--sequential",
        ]);
        assert!(args.verbose);
        let Command::Cores(analysis) = args.command else {
            panic!("expected cores");
        };
        assert_eq!(analysis.input, PathBuf::from("data"));
        let config = analysis.config();
        assert!(!config.parallel);
        assert_eq!(config.oracle_time_limit_ms, None);
    }
}
