use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = "pipecheck",
    version,
    about = "Functionality validation runner and CI/CD pipeline monitoring tooling"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the functionality validations and write results and a report
    Validate(ValidateArgs),
    /// Query pipeline status, metrics, and alerts, or monitor continuously
    Monitor(MonitorArgs),
}

#[derive(Args, Debug, Clone)]
pub struct ValidateArgs {
    #[arg(long, short = 'c')]
    pub config: Option<PathBuf>,

    #[arg(long, short = 'o', default_value = "functionality_validation_results.json")]
    pub output: PathBuf,

    #[arg(long = "report-type", short = 'r', value_enum, default_value_t = ReportType::Summary)]
    pub report_type: ReportType,

    #[arg(long = "validation-type", short = 'v')]
    pub validation_type: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum ReportType {
    Summary,
    Detailed,
    Executive,
}

impl ReportType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Summary => "summary",
            Self::Detailed => "detailed",
            Self::Executive => "executive",
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct MonitorArgs {
    #[arg(long, default_value_t = false)]
    pub start_monitoring: bool,

    #[arg(long, default_value_t = false)]
    pub check_status: bool,

    #[arg(long, default_value_t = false)]
    pub get_metrics: bool,

    #[arg(long, default_value_t = false)]
    pub check_alerts: bool,

    #[arg(long)]
    pub output_file: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::{Cli, Commands, ReportType};

    #[test]
    fn validate_args_have_documented_defaults() {
        let cli = Cli::parse_from(["pipecheck", "validate"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate subcommand");
        };

        assert!(args.config.is_none());
        assert_eq!(
            args.output.to_str(),
            Some("functionality_validation_results.json")
        );
        assert_eq!(args.report_type, ReportType::Summary);
        assert!(args.validation_type.is_none());
    }

    #[test]
    fn monitor_flags_parse_independently() {
        let cli = Cli::parse_from(["pipecheck", "monitor", "--get-metrics", "--check-alerts"]);
        let Commands::Monitor(args) = cli.command else {
            panic!("expected monitor subcommand");
        };

        assert!(args.get_metrics);
        assert!(args.check_alerts);
        assert!(!args.start_monitoring);
        assert!(!args.check_status);
        assert!(args.output_file.is_none());
    }

    #[test]
    fn report_type_short_flag_accepts_executive() {
        let cli = Cli::parse_from(["pipecheck", "validate", "-r", "executive"]);
        let Commands::Validate(args) = cli.command else {
            panic!("expected validate subcommand");
        };
        assert_eq!(args.report_type, ReportType::Executive);
    }
}
