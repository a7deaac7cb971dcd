//! Command-line argument definitions for the Infragram CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Global arguments control configuration file selection and
//! logging verbosity; the [`Command`] picks what to do.

use clap::{Args as ClapArgs, Parser, Subcommand, ValueEnum};

use infragram::export::OutputFormat;

/// Command-line arguments for the Infragram diagram tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Path to configuration file (TOML)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render a scene document (TOML or JSON) to SVG or PNG
    Render {
        /// Path to the input scene document
        input: String,

        /// Path to the output file [default: input path with the format's extension]
        #[arg(short, long)]
        output: Option<String>,

        /// Output format [default: taken from the output extension, svg without one]
        #[arg(short, long, value_enum)]
        format: Option<FormatArg>,
    },

    /// Validate a scene document without rendering it
    Check {
        /// Path to the input scene document
        input: String,
    },

    /// List the built-in diagrams
    List,

    /// Single server running the whole stack
    SimpleWebStack(BuiltinArgs),

    /// Steps of a request through the simple web stack
    RequestFlow(BuiltinArgs),

    /// Load balancer with two web servers and a replicated database
    DistributedWeb(BuiltinArgs),

    /// Round robin request distribution
    LoadBalancing(BuiltinArgs),

    /// Primary-replica database replication
    DatabaseReplication(BuiltinArgs),

    /// Firewalls, HTTPS and monitoring agents
    SecuredWeb(BuiltinArgs),

    /// Separated tiers behind a clustered load balancer
    ScaleUp(BuiltinArgs),

    /// Failure points, security gaps and fixes of the distributed stack
    InfrastructureIssues(BuiltinArgs),

    /// Network zones and the control guarding each one
    SecurityLayers(BuiltinArgs),

    /// Logs and metrics shipped to the monitoring service
    MonitoringFlow(BuiltinArgs),

    /// HTTPS terminated at the load balancer
    SslEncryption(BuiltinArgs),

    /// Monolithic servers next to separated tiers
    ComponentSeparation(BuiltinArgs),

    /// Master and backup load balancers sharing a virtual IP
    LoadBalancerClustering(BuiltinArgs),

    /// CPU, memory and storage sized per tier
    ResourceOptimization(BuiltinArgs),
}

impl Command {
    /// Returns the catalog name and output arguments when this command
    /// renders a built-in diagram.
    pub fn builtin(&self) -> Option<(&'static str, &BuiltinArgs)> {
        match self {
            Self::SimpleWebStack(args) => Some(("simple-web-stack", args)),
            Self::RequestFlow(args) => Some(("request-flow", args)),
            Self::DistributedWeb(args) => Some(("distributed-web", args)),
            Self::LoadBalancing(args) => Some(("load-balancing", args)),
            Self::DatabaseReplication(args) => Some(("database-replication", args)),
            Self::SecuredWeb(args) => Some(("secured-web", args)),
            Self::ScaleUp(args) => Some(("scale-up", args)),
            Self::InfrastructureIssues(args) => Some(("infrastructure-issues", args)),
            Self::SecurityLayers(args) => Some(("security-layers", args)),
            Self::MonitoringFlow(args) => Some(("monitoring-flow", args)),
            Self::SslEncryption(args) => Some(("ssl-encryption", args)),
            Self::ComponentSeparation(args) => Some(("component-separation", args)),
            Self::LoadBalancerClustering(args) => Some(("load-balancer-clustering", args)),
            Self::ResourceOptimization(args) => Some(("resource-optimization", args)),
            Self::Render { .. } | Self::Check { .. } | Self::List => None,
        }
    }
}

/// Output options shared by the built-in diagram commands.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct BuiltinArgs {
    /// Path to the output file [default: <name>.<format>]
    #[arg(short, long)]
    pub output: Option<String>,

    /// Output format [default: taken from the output extension, svg without one]
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,
}

/// Output formats accepted on the command line.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatArg {
    Svg,
    Png,
}

impl From<FormatArg> for OutputFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Svg => OutputFormat::Svg,
            FormatArg::Png => OutputFormat::Png,
        }
    }
}
