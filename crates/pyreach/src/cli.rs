use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "pyreach", version, about = "Reachable-risk dependency crawler for Python projects", long_about = None)]
pub struct Cli {
    /// Increase log verbosity (debug instead of info); repeat for trace.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl a project, reduce to the reachable subgraph, propagate risk, and report.
    Scan {
        /// Path to the Python project to scan.
        #[arg(long, value_name = "PATH")]
        directory: String,
        /// Maximum BFS expansion depth.
        #[arg(long, value_name = "N", default_value_t = 5)]
        max_depth: u32,
        /// Write the reduced graph as a DOT digraph to this path.
        #[arg(long, value_name = "PATH")]
        graphviz: Option<String>,
        /// Write the reduced graph's edges/metadata CSV pair, rooted at this path.
        #[arg(long, value_name = "PATH")]
        csv: Option<String>,
        /// Read `$HOME/.pip/pip.conf` for additional index URLs.
        #[arg(long)]
        read_std_conf: bool,
    },
    /// Exercise only the Package Fetcher, for debugging.
    Pypi {
        /// Work directory to extract the package into.
        #[arg(long, value_name = "PATH")]
        dir: String,
        /// Package name.
        #[arg(long, value_name = "NAME")]
        pkg: String,
        /// Package version; the latest release is used if omitted.
        #[arg(long, value_name = "VERSION")]
        version: Option<String>,
    },
}
