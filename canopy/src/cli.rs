use clap::Parser;
use libcanopy::builder::BuildParams;

#[derive(Parser, Clone)]
#[clap(author, version, long_about = None)]
#[clap(about = "A CLI utility for clustering tokenized text sources into a forest of knowledge trees")]
#[clap(propagate_version = true)]
pub struct Args {
    /// Output file; defaults to stdout if unspecified
    #[clap(short, long, value_parser)]
    pub output: Option<String>,

    /// Verbosity of log output; use -v for debug logs, -vv for trace
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Silence all log output
    #[clap(short, long)]
    pub quiet: bool,

    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(clap::Subcommand, Clone)]
pub enum Commands {
    /// Print summary statistics for the computed forest
    Stat {
        /// json file holding the tokenized source stream
        #[clap(short, long, value_parser, default_value_t = String::from("sources.json"))]
        sources: String,

        #[clap(flatten)]
        tuning: Tuning,
    },

    /// Compute the forest and render it
    Render {
        /// json file holding the tokenized source stream
        #[clap(short, long, value_parser, default_value_t = String::from("sources.json"))]
        sources: String,

        #[clap(flatten)]
        tuning: Tuning,

        #[clap(subcommand)]
        command: Format,
    },
}

#[derive(clap::Subcommand, Clone)]
pub enum Format {
    /// Print the forest as an indented text tree
    Tree,
    /// Print the forest as the JSON document downstream tools consume
    Json,
}

/// Clustering thresholds, mirroring the library defaults.
#[derive(clap::Args, Clone)]
pub struct Tuning {
    /// Fraction of the top word's source count a word must reach to join a tree
    #[clap(long, value_parser, default_value_t = 0.0)]
    pub minimum_threshold: f64,

    /// Source-overlap fraction at which a word merges into an existing node
    #[clap(long, value_parser, default_value_t = 0.5)]
    pub similarity_threshold: f64,

    /// Keep only words appearing in at least this many sources
    #[clap(long, value_parser, default_value_t = 1)]
    pub minimum_sources_important: usize,

    /// Grow branches only for nodes holding more than this many sources
    #[clap(long, value_parser, default_value_t = 1)]
    pub minimum_sources_branch: usize,
}

impl From<Tuning> for BuildParams {
    fn from(tuning: Tuning) -> Self {
        BuildParams {
            minimum_threshold_against_max_word_count: tuning.minimum_threshold,
            similarity_threshold: tuning.similarity_threshold,
            minimum_sources_important: tuning.minimum_sources_important,
            minimum_sources_branch: tuning.minimum_sources_branch,
        }
    }
}
