use clap::builder::BoolishValueParser;
use clap::{Parser, ValueEnum};
use std::fmt::{Display, Formatter};

pub const NODE_ENV: &str = "NODEFLAKE_NODE";
pub const COUNT_ENV: &str = "NODEFLAKE_COUNT";
pub const PRETTY_ENV: &str = "NODEFLAKE_PRETTY";
pub const SEED_ENV: &str = "NODEFLAKE_SEED";
pub const LOG_FORMAT_ENV: &str = "NODEFLAKE_LOG_FORMAT";

pub const DEFAULT_COUNT: &str = "1";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormatArg {
    #[value(name = "text")]
    Text,
    #[value(name = "json")]
    Json,
}

impl Display for LogFormatArg {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            LogFormatArg::Text => write!(f, "text"),
            LogFormatArg::Json => write!(f, "json"),
        }
    }
}

#[derive(Debug, Parser)]
#[command(name = "nodeflake", about = "Generate node/time/random identifiers")]
pub struct CLI {
    /// Node id in 0..=65535; defaults to a value derived from the process id.
    #[arg(long, env = NODE_ENV)]
    pub node: Option<u32>,

    /// Number of identifiers to print.
    #[arg(long, env = COUNT_ENV, default_value = DEFAULT_COUNT)]
    pub count: u64,

    /// Print dash separated identifiers. The env var takes 1/0, true/false,
    /// yes/no or on/off.
    #[arg(long, env = PRETTY_ENV, value_parser = BoolishValueParser::new())]
    pub pretty: bool,

    /// Fixed seed for reproducible output. Never use in production.
    #[arg(long, env = SEED_ENV, hide = true)]
    pub seed: Option<u64>,

    #[arg(
        long,
        env = LOG_FORMAT_ENV,
        value_enum,
        default_value_t = LogFormatArg::Text
    )]
    pub log_format: LogFormatArg,
}
