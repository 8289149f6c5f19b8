mod cli;

use crate::cli::{LogFormatArg, CLI};
use clap::Parser;
use nodeflake_id::{GeneratorSettings, IdentifierGenerator};
use std::io::{self, BufWriter, Write};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::parse();

    init_tracing(config.log_format);

    info!(
        node = ?config.node,
        count = config.count,
        pretty = config.pretty,
        seeded = config.seed.is_some(),
        "generating identifiers"
    );

    let settings = GeneratorSettings::builder()
        .node_id(config.node)
        .seed(config.seed)
        .build();
    let generator = IdentifierGenerator::new(settings)?;

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    for _ in 0..config.count {
        let (id, formatted) = generator.generate(config.pretty)?;
        debug!(?id, "generated identifier");
        writeln!(out, "{formatted}")?;
    }
    out.flush()?;

    Ok(())
}

fn init_tracing(format: LogFormatArg) {
    // logs go to stderr so stdout only carries identifiers
    let builder = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(io::stderr);
    match format {
        LogFormatArg::Text => builder.init(),
        LogFormatArg::Json => builder.json().init(),
    }
}
