use anyhow::{Context, Result};
use libcanopy::builder::{BuildParams, TreeBuilder};
use libcanopy::hkt::Forest;
use libcanopy::source::Source;
use log::{debug, info};

/// Read a tokenized source stream from a JSON file. The file holds an array
/// of source objects; tokenization happened upstream.
pub fn read_sources(path: &str) -> Result<Vec<Source>> {
    let raw = std::fs::read_to_string(path)
        .context(format!("error reading source file {}", path))?;
    let sources: Vec<Source> =
        serde_json::from_str(&raw).context(format!("error parsing source file {}", path))?;
    debug!("read {} sources from {}", sources.len(), path);
    Ok(sources)
}

/// Read the source stream and run the clustering pass over it.
pub fn read_and_build(path: &str, params: BuildParams) -> Result<Forest> {
    let sources = read_sources(path)?;
    info!("clustering {} sources...", sources.len());
    let forest = TreeBuilder::new(params).build(sources)?;
    Ok(forest)
}
