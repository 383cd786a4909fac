//! Batch desugaring
//!
//! Requests are independent, so each one is parsed and transformed in its own
//! arena on the rayon pool. Results come back in request order.

use crate::error::Result;
use crate::host::{transform_source, ConditionalSource};
use rayon::prelude::*;
use serde::Deserialize;

/// JSON request: a single conditional or a list of them
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Request {
    Many(Vec<ConditionalSource>),
    One(ConditionalSource),
}

/// Parse a JSON request into conditional sources
pub fn load_request(json: &str) -> Result<Vec<ConditionalSource>> {
    let sources = match serde_json::from_str::<Request>(json)? {
        Request::Many(sources) => sources,
        Request::One(source) => vec![source],
    };
    log::debug!("Loaded {} conditional source(s)", sources.len());
    Ok(sources)
}

/// Desugar every source in parallel; failures do not affect other entries
pub fn transform_sources(sources: &[ConditionalSource]) -> Vec<Result<String>> {
    sources.par_iter().map(transform_source).collect()
}
