use crate::batch::transform_sources;
use crate::error::Error;
use crate::host::report;
use miette::Result;
use std::path::Path;

/// Validate every conditional in a request without printing code
pub fn check(input: &Path) -> Result<()> {
    let sources = super::read_request(input)?;
    let results = transform_sources(&sources);

    let mut failures = 0;
    for (index, (source, result)) in sources.iter().zip(results).enumerate() {
        match result {
            Ok(_) => println!("#{}: ok", index),
            Err(err) => {
                failures += 1;
                eprintln!("#{}: {:?}", index, report(source, err));
            }
        }
    }

    if failures > 0 {
        return Err(Error::Request {
            message: format!("{} of {} conditional(s) rejected", failures, sources.len()),
        }
        .into());
    }
    Ok(())
}
