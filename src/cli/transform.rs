use crate::batch::transform_sources;
use crate::error::Error;
use crate::host::report;
use miette::Result;
use std::fs;
use std::path::PathBuf;

/// Arguments for the transform command
#[derive(Debug, Clone)]
pub struct TransformArgs {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    /// Emit `while (true)` without the surrounding block
    pub unwrapped_loops: bool,
    /// Keep block loop bodies nested instead of splicing them
    pub nested_loop_body: bool,
}

/// Run the transform subcommand
pub fn transform(args: &TransformArgs) -> Result<()> {
    let mut sources = super::read_request(&args.input_path)?;
    for source in &mut sources {
        if args.unwrapped_loops {
            source.options.wrap_loop_in_block = false;
        }
        if args.nested_loop_body {
            source.options.splice_loop_body = false;
        }
    }

    let mut outputs = Vec::with_capacity(sources.len());
    for (source, result) in sources.iter().zip(transform_sources(&sources)) {
        match result {
            Ok(code) => outputs.push(code),
            Err(err) => return Err(report(source, err)),
        }
    }
    let output = outputs.join("\n");

    match &args.output_path {
        Some(path) => {
            fs::write(path, &output).map_err(|err| {
                Error::Io(format!("Failed to write output to {}: {}", path.display(), err))
            })?;
            log::info!("Desugared code written to: {}", path.display());
        }
        None => print!("{}", output),
    }

    Ok(())
}
