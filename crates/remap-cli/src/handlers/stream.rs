//! Stream command handler
//!
//! Rewrites one large JSON object entry by entry. Only top-level keys are
//! matched against rules; keys without a rule pass through unchanged.

use crate::cli::StreamArgs;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::handlers::utils;
use crate::logging::timing::Timer;
use crate::output::OutputWriter;
use remap_core::{stream_transform_with_config, RuleDrivenTransform, StreamConfig};
use std::fs::File;
use std::io::{self, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, instrument};

/// Handle the stream command
#[instrument(skip_all, fields(rules = %args.rules.display()))]
pub fn handle_stream(args: StreamArgs, config: &Config, output: &mut OutputWriter) -> Result<()> {
    let timer = Timer::with_details("stream", &args.rules.display().to_string());

    let rules = utils::load_valid_rules(&args.rules)?;
    let stream_config = stream_config(&args, &config.engine.stream)?;

    let (reader, progress) = open_input(args.input.as_deref(), output)?;
    let writer: Box<dyn Write> = match &args.save_to {
        Some(path) => Box::new(File::create(path)?),
        None => Box::new(io::stdout().lock()),
    };
    let writer = BufWriter::with_capacity(stream_config.chunk_size, writer);

    let result = stream_transform_with_config(reader, writer, RuleDrivenTransform::new(&rules), &stream_config);
    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let mut writer = result?;
    if args.save_to.is_none() {
        writer.write_all(b"\n")?;
    }
    writer.flush()?;
    debug!(elapsed_ms = timer.elapsed().as_millis() as u64, "Stream finished");

    if let Some(path) = &args.save_to {
        output.success(&format!("✓ Output saved to {}", path.display()))?;
    }
    Ok(())
}

/// Apply command-line overrides to the configured stream settings
fn stream_config(args: &StreamArgs, configured: &StreamConfig) -> Result<StreamConfig> {
    let mut config = configured.clone();
    if let Some(chunk_size) = args.chunk_size {
        config.chunk_size = chunk_size;
    }
    if args.max_value_bytes.is_some() {
        config.max_value_bytes = args.max_value_bytes;
    }
    if config.chunk_size == 0 {
        return Err(Error::invalid_args("--chunk-size must be greater than zero"));
    }
    if config.max_value_bytes == Some(0) {
        return Err(Error::invalid_args("--max-value-bytes must be greater than zero"));
    }
    Ok(config)
}

/// Open the input, wrapped in a progress bar when reading a file
fn open_input(
    path: Option<&Path>,
    output: &OutputWriter,
) -> Result<(Box<dyn Read>, Option<indicatif::ProgressBar>)> {
    let Some(path) = path.filter(|p| !utils::is_stdin(Some(p))) else {
        return Ok((Box::new(io::stdin().lock()), None));
    };

    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => Error::FileNotFound {
            path: path.to_path_buf(),
        },
        _ => Error::Io(e),
    })?;

    let length = file.metadata()?.len();
    match output.progress_bar(length, &path.display().to_string()) {
        Some(pb) => Ok((Box::new(pb.wrap_read(file)), Some(pb))),
        None => Ok((Box::new(file), None)),
    }
}
