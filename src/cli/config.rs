use dsvkit::{DialectRegistry, DsvFormat};
use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use super::global::GlobalArgs;

/// Loads the built-in, user and local dialects, then the `--config` file if given.
pub fn load_registry(global: &GlobalArgs) -> Result<DialectRegistry, Box<dyn std::error::Error>> {
    let mut registry = DialectRegistry::load_with_overrides()?;

    if let Some(path) = &global.config {
        let expanded = shellexpand::tilde(path);
        let extra = DialectRegistry::load_from_file(Path::new(expanded.as_ref()))
            .map_err(|e| format!("Cannot load dialect file '{}': {}", path, e))?;
        registry.merge(extra);
    }

    Ok(registry)
}

/// Resolves a dialect by name (or the default) and applies the global parse overrides.
pub fn resolve_format(
    registry: &DialectRegistry,
    name: Option<&str>,
    global: &GlobalArgs,
) -> Result<DsvFormat, Box<dyn std::error::Error>> {
    let format = registry.resolve(name)?.format()?;
    if !global.jagged && !global.skip_empty_lines {
        return Ok(format);
    }

    let mut builder = format.scheme().to_builder();
    if global.jagged {
        builder = builder.allow_jagged_rows(true);
    }
    if global.skip_empty_lines {
        builder = builder.skip_empty_lines(true);
    }
    Ok(format.with_scheme(builder.build()?))
}

/// Opens a file, or stdin when no path is given.
pub fn open_input(file: Option<&PathBuf>) -> Result<Box<dyn Read>, Box<dyn std::error::Error>> {
    match file {
        Some(path) => {
            let file = File::open(path).map_err(|e| format!("Cannot open '{}': {}", path.display(), e))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

/// Creates a file, or writes to stdout when no path is given.
pub fn open_output(file: Option<&PathBuf>) -> Result<Box<dyn Write>, Box<dyn std::error::Error>> {
    match file {
        Some(path) => {
            let file = File::create(path).map_err(|e| format!("Cannot create '{}': {}", path.display(), e))?;
            Ok(Box::new(BufWriter::new(file)))
        }
        None => Ok(Box::new(BufWriter::new(io::stdout().lock()))),
    }
}
