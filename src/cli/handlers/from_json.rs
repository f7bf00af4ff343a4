use crate::cli::{
    args::FromJsonArgs,
    config::{open_input, open_output, resolve_format},
    global::GlobalArgs,
};
use dsvkit::{DialectRegistry, MapRow};
use serde_json::{Map, Value};
use std::io::Read;

pub fn handle(
    args: FromJsonArgs,
    global: &GlobalArgs,
    config: &DialectRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = resolve_format(config, args.to.as_deref(), global)?;

    let mut input = String::new();
    open_input(args.file.as_ref())?.read_to_string(&mut input)?;
    let objects: Vec<Map<String, Value>> = serde_json::from_str(input.trim())
        .map_err(|e| format!("Expected a JSON array of flat objects: {}", e))?;

    let rows = objects
        .into_iter()
        .map(flatten_object)
        .collect::<Result<Vec<MapRow>, String>>()?;

    let mut writer = format.writer(open_output(args.output.as_ref())?);
    writer.write_maps(rows)?;
    writer.finish()?;
    Ok(())
}

/// Renders each value as cell text. `null` becomes an empty cell.
fn flatten_object(object: Map<String, Value>) -> Result<MapRow, String> {
    object
        .into_iter()
        .map(|(key, value)| {
            let cell = match value {
                Value::Null => String::new(),
                Value::String(s) => s,
                Value::Bool(b) => b.to_string(),
                Value::Number(n) => n.to_string(),
                Value::Array(_) | Value::Object(_) => {
                    return Err(format!("Value for key '{}' is nested; only flat objects are supported", key));
                }
            };
            Ok((key, cell))
        })
        .collect()
}
