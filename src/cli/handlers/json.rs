use crate::cli::{
    args::JsonArgs,
    config::{open_input, open_output, resolve_format},
    global::GlobalArgs,
};
use dsvkit::DialectRegistry;
use serde_json::{Map, Value};
use std::io::Write;

pub fn handle(
    args: JsonArgs,
    global: &GlobalArgs,
    config: &DialectRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = resolve_format(config, args.from.as_deref(), global)?;
    let table = format.parse_table(open_input(args.file.as_ref())?)?;

    let mut objects = Vec::new();
    for row in table.records_as_maps() {
        let object: Map<String, Value> = row?
            .into_iter()
            .map(|(column, cell)| (column, Value::String(cell)))
            .collect();
        objects.push(Value::Object(object));
    }

    let output = if args.pretty {
        serde_json::to_string_pretty(&objects)?
    } else {
        serde_json::to_string(&objects)?
    };

    let mut sink = open_output(args.output.as_ref())?;
    writeln!(sink, "{}", output)?;
    sink.flush()?;
    Ok(())
}
