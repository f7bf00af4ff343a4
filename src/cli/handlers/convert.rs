use crate::cli::{
    args::ConvertArgs,
    config::{open_input, open_output, resolve_format},
    global::GlobalArgs,
};
use dsvkit::DialectRegistry;

pub fn handle(
    args: ConvertArgs,
    global: &GlobalArgs,
    config: &DialectRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let from = resolve_format(config, args.from.as_deref(), global)?;
    let to = resolve_format(config, args.to.as_deref(), global)?;

    let input = open_input(args.file.as_ref())?;
    let table = from.parse_table(input)?;

    let mut writer = to.writer(open_output(args.output.as_ref())?);
    writer.write_table(table)?;
    let written = writer.rows_written();
    writer.finish()?;

    if !global.quiet && args.output.is_some() {
        eprintln!("Converted {} records", written.saturating_sub(1));
    }
    Ok(())
}
