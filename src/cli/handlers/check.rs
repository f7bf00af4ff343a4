use crate::cli::{
    args::CheckArgs,
    config::{open_input, resolve_format},
    global::GlobalArgs,
};
use dsvkit::DialectRegistry;

pub fn handle(
    args: CheckArgs,
    global: &GlobalArgs,
    config: &DialectRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    let format = resolve_format(config, args.from.as_deref(), global)?;
    let table = format.parse_table(open_input(args.file.as_ref())?)?;
    let columns = table.header().len();

    let mut records = 0usize;
    for row in table.into_records() {
        row?;
        records += 1;
    }

    if !global.quiet {
        println!("ok: {} records, {} columns", records, columns);
    }
    Ok(())
}
