use crate::cli::{args::DialectsAction, global::GlobalArgs};
use dsvkit::DialectRegistry;

pub fn handle(
    action: DialectsAction,
    _global: &GlobalArgs,
    config: &DialectRegistry,
) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        DialectsAction::List { json } => handle_list(json, config),
        DialectsAction::Show { dialect } => handle_show(&dialect, config),
    }
}

fn handle_list(json: bool, config: &DialectRegistry) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        let output = serde_json::json!({
            "default": config.settings.default_dialect,
            "dialects": config.dialects,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
        return Ok(());
    }

    let default = config.settings.default_dialect.as_deref();
    println!("Available dialects:\n");
    for (name, dialect) in &config.dialects {
        let marker = if Some(name.as_str()) == default { "*" } else { " " };
        let delimiter = format!("{:?}", dialect.delimiter);
        println!(
            "{} {:<15} {:<6} {}",
            marker,
            name,
            delimiter,
            dialect.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

fn handle_show(name: &str, config: &DialectRegistry) -> Result<(), Box<dyn std::error::Error>> {
    let dialect = config.resolve(Some(name))?;
    // Reject dialects that would fail at use time
    dialect.format()?;
    println!("[dialects.{}]", name);
    print!("{}", toml::to_string_pretty(dialect)?);
    Ok(())
}
