//! Implementation of the `windlass list` command.

use windlass_core::prelude::TemplateCatalog;

use crate::{
    cli::{ListArgs, ListFormat, global::GlobalArgs},
    error::CliResult,
    output::OutputManager,
};

pub fn execute(args: ListArgs, _global: GlobalArgs, output: OutputManager) -> CliResult<()> {
    let catalog = TemplateCatalog::builtin();

    match args.format {
        ListFormat::Table => {
            output.header("Available templates:")?;
            for entry in catalog.entries() {
                let kind = match entry.extends {
                    Some(base) => format!("overlay on {base}"),
                    None => "base".to_string(),
                };
                output.print(&format!(
                    "  {:<28} {:<22} {}",
                    entry.name, kind, entry.description
                ))?;
            }
        }

        ListFormat::List => {
            for entry in catalog.entries() {
                println!("{}", entry.name);
            }
        }

        // JSON goes straight to stdout so piped invocations always get
        // parseable output, colour settings notwithstanding.
        ListFormat::Json => {
            let items: Vec<serde_json::Value> = catalog
                .entries()
                .iter()
                .map(|entry| {
                    serde_json::json!({
                        "name": entry.name,
                        "description": entry.description,
                        "base": entry.is_base,
                        "extends": entry.extends,
                    })
                })
                .collect();
            let json = serde_json::to_string_pretty(&items).unwrap_or_else(|_| "[]".into());
            println!("{json}");
        }
    }

    Ok(())
}
