use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::*;
use fixturegen_core::{
    CharacterClass, CommonFormats, ConstraintSet, FieldMap, FieldTable, Seed, TypeTag, Value,
    ValueGenerator,
};
use std::path::Path;

/// How generated data is printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Generator seeded from `seed`, or randomly, with the common formats hook.
pub fn build_generator(seed: Option<u64>, user_ids: &[i64]) -> ValueGenerator {
    let seed = seed.map_or_else(Seed::random, Seed::from_u64);
    tracing::debug!(%seed, "Seeding generator");
    ValueGenerator::with_seed(seed)
        .with_custom_values(CommonFormats::new().with_user_ids(user_ids.iter().copied()))
}

/// Generate `count` values for one tag.
pub fn generate_values(
    generator: &mut ValueGenerator,
    tag: &TypeTag,
    constraints: &ConstraintSet,
    count: usize,
) -> Result<Vec<Value>> {
    (0..count)
        .map(|i| {
            generator
                .generate(tag, constraints)
                .with_context(|| format!("generating {} value #{}", tag, i + 1))
        })
        .collect()
}

/// Read and validate a field table file.
pub fn load_table(path: &Path) -> Result<FieldTable> {
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("reading field table {}", path.display()))?;
    FieldTable::from_json(&json).with_context(|| format!("parsing field table {}", path.display()))
}

/// Generate `count` rows of dummy data from a table.
pub fn generate_rows(
    generator: &mut ValueGenerator,
    table: &FieldTable,
    count: usize,
) -> Result<Vec<FieldMap>> {
    (0..count)
        .map(|i| {
            table
                .generate_all(generator)
                .with_context(|| format!("generating {} row #{}", table.type_name, i + 1))
        })
        .collect()
}

/// Values as a JSON array.
pub fn values_to_json(values: &[Value]) -> Result<String> {
    Ok(serde_json::to_string_pretty(values)?)
}

/// Rows as a JSON array of objects.
pub fn rows_to_json(rows: &[FieldMap]) -> Result<String> {
    Ok(serde_json::to_string_pretty(rows)?)
}

/// One generated value per line.
pub fn format_values(values: &[Value]) -> String {
    values.iter().map(|value| format!("{}\n", value)).collect()
}

/// One block per row, fields aligned under the row header.
pub fn format_rows(type_name: &str, rows: &[FieldMap]) -> String {
    let width = rows
        .iter()
        .flat_map(|row| row.keys())
        .map(|name| name.len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for (i, row) in rows.iter().enumerate() {
        output.push_str(&format!("{} #{}\n", type_name.bright_cyan().bold(), i + 1));
        for (name, value) in row {
            output.push_str(&format!(
                "  {:width$}  {}\n",
                name.bright_white(),
                value,
                width = width
            ));
        }
    }
    output
}

/// Format the character class listing
pub fn format_classes() -> String {
    let mut output = format!(
        "{}\n{}\n",
        "Character Classes".bright_green().bold(),
        "=================".bright_green()
    );
    for class in CharacterClass::ALL {
        output.push_str(&format!(
            "  {:<13} {}\n",
            class.name().bright_yellow(),
            class.characters().replace(' ', "␠")
        ));
    }
    output
}

/// Format an error and its causes
pub fn format_error(error: &anyhow::Error) -> String {
    let mut output = format!("{} {}\n", "error:".bright_red().bold(), error);
    for cause in error.chain().skip(1) {
        output.push_str(&format!("  {} {}\n", "caused by:".bright_red(), cause));
    }
    output
}
