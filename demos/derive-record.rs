//! `#[derive(Record)]` demonstration
//!
//! Reads, writes and flattens a struct by field name, then fills it with
//! dummy data.

use fixturegen::*;

#[derive(Record, Debug, Clone, Default)]
#[record(nested)]
struct Owner {
    login: String,
    id: i64,
}

#[derive(Record, Debug, Clone, Default)]
#[record(type_name = "Folder")]
struct Folder {
    id: i64,
    name: String,
    #[record(rename = "remote_id")]
    remote: String,
    owner: Owner,
    #[record(skip)]
    dirty: bool,
}

fn main() -> Result<()> {
    let mut folder = Folder::default();
    println!("Properties: {:?}", folder.property_names());

    set_field(&mut folder, "name", Value::from("Media"))?;
    set_field(&mut folder, "owner", Value::Record(DynamicRecord::new("Owner").with("login", "admin").with("id", 14)))?;
    println!("Owner login: {}", folder.owner.login);

    if let Err(err) = set_field(&mut folder, "id", Value::from("not a number")) {
        println!("Rejected write: {err}");
    }

    let table = FieldTable::new("Folder")
        .with_field("id", FieldRule::new("integer", ConstraintSet::new().with_min(1).with_max(999)))
        .with_field(
            "remote_id",
            FieldRule::new("alpha_numeric", ConstraintSet::new().with_min(32).with_max(32).lowercase()),
        );
    let mut gen = ValueGenerator::with_seed(Seed::from_u64(7));
    table.build_dummy(&mut gen, &mut folder, FieldMap::new())?;
    folder.dirty = true;
    println!("Dirty: {}", folder.dirty);

    println!("Flattened:");
    for (name, value) in to_map(&folder)? {
        println!("  {name:<10} {value}");
    }
    Ok(())
}
