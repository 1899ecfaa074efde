//! Basic value generation
//!
//! Shows typed and string-form generation, unique pools, the common
//! formats hook and dummy data from a field table.

use fixturegen::*;

fn main() -> Result<()> {
    println!("=== fixturegen basics ===\n");

    let mut gen = ValueGenerator::with_seed(Seed::from_u64(2014))
        .with_custom_values(CommonFormats::new().with_user_ids([10, 14]));

    println!("1. Built-in categories");
    let login = gen.generate_named("ALPHA", &["MIN=5", "MAX=10", "LOWERCASE"])?;
    let age = gen.generate(&TypeTag::Integer, &ConstraintSet::new().with_min(18).with_max(99))?;
    let price = gen.generate_named("PRICE", &["MIN=10", "MAX=20"])?;
    println!("  login: {login}\n  age:   {age}\n  price: {price}\n");

    println!("2. Unique values");
    let constraints = ConstraintSet::new().with_min(1).with_max(5).unique_in("ticket");
    for _ in 0..5 {
        print!("  {}", gen.generate(&TypeTag::Integer, &constraints)?);
    }
    println!("\n");

    println!("3. Common formats");
    for tag in ["EMAIL", "PATH", "DATE", "USER_ID"] {
        println!("  {:<8} {}", tag, gen.generate_named::<&str>(tag, &[])?);
    }
    println!();

    println!("4. Field tables");
    let table = FieldTable::new("User")
        .with_field(
            "login",
            FieldRule::new("alpha", ConstraintSet::new().with_min(6).with_max(6).lowercase().unique()),
        )
        .with_field("email", FieldRule::new("email", ConstraintSet::new()))
        .require("login");
    for row in 1..=3 {
        let values = table.generate_all(&mut gen)?;
        let record = values
            .into_iter()
            .fold(DynamicRecord::new("User"), |record, (name, value)| record.with(name, value));
        println!("  #{row} {record}");
    }

    Ok(())
}
