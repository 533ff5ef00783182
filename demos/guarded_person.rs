//! Guarded view demonstration.
//!
//! This example shows a factory that hides a person's personal data while
//! still letting callers use the person's methods.
//!
//! Run with: `cargo run --example guarded_person`

use guarded_factory::{
    CLASS, ClassDefinition, Error, Function, IS_PROXY, Record, Value, create_factory,
};

fn person() -> ClassDefinition {
    ClassDefinition::builder("Person")
        .constructor(|args| {
            let fields = args
                .first()
                .and_then(Value::as_record)
                .ok_or_else(|| Error::raise("Person expects { name, age }"))?;
            let mut record = Record::new();
            for key in ["name", "age"] {
                record.insert(key.to_string(), fields.get(key).cloned().unwrap_or_default());
            }
            Ok(record)
        })
        .method("greet", |this, _| {
            Ok(Value::from(format!(
                "Hello, my name is {} and I am {} years old.",
                this.get("name"),
                this.get("age")
            )))
        })
        .build()
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .init();

    println!("=== Guarded View Example ===\n");

    // Only callables pass the policy
    let decide = Function::new("decide", |args| Ok(Value::Bool(args[1].is_callable())));
    let options = Value::record([
        ("decide", Value::Function(decide)),
        ("revealIsProxy", Value::Bool(true)),
        ("referenceClass", Value::Bool(true)),
    ]);
    let factory = create_factory(&Value::Class(person()), Some(&options))?;

    let args = Value::record([("name", Value::from("John Doe")), ("age", Value::from(42))]);
    let view = factory.create(&[args])?;

    println!("--- Scenario 1: Data Fields Are Suppressed ---");
    println!("name: {}", view.get("name")?);
    println!("age:  {}", view.get("age")?);

    println!("\n--- Scenario 2: Methods Still Work ---");
    let greet = view.get("greet")?;
    println!("greet as text: {}", greet);
    if let Value::Function(f) = &greet {
        println!("greet(): {}", f.call(&[])?);
    }

    println!("\n--- Scenario 3: Reserved Names ---");
    println!("{}: {}", IS_PROXY, view.get(IS_PROXY)?);
    println!("{}: {}", CLASS, view.get(CLASS)?);

    println!("\n--- Scenario 4: Nothing To Enumerate ---");
    println!("own keys: {:?}", view.own_keys());
    println!("view: {:?}", view);

    println!("\n--- Scenario 5: Invalid Arguments ---");
    if let Err(err) = create_factory(&Value::Undefined, None) {
        println!("create_factory(undefined): {}", err);
    }
    if let Err(err) = factory.create(&[Value::from(7)]) {
        println!("factory(7): {}", err);
    }

    Ok(())
}
