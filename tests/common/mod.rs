//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use guarded_factory::{ClassDefinition, Error, Record, Value};

/// Construction arguments for [`person`].
pub fn person_args(name: &str, age: f64) -> Value {
    Value::record([("name", Value::from(name)), ("age", Value::from(age))])
}

/// `Person { name, age }` with a `greet()` method.
pub fn person() -> ClassDefinition {
    ClassDefinition::builder("Person")
        .constructor(|args| {
            let fields = args
                .first()
                .and_then(Value::as_record)
                .ok_or_else(|| Error::raise("Person requires { name, age }"))?;
            let mut record = Record::new();
            record.insert("name".to_string(), fields.get("name").cloned().unwrap_or_default());
            record.insert("age".to_string(), fields.get("age").cloned().unwrap_or_default());
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

/// Greets the way an unguarded `Person` would.
pub fn expected_greeting(name: &str, age: f64) -> Value {
    Value::from(format!(
        "Hello, my name is {} and I am {} years old.",
        name,
        Value::from(age)
    ))
}
