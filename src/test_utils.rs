//! Shared fixtures for unit tests.

use crate::class::ClassDefinition;
use crate::error::Error;
use crate::value::{Record, Value};

/// Builds the construction argument record for [`person_class`].
pub(crate) fn person_args(name: &str, age: u32) -> Value {
    Value::record([("name", Value::from(name)), ("age", Value::from(age))])
}

/// A `Person` class with `name`/`age` fields and a few methods.
///
/// - `greet()` reads both fields
/// - `birthday()` increments `age` and returns it
/// - `introduce(other)` calls `greet` through the receiver
pub(crate) fn person_class() -> ClassDefinition {
    ClassDefinition::builder("Person")
        .constructor(|args| {
            let fields = args.first().and_then(Value::as_record);
            let name = fields
                .and_then(|f| f.get("name"))
                .filter(|v| v.as_str().is_some())
                .ok_or_else(|| Error::raise("Person requires a name"))?;
            let age = fields.and_then(|f| f.get("age")).cloned().unwrap_or_default();

            let mut record = Record::new();
            record.insert("name".to_string(), name.clone());
            record.insert("age".to_string(), age);
            Ok(record)
        })
        .method("greet", |this, _| {
            Ok(Value::from(format!(
                "Hello, my name is {} and I am {} years old.",
                this.get("name"),
                this.get("age")
            )))
        })
        .method("birthday", |this, _| {
            let age = this.get("age").as_number().unwrap_or(0.0) + 1.0;
            this.set("age", age);
            Ok(Value::from(age))
        })
        .method("introduce", |this, args| {
            let other = args.first().cloned().unwrap_or_default();
            let greeting = this.invoke("greet", &[])?;
            Ok(Value::from(format!("{}, {}", other, greeting)))
        })
        .build()
}
