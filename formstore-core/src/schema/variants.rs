//! Built-in todo variants
//!
//! `todo8` is the minimal task list, `todo9` adds flags, a publish date and
//! quantities, `todo10` is the long-form variant with address and option
//! fields.

use super::{Envelope, FieldDef, RecordSchema, SchemaError};

/// Status options of `todo8`
pub const TODO8_STATUS: &[&str] = &["pending", "completed"];

pub fn todo8() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder("todo8")
        .field(FieldDef::text("title").required())
        .field(FieldDef::text("description"))
        .field(FieldDef::choice("status", TODO8_STATUS).with_default("pending"))
        .content_field("description")
        .build()
}

pub fn todo9() -> Result<RecordSchema, SchemaError> {
    RecordSchema::builder("todo9")
        .field(FieldDef::text("title").required())
        .field(FieldDef::text("content").required())
        .field(FieldDef::flag("public"))
        .field(FieldDef::flag("foodOrange"))
        .field(FieldDef::flag("foodApple"))
        .field(FieldDef::flag("foodBanana"))
        .field(FieldDef::date("pubDate"))
        .field(FieldDef::text("qty1"))
        .field(FieldDef::text("qty2"))
        .field(FieldDef::text("qty3"))
        .envelope(Envelope::todos())
        .build()
}

pub fn todo10() -> Result<RecordSchema, SchemaError> {
    let mut builder = RecordSchema::builder("todo10")
        .field(FieldDef::text("title").required())
        .field(FieldDef::text("content").required())
        .field(FieldDef::text("content_type"))
        .field(FieldDef::text("age"));
    for flag in ["public", "food_orange", "food_apple", "food_banana", "food_melon", "food_grape"] {
        builder = builder.field(FieldDef::flag(flag));
    }
    builder = builder.field(FieldDef::date("date_publish")).field(FieldDef::date("date_update"));
    for text in [
        "post_number",
        "address_country",
        "address_pref",
        "address_city",
        "address_1",
        "address_2",
        "address_3",
        "text_option1",
        "text_option2",
        "text_option3",
    ] {
        builder = builder.field(FieldDef::text(text));
    }
    builder.search_param("searchQuery").envelope(Envelope::todos()).build()
}

/// Names of the built-in variants
pub const VARIANT_NAMES: [&str; 3] = ["todo8", "todo9", "todo10"];

/// Look up a built-in variant by name
pub fn by_name(name: &str) -> Option<Result<RecordSchema, SchemaError>> {
    match name {
        "todo8" => Some(todo8()),
        "todo9" => Some(todo9()),
        "todo10" => Some(todo10()),
        _ => None,
    }
}

/// All built-in variants
pub fn all() -> Result<Vec<RecordSchema>, SchemaError> {
    Ok(vec![todo8()?, todo9()?, todo10()?])
}
