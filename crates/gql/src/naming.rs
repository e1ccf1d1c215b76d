//! Identifiers of the generated declarations.
//!
//! | Declaration                      | Name                          |
//! |----------------------------------|-------------------------------|
//! | exposable field names of `T`     | `TFields`                     |
//! | argument names of `T.field`      | `TFieldArgs`                  |
//! | selectable fields of `T`         | `TObject`                     |
//! | field details of `T`             | `TFieldDetails`               |
//! | input type `I`                   | `I`                           |
//! | selectable fields of input `I`   | `IInputObject`                |
//! | values of enum `E`               | `EValues`                     |

/// Uppercase the first character, leave the rest untouched.
pub fn upper_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_uppercase().chain(chars).collect(),
    }
}

pub fn exposable_fields_name(type_name: &str) -> String {
    format!("{}Fields", type_name)
}

pub fn field_args_name(type_name: &str, field_name: &str) -> String {
    format!("{}{}Args", type_name, upper_first(field_name))
}

pub fn object_fields_name(type_name: &str) -> String {
    format!("{}Object", type_name)
}

pub fn object_field_details_name(type_name: &str) -> String {
    format!("{}FieldDetails", type_name)
}

pub fn input_object_type_name(type_name: &str) -> String {
    type_name.to_string()
}

pub fn input_object_fields_name(type_name: &str) -> String {
    format!("{}InputObject", type_name)
}

pub fn enum_values_name(enum_name: &str) -> String {
    format!("{}Values", enum_name)
}
