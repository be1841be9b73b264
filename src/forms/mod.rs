//! Form definitions backing the marketplace routes.

use validator::{ValidationErrors, ValidationErrorsKind};

pub mod listing;
pub mod user;

/// Strips markup from user text, keeping the text itself as typed.
///
/// Script and style contents are dropped. The result is plain text, so
/// characters such as `&` and `<` come back unescaped.
pub fn plain_text(input: &str) -> String {
    ammonia::Builder::empty()
        .clean(input)
        .to_string()
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&nbsp;", "\u{a0}")
        .replace("&amp;", "&")
}

/// Flattens validation errors into a single human readable message.
///
/// Uses the per-rule `message` when one is set, otherwise `<field>: <code>`.
/// Messages are sorted so the output is stable.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();
    collect_messages(errors, &mut messages);
    messages.sort();
    messages.dedup();
    messages.join("; ")
}

fn collect_messages(errors: &ValidationErrors, messages: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    messages.push(match &error.message {
                        Some(message) => message.to_string(),
                        None => format!("{field}: {}", error.code),
                    });
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_messages(nested, messages),
            ValidationErrorsKind::List(items) => {
                for nested in items.values() {
                    collect_messages(nested, messages);
                }
            }
        }
    }
}
