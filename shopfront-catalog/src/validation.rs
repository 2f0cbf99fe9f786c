use serde::de::DeserializeOwned;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Catalog-level errors
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// Field-level messages, every failing field reported (not just the first).
    #[error("Validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}

impl CatalogError {
    pub fn messages(&self) -> &[String] {
        match self {
            CatalogError::Validation(messages) => messages,
        }
    }
}

impl From<ValidationErrors> for CatalogError {
    fn from(errors: ValidationErrors) -> Self {
        CatalogError::Validation(error_messages(&errors))
    }
}

/// Run the record's declared field rules.
pub fn validate<T: Validate>(payload: &T) -> Result<(), CatalogError> {
    payload.validate().map_err(CatalogError::from)
}

/// Decode a JSON payload into a record type and validate it.
///
/// Shape errors (missing required field, wrong type) surface as a single
/// validation message so callers see one error kind for bad input.
pub fn parse<T>(payload: serde_json::Value) -> Result<T, CatalogError>
where
    T: DeserializeOwned + Validate,
{
    let record: T = serde_json::from_value(payload)
        .map_err(|e| CatalogError::Validation(vec![e.to_string()]))?;
    validate(&record)?;
    Ok(record)
}

/// Flatten nested validator output into sorted `<field path> <problem>` strings.
pub fn error_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut messages = Vec::new();
    collect(errors, "", &mut messages);
    messages.sort();
    messages
}

fn collect(errors: &ValidationErrors, prefix: &str, out: &mut Vec<String>) {
    for (field, kind) in errors.errors() {
        let field = field.to_string();
        let path = match (prefix.is_empty(), field.as_str()) {
            (_, "__all__") => prefix.to_string(),
            (true, _) => field,
            (false, _) => format!("{}.{}", prefix, field),
        };

        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                out.extend(field_errors.iter().map(|error| describe(&path, error)));
            }
            ValidationErrorsKind::Struct(nested) => collect(nested, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, nested) in items {
                    collect(nested, &format!("{}[{}]", path, index), out);
                }
            }
        }
    }
}

fn describe(path: &str, error: &ValidationError) -> String {
    let text = match &error.message {
        Some(message) => message.to_string(),
        None => match &*error.code {
            "range" => match (error.params.get("min"), error.params.get("max")) {
                (Some(min), Some(max)) => format!("must be between {} and {}", min, max),
                (Some(min), None) => format!("must be at least {}", min),
                (None, Some(max)) => format!("must be at most {}", max),
                _ => "is out of range".to_string(),
            },
            "length" => match error.params.get("min") {
                Some(min) => format!("must have a length of at least {}", min),
                None => "has an invalid length".to_string(),
            },
            "email" => "must be a valid email address".to_string(),
            "url" => "must be a valid URL".to_string(),
            code => format!("is invalid ({})", code),
        },
    };

    if path.is_empty() {
        text
    } else {
        format!("{} {}", path, text)
    }
}
