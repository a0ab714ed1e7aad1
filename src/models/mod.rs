pub mod auth;
pub mod closing;
pub mod consultant;
pub mod dashboard;
pub mod lead;
pub mod meta_ads;
pub mod partner;
pub mod visit;

use serde::{Deserialize, Deserializer};

// Formulários mandam "" para campos em branco: tratamos como ausente.
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.and_then(|s| {
        let trimmed = s.trim();
        if trimmed.is_empty() { None } else { Some(trimmed.to_string()) }
    }))
}

// Campos obrigatórios chegam sem espaços nas pontas; "   " vira "" e reprova no `length(min = 1)`.
pub(crate) fn trimmed<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = String::deserialize(deserializer)?;
    Ok(value.trim().to_string())
}
