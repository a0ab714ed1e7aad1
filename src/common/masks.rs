// src/common/masks.rs
//
// Máscaras de documentos e telefones no formato usado pelo front-end.

use validator::ValidationError;

pub fn only_digits(raw: &str) -> String {
    raw.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// "12345678901" ou "123.456.789-01" -> "123.456.789-01"
pub fn format_cpf(raw: &str) -> Option<String> {
    let digits = only_digits(raw);
    if digits.len() != 11 {
        return None;
    }
    Some(format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    ))
}

/// Aceita DDD + número (10 ou 11 dígitos), com ou sem o DDI 55.
pub fn format_phone(raw: &str) -> Option<String> {
    let mut digits = only_digits(raw);
    if (digits.len() == 12 || digits.len() == 13) && digits.starts_with("55") {
        digits.drain(..2);
    }
    match digits.len() {
        11 => Some(format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11])),
        10 => Some(format!("({}) {}-{}", &digits[0..2], &digits[2..6], &digits[6..10])),
        _ => None,
    }
}

/// UF com duas letras, sempre em maiúsculas.
pub fn normalize_state(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.len() == 2 && trimmed.chars().all(|c| c.is_ascii_alphabetic()) {
        Some(trimmed.to_ascii_uppercase())
    } else {
        None
    }
}

// --- Validadores para o `validator` ---

pub fn validate_phone(value: &str) -> Result<(), ValidationError> {
    format_phone(value).map(|_| ()).ok_or_else(|| {
        let mut err = ValidationError::new("phone");
        err.message = Some("invalid_phone".into());
        err
    })
}

pub fn validate_cpf(value: &str) -> Result<(), ValidationError> {
    format_cpf(value).map(|_| ()).ok_or_else(|| {
        let mut err = ValidationError::new("cpf");
        err.message = Some("invalid_cpf".into());
        err
    })
}

pub fn validate_state(value: &str) -> Result<(), ValidationError> {
    normalize_state(value).map(|_| ()).ok_or_else(|| {
        let mut err = ValidationError::new("state");
        err.message = Some("invalid_state".into());
        err
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cpf_is_masked_from_any_punctuation() {
        assert_eq!(format_cpf("12345678901").as_deref(), Some("123.456.789-01"));
        assert_eq!(format_cpf("123.456.789-01").as_deref(), Some("123.456.789-01"));
        assert_eq!(format_cpf(" 123 456 789 01 ").as_deref(), Some("123.456.789-01"));
    }

    #[test]
    fn cpf_with_wrong_length_is_rejected() {
        assert!(format_cpf("1234567890").is_none());
        assert!(format_cpf("").is_none());
        assert!(validate_cpf("123").is_err());
    }

    #[test]
    fn mobile_and_landline_masks() {
        assert_eq!(format_phone("11912345678").as_deref(), Some("(11) 91234-5678"));
        assert_eq!(format_phone("(11) 3456-7890").as_deref(), Some("(11) 3456-7890"));
        assert_eq!(format_phone("+55 11 91234-5678").as_deref(), Some("(11) 91234-5678"));
    }

    #[test]
    fn short_phone_is_rejected() {
        assert!(format_phone("91234567").is_none());
        let err = validate_phone("123").unwrap_err();
        assert_eq!(err.message.as_deref(), Some("invalid_phone"));
    }

    #[test]
    fn state_is_upper_cased() {
        assert_eq!(normalize_state("sp").as_deref(), Some("SP"));
        assert_eq!(normalize_state(" rj ").as_deref(), Some("RJ"));
        assert!(normalize_state("São Paulo").is_none());
        assert!(normalize_state("S1").is_none());
    }
}
