// src/common/i18n.rs

use std::{collections::HashMap, sync::{Arc, LazyLock}};

pub const DEFAULT_LANG: &str = "pt";

// Store compartilhado pelos pontos que não recebem o AppState (ex: middleware)
pub static DEFAULT_STORE: LazyLock<I18nStore> = LazyLock::new(I18nStore::new);

type Catalog = HashMap<&'static str, &'static str>;

/// Catálogo de mensagens por idioma. Chaves desconhecidas voltam como estão.
#[derive(Clone)]
pub struct I18nStore {
    catalogs: Arc<HashMap<&'static str, Catalog>>,
}

impl Default for I18nStore {
    fn default() -> Self {
        Self::new()
    }
}

impl I18nStore {
    pub fn new() -> Self {
        let mut catalogs = HashMap::new();
        catalogs.insert("pt", portuguese());
        catalogs.insert("en", english());
        Self { catalogs: Arc::new(catalogs) }
    }

    pub fn translate(&self, lang: &str, key: &str) -> String {
        self.catalogs
            .get(lang)
            .and_then(|c| c.get(key))
            .or_else(|| self.catalogs.get(DEFAULT_LANG).and_then(|c| c.get(key)))
            .map(|msg| msg.to_string())
            .unwrap_or_else(|| key.to_string())
    }

    pub fn supports(&self, lang: &str) -> bool {
        self.catalogs.contains_key(lang)
    }
}

fn portuguese() -> Catalog {
    HashMap::from([
        ("error.validation", "Um ou mais campos são inválidos."),
        ("error.email_exists", "Este e-mail já está em uso."),
        ("error.duplicate", "Já existe um registro com esses dados."),
        ("error.invalid_credentials", "E-mail ou senha inválidos."),
        ("error.invalid_token", "Token de autenticação inválido ou ausente."),
        ("error.forbidden", "Você não tem permissão para realizar esta ação."),
        ("error.not_found", "Registro não encontrado."),
        ("error.integration_off", "Integração externa não configurada."),
        ("error.upstream", "Falha ao consultar serviço externo."),
        ("error.internal", "Ocorreu um erro inesperado."),
        ("file.missing", "Envie o contrato no campo 'contrato'."),
        ("file.not_pdf", "O contrato deve ser um arquivo PDF."),
        ("file.too_large", "O contrato excede o tamanho máximo de 10 MB."),
        ("file.no_contract", "Este fechamento não possui contrato."),
        // Códigos de validação de campos
        ("required", "Campo obrigatório."),
        ("invalid_phone", "Telefone deve ter 10 ou 11 dígitos com DDD."),
        ("invalid_cpf", "CPF deve ter 11 dígitos."),
        ("invalid_email", "E-mail inválido."),
        ("invalid_state", "Estado deve ser a sigla com 2 letras (UF)."),
        ("invalid_value", "O valor deve ser maior que zero."),
        ("invalid_price", "O preço não pode ser negativo."),
        ("password_too_short", "A senha deve ter no mínimo 6 caracteres."),
        ("invalid_period", "Período inválido: 'since' deve ser anterior a 'until'."),
    ])
}

fn english() -> Catalog {
    HashMap::from([
        ("error.validation", "One or more fields are invalid."),
        ("error.email_exists", "This e-mail is already in use."),
        ("error.duplicate", "A record with this data already exists."),
        ("error.invalid_credentials", "Invalid e-mail or password."),
        ("error.invalid_token", "Invalid or missing authentication token."),
        ("error.forbidden", "You are not allowed to perform this action."),
        ("error.not_found", "Record not found."),
        ("error.integration_off", "External integration is not configured."),
        ("error.upstream", "External service request failed."),
        ("error.internal", "An unexpected error occurred."),
        ("file.missing", "Send the contract in the 'contrato' field."),
        ("file.not_pdf", "The contract must be a PDF file."),
        ("file.too_large", "The contract exceeds the 10 MB limit."),
        ("file.no_contract", "This closing has no contract."),
        ("required", "Required field."),
        ("invalid_phone", "Phone must have 10 or 11 digits including area code."),
        ("invalid_cpf", "CPF must have 11 digits."),
        ("invalid_email", "Invalid e-mail."),
        ("invalid_state", "State must be a 2-letter code."),
        ("invalid_value", "Value must be greater than zero."),
        ("invalid_price", "Price cannot be negative."),
        ("password_too_short", "Password must have at least 6 characters."),
        ("invalid_period", "Invalid period: 'since' must come before 'until'."),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_language_falls_back_to_portuguese() {
        let store = I18nStore::new();
        assert_eq!(store.translate("de", "error.not_found"), "Registro não encontrado.");
    }

    #[test]
    fn unknown_key_is_returned_verbatim() {
        let store = I18nStore::new();
        assert_eq!(store.translate("en", "some_custom_code"), "some_custom_code");
    }

    #[test]
    fn catalogs_cover_the_same_keys() {
        let pt = portuguese();
        let en = english();
        for key in pt.keys() {
            assert!(en.contains_key(key), "missing english message for {key}");
        }
    }
}
