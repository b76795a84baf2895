//! Request payload validation for the light app endpoints.
//!
//! Each operation has a typed input struct implementing [`Form`]. Cleaning walks the
//! fields in declaration order and collects every field error, so the first error
//! reported is the first invalid field.

use serde_json::{Map, Value};

/// Raw JSON body parameters
pub type Params = Map<String, Value>;

pub const APP_CODE_MAX_LENGTH: usize = 32;
pub const LIGHT_APP_CODE_MAX_LENGTH: usize = 64;
pub const LIGHT_APP_NAME_MAX_LENGTH: usize = 20;
pub const APP_URL_MAX_LENGTH: usize = 1024;
pub const INTRODUCTION_MAX_LENGTH: usize = 1024;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Field errors in field declaration order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormErrors(pub Vec<FieldError>);

impl FormErrors {
    pub fn first(&self) -> Option<&FieldError> {
        self.0.first()
    }

    /// Message of the first field error, as reported to clients
    pub fn first_message(&self) -> String {
        self.first()
            .map(ToString::to_string)
            .unwrap_or_else(|| "invalid parameters".to_string())
    }
}

/// A validated, fully-populated operation input
pub trait Form: Sized {
    fn clean(params: &Params) -> Result<Self, FormErrors>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightAppCreation {
    pub bk_app_code: String,
    pub bk_light_app_name: String,
    pub app_url: String,
    pub introduction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightAppEdition {
    pub bk_light_app_code: String,
    pub bk_light_app_name: Option<String>,
    pub app_url: Option<String>,
    pub introduction: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightAppLogoChange {
    pub bk_light_app_code: String,
    /// Base64 payload, optionally as a `data:` URI
    pub logo: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LightAppRemoval {
    pub bk_light_app_code: String,
}

impl Form for LightAppCreation {
    fn clean(params: &Params) -> Result<Self, FormErrors> {
        let mut c = Cleaner::new(params);
        let bk_app_code = c.required("bk_app_code", Some(APP_CODE_MAX_LENGTH));
        let bk_light_app_name = c.required("bk_light_app_name", Some(LIGHT_APP_NAME_MAX_LENGTH));
        let app_url = c.required_url("app_url");
        let introduction = c.optional("introduction", Some(INTRODUCTION_MAX_LENGTH));
        c.finish(|| Self {
            bk_app_code,
            bk_light_app_name,
            app_url,
            introduction,
        })
    }
}

impl Form for LightAppEdition {
    fn clean(params: &Params) -> Result<Self, FormErrors> {
        let mut c = Cleaner::new(params);
        let bk_light_app_code = c.required("bk_light_app_code", Some(LIGHT_APP_CODE_MAX_LENGTH));
        let bk_light_app_name = c.optional("bk_light_app_name", Some(LIGHT_APP_NAME_MAX_LENGTH));
        let app_url = c.optional_url("app_url");
        let introduction = c.optional("introduction", Some(INTRODUCTION_MAX_LENGTH));
        c.finish(|| Self {
            bk_light_app_code,
            bk_light_app_name,
            app_url,
            introduction,
        })
    }
}

impl Form for LightAppLogoChange {
    fn clean(params: &Params) -> Result<Self, FormErrors> {
        let mut c = Cleaner::new(params);
        let bk_light_app_code = c.required("bk_light_app_code", Some(LIGHT_APP_CODE_MAX_LENGTH));
        let logo = c.required("logo", None);
        c.finish(|| Self {
            bk_light_app_code,
            logo,
        })
    }
}

impl Form for LightAppRemoval {
    fn clean(params: &Params) -> Result<Self, FormErrors> {
        let mut c = Cleaner::new(params);
        let bk_light_app_code = c.required("bk_light_app_code", Some(LIGHT_APP_CODE_MAX_LENGTH));
        c.finish(|| Self { bk_light_app_code })
    }
}

struct Cleaner<'a> {
    params: &'a Params,
    errors: Vec<FieldError>,
}

impl<'a> Cleaner<'a> {
    fn new(params: &'a Params) -> Self {
        Self {
            params,
            errors: Vec::new(),
        }
    }

    fn error(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.push(FieldError {
            field,
            message: message.into(),
        });
    }

    /// Coerce a raw value to trimmed text; `None` when the value has the wrong shape
    fn text(&mut self, field: &'static str) -> Option<String> {
        match self.params.get(field) {
            None | Some(Value::Null) => Some(String::new()),
            Some(Value::String(s)) => Some(s.trim().to_string()),
            Some(Value::Number(n)) => Some(n.to_string()),
            Some(Value::Bool(b)) => Some(b.to_string()),
            Some(Value::Array(_)) | Some(Value::Object(_)) => {
                self.error(field, "Enter a valid value.");
                None
            }
        }
    }

    fn check_length(&mut self, field: &'static str, value: &str, max: Option<usize>) -> bool {
        let Some(max) = max else { return true };
        let len = value.chars().count();
        if len > max {
            self.error(
                field,
                format!("Ensure this value has at most {} characters (it has {}).", max, len),
            );
            return false;
        }
        true
    }

    fn required(&mut self, field: &'static str, max: Option<usize>) -> String {
        let Some(value) = self.text(field) else {
            return String::new();
        };
        if value.is_empty() {
            self.error(field, "This field is required.");
            return value;
        }
        self.check_length(field, &value, max);
        value
    }

    /// Blank values clean to `None`
    fn optional(&mut self, field: &'static str, max: Option<usize>) -> Option<String> {
        let value = self.text(field)?;
        if value.is_empty() || !self.check_length(field, &value, max) {
            return None;
        }
        Some(value)
    }

    fn required_url(&mut self, field: &'static str) -> String {
        let before = self.errors.len();
        let value = self.required(field, Some(APP_URL_MAX_LENGTH));
        if self.errors.len() == before && !is_valid_url(&value) {
            self.error(field, "Enter a valid URL.");
        }
        value
    }

    fn optional_url(&mut self, field: &'static str) -> Option<String> {
        let value = self.optional(field, Some(APP_URL_MAX_LENGTH))?;
        if !is_valid_url(&value) {
            self.error(field, "Enter a valid URL.");
            return None;
        }
        Some(value)
    }

    fn finish<T>(self, build: impl FnOnce() -> T) -> Result<T, FormErrors> {
        if self.errors.is_empty() {
            Ok(build())
        } else {
            Err(FormErrors(self.errors))
        }
    }
}

fn is_valid_url(value: &str) -> bool {
    match url::Url::parse(value) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Params {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    #[test]
    fn creation_accepts_complete_payload() {
        let form = LightAppCreation::clean(&params(json!({
            "bk_app_code": " bk_demo ",
            "bk_light_app_name": "Demo",
            "app_url": "https://demo.example.com/index",
        })))
        .unwrap();

        assert_eq!(form.bk_app_code, "bk_demo");
        assert_eq!(form.app_url, "https://demo.example.com/index");
        assert_eq!(form.introduction, None);
    }

    #[test]
    fn empty_payload_reports_first_declared_field() {
        let errors = LightAppCreation::clean(&Params::new()).unwrap_err();
        assert_eq!(errors.0.len(), 3);
        assert_eq!(errors.first_message(), "bk_app_code: This field is required.");
    }

    #[test]
    fn rejects_non_http_urls_and_long_names() {
        let errors = LightAppCreation::clean(&params(json!({
            "bk_app_code": "bk_demo",
            "bk_light_app_name": "a name that is far too long for a light app",
            "app_url": "ftp://files.example.com",
        })))
        .unwrap_err();

        assert_eq!(errors.0[0].field, "bk_light_app_name");
        assert!(errors.0[0].message.starts_with("Ensure this value has at most 20"));
        assert_eq!(errors.0[1].field, "app_url");
        assert_eq!(errors.0[1].message, "Enter a valid URL.");
    }

    #[test]
    fn numbers_are_coerced_and_objects_rejected() {
        let form = LightAppRemoval::clean(&params(json!({"bk_light_app_code": 42}))).unwrap();
        assert_eq!(form.bk_light_app_code, "42");

        let errors =
            LightAppRemoval::clean(&params(json!({"bk_light_app_code": {"a": 1}}))).unwrap_err();
        assert_eq!(errors.first_message(), "bk_light_app_code: Enter a valid value.");
    }

    #[test]
    fn edition_treats_blank_fields_as_absent() {
        let form = LightAppEdition::clean(&params(json!({
            "bk_light_app_code": "light_1",
            "bk_light_app_name": "  ",
            "app_url": null,
            "introduction": "new intro",
        })))
        .unwrap();

        assert_eq!(form.bk_light_app_name, None);
        assert_eq!(form.app_url, None);
        assert_eq!(form.introduction.as_deref(), Some("new intro"));
    }

    #[test]
    fn edition_validates_supplied_url() {
        let errors = LightAppEdition::clean(&params(json!({
            "bk_light_app_code": "light_1",
            "app_url": "not a url",
        })))
        .unwrap_err();
        assert_eq!(errors.first_message(), "app_url: Enter a valid URL.");
    }

    #[test]
    fn logo_is_required() {
        let errors =
            LightAppLogoChange::clean(&params(json!({"bk_light_app_code": "light_1"}))).unwrap_err();
        assert_eq!(errors.first_message(), "logo: This field is required.");
    }
}
