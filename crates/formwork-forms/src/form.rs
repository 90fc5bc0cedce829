//! The form: an ordered set of elements plus the validation pipeline.
//!
//! [`Form::validate`] runs these steps:
//! 1. Reset errors, data and element values (defaults are kept).
//! 2. Captcha check. A failure records an error but does not stop the run.
//! 3. Collect raw values, from explicit data or from the request.
//! 4. Run the before-validation hook on the raw values.
//! 5. Validate every element in declaration order, collecting its valid
//!    value and its errors.
//! 6. Merge keys no element consumed after the declared fields.
//! 7. Run the after-validation hook on the collected data.
//! 8. If the form is still valid, run the processing hook.

use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use formwork_core::logging::form_span;
use formwork_core::{FormData, FormworkResult, MessageSettings, Settings, Value, SETTINGS};
use formwork_http::RequestSource;

use crate::captcha;
use crate::element::{Element, ElementKind};
use crate::options::OptionSet;

/// Hook run on the data before or after element validation.
///
/// It receives the data and the form (to add errors) and returns the data
/// to continue with.
pub type DataHook = Arc<dyn Fn(FormData, &mut Form) -> FormworkResult<FormData> + Send + Sync>;

/// Hook run after a successful validation.
pub type ProcessHook = Arc<dyn Fn(&mut Form) -> FormworkResult<()> + Send + Sync>;

/// A form bound to a request.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use formwork_core::{form_data, Value};
/// use formwork_forms::{Filter, Form, OptionSet};
/// use formwork_http::FormRequest;
///
/// let mut form = Form::new(Arc::new(FormRequest::builder().build()), None);
/// form.add_input("name", None)
///     .add_filter(Filter::pattern("(?i)^[a-z]+$").unwrap());
/// form.add_select("age", OptionSet::from_pairs([(1, "One"), (2, "Two")]), None)
///     .set_required(true);
///
/// assert!(form.validate(Some(form_data! { "name" => "John", "age" => 2 })).unwrap());
/// assert_eq!(form.value("name"), Some(&Value::from("John")));
/// ```
pub struct Form {
    name: Option<String>,
    fields: IndexMap<String, Element>,
    data: FormData,
    errors: Vec<String>,
    captcha: Option<String>,
    captcha_field: String,
    err_captcha: String,
    messages: MessageSettings,
    before_validation: Option<DataHook>,
    after_validation: Option<DataHook>,
    process_data: Option<ProcessHook>,
    request: Arc<dyn RequestSource>,
}

impl Form {
    /// Creates a form using the global settings.
    pub fn new(request: Arc<dyn RequestSource>, name: Option<&str>) -> Self {
        Self::with_settings(request, name, &SETTINGS.current())
    }

    /// Creates a form whose messages come from `settings`.
    pub fn with_settings(
        request: Arc<dyn RequestSource>,
        name: Option<&str>,
        settings: &Settings,
    ) -> Self {
        Self {
            name: name.filter(|n| !n.is_empty()).map(str::to_string),
            fields: IndexMap::new(),
            data: FormData::new(),
            errors: Vec::new(),
            captcha: None,
            captcha_field: settings.captcha_field.clone(),
            err_captcha: settings.messages.captcha.clone(),
            messages: settings.messages.clone(),
            before_validation: None,
            after_validation: None,
            process_data: None,
            request,
        }
    }

    // ── Elements ─────────────────────────────────────────────────────

    /// Adds an element, replacing any element with the same field.
    pub fn add(&mut self, mut element: Element) -> &mut Element {
        element.set_form_name(self.name.clone());
        let (index, replaced) = self.fields.insert_full(element.field().to_string(), element);
        if replaced.is_some() {
            tracing::debug!(field = %self.fields[index].field(), "replaced form element");
        }
        &mut self.fields[index]
    }

    fn add_kind(&mut self, field: &str, name: Option<&str>, kind: ElementKind) -> &mut Element {
        let mut element = Element::new(field, kind);
        element.apply_messages(&self.messages);
        if let Some(name) = name {
            element.set_name(name);
        }
        self.add(element)
    }

    /// Adds a text input.
    pub fn add_input(&mut self, field: &str, name: Option<&str>) -> &mut Element {
        self.add_kind(field, name, ElementKind::Input)
    }

    /// Adds a password input.
    pub fn add_password(&mut self, field: &str, name: Option<&str>) -> &mut Element {
        self.add_kind(field, name, ElementKind::Password { show_value: false })
    }

    /// Adds a textarea.
    pub fn add_textarea(&mut self, field: &str, name: Option<&str>) -> &mut Element {
        self.add_kind(field, name, ElementKind::Textarea)
    }

    /// Adds a checkbox; with options it becomes a checkbox group.
    pub fn add_checkbox(
        &mut self,
        field: &str,
        name: Option<&str>,
        options: Option<OptionSet>,
    ) -> &mut Element {
        let element = self.add_kind(
            field,
            name,
            ElementKind::Checkbox {
                input_value: Value::Int(1),
                options: OptionSet::new(),
            },
        );
        if let Some(options) = options.filter(|o| !o.is_empty()) {
            element.set_options(options, true, None);
        }
        element
    }

    /// Adds a radio group restricted to `options`.
    pub fn add_radio(&mut self, field: &str, options: OptionSet, name: Option<&str>) -> &mut Element {
        let element = self.add_kind(field, name, ElementKind::Radio { options: OptionSet::new() });
        if !options.is_empty() {
            element.set_options(options, true, None);
        }
        element
    }

    /// Adds a select box restricted to `options`.
    pub fn add_select(&mut self, field: &str, options: OptionSet, name: Option<&str>) -> &mut Element {
        let element = self.add_kind(field, name, ElementKind::Select { options: OptionSet::new() });
        if !options.is_empty() {
            element.set_options(options, true, None);
        }
        element
    }

    /// Adds a file input.
    pub fn add_file(&mut self, field: &str, name: Option<&str>) -> &mut Element {
        self.add_kind(field, name, ElementKind::File)
    }

    /// Returns the element for a field.
    pub fn field(&self, field: &str) -> Option<&Element> {
        self.fields.get(field)
    }

    /// Returns the element for a field, mutably.
    pub fn field_mut(&mut self, field: &str) -> Option<&mut Element> {
        self.fields.get_mut(field)
    }

    /// Returns all elements in declaration order.
    pub const fn fields(&self) -> &IndexMap<String, Element> {
        &self.fields
    }

    /// Overwrites every element's default value.
    ///
    /// Fields missing from `values` (or every field, for `None`) get `false`.
    pub fn set_default_values(&mut self, values: Option<&FormData>) -> &mut Self {
        for (field, element) in &mut self.fields {
            let value = values
                .and_then(|v| v.get(field))
                .cloned()
                .unwrap_or(Value::Bool(false));
            element.set_default_value(value);
        }
        self
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Validates `data`, or the request when `data` is `None`.
    ///
    /// Returns whether the form is valid once every step has run.
    ///
    /// # Errors
    ///
    /// Propagates errors returned by hooks, and
    /// [`InvalidFileValue`](formwork_core::FormworkError::InvalidFileValue)
    /// when a hook hands a file element something that is not a file.
    pub fn validate(&mut self, data: Option<FormData>) -> FormworkResult<bool> {
        let span = form_span(self.name.as_deref());
        let _guard = span.enter();

        self.reset(false);

        if !self.check_captcha(data.as_ref()) {
            let message = self.err_captcha.clone();
            self.add_error(message);
        }

        let mut raw = self.collect_values(data);

        if let Some(hook) = self.before_validation.clone() {
            raw = hook(raw, self)?;
        }

        for (field, element) in &mut self.fields {
            let value = raw.shift_remove(field).unwrap_or_default();
            element.validate(value)?;

            self.data.insert(field.clone(), element.get_value(true));
            if let Some(errors) = element.errors() {
                self.errors.extend(errors.iter().cloned());
            }
        }

        for (key, value) in raw {
            self.data.entry(key).or_insert(value);
        }

        if let Some(hook) = self.after_validation.clone() {
            let data = std::mem::take(&mut self.data);
            self.data = hook(data, self)?;
        }

        if self.is_valid() {
            if let Some(hook) = self.process_data.clone() {
                hook(self)?;
            }
        }

        tracing::debug!(
            valid = self.is_valid(),
            errors = self.errors.len(),
            "form validated"
        );
        Ok(self.is_valid())
    }

    /// Gathers raw values for every declared field.
    ///
    /// Explicit data is used as given: file fields accept only uploaded
    /// files, and keys no field declares (apart from the captcha) are carried
    /// along. Request values are read under each element's input name.
    fn collect_values(&self, data: Option<FormData>) -> FormData {
        let Some(mut data) = data else {
            return self
                .fields
                .iter()
                .map(|(field, element)| {
                    let name = element.input_name();
                    let value = if element.kind().is_file() {
                        self.request.file(&name).map(Value::File)
                    } else {
                        self.request.get(&name)
                    };
                    (field.clone(), value.unwrap_or_default())
                })
                .collect();
        };

        let mut raw: FormData = self
            .fields
            .iter()
            .map(|(field, element)| {
                let value = data.shift_remove(field).unwrap_or_default();
                let value = if element.kind().is_file() && !value.is_file() {
                    Value::Null
                } else {
                    value
                };
                (field.clone(), value)
            })
            .collect();

        if let Some(captcha) = &self.captcha {
            data.shift_remove(captcha);
        }
        raw.extend(data);
        raw
    }

    fn check_captcha(&self, data: Option<&FormData>) -> bool {
        let Some(name) = self.captcha.as_deref() else {
            return true;
        };

        let submitted = match data {
            Some(data) => data.get(name).cloned(),
            None => self.request.get(&self.namespaced(name)),
        }
        .unwrap_or_default();

        let check = captcha::verify(&submitted, self.request.session(), name);
        if !check.passed() {
            tracing::debug!(captcha = name, outcome = ?check, "captcha check failed");
        }
        check.passed()
    }

    /// Returns the validated data, if the form is valid and has any.
    pub fn values(&self) -> Option<&FormData> {
        (self.is_valid() && !self.data.is_empty()).then_some(&self.data)
    }

    /// Returns one validated value, if the form is valid.
    pub fn value(&self, field: &str) -> Option<&Value> {
        self.values().and_then(|data| data.get(field))
    }

    /// Returns `true` if the form has no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors, or `None` when the form is valid.
    pub fn errors(&self) -> Option<&[String]> {
        (!self.is_valid()).then_some(self.errors.as_slice())
    }

    /// Returns the errors joined with `sep`, or `None` when the form is valid.
    pub fn errors_joined(&self, sep: &str) -> Option<String> {
        self.errors().map(|errors| errors.join(sep))
    }

    /// Records a form-level error.
    pub fn add_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self
    }

    /// Clears errors, validated data and element values.
    pub fn reset(&mut self, reset_defaults: bool) -> &mut Self {
        self.errors.clear();
        self.data.clear();
        for element in self.fields.values_mut() {
            element.reset(reset_defaults);
        }
        self
    }

    // ── Captcha ──────────────────────────────────────────────────────

    /// Requires a captcha code submitted under `name`, matching the session
    /// entry of the same name. An empty name disables the check.
    pub fn enable_captcha(&mut self, name: impl Into<String>) -> &mut Self {
        self.captcha = Some(name.into()).filter(|n| !n.is_empty());
        self
    }

    /// Requires a captcha under the configured default name.
    pub fn enable_default_captcha(&mut self) -> &mut Self {
        let name = self.captcha_field.clone();
        self.enable_captcha(name)
    }

    /// Returns the captcha name, if the check is enabled.
    pub fn captcha_name(&self) -> Option<&str> {
        self.captcha.as_deref()
    }

    /// Returns `true` if the captcha check is enabled.
    pub const fn is_captcha_enabled(&self) -> bool {
        self.captcha.is_some()
    }

    /// Returns the message recorded when the captcha check fails.
    pub fn err_captcha(&self) -> &str {
        &self.err_captcha
    }

    /// Sets the message recorded when the captcha check fails.
    pub fn set_err_captcha(&mut self, message: impl Into<String>) -> &mut Self {
        self.err_captcha = message.into();
        self
    }

    // ── Hooks ────────────────────────────────────────────────────────

    /// Sets the hook run on the raw values before element validation.
    pub fn set_before_validation(
        &mut self,
        hook: impl Fn(FormData, &mut Self) -> FormworkResult<FormData> + Send + Sync + 'static,
    ) -> &mut Self {
        self.before_validation = Some(Arc::new(hook));
        self
    }

    /// Sets the hook run on the validated data.
    pub fn set_after_validation(
        &mut self,
        hook: impl Fn(FormData, &mut Self) -> FormworkResult<FormData> + Send + Sync + 'static,
    ) -> &mut Self {
        self.after_validation = Some(Arc::new(hook));
        self
    }

    /// Sets the hook run once the form validated successfully.
    pub fn set_process_data(
        &mut self,
        hook: impl Fn(&mut Self) -> FormworkResult<()> + Send + Sync + 'static,
    ) -> &mut Self {
        self.process_data = Some(Arc::new(hook));
        self
    }

    // ── Identity and request ─────────────────────────────────────────

    /// Returns the form name.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Renames the form, updating every element's input names.
    pub fn set_name(&mut self, name: Option<&str>) -> &mut Self {
        self.name = name.filter(|n| !n.is_empty()).map(str::to_string);
        for element in self.fields.values_mut() {
            element.set_form_name(self.name.clone());
        }
        self
    }

    /// Returns the request the form reads from.
    pub fn request(&self) -> &dyn RequestSource {
        self.request.as_ref()
    }

    /// Replaces the request the form reads from.
    pub fn set_request(&mut self, request: Arc<dyn RequestSource>) -> &mut Self {
        self.request = request;
        self
    }

    /// Returns `true` if the request carries a value or a file for `field`.
    pub fn has_request_value(&self, field: &str) -> bool {
        self.request.has(&self.namespaced(field))
    }

    fn namespaced(&self, field: &str) -> String {
        match &self.name {
            Some(form) => format!("{form}[{field}]"),
            None => field.to_string(),
        }
    }
}

impl fmt::Debug for Form {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Form")
            .field("name", &self.name)
            .field("fields", &self.fields.keys().collect::<Vec<_>>())
            .field("data", &self.data)
            .field("errors", &self.errors)
            .field("captcha", &self.captcha)
            .finish_non_exhaustive()
    }
}
