//! Form elements: one field's value, validation state and markup.
//!
//! An [`Element`] holds the last value it validated, an optional default,
//! its filters and the errors of the last run. Variant-specific behaviour
//! (password masking, checkbox input values, option sets) lives in
//! [`ElementKind`].
//!
//! Validation runs in two steps:
//! 1. Required check: a required element with an empty value fails.
//! 2. Filter check: only for non-empty values. Filters run in order,
//!    option-derived whitelist first. The first rejecting filter records one
//!    error and stops the run.
//!
//! Elements that allow multiple choice filter lists item by item, dropping
//! rejected items; only a list with nothing left is an error.

use formwork_core::utils::sprintf_name;
use formwork_core::{FormworkError, FormworkResult, MessageSettings, Value, SETTINGS};

use crate::filter::Filter;
use crate::options::OptionSet;
use crate::tag::{lines, Attrs, Node, Tag};

/// File elements never fall back to a default.
static NO_FILE: Value = Value::Bool(false);

/// The closed set of element variants.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementKind {
    /// `<input type="text">`.
    Input,
    /// `<input type="password">`; the value is only echoed back when `show_value` is set.
    Password {
        /// Whether rendering includes the current value.
        show_value: bool,
    },
    /// `<textarea>`.
    Textarea,
    /// A single checkbox, or a checkbox group when `options` is non-empty.
    Checkbox {
        /// The `value` attribute of a single checkbox.
        input_value: Value,
        /// Group choices.
        options: OptionSet,
    },
    /// A group of radio buttons.
    Radio {
        /// The choices.
        options: OptionSet,
    },
    /// A `<select>` box.
    Select {
        /// The choices.
        options: OptionSet,
    },
    /// `<input type="file">`; accepts only uploaded files.
    File,
}

impl ElementKind {
    /// Returns the lowercase variant name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Input => "input",
            Self::Password { .. } => "password",
            Self::Textarea => "textarea",
            Self::Checkbox { .. } => "checkbox",
            Self::Radio { .. } => "radio",
            Self::Select { .. } => "select",
            Self::File => "file",
        }
    }

    /// Returns `true` for variants that carry an option set.
    pub const fn has_options(&self) -> bool {
        matches!(
            self,
            Self::Checkbox { .. } | Self::Radio { .. } | Self::Select { .. }
        )
    }

    /// Returns `true` for the file variant.
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File)
    }

    const fn options(&self) -> Option<&OptionSet> {
        match self {
            Self::Checkbox { options, .. } | Self::Radio { options } | Self::Select { options } => {
                Some(options)
            }
            _ => None,
        }
    }

    fn options_mut(&mut self) -> Option<&mut OptionSet> {
        match self {
            Self::Checkbox { options, .. } | Self::Radio { options } | Self::Select { options } => {
                Some(options)
            }
            _ => None,
        }
    }
}

/// A single form field.
///
/// # Examples
///
/// ```
/// use formwork_core::Value;
/// use formwork_forms::{Element, Filter};
///
/// let mut el = Element::input("age");
/// el.add_filter(Filter::predicate(|v| v.as_f64().is_some()));
///
/// assert!(el.validate(123).unwrap());
/// assert_eq!(el.get_value(true), Value::Int(123));
///
/// assert!(!el.validate("abc").unwrap());
/// assert_eq!(el.get_value(false), Value::from("abc"));
/// assert_eq!(el.errors_joined(" "), Some("Field \"age\" is filled incorrectly".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct Element {
    field: String,
    display_name: Option<String>,
    kind: ElementKind,
    value: Option<Value>,
    default_value: Value,
    required: bool,
    multiple: bool,
    placeholder: Option<String>,
    attr: Attrs,
    option_filter: Option<Filter>,
    filters: Vec<Filter>,
    ignore_option_keys: bool,
    errors: Vec<String>,
    form_name: Option<String>,
    tmpl_err_required: String,
    tmpl_err_wrong: String,
}

impl Element {
    /// Creates an element of the given kind.
    ///
    /// Error templates come from the global settings.
    pub fn new(field: impl Into<String>, kind: ElementKind) -> Self {
        let messages = SETTINGS
            .get()
            .map(|s| s.messages.clone())
            .unwrap_or_default();

        let mut element = Self {
            field: field.into(),
            display_name: None,
            kind,
            value: None,
            default_value: Value::Null,
            required: false,
            multiple: false,
            placeholder: None,
            attr: Attrs::new(),
            option_filter: None,
            filters: Vec::new(),
            ignore_option_keys: false,
            errors: Vec::new(),
            form_name: None,
            tmpl_err_required: String::new(),
            tmpl_err_wrong: String::new(),
        };
        element.apply_messages(&messages);
        element
    }

    /// Creates a text input.
    pub fn input(field: impl Into<String>) -> Self {
        Self::new(field, ElementKind::Input)
    }

    /// Creates a password input.
    pub fn password(field: impl Into<String>) -> Self {
        Self::new(field, ElementKind::Password { show_value: false })
    }

    /// Creates a textarea.
    pub fn textarea(field: impl Into<String>) -> Self {
        Self::new(field, ElementKind::Textarea)
    }

    /// Creates a single checkbox with input value `1`.
    pub fn checkbox(field: impl Into<String>) -> Self {
        Self::new(
            field,
            ElementKind::Checkbox {
                input_value: Value::Int(1),
                options: OptionSet::new(),
            },
        )
    }

    /// Creates a radio group restricted to `options`.
    pub fn radio(field: impl Into<String>, options: OptionSet) -> Self {
        let mut element = Self::new(field, ElementKind::Radio { options: OptionSet::new() });
        if !options.is_empty() {
            element.set_options(options, true, None);
        }
        element
    }

    /// Creates a select box restricted to `options`.
    pub fn select(field: impl Into<String>, options: OptionSet) -> Self {
        let mut element = Self::new(field, ElementKind::Select { options: OptionSet::new() });
        if !options.is_empty() {
            element.set_options(options, true, None);
        }
        element
    }

    /// Creates a file input.
    pub fn file(field: impl Into<String>) -> Self {
        Self::new(field, ElementKind::File)
    }

    // ── Validation ───────────────────────────────────────────────────

    /// Validates a value, replacing the previous value and errors.
    ///
    /// Returns whether the value is valid. `Null` is stored like any other
    /// value, so the default no longer applies until [`reset`](Self::reset).
    ///
    /// # Errors
    ///
    /// File elements return [`FormworkError::InvalidFileValue`] for a
    /// non-empty value that is not an uploaded file. The element is left
    /// untouched in that case.
    pub fn validate(&mut self, value: impl Into<Value>) -> FormworkResult<bool> {
        let value = value.into();

        if self.kind.is_file() && !value.is_empty() && !value.is_file() {
            tracing::warn!(field = %self.field, "non-file value passed to a file element");
            return Err(FormworkError::InvalidFileValue {
                field: self.field.clone(),
            });
        }

        self.reset(false);
        self.value = Some(value);

        if self.check_required() {
            self.check_filters();
        }

        tracing::trace!(
            field = %self.field,
            kind = self.kind.as_str(),
            valid = self.is_valid(),
            "element validated"
        );
        Ok(self.is_valid())
    }

    fn check_required(&mut self) -> bool {
        let empty = self.value.as_ref().map_or(true, Value::is_empty);
        if self.required && empty {
            let message = sprintf_name(&self.tmpl_err_required, self.display_name());
            self.errors.push(message);
            return false;
        }
        true
    }

    fn check_filters(&mut self) {
        let Some(mut value) = self.value.take() else {
            return;
        };

        let mut rejected = false;
        if !value.is_empty() {
            for filter in self.option_filter.iter().chain(&self.filters) {
                let accepted = match &value {
                    Value::List(items) if self.multiple => {
                        let kept = filter.apply_list(items);
                        (!kept.is_empty()).then_some(Value::List(kept))
                    }
                    scalar => filter.apply(scalar),
                };

                match accepted {
                    Some(v) => value = v,
                    None => {
                        rejected = true;
                        break;
                    }
                }
            }
        }

        self.value = Some(value);
        if rejected {
            let message = sprintf_name(&self.tmpl_err_wrong, self.display_name());
            self.errors.push(message);
        }
    }

    /// Returns the element's value.
    ///
    /// With `only_valid`, an invalid element yields `[]` when multiple choice
    /// is allowed and `false` otherwise. Before any validation the default
    /// value is used. Multiple-choice elements always yield a list.
    pub fn get_value(&self, only_valid: bool) -> Value {
        if only_valid && !self.is_valid() {
            return if self.multiple {
                Value::List(Vec::new())
            } else {
                Value::Bool(false)
            };
        }

        let value = self
            .value
            .clone()
            .unwrap_or_else(|| self.default_value().clone());

        if self.multiple {
            Value::List(value.into_list())
        } else {
            value
        }
    }

    /// Returns the last validated value, without falling back to the default.
    pub const fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// Clears the value and errors, and the default value too if asked.
    pub fn reset(&mut self, reset_defaults: bool) -> &mut Self {
        self.errors.clear();
        self.value = None;
        if reset_defaults {
            self.default_value = Value::Null;
        }
        self
    }

    /// Records an error, making the element invalid.
    pub fn add_error(&mut self, error: impl Into<String>) -> &mut Self {
        self.errors.push(error.into());
        self
    }

    /// Returns `true` if the element has no errors.
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Returns the errors, or `None` when the element is valid.
    pub fn errors(&self) -> Option<&[String]> {
        (!self.is_valid()).then_some(self.errors.as_slice())
    }

    /// Returns the errors joined with `sep`, or `None` when the element is valid.
    pub fn errors_joined(&self, sep: &str) -> Option<String> {
        self.errors().map(|errors| errors.join(sep))
    }

    // ── Identity ─────────────────────────────────────────────────────

    /// Returns the field identifier.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Returns the label used in messages: the display name, or the field.
    pub fn display_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.field)
    }

    /// Sets the label used in messages.
    pub fn set_name(&mut self, name: impl Into<String>) -> &mut Self {
        self.display_name = Some(name.into());
        self
    }

    /// Returns the element variant.
    pub const fn kind(&self) -> &ElementKind {
        &self.kind
    }

    /// Returns the name of the owning form, if it has one.
    pub fn form_name(&self) -> Option<&str> {
        self.form_name.as_deref()
    }

    pub(crate) fn set_form_name(&mut self, form_name: Option<String>) {
        self.form_name = form_name.filter(|n| !n.is_empty());
    }

    /// The `name` attribute: `field`, or `form[field]` inside a named form.
    pub fn input_name(&self) -> String {
        match &self.form_name {
            Some(form) => format!("{form}[{}]", self.field),
            None => self.field.clone(),
        }
    }

    /// The `id` attribute: `form-field`, or `form-<form>-<field>` inside a named form.
    pub fn input_id(&self) -> String {
        match &self.form_name {
            Some(form) => format!("form-{form}-{}", self.field),
            None => format!("form-{}", self.field),
        }
    }

    // ── Configuration ────────────────────────────────────────────────

    /// Returns the default value.
    pub fn default_value(&self) -> &Value {
        if self.kind.is_file() {
            &NO_FILE
        } else {
            &self.default_value
        }
    }

    /// Sets the value used until the element is validated.
    pub fn set_default_value(&mut self, value: impl Into<Value>) -> &mut Self {
        self.default_value = value.into();
        self
    }

    /// Returns `true` if an empty value is an error.
    pub const fn is_required(&self) -> bool {
        self.required
    }

    /// Marks the element as required or optional.
    pub fn set_required(&mut self, required: bool) -> &mut Self {
        self.required = required;
        self
    }

    /// Returns `true` if the element accepts a list of values.
    pub const fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Allows or forbids lists of values.
    pub fn set_multiple(&mut self, multiple: bool) -> &mut Self {
        self.multiple = multiple;
        self
    }

    /// Appends a filter. Filters run in the order they were added.
    pub fn add_filter(&mut self, filter: impl Into<Filter>) -> &mut Self {
        self.filters.push(filter.into());
        self
    }

    /// Returns the filters added with [`add_filter`](Self::add_filter).
    pub fn filters(&self) -> &[Filter] {
        &self.filters
    }

    /// Returns the placeholder text.
    pub fn placeholder(&self) -> Option<&str> {
        self.placeholder.as_deref()
    }

    /// Sets the placeholder text.
    pub fn set_placeholder(&mut self, placeholder: impl Into<String>) -> &mut Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// Returns the stored tag attributes.
    pub const fn attr(&self) -> &Attrs {
        &self.attr
    }

    /// Sets the tag attributes used when rendering without an override.
    ///
    /// A plain string sets the `class` attribute.
    pub fn set_attr(&mut self, attr: impl Into<Attrs>) -> &mut Self {
        self.attr = attr.into();
        self
    }

    /// Returns the required-field message template.
    pub fn tmpl_err_required(&self) -> &str {
        &self.tmpl_err_required
    }

    /// Sets the required-field message template; `%s` is the display name.
    pub fn set_tmpl_err_required(&mut self, tmpl: impl Into<String>) -> &mut Self {
        self.tmpl_err_required = tmpl.into();
        self
    }

    /// Returns the rejected-value message template.
    pub fn tmpl_err_wrong(&self) -> &str {
        &self.tmpl_err_wrong
    }

    /// Sets the rejected-value message template; `%s` is the display name.
    pub fn set_tmpl_err_wrong(&mut self, tmpl: impl Into<String>) -> &mut Self {
        self.tmpl_err_wrong = tmpl.into();
        self
    }

    /// Takes both message templates from `messages`.
    pub fn apply_messages(&mut self, messages: &MessageSettings) -> &mut Self {
        self.tmpl_err_required.clone_from(&messages.required);
        self.tmpl_err_wrong.clone_from(&messages.wrong);
        self
    }

    // ── Variant settings ─────────────────────────────────────────────

    /// Echo the current value back when rendering a password input.
    pub fn set_show_value(&mut self, show: bool) -> &mut Self {
        match &mut self.kind {
            ElementKind::Password { show_value } => *show_value = show,
            other => {
                tracing::warn!(field = %self.field, kind = other.as_str(), "show_value only applies to passwords");
            }
        }
        self
    }

    /// Sets the `value` attribute of a single checkbox.
    pub fn set_input_value(&mut self, value: impl Into<Value>) -> &mut Self {
        match &mut self.kind {
            ElementKind::Checkbox { input_value, .. } => *input_value = value.into(),
            other => {
                tracing::warn!(field = %self.field, kind = other.as_str(), "input_value only applies to checkboxes");
            }
        }
        self
    }

    /// Returns the option set of select, radio and checkbox elements.
    pub const fn options(&self) -> Option<&OptionSet> {
        self.kind.options()
    }

    /// Replaces the options.
    ///
    /// With `add_filter`, submissions are restricted to the option keys
    /// (labels when keys are ignored); this replaces any earlier
    /// option-derived restriction. `ignore_keys` updates the flag first when
    /// given. Checkboxes with options become multiple choice.
    pub fn set_options(
        &mut self,
        options: OptionSet,
        add_filter: bool,
        ignore_keys: Option<bool>,
    ) -> &mut Self {
        if !self.kind.has_options() {
            tracing::warn!(field = %self.field, kind = self.kind.as_str(), "element does not take options");
            return self;
        }

        if let Some(ignore) = ignore_keys {
            self.ignore_option_keys = ignore;
        }

        self.option_filter = add_filter
            .then(|| Filter::Whitelist(options.allowed_values(self.ignore_option_keys)));

        if let Some(slot) = self.kind.options_mut() {
            *slot = options;
        }

        if matches!(self.kind, ElementKind::Checkbox { .. }) {
            self.multiple = true;
        }
        self
    }

    /// Returns `true` if option labels stand in for option keys.
    pub const fn ignore_option_keys(&self) -> bool {
        self.ignore_option_keys
    }

    /// Makes option labels stand in for option keys when rendering.
    ///
    /// An existing option-derived filter is left as is; call
    /// [`set_options`](Self::set_options) afterwards to filter by labels.
    pub fn set_ignore_option_keys(&mut self, ignore: bool) -> &mut Self {
        self.ignore_option_keys = ignore;
        self
    }

    // ── Files ────────────────────────────────────────────────────────

    /// The extension of the uploaded file, if there is one.
    pub fn file_extension(&self) -> Option<&str> {
        self.uploaded_file().and_then(|f| f.extension())
    }

    /// The client filename of the uploaded file, if there is one.
    pub fn file_name(&self) -> Option<&str> {
        self.uploaded_file().map(|f| f.file_name())
    }

    fn uploaded_file(&self) -> Option<&formwork_core::UploadedFile> {
        self.value.as_ref().and_then(Value::as_file)
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Renders the element.
    ///
    /// `attr` replaces the stored attributes for this call. Either set is
    /// merged over the computed `id` (and `placeholder` for text inputs).
    /// Radio and checkbox markup carries no attributes.
    pub fn render(&self, attr: Option<&Attrs>) -> Tag {
        match &self.kind {
            ElementKind::Input => {
                let value = self.get_value(false);
                self.render_input("text", self.prepare_attrs(attr, true), Some(&value))
            }
            ElementKind::Password { show_value } => {
                let value = show_value.then(|| self.get_value(false));
                self.render_input("password", self.prepare_attrs(attr, true), value.as_ref())
            }
            ElementKind::File => self.render_input("file", self.prepare_attrs(attr, false), None),
            ElementKind::Textarea => {
                let mut attrs = self.prepare_attrs(attr, true);
                attrs.set("name", self.input_name());
                let value = self.get_value(false);
                let children = if value.is_empty() {
                    Vec::new()
                } else {
                    vec![Node::Text(value.to_string())]
                };
                Tag::new("textarea", attrs, children)
            }
            ElementKind::Select { options } => self.render_select(options, attr),
            ElementKind::Radio { options } => {
                self.render_listing(options, "radio", &self.input_name())
            }
            ElementKind::Checkbox {
                input_value,
                options,
            } => {
                if options.is_empty() {
                    let mut attrs = Attrs::new();
                    attrs
                        .set("name", self.input_name())
                        .set("type", "checkbox")
                        .set("value", input_value.to_string());
                    if self.get_value(false).loose_eq(input_value) {
                        attrs.set("checked", "checked");
                    }
                    Tag::void("input", attrs)
                } else {
                    self.render_listing(options, "checkbox", &format!("{}[]", self.input_name()))
                }
            }
        }
    }

    fn prepare_attrs(&self, attr: Option<&Attrs>, add_placeholder: bool) -> Attrs {
        let mut attrs = Attrs::new();
        attrs.set("id", self.input_id());
        if add_placeholder {
            if let Some(ph) = self.placeholder.as_deref().filter(|p| !p.is_empty()) {
                attrs.set("placeholder", ph);
            }
        }
        attrs.merge(attr.unwrap_or(&self.attr));
        attrs
    }

    fn render_input(&self, input_type: &str, mut attrs: Attrs, value: Option<&Value>) -> Tag {
        attrs.set("name", self.input_name()).set("type", input_type);
        if let Some(v) = value.filter(|v| !v.is_empty()) {
            attrs.set("value", v.to_string());
        }
        Tag::void("input", attrs)
    }

    fn render_select(&self, options: &OptionSet, attr: Option<&Attrs>) -> Tag {
        let mut attrs = self.prepare_attrs(attr, false);
        if self.multiple {
            attrs
                .set("name", format!("{}[]", self.input_name()))
                .set("multiple", "multiple");
        } else {
            attrs.set("name", self.input_name());
        }

        let mut items = Vec::with_capacity(options.len() + 1);
        if let Some(ph) = self.placeholder.as_deref().filter(|p| !p.is_empty()) {
            items.push(option_tag("", ph, false));
        }
        for (value, label) in options.choices(self.ignore_option_keys) {
            items.push(option_tag(value, label, self.is_selected(value)));
        }

        Tag::new("select", attrs, lines(items))
    }

    fn render_listing(&self, options: &OptionSet, input_type: &str, name: &str) -> Tag {
        let items = options
            .choices(self.ignore_option_keys)
            .into_iter()
            .map(|(value, label)| {
                let mut attrs = Attrs::new();
                attrs
                    .set("name", name)
                    .set("type", input_type)
                    .set("value", value);
                if self.is_selected(value) {
                    attrs.set("checked", "checked");
                }
                Tag::new(
                    "label",
                    Attrs::new(),
                    vec![
                        Node::Tag(Tag::void("input", attrs)),
                        Node::Text(format!(" {label}")),
                    ],
                )
            })
            .collect();

        Tag::listing(items)
    }

    fn is_selected(&self, option_value: &str) -> bool {
        let current = self.get_value(false);
        if current.is_empty() {
            return false;
        }

        let option_value = Value::from(option_value);
        match &current {
            Value::List(items) => items.iter().any(|item| item.loose_eq(&option_value)),
            scalar => scalar.loose_eq(&option_value),
        }
    }
}

fn option_tag(value: &str, label: &str, selected: bool) -> Tag {
    let mut attrs = Attrs::new();
    attrs.set("value", value);
    if selected {
        attrs.set("selected", "selected");
    }
    Tag::new("option", attrs, vec![Node::Text(label.to_string())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use formwork_core::UploadedFile;

    fn numeric() -> Filter {
        Filter::predicate(|v| v.as_f64().is_some())
    }

    #[test]
    fn test_validation() {
        let mut el = Element::input("age");
        el.add_filter(numeric());

        assert!(el.is_valid());

        assert!(el.validate(123).unwrap());
        assert_eq!(el.get_value(false), Value::Int(123));
        assert_eq!(el.get_value(true), Value::Int(123));

        assert!(!el.validate("abc").unwrap());
        assert_eq!(el.get_value(false), Value::from("abc"));
        assert!(el.get_value(true).is_empty());
        assert_eq!(
            el.errors(),
            Some(&["Field \"age\" is filled incorrectly".to_string()][..])
        );
    }

    #[test]
    fn test_array_validation() {
        let mut el = Element::checkbox("level");
        el.set_options(OptionSet::from_pairs([(1, "One"), (2, "Two"), (3, "Three")]), true, None);
        assert!(el.is_multiple());

        assert!(el.validate(vec![1, 3]).unwrap());
        assert_eq!(el.get_value(true), Value::from(vec![1, 3]));

        assert!(el.validate(1).unwrap());
        assert_eq!(el.get_value(true), Value::from(vec![1]));

        assert!(el.validate(vec![1, 4]).unwrap());
        assert_eq!(el.get_value(true), Value::from(vec![1]));

        assert!(!el.validate(4).unwrap());
        assert_eq!(el.get_value(true), Value::List(vec![]));

        assert!(el.validate(Vec::<i32>::new()).unwrap());

        el.set_multiple(false);
        assert!(!el.validate(vec![1, 3]).unwrap());
        assert_eq!(el.get_value(true), Value::Bool(false));
    }

    #[test]
    fn test_errors_join() {
        let mut el = Element::input("age");
        assert_eq!(el.errors_joined("<br />"), None);

        el.add_error("One");
        assert_eq!(el.errors_joined("<br />"), Some("One".to_string()));

        el.add_error("Two").add_error("Three");
        assert_eq!(
            el.errors_joined("<br />"),
            Some("One<br />Two<br />Three".to_string())
        );
    }

    #[test]
    fn test_required_field() {
        let mut el = Element::input("age");
        el.set_required(true);

        assert!(!el.validate("").unwrap());
        assert_eq!(
            el.errors_joined(" "),
            Some("Required field \"age\" is empty".to_string())
        );

        let mut el = Element::input("age");
        el.set_name("Age").set_required(true);
        el.validate("").unwrap();
        assert_eq!(
            el.errors_joined(" "),
            Some("Required field \"Age\" is empty".to_string())
        );
    }

    #[test]
    fn test_required_short_circuits_filters() {
        let mut el = Element::input("age");
        el.set_required(true).add_filter(Filter::predicate(|_| false));
        assert!(!el.validate(Value::Null).unwrap());
        assert_eq!(el.errors().map(<[String]>::len), Some(1));
        assert!(el.errors_joined("").unwrap().starts_with("Required"));
    }

    #[test]
    fn test_optional_empty_is_valid() {
        let mut el = Element::input("age");
        el.add_filter(Filter::predicate(|_| false));
        assert!(el.validate("").unwrap());
        assert!(el.validate(Value::Null).unwrap());
    }

    #[test]
    fn test_default_value() {
        let mut el = Element::input("age");
        el.add_filter(numeric());

        assert!(el.get_value(false).is_empty());

        el.set_default_value(123);
        assert_eq!(el.get_value(false), Value::Int(123));

        el.validate("").unwrap();
        assert!(el.get_value(false).is_empty());

        el.validate(321).unwrap();
        assert_eq!(el.get_value(false), Value::Int(321));

        el.reset(false);
        assert_eq!(el.get_value(false), Value::Int(123));

        el.validate(321).unwrap();
        el.reset(true);
        assert!(el.get_value(false).is_empty());
    }

    #[test]
    fn test_validate_is_idempotent() {
        let mut el = Element::input("name");
        el.add_filter(Filter::pattern("^[a-z]+$").unwrap());

        el.validate("123").unwrap();
        let first = (el.get_value(false), el.errors().map(<[String]>::to_vec));
        el.validate("123").unwrap();
        let second = (el.get_value(false), el.errors().map(<[String]>::to_vec));
        assert_eq!(first, second);
        assert_eq!(el.errors().map(<[String]>::len), Some(1));
    }

    #[test]
    fn test_transform_filter_replaces_value() {
        let mut el = Element::input("name");
        el.add_filter(Filter::transform(|v| Some(Value::from(v.to_string().trim()))));
        assert!(el.validate("  john ").unwrap());
        assert_eq!(el.get_value(true), Value::from("john"));
    }

    #[test]
    fn test_element_with_options() {
        let mut el = Element::select("type", OptionSet::from_pairs([(1, "one"), (2, "two")]));
        el.set_placeholder("Type");

        assert!(!el.validate(3).unwrap());
        assert!(!el.validate("one").unwrap());
        assert!(el.validate(1).unwrap());

        let expected = concat!(
            r#"<select id="form-type" name="type">"#,
            r#"<option value="">Type</option>"#,
            "\n",
            r#"<option selected="selected" value="1">one</option>"#,
            "\n",
            r#"<option value="2">two</option>"#,
            "\n",
            "</select>"
        );
        assert_eq!(el.render(None).to_html(), expected);

        let mut el = Element::select("type", OptionSet::new());
        el.set_ignore_option_keys(true);
        el.set_options(OptionSet::from_pairs([(1, "one"), (2, "two")]), true, None);

        assert!(el.validate("one").unwrap());
        assert!(!el.validate(1).unwrap());

        let expected = concat!(
            r#"<select id="form-type" name="type"><option value="one">one</option>"#,
            "\n",
            r#"<option value="two">two</option>"#,
            "\n",
            "</select>"
        );
        assert_eq!(el.render(None).to_html(), expected);
    }

    #[test]
    fn test_set_options_replaces_option_filter() {
        let mut el = Element::select("status", OptionSet::from_pairs([(1, "a")]));
        el.set_options(OptionSet::from_pairs([(2, "b")]), true, None);
        assert!(!el.validate(1).unwrap());
        assert!(el.validate(2).unwrap());

        el.set_options(OptionSet::from_pairs([(3, "c")]), false, None);
        assert!(el.validate(9).unwrap());
    }

    fn not_two() -> Filter {
        Filter::predicate(|v| !v.loose_eq(&Value::Int(2)))
    }

    #[test]
    fn test_manual_filter_runs_after_option_filter() {
        let mut el = Element::select("num", OptionSet::from_pairs([(1, "a"), (2, "b"), (3, "c")]));
        el.add_filter(not_two());

        assert!(el.validate(1).unwrap());
        assert!(!el.validate(2).unwrap());
        assert!(!el.validate(4).unwrap());

        el.set_options(OptionSet::from_pairs([(2, "b"), (5, "e")]), true, None);
        assert_eq!(el.filters().len(), 1);
        assert!(el.validate(5).unwrap());
        assert!(!el.validate(2).unwrap());
        assert!(!el.validate(1).unwrap());
    }

    #[test]
    fn test_multiple_choice_through_option_and_manual_filters() {
        let mut el = Element::select("num", OptionSet::from_pairs([(1, "a"), (2, "b"), (3, "c")]));
        el.set_multiple(true).add_filter(not_two());

        assert!(el.validate(vec![1, 2, 4]).unwrap());
        assert_eq!(el.get_value(true), Value::from(vec![1]));

        assert!(el.validate(vec!["3", "1"]).unwrap());
        assert_eq!(el.get_value(true), Value::from(vec!["3", "1"]));

        assert!(!el.validate(vec![2, 4]).unwrap());
        assert_eq!(el.get_value(true), Value::List(Vec::new()));
        assert_eq!(el.get_value(false), Value::from(vec![2, 4]));
    }

    #[test]
    fn test_rejecting_filters_record_one_error() {
        let mut el = Element::input("name");
        el.add_filter(Filter::predicate(|_| false))
            .add_filter(Filter::predicate(|_| false));

        assert!(!el.validate("x").unwrap());
        assert_eq!(
            el.errors(),
            Some(&["Field \"name\" is filled incorrectly".to_string()][..])
        );
    }

    #[test]
    fn test_unanchored_pattern_must_match_whole_value() {
        let mut el = Element::input("name");
        el.add_filter(Filter::pattern("[a-z]+").unwrap());

        assert!(!el.validate("abc123").unwrap());
        assert_eq!(el.errors().map(<[String]>::len), Some(1));
        assert!(el.validate("abc").unwrap());
    }

    #[test]
    fn test_null_submission_replaces_default() {
        let mut el = Element::input("name");
        el.set_default_value("Jane");

        assert!(el.validate(Value::Null).unwrap());
        assert_eq!(el.get_value(false), Value::Null);

        el.reset(false);
        assert_eq!(el.get_value(false), Value::from("Jane"));
    }

    #[test]
    fn test_set_options_on_input_is_ignored() {
        let mut el = Element::input("name");
        el.set_options(OptionSet::from_pairs([(1, "a")]), true, None);
        assert!(el.options().is_none());
        assert!(el.validate("anything").unwrap());
    }

    #[test]
    fn test_input_name_and_id() {
        let mut el = Element::input("age");
        assert_eq!(el.input_name(), "age");
        assert_eq!(el.input_id(), "form-age");
        assert_eq!(
            el.render(Some(&Attrs::from("one"))).to_html(),
            r#"<input class="one" id="form-age" name="age" type="text" />"#
        );

        el.set_form_name(Some("profile".to_string()));
        assert_eq!(el.input_name(), "profile[age]");
        assert_eq!(el.input_id(), "form-profile-age");
        assert_eq!(
            el.render(None).to_html(),
            r#"<input id="form-profile-age" name="profile[age]" type="text" />"#
        );
        assert_eq!(
            el.render(Some(&Attrs::from([("id", "ololo")]))).to_html(),
            r#"<input id="ololo" name="profile[age]" type="text" />"#
        );

        el.set_form_name(Some(String::new()));
        assert_eq!(el.input_name(), "age");
    }

    #[test]
    fn test_attr_render() {
        let mut el = Element::input("name");
        el.set_attr("one");
        assert_eq!(
            el.render(None).to_html(),
            r#"<input class="one" id="form-name" name="name" type="text" />"#
        );
        assert_eq!(
            el.render(Some(&Attrs::from("two"))).to_html(),
            r#"<input class="two" id="form-name" name="name" type="text" />"#
        );
    }

    #[test]
    fn test_input_renders_value() {
        let mut el = Element::input("name");
        el.set_placeholder("Full name").set_default_value("Jo \"J\"");
        assert_eq!(
            el.render(None).to_html(),
            r#"<input id="form-name" name="name" placeholder="Full name" type="text" value="Jo &quot;J&quot;" />"#
        );
    }

    #[test]
    fn test_password_render() {
        let mut el = Element::password("pass");
        el.validate("1234").unwrap();
        assert_eq!(
            el.render(None).to_html(),
            r#"<input id="form-pass" name="pass" type="password" />"#
        );

        el.set_show_value(true).set_placeholder("Password");
        assert_eq!(
            el.render(None).to_html(),
            r#"<input id="form-pass" name="pass" placeholder="Password" type="password" value="1234" />"#
        );
    }

    #[test]
    fn test_textarea_render() {
        let mut el = Element::textarea("text");
        el.validate("Hello").unwrap();
        el.set_placeholder("Text");
        assert_eq!(
            el.render(None).to_html(),
            r#"<textarea id="form-text" name="text" placeholder="Text">Hello</textarea>"#
        );
    }

    #[test]
    fn test_radio_render() {
        let mut el = Element::radio("age", OptionSet::from_labels(["10", "20", "30"]));
        el.set_default_value(20).set_ignore_option_keys(true);

        let expected = concat!(
            r#"<label><input name="age" type="radio" value="10" /> 10</label>"#,
            "\n",
            r#"<label><input checked="checked" name="age" type="radio" value="20" /> 20</label>"#,
            "\n",
            r#"<label><input name="age" type="radio" value="30" /> 30</label>"#,
            "\n"
        );
        assert_eq!(el.render(None).to_html(), expected);
    }

    #[test]
    fn test_checkbox_render() {
        let mut el = Element::checkbox("is_active");
        el.validate(1).unwrap();
        assert_eq!(
            el.render(None).to_html(),
            r#"<input checked="checked" name="is_active" type="checkbox" value="1" />"#
        );

        el.set_input_value("yes");
        assert_eq!(
            el.render(None).to_html(),
            r#"<input name="is_active" type="checkbox" value="yes" />"#
        );
    }

    #[test]
    fn test_checkbox_group_render() {
        let mut el = Element::checkbox("age");
        el.set_options(
            OptionSet::from_pairs([(10, "Ten"), (20, "Twenty"), (30, "Thirty")]),
            true,
            None,
        );
        el.set_default_value(vec![10, 30]);

        let expected = concat!(
            r#"<label><input checked="checked" name="age[]" type="checkbox" value="10" /> Ten</label>"#,
            "\n",
            r#"<label><input name="age[]" type="checkbox" value="20" /> Twenty</label>"#,
            "\n",
            r#"<label><input checked="checked" name="age[]" type="checkbox" value="30" /> Thirty</label>"#,
            "\n"
        );
        assert_eq!(el.render(None).to_html(), expected);
    }

    #[test]
    fn test_file_render() {
        let mut el = Element::file("image");
        el.set_placeholder("ignored");
        assert_eq!(
            el.render(Some(&Attrs::from("one"))).to_html(),
            r#"<input class="one" id="form-image" name="image" type="file" />"#
        );
    }

    #[test]
    fn test_file() {
        let upload = UploadedFile::new("hello.txt", "text/plain", b"hi".to_vec());

        let mut el = Element::file("image");
        el.set_name("Image").set_required(true);

        assert!(!el.validate(Value::Null).unwrap());
        assert_eq!(
            el.errors_joined(" "),
            Some("Required field \"Image\" is empty".to_string())
        );
        assert!(el.get_value(false).is_empty());
        assert_eq!(el.file_extension(), None);

        assert!(el.validate(upload.clone()).unwrap());
        assert_eq!(el.get_value(false), Value::File(upload));
        assert_eq!(el.file_extension(), Some("txt"));
        assert_eq!(el.file_name(), Some("hello.txt"));
    }

    #[test]
    fn test_file_rejects_non_file_value() {
        let mut el = Element::file("image");
        el.add_error("kept");
        let err = el.validate("not a file").unwrap_err();
        assert!(matches!(err, FormworkError::InvalidFileValue { ref field } if field == "image"));
        assert_eq!(el.errors_joined(""), Some("kept".to_string()));
    }

    #[test]
    fn test_file_has_no_default() {
        let mut el = Element::file("image");
        el.set_default_value("something");
        assert_eq!(el.default_value(), &Value::Bool(false));
        assert!(el.get_value(false).is_empty());
    }

    #[test]
    fn test_custom_templates() {
        let mut el = Element::input("age");
        el.set_required(true)
            .set_tmpl_err_required("%s is missing")
            .set_tmpl_err_wrong("%s is wrong")
            .add_filter(numeric());

        el.validate("").unwrap();
        assert_eq!(el.errors_joined(""), Some("age is missing".to_string()));
        el.validate("x").unwrap();
        assert_eq!(el.errors_joined(""), Some("age is wrong".to_string()));
        assert_eq!(el.tmpl_err_wrong(), "%s is wrong");
    }
}
