//! The host-facing field pipeline.
//!
//! A [`FormType`] describes one kind of field. Building a field runs three
//! steps, in this order:
//!
//! 1. `configure_options` turns the caller's raw [`FieldOptions`] into the
//!    type's resolved options, or fails with a configuration error.
//! 2. `build_form` registers the field's data transformers on a
//!    [`FieldBuilder`].
//! 3. `build_view` (at render time) writes the template variables of a
//!    [`FieldView`].
//!
//! [`create_field`] runs the first two steps and [`create_view`] the third.
//! Options every field accepts (`label`, `required`, `disabled`, `attr`) are
//! split off before the type sees the rest.

use std::sync::Arc;

use autoform_core::json::{is_empty, merge_maps};
use autoform_core::logging::field_span;
use autoform_core::{FormsError, FormsResult};
use serde_json::{Map, Value};

use crate::options::FieldOptions;
use crate::transformer::DataTransformer;

/// A kind of form field.
///
/// All implementations must be `Send + Sync`; one instance serves every field
/// of its kind, possibly from several threads.
pub trait FormType: Send + Sync {
    /// The resolved options of this field type.
    type Options;

    /// The prefix of the template blocks rendering this field.
    fn block_prefix(&self) -> &'static str;

    /// The block prefix of the type this one extends, if any.
    fn parent(&self) -> Option<&'static str> {
        None
    }

    /// Resolves the caller's options.
    fn configure_options(&self, options: FieldOptions) -> FormsResult<Self::Options>;

    /// Registers the field's transformers.
    fn build_form(&self, builder: &mut FieldBuilder, options: &Self::Options);

    /// The view value submitted in place of a blank submission.
    fn empty_data(&self, _options: &Self::Options) -> Value {
        Value::Null
    }

    /// Adds type-specific variables to the field's view.
    fn build_view(&self, _view: &mut FieldView, _field: &Field<Self::Options>) {}
}

/// Options accepted by every field type.
#[derive(Debug, Clone, PartialEq)]
pub struct CommonOptions {
    /// Human-readable label. Defaults to the field name.
    pub label: Option<String>,
    /// Whether the field is required.
    pub required: bool,
    /// Whether the field is disabled (rendered but not editable).
    pub disabled: bool,
    /// Extra HTML attributes.
    pub attr: Map<String, Value>,
}

impl Default for CommonOptions {
    fn default() -> Self {
        Self {
            label: None,
            required: true,
            disabled: false,
            attr: Map::new(),
        }
    }
}

impl CommonOptions {
    /// Takes the common options out of `options`, leaving the rest.
    pub fn extract(options: &mut FieldOptions) -> FormsResult<Self> {
        let mut common = Self::default();
        if let Some(label) = options.take("label") {
            common.label = label.as_optional_string("label")?;
        }
        if let Some(required) = options.take("required") {
            common.required = required.is_truthy();
        }
        if let Some(disabled) = options.take("disabled") {
            common.disabled = disabled.is_truthy();
        }
        if let Some(attr) = options.take("attr") {
            common.attr = match attr.into_json("attr")? {
                Value::Null => Map::new(),
                Value::Object(attr) => attr,
                other => {
                    return Err(FormsError::ConfigurationError(format!(
                        "The option \"attr\" must be an object, got {}.",
                        autoform_core::json::type_name(&other)
                    )))
                }
            };
        }
        Ok(common)
    }
}

/// Collects what `build_form` registers for a field.
#[derive(Debug, Default)]
pub struct FieldBuilder {
    view_transformers: Vec<Arc<dyn DataTransformer>>,
}

impl FieldBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a view transformer. Transformers run in registration order
    /// when rendering and in reverse order when submitting.
    pub fn add_view_transformer(&mut self, transformer: Arc<dyn DataTransformer>) -> &mut Self {
        self.view_transformers.push(transformer);
        self
    }

    /// The registered view transformers.
    pub fn view_transformers(&self) -> &[Arc<dyn DataTransformer>] {
        &self.view_transformers
    }
}

/// A built field: its resolved options, transformers, and current data.
#[derive(Debug)]
pub struct Field<O> {
    name: String,
    block_prefixes: Vec<&'static str>,
    common: CommonOptions,
    options: O,
    view_transformers: Vec<Arc<dyn DataTransformer>>,
    empty_data: Value,
    data: Value,
}

impl<O> Field<O> {
    /// The field name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Block prefixes from the most generic type to this field's own type.
    pub fn block_prefixes(&self) -> &[&'static str] {
        &self.block_prefixes
    }

    /// The options shared by all field types.
    pub const fn common(&self) -> &CommonOptions {
        &self.common
    }

    /// The type-specific resolved options.
    pub const fn options(&self) -> &O {
        &self.options
    }

    /// The current model data.
    pub const fn data(&self) -> &Value {
        &self.data
    }

    /// Replaces the model data.
    pub fn set_data(&mut self, data: Value) {
        self.data = data;
    }

    /// The model data transformed into its view representation.
    pub fn view_data(&self) -> FormsResult<Value> {
        self.view_transformers
            .iter()
            .try_fold(self.data.clone(), |value, transformer| {
                transformer.transform(&value)
            })
    }

    /// Reverse-transforms a submitted view value and stores the result as the
    /// model data. On failure the previous data is kept.
    ///
    /// A blank submission (`null`, `""` or `[]`) is replaced by the type's
    /// empty data before the transformers run.
    pub fn submit(&mut self, submitted: &Value) -> FormsResult<()> {
        let view_value = if is_blank(submitted) && !self.empty_data.is_null() {
            tracing::debug!(field = %self.name, "blank submission replaced by empty data");
            self.empty_data.clone()
        } else {
            submitted.clone()
        };

        let data = self
            .view_transformers
            .iter()
            .rev()
            .try_fold(view_value, |value, transformer| {
                transformer.reverse_transform(&value)
            })?;
        tracing::debug!(field = %self.name, "submitted value accepted");
        self.data = data;
        Ok(())
    }
}

fn is_blank(submitted: &Value) -> bool {
    match submitted {
        Value::Null => true,
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

/// Template variables of one rendered field.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldView {
    vars: Map<String, Value>,
}

impl FieldView {
    /// Seeds the standard variables of `field`: `id`, `name`, `full_name`,
    /// `block_prefixes`, `label`, `required`, `disabled`, `attr`, and
    /// `value` (the view data).
    pub fn new<O>(field: &Field<O>) -> FormsResult<Self> {
        let label = field
            .common
            .label
            .clone()
            .unwrap_or_else(|| field.name.replace('_', " "));

        let mut vars = Map::new();
        vars.insert("id".to_string(), Value::from(format!("id_{}", field.name)));
        vars.insert("name".to_string(), Value::from(field.name.as_str()));
        vars.insert("full_name".to_string(), Value::from(field.name.as_str()));
        vars.insert(
            "block_prefixes".to_string(),
            Value::from(field.block_prefixes.clone()),
        );
        vars.insert("label".to_string(), Value::from(label));
        vars.insert("required".to_string(), Value::from(field.common.required));
        vars.insert("disabled".to_string(), Value::from(field.common.disabled));
        vars.insert("attr".to_string(), Value::Object(field.common.attr.clone()));
        vars.insert("value".to_string(), field.view_data()?);
        Ok(Self { vars })
    }

    /// All variables.
    pub const fn vars(&self) -> &Map<String, Value> {
        &self.vars
    }

    /// One variable.
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Sets one variable.
    pub fn set_var(&mut self, name: impl Into<String>, value: Value) {
        self.vars.insert(name.into(), value);
    }

    /// Recursively merges `vars` over the current variables.
    pub fn merge_vars(&mut self, vars: Map<String, Value>) {
        let current = std::mem::take(&mut self.vars);
        self.vars = merge_maps(current, vars);
    }

    /// The HTML id.
    pub fn id(&self) -> &str {
        self.vars.get("id").and_then(Value::as_str).unwrap_or_default()
    }

    /// Appends a random `-uid-` suffix to the HTML id so the same field can be
    /// rendered several times on one page.
    pub fn randomize_id(&mut self) {
        let uid = uuid::Uuid::new_v4().simple().to_string();
        let id = format!("{}-uid-{}", self.id(), &uid[..13]);
        self.vars.insert("id".to_string(), Value::from(id));
    }
}

/// Resolves `options` and builds a field of type `form_type` named `name`.
///
/// # Errors
///
/// Returns the first configuration error raised while resolving options.
pub fn create_field<T: FormType>(
    form_type: &T,
    name: impl Into<String>,
    mut options: FieldOptions,
) -> FormsResult<Field<T::Options>> {
    let name = name.into();
    let span = field_span(form_type.block_prefix(), &name);
    let _guard = span.enter();

    let common = CommonOptions::extract(&mut options)?;
    let resolved = form_type.configure_options(options)?;

    let mut builder = FieldBuilder::new();
    form_type.build_form(&mut builder, &resolved);
    let empty_data = form_type.empty_data(&resolved);
    tracing::debug!(
        transformers = builder.view_transformers.len(),
        "field built"
    );

    let block_prefixes = form_type
        .parent()
        .into_iter()
        .chain(std::iter::once(form_type.block_prefix()))
        .collect();

    Ok(Field {
        name,
        block_prefixes,
        common,
        options: resolved,
        view_transformers: builder.view_transformers,
        empty_data,
        data: Value::Null,
    })
}

/// Builds the view of `field` for rendering.
///
/// # Errors
///
/// Fails if the field's data cannot be transformed into its view value.
pub fn create_view<T: FormType>(form_type: &T, field: &Field<T::Options>) -> FormsResult<FieldView> {
    let span = field_span(form_type.block_prefix(), field.name());
    let _guard = span.enter();

    let mut view = FieldView::new(field)?;
    form_type.build_view(&mut view, field);
    Ok(view)
}

/// Returns `true` if the field holds a value worth displaying.
pub fn has_data<O>(field: &Field<O>) -> bool {
    !is_empty(field.data())
}
