use super::behavior::{
    CompletionBehaviorDefinitionBuilder, OutcomeDefinitionBuilder, SubtaskDefinitionBuilder,
};
use super::deadline::DeadlineDefinitionBuilder;
use super::form::FormDefinitionBuilder;
use super::people::PeopleAssignmentsDefinitionBuilder;
use super::{
    localize, localized_content, require_text, slugify, slugify_namespace, validate_semver,
};
use crate::definition::enums::{HumanTaskRoutingMode, SubtaskExecutionMode};
use crate::definition::expression::validate_optional_expression;
use crate::definition::task::{DataModelDefinition, HumanTaskDefinition};
use crate::definition::value::Value;
use human_task_base::error::HumanTaskError;

/// Builds a `HumanTaskDefinition`.
///
/// `build()` requires name, namespace and version; the composite identifier is derived
/// from them on the finished definition.
#[derive(Debug, Clone, Default)]
pub struct HumanTaskDefinitionBuilder {
    definition: HumanTaskDefinition,
}

impl HumanTaskDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// slugified into lowercase alphanumerics and `-`
    pub fn with_name(mut self, name: &str) -> Result<Self, HumanTaskError> {
        self.definition.name = slugify("name", name)?;
        Ok(self)
    }

    /// each dot-separated segment is slugified
    pub fn with_namespace(mut self, namespace: &str) -> Result<Self, HumanTaskError> {
        self.definition.namespace = slugify_namespace("namespace", namespace)?;
        Ok(self)
    }

    pub fn with_version(mut self, version: &str) -> Result<Self, HumanTaskError> {
        self.definition.version = validate_semver("version", version)?;
        Ok(self)
    }

    pub fn use_spec_version(mut self, version: &str) -> Result<Self, HumanTaskError> {
        self.definition.spec_version = validate_semver("specVersion", version)?;
        Ok(self)
    }

    pub fn use_expression_language(mut self, language: &str) -> Result<Self, HumanTaskError> {
        self.definition.expression_language = require_text("expressionLanguage", language)?;
        Ok(self)
    }

    pub fn use_routing_mode(mut self, routing_mode: HumanTaskRoutingMode) -> Self {
        self.definition.routing_mode = routing_mode;
        self
    }

    /// key expression; blank removes it
    pub fn with_key(mut self, key: Option<&str>) -> Result<Self, HumanTaskError> {
        self.definition.key = validate_optional_expression("key", key)?;
        Ok(self)
    }

    pub fn skipable(mut self, skipable: bool) -> Self {
        self.definition.skipable = skipable;
        self
    }

    /// a mapping is taken as a localized map keyed by language code
    pub fn with_title(mut self, title: impl Into<Value>) -> Result<Self, HumanTaskError> {
        self.definition.title = Some(localized_content(title.into())?);
        Ok(self)
    }

    pub fn with_title_in(mut self, language: &str, title: &str) -> Result<Self, HumanTaskError> {
        self.definition.title = Some(localize(self.definition.title.take(), language, title)?);
        Ok(self)
    }

    /// a mapping is taken as a localized map keyed by language code
    pub fn with_subject(mut self, subject: impl Into<Value>) -> Result<Self, HumanTaskError> {
        self.definition.subject = Some(localized_content(subject.into())?);
        Ok(self)
    }

    pub fn with_subject_in(mut self, language: &str, subject: &str) -> Result<Self, HumanTaskError> {
        self.definition.subject =
            Some(localize(self.definition.subject.take(), language, subject)?);
        Ok(self)
    }

    /// a mapping is taken as a localized map keyed by language code
    pub fn with_description(mut self, description: impl Into<Value>) -> Result<Self, HumanTaskError> {
        self.definition.description = Some(localized_content(description.into())?);
        Ok(self)
    }

    pub fn with_description_in(
        mut self,
        language: &str,
        description: &str,
    ) -> Result<Self, HumanTaskError> {
        self.definition.description = Some(localize(
            self.definition.description.take(),
            language,
            description,
        )?);
        Ok(self)
    }

    pub fn with_input_data(mut self, schema: Option<Value>, state: Option<Value>) -> Self {
        self.definition.input_data = Some(DataModelDefinition {
            schema: schema.map(Value::into_structure),
            state: state.map(Value::into_structure),
        });
        self
    }

    pub fn with_output_data(mut self, schema: Option<Value>, state: Option<Value>) -> Self {
        self.definition.output_data = Some(DataModelDefinition {
            schema: schema.map(Value::into_structure),
            state: state.map(Value::into_structure),
        });
        self
    }

    pub fn assign<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(
            PeopleAssignmentsDefinitionBuilder,
        ) -> Result<PeopleAssignmentsDefinitionBuilder, HumanTaskError>,
    {
        let current = self.definition.people_assignments.take();
        let assignments = setup(PeopleAssignmentsDefinitionBuilder::from(current))?.build();
        self.definition.people_assignments = Some(assignments);
        Ok(self)
    }

    pub fn use_form<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(FormDefinitionBuilder) -> Result<FormDefinitionBuilder, HumanTaskError>,
    {
        self.definition.form = Some(setup(FormDefinitionBuilder::new())?.build());
        Ok(self)
    }

    pub fn use_completion_behavior<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(
            CompletionBehaviorDefinitionBuilder,
        ) -> Result<CompletionBehaviorDefinitionBuilder, HumanTaskError>,
    {
        let behavior = setup(CompletionBehaviorDefinitionBuilder::new())?.build()?;
        self.definition.completion_behaviors.push(behavior);
        Ok(self)
    }

    pub fn add_subtask<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(SubtaskDefinitionBuilder) -> Result<SubtaskDefinitionBuilder, HumanTaskError>,
    {
        let subtask = setup(SubtaskDefinitionBuilder::new())?.build()?;
        self.definition.subtasks.push(subtask);
        Ok(self)
    }

    pub fn use_subtask_execution_mode(mut self, mode: SubtaskExecutionMode) -> Self {
        self.definition.subtask_execution_mode = mode;
        self
    }

    pub fn add_deadline<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(DeadlineDefinitionBuilder) -> Result<DeadlineDefinitionBuilder, HumanTaskError>,
    {
        let deadline = setup(DeadlineDefinitionBuilder::new())?.build()?;
        self.definition.deadlines.push(deadline);
        Ok(self)
    }

    pub fn add_outcome<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(OutcomeDefinitionBuilder) -> Result<OutcomeDefinitionBuilder, HumanTaskError>,
    {
        let outcome = setup(OutcomeDefinitionBuilder::new())?.build()?;
        self.definition.outcomes.push(outcome);
        Ok(self)
    }

    pub fn annotate_with(mut self, key: &str, value: &str) -> Self {
        self.definition
            .annotations
            .insert(key.to_string(), value.to_string());
        self
    }

    pub fn use_metadata(mut self, metadata: impl Into<Value>) -> Self {
        self.definition.metadata = Some(metadata.into().into_structure());
        self
    }

    pub fn build(self) -> Result<HumanTaskDefinition, HumanTaskError> {
        for (field, value) in [
            ("name", &self.definition.name),
            ("namespace", &self.definition.namespace),
            ("version", &self.definition.version),
        ] {
            if value.is_empty() {
                return Err(HumanTaskError::MissingRequiredField(field.to_string()));
            }
        }
        tracing::debug!("built human task definition {}", self.definition.id());
        Ok(self.definition)
    }
}
