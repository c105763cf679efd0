use super::{localize, localized_content, slugify};
use crate::definition::enums::CompletionBehaviorType;
use crate::definition::expression::validate_optional_expression;
use crate::definition::reference::TaskDefinitionReference;
use crate::definition::task::{CompletionBehaviorDefinition, OutcomeDefinition, SubtaskDefinition};
use crate::definition::value::Value;
use human_task_base::error::HumanTaskError;

fn require_name(name: &str) -> Result<(), HumanTaskError> {
    if name.is_empty() {
        Err(HumanTaskError::MissingRequiredField("name".to_string()))
    } else {
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CompletionBehaviorDefinitionBuilder {
    definition: CompletionBehaviorDefinition,
}

impl CompletionBehaviorDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, HumanTaskError> {
        self.definition.name = slugify("name", name)?;
        Ok(self)
    }

    pub fn of_type(mut self, behavior_type: CompletionBehaviorType) -> Self {
        self.definition.behavior_type = behavior_type;
        self
    }

    /// condition expression; blank removes it
    pub fn when(mut self, condition: Option<&str>) -> Result<Self, HumanTaskError> {
        self.definition.condition = validate_optional_expression("condition", condition)?;
        Ok(self)
    }

    pub fn set_output(mut self, output: impl Into<Value>) -> Self {
        self.definition.output = Some(output.into().into_structure());
        self
    }

    pub fn build(self) -> Result<CompletionBehaviorDefinition, HumanTaskError> {
        require_name(&self.definition.name)?;
        Ok(self.definition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct OutcomeDefinitionBuilder {
    definition: OutcomeDefinition,
}

impl OutcomeDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, HumanTaskError> {
        self.definition.name = slugify("name", name)?;
        Ok(self)
    }

    pub fn when(mut self, condition: Option<&str>) -> Result<Self, HumanTaskError> {
        self.definition.condition = validate_optional_expression("condition", condition)?;
        Ok(self)
    }

    /// a mapping is taken as a localized map keyed by language code
    pub fn outputs(mut self, value: impl Into<Value>) -> Result<Self, HumanTaskError> {
        self.definition.value = Some(localized_content(value.into())?);
        Ok(self)
    }

    pub fn outputs_in(mut self, language: &str, value: &str) -> Result<Self, HumanTaskError> {
        self.definition.value = Some(localize(self.definition.value.take(), language, value)?);
        Ok(self)
    }

    pub fn build(self) -> Result<OutcomeDefinition, HumanTaskError> {
        require_name(&self.definition.name)?;
        Ok(self.definition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct SubtaskDefinitionBuilder {
    name: String,
    task: Option<TaskDefinitionReference>,
    input: Option<Value>,
}

impl SubtaskDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, HumanTaskError> {
        self.name = slugify("name", name)?;
        Ok(self)
    }

    /// task reference `namespace.name[:version]`
    pub fn with_task(mut self, reference: &str) -> Result<Self, HumanTaskError> {
        self.task = Some(TaskDefinitionReference::parse(reference)?);
        Ok(self)
    }

    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.input = Some(input.into().into_structure());
        self
    }

    pub fn build(self) -> Result<SubtaskDefinition, HumanTaskError> {
        require_name(&self.name)?;
        let task = self
            .task
            .ok_or_else(|| HumanTaskError::MissingRequiredField("task".to_string()))?;
        Ok(SubtaskDefinition {
            name: self.name,
            task,
            input: self.input,
        })
    }
}
