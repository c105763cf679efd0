use super::require_text;
use crate::definition::enums::ViewRenderingModes;
use crate::definition::task::{DataModelDefinition, FormDefinition, ViewDefinition};
use crate::definition::value::Value;
use human_task_base::error::HumanTaskError;

pub(crate) fn build_view<F>(setup: F) -> Result<ViewDefinition, HumanTaskError>
where
    F: FnOnce(ViewDefinitionBuilder) -> Result<ViewDefinitionBuilder, HumanTaskError>,
{
    setup(ViewDefinitionBuilder::new())?.build()
}

#[derive(Debug, Clone, Default)]
pub struct ViewDefinitionBuilder {
    definition: ViewDefinition,
    template_set: bool,
}

impl ViewDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// view type, e.g. `html`
    pub fn of_type(mut self, view_type: &str) -> Result<Self, HumanTaskError> {
        self.definition.view_type = require_text("type", view_type)?;
        Ok(self)
    }

    pub fn use_rendering_mode(mut self, mode: impl Into<ViewRenderingModes>) -> Self {
        self.definition.rendering_mode = mode.into();
        self
    }

    pub fn with_template(mut self, template: impl Into<Value>) -> Self {
        self.definition.template = template.into().into_structure();
        self.template_set = true;
        self
    }

    pub fn build(self) -> Result<ViewDefinition, HumanTaskError> {
        if self.definition.view_type.is_empty() {
            return Err(HumanTaskError::MissingRequiredField("type".to_string()));
        }
        if !self.template_set {
            return Err(HumanTaskError::MissingRequiredField("template".to_string()));
        }
        Ok(self.definition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct FormDefinitionBuilder {
    definition: FormDefinition,
}

impl FormDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn data_mut(&mut self) -> &mut DataModelDefinition {
        self.definition.data.get_or_insert_with(Default::default)
    }

    pub fn with_data_schema(mut self, schema: impl Into<Value>) -> Self {
        self.data_mut().schema = Some(schema.into().into_structure());
        self
    }

    pub fn with_data_state(mut self, state: impl Into<Value>) -> Self {
        self.data_mut().state = Some(state.into().into_structure());
        self
    }

    pub fn display_using<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(ViewDefinitionBuilder) -> Result<ViewDefinitionBuilder, HumanTaskError>,
    {
        self.definition.views.push(build_view(setup)?);
        Ok(self)
    }

    pub fn build(self) -> FormDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::structure;
    use crate::definition::enums::ViewRenderingMode;
    use serde_json::json;

    #[test]
    fn test_form_with_views() {
        let form = FormDefinitionBuilder::new()
            .with_data_schema(structure(&json!({"type": "object"})))
            .display_using(|v| {
                Ok(v.of_type("html")?
                    .use_rendering_mode(ViewRenderingMode::Render)
                    .with_template("<p>${ .name }</p>"))
            })
            .unwrap()
            .build();
        let data = form.data.unwrap();
        assert!(data.schema.is_some());
        assert!(data.state.is_none());
        assert_eq!(form.views.len(), 1);
        assert!(form.views[0]
            .rendering_mode
            .contains(ViewRenderingMode::Render));
        // a template that is not wrapped as a whole is a literal
        assert!(!form.views[0].template.is_expression());
    }

    #[test]
    fn test_view_requires_type_and_template() {
        assert_eq!(
            ViewDefinitionBuilder::new().with_template("x").build(),
            Err(HumanTaskError::MissingRequiredField("type".to_string()))
        );
        assert_eq!(
            ViewDefinitionBuilder::new().of_type("html").unwrap().build(),
            Err(HumanTaskError::MissingRequiredField("template".to_string()))
        );
        assert!(ViewDefinitionBuilder::new().of_type(" ").is_err());
    }
}
