use super::behavior::SubtaskDefinitionBuilder;
use super::form::{build_view, ViewDefinitionBuilder};
use super::people::{build_reference, PeopleReferenceDefinitionBuilder};
use super::slugify;
use crate::definition::enums::DeadlineType;
use crate::definition::expression::validate_optional_expression;
use crate::definition::task::{
    DeadlineDefinition, EscalationActionDefinition, EscalationDefinition, NotificationDefinition,
    ReassignmentDefinition,
};
use crate::definition::time::{Instant, IsoDuration};
use crate::definition::value::Value;
use human_task_base::error::HumanTaskError;

#[derive(Debug, Clone, Default)]
pub struct DeadlineDefinitionBuilder {
    definition: DeadlineDefinition,
}

impl DeadlineDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, HumanTaskError> {
        self.definition.name = slugify("name", name)?;
        Ok(self)
    }

    pub fn of_type(mut self, deadline_type: DeadlineType) -> Self {
        self.definition.deadline_type = deadline_type;
        self
    }

    pub fn elapses_at(mut self, at: Instant) -> Self {
        self.definition.elapses_at = Some(at);
        self
    }

    pub fn elapses_after(mut self, after: impl Into<IsoDuration>) -> Self {
        self.definition.elapses_after = Some(after.into());
        self
    }

    pub fn escalates<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(EscalationDefinitionBuilder) -> Result<EscalationDefinitionBuilder, HumanTaskError>,
    {
        let escalation = setup(EscalationDefinitionBuilder::new())?.build()?;
        self.definition.escalations.push(escalation);
        Ok(self)
    }

    pub fn build(self) -> Result<DeadlineDefinition, HumanTaskError> {
        if self.definition.name.is_empty() {
            return Err(HumanTaskError::MissingRequiredField("name".to_string()));
        }
        Ok(self.definition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct EscalationDefinitionBuilder {
    definition: EscalationDefinition,
}

impl EscalationDefinitionBuilder {
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

    pub fn notify<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(NotificationDefinitionBuilder) -> Result<NotificationDefinitionBuilder, HumanTaskError>,
    {
        self.definition.action.notification =
            Some(setup(NotificationDefinitionBuilder::new())?.build()?);
        Ok(self)
    }

    pub fn reassign<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(ReassignmentDefinitionBuilder) -> Result<ReassignmentDefinitionBuilder, HumanTaskError>,
    {
        self.definition.action.reassignment =
            Some(setup(ReassignmentDefinitionBuilder::new())?.build());
        Ok(self)
    }

    pub fn start_subtask<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(SubtaskDefinitionBuilder) -> Result<SubtaskDefinitionBuilder, HumanTaskError>,
    {
        self.definition.action.subtask = Some(setup(SubtaskDefinitionBuilder::new())?.build()?);
        Ok(self)
    }

    pub fn build(self) -> Result<EscalationDefinition, HumanTaskError> {
        if self.definition.name.is_empty() {
            return Err(HumanTaskError::MissingRequiredField("name".to_string()));
        }
        if self.definition.action == EscalationActionDefinition::default() {
            return Err(HumanTaskError::MissingRequiredField("action".to_string()));
        }
        Ok(self.definition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct NotificationDefinitionBuilder {
    definition: NotificationDefinition,
}

impl NotificationDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Result<Self, HumanTaskError> {
        self.definition.name = slugify("name", name)?;
        Ok(self)
    }

    pub fn display_using<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(ViewDefinitionBuilder) -> Result<ViewDefinitionBuilder, HumanTaskError>,
    {
        self.definition.views.push(build_view(setup)?);
        Ok(self)
    }

    pub fn with_input(mut self, input: impl Into<Value>) -> Self {
        self.definition.input = Some(input.into().into_structure());
        self
    }

    pub fn to<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition.recipients.push(build_reference(setup)?);
        Ok(self)
    }

    pub fn build(self) -> Result<NotificationDefinition, HumanTaskError> {
        if self.definition.name.is_empty() {
            return Err(HumanTaskError::MissingRequiredField("name".to_string()));
        }
        Ok(self.definition)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ReassignmentDefinitionBuilder {
    definition: ReassignmentDefinition,
}

impl ReassignmentDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition.to = Some(build_reference(setup)?);
        Ok(self)
    }

    pub fn build(self) -> ReassignmentDefinition {
        self.definition
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::definition::enums::GenericHumanRole;

    #[test]
    fn test_deadline_with_escalations() {
        let deadline = DeadlineDefinitionBuilder::new()
            .with_name("Fake Deadline")
            .unwrap()
            .of_type(DeadlineType::Completion)
            .elapses_after(IsoDuration::minutes(30))
            .escalates(|e| {
                e.with_name("notify admins")?
                    .when(Some("${ .priority > 3 }"))?
                    .notify(|n| {
                        n.with_name("late")?
                            .display_using(|v| Ok(v.of_type("text")?.with_template("late")))?
                            .to(|p| Ok(p.in_role(GenericHumanRole::BusinessAdministrator)))
                    })
            })
            .unwrap()
            .escalates(|e| {
                e.with_name("reassign")?
                    .reassign(|r| r.to(|p| p.user("fallback-owner")))
            })
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(deadline.name, "fake-deadline");
        assert_eq!(deadline.deadline_type, DeadlineType::Completion);
        assert_eq!(deadline.elapses_after.map(|d| d.to_string()).as_deref(), Some("PT30M"));
        assert_eq!(deadline.escalations.len(), 2);
        let notification = deadline.escalations[0].action.notification.as_ref().unwrap();
        assert_eq!(notification.views.len(), 1);
        assert_eq!(notification.recipients.len(), 1);
        let to = deadline.escalations[1]
            .action
            .reassignment
            .as_ref()
            .and_then(|r| r.to.as_ref())
            .and_then(|p| p.user.as_deref());
        assert_eq!(to, Some("fallback-owner"));
    }

    #[test]
    fn test_escalation_requires_action() {
        let res = EscalationDefinitionBuilder::new()
            .with_name("nothing")
            .unwrap()
            .build();
        assert_eq!(
            res,
            Err(HumanTaskError::MissingRequiredField("action".to_string()))
        );
    }

    #[test]
    fn test_escalation_error_propagates_to_deadline() {
        let res = DeadlineDefinitionBuilder::new().escalates(|e| e.when(Some("late")));
        assert!(matches!(
            res,
            Err(HumanTaskError::InvalidExpressionFormat { .. })
        ));
    }
}
