use super::enums::{
    CompletionBehaviorType, DeadlineType, GenericHumanRole, HumanTaskRoutingMode,
    SubtaskExecutionMode, ViewRenderingMode, ViewRenderingModes,
};
use super::expression::RuntimeExpression;
use super::reference::TaskDefinitionReference;
use super::time::{Instant, IsoDuration};
use super::value::Value;
use human_task_base::{DEFAULT_EXPRESSION_LANGUAGE, DEFAULT_SPEC_VERSION};
use indexmap::IndexMap;

/// Root of a human task definition document.
///
/// The composite identifier is not stored; `id()` always derives it from
/// namespace, name and version.
#[derive(Debug, Clone, PartialEq)]
pub struct HumanTaskDefinition {
    pub name: String,
    pub namespace: String,
    pub version: String,
    pub spec_version: String,
    pub routing_mode: HumanTaskRoutingMode,
    pub expression_language: String,
    pub key: Option<RuntimeExpression>,
    pub skipable: bool,
    pub title: Option<Value>,
    pub subject: Option<Value>,
    pub description: Option<Value>,
    pub people_assignments: Option<PeopleAssignmentsDefinition>,
    pub input_data: Option<DataModelDefinition>,
    pub output_data: Option<DataModelDefinition>,
    pub form: Option<FormDefinition>,
    pub subtasks: Vec<SubtaskDefinition>,
    pub subtask_execution_mode: SubtaskExecutionMode,
    pub deadlines: Vec<DeadlineDefinition>,
    pub completion_behaviors: Vec<CompletionBehaviorDefinition>,
    pub outcomes: Vec<OutcomeDefinition>,
    pub annotations: IndexMap<String, String>,
    pub metadata: Option<Value>,
}

impl Default for HumanTaskDefinition {
    fn default() -> Self {
        Self {
            name: String::new(),
            namespace: String::new(),
            version: String::new(),
            spec_version: DEFAULT_SPEC_VERSION.to_string(),
            routing_mode: HumanTaskRoutingMode::default(),
            expression_language: DEFAULT_EXPRESSION_LANGUAGE.to_string(),
            key: None,
            skipable: false,
            title: None,
            subject: None,
            description: None,
            people_assignments: None,
            input_data: None,
            output_data: None,
            form: None,
            subtasks: Vec::new(),
            subtask_execution_mode: SubtaskExecutionMode::default(),
            deadlines: Vec::new(),
            completion_behaviors: Vec::new(),
            outcomes: Vec::new(),
            annotations: IndexMap::new(),
            metadata: None,
        }
    }
}

impl HumanTaskDefinition {
    /// `{namespace}.{name}:{version}`
    pub fn id(&self) -> String {
        format!("{}.{}:{}", self.namespace, self.name, self.version)
    }

    pub fn reference(&self) -> TaskDefinitionReference {
        TaskDefinitionReference::new(
            self.namespace.clone(),
            self.name.clone(),
            Some(self.version.clone()),
        )
    }

    pub fn find_deadline(&self, name: &str) -> Option<&DeadlineDefinition> {
        self.deadlines.iter().find(|d| d.name == name)
    }

    pub fn find_subtask(&self, name: &str) -> Option<&SubtaskDefinition> {
        self.subtasks.iter().find(|s| s.name == name)
    }

    /// completion behavior without condition, if any
    pub fn default_completion_behavior(&self) -> Option<&CompletionBehaviorDefinition> {
        self.completion_behaviors.iter().find(|c| c.is_default())
    }

    pub fn default_outcome(&self) -> Option<&OutcomeDefinition> {
        self.outcomes.iter().find(|o| o.is_default())
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeopleAssignmentsDefinition {
    pub potential_initiators: Vec<PeopleReferenceDefinition>,
    pub potential_owners: Vec<PeopleReferenceDefinition>,
    pub excluded_owners: Vec<PeopleReferenceDefinition>,
    pub stakeholders: Vec<PeopleReferenceDefinition>,
    pub business_administrators: Vec<PeopleReferenceDefinition>,
    pub notification_recipients: Vec<PeopleReferenceDefinition>,
    pub groups: Vec<LogicalPeopleGroupDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct LogicalPeopleGroupDefinition {
    pub name: String,
    pub members: Vec<PeopleReferenceDefinition>,
}

/// Either a single user or a users query.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PeopleReferenceDefinition {
    pub user: Option<String>,
    pub users: Option<UsersReferenceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct UsersReferenceDefinition {
    pub with_claims: Vec<ClaimFilterDefinition>,
    pub in_group: Option<String>,
    pub in_generic_role: Option<GenericHumanRole>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ClaimFilterDefinition {
    pub claim_type: Option<String>,
    pub value: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DataModelDefinition {
    pub schema: Option<Value>,
    pub state: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct FormDefinition {
    pub data: Option<DataModelDefinition>,
    pub views: Vec<ViewDefinition>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewDefinition {
    pub view_type: String,
    pub rendering_mode: ViewRenderingModes,
    pub template: Value,
}

impl ViewDefinition {
    pub fn default_rendering_mode() -> ViewRenderingModes {
        ViewRenderingModes::from(ViewRenderingMode::Process)
    }
}

impl Default for ViewDefinition {
    fn default() -> Self {
        Self {
            view_type: String::new(),
            rendering_mode: Self::default_rendering_mode(),
            template: Value::null(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SubtaskDefinition {
    pub name: String,
    pub task: TaskDefinitionReference,
    pub input: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DeadlineDefinition {
    pub name: String,
    pub deadline_type: DeadlineType,
    pub elapses_at: Option<Instant>,
    pub elapses_after: Option<IsoDuration>,
    pub escalations: Vec<EscalationDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EscalationDefinition {
    pub name: String,
    pub condition: Option<RuntimeExpression>,
    pub action: EscalationActionDefinition,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct EscalationActionDefinition {
    pub notification: Option<NotificationDefinition>,
    pub reassignment: Option<ReassignmentDefinition>,
    pub subtask: Option<SubtaskDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationDefinition {
    pub name: String,
    pub views: Vec<ViewDefinition>,
    pub input: Option<Value>,
    pub recipients: Vec<PeopleReferenceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ReassignmentDefinition {
    pub to: Option<PeopleReferenceDefinition>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompletionBehaviorDefinition {
    pub name: String,
    pub behavior_type: CompletionBehaviorType,
    pub condition: Option<RuntimeExpression>,
    pub output: Option<Value>,
}

impl CompletionBehaviorDefinition {
    pub fn is_default(&self) -> bool {
        self.condition.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct OutcomeDefinition {
    pub name: String,
    pub condition: Option<RuntimeExpression>,
    pub value: Option<Value>,
}

impl OutcomeDefinition {
    pub fn is_default(&self) -> bool {
        self.condition.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_is_derived() {
        let mut def = HumanTaskDefinition {
            name: "review".to_string(),
            namespace: "acme".to_string(),
            version: "1.0.0".to_string(),
            ..Default::default()
        };
        assert_eq!(def.id(), "acme.review:1.0.0");
        def.version = "2.0.0".to_string();
        assert_eq!(def.id(), "acme.review:2.0.0");
        assert_eq!(def.reference().to_string(), def.id());
        assert_eq!(def.expression_language, "jq");
        assert_eq!(def.spec_version, DEFAULT_SPEC_VERSION);
    }

    #[test]
    fn test_default_behaviors() {
        let def = HumanTaskDefinition {
            completion_behaviors: vec![
                CompletionBehaviorDefinition {
                    name: "approved".to_string(),
                    condition: Some(RuntimeExpression::new("condition", "${ .ok }").unwrap()),
                    ..Default::default()
                },
                CompletionBehaviorDefinition {
                    name: "fallback".to_string(),
                    behavior_type: CompletionBehaviorType::Manual,
                    ..Default::default()
                },
            ],
            outcomes: vec![OutcomeDefinition {
                name: "done".to_string(),
                ..Default::default()
            }],
            ..Default::default()
        };
        assert_eq!(
            def.default_completion_behavior().map(|c| c.name.as_str()),
            Some("fallback")
        );
        assert_eq!(def.default_outcome().map(|o| o.name.as_str()), Some("done"));
        assert!(def.find_deadline("none").is_none());
    }

    #[test]
    fn test_view_default_rendering_mode() {
        let view = ViewDefinition::default();
        assert!(view.rendering_mode.contains(ViewRenderingMode::Process));
        assert!(!view.rendering_mode.contains(ViewRenderingMode::Render));
    }
}
