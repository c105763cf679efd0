use super::object::{ObjectReader, ObjectWriter};
use super::{FieldPath, FormatAdapter};
use crate::definition::enums::{HumanTaskRoutingMode, SubtaskExecutionMode};
use crate::definition::task::{
    ClaimFilterDefinition, CompletionBehaviorDefinition, DataModelDefinition, DeadlineDefinition,
    EscalationActionDefinition, EscalationDefinition, FormDefinition, HumanTaskDefinition,
    LogicalPeopleGroupDefinition, NotificationDefinition, OutcomeDefinition,
    PeopleAssignmentsDefinition, PeopleReferenceDefinition, ReassignmentDefinition,
    SubtaskDefinition, UsersReferenceDefinition, ViewDefinition,
};
use crate::definition::value::ValueHint;
use human_task_base::error::HumanTaskError;

/// Schema-driven conversion between a document type and a backend node.
///
/// Decoding walks the fields in declared order and fails on the first error; encoding
/// writes them in the same order.
pub trait NodeCodec: Sized {
    fn decode<A: FormatAdapter>(node: &A::Node, path: &mut FieldPath)
        -> Result<Self, HumanTaskError>;
    fn encode<A: FormatAdapter>(&self) -> A::Node;
}

impl NodeCodec for HumanTaskDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        let stored_id = r.optional_str("id")?;
        let definition = HumanTaskDefinition {
            name: r.required_str("name")?,
            namespace: r.required_str("namespace")?,
            version: r.required_str("version")?,
            spec_version: r.required_str("specVersion")?,
            routing_mode: r.enum_or("routingMode", HumanTaskRoutingMode::default())?,
            expression_language: r
                .optional_str("expressionLanguage")?
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| human_task_base::DEFAULT_EXPRESSION_LANGUAGE.to_string()),
            key: r.optional_expression("key")?,
            skipable: r.bool_or("skipable", false)?,
            title: r.optional_value("title", ValueHint::Localized),
            subject: r.optional_value("subject", ValueHint::Localized),
            description: r.optional_value("description", ValueHint::Localized),
            people_assignments: r.optional_document("peopleAssignments")?,
            input_data: r.optional_document("inputData")?,
            output_data: r.optional_document("outputData")?,
            form: r.optional_document("form")?,
            subtasks: r.list("subtasks")?,
            subtask_execution_mode: r
                .enum_or("subtaskExecutionMode", SubtaskExecutionMode::default())?,
            deadlines: r.list("deadlines")?,
            completion_behaviors: r.list("completionBehaviors")?,
            outcomes: r.list("outcomes")?,
            annotations: r.string_map("annotations")?,
            metadata: r.optional_value("metadata", ValueHint::Structure),
        };
        match stored_id {
            Some(id) if id != definition.id() => {
                tracing::warn!(
                    "stored id '{}' does not match derived id '{}', ignored",
                    id,
                    definition.id()
                );
            }
            _ => {}
        }
        Ok(definition)
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("id", &self.id())
            .str("name", &self.name)
            .str("namespace", &self.namespace)
            .str("version", &self.version)
            .str("specVersion", &self.spec_version)
            .enum_tag("routingMode", self.routing_mode)
            .str("expressionLanguage", &self.expression_language)
            .optional_expression("key", self.key.as_ref())
            .bool_unless("skipable", self.skipable, false)
            .optional_value("title", self.title.as_ref())
            .optional_value("subject", self.subject.as_ref())
            .optional_value("description", self.description.as_ref())
            .optional_document("peopleAssignments", self.people_assignments.as_ref())
            .optional_document("inputData", self.input_data.as_ref())
            .optional_document("outputData", self.output_data.as_ref())
            .optional_document("form", self.form.as_ref())
            .list("subtasks", &self.subtasks)
            .enum_unless(
                "subtaskExecutionMode",
                self.subtask_execution_mode,
                SubtaskExecutionMode::default(),
            )
            .list("deadlines", &self.deadlines)
            .list("completionBehaviors", &self.completion_behaviors)
            .list("outcomes", &self.outcomes)
            .string_map("annotations", &self.annotations)
            .optional_value("metadata", self.metadata.as_ref())
            .finish()
    }
}

impl NodeCodec for PeopleAssignmentsDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            potential_initiators: r.list("potentialInitiators")?,
            potential_owners: r.list("potentialOwners")?,
            excluded_owners: r.list("excludedOwners")?,
            stakeholders: r.list("stakeholders")?,
            business_administrators: r.list("businessAdministrators")?,
            notification_recipients: r.list("notificationRecipients")?,
            groups: r.list("groups")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .list("potentialInitiators", &self.potential_initiators)
            .list("potentialOwners", &self.potential_owners)
            .list("excludedOwners", &self.excluded_owners)
            .list("stakeholders", &self.stakeholders)
            .list("businessAdministrators", &self.business_administrators)
            .list("notificationRecipients", &self.notification_recipients)
            .list("groups", &self.groups)
            .finish()
    }
}

impl NodeCodec for LogicalPeopleGroupDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            members: r.required_list("members")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .required_list("members", &self.members)
            .finish()
    }
}

impl NodeCodec for PeopleReferenceDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            user: r.optional_str("user")?,
            users: r.optional_document("users")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .optional_str("user", self.user.as_deref())
            .optional_document("users", self.users.as_ref())
            .finish()
    }
}

impl NodeCodec for UsersReferenceDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            with_claims: r.list("withClaims")?,
            in_group: r.optional_str("inGroup")?,
            in_generic_role: r.optional_enum("inGenericRole")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .list("withClaims", &self.with_claims)
            .optional_str("inGroup", self.in_group.as_deref())
            .optional_enum("inGenericRole", self.in_generic_role)
            .finish()
    }
}

impl NodeCodec for ClaimFilterDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            claim_type: r.optional_str("type")?,
            value: r.optional_str("value")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .optional_str("type", self.claim_type.as_deref())
            .optional_str("value", self.value.as_deref())
            .finish()
    }
}

impl NodeCodec for DataModelDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            schema: r.optional_value("schema", ValueHint::Structure),
            state: r.optional_value("state", ValueHint::Structure),
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .optional_value("schema", self.schema.as_ref())
            .optional_value("state", self.state.as_ref())
            .finish()
    }
}

impl NodeCodec for FormDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            data: r.optional_document("data")?,
            views: r.list("views")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .optional_document("data", self.data.as_ref())
            .list("views", &self.views)
            .finish()
    }
}

impl NodeCodec for ViewDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            view_type: r.required_str("type")?,
            rendering_mode: r.flags_or("renderingMode", ViewDefinition::default_rendering_mode())?,
            template: r.required_value("template", ValueHint::Structure)?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("type", &self.view_type)
            .flags_unless(
                "renderingMode",
                self.rendering_mode,
                ViewDefinition::default_rendering_mode(),
            )
            .value("template", &self.template)
            .finish()
    }
}

impl NodeCodec for SubtaskDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            task: r.required_reference("task")?,
            input: r.optional_value("input", ValueHint::Structure),
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .reference("task", &self.task)
            .optional_value("input", self.input.as_ref())
            .finish()
    }
}

impl NodeCodec for DeadlineDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            deadline_type: r.required_enum("type")?,
            elapses_at: r.optional_instant("elapsesAt")?,
            elapses_after: r.optional_duration("elapsesAfter")?,
            escalations: r.required_list("escalations")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .enum_tag("type", self.deadline_type)
            .optional_instant("elapsesAt", self.elapses_at.as_ref())
            .optional_duration("elapsesAfter", self.elapses_after.as_ref())
            .required_list("escalations", &self.escalations)
            .finish()
    }
}

impl NodeCodec for EscalationDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            condition: r.optional_expression("condition")?,
            action: r.required_document("action")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .optional_expression("condition", self.condition.as_ref())
            .document("action", &self.action)
            .finish()
    }
}

impl NodeCodec for EscalationActionDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            notification: r.optional_document("notification")?,
            reassignment: r.optional_document("reassignment")?,
            subtask: r.optional_document("subtask")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .optional_document("notification", self.notification.as_ref())
            .optional_document("reassignment", self.reassignment.as_ref())
            .optional_document("subtask", self.subtask.as_ref())
            .finish()
    }
}

impl NodeCodec for NotificationDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            views: r.required_list("views")?,
            input: r.optional_value("input", ValueHint::Structure),
            recipients: r.list("recipients")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .required_list("views", &self.views)
            .optional_value("input", self.input.as_ref())
            .list("recipients", &self.recipients)
            .finish()
    }
}

impl NodeCodec for ReassignmentDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let mut r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            to: r.optional_document("to")?,
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .optional_document("to", self.to.as_ref())
            .finish()
    }
}

impl NodeCodec for CompletionBehaviorDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            behavior_type: r.required_enum("type")?,
            condition: r.optional_expression("condition")?,
            output: r.optional_value("output", ValueHint::Structure),
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .enum_tag("type", self.behavior_type)
            .optional_expression("condition", self.condition.as_ref())
            .optional_value("output", self.output.as_ref())
            .finish()
    }
}

impl NodeCodec for OutcomeDefinition {
    fn decode<A: FormatAdapter>(
        node: &A::Node,
        path: &mut FieldPath,
    ) -> Result<Self, HumanTaskError> {
        let r = ObjectReader::<A>::new(node, path)?;
        Ok(Self {
            name: r.required_str("name")?,
            condition: r.optional_expression("condition")?,
            value: r.optional_value("value", ValueHint::Localized),
        })
    }

    fn encode<A: FormatAdapter>(&self) -> A::Node {
        ObjectWriter::<A>::new()
            .str("name", &self.name)
            .optional_expression("condition", self.condition.as_ref())
            .optional_value("value", self.value.as_ref())
            .finish()
    }
}
