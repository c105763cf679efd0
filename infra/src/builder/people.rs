use super::{require_text, slugify};
use crate::definition::enums::GenericHumanRole;
use crate::definition::task::{
    ClaimFilterDefinition, LogicalPeopleGroupDefinition, PeopleAssignmentsDefinition,
    PeopleReferenceDefinition, UsersReferenceDefinition,
};
use human_task_base::error::HumanTaskError;

pub(crate) fn build_reference<F>(setup: F) -> Result<PeopleReferenceDefinition, HumanTaskError>
where
    F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
{
    setup(PeopleReferenceDefinitionBuilder::new()).map(|b| b.build())
}

/// Builds a reference to a single user or to the users matching claims, a group or a role.
#[derive(Debug, Clone, Default)]
pub struct PeopleReferenceDefinitionBuilder {
    definition: PeopleReferenceDefinition,
}

impl PeopleReferenceDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// reference one user; clears any users query
    pub fn user(mut self, user_identifier: &str) -> Result<Self, HumanTaskError> {
        self.definition.user = Some(require_text("user", user_identifier)?);
        self.definition.users = None;
        Ok(self)
    }

    fn users_mut(&mut self) -> &mut UsersReferenceDefinition {
        self.definition.user = None;
        self.definition.users.get_or_insert_with(Default::default)
    }

    pub fn with_claim(
        mut self,
        claim_type: &str,
        value: Option<&str>,
    ) -> Result<Self, HumanTaskError> {
        let claim_type = require_text("claim type", claim_type)?;
        self.users_mut().with_claims.push(ClaimFilterDefinition {
            claim_type: Some(claim_type),
            value: value.map(|v| v.to_string()),
        });
        Ok(self)
    }

    pub fn in_group(mut self, group: &str) -> Result<Self, HumanTaskError> {
        let group = require_text("group", group)?;
        self.users_mut().in_group = Some(group);
        Ok(self)
    }

    pub fn in_role(mut self, role: GenericHumanRole) -> Self {
        self.users_mut().in_generic_role = Some(role);
        self
    }

    pub fn build(self) -> PeopleReferenceDefinition {
        self.definition
    }
}

#[derive(Debug, Clone, Default)]
pub struct PeopleAssignmentsDefinitionBuilder {
    definition: PeopleAssignmentsDefinition,
}

impl PeopleAssignmentsDefinitionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn to_potential_initiators<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition
            .potential_initiators
            .push(build_reference(setup)?);
        Ok(self)
    }

    pub fn to_potential_owners<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition
            .potential_owners
            .push(build_reference(setup)?);
        Ok(self)
    }

    pub fn to_excluded_owners<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition
            .excluded_owners
            .push(build_reference(setup)?);
        Ok(self)
    }

    pub fn to_stakeholders<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition
            .stakeholders
            .push(build_reference(setup)?);
        Ok(self)
    }

    pub fn to_business_administrators<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition
            .business_administrators
            .push(build_reference(setup)?);
        Ok(self)
    }

    pub fn to_notification_recipients<F>(mut self, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        self.definition
            .notification_recipients
            .push(build_reference(setup)?);
        Ok(self)
    }

    /// Add a member to the named logical group, creating the group on first use.
    pub fn to_group<F>(mut self, group_name: &str, setup: F) -> Result<Self, HumanTaskError>
    where
        F: FnOnce(PeopleReferenceDefinitionBuilder) -> Result<PeopleReferenceDefinitionBuilder, HumanTaskError>,
    {
        let name = slugify("groupName", group_name)?;
        let member = build_reference(setup)?;
        match self.definition.groups.iter_mut().find(|g| g.name == name) {
            Some(group) => group.members.push(member),
            None => self.definition.groups.push(LogicalPeopleGroupDefinition {
                name,
                members: vec![member],
            }),
        }
        Ok(self)
    }

    pub fn build(self) -> PeopleAssignmentsDefinition {
        self.definition
    }
}

impl From<Option<PeopleAssignmentsDefinition>> for PeopleAssignmentsDefinitionBuilder {
    fn from(current: Option<PeopleAssignmentsDefinition>) -> Self {
        Self {
            definition: current.unwrap_or_default(),
        }
    }
}
