use human_task_base::error::HumanTaskError;
use std::{fmt, marker::PhantomData};
use strum::IntoEnumIterator;
use strum_macros::{EnumIter, IntoStaticStr};

/// Enumeration with exactly one wire tag per member.
///
/// Tags come from `#[strum(serialize = "...")]`. Several members may share a tag; decode
/// scans members in declaration order, so the first declared member wins.
pub trait WireEnum: Copy + PartialEq + fmt::Debug + IntoEnumIterator + Into<&'static str> {
    const NAME: &'static str;

    fn tag(self) -> &'static str {
        self.into()
    }

    fn decode_tag(tag: &str) -> Result<Self, HumanTaskError> {
        Self::iter()
            .find(|m| m.tag() == tag)
            .ok_or_else(|| HumanTaskError::UnknownEnumTag {
                enum_name: Self::NAME,
                tag: tag.to_string(),
            })
    }

    /// all members declared with the given tag (more than one for aliased tags)
    fn members_with_tag(tag: &str) -> Vec<Self> {
        Self::iter().filter(|m| m.tag() == tag).collect()
    }
}

/// Bit-flag enumeration: one zero member and power-of-two members.
pub trait WireFlag: WireEnum {
    fn bits(self) -> u32;
}

/// Combination of zero or more flag members.
pub struct FlagSet<E: WireFlag> {
    bits: u32,
    _marker: PhantomData<E>,
}

impl<E: WireFlag> FlagSet<E> {
    pub fn empty() -> Self {
        Self {
            bits: 0,
            _marker: PhantomData,
        }
    }
    pub fn from_member(member: E) -> Self {
        Self {
            bits: member.bits(),
            _marker: PhantomData,
        }
    }
    pub fn from_members(members: impl IntoIterator<Item = E>) -> Self {
        members.into_iter().fold(Self::empty(), |acc, m| acc.with(m))
    }
    pub fn bits(&self) -> u32 {
        self.bits
    }
    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }
    pub fn contains(&self, member: E) -> bool {
        let b = member.bits();
        b != 0 && self.bits & b == b
    }
    pub fn with(mut self, member: E) -> Self {
        self.bits |= member.bits();
        self
    }
    pub fn insert(&mut self, member: E) {
        self.bits |= member.bits();
    }
    /// constituent non-zero members in declaration order
    pub fn members(&self) -> Vec<E> {
        E::iter()
            .filter(|m| m.bits().is_power_of_two() && self.contains(*m))
            .collect()
    }

    /// Combine tags with bitwise OR. Each tag may itself be a comma separated token list.
    pub fn decode_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Result<Self, HumanTaskError> {
        let mut bits = 0u32;
        for token in tags.into_iter().flat_map(|t| t.split(',')) {
            let token = token.trim();
            if token.is_empty() {
                continue;
            }
            bits |= E::decode_tag(token)?.bits();
        }
        Ok(Self {
            bits,
            _marker: PhantomData,
        })
    }

    /// Decompose into tags; the zero value is written with the zero member's tag.
    pub fn encode_tags(&self) -> Vec<&'static str> {
        if self.bits == 0 {
            return E::iter()
                .find(|m| m.bits() == 0)
                .map(|m| vec![m.tag()])
                .unwrap_or_default();
        }
        self.members().into_iter().map(|m| m.tag()).collect()
    }
}

impl<E: WireFlag> Clone for FlagSet<E> {
    fn clone(&self) -> Self {
        *self
    }
}
impl<E: WireFlag> Copy for FlagSet<E> {}
impl<E: WireFlag> PartialEq for FlagSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}
impl<E: WireFlag> Eq for FlagSet<E> {}
impl<E: WireFlag> Default for FlagSet<E> {
    fn default() -> Self {
        Self::empty()
    }
}
impl<E: WireFlag> From<E> for FlagSet<E> {
    fn from(member: E) -> Self {
        Self::from_member(member)
    }
}
impl<E: WireFlag> fmt::Debug for FlagSet<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple(E::NAME).field(&self.encode_tags()).finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum HumanTaskRoutingMode {
    #[default]
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "sequential")]
    Sequential,
    #[strum(serialize = "parallel")]
    Parallel,
}
impl WireEnum for HumanTaskRoutingMode {
    const NAME: &'static str = "HumanTaskRoutingMode";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum SubtaskExecutionMode {
    #[default]
    #[strum(serialize = "sequential")]
    Sequential,
    #[strum(serialize = "parallel")]
    Parallel,
}
impl WireEnum for SubtaskExecutionMode {
    const NAME: &'static str = "SubtaskExecutionMode";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum CompletionBehaviorType {
    #[default]
    #[strum(serialize = "automatic")]
    Automatic,
    #[strum(serialize = "manual")]
    Manual,
}
impl WireEnum for CompletionBehaviorType {
    const NAME: &'static str = "CompletionBehaviorType";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum DeadlineType {
    #[default]
    #[strum(serialize = "start")]
    Start,
    #[strum(serialize = "completion")]
    Completion,
}
impl WireEnum for DeadlineType {
    const NAME: &'static str = "DeadlineType";
}

/// Generic human roles.
///
/// `Initiator`, `ExcludedOwner` and `NotificationRecipient` share their tag with the member
/// declared just before them. Decoding such a tag yields the earlier member.
// XXX upstream declares these aliases; which member is canonical is unresolved there.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, EnumIter, IntoStaticStr)]
pub enum GenericHumanRole {
    #[default]
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "potentialInitiator")]
    PotentialInitiator,
    #[strum(serialize = "potentialInitiator")]
    Initiator,
    #[strum(serialize = "potentialOwner")]
    PotentialOwner,
    #[strum(serialize = "potentialOwner")]
    ExcludedOwner,
    #[strum(serialize = "actualOwner")]
    ActualOwner,
    #[strum(serialize = "stakeholder")]
    Stakeholder,
    #[strum(serialize = "businessAdministrator")]
    BusinessAdministrator,
    #[strum(serialize = "businessAdministrator")]
    NotificationRecipient,
}
impl WireEnum for GenericHumanRole {
    const NAME: &'static str = "GenericHumanRole";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, IntoStaticStr)]
pub enum ViewRenderingMode {
    #[strum(serialize = "none")]
    None,
    #[strum(serialize = "process")]
    Process,
    #[strum(serialize = "render")]
    Render,
}
impl WireEnum for ViewRenderingMode {
    const NAME: &'static str = "ViewRenderingMode";
}
impl WireFlag for ViewRenderingMode {
    fn bits(self) -> u32 {
        match self {
            ViewRenderingMode::None => 0,
            ViewRenderingMode::Process => 1,
            ViewRenderingMode::Render => 2,
        }
    }
}

pub type ViewRenderingModes = FlagSet<ViewRenderingMode>;
