// Document model of a human task definition and the scalar codecs its fields use
// (expression tag, enum tags, ISO 8601 durations and instants).

pub mod enums;
pub mod expression;
pub mod reference;
pub mod task;
pub mod time;
pub mod value;

pub use enums::{
    CompletionBehaviorType, DeadlineType, FlagSet, GenericHumanRole, HumanTaskRoutingMode,
    SubtaskExecutionMode, ViewRenderingMode, ViewRenderingModes, WireEnum, WireFlag,
};
pub use expression::{is_expression, RuntimeExpression};
pub use reference::TaskDefinitionReference;
pub use task::*;
pub use time::{decode_duration, decode_instant, encode_duration, encode_instant, Instant, IsoDuration};
pub use value::{LocalizedMap, Number, Scalar, Value, ValueHint};
