pub mod builder;
pub mod codec;
pub mod definition;
pub mod reader;
