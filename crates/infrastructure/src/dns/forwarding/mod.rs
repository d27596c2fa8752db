pub mod message_builder;
pub mod record_type_map;

pub use message_builder::{BuiltQuery, MessageBuilder};
pub use record_type_map::RecordTypeMapper;
