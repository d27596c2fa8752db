//! DNS Message Builder
//!
//! Constructs the stub resolver's query in wire format using `hickory-proto`.

use super::record_type_map::RecordTypeMapper;
use ferrous_socks_domain::{RecordType, ResolverError};
use hickory_proto::op::{Message, MessageType, OpCode, Query};
use hickory_proto::rr::{DNSClass, Name};
use hickory_proto::serialize::binary::{BinEncodable, BinEncoder};
use std::str::FromStr;

/// A serialized query and the id its response must carry.
#[derive(Debug, Clone)]
pub struct BuiltQuery {
    pub id: u16,
    pub bytes: Vec<u8>,
}

pub struct MessageBuilder;

impl MessageBuilder {
    /// Builds a recursive query with a random id and a single question.
    pub fn build_query(domain: &str, record_type: &RecordType) -> Result<BuiltQuery, ResolverError> {
        Self::build_query_with_id(fastrand::u16(..), domain, record_type)
    }

    pub fn build_query_with_id(
        id: u16,
        domain: &str,
        record_type: &RecordType,
    ) -> Result<BuiltQuery, ResolverError> {
        if domain.trim().is_empty() {
            return Err(ResolverError::InvalidQuery {
                name: domain.to_string(),
                message: "empty name".to_string(),
            });
        }

        let name = Name::from_str(domain).map_err(|e| ResolverError::InvalidQuery {
            name: domain.to_string(),
            message: e.to_string(),
        })?;

        let mut query = Query::new();
        query.set_name(name);
        query.set_query_type(RecordTypeMapper::to_hickory(record_type));
        query.set_query_class(DNSClass::IN);

        let mut message = Message::new(id, MessageType::Query, OpCode::Query);
        message.set_recursion_desired(true);
        message.add_query(query);

        let bytes = Self::serialize_message(domain, &message)?;
        Ok(BuiltQuery { id, bytes })
    }

    fn serialize_message(domain: &str, message: &Message) -> Result<Vec<u8>, ResolverError> {
        let mut buf = Vec::with_capacity(512);
        let mut encoder = BinEncoder::new(&mut buf);

        message
            .emit(&mut encoder)
            .map_err(|e| ResolverError::InvalidQuery {
                name: domain.to_string(),
                message: format!("failed to serialize DNS message: {}", e),
            })?;

        Ok(buf)
    }
}
