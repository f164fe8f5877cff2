use ringkeep_base::{err, Result};
use ringkeep_net::Endpoint;
use ringkeep_store::ReplicaRole;

/// The KV wire message: a transaction id, originator endpoint, type tag,
/// and type-specific payload. Unlike the membership layer's wire format,
/// the ASCII `"::"`-delimited grammar here is a functional requirement —
/// other implementations parse this exact text — so it is hand-encoded
/// rather than run through `rmp_serde`.
#[derive(Clone, Debug, PartialEq)]
pub enum KvMessage {
    Create { trx_id: i64, from: Endpoint, key: String, value: String, role: ReplicaRole },
    Update { trx_id: i64, from: Endpoint, key: String, value: String, role: ReplicaRole },
    Read { trx_id: i64, from: Endpoint, key: String },
    Delete { trx_id: i64, from: Endpoint, key: String },
    Reply { trx_id: i64, from: Endpoint, success: bool },
    ReadReply { trx_id: i64, from: Endpoint, value: Option<String> },
}

const CREATE: &str = "0";
const READ: &str = "1";
const UPDATE: &str = "2";
const DELETE: &str = "3";
const REPLY: &str = "4";
const READREPLY: &str = "5";

impl KvMessage {
    pub fn trx_id(&self) -> i64 {
        match self {
            KvMessage::Create { trx_id, .. }
            | KvMessage::Update { trx_id, .. }
            | KvMessage::Read { trx_id, .. }
            | KvMessage::Delete { trx_id, .. }
            | KvMessage::Reply { trx_id, .. }
            | KvMessage::ReadReply { trx_id, .. } => *trx_id,
        }
    }

    pub fn from(&self) -> Endpoint {
        match self {
            KvMessage::Create { from, .. }
            | KvMessage::Update { from, .. }
            | KvMessage::Read { from, .. }
            | KvMessage::Delete { from, .. }
            | KvMessage::Reply { from, .. }
            | KvMessage::ReadReply { from, .. } => *from,
        }
    }

    pub fn encode(&self) -> Vec<u8> {
        let s = match self {
            KvMessage::Create { trx_id, from, key, value, role } => {
                format!("{trx_id}::{}::{CREATE}::{key}::{value}::{}", from.to_wire_string(), role.tag())
            }
            KvMessage::Update { trx_id, from, key, value, role } => {
                format!("{trx_id}::{}::{UPDATE}::{key}::{value}::{}", from.to_wire_string(), role.tag())
            }
            KvMessage::Read { trx_id, from, key } => {
                format!("{trx_id}::{}::{READ}::{key}", from.to_wire_string())
            }
            KvMessage::Delete { trx_id, from, key } => {
                format!("{trx_id}::{}::{DELETE}::{key}", from.to_wire_string())
            }
            KvMessage::Reply { trx_id, from, success } => {
                format!("{trx_id}::{}::{REPLY}::{}", from.to_wire_string(), if *success { 1 } else { 0 })
            }
            KvMessage::ReadReply { trx_id, from, value } => {
                format!("{trx_id}::{}::{READREPLY}::{}", from.to_wire_string(), value.as_deref().unwrap_or(""))
            }
        };
        s.into_bytes()
    }

    pub fn decode(bytes: &[u8]) -> Result<KvMessage> {
        let text = std::str::from_utf8(bytes).map_err(|_| err("kv message is not valid utf-8"))?;
        let mut parts = text.splitn(4, "::");
        let trx_id: i64 = parts
            .next()
            .ok_or_else(|| err("kv message missing trx id"))?
            .parse()
            .map_err(|_| err("kv message trx id is not an integer"))?;
        let from = Endpoint::parse_wire_string(parts.next().ok_or_else(|| err("kv message missing sender"))?)?;
        let type_tag = parts.next().ok_or_else(|| err("kv message missing type"))?;
        let rest = parts.next().unwrap_or("");

        match type_tag {
            CREATE | UPDATE => {
                let mut fields = rest.splitn(3, "::");
                let key = fields.next().ok_or_else(|| err("kv create/update missing key"))?.to_string();
                let value = fields.next().ok_or_else(|| err("kv create/update missing value"))?.to_string();
                let role_tag: u8 = fields
                    .next()
                    .ok_or_else(|| err("kv create/update missing role"))?
                    .parse()
                    .map_err(|_| err("kv create/update role is not an integer"))?;
                let role = ReplicaRole::from_tag(role_tag).ok_or_else(|| err("kv create/update role out of range"))?;
                if type_tag == CREATE {
                    Ok(KvMessage::Create { trx_id, from, key, value, role })
                } else {
                    Ok(KvMessage::Update { trx_id, from, key, value, role })
                }
            }
            READ | DELETE => {
                let key = rest.to_string();
                if type_tag == READ {
                    Ok(KvMessage::Read { trx_id, from, key })
                } else {
                    Ok(KvMessage::Delete { trx_id, from, key })
                }
            }
            REPLY => {
                let success = match rest {
                    "1" => true,
                    "0" => false,
                    _ => return Err(err("kv reply flag is not 0 or 1")),
                };
                Ok(KvMessage::Reply { trx_id, from, success })
            }
            READREPLY => {
                let value = if rest.is_empty() { None } else { Some(rest.to_string()) };
                Ok(KvMessage::ReadReply { trx_id, from, value })
            }
            _ => Err(err("kv message has unknown type tag")),
        }
    }
}
