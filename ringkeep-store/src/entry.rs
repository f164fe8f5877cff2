use crate::role::ReplicaRole;
use ringkeep_base::{err, Result};

/// Local on-disk (in-memory, here) encoding of one stored value as
/// `value:timestamp:role_tag`.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StoredEntry {
    pub value: String,
    pub timestamp: i64,
    pub role: ReplicaRole,
}

impl StoredEntry {
    pub fn new(value: impl Into<String>, timestamp: i64, role: ReplicaRole) -> Self {
        StoredEntry {
            value: value.into(),
            timestamp,
            role,
        }
    }

    pub fn encode(&self) -> String {
        format!("{}:{}:{}", self.value, self.timestamp, self.role.tag())
    }

    pub fn decode(s: &str) -> Result<StoredEntry> {
        let mut parts = s.rsplitn(3, ':');
        let role_tag = parts.next().ok_or_else(|| err("stored entry missing role"))?;
        let timestamp = parts.next().ok_or_else(|| err("stored entry missing timestamp"))?;
        let value = parts.next().ok_or_else(|| err("stored entry missing value"))?;
        if parts.next().is_some() {
            return Err(err("stored entry has too many fields"));
        }

        let tag: u8 = role_tag
            .parse()
            .map_err(|_| err("stored entry role is not an integer"))?;
        let role = ReplicaRole::from_tag(tag).ok_or_else(|| err("stored entry role is out of range"))?;
        let timestamp: i64 = timestamp
            .parse()
            .map_err(|_| err("stored entry timestamp is not an integer"))?;

        Ok(StoredEntry {
            value: value.to_string(),
            timestamp,
            role,
        })
    }
}
