use crate::entry::MemberEntry;
use ringkeep_base::Result;
use ringkeep_net::Endpoint;
use serde::{Deserialize, Serialize};

/// The three membership-layer message types. Byte-exact compatibility
/// with a legacy packed-struct layout is out of scope here, so this is
/// encoded as a typed, `rmp_serde`-serialized enum rather than hand-packed
/// bytes with offsets.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub enum MlMessage {
    JoinReq {
        sender: Endpoint,
        heartbeat: i64,
    },
    JoinRep {
        sender: Endpoint,
        table: Vec<MemberEntry>,
    },
    Gossip {
        sender: Endpoint,
        table: Vec<MemberEntry>,
    },
}

impl MlMessage {
    pub fn sender(&self) -> Endpoint {
        match self {
            MlMessage::JoinReq { sender, .. } => *sender,
            MlMessage::JoinRep { sender, .. } => *sender,
            MlMessage::Gossip { sender, .. } => *sender,
        }
    }

    pub fn encode(&self) -> Result<Vec<u8>> {
        Ok(rmp_serde::to_vec(self)?)
    }

    pub fn decode(bytes: &[u8]) -> Result<MlMessage> {
        Ok(rmp_serde::from_slice(bytes)?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn round_trips_every_variant() {
        let sender = Endpoint::new(3, 10);
        let table = vec![MemberEntry {
            id: 3,
            port: 10,
            heartbeat: 7,
            local_timestamp: 42,
        }];
        for msg in [
            MlMessage::JoinReq { sender, heartbeat: 0 },
            MlMessage::JoinRep { sender, table: table.clone() },
            MlMessage::Gossip { sender, table },
        ] {
            let bytes = msg.encode().unwrap();
            let decoded = MlMessage::decode(&bytes).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(MlMessage::decode(&[0xff, 0x00, 0x01]).is_err());
    }
}
