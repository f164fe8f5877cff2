use ringkeep_base::{err, Result};
use serde::{Deserialize, Serialize};

/// A peer's identity: a 4-byte node id and a 2-byte port, serialized as a
/// fixed 6-byte form. Equality, ordering and hashing are all by this
/// 6-byte form (derived field order matches: id before port).
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
pub struct Endpoint {
    pub id: u32,
    pub port: u16,
}

impl Endpoint {
    pub fn new(id: u32, port: u16) -> Self {
        Endpoint { id, port }
    }

    /// The 6-byte wire identity: 4 bytes of id, then 2 bytes of port, both
    /// host-order (this process never talks to a different-endian peer).
    pub fn to_bytes(&self) -> [u8; 6] {
        let mut out = [0u8; 6];
        out[0..4].copy_from_slice(&self.id.to_ne_bytes());
        out[4..6].copy_from_slice(&self.port.to_ne_bytes());
        out
    }

    /// The KV wire's address form, `"id:port"`.
    pub fn to_wire_string(&self) -> String {
        format!("{}:{}", self.id, self.port)
    }

    pub fn parse_wire_string(s: &str) -> Result<Endpoint> {
        let (id_str, port_str) = s
            .split_once(':')
            .ok_or_else(|| err(format!("malformed endpoint {s:?}: missing ':'")))?;
        let id: u32 = id_str
            .parse()
            .map_err(|_| err(format!("malformed endpoint id in {s:?}")))?;
        let port: u16 = port_str
            .parse()
            .map_err(|_| err(format!("malformed endpoint port in {s:?}")))?;
        Ok(Endpoint { id, port })
    }

    /// The hash-input form: `"id.port"`. Kept distinct from
    /// the KV wire's `"id:port"` form so the two textual encodings don't
    /// accidentally collide in meaning.
    pub fn to_hash_string(&self) -> String {
        format!("{}.{}", self.id, self.port)
    }
}

impl std::fmt::Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_wire_string())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn wire_string_round_trip() {
        let e = Endpoint::new(7, 4321);
        let s = e.to_wire_string();
        assert_eq!(s, "7:4321");
        assert_eq!(Endpoint::parse_wire_string(&s).unwrap(), e);
    }

    #[test]
    fn rejects_malformed() {
        assert!(Endpoint::parse_wire_string("not-an-addr").is_err());
        assert!(Endpoint::parse_wire_string("7:notaport").is_err());
    }

    #[test]
    fn bytes_distinguish_id_and_port() {
        let a = Endpoint::new(1, 0);
        let b = Endpoint::new(0, 1);
        assert_ne!(a.to_bytes(), b.to_bytes());
    }
}
