/// Which of the three replicas a locally stored entry represents. Encoded
/// in `StoredEntry` as an integer tag matching the KV wire's role codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ReplicaRole {
    Primary,
    Secondary,
    Tertiary,
}

impl ReplicaRole {
    pub fn tag(self) -> u8 {
        match self {
            ReplicaRole::Primary => 0,
            ReplicaRole::Secondary => 1,
            ReplicaRole::Tertiary => 2,
        }
    }

    pub fn from_tag(tag: u8) -> Option<ReplicaRole> {
        match tag {
            0 => Some(ReplicaRole::Primary),
            1 => Some(ReplicaRole::Secondary),
            2 => Some(ReplicaRole::Tertiary),
            _ => None,
        }
    }
}

impl std::fmt::Display for ReplicaRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.tag())
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn tag_round_trips() {
        for role in [ReplicaRole::Primary, ReplicaRole::Secondary, ReplicaRole::Tertiary] {
            assert_eq!(ReplicaRole::from_tag(role.tag()), Some(role));
        }
    }

    #[test]
    fn rejects_unknown_tag() {
        assert_eq!(ReplicaRole::from_tag(9), None);
    }
}
