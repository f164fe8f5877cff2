/// Which client call started this transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum KvOpKind {
    Create,
    Read,
    Update,
    Delete,
}

/// A single reply as it arrives, collected until quorum is reached.
#[derive(Clone, Debug)]
pub enum ReplyRecord {
    Success(bool),
    Value(Option<String>),
}

/// Coordinator-side bookkeeping for one outstanding client call: a single
/// table, keyed by `trx_id`, instead of several maps tracking replies,
/// the original request and the issue time separately.
#[derive(Clone, Debug)]
pub struct Transaction {
    pub trx_id: i64,
    pub op: KvOpKind,
    pub key: String,
    pub value: Option<String>,
    pub issued_at: i64,
    pub replies: Vec<ReplyRecord>,
}

impl Transaction {
    pub fn new(trx_id: i64, op: KvOpKind, key: impl Into<String>, value: Option<String>, issued_at: i64) -> Self {
        Transaction {
            trx_id,
            op,
            key: key.into(),
            value,
            issued_at,
            replies: Vec::new(),
        }
    }

    /// Counts reported successes independently: each reply's flag counts
    /// exactly once, never the last reply's flag counted for every reply.
    pub fn success_count(&self) -> usize {
        self.replies
            .iter()
            .filter(|r| matches!(r, ReplyRecord::Success(true)))
            .count()
    }

    pub fn has_quorum_replies(&self) -> bool {
        self.replies.len() >= 2
    }

    /// The value to report on a quorum `ReadReply`: the most recently
    /// received value. Which of two matching replies is chosen is
    /// otherwise unspecified.
    pub fn last_read_value(&self) -> Option<&str> {
        self.replies.iter().rev().find_map(|r| match r {
            ReplyRecord::Value(v) => Some(v.as_deref().unwrap_or("")),
            ReplyRecord::Success(_) => None,
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use test_log::test;

    #[test]
    fn success_count_ignores_failures() {
        let mut t = Transaction::new(1, KvOpKind::Create, "k", Some("v".into()), 0);
        t.replies.push(ReplyRecord::Success(true));
        t.replies.push(ReplyRecord::Success(false));
        assert_eq!(t.success_count(), 1);
        t.replies.push(ReplyRecord::Success(true));
        assert_eq!(t.success_count(), 2);
    }

    #[test]
    fn last_read_value_is_most_recent() {
        let mut t = Transaction::new(1, KvOpKind::Read, "k", None, 0);
        t.replies.push(ReplyRecord::Value(Some("first".into())));
        t.replies.push(ReplyRecord::Value(Some("second".into())));
        assert_eq!(t.last_read_value(), Some("second"));
    }
}
