use crate::entry::MemberEntry;
use ringkeep_net::Endpoint;

/// Outcome of folding one incoming gossip entry into the table, used by
/// the caller to decide whether to log a node add.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum GossipEffect {
    /// Entry was for ourselves; ignored.
    Skipped,
    /// No existing row and the report wasn't fresh enough; ignored.
    StaleUnknown,
    /// An existing row had an equal-or-higher heartbeat; ignored.
    NotNewer,
    /// An existing row was overwritten with a strictly higher heartbeat.
    Overwritten,
    /// A brand new row was inserted.
    Inserted,
}

/// Ordered sequence of `MemberEntry`; insertion order is not meaningful.
/// Invariant: at most one entry per node id. Entries are compared and
/// overwritten by `id` alone rather than the full `(id, port)` pair,
/// since a given node id always advertises the same port for the run's
/// lifetime.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct MembershipTable {
    entries: Vec<MemberEntry>,
}

impl MembershipTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[MemberEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn find_by_id(&self, id: u32) -> Option<&MemberEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    fn find_index_by_id(&self, id: u32) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    pub fn endpoints(&self) -> impl Iterator<Item = Endpoint> + '_ {
        self.entries.iter().map(|e| e.endpoint())
    }

    /// Replace the whole table, as JOINREP does on the joiner.
    pub fn replace_all(&mut self, entries: Vec<MemberEntry>) {
        self.entries = entries;
    }

    /// Insert-or-refresh used by JOINREQ handling on the introducer side:
    /// unconditionally records the sender's heartbeat/timestamp. Returns
    /// `true` if this created a new row (caller logs an add only then).
    pub fn insert_or_refresh(&mut self, entry: MemberEntry) -> bool {
        match self.find_index_by_id(entry.id) {
            Some(i) => {
                self.entries[i] = entry;
                false
            }
            None => {
                self.entries.push(entry);
                true
            }
        }
    }

    /// Fold one incoming gossip entry into the table: skip self; overwrite
    /// only on strictly higher heartbeat (and reset the suspicion timer to
    /// `now`); otherwise insert only if the report is fresh enough.
    pub fn apply_gossip_entry(
        &mut self,
        incoming: MemberEntry,
        now: i64,
        self_id: u32,
        suspicion_window: i64,
    ) -> GossipEffect {
        if incoming.id == self_id {
            return GossipEffect::Skipped;
        }
        match self.find_index_by_id(incoming.id) {
            Some(i) => {
                if incoming.heartbeat > self.entries[i].heartbeat {
                    self.entries[i] = MemberEntry {
                        local_timestamp: now,
                        ..incoming
                    };
                    GossipEffect::Overwritten
                } else {
                    GossipEffect::NotNewer
                }
            }
            None => {
                if now - incoming.local_timestamp < suspicion_window {
                    self.entries.push(incoming);
                    GossipEffect::Inserted
                } else {
                    GossipEffect::StaleUnknown
                }
            }
        }
    }

    /// Per-tick self-refresh and eviction sweep: drop this node's own
    /// row, drop any row stale past `eviction_window`
    /// (returned so the caller can log removals), then re-append the own
    /// row with the bumped heartbeat and `local_timestamp = now`.
    pub fn tick_refresh(
        &mut self,
        self_id: u32,
        self_port: u16,
        now: i64,
        eviction_window: i64,
        heartbeat: i64,
    ) -> Vec<MemberEntry> {
        self.entries.retain(|e| e.id != self_id);

        let mut evicted = Vec::new();
        self.entries.retain(|e| {
            if now - e.local_timestamp > eviction_window {
                evicted.push(*e);
                false
            } else {
                true
            }
        });

        self.entries.push(MemberEntry {
            id: self_id,
            port: self_port,
            heartbeat,
            local_timestamp: now,
        });

        evicted
    }
}
