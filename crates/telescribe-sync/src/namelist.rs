use std::collections::HashMap;

use telescribe_core::types::MemberRecord;

/// Fields kept per member — everything from the member row except the
/// id, which becomes the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamelistEntry {
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub join_date: String,
    pub is_mgmt: bool,
    pub is_kin: bool,
    pub left_the_group: bool,
}

/// Immutable per-run lookup from member id to profile fields.
///
/// Rebuilt from the full member table on every run (not incremental) and
/// passed by reference into the reaction resolver. Last-write-wins on
/// duplicate ids, so a rejoin's newer row shadows the older one.
#[derive(Debug, Clone, Default)]
pub struct Namelist {
    entries: HashMap<String, NamelistEntry>,
}

impl Namelist {
    pub fn from_members(members: &[MemberRecord]) -> Self {
        let mut namelist = Self::default();
        namelist.extend(members);
        namelist
    }

    /// Merge more member rows in, later rows winning. Used by the driver
    /// to add the run's own joiners before any row is committed.
    pub fn extend(&mut self, members: &[MemberRecord]) {
        for member in members {
            self.entries.insert(
                member.user_id.clone(),
                NamelistEntry {
                    username: member.username.clone(),
                    first_name: member.first_name.clone(),
                    last_name: member.last_name.clone(),
                    join_date: member.join_date.clone(),
                    is_mgmt: member.is_mgmt,
                    is_kin: member.is_kin,
                    left_the_group: member.left_the_group,
                },
            );
        }
    }

    pub fn get(&self, user_id: &str) -> Option<&NamelistEntry> {
        self.entries.get(user_id)
    }

    pub fn contains(&self, user_id: &str) -> bool {
        self.entries.contains_key(user_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
