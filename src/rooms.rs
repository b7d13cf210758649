//! Room directory: the authoritative map of rooms to their member sets.

use std::collections::HashSet;
use std::sync::Arc;

use dashmap::DashMap;

use crate::ws::ConnectionId;

/// One participant's presence in one room.
///
/// Equality covers the whole record, so two members sharing a user id remain
/// distinct set elements. The connection id is a non-owning back-reference
/// used only for lookup during relay.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Member {
    pub user_id: String,
    pub display_name: String,
    pub connection_id: ConnectionId,
}

/// In-memory room directory.
///
/// Rooms are created lazily on first join and deleted by the same operation
/// that empties them: an entry with zero members never survives a call.
/// DashMap entry locking serializes membership mutations per room.
#[derive(Debug, Clone, Default)]
pub struct RoomDirectory {
    rooms: Arc<DashMap<String, HashSet<Member>>>,
}

impl RoomDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a member, creating the room if absent. Idempotent for an
    /// identical record.
    pub fn add_member(&self, room_id: &str, member: Member) {
        self.rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(member);
    }

    /// Remove every member of the room whose user id matches, then delete the
    /// room if it emptied. No-op for unknown rooms.
    ///
    /// Removal is by user id rather than by connection: a user id joined from
    /// two connections is evicted entirely when either connection leaves,
    /// matching the upstream relay's behavior.
    pub fn remove_user(&self, room_id: &str, user_id: &str) {
        if let Some(mut members) = self.rooms.get_mut(room_id) {
            members.retain(|m| m.user_id != user_id);
            let empty = members.is_empty();
            drop(members);
            if empty {
                // Re-checks emptiness under the map lock so a join landing
                // between the retain and this call is never lost.
                self.rooms.remove_if(room_id, |_, members| members.is_empty());
            }
        }
    }

    /// Roster handed to a newly joined user: everyone in the room except
    /// members sharing the given user id. Order is unspecified.
    pub fn members_except(&self, room_id: &str, user_id: &str) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|members| {
                members
                    .iter()
                    .filter(|m| m.user_id != user_id)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    /// All members of a room. Empty for unknown rooms.
    pub fn members(&self, room_id: &str) -> Vec<Member> {
        self.rooms
            .get(room_id)
            .map(|members| members.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.contains_key(room_id)
    }

    /// Number of members in a room, `None` for unknown rooms.
    pub fn member_count(&self, room_id: &str) -> Option<usize> {
        self.rooms.get(room_id).map(|members| members.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn member(user_id: &str, display_name: &str) -> Member {
        Member {
            user_id: user_id.to_string(),
            display_name: display_name.to_string(),
            connection_id: ConnectionId::new(),
        }
    }

    #[test]
    fn room_exists_iff_it_has_members() {
        let rooms = RoomDirectory::new();
        assert!(!rooms.contains("r1"));

        rooms.add_member("r1", member("u1", "Alice"));
        assert!(rooms.contains("r1"));
        assert_eq!(rooms.member_count("r1"), Some(1));

        rooms.remove_user("r1", "u1");
        assert!(!rooms.contains("r1"));
        assert_eq!(rooms.member_count("r1"), None);
    }

    #[test]
    fn remove_user_on_unknown_room_is_a_noop() {
        let rooms = RoomDirectory::new();
        rooms.remove_user("nowhere", "u1");
        assert!(!rooms.contains("nowhere"));
    }

    #[test]
    fn duplicate_user_ids_are_distinct_members() {
        let rooms = RoomDirectory::new();
        rooms.add_member("r1", member("u1", "Alice"));
        rooms.add_member("r1", member("u1", "Alice"));
        // Distinct connection ids make these distinct set elements
        assert_eq!(rooms.member_count("r1"), Some(2));
    }

    #[test]
    fn identical_member_record_is_idempotent() {
        let rooms = RoomDirectory::new();
        let m = member("u1", "Alice");
        rooms.add_member("r1", m.clone());
        rooms.add_member("r1", m);
        assert_eq!(rooms.member_count("r1"), Some(1));
    }

    #[test]
    fn remove_user_evicts_all_members_sharing_the_id() {
        let rooms = RoomDirectory::new();
        rooms.add_member("r1", member("u1", "Alice"));
        rooms.add_member("r1", member("u1", "Alice"));
        rooms.add_member("r1", member("u2", "Bob"));

        rooms.remove_user("r1", "u1");
        assert_eq!(rooms.member_count("r1"), Some(1));
        assert_eq!(rooms.members("r1")[0].user_id, "u2");
    }

    #[test]
    fn members_except_filters_the_joining_user_id() {
        let rooms = RoomDirectory::new();
        rooms.add_member("r1", member("u1", "Alice"));
        rooms.add_member("r1", member("u2", "Bob"));

        let roster = rooms.members_except("r1", "u1");
        assert_eq!(roster.len(), 1);
        assert_eq!(roster[0].user_id, "u2");

        assert!(rooms.members_except("nowhere", "u1").is_empty());
    }

    #[test]
    fn concurrent_joins_to_an_empty_room_are_not_lost() {
        let rooms = RoomDirectory::new();
        let handles: Vec<_> = (0..2)
            .map(|i| {
                let rooms = rooms.clone();
                std::thread::spawn(move || {
                    rooms.add_member("r1", member(&format!("u{}", i), "X"));
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(rooms.member_count("r1"), Some(2));
    }

    #[test]
    fn join_racing_the_last_leave_is_never_lost() {
        // Repeatedly race one thread emptying the room against another
        // re-joining it; the joiner's member must survive every time.
        for round in 0..100 {
            let rooms = RoomDirectory::new();
            rooms.add_member("r1", member("leaver", "L"));

            let leaver = {
                let rooms = rooms.clone();
                std::thread::spawn(move || rooms.remove_user("r1", "leaver"))
            };
            let joiner = {
                let rooms = rooms.clone();
                std::thread::spawn(move || rooms.add_member("r1", member("joiner", "J")))
            };
            leaver.join().unwrap();
            joiner.join().unwrap();

            assert!(rooms.contains("r1"), "round {}: joiner was lost", round);
            assert!(
                rooms.members("r1").iter().any(|m| m.user_id == "joiner"),
                "round {}: joiner missing from member set",
                round
            );
        }
    }
}
