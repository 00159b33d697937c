//! Property-based tests for pair-key normalization and group membership.

use proptest::prelude::*;
use uuid::Uuid;

use huddle::chat::model::{direct_pair_key, Chat};

fn uuid_strategy() -> impl Strategy<Value = Uuid> {
    any::<u128>().prop_map(Uuid::from_u128)
}

proptest! {
    /// Both orderings of a pair map to the same storage key.
    #[test]
    fn pair_key_is_order_insensitive(a in uuid_strategy(), b in uuid_strategy()) {
        prop_assert_eq!(direct_pair_key(a, b), direct_pair_key(b, a));
    }

    /// The key is exactly the sorted pair, so distinct pairs get distinct
    /// keys and the pair can be recovered from the key.
    #[test]
    fn pair_key_roundtrips_the_sorted_pair(a in uuid_strategy(), b in uuid_strategy()) {
        let key = direct_pair_key(a, b);
        let parts: Vec<Uuid> = key
            .split(':')
            .map(|p| p.parse().expect("key half is a uuid"))
            .collect();

        let mut expected = vec![a, b];
        expected.sort();
        prop_assert_eq!(parts, expected);
    }

    /// A group's member set always contains the creator, never contains
    /// duplicates, and contains nothing that was not submitted.
    #[test]
    fn group_membership_is_a_set_with_the_creator(
        creator in uuid_strategy(),
        members in prop::collection::vec(uuid_strategy(), 0..8),
    ) {
        let chat = Chat::group(creator, &members, "room");

        prop_assert!(chat.users.contains(&creator));
        let mut deduped = chat.users.clone();
        deduped.dedup();
        prop_assert_eq!(&deduped, &chat.users);
        for user in &chat.users {
            prop_assert!(*user == creator || members.contains(user));
        }
    }

    /// Direct chats always have exactly two members and carry a pair key;
    /// groups never carry one.
    #[test]
    fn direct_key_present_only_for_direct_chats(
        a in uuid_strategy(),
        b in uuid_strategy(),
        members in prop::collection::vec(uuid_strategy(), 1..4),
    ) {
        prop_assume!(a != b);

        let direct = Chat::direct(a, b);
        prop_assert_eq!(direct.users.len(), 2);
        prop_assert_eq!(direct.direct_key(), Some(direct_pair_key(a, b)));

        let group = Chat::group(a, &members, "room");
        prop_assert_eq!(group.direct_key(), None);
    }
}
