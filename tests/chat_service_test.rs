//! Chat service integration tests against a real database file.

mod common;

use huddle::chat::Message;
use huddle::error::AppError;
use pretty_assertions::assert_eq;
use uuid::Uuid;

use common::database::TestDatabase;
use common::{chat_service, chat_service_with_flags};

#[tokio::test]
async fn test_direct_chat_created_then_found() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());

    let first = service.create_direct_chat(a, b).await.unwrap();
    assert!(first.created);
    assert!(!first.chat.is_group);
    assert_eq!(first.chat.users.len(), 2);
    assert_eq!(first.chat.latest_message, "");

    // Second call, reversed order: same chat, not created again.
    let second = service.create_direct_chat(b, a).await.unwrap();
    assert!(!second.created);
    assert_eq!(second.chat.id, first.chat.id);
}

#[tokio::test]
async fn test_direct_chat_rejects_same_user_twice() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let a = Uuid::new_v4();

    let err = service.create_direct_chat(a, a).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_group_chat_requires_a_second_participant() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let creator = Uuid::new_v4();

    let err = service
        .create_group_chat(creator, &[], "lonely")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    // A member list containing only the creator is just as empty.
    let err = service
        .create_group_chat(creator, &[creator], "lonely")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_group_chat_requires_a_name() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);

    let err = service
        .create_group_chat(Uuid::new_v4(), &[Uuid::new_v4()], "  ")
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

#[tokio::test]
async fn test_group_chat_with_one_member_includes_creator() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (creator, member) = (Uuid::new_v4(), Uuid::new_v4());

    let chat = service
        .create_group_chat(creator, &[member], "pair")
        .await
        .unwrap();
    assert!(chat.is_group);
    assert_eq!(chat.chat_name, "pair");
    assert_eq!(chat.users.len(), 2);
    assert!(chat.users.contains(&creator));
    assert!(chat.users.contains(&member));
}

#[tokio::test]
async fn test_add_members_is_a_set_union() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (creator, member) = (Uuid::new_v4(), Uuid::new_v4());
    let chat = service
        .create_group_chat(creator, &[member], "growing")
        .await
        .unwrap();

    let (u3, u4) = (Uuid::new_v4(), Uuid::new_v4());
    // Duplicates in the request and an existing member must be absorbed.
    let updated = service
        .add_members_to_group(chat.id, &[u3, u4, u4, member])
        .await
        .unwrap();

    let mut expected = vec![creator, member, u3, u4];
    expected.sort();
    assert_eq!(updated.users, expected);
}

#[tokio::test]
async fn test_add_members_to_missing_chat_is_not_found() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);

    let err = service
        .add_members_to_group(Uuid::new_v4(), &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_add_members_to_direct_chat_is_not_found() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let outcome = service
        .create_direct_chat(Uuid::new_v4(), Uuid::new_v4())
        .await
        .unwrap();

    // Membership mutation only matches group chats.
    let err = service
        .add_members_to_group(outcome.chat.id, &[Uuid::new_v4()])
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_remove_member_shrinks_the_set() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (creator, member) = (Uuid::new_v4(), Uuid::new_v4());
    let chat = service
        .create_group_chat(creator, &[member], "shrinking")
        .await
        .unwrap();

    let updated = service
        .remove_member_from_group(chat.id, member)
        .await
        .unwrap();
    assert_eq!(updated.users, vec![creator]);
}

#[tokio::test]
async fn test_remove_nonmember_is_a_noop() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (creator, member) = (Uuid::new_v4(), Uuid::new_v4());
    let chat = service
        .create_group_chat(creator, &[member], "steady")
        .await
        .unwrap();

    let updated = service
        .remove_member_from_group(chat.id, Uuid::new_v4())
        .await
        .unwrap();
    assert_eq!(updated.users, chat.users);
}

#[tokio::test]
async fn test_list_user_chats_sees_direct_and_group() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let user = Uuid::new_v4();

    service
        .create_direct_chat(user, Uuid::new_v4())
        .await
        .unwrap();
    service
        .create_group_chat(user, &[Uuid::new_v4()], "both kinds")
        .await
        .unwrap();

    let chats = service.list_user_chats(user).await.unwrap();
    assert_eq!(chats.len(), 2);

    // A bystander sees nothing, and that is a success by default.
    let none = service.list_user_chats(Uuid::new_v4()).await.unwrap();
    assert!(none.is_empty());
}

#[tokio::test]
async fn test_empty_chat_list_as_error_flag() {
    let db = TestDatabase::new().await;
    let service = chat_service_with_flags(&db, false, true);

    let err = service.list_user_chats(Uuid::new_v4()).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn test_messages_listed_in_timestamp_order() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let chat = service.create_direct_chat(a, b).await.unwrap().chat;

    // Out-of-order arrival: logical send times 3, 1, 2.
    for (content, timestamp) in [("third", 3i64), ("first", 1), ("second", 2)] {
        let mut message = Message::new(chat.id, a, content);
        message.timestamp = timestamp;
        service.store_message(&message).await.unwrap();
    }

    let messages = service.list_room_messages(chat.id).await.unwrap();
    let timestamps: Vec<i64> = messages.iter().map(|m| m.timestamp).collect();
    assert_eq!(timestamps, vec![1, 2, 3]);
    let contents: Vec<&str> = messages.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["first", "second", "third"]);
}

#[tokio::test]
async fn test_messages_scoped_to_their_room() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let user = Uuid::new_v4();
    let room_a = service
        .create_direct_chat(user, Uuid::new_v4())
        .await
        .unwrap()
        .chat;
    let room_b = service
        .create_direct_chat(user, Uuid::new_v4())
        .await
        .unwrap()
        .chat;

    service
        .store_message(&Message::new(room_a.id, user, "in a"))
        .await
        .unwrap();
    service
        .store_message(&Message::new(room_b.id, user, "in b"))
        .await
        .unwrap();

    let messages = service.list_room_messages(room_a.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "in a");
}

#[tokio::test]
async fn test_storing_a_message_updates_latest_message_cache() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let chat = service.create_direct_chat(a, b).await.unwrap().chat;

    let message = Message::new(chat.id, a, "hello there");
    service.store_message(&message).await.unwrap();

    let refreshed = service.create_direct_chat(a, b).await.unwrap().chat;
    assert_eq!(refreshed.latest_message, "hello there");
    assert_eq!(refreshed.latest_message_id, message.id.to_string());
}

#[tokio::test]
async fn test_undecodable_message_rows_are_skipped_by_default() {
    let db = TestDatabase::new().await;
    let service = chat_service(&db);
    let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
    let chat = service.create_direct_chat(a, b).await.unwrap().chat;

    service
        .store_message(&Message::new(chat.id, a, "good"))
        .await
        .unwrap();

    // Smuggle in a row whose sender id is not a UUID.
    sqlx::query(
        "INSERT INTO messages (id, room_id, user_id, content, content_type, timestamp)
         VALUES (?1, ?2, 'not-a-uuid', 'bad', 'text', 99)",
    )
    .bind(Uuid::new_v4().to_string())
    .bind(chat.id.to_string())
    .execute(db.pool())
    .await
    .unwrap();

    // Permissive policy: the bad row is dropped, the listing survives.
    let messages = service.list_room_messages(chat.id).await.unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0].content, "good");

    // Strict policy: the same row fails the whole listing.
    let strict = chat_service_with_flags(&db, true, false);
    let err = strict.list_room_messages(chat.id).await.unwrap_err();
    assert!(matches!(err, AppError::Storage(_)));
}
