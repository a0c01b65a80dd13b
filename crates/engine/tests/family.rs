use api_types::{
    family::{FamilyMemberRequestNew, FamilyNew},
    user::{UserProfileNew, UserProfileUpdate},
};
use sea_orm::{Database, DatabaseConnection};

use engine::{Engine, EngineError, repository::UserRepository};
use migration::MigratorTrait;

async fn engine_with_db() -> (Engine, DatabaseConnection) {
    let db = Database::connect("sqlite::memory:").await.unwrap();
    migration::Migrator::up(&db, None).await.unwrap();
    let engine = Engine::builder()
        .database(db.clone())
        .build()
        .await
        .unwrap();
    (engine, db)
}

fn new_profile(name: &str) -> UserProfileNew {
    UserProfileNew {
        display_name: name.to_string(),
        email: Some(format!(" {name}@Example.com ")),
    }
}

fn family_new(name: &str) -> FamilyNew {
    FamilyNew {
        family_name: name.to_string(),
    }
}

#[tokio::test]
async fn register_then_lookup_by_identity() {
    let (engine, _db) = engine_with_db().await;

    let profile = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();
    assert_eq!(profile.email.as_deref(), Some("alice@example.com"));
    assert_eq!(profile.family_id, None);

    let found = engine
        .users()
        .get_by_identity("sub-alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(found, profile);
    assert!(engine.users().get_by_identity("nobody").await.unwrap().is_none());
}

#[tokio::test]
async fn duplicate_registration_is_rejected() {
    let (engine, _db) = engine_with_db().await;
    engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();

    let err = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn update_profile_validates_input() {
    let (engine, _db) = engine_with_db().await;
    let profile = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();

    let updated = engine
        .users()
        .update(
            profile.user_id,
            &UserProfileUpdate {
                display_name: "  Alice R. ".to_string(),
                email: None,
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.display_name, "Alice R.");
    assert_eq!(updated.email, None);

    let err = engine
        .users()
        .update(
            profile.user_id,
            &UserProfileUpdate {
                display_name: "   ".to_string(),
                email: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn creating_family_assigns_founder() {
    let (engine, _db) = engine_with_db().await;
    let alice = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();

    let family = engine
        .users()
        .create_family(alice.user_id, &family_new("Rossi"))
        .await
        .unwrap();
    let alice = engine
        .users()
        .get_by_id(alice.user_id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(alice.family_id, Some(family.family_id));

    let members = engine
        .users()
        .get_family_members(family.family_id)
        .await
        .unwrap();
    assert_eq!(members, vec![alice.clone()]);

    let err = engine
        .users()
        .create_family(alice.user_id, &family_new("Bianchi"))
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::ExistingKey(_)));
}

#[tokio::test]
async fn member_requests_are_created_listed_and_withdrawn() {
    let (engine, db) = engine_with_db().await;
    let alice = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();
    let bob = engine
        .users()
        .register("sub-bob", &new_profile("bob"))
        .await
        .unwrap();
    let family = engine
        .users()
        .create_family(alice.user_id, &family_new("Rossi"))
        .await
        .unwrap();
    UserRepository::new(db)
        .set_family(bob.user_id, Some(family.family_id))
        .await
        .unwrap();

    let request = engine
        .family_requests()
        .create(
            alice.user_id,
            &FamilyMemberRequestNew {
                member_email: " Carol@Example.com".to_string(),
                message: Some("join us".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(request.family_id, family.family_id);
    assert_eq!(request.member_email, "carol@example.com");

    let for_bob = engine
        .family_requests()
        .list_for(bob.user_id, Some(family.family_id))
        .await
        .unwrap();
    assert!(for_bob.sent.is_empty());
    assert_eq!(for_bob.family, vec![request.clone()]);

    let err = engine
        .family_requests()
        .withdraw(bob.user_id, request.request_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .family_requests()
        .withdraw(alice.user_id, request.request_id)
        .await
        .unwrap();
    engine
        .family_requests()
        .withdraw(alice.user_id, request.request_id)
        .await
        .unwrap();
    assert!(
        engine
            .family_requests()
            .get_by_id(request.request_id)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn member_request_needs_family_and_valid_email() {
    let (engine, _db) = engine_with_db().await;
    let alice = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();

    let invite = FamilyMemberRequestNew {
        member_email: "carol@example.com".to_string(),
        message: None,
    };
    let err = engine
        .family_requests()
        .create(alice.user_id, &invite)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Forbidden(_)));

    engine
        .users()
        .create_family(alice.user_id, &family_new("Rossi"))
        .await
        .unwrap();
    let err = engine
        .family_requests()
        .create(
            alice.user_id,
            &FamilyMemberRequestNew {
                member_email: "   ".to_string(),
                message: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::InvalidName(_)));
}

#[tokio::test]
async fn family_members_can_view_each_other() {
    let (engine, db) = engine_with_db().await;
    let alice = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();
    let bob = engine
        .users()
        .register("sub-bob", &new_profile("bob"))
        .await
        .unwrap();
    let carol = engine
        .users()
        .register("sub-carol", &new_profile("carol"))
        .await
        .unwrap();
    let family = engine
        .users()
        .create_family(alice.user_id, &family_new("Rossi"))
        .await
        .unwrap();
    let bob = UserRepository::new(db)
        .set_family(bob.user_id, Some(family.family_id))
        .await
        .unwrap();
    let bob = engine.users().get_by_id(bob.id).await.unwrap().unwrap();

    assert!(engine.can_view(&bob, Some(alice.user_id)).await.unwrap());
    assert!(engine.can_view(&carol, Some(carol.user_id)).await.unwrap());
    assert!(!engine.can_view(&carol, Some(alice.user_id)).await.unwrap());
    assert!(!engine.can_view(&bob, None).await.unwrap());

    let owner = Some(alice.user_id);
    assert!(engine.require_modifiable(&alice, owner, "expense").await.is_ok());
    assert!(matches!(
        engine.require_modifiable(&bob, owner, "expense").await,
        Err(EngineError::Forbidden(_))
    ));
    assert!(matches!(
        engine.require_modifiable(&carol, owner, "expense").await,
        Err(EngineError::KeyNotFound(_))
    ));
}

#[tokio::test]
async fn members_join_existing_families_only() {
    let (engine, db) = engine_with_db().await;
    let alice = engine
        .users()
        .register("sub-alice", &new_profile("alice"))
        .await
        .unwrap();
    let users = UserRepository::new(db);

    let err = users.set_family(alice.user_id, Some(999)).await.unwrap_err();
    assert!(matches!(err, EngineError::KeyNotFound(_)));

    let family = engine
        .users()
        .create_family(alice.user_id, &family_new("Rossi"))
        .await
        .unwrap();
    let left = users.set_family(alice.user_id, None).await.unwrap();
    assert_eq!(left.family_id, None);
    let joined = users
        .set_family(alice.user_id, Some(family.family_id))
        .await
        .unwrap();
    assert_eq!(joined.family_id, Some(family.family_id));
}
