use squarefeet::domain::listing::{ListingType, NewListing};
use squarefeet::domain::types::{ImageUrl, ListingId, UserEmail, Username};
use squarefeet::domain::user::{NewUser, UpdateUser};
use squarefeet::repository::errors::RepositoryError;
use squarefeet::repository::{
    DieselRepository, ListingQuery, ListingReader, ListingWriter, UserReader, UserWriter,
};

mod common;

#[test]
fn test_user_repository_crud() {
    let test_db = common::TestDb::new("test_user_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());

    let new_user = NewUser::try_new("Alice@Example.com", "Alice").unwrap();
    let alice = repo.create_or_get_user(&new_user).unwrap();
    assert_eq!(alice.email, "alice@example.com");

    // Same email again returns the stored record instead of a duplicate.
    let again = repo
        .create_or_get_user(&NewUser::try_new("alice@example.com", "Other").unwrap())
        .unwrap();
    assert_eq!(again.id, alice.id);
    assert_eq!(again.username, "Alice");

    let by_email = repo
        .get_user_by_email(&UserEmail::new("alice@example.com").unwrap())
        .unwrap()
        .unwrap();
    assert_eq!(by_email.id, alice.id);

    let updated = repo
        .update_user(
            alice.id,
            &UpdateUser {
                username: Some(Username::new("Alicia").unwrap()),
                avatar: Some(ImageUrl::new("https://cdn.example.com/alicia.png").unwrap()),
            },
        )
        .unwrap();
    assert_eq!(updated.username, "Alicia");
    assert_eq!(
        updated.avatar.as_deref(),
        Some("https://cdn.example.com/alicia.png")
    );

    let unchanged = repo.update_user(alice.id, &UpdateUser::default()).unwrap();
    assert_eq!(unchanged, updated);

    repo.delete_user(alice.id).unwrap();
    assert!(repo.get_user_by_id(alice.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_user(alice.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_listing_repository_crud() {
    let test_db = common::TestDb::new("test_listing_repository_crud.db");
    let repo = DieselRepository::new(test_db.pool());
    let owner = repo
        .create_or_get_user(&NewUser::try_new("owner@example.com", "Owner").unwrap())
        .unwrap();

    let mut draft = common::draft("Spacious family house");
    draft.listing_type = ListingType::Sale;
    draft.image_urls = vec![
        "https://cdn.example.com/front.png".to_string(),
        "https://cdn.example.com/garden.png".to_string(),
    ];
    let created = repo
        .create_listing(&NewListing::new(owner.id, common::details(draft)))
        .unwrap();
    assert_eq!(created.user_ref, owner.id);
    assert_eq!(created.listing_type, ListingType::Sale);
    assert_eq!(created.image_urls.len(), 2);
    assert_eq!(created.created_at, created.updated_at);

    let fetched = repo.get_listing_by_id(created.id).unwrap().unwrap();
    assert_eq!(fetched, created);

    let mut changes = common::draft("Spacious family house, renovated");
    changes.offer = true;
    changes.regular_price = 2000;
    changes.discount_price = 1800;
    let updated = repo
        .update_listing(created.id, &common::details(changes))
        .unwrap();
    assert_eq!(updated.name, "Spacious family house, renovated");
    assert!(updated.offer);
    assert_eq!(updated.discount_price, 1800);
    assert_eq!(updated.created_at, created.created_at);

    repo.delete_listing(created.id).unwrap();
    assert!(repo.get_listing_by_id(created.id).unwrap().is_none());
    assert!(matches!(
        repo.delete_listing(created.id),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        repo.update_listing(
            ListingId::new(created.id.get() + 100).unwrap(),
            &common::details(common::draft("Nobody owns this one"))
        ),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn test_deleting_user_removes_their_listings() {
    let test_db = common::TestDb::new("test_cascade_delete.db");
    let repo = DieselRepository::new(test_db.pool());
    let alice = repo
        .create_or_get_user(&NewUser::try_new("alice@example.com", "Alice").unwrap())
        .unwrap();
    let bob = repo
        .create_or_get_user(&NewUser::try_new("bob@example.com", "Bob").unwrap())
        .unwrap();

    for (owner, name) in [
        (alice.id, "Alice's first apartment"),
        (alice.id, "Alice's second apartment"),
        (bob.id, "Bob's only apartment"),
    ] {
        repo.create_listing(&NewListing::new(owner, common::details(common::draft(name))))
            .unwrap();
    }

    repo.delete_user(alice.id).unwrap();

    let remaining = repo.search_listings(&ListingQuery::new()).unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].user_ref, bob.id);
    assert!(
        repo.search_listings(&ListingQuery::new().owner(alice.id))
            .unwrap()
            .is_empty()
    );
}
