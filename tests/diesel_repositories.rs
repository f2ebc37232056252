//! Adapter-level tests for the Diesel repositories against real SQLite
//! databases, covering the behaviour the domain services rely on: constraint
//! violations mapped to distinct error variants, ownership-conditioned
//! writes, approved-only visibility and atomic thread retrieval.

use chrono::{Duration, Utc};
use tempfile::TempDir;
use uuid::Uuid;

use kerbside::domain::ports::{
    FavoriteRepository, FavoriteRepositoryError, ListingRepository, MessageRepository,
    UserRepository, UserRepositoryError,
};
use kerbside::domain::{
    Favorite, Listing, ListingFilters, ListingPatch, ListingSort, ListingStatus, Message, Role,
    SortDirection, SortKey, User,
};
use kerbside::outbound::persistence::bootstrap::run_migrations;
use kerbside::outbound::persistence::pool::{DbPool, PoolConfig};
use kerbside::outbound::persistence::{
    DieselFavoriteRepository, DieselListingRepository, DieselMessageRepository,
    DieselUserRepository,
};

async fn test_pool() -> (DbPool, TempDir) {
    let dir = tempfile::tempdir().expect("tempdir");
    let db_path = dir.path().join("repos.db");
    let pool =
        DbPool::new(PoolConfig::new(db_path.to_string_lossy()).with_max_size(2)).expect("pool");
    run_migrations(&pool).await.expect("migrations");
    (pool, dir)
}

fn user(first: &str, email: &str) -> User {
    User {
        id: Uuid::new_v4(),
        first_name: first.to_owned(),
        last_name: "Tester".to_owned(),
        email: email.to_owned(),
        phone: Some("555-0100".to_owned()),
        role: Role::Standard,
        created_at: Utc::now(),
    }
}

fn listing(owner_id: Uuid, status: ListingStatus, price: f64, age_minutes: i64) -> Listing {
    Listing {
        id: Uuid::new_v4(),
        make: "Toyota".to_owned(),
        model: "Corolla".to_owned(),
        year: 2019,
        price,
        mileage: Some(42_000),
        condition: Some("used".to_owned()),
        description: None,
        owner_id,
        status,
        created_at: Utc::now() - Duration::minutes(age_minutes),
    }
}

fn message(sender_id: Uuid, receiver_id: Uuid, listing_id: Option<Uuid>, body: &str) -> Message {
    Message {
        id: Uuid::new_v4(),
        sender_id,
        receiver_id,
        listing_id,
        body: body.to_owned(),
        read: false,
        created_at: Utc::now(),
    }
}

#[tokio::test]
async fn second_insert_with_same_email_reports_duplicate() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool);

    users
        .insert(&user("Ada", "ada@example.com"), "pw")
        .await
        .expect("first insert");
    let err = users
        .insert(&user("Grace", "ada@example.com"), "pw")
        .await
        .expect_err("unique email");
    assert_eq!(err, UserRepositoryError::DuplicateEmail);
}

#[tokio::test]
async fn credentials_require_both_email_and_secret() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool);

    let account = user("Ada", "ada@example.com");
    users.insert(&account, "pw").await.expect("insert");

    let found = users
        .find_by_credentials("ada@example.com", "pw")
        .await
        .expect("query");
    assert_eq!(found.as_ref().map(|u| u.id), Some(account.id));
    assert!(users
        .find_by_credentials("ada@example.com", "wrong")
        .await
        .expect("query")
        .is_none());
    assert!(users
        .find_by_credentials("nobody@example.com", "pw")
        .await
        .expect("query")
        .is_none());
}

#[tokio::test]
async fn search_returns_only_approved_listings_in_requested_order() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool);

    let owner = user("Seller", "seller@example.com");
    users.insert(&owner, "pw").await.expect("insert user");

    let cheap = listing(owner.id, ListingStatus::Approved, 8_000.0, 3);
    let dear = listing(owner.id, ListingStatus::Approved, 22_000.0, 2);
    let hidden = listing(owner.id, ListingStatus::Pending, 1.0, 1);
    for l in [&cheap, &dear, &hidden] {
        listings.insert(l).await.expect("insert listing");
    }

    let sort = ListingSort {
        key: SortKey::Price,
        direction: SortDirection::Asc,
    };
    let found = listings
        .search(&ListingFilters::default(), sort)
        .await
        .expect("search");
    let ids: Vec<Uuid> = found.iter().map(|l| l.id).collect();
    assert_eq!(ids, vec![cheap.id, dear.id]);

    let filtered = listings
        .search(
            &ListingFilters {
                price_min: Some(10_000.0),
                ..ListingFilters::default()
            },
            ListingSort::default(),
        )
        .await
        .expect("search");
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered[0].id, dear.id);

    let by_model = listings
        .search(
            &ListingFilters {
                model: Some("oroll".to_owned()),
                ..ListingFilters::default()
            },
            ListingSort::default(),
        )
        .await
        .expect("search");
    assert_eq!(by_model.len(), 2);
}

#[tokio::test]
async fn range_bounds_apply_conjunctively() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool);

    let owner = user("Seller", "seller@example.com");
    users.insert(&owner, "pw").await.expect("insert user");

    let low = listing(owner.id, ListingStatus::Approved, 10_000.0, 3);
    let mid = listing(owner.id, ListingStatus::Approved, 20_000.0, 2);
    let high = listing(owner.id, ListingStatus::Approved, 30_000.0, 1);
    for l in [&low, &mid, &high] {
        listings.insert(l).await.expect("insert listing");
    }

    // Both bounds together keep only the middle listing.
    let found = listings
        .search(
            &ListingFilters {
                price_min: Some(15_000.0),
                price_max: Some(25_000.0),
                ..ListingFilters::default()
            },
            ListingSort::default(),
        )
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, mid.id);

    // Bounds are inclusive on both ends.
    let found = listings
        .search(
            &ListingFilters {
                price_min: Some(20_000.0),
                price_max: Some(20_000.0),
                ..ListingFilters::default()
            },
            ListingSort::default(),
        )
        .await
        .expect("search");
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].id, mid.id);

    let by_year_max = listings
        .search(
            &ListingFilters {
                year_max: Some(2018),
                ..ListingFilters::default()
            },
            ListingSort::default(),
        )
        .await
        .expect("search");
    assert!(by_year_max.is_empty());

    let by_mileage = listings
        .search(
            &ListingFilters {
                mileage_min: Some(40_000),
                mileage_max: Some(45_000),
                ..ListingFilters::default()
            },
            ListingSort::default(),
        )
        .await
        .expect("search");
    assert_eq!(by_mileage.len(), 3);
}

#[tokio::test]
async fn ownership_predicate_guards_update_and_delete() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool);

    let owner = user("Seller", "seller@example.com");
    let stranger = user("Other", "other@example.com");
    users.insert(&owner, "pw").await.expect("insert owner");
    users.insert(&stranger, "pw").await.expect("insert stranger");

    let l = listing(owner.id, ListingStatus::Approved, 15_000.0, 1);
    listings.insert(&l).await.expect("insert listing");

    let patch = ListingPatch {
        price: Some(14_000.0),
        ..ListingPatch::default()
    };

    // Wrong owner matches nothing; the row is untouched.
    let affected = listings
        .update_fields(l.id, Some(stranger.id), &patch)
        .await
        .expect("update");
    assert_eq!(affected, 0);

    let affected = listings
        .update_fields(l.id, Some(owner.id), &patch)
        .await
        .expect("update");
    assert_eq!(affected, 1);
    let stored = listings
        .find_by_id(l.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored.price, 14_000.0);
    assert_eq!(stored.make, "Toyota");

    // An unconditioned update (the moderator path) matches regardless.
    let affected = listings
        .update_fields(l.id, None, &patch)
        .await
        .expect("update");
    assert_eq!(affected, 1);

    assert_eq!(
        listings
            .delete(l.id, Some(stranger.id))
            .await
            .expect("delete"),
        0
    );
    assert_eq!(
        listings.delete(l.id, Some(owner.id)).await.expect("delete"),
        1
    );
    assert!(listings.find_by_id(l.id).await.expect("find").is_none());
}

#[tokio::test]
async fn set_status_moves_listing_between_lifecycle_states() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool);

    let owner = user("Seller", "seller@example.com");
    users.insert(&owner, "pw").await.expect("insert user");
    let l = listing(owner.id, ListingStatus::Pending, 15_000.0, 1);
    listings.insert(&l).await.expect("insert listing");

    let affected = listings
        .set_status(l.id, ListingStatus::Approved)
        .await
        .expect("set status");
    assert_eq!(affected, 1);
    let stored = listings
        .find_by_id(l.id)
        .await
        .expect("find")
        .expect("present");
    assert_eq!(stored.status, ListingStatus::Approved);

    assert_eq!(
        listings
            .set_status(Uuid::new_v4(), ListingStatus::Rejected)
            .await
            .expect("set status"),
        0
    );
}

#[tokio::test]
async fn owner_view_carries_bookmark_counts_for_every_status() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool.clone());
    let favorites = DieselFavoriteRepository::new(pool);

    let owner = user("Seller", "seller@example.com");
    let fan = user("Fan", "fan@example.com");
    users.insert(&owner, "pw").await.expect("insert owner");
    users.insert(&fan, "pw").await.expect("insert fan");

    let newer = listing(owner.id, ListingStatus::Approved, 15_000.0, 1);
    let older = listing(owner.id, ListingStatus::Rejected, 9_000.0, 5);
    listings.insert(&newer).await.expect("insert");
    listings.insert(&older).await.expect("insert");
    favorites
        .insert(&Favorite::new(fan.id, newer.id))
        .await
        .expect("favorite");

    let mine = listings.list_by_owner(owner.id).await.expect("list");
    assert_eq!(mine.len(), 2);
    assert_eq!(mine[0].listing.id, newer.id);
    assert_eq!(mine[0].favorite_count, 1);
    assert_eq!(mine[1].listing.id, older.id);
    assert_eq!(mine[1].favorite_count, 0);
}

#[tokio::test]
async fn review_listing_join_exposes_owner_contact_and_status_filter() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool);

    let owner = user("Seller", "seller@example.com");
    users.insert(&owner, "pw").await.expect("insert user");
    let pending = listing(owner.id, ListingStatus::Pending, 15_000.0, 1);
    let approved = listing(owner.id, ListingStatus::Approved, 9_000.0, 2);
    listings.insert(&pending).await.expect("insert");
    listings.insert(&approved).await.expect("insert");

    let queue = listings
        .list_with_owner(Some(ListingStatus::Pending))
        .await
        .expect("list");
    assert_eq!(queue.len(), 1);
    assert_eq!(queue[0].listing.id, pending.id);
    assert_eq!(queue[0].owner_name, "Seller Tester");
    assert_eq!(queue[0].owner_email, "seller@example.com");
    assert_eq!(queue[0].owner_phone.as_deref(), Some("555-0100"));

    let all = listings.list_with_owner(None).await.expect("list");
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn favorite_constraints_surface_as_distinct_errors() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool.clone());
    let favorites = DieselFavoriteRepository::new(pool);

    let fan = user("Fan", "fan@example.com");
    let owner = user("Seller", "seller@example.com");
    users.insert(&fan, "pw").await.expect("insert fan");
    users.insert(&owner, "pw").await.expect("insert owner");
    let l = listing(owner.id, ListingStatus::Approved, 15_000.0, 1);
    listings.insert(&l).await.expect("insert listing");

    favorites
        .insert(&Favorite::new(fan.id, l.id))
        .await
        .expect("first favorite");
    let err = favorites
        .insert(&Favorite::new(fan.id, l.id))
        .await
        .expect_err("pair is unique");
    assert_eq!(err, FavoriteRepositoryError::DuplicatePair);

    let err = favorites
        .insert(&Favorite::new(fan.id, Uuid::new_v4()))
        .await
        .expect_err("listing must exist");
    assert_eq!(err, FavoriteRepositoryError::InvalidReference);

    // Removal is idempotent for present and absent pairs alike.
    favorites.remove(fan.id, l.id).await.expect("remove");
    favorites.remove(fan.id, l.id).await.expect("remove again");
    assert!(favorites
        .list_approved(fan.id)
        .await
        .expect("list")
        .is_empty());
}

#[tokio::test]
async fn favorites_view_hides_listings_outside_approved_status() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool.clone());
    let favorites = DieselFavoriteRepository::new(pool);

    let fan = user("Fan", "fan@example.com");
    let owner = user("Seller", "seller@example.com");
    users.insert(&fan, "pw").await.expect("insert fan");
    users.insert(&owner, "pw").await.expect("insert owner");

    let visible = listing(owner.id, ListingStatus::Approved, 15_000.0, 1);
    let pending = listing(owner.id, ListingStatus::Pending, 9_000.0, 2);
    listings.insert(&visible).await.expect("insert");
    listings.insert(&pending).await.expect("insert");
    favorites
        .insert(&Favorite::new(fan.id, visible.id))
        .await
        .expect("favorite");
    favorites
        .insert(&Favorite::new(fan.id, pending.id))
        .await
        .expect("favorite");

    let bookmarked = favorites.list_approved(fan.id).await.expect("list");
    assert_eq!(bookmarked.len(), 1);
    assert_eq!(bookmarked[0].listing.id, visible.id);
}

#[tokio::test]
async fn deleting_a_listing_cascades_favorites_and_detaches_messages() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let listings = DieselListingRepository::new(pool.clone());
    let favorites = DieselFavoriteRepository::new(pool.clone());
    let messages = DieselMessageRepository::new(pool);

    let fan = user("Fan", "fan@example.com");
    let owner = user("Seller", "seller@example.com");
    users.insert(&fan, "pw").await.expect("insert fan");
    users.insert(&owner, "pw").await.expect("insert owner");
    let l = listing(owner.id, ListingStatus::Approved, 15_000.0, 1);
    listings.insert(&l).await.expect("insert listing");
    favorites
        .insert(&Favorite::new(fan.id, l.id))
        .await
        .expect("favorite");
    messages
        .insert(&message(fan.id, owner.id, Some(l.id), "still available?"))
        .await
        .expect("message");

    assert_eq!(listings.delete(l.id, None).await.expect("delete"), 1);

    assert!(favorites
        .list_approved(fan.id)
        .await
        .expect("list")
        .is_empty());
    let log = messages.list_involving(fan.id).await.expect("list");
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].listing_id, None);
}

#[tokio::test]
async fn thread_marks_inbound_messages_read_and_names_participants() {
    let (pool, _dir) = test_pool().await;
    let users = DieselUserRepository::new(pool.clone());
    let messages = DieselMessageRepository::new(pool);

    let buyer = user("Buyer", "buyer@example.com");
    let seller = user("Seller", "seller@example.com");
    let bystander = user("Bystander", "bystander@example.com");
    for account in [&buyer, &seller, &bystander] {
        users.insert(account, "pw").await.expect("insert user");
    }

    messages
        .insert(&message(buyer.id, seller.id, None, "is it available?"))
        .await
        .expect("insert");
    messages
        .insert(&message(seller.id, buyer.id, None, "it is"))
        .await
        .expect("insert");
    messages
        .insert(&message(bystander.id, seller.id, None, "unrelated"))
        .await
        .expect("insert");

    let transcript = messages.thread(seller.id, buyer.id).await.expect("thread");
    assert_eq!(transcript.len(), 2);
    assert_eq!(transcript[0].message.body, "is it available?");
    assert_eq!(transcript[0].sender_name, "Buyer Tester");
    assert_eq!(transcript[0].receiver_name, "Seller Tester");
    assert!(transcript[0].message.read);
    // The seller's own reply is unread until the buyer opens the thread.
    assert!(!transcript[1].message.read);

    // The unrelated conversation was not marked.
    let log = messages.list_involving(bystander.id).await.expect("list");
    assert!(!log[0].read);

    let log = messages.list_involving(seller.id).await.expect("list");
    assert_eq!(log.len(), 3);
}
