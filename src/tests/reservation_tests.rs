use crate::core::errors::ReservationError;
use crate::core::models::reservation::{OccupiedSlot, Reservation};
use crate::core::services::ReservationService;
use crate::infrastructure::clock::FixedClock;
use crate::infrastructure::storage::Storage;
use crate::infrastructure::storage::in_memory::InMemoryStorage;
use crate::tests::{
    FailingLogging, PASSWORD, StaleSlotStorage, create_service_with_storage, create_test_service, day,
    register_user, test_auth_settings, today,
};
use chrono::Utc;
use std::sync::Arc;

#[tokio::test]
async fn test_weekend_admits_two_chairs() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;

    let first = service.create_reservation(&user.id, "2024-06-08", 1).await.unwrap();
    assert_eq!(first.date, day(2024, 6, 8));
    assert_eq!(first.chair_id, 1);
    assert_eq!(first.user_id, user.id);

    let again = service.create_reservation(&user.id, "2024-06-08", 1).await;
    assert!(matches!(again, Err(ReservationError::Conflict { chair_id: 1, .. })));

    let second = service.create_reservation(&user.id, "2024-06-08", 2).await.unwrap();
    assert_eq!(second.chair_id, 2);

    let third = service.create_reservation(&user.id, "2024-06-08", 3).await;
    assert!(matches!(third, Err(ReservationError::InvalidInput(ref field, _)) if field == "chairId"));
}

#[tokio::test]
async fn test_weekday_offers_only_chair_one() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;

    service.create_reservation(&user.id, "2024-06-10", 1).await.unwrap();

    let other = register_user(&service, "bob@example.com").await;
    // Chair 2 does not exist on a Monday, even on a fresh date.
    let result = service.create_reservation(&other.id, "2024-06-11", 2).await;
    assert!(matches!(result, Err(ReservationError::InvalidInput(..))));
    let result = service.create_reservation(&other.id, "2024-06-10", 2).await;
    assert!(matches!(result, Err(ReservationError::InvalidInput(..))));
}

#[tokio::test]
async fn test_past_date_rejected() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;

    let result = service.create_reservation(&user.id, "2024-06-02", 1).await;
    assert!(matches!(result, Err(ReservationError::InvalidInput(ref field, _)) if field == "date"));

    let booked = service
        .create_reservation(&user.id, &today().to_string(), 1)
        .await
        .unwrap();
    assert_eq!(booked.date, today());
}

#[tokio::test]
async fn test_date_formats() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;

    let reservation = service
        .create_reservation(&user.id, "2024-06-08T23:30:00+09:00", 1)
        .await
        .unwrap();
    assert_eq!(reservation.date, day(2024, 6, 8));

    let reservation = service
        .create_reservation(&user.id, "2024-06-09T08:00:00.000Z", 2)
        .await
        .unwrap();
    assert_eq!(reservation.date, day(2024, 6, 9));

    for raw in ["", "   ", "tomorrow", "2024-13-01", "2024-02-30"] {
        let result = service.create_reservation(&user.id, raw, 1).await;
        assert!(
            matches!(result, Err(ReservationError::InvalidInput(..))),
            "{raw:?} should be rejected"
        );
    }
}

#[tokio::test]
async fn test_out_of_range_chair_ids_rejected() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;

    for chair_id in [0, -1, 256, i64::MAX] {
        let result = service.create_reservation(&user.id, "2024-06-08", chair_id).await;
        assert!(matches!(result, Err(ReservationError::InvalidInput(..))), "{chair_id}");
    }
}

#[tokio::test]
async fn test_validation_runs_before_identity_lookup() {
    let service = create_test_service();

    let result = service.create_reservation("ghost", "2024-06-02", 1).await;
    assert!(matches!(result, Err(ReservationError::InvalidInput(..))));

    let result = service.create_reservation("ghost", "2024-06-08", 1).await;
    assert!(matches!(result, Err(ReservationError::Unauthenticated(_))));
}

#[tokio::test]
async fn test_store_refuses_slot_missed_by_stale_lookup() {
    let storage = StaleSlotStorage::default();
    let service = create_service_with_storage(Arc::new(storage.clone()));
    let alice = register_user(&service, "alice@example.com").await;
    let bob = register_user(&service, "bob@example.com").await;

    let won = service.create_reservation(&alice.id, "2024-06-08", 1).await.unwrap();
    let lost = service.create_reservation(&bob.id, "2024-06-08", 1).await;
    assert!(matches!(
        lost,
        Err(ReservationError::Conflict { date, chair_id: 1 }) if date == day(2024, 6, 8)
    ));

    let stored = storage.inner.get_all_reservations().await.unwrap();
    assert_eq!(stored, vec![won]);
    assert!(service.get_user_reservations(&bob.id).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_concurrent_creates_admit_exactly_one() {
    // Both callers see a free slot, so the store alone picks the winner.
    let storage = StaleSlotStorage::default();
    let service = create_service_with_storage(Arc::new(storage.clone()));
    let alice = register_user(&service, "alice@example.com").await;
    let bob = register_user(&service, "bob@example.com").await;

    let (a, b) = tokio::join!(
        service.create_reservation(&alice.id, "2024-06-08", 1),
        service.create_reservation(&bob.id, "2024-06-08", 1),
    );

    let results = [a, b];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert_eq!(
        results
            .iter()
            .filter(|r| matches!(r, Err(ReservationError::Conflict { .. })))
            .count(),
        1
    );
    assert_eq!(storage.inner.get_all_reservations().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_creates_across_threads() {
    let service = Arc::new(create_test_service());
    let mut users = Vec::new();
    for i in 0..8 {
        users.push(register_user(&service, &format!("user{i}@example.com")).await);
    }

    let handles: Vec<_> = users
        .into_iter()
        .map(|user| {
            let service = Arc::clone(&service);
            tokio::spawn(async move { service.create_reservation(&user.id, "2024-06-09", 2).await })
        })
        .collect();

    let results = futures::future::join_all(handles).await;
    let mut admitted = 0;
    let mut conflicts = 0;
    for result in results {
        match result.unwrap() {
            Ok(_) => admitted += 1,
            Err(ReservationError::Conflict { .. }) => conflicts += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(admitted, 1);
    assert_eq!(conflicts, 7);
    assert_eq!(service.get_occupied_slots().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_storage_rejects_duplicate_slot() {
    // The store enforces uniqueness even when no caller checked first.
    let storage = InMemoryStorage::new();
    let make = |id: &str, user: &str| Reservation {
        id: id.to_string(),
        date: day(2024, 6, 8),
        chair_id: 1,
        user_id: user.to_string(),
        created_at: Utc::now(),
    };

    storage.insert_reservation(make("r1", "u1")).await.unwrap();
    let result = storage.insert_reservation(make("r2", "u2")).await;
    assert!(matches!(result, Err(ReservationError::Conflict { .. })));
    let holder = storage.find_reservation_by_slot(day(2024, 6, 8), 1).await.unwrap().unwrap();
    assert_eq!(holder.id, "r1");
    assert_eq!(storage.get_all_reservations().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_cancel_reservation() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;
    let reservation = service.create_reservation(&user.id, "2024-06-10", 1).await.unwrap();

    service.cancel_reservation(&user.id, &reservation.id).await.unwrap();
    assert!(service.get_user_reservations(&user.id).await.unwrap().is_empty());

    let again = service.cancel_reservation(&user.id, &reservation.id).await;
    assert!(matches!(again, Err(ReservationError::NotFound(_))));

    // The slot is free again.
    service.create_reservation(&user.id, "2024-06-10", 1).await.unwrap();
}

#[tokio::test]
async fn test_cancel_by_non_owner_looks_like_missing() {
    let service = create_test_service();
    let alice = register_user(&service, "alice@example.com").await;
    let mallory = register_user(&service, "mallory@example.com").await;
    let reservation = service.create_reservation(&alice.id, "2024-06-10", 1).await.unwrap();

    let foreign = service.cancel_reservation(&mallory.id, &reservation.id).await;
    let missing = service.cancel_reservation(&mallory.id, "no-such-id").await;
    assert!(matches!(foreign, Err(ReservationError::NotFound(_))));
    assert!(matches!(missing, Err(ReservationError::NotFound(_))));

    let remaining = service.get_user_reservations(&alice.id).await.unwrap();
    assert_eq!(remaining, vec![reservation]);
}

#[tokio::test]
async fn test_listings() {
    let service = create_test_service();
    let alice = register_user(&service, "alice@example.com").await;
    let bob = register_user(&service, "bob@example.com").await;

    service.create_reservation(&alice.id, "2024-06-04", 1).await.unwrap();
    service.create_reservation(&alice.id, "2024-06-09", 2).await.unwrap();
    service.create_reservation(&bob.id, "2024-06-09", 1).await.unwrap();
    service.create_reservation(&alice.id, "2024-06-06", 1).await.unwrap();

    let mine: Vec<_> = service
        .get_user_reservations(&alice.id)
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.date)
        .collect();
    assert_eq!(mine, vec![day(2024, 6, 9), day(2024, 6, 6), day(2024, 6, 4)]);

    let occupied = service.get_occupied_slots().await.unwrap();
    assert_eq!(
        occupied,
        vec![
            OccupiedSlot { date: day(2024, 6, 4), chair_id: 1 },
            OccupiedSlot { date: day(2024, 6, 6), chair_id: 1 },
            OccupiedSlot { date: day(2024, 6, 9), chair_id: 1 },
            OccupiedSlot { date: day(2024, 6, 9), chair_id: 2 },
        ]
    );
}

#[tokio::test]
async fn test_actions_are_audited() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;
    let reservation = service.create_reservation(&user.id, "2024-06-08", 1).await.unwrap();
    service.cancel_reservation(&user.id, &reservation.id).await.unwrap();

    let actions: Vec<_> = service
        .get_app_logs()
        .await
        .unwrap()
        .into_iter()
        .map(|log| log.action)
        .collect();
    assert_eq!(actions, vec!["USER_REGISTERED", "RESERVATION_CREATED", "RESERVATION_CANCELLED"]);

    let logs = service.get_app_logs().await.unwrap();
    assert_eq!(logs[1].user_id.as_deref(), Some(user.id.as_str()));
    assert_eq!(logs[1].details["reservation_id"], reservation.id);
}

#[tokio::test]
async fn test_audit_entries_use_service_clock() {
    let service = create_test_service();
    let user = register_user(&service, "alice@example.com").await;
    let reservation = service.create_reservation(&user.id, "2024-06-08", 1).await.unwrap();

    let logs = service.get_app_logs().await.unwrap();
    assert!(logs.iter().all(|log| log.timestamp == reservation.created_at));
    assert_eq!(reservation.created_at.date_naive(), today());
}

#[tokio::test]
async fn test_committed_reservation_survives_audit_failure() {
    let service = ReservationService::new(
        InMemoryStorage::new(),
        FailingLogging,
        FixedClock::at_midday(today()),
        test_auth_settings(),
    );
    let user = service.register("alice@example.com", PASSWORD).await.unwrap();

    let reservation = service.create_reservation(&user.id, "2024-06-10", 1).await.unwrap();
    assert_eq!(service.get_user_reservations(&user.id).await.unwrap(), vec![reservation.clone()]);

    service.cancel_reservation(&user.id, &reservation.id).await.unwrap();
    assert!(service.get_occupied_slots().await.unwrap().is_empty());
}
