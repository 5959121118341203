//! Contract violations surfaced by the service wrapper.

use std::sync::Arc;

use petstore_harness::error::{AbsenceOutcome, HarnessError};
use petstore_harness::prelude::*;

async fn setup() -> (MockPetStore, PetStoreService) {
    TracingConfig::for_tests().init();
    let store = MockPetStore::start().await.unwrap();
    let service = PetStoreService::new(Arc::new(
        store.api(TrafficLogger::new(TrafficLevel::Basic)),
    ));
    (store, service)
}

#[tokio::test]
async fn test_absent_pet_is_404() {
    let (_store, service) = setup().await;
    service.get_pet_by_id_expect_not_found(next_pet_id()).await;
}

#[tokio::test]
async fn test_absence_after_deletion() {
    let (store, service) = setup().await;
    let id = store.insert(generate_default_pet());

    service.delete_pet(id).await;

    service.get_pet_by_id_expect_not_found(id).await;
}

#[tokio::test]
async fn test_expect_not_found_on_existing_pet_is_violation() {
    let (store, service) = setup().await;
    let id = store.insert(generate_default_pet());

    let err = service
        .try_get_pet_by_id_expect_not_found(id)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        HarnessError::ExpectedAbsenceViolation {
            expected: 404,
            outcome: AbsenceOutcome::Succeeded { status: 200 },
            ..
        }
    ));
}

#[tokio::test]
async fn test_fetch_missing_pet_reports_code_and_body() {
    let (_store, service) = setup().await;

    let err = service.try_get_pet_by_id(424242).await.unwrap_err();

    match err {
        HarnessError::ContractViolation { code, body, .. } => {
            assert_eq!(code, 404);
            assert!(body.unwrap().contains("Pet not found"));
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
#[should_panic(expected = "API returned error while deleting pet: 404")]
async fn test_delete_missing_pet_fails_hard() {
    let (_store, service) = setup().await;
    service.delete_pet(424242).await;
}
