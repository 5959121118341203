//! End-to-end flows built from the service, the assertions and the fixtures.
//!
//! A pet without an id gets one from [`next_pet_id`] before it is submitted,
//! since every later step addresses it by id.

use std::fmt;
use std::future::Future;
use std::time::{Duration, Instant};

use tracing::info;

use crate::assertions::{PetAssert, assert_that};
use crate::error::HarnessError;
use crate::fixtures::next_pet_id;
use crate::model::Pet;
use crate::service::PetStoreService;

fn with_id(pet: Pet) -> (Pet, i64) {
    match pet.id {
        Some(id) => (pet, id),
        None => {
            let id = next_pet_id();
            (pet.with_id(id), id)
        }
    }
}

/// Add -> fetch -> verify. Returns the fetched pet.
pub async fn create_and_verify(service: &PetStoreService, pet: Pet) -> Pet {
    let (pet, id) = with_id(pet);

    service.add_pet(&pet).await;
    let fetched = service.get_pet_by_id(id).await;

    let _ = assert_that(&fetched).to_match(&pet);
    fetched
}

/// Add -> fetch -> verify -> delete -> confirm the pet is gone.
pub async fn full_lifecycle(service: &PetStoreService, pet: Pet) {
    let (pet, id) = with_id(pet);
    create_and_verify(service, pet).await;

    service.delete_pet(id).await;
    service.get_pet_by_id_expect_not_found(id).await;
}

/// A completed step of [`run_lifecycle`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    pub name: &'static str,
    pub elapsed: Duration,
}

#[derive(Debug, Clone)]
pub struct LifecycleReport {
    /// The pet as submitted, id included.
    pub pet: Pet,
    pub steps: Vec<StepRecord>,
}

impl LifecycleReport {
    pub fn total(&self) -> Duration {
        self.steps.iter().map(|s| s.elapsed).sum()
    }
}

/// The step that stopped [`run_lifecycle`], and what ran before it.
#[derive(Debug)]
pub struct ScenarioFailure {
    pub step: &'static str,
    pub completed: Vec<StepRecord>,
    pub error: HarnessError,
}

impl fmt::Display for ScenarioFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "step '{}' failed: {}", self.step, self.error)
    }
}

impl std::error::Error for ScenarioFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

#[derive(Default)]
struct Recorder {
    steps: Vec<StepRecord>,
}

impl Recorder {
    async fn step<T, F>(&mut self, name: &'static str, fut: F) -> Result<T, ScenarioFailure>
    where
        F: Future<Output = Result<T, HarnessError>>,
    {
        let started = Instant::now();
        match fut.await {
            Ok(value) => {
                self.steps.push(StepRecord {
                    name,
                    elapsed: started.elapsed(),
                });
                Ok(value)
            }
            Err(error) => Err(ScenarioFailure {
                step: name,
                completed: std::mem::take(&mut self.steps),
                error,
            }),
        }
    }
}

/// The full lifecycle without panicking.
///
/// Field verification collects every diverging field rather than stopping at
/// the first, so an operator sees the whole picture in one run.
pub async fn run_lifecycle(
    service: &PetStoreService,
    pet: Pet,
) -> Result<LifecycleReport, ScenarioFailure> {
    let (pet, id) = with_id(pet);
    let mut recorder = Recorder::default();

    recorder.step("add pet", service.try_add_pet(&pet)).await?;
    let fetched = recorder
        .step("fetch pet", service.try_get_pet_by_id(id))
        .await?;
    recorder
        .step("verify fields", async {
            PetAssert::soft(&fetched).to_match(&pet).into_result()
        })
        .await?;
    recorder.step("delete pet", service.try_delete_pet(id)).await?;
    recorder
        .step(
            "confirm absence",
            service.try_get_pet_by_id_expect_not_found(id),
        )
        .await?;

    info!(pet_id = id, steps = recorder.steps.len(), "lifecycle passed");
    Ok(LifecycleReport {
        pet,
        steps: recorder.steps,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::model::PetStatus;
    use crate::testing::{RecordedCall, ScriptedPetApi};
    use crate::transport::{ApiError, ApiResponse};

    fn doggie() -> Pet {
        Pet::new("doggie")
            .with_id(12345)
            .with_status(PetStatus::Available)
            .with_photo_urls(["http://example.com/photo1"])
    }

    fn ok() -> Result<ApiResponse<()>, ApiError> {
        Ok(ApiResponse::new(200, ()))
    }

    #[tokio::test]
    async fn test_run_lifecycle_records_every_step() {
        let api = Arc::new(
            ScriptedPetApi::new()
                .on_add(ok())
                .on_get_ok(doggie())
                .on_delete(ok())
                .on_get_status(404, "Pet not found"),
        );
        let service = PetStoreService::new(api.clone());

        let report = run_lifecycle(&service, doggie()).await.unwrap();

        let names: Vec<_> = report.steps.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            vec![
                "add pet",
                "fetch pet",
                "verify fields",
                "delete pet",
                "confirm absence"
            ]
        );
        assert_eq!(
            api.calls(),
            vec![
                RecordedCall::AddPet(doggie()),
                RecordedCall::GetPetById(12345),
                RecordedCall::DeletePet(12345),
                RecordedCall::GetPetById(12345),
            ]
        );
        assert!(report.total() >= report.steps[0].elapsed);
    }

    #[tokio::test]
    async fn test_run_lifecycle_stops_at_failing_step() {
        let api = Arc::new(
            ScriptedPetApi::new()
                .on_add(ok())
                .on_get_ok(doggie().with_name("kitty").with_status(PetStatus::Sold)),
        );
        let service = PetStoreService::new(api.clone());

        let failure = run_lifecycle(&service, doggie()).await.unwrap_err();

        assert_eq!(failure.step, "verify fields");
        assert_eq!(failure.completed.len(), 2);
        match &failure.error {
            HarnessError::FieldMismatches(m) => assert_eq!(m.len(), 2),
            other => panic!("unexpected error: {:?}", other),
        }
        assert_eq!(api.calls().len(), 2);
        assert!(failure.to_string().starts_with("step 'verify fields' failed:"));
    }

    #[tokio::test]
    async fn test_pet_without_id_gets_one() {
        let api = Arc::new(ScriptedPetApi::new().on_add(ok()));
        let service = PetStoreService::new(api.clone());

        let failure = run_lifecycle(&service, Pet::new("anon")).await.unwrap_err();

        assert_eq!(failure.step, "fetch pet");
        match api.calls().as_slice() {
            [RecordedCall::AddPet(sent), RecordedCall::GetPetById(id)] => {
                assert_eq!(sent.id, Some(*id));
            }
            calls => panic!("unexpected calls: {:?}", calls),
        }
    }

    #[tokio::test]
    #[should_panic(expected = "expected pet name")]
    async fn test_create_and_verify_panics_on_mismatch() {
        let api = Arc::new(
            ScriptedPetApi::new()
                .on_add(ok())
                .on_get_ok(doggie().with_name("kitty")),
        );
        let service = PetStoreService::new(api);
        create_and_verify(&service, doggie()).await;
    }
}
