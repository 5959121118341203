//! Business-level operations over the pet API.
//!
//! Each operation performs exactly one call and checks its contract inline.
//! The plain methods panic on a violation, which fails the calling test on the
//! spot; the `try_` methods run the same checks and return the violation
//! instead.

use std::sync::Arc;

use tracing::{Instrument, info, info_span, warn};

use crate::config::HarnessConfig;
use crate::error::{AbsenceOutcome, FieldMismatch, HarnessError, Result};
use crate::model::Pet;
use crate::transport::{ApiError, HttpPetApi, PetApi, TrafficLogger};

const STATUS_OK: u16 = 200;
const STATUS_NOT_FOUND: u16 = 404;

/// Wraps a [`PetApi`] with asserted, intention-revealing operations.
///
/// The collaborator is injected and never mutated, so one service can be
/// shared by every step of a scenario.
#[derive(Clone)]
pub struct PetStoreService {
    api: Arc<dyn PetApi>,
}

impl PetStoreService {
    pub fn new(api: Arc<dyn PetApi>) -> Self {
        Self { api }
    }

    /// Talks HTTP to `config.base_url`, logging traffic at `config.traffic`.
    pub fn connect(config: &HarnessConfig) -> Self {
        let api = HttpPetApi::new(&config.base_url, TrafficLogger::new(config.traffic));
        Self::new(Arc::new(api))
    }

    /// `POST /pet`, expecting 200.
    pub async fn add_pet(&self, pet: &Pet) {
        if let Err(err) = self.try_add_pet(pet).await {
            fail(err)
        }
    }

    /// `GET /pet/{id}`, expecting 200 and a pet carrying the requested id.
    pub async fn get_pet_by_id(&self, id: i64) -> Pet {
        match self.try_get_pet_by_id(id).await {
            Ok(pet) => pet,
            Err(err) => fail(err),
        }
    }

    /// `DELETE /pet/{id}`, expecting 200.
    pub async fn delete_pet(&self, id: i64) {
        if let Err(err) = self.try_delete_pet(id).await {
            fail(err)
        }
    }

    /// `GET /pet/{id}`, expecting the call to fail with 404.
    pub async fn get_pet_by_id_expect_not_found(&self, id: i64) {
        if let Err(err) = self.try_get_pet_by_id_expect_not_found(id).await {
            fail(err)
        }
    }

    pub async fn try_add_pet(&self, pet: &Pet) -> Result<()> {
        let span = info_span!("step", title = "POST Add Pet (Expect: 200 OK)", pet_id = ?pet.id);
        async move {
            let operation = "adding pet".to_string();
            let response = self
                .api
                .add_pet(pet)
                .await
                .map_err(|e| contract_violation(operation.clone(), e))?;
            expect_status(operation, response.status, response.raw_text())?;
            info!(status = response.status, "pet added");
            Ok(())
        }
        .instrument(span)
        .await
        .inspect_err(|e| warn!(error = %e, "step failed"))
    }

    pub async fn try_get_pet_by_id(&self, id: i64) -> Result<Pet> {
        let span = info_span!("step", title = "GET Pet by ID (Expect: 200 OK)", pet_id = id);
        async move {
            let operation = format!("fetching pet ID {}", id);
            let response = self
                .api
                .get_pet_by_id(id)
                .await
                .map_err(|e| contract_violation(operation.clone(), e))?;
            expect_status(operation, response.status, response.raw_text())?;

            let pet = response.data;
            if pet.id != Some(id) {
                return Err(FieldMismatch::new("id", Some(id), pet.id).into());
            }
            info!(status = response.status, name = %pet.name, "pet fetched");
            Ok(pet)
        }
        .instrument(span)
        .await
        .inspect_err(|e| warn!(error = %e, "step failed"))
    }

    pub async fn try_delete_pet(&self, id: i64) -> Result<()> {
        let span = info_span!("step", title = "DELETE Pet (Expect: 200 OK)", pet_id = id);
        async move {
            let operation = "deleting pet".to_string();
            let response = self
                .api
                .delete_pet(id)
                .await
                .map_err(|e| contract_violation(operation.clone(), e))?;
            expect_status(operation, response.status, response.raw_text())?;
            info!(status = response.status, "pet deleted");
            Ok(())
        }
        .instrument(span)
        .await
        .inspect_err(|e| warn!(error = %e, "step failed"))
    }

    pub async fn try_get_pet_by_id_expect_not_found(&self, id: i64) -> Result<()> {
        let span = info_span!("step", title = "GET Pet by ID (Expect: 404 Not Found)", pet_id = id);
        async move {
            let operation = format!("fetching pet ID {}", id);
            let outcome = match self.api.get_pet_by_id(id).await {
                Err(e) if e.code() == STATUS_NOT_FOUND => {
                    info!(status = STATUS_NOT_FOUND, "pet absent");
                    return Ok(());
                }
                Err(ApiError::Decode { status, .. }) => AbsenceOutcome::Succeeded { status },
                Err(e) => AbsenceOutcome::WrongCode {
                    code: e.code(),
                    body: error_body(&e),
                },
                Ok(response) => AbsenceOutcome::Succeeded {
                    status: response.status,
                },
            };
            Err(HarnessError::ExpectedAbsenceViolation {
                operation,
                expected: STATUS_NOT_FOUND,
                outcome,
            })
        }
        .instrument(span)
        .await
        .inspect_err(|e| warn!(error = %e, "step failed"))
    }
}

fn expect_status(operation: String, status: u16, body: Option<String>) -> Result<()> {
    if status == STATUS_OK {
        Ok(())
    } else {
        Err(HarnessError::ContractViolation {
            operation,
            expected: STATUS_OK,
            code: status,
            body,
        })
    }
}

fn contract_violation(operation: String, err: ApiError) -> HarnessError {
    match err {
        ApiError::Decode {
            status,
            message,
            body,
        } => HarnessError::MalformedPayload {
            operation,
            status,
            message,
            body,
        },
        err => HarnessError::ContractViolation {
            operation,
            expected: STATUS_OK,
            code: err.code(),
            body: error_body(&err),
        },
    }
}

/// The raw body when there is one, otherwise the transport's description.
fn error_body(err: &ApiError) -> Option<String> {
    match err {
        ApiError::Status { body, .. } if body.is_empty() => None,
        ApiError::Status { body, .. } => Some(body.clone()),
        ApiError::Transport(message) => Some(message.clone()),
        ApiError::Decode { body, .. } => Some(body.clone()),
    }
}

fn fail(err: HarnessError) -> ! {
    panic!("{}", err)
}
