use std::collections::VecDeque;
use std::sync::Mutex;

use crate::model::Pet;
use crate::transport::{ApiError, ApiResponse, ApiResult, BoxFuture, PetApi};

/// A call received by [`ScriptedPetApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    AddPet(Pet),
    GetPetById(i64),
    DeletePet(i64),
}

/// A [`PetApi`] that replays queued results in order, per endpoint.
///
/// An endpoint with an empty queue answers with a transport error, so an
/// unexpected extra call shows up as a failure rather than a hang.
#[derive(Default)]
pub struct ScriptedPetApi {
    add: Mutex<VecDeque<ApiResult<()>>>,
    get: Mutex<VecDeque<ApiResult<Pet>>>,
    delete: Mutex<VecDeque<ApiResult<()>>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedPetApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_add(self, result: ApiResult<()>) -> Self {
        push(&self.add, result);
        self
    }

    pub fn on_get(self, result: ApiResult<Pet>) -> Self {
        push(&self.get, result);
        self
    }

    pub fn on_delete(self, result: ApiResult<()>) -> Self {
        push(&self.delete, result);
        self
    }

    /// Queues a 200 with the given pet for the next `GET`.
    pub fn on_get_ok(self, pet: Pet) -> Self {
        self.on_get(Ok(ApiResponse::new(200, pet)))
    }

    /// Queues a non-2xx failure for the next `GET`.
    pub fn on_get_status(self, code: u16, body: impl Into<String>) -> Self {
        self.on_get(Err(ApiError::Status {
            code,
            body: body.into(),
        }))
    }

    /// Every call received so far, in order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: RecordedCall) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }
}

fn push<T>(queue: &Mutex<VecDeque<ApiResult<T>>>, result: ApiResult<T>) {
    if let Ok(mut queue) = queue.lock() {
        queue.push_back(result);
    }
}

fn next<T>(queue: &Mutex<VecDeque<ApiResult<T>>>, endpoint: &str) -> ApiResult<T> {
    queue
        .lock()
        .ok()
        .and_then(|mut q| q.pop_front())
        .unwrap_or_else(|| {
            Err(ApiError::Transport(format!(
                "no scripted response for {}",
                endpoint
            )))
        })
}

impl PetApi for ScriptedPetApi {
    fn add_pet<'a>(&'a self, pet: &'a Pet) -> BoxFuture<'a, ApiResult<()>> {
        self.record(RecordedCall::AddPet(pet.clone()));
        let result = next(&self.add, "POST /pet");
        Box::pin(async move { result })
    }

    fn get_pet_by_id(&self, id: i64) -> BoxFuture<'_, ApiResult<Pet>> {
        self.record(RecordedCall::GetPetById(id));
        let result = next(&self.get, "GET /pet/{id}");
        Box::pin(async move { result })
    }

    fn delete_pet(&self, id: i64) -> BoxFuture<'_, ApiResult<()>> {
        self.record(RecordedCall::DeletePet(id));
        let result = next(&self.delete, "DELETE /pet/{id}");
        Box::pin(async move { result })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_replays_in_order() {
        let api = ScriptedPetApi::new()
            .on_get_ok(Pet::new("first").with_id(1))
            .on_get_status(404, "Pet not found");

        assert_eq!(api.get_pet_by_id(1).await.unwrap().data.name, "first");
        assert_eq!(api.get_pet_by_id(1).await.unwrap_err().code(), 404);
    }

    #[tokio::test]
    async fn test_empty_queue_is_transport_error() {
        let api = ScriptedPetApi::new();
        let err = api.delete_pet(3).await.unwrap_err();
        assert_eq!(err.code(), 0);
        assert_eq!(api.calls(), vec![RecordedCall::DeletePet(3)]);
    }
}
