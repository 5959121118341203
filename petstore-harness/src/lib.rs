//! End-to-end test harness for the Swagger Petstore `/pet` API.
//!
//! Scenarios read as business steps: generate a fixture, add it, fetch it
//! back, check its fields, delete it, confirm it is gone.
//!
//! ```ignore
//! use petstore_harness::prelude::*;
//!
//! #[tokio::test]
//! async fn should_create_and_get_pet() {
//!     let service = PetStoreService::connect(&HarnessConfig::from_env().unwrap());
//!     let pet = generate_default_pet();
//!
//!     service.add_pet(&pet).await;
//!     let fetched = service.get_pet_by_id(pet.id.unwrap()).await;
//!
//!     assert_that(&fetched)
//!         .to_have_name("doggie")
//!         .to_have_status(PetStatus::Available);
//! }
//! ```

pub mod assertions;
pub mod config;
pub mod error;
pub mod fixtures;
pub mod model;
pub mod observability;
pub mod scenario;
pub mod service;
pub mod testing;
pub mod transport;

pub mod prelude {
    pub use crate::assertions::{PetAssert, assert_that};
    pub use crate::config::HarnessConfig;
    pub use crate::error::{HarnessError, Result};
    pub use crate::fixtures::{generate_default_pet, generate_random_pet, next_pet_id};
    pub use crate::model::{Category, Pet, PetStatus, Tag};
    pub use crate::observability::TracingConfig;
    pub use crate::scenario::{create_and_verify, full_lifecycle, run_lifecycle};
    pub use crate::service::PetStoreService;
    pub use crate::testing::{MockPetStore, ScriptedPetApi};
    pub use crate::transport::{HttpPetApi, PetApi, TrafficLevel, TrafficLogger};
}
