//! Fluent field checks on a retrieved pet.
//!
//! ```ignore
//! assert_that(&fetched)
//!     .to_have_id(12345)
//!     .to_have_name("doggie")
//!     .to_have_status(PetStatus::Available)
//!     .to_have_photo_urls(["http://example.com/photo1"]);
//! ```
//!
//! Every check consumes the builder and returns the next value in the chain.
//! [`assert_that`] panics at the first diverging field, so later checks never
//! run. [`PetAssert::soft`] instead collects every mismatch and reports them
//! together from [`PetAssert::verify`] or [`PetAssert::into_result`].

use std::fmt;

use crate::error::{FieldMismatch, HarnessError};
use crate::model::{Category, Pet, PetStatus, Tag};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Panic on the first mismatch.
    FailFast,
    /// Record every mismatch and keep going.
    Collect,
}

/// Starts a fail-fast chain. An absent pet fails on the first check.
pub fn assert_that<'a>(actual: impl Into<Option<&'a Pet>>) -> PetAssert<'a> {
    PetAssert::new(actual)
}

#[derive(Debug, Clone)]
pub struct PetAssert<'a> {
    actual: Option<&'a Pet>,
    mode: Mode,
    failures: Vec<FieldMismatch>,
    missing: bool,
}

impl<'a> PetAssert<'a> {
    pub fn new(actual: impl Into<Option<&'a Pet>>) -> Self {
        Self::with_mode(actual, Mode::FailFast)
    }

    pub fn soft(actual: impl Into<Option<&'a Pet>>) -> Self {
        Self::with_mode(actual, Mode::Collect)
    }

    pub fn with_mode(actual: impl Into<Option<&'a Pet>>, mode: Mode) -> Self {
        Self {
            actual: actual.into(),
            mode,
            failures: Vec::new(),
            missing: false,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Mismatches recorded so far. Always empty in fail-fast mode.
    pub fn failures(&self) -> &[FieldMismatch] {
        &self.failures
    }

    #[track_caller]
    pub fn to_have_id(self, expected: i64) -> Self {
        self.check("id", Some(expected), |pet| pet.id)
    }

    #[track_caller]
    pub fn to_have_name(self, expected: impl Into<String>) -> Self {
        self.check("name", expected.into(), |pet| pet.name.clone())
    }

    #[track_caller]
    pub fn to_have_status(self, expected: PetStatus) -> Self {
        self.check("status", Some(expected), |pet| pet.status)
    }

    /// Order and membership both matter.
    #[track_caller]
    pub fn to_have_photo_urls<I, S>(self, expected: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let expected: Vec<String> = expected.into_iter().map(Into::into).collect();
        self.check("photoUrls", expected, |pet| pet.photo_urls.clone())
    }

    #[track_caller]
    pub fn to_have_category(self, expected: Category) -> Self {
        self.check("category", Some(expected), |pet| pet.category.clone())
    }

    /// Membership matters, order does not.
    #[track_caller]
    pub fn to_have_tags(self, expected: Vec<Tag>) -> Self {
        self.check("tags", Some(sorted_tags(expected)), |pet| {
            pet.tags.clone().map(sorted_tags)
        })
    }

    /// Checks the fields a create/fetch round trip must preserve:
    /// id, name, status and photo URLs, in that order.
    #[track_caller]
    pub fn to_match(self, expected: &Pet) -> Self {
        let chain = match expected.id {
            Some(id) => self.to_have_id(id),
            None => self,
        };
        let chain = chain.to_have_name(expected.name.clone());
        let chain = match expected.status {
            Some(status) => chain.to_have_status(status),
            None => chain,
        };
        chain.to_have_photo_urls(expected.photo_urls.iter().cloned())
    }

    /// Returns every recorded failure.
    pub fn into_result(self) -> Result<(), HarnessError> {
        if self.missing {
            return Err(HarnessError::MissingEntity);
        }
        if self.failures.is_empty() {
            Ok(())
        } else {
            Err(HarnessError::FieldMismatches(self.failures))
        }
    }

    /// Panics with every recorded failure.
    #[track_caller]
    pub fn verify(self) {
        if let Err(err) = self.into_result() {
            panic!("{}", err);
        }
    }

    #[track_caller]
    fn check<T, F>(mut self, field: &'static str, expected: T, actual: F) -> Self
    where
        T: PartialEq + fmt::Debug,
        F: FnOnce(&Pet) -> T,
    {
        if self.missing {
            return self;
        }
        let Some(pet) = self.actual else {
            match self.mode {
                Mode::FailFast => panic!("{}", HarnessError::MissingEntity),
                Mode::Collect => {
                    self.missing = true;
                    return self;
                }
            }
        };

        let actual = actual(pet);
        if actual != expected {
            let mismatch = FieldMismatch::new(field, &expected, &actual);
            match self.mode {
                Mode::FailFast => panic!("{}", mismatch),
                Mode::Collect => self.failures.push(mismatch),
            }
        }
        self
    }
}

fn sorted_tags(mut tags: Vec<Tag>) -> Vec<Tag> {
    tags.sort_by(|a, b| (a.id, &a.name).cmp(&(b.id, &b.name)));
    tags
}
