//! Ready-to-submit pets for scenarios.
//!
//! Identifiers come from one process-wide counter seeded with the wall clock
//! in milliseconds on first use. Within a run they strictly increase, so no two
//! fixtures share an id; across runs a fresh seed keeps collisions with
//! leftovers in a shared store unlikely.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use uuid::Uuid;

use crate::model::{Category, Pet, PetStatus, Tag};

pub const DEFAULT_PET_NAME: &str = "doggie";
pub const DEFAULT_PHOTO_URL: &str = "http://example.com/photo1";

static NEXT_ID: OnceLock<AtomicI64> = OnceLock::new();

fn seed() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .ok()
        .and_then(|d| i64::try_from(d.as_millis()).ok())
        .unwrap_or(1)
}

/// Returns an identifier no other call in this process has returned.
pub fn next_pet_id() -> i64 {
    NEXT_ID
        .get_or_init(|| AtomicI64::new(seed()))
        .fetch_add(1, Ordering::Relaxed)
}

/// `doggie`, available, one photo, category `Dogs`, tag `friendly`.
pub fn generate_default_pet() -> Pet {
    Pet::new(DEFAULT_PET_NAME)
        .with_id(next_pet_id())
        .with_category(Category::new(1, "Dogs"))
        .with_photo_urls([DEFAULT_PHOTO_URL])
        .with_tags(vec![Tag::new(1, "friendly")])
        .with_status(PetStatus::Available)
}

/// A pet with a uuid-suffixed name, random status and two photos.
pub fn generate_random_pet() -> Pet {
    let uuid = Uuid::new_v4();
    let suffix = uuid.simple().to_string();
    let status = PetStatus::ALL[uuid.as_bytes()[0] as usize % PetStatus::ALL.len()];

    Pet::new(format!("{}-{}", DEFAULT_PET_NAME, &suffix[..8]))
        .with_id(next_pet_id())
        .with_category(Category::new(1, "Dogs"))
        .with_photo_urls([
            format!("http://example.com/{}/1.jpg", suffix),
            format!("http://example.com/{}/2.jpg", suffix),
        ])
        .with_tags(vec![Tag::new(2, format!("run-{}", &suffix[..8]))])
        .with_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_default_pet_fields() {
        let pet = generate_default_pet();
        assert!(pet.id.is_some());
        assert_eq!(pet.name, "doggie");
        assert_eq!(pet.status, Some(PetStatus::Available));
        assert_eq!(pet.photo_urls, vec!["http://example.com/photo1"]);
        assert_eq!(pet.category, Some(Category::new(1, "Dogs")));
    }

    #[test]
    fn test_ids_unique_within_run() {
        let ids: HashSet<_> = (0..1000).filter_map(|_| generate_default_pet().id).collect();
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_ids_unique_across_threads() {
        let handles: Vec<_> = (0..4)
            .map(|_| std::thread::spawn(|| (0..250).map(|_| next_pet_id()).collect::<Vec<_>>()))
            .collect();

        let mut ids = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(ids.insert(id), "duplicate id {}", id);
            }
        }
        assert_eq!(ids.len(), 1000);
    }

    #[test]
    fn test_seed_is_wall_clock_millis() {
        let before = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_millis();
        let seed = seed();
        assert!(seed > 1);
        assert!(u128::try_from(seed).unwrap() >= before);
    }

    #[test]
    fn test_ids_increase() {
        let first = next_pet_id();
        let second = next_pet_id();
        assert!(second > first);
    }

    #[test]
    fn test_random_pet_is_populated() {
        let a = generate_random_pet();
        let b = generate_random_pet();
        assert_ne!(a.id, b.id);
        assert_ne!(a.name, b.name);
        assert!(a.name.starts_with("doggie-"));
        assert_eq!(a.photo_urls.len(), 2);
        assert!(a.status.is_some());
    }
}
