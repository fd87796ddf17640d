use netsecure_portal::storage::{FileStore, KeyValueStore, MemoryStore};
use std::path::PathBuf;
use uuid::Uuid;

fn temp_session_path() -> PathBuf {
    std::env::temp_dir()
        .join(format!("netsecure-test-{}", Uuid::new_v4()))
        .join("session.json")
}

#[cfg(test)]
mod memory_tests {
    use super::*;

    #[test]
    fn test_memory_set_get_remove() {
        let store = MemoryStore::new();
        assert_eq!(store.get("token"), None);

        store.set("token", "abc").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("abc"));

        store.remove("token").unwrap();
        assert_eq!(store.get("token"), None);
        // Removing twice is fine.
        assert!(store.remove("token").is_ok());
    }

    #[test]
    fn test_memory_failing_writes() {
        let store = MemoryStore::new_failing();
        assert!(store.set("token", "abc").is_err());
        assert!(store.remove("token").is_err());
        assert_eq!(store.get("token"), None);
    }
}

#[cfg(test)]
mod file_tests {
    use super::*;

    #[test]
    fn test_file_store_persists_across_instances() {
        let path = temp_session_path();

        let first = FileStore::new(&path);
        first.set("token", "abc").unwrap();
        first.set("user", r#"{"email":"a@b.c","role":"Operator"}"#).unwrap();

        let second = FileStore::new(&path);
        assert_eq!(second.get("token").as_deref(), Some("abc"));
        assert_eq!(
            second.get("user").as_deref(),
            Some(r#"{"email":"a@b.c","role":"Operator"}"#)
        );

        second.remove("token").unwrap();
        assert_eq!(first.get("token"), None);
        assert!(first.get("user").is_some());

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_file_store_missing_file_reads_empty() {
        let store = FileStore::new(temp_session_path());
        assert_eq!(store.get("token"), None);
        // Removing from a store that was never written does not create the file.
        store.remove("token").unwrap();
        assert!(!store.path().exists());
    }

    #[test]
    fn test_file_store_corrupt_document_reads_empty() {
        let path = temp_session_path();
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "{not json").unwrap();

        let store = FileStore::new(&path);
        assert_eq!(store.get("token"), None);

        // The next write replaces the corrupt document.
        store.set("token", "fresh").unwrap();
        assert_eq!(store.get("token").as_deref(), Some("fresh"));

        let _ = std::fs::remove_dir_all(path.parent().unwrap());
    }
}
