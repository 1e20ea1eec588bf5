use std::collections::HashSet;

use super::memory::MemoryObjectStore;
use super::*;

#[test]
fn object_keys_are_prefixed_and_unique() {
    let mut seen = HashSet::new();
    for _ in 0..256 {
        let key = object_key(FolderKey::Videos, "mp4");
        assert!(key.starts_with("videos/"), "{key}");
        assert!(key.ends_with(".mp4"), "{key}");
        assert!(seen.insert(key));
    }
}

#[test]
fn extension_is_lowercased_with_fallback() {
    assert_eq!(UploadFile::new("Clip.MP3", vec![1u8]).extension(), "mp3");
    assert_eq!(UploadFile::new("archive.tar.gz", vec![1u8]).extension(), "gz");
    assert_eq!(UploadFile::new("README", vec![1u8]).extension(), "bin");
    assert_eq!(UploadFile::new("weird.p?g", vec![1u8]).extension(), "bin");
}

#[test]
fn memory_store_resolves_urls() {
    let store = MemoryObjectStore::new("https://cdn.example/qr-files/");
    let url = store
        .store(&UploadFile::new("doc.pdf", vec![1u8, 2, 3]), FolderKey::Pdfs)
        .unwrap();
    assert!(url.starts_with("https://cdn.example/qr-files/pdfs/"), "{url}");
    assert_eq!(store.get_by_url(&url).unwrap().as_ref(), &[1u8, 2, 3]);
    assert_eq!(store.len(), 1);
}

#[test]
fn memory_store_failure_and_empty_blob() {
    let store = MemoryObjectStore::default();
    assert!(matches!(
        store.store(&UploadFile::new("a.png", Vec::<u8>::new()), FolderKey::Images),
        Err(QrCraftError::Upload(_))
    ));
    store.set_failing(true);
    assert!(matches!(
        store.store(&UploadFile::new("a.png", vec![1u8]), FolderKey::Images),
        Err(QrCraftError::Upload(_))
    ));
    assert!(store.is_empty());
}

#[test]
fn fs_store_writes_under_folder() {
    let dir = std::env::temp_dir().join(format!("qrcraft-fs-store-{}", std::process::id()));
    let store = fs::FsObjectStore::new(&dir, "http://localhost:8000/files");
    let url = store
        .store(&UploadFile::new("photo.JPG", vec![9u8; 4]), FolderKey::Images)
        .unwrap();
    let key = url.strip_prefix("http://localhost:8000/files/").unwrap();
    assert!(key.starts_with("images/") && key.ends_with(".jpg"), "{key}");
    assert_eq!(std::fs::read(dir.join(key)).unwrap(), vec![9u8; 4]);
    let _ = std::fs::remove_dir_all(&dir);
}
