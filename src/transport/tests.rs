use std::io::Read;
use std::path::{Path, PathBuf};

use super::source::{SourceKind, open_local, read_capped};
use super::*;

#[test]
fn source_kind_detects_remote_urls_case_insensitive() {
    assert_eq!(
        SourceKind::of("https://cdn.test/a.mp3"),
        SourceKind::Remote("https://cdn.test/a.mp3".into())
    );
    assert_eq!(
        SourceKind::of("  HTTP://cdn.test/a.mp3 "),
        SourceKind::Remote("HTTP://cdn.test/a.mp3".into())
    );
}

#[test]
fn source_kind_treats_everything_else_as_local() {
    assert_eq!(
        SourceKind::of("file:///music/a.flac"),
        SourceKind::Local(PathBuf::from("/music/a.flac"))
    );
    assert_eq!(
        SourceKind::of("/music/a.flac"),
        SourceKind::Local(PathBuf::from("/music/a.flac"))
    );
}

#[test]
fn read_capped_returns_sources_within_limit() {
    let bytes = read_capped(&b"bytes"[..], 5, "mem://a").unwrap();
    assert_eq!(bytes, b"bytes");
}

#[test]
fn read_capped_rejects_oversized_sources() {
    let err = read_capped(&b"too many bytes"[..], 4, "mem://a").unwrap_err();
    match err {
        TransportError::Source { url, reason } => {
            assert_eq!(url, "mem://a");
            assert!(reason.contains("exceeds 4 bytes"), "{reason}");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn open_local_reads_existing_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("a.mp3");
    std::fs::write(&path, b"bytes").unwrap();

    let mut contents = Vec::new();
    open_local(&path, path.to_str().unwrap())
        .unwrap()
        .read_to_end(&mut contents)
        .unwrap();
    assert_eq!(contents, b"bytes");
}

#[test]
fn open_local_reports_missing_files() {
    let path = Path::new("/definitely/not/here.mp3");
    let err = open_local(path, "/definitely/not/here.mp3").unwrap_err();
    assert!(matches!(err, TransportError::Source { .. }));
}
