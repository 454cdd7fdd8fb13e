use crate::conf::TailConfig;
use crate::source::{LogTail, SourceError, TailEvent, read_log};
use pretty_assertions::assert_eq;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::time::Duration;
use tempfile::tempdir;

fn fast() -> TailConfig {
    TailConfig {
        poll_interval_ms: 10,
        retry_initial_ms: 10,
        retry_max_ms: 50,
    }
}

fn append(path: &Path, text: &str) {
    let mut file = OpenOptions::new().append(true).open(path).unwrap();
    file.write_all(text.as_bytes()).unwrap();
}

async fn next(tail: &mut LogTail) -> TailEvent {
    tokio::time::timeout(Duration::from_secs(5), tail.next())
        .await
        .expect("tail produced nothing within 5s")
}

fn line(s: &str) -> TailEvent {
    TailEvent::Line(s.to_string())
}

#[tokio::test]
async fn existing_lines_then_caught_up() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "one\ntwo\r\n").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();

    // Act
    let events = vec![next(&mut tail).await, next(&mut tail).await, next(&mut tail).await];

    // Assert
    assert_eq!(events, vec![line("one"), line("two"), TailEvent::CaughtUp]);
}

#[tokio::test]
async fn empty_file_is_immediately_caught_up() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();

    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);
}

#[tokio::test]
async fn follows_appended_lines() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "old\n").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();
    assert_eq!(next(&mut tail).await, line("old"));
    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);

    append(&path, "new\n");

    assert_eq!(next(&mut tail).await, line("new"));
}

#[tokio::test]
async fn partial_line_waits_for_newline() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "Info: Cli").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();
    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);

    append(&path, "ent done\n");

    assert_eq!(next(&mut tail).await, line("Info: Client done"));
}

#[tokio::test]
async fn truncation_restarts_from_the_beginning() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "first line\nsecond line\n").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();
    assert_eq!(next(&mut tail).await, line("first line"));
    assert_eq!(next(&mut tail).await, line("second line"));
    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);

    fs::write(&path, "x\n").unwrap();

    assert_eq!(next(&mut tail).await, line("x"));
}

#[tokio::test]
async fn rename_rotation_picks_up_new_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "before\n").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();
    assert_eq!(next(&mut tail).await, line("before"));
    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);

    fs::rename(&path, dir.path().join("server.log.1")).unwrap();
    fs::write(&path, "after rotation\n").unwrap();

    assert_eq!(next(&mut tail).await, line("after rotation"));
}

#[tokio::test]
async fn waits_for_missing_file_to_reappear() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "a\n").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();
    assert_eq!(next(&mut tail).await, line("a"));
    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);
    fs::remove_file(&path).unwrap();

    let writer_path = path.clone();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(150)).await;
        fs::write(&writer_path, "back\n").unwrap();
    });

    assert_eq!(next(&mut tail).await, line("back"));
    writer.await.unwrap();
}

#[tokio::test]
async fn dangling_line_survives_cancelled_read_while_file_is_missing() {
    // Arrange
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, "a\n").unwrap();
    let mut tail = LogTail::open(&path, fast()).await.unwrap();
    assert_eq!(next(&mut tail).await, line("a"));
    assert_eq!(next(&mut tail).await, TailEvent::CaughtUp);
    append(&path, "dangling");
    fs::remove_file(&path).unwrap();

    // Act
    let cancelled = tokio::time::timeout(Duration::from_millis(100), tail.next()).await;
    fs::write(&path, "fresh\n").unwrap();

    // Assert
    assert!(cancelled.is_err());
    assert_eq!(next(&mut tail).await, line("dangling"));
    assert_eq!(next(&mut tail).await, line("fresh"));
}

#[tokio::test]
async fn missing_file_at_open_is_an_error() {
    let dir = tempdir().unwrap();

    let err = LogTail::open(dir.path().join("absent.log"), fast())
        .await
        .unwrap_err();

    assert!(matches!(err, SourceError::Open { .. }));
}

#[test]
fn read_log_splits_and_strips_line_endings() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("server.log");
    fs::write(&path, b"a\r\nb\n\xffc").unwrap();

    let lines = read_log(&path).unwrap();

    assert_eq!(lines, vec!["a", "b", "\u{fffd}c"]);
}

#[test]
fn read_log_reports_missing_file() {
    let dir = tempdir().unwrap();

    let err = read_log(&dir.path().join("absent.log")).unwrap_err();

    assert!(matches!(err, SourceError::Read { .. }));
}
