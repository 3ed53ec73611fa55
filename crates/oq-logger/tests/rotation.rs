//! Rotation driven through the logger facade.

use std::fs;

use oq_config::LoggingConfig;
use oq_logger::{
    JsonEncoder, LevelFilter, LogContext, LogLevel, Logger, RotatingSink, RotationPolicy,
};
use tempfile::TempDir;

#[test]
fn cumulative_writes_rotate_and_cap_backups() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("app.log");
    let policy = RotationPolicy::new(&path)
        .with_max_size_bytes(600)
        .with_max_backups(2);
    let logger = Logger::with_sink(
        "questionnaire",
        LevelFilter::new(LogLevel::Info),
        RotatingSink::new(policy),
    )
    .expect("create logger");

    for i in 0..40 {
        logger.info(
            &format!("answer saved {i}"),
            None,
            LogContext::new().with("question", i),
        );
    }

    let policy = RotationPolicy::new(&path).with_max_backups(2);
    let sink = RotatingSink::new(policy);
    let backups = sink.backups().expect("list backups");
    assert_eq!(backups.len(), 2);

    let encoder = JsonEncoder::new();
    let active = fs::read_to_string(&path).expect("read active file");
    assert!(active.len() <= 600);
    let last = active.lines().last().expect("active file has records");
    let record = encoder.decode(last).expect("decode");
    assert_eq!(record.message, "answer saved 39");

    for backup in backups {
        let content = fs::read_to_string(&backup.path).expect("read backup");
        for line in content.lines() {
            assert!(encoder.decode(line).is_ok());
        }
    }
}

#[test]
fn configured_byte_limit_rotates() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("app.log");
    let config = LoggingConfig::new(&path)
        .with_max_size(400)
        .with_max_backups(5)
        .with_level("info");
    let logger = Logger::new(&config, "questionnaire").expect("create logger");

    for i in 0..20 {
        logger.info("answer saved", None, LogContext::new().with("question", i));
    }

    let active = fs::metadata(&path).expect("stat active file").len();
    assert!(active <= 400, "active file is {active} bytes");

    let backups = RotatingSink::new(RotationPolicy::from_config(&config))
        .backups()
        .expect("list backups");
    assert_eq!(backups.len(), 5);
    for backup in backups {
        let size = fs::metadata(&backup.path).expect("stat backup").len();
        assert!(size <= 400, "backup is {size} bytes");
    }
}

#[test]
fn concurrent_logging_writes_whole_lines() {
    let dir = TempDir::new().expect("create temp dir");
    let path = dir.path().join("app.log");
    let logger = std::sync::Arc::new(
        Logger::with_sink(
            "questionnaire",
            LevelFilter::default(),
            RotatingSink::new(RotationPolicy::new(&path)),
        )
        .expect("create logger"),
    );

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let logger = std::sync::Arc::clone(&logger);
            std::thread::spawn(move || {
                for i in 0..50 {
                    logger.debug(
                        "tick",
                        None,
                        LogContext::new().with("thread", t).with("i", i),
                    );
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("join");
    }

    let encoder = JsonEncoder::new();
    let content = fs::read_to_string(&path).expect("read log");
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 400);
    for line in lines {
        assert!(encoder.decode(line).is_ok(), "corrupt line: {line}");
    }
}
