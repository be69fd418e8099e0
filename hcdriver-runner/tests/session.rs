use std::sync::{Arc, Barrier};

use anyhow::Result;
use chrono::Utc;
use hcdriver_args::{ArgsError, SessionOptions};
use hcdriver_config::{EngineConfig, ResolvedEngine};
use hcdriver_events::{
    ActionEvent, CrackedEvent, EngineEvent, EventHandler, FinalStatusEvent, LogEvent, LogLevel,
    MemoryHandler, TaskInformationEvent,
};
use hcdriver_runner::{
    CrackedCollector, DryRunEngine, EngineLifecycle, JobInvocation, Session, SessionError,
};
use pretty_assertions::assert_eq;

fn config() -> EngineConfig {
    EngineConfig::new("/usr/local/share/hashcat")
}

fn cracked(hash: &str, value: &str, session: &str) -> EngineEvent {
    EngineEvent::Cracked(CrackedEvent {
        hash: hash.to_string(),
        value: value.to_string(),
        session: Some(session.to_string()),
        cracked_at: Utc::now(),
    })
}

fn dictionary_job(session: &str, hash: &str) -> SessionOptions {
    SessionOptions {
        opencl_device_types: Some("1".to_string()),
        session_name: Some(session.to_string()),
        optimized_kernel_enabled: Some(true),
        attack_mode: Some(0),
        hash_type: Some(0),
        potfile_disable: Some(true),
        input_file: hash.to_string(),
        dictionary_mask_directory_input: Some("./testdata/test_dictionary.txt".to_string()),
        ..SessionOptions::default()
    }
}

#[test]
fn reusing_a_session_accumulates_cracked_hashes() -> Result<()> {
    let engine = DryRunEngine::new();
    engine
        .script_job(vec![cracked("5d41402abc4b2a76b9719d911017c592", "hello", "test4")])
        .script_job(vec![cracked("9f9d51bc70ef21ca5c14f307980a29d8", "bob", "test5")]);
    let collector = CrackedCollector::new();
    let session = Session::new(&config(), engine.clone(), collector.clone())?;

    session.run_job_with_options(&dictionary_job("test4", "5d41402abc4b2a76b9719d911017c592"))?;
    assert_eq!(collector.len(), 1);
    assert_eq!(
        collector.get("5d41402abc4b2a76b9719d911017c592").as_deref(),
        Some("hello")
    );

    session.run_job_with_options(&dictionary_job("test5", "9f9d51bc70ef21ca5c14f307980a29d8"))?;
    assert_eq!(collector.len(), 2);
    assert_eq!(
        collector.get("9f9d51bc70ef21ca5c14f307980a29d8").as_deref(),
        Some("bob")
    );

    let sessions: Vec<Option<String>> = engine
        .logged_invocations()
        .iter()
        .map(|invocation| invocation.session_name().map(str::to_string))
        .collect();
    assert_eq!(sessions, vec![Some("test4".into()), Some("test5".into())]);
    Ok(())
}

#[test]
fn options_are_marshaled_in_schema_order() -> Result<()> {
    let engine = DryRunEngine::new();
    let session = Session::new(&config(), engine.clone(), MemoryHandler::new())?;

    session.run_job_with_options(&dictionary_job("test3", "9f9d51bc70ef21ca5c14f307980a29d8"))?;

    let invocations = engine.logged_invocations();
    assert_eq!(
        invocations[0].args,
        [
            "--hash-type=0",
            "--attack-mode=0",
            "--session=test3",
            "--potfile-disable",
            "--opencl-device-types=1",
            "--optimized-kernel-enable",
            "9f9d51bc70ef21ca5c14f307980a29d8",
            "./testdata/test_dictionary.txt",
        ]
    );
    Ok(())
}

#[test]
fn marshaling_errors_never_reach_the_engine() -> Result<()> {
    let engine = DryRunEngine::new();
    let session = Session::new(&config(), engine.clone(), MemoryHandler::new())?;

    let err = session
        .run_job_with_options(&SessionOptions {
            hash_type: Some(0),
            ..SessionOptions::default()
        })
        .expect_err("input file is required");

    assert!(matches!(
        err,
        SessionError::Args(ArgsError::RequiredFieldAbsent {
            field: "input_file"
        })
    ));
    assert!(engine.logged_invocations().is_empty());
    Ok(())
}

#[test]
fn every_event_kind_reaches_the_handler_in_order() -> Result<()> {
    let events = vec![
        EngineEvent::TaskInformation(TaskInformationEvent {
            session: Some("test2".to_string()),
            hash_type: Some(0),
            attack_mode: Some(0),
            device_count: 1,
            ..TaskInformationEvent::default()
        }),
        EngineEvent::Log(LogEvent {
            level: LogLevel::Advice,
            message: "use -O".to_string(),
        }),
        EngineEvent::Action(ActionEvent {
            event_code: 4,
            message: "cracker started".to_string(),
        }),
        cracked("9f9d51bc70ef21ca5c14f307980a29d8", "bob", "test2"),
        EngineEvent::FinalStatus(FinalStatusEvent {
            status: serde_json::json!({ "progress": [100, 100] }),
            all_hashes_cracked: true,
            ended_at: Utc::now(),
        }),
    ];
    let engine = DryRunEngine::new();
    engine.script_job(events.clone());
    let handler = Arc::new(MemoryHandler::new());
    let sink = Arc::clone(&handler);
    let session = Session::new(&config(), engine, move |event: &EngineEvent| {
        sink.handle(event);
    })?;

    session.run_job_with_options(&dictionary_job("test2", "9f9d51bc70ef21ca5c14f307980a29d8"))?;

    assert_eq!(handler.events(), events);
    Ok(())
}

/// Blocks inside `run_job` until the test releases it.
struct GatedEngine {
    started: Barrier,
    release: Barrier,
    inner: DryRunEngine,
}

impl EngineLifecycle for GatedEngine {
    fn run_job(&self, invocation: &JobInvocation, handler: &dyn EventHandler) -> Result<()> {
        self.started.wait();
        self.release.wait();
        self.inner.run_job(invocation, handler)
    }

    fn stop_at_checkpoint(&self) -> Result<()> {
        self.inner.stop_at_checkpoint()
    }

    fn identify_hash(&self, engine: &ResolvedEngine, hash: &str) -> Result<Vec<i64>> {
        self.inner.identify_hash(engine, hash)
    }
}

#[test]
fn stop_at_checkpoint_reaches_a_running_job() -> Result<()> {
    let inner = DryRunEngine::new();
    let gate = Arc::new(GatedEngine {
        started: Barrier::new(2),
        release: Barrier::new(2),
        inner: inner.clone(),
    });
    let session = Session::new(&config(), SharedEngine(Arc::clone(&gate)), MemoryHandler::new())?;

    std::thread::scope(|scope| -> Result<()> {
        let job = scope.spawn(|| session.run_job(["deadbeef"]));

        gate.started.wait();
        assert!(session.is_running());
        assert!(matches!(
            session.run_job(["other"]),
            Err(SessionError::JobAlreadyRunning)
        ));
        session.stop_at_checkpoint()?;
        gate.release.wait();

        job.join().expect("job thread panicked")?;
        Ok(())
    })?;

    assert_eq!(inner.checkpoint_requests(), 1);
    assert!(!session.is_running());
    assert!(matches!(
        session.stop_at_checkpoint(),
        Err(SessionError::UnableToStopAtCheckpoint)
    ));
    Ok(())
}

struct SharedEngine(Arc<GatedEngine>);

impl EngineLifecycle for SharedEngine {
    fn run_job(&self, invocation: &JobInvocation, handler: &dyn EventHandler) -> Result<()> {
        self.0.run_job(invocation, handler)
    }

    fn stop_at_checkpoint(&self) -> Result<()> {
        self.0.stop_at_checkpoint()
    }

    fn identify_hash(&self, engine: &ResolvedEngine, hash: &str) -> Result<Vec<i64>> {
        self.0.identify_hash(engine, hash)
    }
}

/// Engine whose identification backend is unavailable.
struct OfflineIdentifier;

impl EngineLifecycle for OfflineIdentifier {
    fn run_job(&self, _invocation: &JobInvocation, _handler: &dyn EventHandler) -> Result<()> {
        Ok(())
    }

    fn stop_at_checkpoint(&self) -> Result<()> {
        Ok(())
    }

    fn identify_hash(&self, _engine: &ResolvedEngine, _hash: &str) -> Result<Vec<i64>> {
        anyhow::bail!("hash identification backend unavailable")
    }
}

const MD5_CANDIDATES: [i64; 11] = [0, 10, 20, 900, 1000, 2600, 3500, 4400, 8600, 9900, 70];

#[test]
fn identify_hash_lists_candidate_types() -> Result<()> {
    let engine = DryRunEngine::new();
    engine.script_identification("5d41402abc4b2a76b9719d911017c592", MD5_CANDIDATES.to_vec());
    let session = Session::new(&config(), engine.clone(), MemoryHandler::new())?;

    let hash_types = session.identify_hash("5d41402abc4b2a76b9719d911017c592")?;

    assert_eq!(hash_types.len(), 11);
    assert_eq!(hash_types, MD5_CANDIDATES);
    assert!(engine.logged_invocations().is_empty());
    Ok(())
}

#[test]
fn identify_hash_rejects_invalid_hash() -> Result<()> {
    let session = Session::new(&config(), DryRunEngine::new(), MemoryHandler::new())?;

    let err = session
        .identify_hash("5d4'[##'[]]'1017c592")
        .expect_err("no candidates");

    match err {
        SessionError::UnidentifiedHash { hash } => assert_eq!(hash, "5d4'[##'[]]'1017c592"),
        other => panic!("expected unidentified hash, got {other:?}"),
    }
    Ok(())
}

#[test]
fn identify_hash_surfaces_engine_failures() -> Result<()> {
    let session = Session::new(&config(), OfflineIdentifier, MemoryHandler::new())?;

    let err = session.identify_hash("deadbeef").expect_err("engine failure");

    assert!(matches!(err, SessionError::Engine(_)));
    assert_eq!(err.to_string(), "hash identification backend unavailable");
    Ok(())
}
