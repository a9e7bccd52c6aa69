use std::fs;
use std::path::PathBuf;

use clockpatience_engine::cards::PileIndex;
use clockpatience_engine::game::GameMode;
use clockpatience_engine::logger::{PlayRecord, RoundLogger, RoundOutcome, RoundRecord};
use clockpatience_engine::rules::LossReason;

fn tmp_path(name: &str) -> PathBuf {
    let mut p = PathBuf::from("target");
    p.push(format!("{}_{}.jsonl", name, std::process::id()));
    // the logger appends, so start every test from an empty history
    let _ = fs::remove_file(&p);
    p
}

fn record(id: &str) -> RoundRecord {
    RoundRecord {
        round_id: id.to_string(),
        seed: 7,
        mode: GameMode::Automatic,
        question: Some("Will it rain?".to_string()),
        outcome: RoundOutcome::Lost(LossReason::DuplicateTop),
        revealed: 1,
        plays: vec![PlayRecord {
            card: "5S".to_string(),
            from: PileIndex::CENTER,
            to: PileIndex::new(4).unwrap(),
        }],
        ts: None,
    }
}

#[test]
fn writes_jsonl_with_lf_only() {
    let path = tmp_path("roundlog");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    logger.write(&record("20250102-000001")).expect("write");
    logger.write(&record("20250102-000002")).expect("write");
    let bytes = fs::read(&path).expect("read file");
    assert!(bytes.ends_with(b"\n"));
    assert!(!bytes.contains(&b'\r'));
    assert_eq!(bytes.iter().filter(|&&b| b == b'\n').count(), 2);
    let _ = fs::remove_file(&path);
}

#[test]
fn reopening_appends_and_continues_ids() {
    let path = tmp_path("roundlog_append");
    let first_id = {
        let mut logger = RoundLogger::create(&path).expect("create logger");
        let id = logger.next_id();
        logger.write(&record(&id)).expect("write");
        id
    };
    let second_id = {
        let mut logger = RoundLogger::create(&path).expect("reopen logger");
        let id = logger.next_id();
        logger.write(&record(&id)).expect("write");
        id
    };
    assert!(first_id.ends_with("-000001"), "{}", first_id);
    assert!(second_id.ends_with("-000002"), "{}", second_id);

    let text = fs::read_to_string(&path).unwrap();
    let ids: Vec<String> = text
        .lines()
        .map(|l| serde_json::from_str::<RoundRecord>(l).expect("valid json").round_id)
        .collect();
    assert_eq!(ids, vec![first_id, second_id]);
    let _ = fs::remove_file(&path);
}

#[test]
fn ids_from_other_days_do_not_advance_the_sequence() {
    let path = tmp_path("roundlog_other_day");
    fs::create_dir_all("target").unwrap();
    fs::write(&path, format!("{}\n", serde_json::to_string(&record("19990101-000041")).unwrap()))
        .unwrap();
    let mut logger = RoundLogger::create(&path).expect("open logger");
    assert!(logger.next_id().ends_with("-000001"));
    let _ = fs::remove_file(&path);
}

#[test]
fn sequential_ids_increment() {
    let mut logger = RoundLogger::detached("20251231");
    assert_eq!(logger.next_id(), "20251231-000001");
    assert_eq!(logger.next_id(), "20251231-000002");
}

#[test]
fn ts_is_generated_when_missing_and_preserved_when_present() {
    let path = tmp_path("roundlog_ts");
    let mut logger = RoundLogger::create(&path).expect("create logger");
    logger.write(&record("20250102-000010")).expect("write");

    let mut preset = record("20250102-000011");
    preset.ts = Some("2025-01-02T03:04:05Z".to_string());
    logger.write(&preset).expect("write");

    let text = fs::read_to_string(&path).unwrap();
    let lines: Vec<RoundRecord> = text
        .lines()
        .map(|l| serde_json::from_str(l).expect("valid json"))
        .collect();
    assert!(lines[0].ts.is_some(), "ts should be injected");
    assert_eq!(lines[1].ts.as_deref(), Some("2025-01-02T03:04:05Z"));
    let _ = fs::remove_file(&path);
}

#[test]
fn record_serializes_outcome_and_answer() {
    let rec = record("20250102-000003");
    let json = serde_json::to_value(&rec).unwrap();
    assert_eq!(json["mode"], "Automatic");
    assert_eq!(json["outcome"]["lost"], "DuplicateTop");
    assert_eq!(rec.outcome.answer(), "no");
    assert_eq!(RoundOutcome::Won.answer(), "yes");
}
