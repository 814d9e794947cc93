//! End-to-end tests: request file in, trace and results out.

use std::fs;

use memguard_sim::common::AccessFault;
use memguard_sim::config::Config;
use memguard_sim::sim::{load_requests, run_simulation, TraceWriter};
use memguard_sim::soc::System;
use tempfile::TempDir;

const SHARED_WORD: &str = "type,addr,data,user,wide\n\
    W,0x1000,0xAABBCCDD,5,T\n\
    R,0x1000,,6,T\n\
    W,0x1000,0,255,T\n\
    R,0x1000,,6,T\n";

fn config() -> Config {
    Config {
        rom_size: 0x100,
        ..Config::default()
    }
}

/// Tests the claim / deny / release / reuse sequence from a request file.
#[test]
fn test_shared_word_sequence() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("requests.csv");
    fs::write(&input, SHARED_WORD).unwrap();
    let trace_path = dir.path().join("trace.jsonl");

    let requests = load_requests(&input).unwrap().requests;
    let mut system = System::new(&config(), &[]);
    let mut trace = TraceWriter::create(&trace_path).unwrap();
    let result = run_simulation(&mut system, &requests, 1_000, Some(&mut trace)).unwrap();
    trace.finish().unwrap();

    assert!(result.finished);
    assert_eq!(result.completed, 4);
    assert_eq!(result.errors, 1);
    let errors: Vec<bool> = result.outcomes.iter().map(|r| r.error).collect();
    assert_eq!(errors, vec![false, true, false, false]);
    assert!(matches!(
        result.outcomes[1].fault,
        Some(AccessFault::OwnershipViolation { owner: 5, .. })
    ));
    // Denied reads complete in their acceptance cycle.
    assert_eq!(result.cycles, 2 + 1 + 2 + 2);

    let lines: Vec<serde_json::Value> = fs::read_to_string(&trace_path)
        .unwrap()
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(lines.len() as u64, result.cycles);
    let ready: Vec<u64> = lines
        .iter()
        .filter(|l| l["ready"] == true)
        .map(|l| l["cycle"].as_u64().unwrap())
        .collect();
    assert_eq!(ready, vec![2, 3, 5, 7]);
    assert_eq!(lines[2]["error"], true);
    assert_eq!(lines[0]["state"], "WaitBackingStore");
    assert_eq!(lines[1]["state"], "Complete");
    assert_eq!(lines[2]["state"], "Complete");
}

/// Tests reading preloaded ROM words and narrow RAM bytes.
#[test]
fn test_rom_and_byte_reads() {
    let requests = load_requests_from(
        "type,addr,data,user,wide\n\
         R,0,,1,T\n\
         R,4,,1,F\n\
         W,0x2000,0xAABBCCDD,0,T\n\
         R,0x2001,,2,F\n",
    );
    let mut system = System::new(&config(), &[0x1234_5678, 0x0000_00EF]);
    let result = run_simulation::<Vec<u8>>(&mut system, &requests, 1_000, None).unwrap();

    let rdata: Vec<u32> = result.outcomes.iter().map(|r| r.rdata).collect();
    assert_eq!(rdata, vec![0x1234_5678, 0xEF, 0, 0xCC]);
    assert_eq!(result.errors, 0);
}

/// Tests that an exhausted cycle budget leaves the run unfinished.
#[test]
fn test_cycle_budget() {
    let requests = load_requests_from(SHARED_WORD);
    let mut system = System::new(&config(), &[]);
    let result = run_simulation::<Vec<u8>>(&mut system, &requests, 4, None).unwrap();

    assert!(!result.finished);
    assert_eq!(result.cycles, 4);
    assert_eq!(result.completed, 2);
    assert_eq!(system.controller.cycle(), 4);
}

fn load_requests_from(content: &str) -> Vec<memguard_sim::common::MemoryRequest> {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("requests.csv");
    fs::write(&input, content).unwrap();
    load_requests(&input).unwrap().requests
}
