//! Library integration tests.

use std::fs;
use std::path::Path;

use covgate::coverage::{CoverageReport, FileCoverage, Percent};
use covgate::gate::{GateEvaluator, Ratchet, RatchetOutcome};
use covgate::modules::{assign, discover, DiscoveryPolicy};
use covgate::threshold::{FsThresholdStore, ThresholdLock, ThresholdStore, MARKER_FILE};
use covgate::CovgateError;
use tempfile::TempDir;

fn file(path: &Path, total: u64, covered: u64) -> FileCoverage {
    FileCoverage {
        path: path.to_string_lossy().to_string(),
        lines_total: total,
        lines_covered: covered,
    }
}

#[test]
fn error_types_are_public() {
    let err = CovgateError::RequirementMissing {
        requirement: "cargo-llvm-cov".into(),
        hint: "cargo install cargo-llvm-cov".into(),
    };
    assert!(err.to_string().contains("cargo-llvm-cov"));
}

#[test]
fn result_type_alias_is_public() {
    fn test_fn() -> covgate::Result<()> {
        Ok(())
    }
    assert!(test_fn().is_ok());
}

#[test]
fn cli_types_are_public() {
    use clap::Parser;
    use covgate::cli::{Cli, Commands};

    let cli = Cli::parse_from(["covgate", "gate", "75.5", "--report", "cov.json"]);
    match cli.command {
        Commands::Gate(args) => {
            assert_eq!(args.default_threshold, Some(75.5));
            assert!(args.report.is_some());
        }
        other => panic!("Expected Gate command, got {other:?}"),
    }
}

#[test]
fn percent_truncates_to_hundredths() {
    assert_eq!(Percent::from_counts(2, 3).to_string(), "66.66");
    assert_eq!(Percent::from_counts(0, 0), Percent::ZERO);
}

#[test]
fn ratchet_then_gate_over_marker_files() {
    let temp = TempDir::new().unwrap();
    let src = temp.path().join("src");
    fs::create_dir_all(src.join("net")).unwrap();
    fs::create_dir_all(src.join("store")).unwrap();
    fs::write(src.join("net").join(MARKER_FILE), "40\n").unwrap();
    fs::write(src.join("store").join(MARKER_FILE), "0\n").unwrap();

    let report = CoverageReport::new(vec![
        file(&src.join("main.rs"), 4, 4),
        file(&src.join("net/tcp.rs"), 20, 15),
        file(&src.join("store/disk.rs"), 20, 1),
    ]);

    let mut store = FsThresholdStore::new(&src);
    let modules = discover(&src, DiscoveryPolicy::Marker, &store).unwrap();
    let ratchet = {
        let _lock = ThresholdLock::acquire(&src).unwrap();
        Ratchet::new(&mut store)
            .run(&assign(modules.clone(), &report))
            .unwrap()
    };

    let outcomes: Vec<_> = ratchet
        .entries
        .iter()
        .map(|e| (e.module.key.as_str(), &e.outcome))
        .collect();
    assert!(matches!(outcomes[0], ("", RatchetOutcome::Created { .. })));
    assert!(matches!(outcomes[1], ("net", RatchetOutcome::Raised { .. })));
    assert!(matches!(outcomes[2], ("store", RatchetOutcome::Skipped)));

    assert_eq!(
        fs::read_to_string(src.join(MARKER_FILE)).unwrap(),
        "100.00\n"
    );
    assert_eq!(
        fs::read_to_string(src.join("net").join(MARKER_FILE)).unwrap(),
        "75.00\n"
    );
    assert_eq!(
        fs::read_to_string(src.join("store").join(MARKER_FILE)).unwrap(),
        "0\n"
    );

    let modules = discover(&src, DiscoveryPolicy::Marker, &store).unwrap();
    let gate = GateEvaluator::new(&store, None)
        .run(&assign(modules, &report))
        .unwrap();
    assert!(gate.passed());
    assert_eq!(gate.counts().passed, 2);
    assert_eq!(gate.counts().skipped, 1);
}

#[test]
fn lock_is_exclusive_until_dropped() {
    let temp = TempDir::new().unwrap();
    let lock = ThresholdLock::acquire(temp.path()).unwrap();
    assert!(matches!(
        ThresholdLock::acquire(temp.path()),
        Err(CovgateError::Locked { .. })
    ));
    drop(lock);
    assert!(ThresholdLock::acquire(temp.path()).is_ok());
}

#[test]
fn fs_store_reads_what_it_writes() {
    let temp = TempDir::new().unwrap();
    let mut store = FsThresholdStore::new(temp.path());
    let threshold = covgate::threshold::Threshold::from_percent(Percent::from_counts(7, 8));

    store.save("", &threshold).unwrap();

    assert_eq!(store.load("").unwrap().unwrap().as_str(), "87.50");
}
