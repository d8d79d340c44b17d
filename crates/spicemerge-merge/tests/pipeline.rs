//! End-to-end tests: scan two library trees, merge, verify rewritten files.

use std::fs;
use std::path::Path;

use spicemerge_merge::{Error, MergeOptions, MergePipeline, MessageLog, Progress};

fn write(path: &Path, contents: impl AsRef<[u8]>) {
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, contents).unwrap();
}

fn run(source: &Path, destination: &Path, options: MergeOptions) -> spicemerge_merge::MergeReport {
    MergePipeline::new(options)
        .run(source, destination, &|_: &Progress| {})
        .expect("run should succeed")
}

/// Source and destination models are merged, deduplicated and sorted.
#[test]
fn test_merge_rewrites_destination() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(
        &src.path().join("standard.dio"),
        ".model D1N4148 D(IS=2.52n RS=.568\r\n+ N=1.752)\r\n.model BAT54 D(IS=1n)\r\n",
    );
    write(
        &src.path().join("vendor/standard.dio"),
        ".model ZENER D(BV=5.1)\n",
    );
    write(
        &dst.path().join("lib/standard.dio"),
        "* local diodes\n.model D1N4148 D(IS=2.52n RS=.568)\n.model BAT54 D(IS=2n)\n",
    );

    let report = run(src.path(), dst.path(), MergeOptions::default());

    assert!(report.is_success());
    assert_eq!(report.written.len(), 1);
    assert_eq!(report.written[0].lines, 4);
    assert_eq!(
        fs::read_to_string(dst.path().join("lib/standard.dio")).unwrap(),
        ".model BAT54 D(IS=1n)\n\
         .model BAT54_ D(IS=2n)\n\
         .model D1N4148 D(IS=2.52n RS=.568 N=1.752)\n\
         .model ZENER D(BV=5.1)\n"
    );

    let summary = report.summary();
    assert_eq!(summary.inserted, 3);
    assert_eq!(summary.kept, 1);
    assert_eq!(summary.variants, 1);
}

/// Destination files without a source counterpart are left untouched.
#[test]
fn test_unmatched_destination_is_untouched() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(&src.path().join("standard.bjt"), ".model Q1 NPN(BF=100)\n");
    let original = "* keep me\r\n.model M1 NMOS(VTO=1)\r\n";
    write(&dst.path().join("standard.mos"), original);

    let report = run(src.path(), dst.path(), MergeOptions::default());

    assert!(report.written.is_empty());
    assert_eq!(report.source_groups, 1);
    assert_eq!(report.destination_groups, 1);
    assert_eq!(
        fs::read_to_string(dst.path().join("standard.mos")).unwrap(),
        original
    );
}

/// Every destination copy of a name gets merged with the full source set.
#[test]
fn test_each_destination_copy_is_merged() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(&src.path().join("standard.jft"), ".model J1 NJF(VTO=-2)\n");
    write(&dst.path().join("a/standard.jft"), ".model J2 NJF(VTO=-1)\n");
    write(&dst.path().join("b/standard.jft"), ".model J3 PJF(VTO=1)\n");

    let report = run(src.path(), dst.path(), MergeOptions::default());

    assert_eq!(report.written.len(), 2);
    assert_eq!(
        fs::read_to_string(dst.path().join("a/standard.jft")).unwrap(),
        ".model J1 NJF(VTO=-2)\n.model J2 NJF(VTO=-1)\n"
    );
    assert_eq!(
        fs::read_to_string(dst.path().join("b/standard.jft")).unwrap(),
        ".model J1 NJF(VTO=-2)\n.model J3 PJF(VTO=1)\n"
    );
}

/// A file that cannot be converted fails its own group only.
#[test]
fn test_failing_group_does_not_stop_others() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    // Ω has no Latin-1 representation.
    write(&src.path().join("bad.dio"), ".model R1 D(IS=1n mfg=Ω)\n");
    write(&src.path().join("good.dio"), ".model D1 D(IS=1n)\n");
    let bad_original = ".model R2 D(IS=1n)\n";
    write(&dst.path().join("bad.dio"), bad_original);
    write(&dst.path().join("good.dio"), ".model D2 D(IS=2n)\n");

    let report = run(src.path(), dst.path(), MergeOptions::default());

    assert!(!report.is_success());
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].group, "bad.dio");
    assert!(matches!(report.failures[0].error, Error::Text { .. }));
    assert!(report.to_text().contains("Status: FAILED"));

    assert_eq!(
        fs::read_to_string(dst.path().join("bad.dio")).unwrap(),
        bad_original
    );
    assert_eq!(
        fs::read_to_string(dst.path().join("good.dio")).unwrap(),
        ".model D1 D(IS=1n)\n.model D2 D(IS=2n)\n"
    );
}

/// Latin-1 names whose Unicode upper case leaves the code page are written back.
#[test]
fn test_latin1_model_names_round_trip() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(&src.path().join("x.dio"), b".model d10\xb5 D(IS=1n)\n.model Z\xff D(IS=2n)\n");
    write(&dst.path().join("x.dio"), ".model D2 D(IS=3n)\n");

    let report = run(src.path(), dst.path(), MergeOptions::default());

    assert!(report.is_success(), "{}", report.to_text());
    assert_eq!(
        fs::read(dst.path().join("x.dio")).unwrap(),
        b".model D10\xb5 D(IS=1n)\n.model D2 D(IS=3n)\n.model Z\xff D(IS=2n)\n"
    );
}

/// Bytes that only look like UTF-8 are read as Latin-1 instead of failing the group.
#[test]
fn test_malformed_utf8_falls_back_to_latin1() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(&src.path().join("y.dio"), b".model D1 D(IS=1n mfg=\xc1\xa0)\n");
    write(&dst.path().join("y.dio"), ".model D2 D(IS=2n)\n");

    let report = run(src.path(), dst.path(), MergeOptions::default());

    assert!(report.is_success(), "{}", report.to_text());
    assert_eq!(
        fs::read(dst.path().join("y.dio")).unwrap(),
        b".model D1 D(IS=1n mfg=\xc1\xa0)\n.model D2 D(IS=2n)\n"
    );
}

/// Progress events arrive in processing order.
#[test]
fn test_progress_order() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(&src.path().join("standard.dio"), ".model D1 D(IS=1n)\n");
    write(&dst.path().join("standard.dio"), ".model D2 D(IS=1n)\n");

    let log = MessageLog::new();
    MergePipeline::default()
        .run(src.path(), dst.path(), &log)
        .unwrap();

    let messages = log.messages();
    assert_eq!(messages.len(), 6);
    assert!(messages[0].starts_with("- Scanning Source folder"));
    assert_eq!(messages[1], "- Found 1 files in Source folder");
    assert!(messages[2].starts_with("- Scanning Destination folder"));
    assert_eq!(messages[3], "- Found 1 files in Destination folder");
    assert!(messages[4].starts_with("- Processing file"));
    assert!(messages[5].starts_with("- Writing merged result to file"));
}

/// Parallel mode produces the same files and report order as sequential mode.
#[test]
fn test_parallel_matches_sequential() {
    let src = tempfile::tempdir().unwrap();
    let seq = tempfile::tempdir().unwrap();
    let par = tempfile::tempdir().unwrap();

    for i in 0..8 {
        let name = format!("lib{i}.mos");
        write(
            &src.path().join(&name),
            format!(".model M{i} NMOS(VTO={i})\n.model M{i} NMOS(VTO={i} KP=2e-5)\n"),
        );
        for root in [seq.path(), par.path()] {
            write(&root.join(&name), format!(".model P{i} PMOS(VTO=-{i})\n"));
        }
    }

    let sequential = run(src.path(), seq.path(), MergeOptions::default());
    let parallel = run(
        src.path(),
        par.path(),
        MergeOptions {
            parallel: true,
            ..Default::default()
        },
    );

    assert_eq!(sequential.written.len(), 8);
    assert_eq!(parallel.written.len(), 8);
    assert_eq!(sequential.summary(), parallel.summary());
    for (a, b) in sequential.written.iter().zip(&parallel.written) {
        assert_eq!(a.path.file_name(), b.path.file_name());
        assert_eq!(
            fs::read_to_string(&a.path).unwrap(),
            fs::read_to_string(&b.path).unwrap()
        );
    }
}

/// Custom extensions select other library files.
#[test]
fn test_custom_extensions() {
    let src = tempfile::tempdir().unwrap();
    let dst = tempfile::tempdir().unwrap();

    write(&src.path().join("opamps.lib"), ".model U1 OPAMP(GAIN=1e5)\n");
    write(&dst.path().join("opamps.lib"), "");
    write(&src.path().join("standard.dio"), ".model D1 D(IS=1n)\n");
    write(&dst.path().join("standard.dio"), "");

    let options = MergeOptions::from_toml_str("[scan]\nextensions = [\"lib\"]\n").unwrap();
    let report = run(src.path(), dst.path(), options);

    assert_eq!(report.written.len(), 1);
    assert_eq!(
        fs::read_to_string(dst.path().join("opamps.lib")).unwrap(),
        ".model U1 OPAMP(GAIN=1e5)\n"
    );
    assert_eq!(fs::read_to_string(dst.path().join("standard.dio")).unwrap(), "");
}

/// A missing root aborts the run before anything is written.
#[test]
fn test_missing_root() {
    let dst = tempfile::tempdir().unwrap();
    let result = MergePipeline::default().run(
        &dst.path().join("missing"),
        dst.path(),
        &|_: &Progress| {},
    );
    assert!(matches!(result, Err(Error::RootNotFound(_))));
}
