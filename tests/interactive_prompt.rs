use std::io::Cursor;

use social_engagement::interactive::{run_prompt_loop, AnalysisSession, SessionStats, UploadOutcome};
use social_engagement::pipeline::AnalysisOptions;
use social_engagement::ErrorKind;

fn run(script: &str) -> (String, SessionStats) {
    let mut session = AnalysisSession::new(AnalysisOptions::default());
    let mut out = Vec::new();
    let stats = run_prompt_loop(Cursor::new(script), &mut out, &mut session).unwrap();
    (String::from_utf8(out).unwrap(), stats)
}

#[test]
fn bad_file_is_reported_and_prompt_continues() {
    let (out, stats) = run("tests/fixtures/does_not_exist.csv\n\ntests/fixtures/social_media_data.csv\nquit\n");

    assert_eq!(stats, SessionStats { accepted: 1, rejected: 1 });
    let err_at = out.find("error: file not found").unwrap();
    let retry_at = out.find("Please provide another CSV file.").unwrap();
    let done_at = out.find("Analysis complete!").unwrap();
    assert!(err_at < retry_at && retry_at < done_at);
    assert!(out.contains("Top Engaging Posts"));
}

#[test]
fn quit_stops_before_remaining_lines() {
    let (out, stats) = run("exit\ntests/fixtures/social_media_data.csv\n");
    assert_eq!(stats, SessionStats::default());
    assert!(!out.contains("Analysis complete!"));
}

#[test]
fn eof_ends_the_session() {
    let (_, stats) = run("tests/fixtures/missing_column.csv\ntests/fixtures/non_numeric.csv");
    assert_eq!(stats, SessionStats { accepted: 0, rejected: 2 });
}

#[test]
fn uploads_are_retryable_by_kind() {
    let mut session = AnalysisSession::new(AnalysisOptions::default());

    match session.submit_upload("upload.csv", b"") {
        UploadOutcome::Retry { kind, .. } => assert_eq!(kind, ErrorKind::Parse),
        other => panic!("expected retry, got {other:?}"),
    }
    let good = std::fs::read("tests/fixtures/messy_headers.csv").unwrap();
    assert!(session.submit_upload("upload.csv", &good).is_ready());
    assert_eq!(session.stats(), SessionStats { accepted: 1, rejected: 1 });
}
