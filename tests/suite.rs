mod common;

use restquest::Harness;
use restquest::outputter::OutPutter;
use restquest::parser::Quest;
use restquest::runner::CaseResult;
use restquest::runner::run_cases;
use restquest::validator::Validator;

use crate::common::reqres_stub;
use crate::common::suite_path;

#[test]
fn shipped_suite_validates() {
    let path = suite_path();
    let src = std::fs::read_to_string(&path).unwrap();
    let quest: Quest = toml::from_str(&src).unwrap();

    let ir = Validator::new(&quest, &src, path.to_str().unwrap())
        .validate()
        .unwrap();

    assert_eq!(ir.cases.len(), 12);
    assert_eq!(ir.setup.base_url, "https://reqres.in");
    assert!(ir.setup.fixtures_dir.join("user.json").is_file());
    assert!(ir.setup.fixtures_dir.join("users.json").is_file());
}

#[tokio::test]
async fn shipped_suite_passes_against_stub() {
    let server = reqres_stub().await;

    let path = suite_path();
    let src = std::fs::read_to_string(&path).unwrap();
    let quest: Quest = toml::from_str(&src).unwrap();
    let ir = Validator::new(&quest, &src, path.to_str().unwrap())
        .with_base_url(Some(server.uri()))
        .validate()
        .unwrap();

    let n_tests = ir.cases.len();
    let harness: Harness = Harness::default().with_fixtures_dir(ir.setup.fixtures_dir);
    let (tx, rx) = flume::unbounded::<CaseResult>();

    let outputter =
        tokio::spawn(async move { OutPutter::start(rx, "reqres.toml", n_tests).await });
    run_cases(ir.cases, &harness, tx).await.unwrap();

    let summary = outputter.await.unwrap();
    assert_eq!(summary.passed, n_tests);
    assert!(summary.all_passed());
}

#[tokio::test]
async fn failures_are_counted_not_fatal() {
    let server = reqres_stub().await;

    let src = r#"
        [setup]
        base_url = "https://reqres.in"

        [[tests]]
        name = "expects the wrong status"
        method = "GET"
        url = "/api/users/23"
        assert_status = 200

        [[tests]]
        name = "still runs after a failure"
        method = "DELETE"
        url = "/api/users/2"
        assert_status = 204
    "#;
    let quest: Quest = toml::from_str(src).unwrap();
    let ir = Validator::new(&quest, src, "inline.toml")
        .with_base_url(Some(server.uri()))
        .validate()
        .unwrap();

    let harness: Harness = Harness::default();
    let (tx, rx) = flume::unbounded::<CaseResult>();
    run_cases(ir.cases, &harness, tx).await.unwrap();

    let results: Vec<CaseResult> = rx.drain().collect();
    assert_eq!(results.len(), 2);
    assert!(!results[0].passed());
    assert!(results[1].passed());
}
