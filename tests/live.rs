//! Runs the shipped suite against the real https://reqres.in.
//!
//! These depend on a third-party service and its current data, so they are
//! only built with `--features live`.

#![cfg(feature = "live")]

mod common;

use std::time::Duration;

use restquest::Harness;
use restquest::ReqwestTransport;
use restquest::parser::Quest;
use restquest::runner::CaseResult;
use restquest::runner::run_cases;
use restquest::validator::Validator;

use crate::common::suite_path;

#[tokio::test]
async fn reqres_contract_holds() {
    common::init();

    let path = suite_path();
    let src = std::fs::read_to_string(&path).unwrap();
    let quest: Quest = toml::from_str(&src).unwrap();
    let ir = Validator::new(&quest, &src, path.to_str().unwrap())
        .validate()
        .unwrap();

    let timeout = ir.setup.timeout.unwrap_or(Duration::from_secs(30));
    let transport = ReqwestTransport::with_timeout(timeout).unwrap();
    let harness = Harness::new(transport).with_fixtures_dir(ir.setup.fixtures_dir);
    let (tx, rx) = flume::unbounded::<CaseResult>();

    run_cases(ir.cases, &harness, tx).await.unwrap();

    let failures: Vec<String> = rx
        .drain()
        .filter_map(|result| {
            result
                .outcome
                .err()
                .map(|error| format!("{}: {error}", result.name))
        })
        .collect();

    assert!(failures.is_empty(), "{failures:#?}");
}
