mod support;

use serde_json::Value;
use support::{TEST_ANALYSIS_DELAY, get, send_empty, send_json, spawn_app, unconfigured_app};

async fn wait_for_verdict(addr: std::net::SocketAddr, id: u32) -> Value {
    for _ in 0..50 {
        tokio::time::sleep(TEST_ANALYSIS_DELAY).await;
        let (status, view) = get(addr, &format!("/api/jobs/{id}/completion")).await;
        assert_eq!(status, 200);
        if view["analyzing"] == false {
            return view;
        }
    }
    panic!("analysis for job {id} never resolved");
}

#[tokio::test]
async fn jobs_are_listed_in_start_order() {
    let addr = spawn_app(unconfigured_app()).await;
    let (status, jobs) = get(addr, "/api/jobs").await;
    assert_eq!(status, 200);
    let ids: Vec<i64> = jobs
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["id"].as_i64().unwrap())
        .collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(jobs[0]["status"], "not_started");
    assert_eq!(jobs[0]["start"], "07:30");
}

#[tokio::test]
async fn bad_and_unknown_job_ids() {
    let addr = spawn_app(unconfigured_app()).await;
    let (status, json) = get(addr, "/api/jobs/abc").await;
    assert_eq!(status, 400);
    assert_eq!(json["error"], "invalid job id");

    let (status, _) = get(addr, "/api/jobs/99").await;
    assert_eq!(status, 404);
    let (status, _) = send_empty(addr, "POST", "/api/jobs/99/analyze").await;
    assert_eq!(status, 404);
}

#[tokio::test]
async fn completion_flow_meets_spec() {
    let addr = spawn_app(unconfigured_app()).await;

    let (status, view) = send_empty(addr, "POST", "/api/jobs/1/completion").await;
    assert_eq!(status, 200);
    assert_eq!(view["state"], "in_progress");

    let body = r#"{"asBuilt":true,"photos":true,"siteClean":true,"materialsReconciled":true}"#;
    let (status, _) = send_json(addr, "PATCH", "/api/jobs/1/checklist", body).await;
    assert_eq!(status, 200);
    let (status, view) = send_json(addr, "PUT", "/api/jobs/1/photos", r#"{"count":4}"#).await;
    assert_eq!(status, 200);
    assert_eq!(view["photoCount"], 4);
    let (status, view) =
        send_json(addr, "PUT", "/api/jobs/1/design-change", r#"{"kind":"built"}"#).await;
    assert_eq!(status, 200);
    assert_eq!(view["designChange"], "no");

    let (status, view) = send_empty(addr, "POST", "/api/jobs/1/analyze").await;
    assert_eq!(status, 202);
    assert_eq!(view["analyzing"], true);

    let view = wait_for_verdict(addr, 1).await;
    assert_eq!(view["state"], "meets_spec");
    assert_eq!(view["message"], "Meets Spec: all checks passed.");
}

#[tokio::test]
async fn zero_photos_needs_go_back() {
    let addr = spawn_app(unconfigured_app()).await;
    let body = r#"{"asBuilt":true,"photos":true,"siteClean":true,"materialsReconciled":true}"#;
    send_json(addr, "PATCH", "/api/jobs/2/checklist", body).await;
    send_json(addr, "PUT", "/api/jobs/2/design-change", r#"{"designChange":false}"#).await;

    send_empty(addr, "POST", "/api/jobs/2/analyze").await;
    let view = wait_for_verdict(addr, 2).await;
    assert_eq!(view["state"], "needs_go_back");
}

#[tokio::test]
async fn finalize_and_stage_next_then_conflict() {
    let addr = spawn_app(unconfigured_app()).await;

    let (status, outcome) =
        send_json(addr, "POST", "/api/jobs/1/finalize", r#"{"stageNext":true}"#).await;
    assert_eq!(status, 200);
    assert_eq!(
        outcome,
        serde_json::json!({"finalized": true, "staged": true, "nextJobId": 2})
    );

    let (_, next) = get(addr, "/api/jobs/2").await;
    assert_eq!(next["pinSent"], true);
    assert_eq!(next["tailboardOpen"], true);
    assert_eq!(next["timesheetStarted"], true);

    let (status, json) = send_json(addr, "PUT", "/api/jobs/1/photos", r#"{"count":1}"#).await;
    assert_eq!(status, 409);
    assert!(json["error"].as_str().unwrap().contains("finalized"));

    // idempotent
    let (status, _) = send_empty(addr, "POST", "/api/jobs/1/finalize").await;
    assert_eq!(status, 200);

    let (_, activity) = get(addr, "/api/activity").await;
    let messages: Vec<&str> = activity
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["message"].as_str().unwrap())
        .collect();
    assert!(messages.contains(&"Timesheet started for “Transformer Swap • Oak Ridge”."));
}

#[tokio::test]
async fn finalize_last_job_touches_no_other_job() {
    let addr = spawn_app(unconfigured_app()).await;
    let (status, outcome) =
        send_json(addr, "POST", "/api/jobs/3/finalize", r#"{"stageNext":true}"#).await;
    assert_eq!(status, 200);
    assert_eq!(outcome["nextJobId"], Value::Null);

    let (_, jobs) = get(addr, "/api/jobs").await;
    for job in jobs.as_array().unwrap().iter().take(2) {
        assert_eq!(job["pinSent"], false);
        assert_eq!(job["tailboardOpen"], false);
    }
    assert_eq!(jobs[2]["status"], "finalized");
}

#[tokio::test]
async fn materials_staging() {
    let addr = spawn_app(unconfigured_app()).await;
    let (_, before) = get(addr, "/api/jobs/materials").await;
    assert_eq!(before["staged"], false);

    let (status, staged) = send_empty(addr, "POST", "/api/jobs/materials/stage").await;
    assert_eq!(status, 200);
    assert_eq!(staged["staged"], true);
    assert_eq!(staged["materials"].as_array().unwrap().len(), 8);
}

#[tokio::test]
async fn invalid_workflow_bodies_are_rejected() {
    let addr = spawn_app(unconfigured_app()).await;
    let (status, _) = send_json(addr, "PUT", "/api/jobs/1/photos", "{}").await;
    assert_eq!(status, 400);
    let (status, _) = send_json(addr, "PUT", "/api/jobs/1/photos", r#"{"count":-1}"#).await;
    assert_eq!(status, 400);
    let (status, _) = send_json(addr, "PUT", "/api/jobs/1/design-change", "{}").await;
    assert_eq!(status, 400);
    let (status, _) = send_json(addr, "PATCH", "/api/jobs/1/checklist", "[").await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn tailboard_hazard_notes_round_trip() {
    let addr = spawn_app(unconfigured_app()).await;
    let (status, job) = send_json(
        addr,
        "PUT",
        "/api/jobs/2/tailboard",
        r#"{"hazardNotes":"  traffic control, energized equipment "}"#,
    )
    .await;
    assert_eq!(status, 200);
    assert_eq!(job["hazardNotes"], "traffic control, energized equipment");

    let (_, fetched) = get(addr, "/api/jobs/2").await;
    assert_eq!(fetched["hazardNotes"], "traffic control, energized equipment");

    let (status, cleared) =
        send_json(addr, "PUT", "/api/jobs/2/tailboard", r#"{"hazardNotes":null}"#).await;
    assert_eq!(status, 200);
    assert_eq!(cleared["hazardNotes"], Value::Null);

    let (status, _) = send_json(addr, "PUT", "/api/jobs/99/tailboard", "{}").await;
    assert_eq!(status, 404);
    let (status, _) =
        send_json(addr, "PUT", "/api/jobs/2/tailboard", r#"{"hazardNotes":7}"#).await;
    assert_eq!(status, 400);
}

#[tokio::test]
async fn opening_a_tailboard_closes_the_previous_one() {
    let addr = spawn_app(unconfigured_app()).await;
    let (status, first) = send_empty(addr, "POST", "/api/jobs/1/tailboard").await;
    assert_eq!(status, 200);
    assert_eq!(first["tailboardOpen"], true);

    send_empty(addr, "POST", "/api/jobs/2/tailboard").await;
    let (_, jobs) = get(addr, "/api/jobs").await;
    let open: Vec<bool> = jobs
        .as_array()
        .unwrap()
        .iter()
        .map(|j| j["tailboardOpen"].as_bool().unwrap())
        .collect();
    assert_eq!(open, vec![false, true, false]);
    assert_eq!(jobs[0]["timesheetStarted"], true);
}
