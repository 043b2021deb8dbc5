//! API router.
//!
//! Returns a composable `Router` that can be mounted on any axum server.
//! Routes are nested under `/api/`.
//!
//! Middleware stack (outermost → innermost): CORS → access log.

use std::sync::Arc;

use axum::routing::{delete, get, post, put};
use axum::Router;
use tower_http::cors::CorsLayer;

use crate::api::endpoints;
use crate::api::middleware;
use crate::api::types::ApiContext;
use crate::core_state::CoreState;

/// Build the API router with all endpoints under `/api/`.
pub fn api_router(core: Arc<CoreState>) -> Router {
    build_router(ApiContext::new(core))
}

fn build_router(ctx: ApiContext) -> Router {
    // NOTE: Path params use `:param` syntax (matchit 0.7 / axum 0.7).
    let routes = Router::new()
        .route("/health", get(endpoints::health::check))
        .route("/questions", get(endpoints::questions::list))
        .route("/wizard", get(endpoints::wizard::view))
        .route("/wizard/good-day", post(endpoints::wizard::good_day))
        .route("/wizard/not-good", post(endpoints::wizard::not_good))
        .route("/wizard/answers/:id", put(endpoints::wizard::set_answer))
        .route("/wizard/answers/:id/toggle", post(endpoints::wizard::toggle))
        .route("/wizard/next", post(endpoints::wizard::next))
        .route("/wizard/back", post(endpoints::wizard::back))
        .route("/wizard/reset", post(endpoints::wizard::reset))
        .route("/history", get(endpoints::analysis::history))
        .route("/analysis", get(endpoints::analysis::status))
        .route("/journal", get(endpoints::journal::agenda))
        .route("/journal/events", post(endpoints::journal::add))
        .route("/journal/events/:id", delete(endpoints::journal::remove))
        .route("/journal/export", get(endpoints::journal::export))
        .route("/medications", get(endpoints::medications::list))
        .route("/medical-file/summaries", get(endpoints::medical_file::summaries))
        .route(
            "/medical-file/sensitivities",
            get(endpoints::medical_file::sensitivities),
        )
        .route("/doctors", get(endpoints::appointments::doctors))
        .route(
            "/appointments",
            get(endpoints::appointments::list).post(endpoints::appointments::book),
        )
        .route("/appointments/slots", get(endpoints::appointments::slots))
        .route("/appointments/days", get(endpoints::appointments::days))
        .route("/navigation/menu", get(endpoints::navigation::menu_items))
        .route("/navigation/resolve", get(endpoints::navigation::resolve))
        .route("/strings", get(endpoints::navigation::strings))
        .with_state(ctx)
        .layer(axum::middleware::from_fn(middleware::audit::log_access));

    Router::new()
        .nest("/api", routes)
        .layer(CorsLayer::permissive())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use axum::response::Response;
    use tower::ServiceExt;

    use crate::analysis::MockLlmClient;

    fn test_core() -> Arc<CoreState> {
        Arc::new(CoreState::in_memory(Arc::new(MockLlmClient::new("Stable"))))
    }

    fn make_request(method: &str, uri: &str, body: Option<serde_json::Value>) -> Request<Body> {
        let builder = Request::builder().method(method).uri(uri);
        match body {
            Some(json) => builder
                .header("Content-Type", "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        }
    }

    async fn call(
        core: &Arc<CoreState>,
        method: &str,
        uri: &str,
        body: Option<serde_json::Value>,
    ) -> Response {
        api_router(core.clone())
            .oneshot(make_request(method, uri, body))
            .await
            .unwrap()
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_ok() {
        let core = test_core();
        let response = call(&core, "GET", "/api/health", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["app"], "AwareCare");
    }

    #[tokio::test]
    async fn unknown_route_is_404() {
        let core = test_core();
        let response = call(&core, "GET", "/api/nothing", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn questions_are_localized() {
        let core = test_core();
        let json = body_json(call(&core, "GET", "/api/questions?lang=en", None).await).await;
        let list = json.as_array().unwrap();
        assert_eq!(list.len(), 31);
        assert_eq!(list[0]["id"], "disease_stage");
        assert!(list[0]["title"].as_str().unwrap().is_ascii());
    }

    #[tokio::test]
    async fn good_day_records_quick_log() {
        let core = test_core();
        let json = body_json(call(&core, "POST", "/api/wizard/good-day", None).await).await;
        assert_eq!(json["phase"], "not_started");
        assert_eq!(json["response"]["kind"], "quick");
        let json = body_json(call(&core, "GET", "/api/wizard", None).await).await;
        assert!(json.get("response").is_none());

        let history = body_json(call(&core, "GET", "/api/history", None).await).await;
        assert_eq!(history.as_array().unwrap().len(), 1);
        let analysis = body_json(call(&core, "GET", "/api/analysis", None).await).await;
        assert_eq!(analysis["status"], "idle");
    }

    #[tokio::test]
    async fn wizard_flow_over_http() {
        let core = test_core();
        let json = body_json(call(&core, "POST", "/api/wizard/not-good?lang=en", None).await).await;
        assert_eq!(json["phase"], "in_progress");
        assert_eq!(json["step"], 1);
        assert_eq!(json["question"]["id"], "disease_stage");
        assert_eq!(json["can_advance"], false);

        let response = call(&core, "POST", "/api/wizard/next", None).await;
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

        let json = body_json(
            call(
                &core,
                "PUT",
                "/api/wizard/answers/disease_stage",
                Some(serde_json::json!({ "value": "moderate" })),
            )
            .await,
        )
        .await;
        assert_eq!(json["can_advance"], true);

        let json = body_json(call(&core, "POST", "/api/wizard/next", None).await).await;
        assert_eq!(json["step"], 2);

        let json = body_json(call(&core, "POST", "/api/wizard/back", None).await).await;
        assert_eq!(json["step"], 1);
        assert_eq!(json["answer"], "moderate");

        let json = body_json(call(&core, "POST", "/api/wizard/reset", None).await).await;
        assert_eq!(json["phase"], "not_started");
        assert!(json["answers"].is_null());
    }

    /// Answer whatever the session shows until it finishes.
    async fn answer_to_completion(core: &Arc<CoreState>) -> (usize, serde_json::Value) {
        let mut view =
            body_json(call(core, "POST", "/api/wizard/not-good?lang=en", None).await).await;
        let mut steps = 0;
        while view["phase"] == "in_progress" {
            assert!(steps < 100, "wizard never finished");
            let question = &view["question"];
            let id = question["id"].as_str().unwrap().to_string();
            let first = question["options"][0]["value"].clone();
            match question["type"].as_str().unwrap() {
                "single-choice" => {
                    let uri = format!("/api/wizard/answers/{id}");
                    call(core, "PUT", &uri, Some(serde_json::json!({ "value": first }))).await;
                }
                "multi-choice" => {
                    let uri = format!("/api/wizard/answers/{id}/toggle");
                    call(core, "POST", &uri, Some(serde_json::json!({ "value": first }))).await;
                }
                "number" => {
                    let value = question["min"].as_f64().unwrap_or(1.0);
                    let uri = format!("/api/wizard/answers/{id}");
                    call(core, "PUT", &uri, Some(serde_json::json!({ "value": value }))).await;
                }
                "free-text" => {
                    let uri = format!("/api/wizard/answers/{id}");
                    call(core, "PUT", &uri, Some(serde_json::json!({ "value": "ok" }))).await;
                }
                _ => {}
            }
            let response = call(core, "POST", "/api/wizard/next?lang=en", None).await;
            assert_eq!(response.status(), StatusCode::OK, "step {id}");
            view = body_json(response).await;
            steps += 1;
        }
        (steps, view)
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn full_questionnaire_runs_one_analysis() {
        let mock = Arc::new(MockLlmClient::new("Stable"));
        let core = Arc::new(CoreState::in_memory(mock.clone()));

        let (steps, view) = answer_to_completion(&core).await;
        assert!(steps > 1);
        assert_eq!(view["phase"], "not_started");
        assert_eq!(view["response"]["kind"], "full");

        let mut status = serde_json::Value::Null;
        for _ in 0..100 {
            status = body_json(call(&core, "GET", "/api/analysis", None).await).await;
            if status["status"] == "ready" {
                break;
            }
            tokio::time::sleep(std::time::Duration::from_millis(50)).await;
        }
        assert_eq!(status["status"], "ready");
        assert_eq!(status["text"], "Stable");

        let history = body_json(call(&core, "GET", "/api/history", None).await).await;
        let history = history.as_array().unwrap();
        assert_eq!(history.len(), 1);
        assert_eq!(history[0]["kind"], "full");
        assert_eq!(mock.call_count(), 1);

        let response = call(&core, "POST", "/api/wizard/back", None).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[tokio::test]
    async fn answer_errors_map_to_statuses() {
        let core = test_core();
        let response = call(
            &core,
            "PUT",
            "/api/wizard/answers/disease_stage",
            Some(serde_json::json!({ "value": "moderate" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        call(&core, "POST", "/api/wizard/not-good", None).await;
        let response = call(
            &core,
            "PUT",
            "/api/wizard/answers/no_such_question",
            Some(serde_json::json!({ "value": "x" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = call(
            &core,
            "PUT",
            "/api/wizard/answers/disease_stage",
            Some(serde_json::json!({ "value": "terminal" })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["error"]["code"], "BAD_REQUEST");
    }

    #[tokio::test]
    async fn journal_add_list_remove() {
        let core = test_core();
        let response = call(
            &core,
            "POST",
            "/api/journal/events",
            Some(serde_json::json!({
                "type": "APPOINTMENT",
                "title": "  Neurologist  ",
                "date": "2025-07-24",
                "time": "10:30",
                "notes": null
            })),
        )
        .await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let event = body_json(response).await;
        assert_eq!(event["title"], "Neurologist");
        let id = event["id"].as_str().unwrap().to_string();

        let agenda =
            body_json(call(&core, "GET", "/api/journal?date=2025-07-24&lang=en", None).await).await;
        let entries = agenda["entries"].as_array().unwrap();
        assert_eq!(entries.len(), 12);
        assert_eq!(entries.iter().filter(|e| e["removable"] == true).count(), 1);

        let response = call(&core, "DELETE", &format!("/api/journal/events/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        let response = call(&core, "DELETE", &format!("/api/journal/events/{id}"), None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn journal_rejects_bad_date() {
        let core = test_core();
        let response = call(&core, "GET", "/api/journal?date=24/07/2025", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn journal_export_is_ics_attachment() {
        let core = test_core();
        let response = call(&core, "GET", "/api/journal/export?lang=en", None).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response.headers().get("content-type").unwrap(),
            "text/calendar; charset=utf-8"
        );
        let disposition = response.headers().get("content-disposition").unwrap();
        assert!(disposition.to_str().unwrap().contains("awarecare_journal.ics"));
        let bytes = to_bytes(response.into_body(), 1 << 20).await.unwrap();
        let text = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(text.starts_with("BEGIN:VCALENDAR\r\n"));
        assert!(text.ends_with("END:VCALENDAR\r\n"));
    }

    #[tokio::test]
    async fn medications_include_schedule() {
        let core = test_core();
        let json = body_json(call(&core, "GET", "/api/medications?lang=en", None).await).await;
        assert_eq!(json["active"].as_array().unwrap().len(), 9);
        assert_eq!(json["stopped"].as_array().unwrap().len(), 7);
        assert_eq!(json["schedule"].as_array().unwrap().len(), 11);
        assert!(json["next_dose"].is_object());
    }

    #[tokio::test]
    async fn medical_file_sections() {
        let core = test_core();
        let json =
            body_json(call(&core, "GET", "/api/medical-file/summaries?lang=en", None).await).await;
        let visits = json.as_array().unwrap();
        assert_eq!(visits.len(), 2);
        assert_eq!(visits[0]["date"], "15/01/2024");
        assert_eq!(visits[0]["doctor"], "Psychogeriatrician");

        let json = body_json(call(&core, "GET", "/api/medical-file/sensitivities", None).await).await;
        let drugs = json.as_array().unwrap();
        assert_eq!(drugs.len(), 2);
        assert_eq!(drugs[1]["name"], "סולפה");
    }

    #[tokio::test]
    async fn booking_over_http() {
        let core = test_core();
        let doctors = body_json(call(&core, "GET", "/api/doctors?lang=en", None).await).await;
        assert_eq!(doctors.as_array().unwrap().len(), 4);

        let slots = body_json(
            call(&core, "GET", "/api/appointments/slots?doctor_id=d1&date=2025-07-24", None).await,
        )
        .await;
        let first = slots["slots"][0].as_str().unwrap().to_string();

        let request = serde_json::json!({
            "doctor_id": "d1",
            "date": "2025-07-24",
            "time": first,
            "reason": null
        });
        let response = call(&core, "POST", "/api/appointments?lang=en", Some(request.clone())).await;
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = call(&core, "POST", "/api/appointments", Some(request)).await;
        assert_eq!(response.status(), StatusCode::CONFLICT);

        let booked = body_json(call(&core, "GET", "/api/appointments", None).await).await;
        assert_eq!(booked.as_array().unwrap().len(), 1);
        assert_eq!(core.journal().list().len(), 1);
    }

    #[tokio::test]
    async fn slots_validate_input() {
        let core = test_core();
        let response =
            call(&core, "GET", "/api/appointments/slots?doctor_id=d9&date=2025-07-24", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let response =
            call(&core, "GET", "/api/appointments/slots?doctor_id=d1&date=tomorrow", None).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn week_days_and_menu() {
        let core = test_core();
        let days = body_json(call(&core, "GET", "/api/appointments/days", None).await).await;
        assert_eq!(days.as_array().unwrap().len(), 7);

        let menu = body_json(call(&core, "GET", "/api/navigation/menu?lang=en", None).await).await;
        assert_eq!(menu["menu"].as_array().unwrap().len(), 8);
        assert_eq!(menu["medical_file"].as_array().unwrap().len(), 6);
    }

    #[tokio::test]
    async fn resolve_paths() {
        let core = test_core();
        let json = body_json(
            call(&core, "GET", "/api/navigation/resolve?path=/medical-file/meds/&lang=en", None).await,
        )
        .await;
        assert_eq!(json["view"], "meds");
        assert_eq!(json["back"], "/medical-file");

        let json = body_json(call(&core, "GET", "/api/navigation/resolve?path=/", None).await).await;
        assert_eq!(json["view"], "home");
        assert!(json["back"].is_null());

        let response = call(&core, "GET", "/api/navigation/resolve?path=/nowhere", None).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn strings_table() {
        let core = test_core();
        let json = body_json(call(&core, "GET", "/api/strings?lang=en", None).await).await;
        assert_eq!(json["vibeGood"], "Great, no change");
        let json = body_json(call(&core, "GET", "/api/strings", None).await).await;
        assert_eq!(json["vibeGood"], "מצוין, אין שינוי");
    }
}
