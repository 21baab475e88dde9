//! Integration tests for student records: activities, qualifications,
//! sessions and CV uploads, including the verification life cycle.

mod common;

#[cfg(test)]
mod record_tests {
    use super::common::*;
    use axum_test::multipart::{MultipartForm, Part};
    use serde_json::json;
    use sqlx::SqlitePool;

    // ============================================================
    // Student-scoped listing
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_student_lists_own_activities(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .get("/students/4/activities")
            .authorization_bearer(sara_token())
            .await;

        response.assert_status_ok();
        let activities: Vec<serde_json::Value> = response.json();
        assert_eq!(activities.len(), 2);
        assert!(activities.iter().all(|a| a["student_id"] == 4));

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_student_cannot_read_another_students_records(
        pool: SqlitePool,
    ) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        server
            .get("/students/4/activities")
            .authorization_bearer(simon_token())
            .await
            .assert_status_forbidden();

        server
            .get("/students/4/qualifications")
            .authorization_bearer(simon_token())
            .await
            .assert_status_forbidden();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_mentor_access_follows_assignments(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Marta is assigned to Sara, Milo is not.
        server
            .get("/students/4/sessions")
            .authorization_bearer(marta_token())
            .await
            .assert_status_ok();

        server
            .get("/students/4/sessions")
            .authorization_bearer(milo_token())
            .await
            .assert_status_forbidden();

        // Admins always pass.
        server
            .get("/students/4/cvs")
            .authorization_bearer(admin_token())
            .await
            .assert_status_ok();

        // No token at all.
        server.get("/students/4/activities").await.assert_status_unauthorized();

        Ok(())
    }

    // ============================================================
    // Creation and editing
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_student_logs_activity(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "title": "Night shift shadowing",
            "description": "A&E observation",
            "activity_date": "2025-07-01",
            "hours": 6.0
        });

        let response = server
            .post("/activities")
            .authorization_bearer(sara_token())
            .json(&body)
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let activity: serde_json::Value = response.json();
        assert_eq!(activity["student_id"], 4);
        assert_eq!(activity["status"], "pending");
        assert!(activity["verified_by"].is_null());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_mentor_cannot_log_records(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "title": "Not mine to log",
            "activity_date": "2025-07-01",
            "hours": 1.0
        });

        server
            .post("/activities")
            .authorization_bearer(marta_token())
            .json(&body)
            .await
            .assert_status_forbidden();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_activity_validation(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "title": "",
            "activity_date": "2025-07-01",
            "hours": 30.0
        });

        server
            .post("/activities")
            .authorization_bearer(sara_token())
            .json(&body)
            .await
            .assert_status_bad_request();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_owner_edits_pending_record(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Activity 1 is Sara's and still pending.
        let response = server
            .patch("/activities/1")
            .authorization_bearer(sara_token())
            .json(&json!({ "hours": 5.0 }))
            .await;

        response.assert_status_ok();
        let activity: serde_json::Value = response.json();
        assert_eq!(activity["hours"], 5.0);
        assert_eq!(activity["title"], "Ward shadowing");

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_reviewed_record_is_frozen(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Activity 2 has already been verified.
        server
            .patch("/activities/2")
            .authorization_bearer(sara_token())
            .json(&json!({ "hours": 10.0 }))
            .await
            .assert_status_conflict();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_only_owner_edits(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Activity 3 belongs to Simon.
        server
            .patch("/activities/3")
            .authorization_bearer(sara_token())
            .json(&json!({ "hours": 2.0 }))
            .await
            .assert_status_forbidden();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_delete_owner_or_admin(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Another student may not delete.
        server
            .delete("/activities/1")
            .authorization_bearer(simon_token())
            .await
            .assert_status_forbidden();

        // The owner may.
        server
            .delete("/activities/1")
            .authorization_bearer(sara_token())
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        // And so may an admin.
        server
            .delete("/activities/3")
            .authorization_bearer(admin_token())
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        Ok(())
    }

    // ============================================================
    // Verification
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_assigned_mentor_verifies_activity(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .patch("/activities/1/status")
            .authorization_bearer(marta_token())
            .json(&json!({ "status": "verified" }))
            .await;

        response.assert_status_ok();
        let activity: serde_json::Value = response.json();
        assert_eq!(activity["status"], "verified");
        assert_eq!(activity["verified_by"], 2);
        assert!(activity["verified_at"].is_string());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_unassigned_mentor_cannot_verify(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Milo is not Sara's mentor.
        server
            .patch("/activities/1/status")
            .authorization_bearer(milo_token())
            .json(&json!({ "status": "verified" }))
            .await
            .assert_status_forbidden();

        // Students never verify, not even their own records.
        server
            .patch("/activities/1/status")
            .authorization_bearer(sara_token())
            .json(&json!({ "status": "verified" }))
            .await
            .assert_status_forbidden();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_reset_to_pending_clears_stamps(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // Activity 2 is verified by Marta; an admin sends it back.
        let response = server
            .patch("/activities/2/status")
            .authorization_bearer(admin_token())
            .json(&json!({ "status": "pending" }))
            .await;

        response.assert_status_ok();
        let activity: serde_json::Value = response.json();
        assert_eq!(activity["status"], "pending");
        assert!(activity["verified_by"].is_null());
        assert!(activity["verified_at"].is_null());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments", "records")))]
    async fn test_qualification_and_session_verification(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .patch("/qualifications/1/status")
            .authorization_bearer(admin_token())
            .json(&json!({ "status": "verified" }))
            .await;
        response.assert_status_ok();
        let qualification: serde_json::Value = response.json();
        assert_eq!(qualification["verified_by"], 1);

        let response = server
            .patch("/sessions/1/status")
            .authorization_bearer(marta_token())
            .json(&json!({ "status": "rejected" }))
            .await;
        response.assert_status_ok();
        let session: serde_json::Value = response.json();
        assert_eq!(session["status"], "rejected");
        assert_eq!(session["verified_by"], 2);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_session_lifecycle(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "session_date": "2025-07-02",
            "duration_minutes": 45,
            "topic": "Audit planning",
            "notes": null
        });

        let response = server
            .post("/sessions")
            .authorization_bearer(sara_token())
            .json(&body)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let session: serde_json::Value = response.json();
        let session_id = session["session_id"].as_i64().expect("session id");

        let response = server
            .patch(&format!("/sessions/{session_id}"))
            .authorization_bearer(sara_token())
            .json(&json!({ "topic": "Audit planning and review" }))
            .await;
        response.assert_status_ok();

        server
            .delete(&format!("/sessions/{session_id}"))
            .authorization_bearer(sara_token())
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        Ok(())
    }

    // ============================================================
    // CV uploads
    // ============================================================

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_cv_upload_and_verification(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state.clone());

        let form = MultipartForm::new().add_text("label", "July draft").add_part(
            "file",
            Part::bytes(b"%PDF-1.4 fake cv".as_slice())
                .file_name("cv.pdf")
                .mime_type("application/pdf"),
        );

        let response = server
            .post("/cvs")
            .authorization_bearer(sara_token())
            .multipart(form)
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let cv: serde_json::Value = response.json();
        assert_eq!(cv["label"], "July draft");
        assert_eq!(cv["status"], "pending");

        // The file landed in the upload directory with a .pdf extension.
        let file_path = cv["file_path"].as_str().expect("file path");
        assert!(file_path.ends_with(".pdf"));
        assert!(std::path::Path::new(file_path).exists());

        // The upload shows up in the student's CV list.
        let response = server
            .get("/students/4/cvs")
            .authorization_bearer(sara_token())
            .await;
        response.assert_status_ok();
        let cvs: Vec<serde_json::Value> = response.json();
        assert_eq!(cvs.len(), 1);

        // The assigned mentor verifies it.
        let cv_id = cv["cv_id"].as_i64().expect("cv id");
        let response = server
            .patch(&format!("/cvs/{cv_id}/status"))
            .authorization_bearer(marta_token())
            .json(&json!({ "status": "verified" }))
            .await;
        response.assert_status_ok();
        let cv: serde_json::Value = response.json();
        assert_eq!(cv["verified_by"], 2);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_cv_upload_requires_file(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let form = MultipartForm::new().add_text("label", "No file here");

        let response = server
            .post("/cvs")
            .authorization_bearer(sara_token())
            .multipart(form)
            .await;

        response.assert_status_bad_request();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_rejected_upload_leaves_no_file_behind(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool.clone());
        let upload_dir = state.upload_dir.clone();
        let server = create_test_server(state);

        // File part but no label: rejected after the file already hit disk.
        let form = MultipartForm::new().add_part(
            "file",
            Part::bytes(b"%PDF-1.4 fake cv".as_slice()).file_name("cv.pdf"),
        );
        server
            .post("/cvs")
            .authorization_bearer(sara_token())
            .multipart(form)
            .await
            .assert_status_bad_request();

        // Label too long: rejected by validation, same cleanup path.
        let form = MultipartForm::new()
            .add_text("label", "x".repeat(200))
            .add_part("file", Part::bytes(b"temp".as_slice()).file_name("cv.pdf"));
        server
            .post("/cvs")
            .authorization_bearer(sara_token())
            .multipart(form)
            .await
            .assert_status_bad_request();

        let leftovers = std::fs::read_dir(&upload_dir)
            .expect("upload dir readable")
            .count();
        assert_eq!(leftovers, 0);

        // No metadata row was written either.
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM cvs")
            .fetch_one(&pool)
            .await?;
        assert_eq!(count, 0);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_cv_delete_removes_file(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let form = MultipartForm::new().add_text("label", "Short lived").add_part(
            "file",
            Part::bytes(b"temp".as_slice()).file_name("cv.pdf"),
        );

        let response = server
            .post("/cvs")
            .authorization_bearer(sara_token())
            .multipart(form)
            .await;
        response.assert_status(axum::http::StatusCode::CREATED);
        let cv: serde_json::Value = response.json();
        let cv_id = cv["cv_id"].as_i64().expect("cv id");
        let file_path = cv["file_path"].as_str().expect("file path").to_string();

        server
            .delete(&format!("/cvs/{cv_id}"))
            .authorization_bearer(sara_token())
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        assert!(!std::path::Path::new(&file_path).exists());

        Ok(())
    }
}
