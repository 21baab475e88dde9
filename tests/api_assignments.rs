//! Integration tests for the assignment endpoints.

mod common;

#[cfg(test)]
mod assignment_tests {
    use super::common::*;
    use serde_json::json;
    use sqlx::SqlitePool;

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_list_is_scoped_by_role(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let response = server
            .get("/assignments")
            .authorization_bearer(admin_token())
            .await;
        response.assert_status_ok();
        let all: Vec<serde_json::Value> = response.json();
        assert_eq!(all.len(), 2);

        let response = server
            .get("/assignments")
            .authorization_bearer(marta_token())
            .await;
        response.assert_status_ok();
        let martas: Vec<serde_json::Value> = response.json();
        assert_eq!(martas.len(), 1);
        assert_eq!(martas[0]["mentor_id"], 2);

        let response = server
            .get("/assignments")
            .authorization_bearer(stella_token())
            .await;
        response.assert_status_ok();
        let stellas: Vec<serde_json::Value> = response.json();
        assert!(stellas.is_empty());

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_admin_creates_assignment(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "mentor_id": 2,
            "student_id": 6,
            "notes": "Second cohort"
        });

        let response = server
            .post("/assignments")
            .authorization_bearer(admin_token())
            .json(&body)
            .await;

        response.assert_status(axum::http::StatusCode::CREATED);
        let assignment: serde_json::Value = response.json();
        assert_eq!(assignment["mentor_id"], 2);
        assert_eq!(assignment["student_id"], 6);

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_duplicate_assignment_conflicts(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "mentor_id": 2,
            "student_id": 4
        });

        let response = server
            .post("/assignments")
            .authorization_bearer(admin_token())
            .json(&body)
            .await;

        response.assert_status_conflict();
        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_role_validation_on_both_sides(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        // A student on the mentor side is rejected.
        let body = json!({
            "mentor_id": 5,
            "student_id": 6
        });
        server
            .post("/assignments")
            .authorization_bearer(admin_token())
            .json(&body)
            .await
            .assert_status_bad_request();

        // A mentor on the student side is rejected.
        let body = json!({
            "mentor_id": 2,
            "student_id": 3
        });
        server
            .post("/assignments")
            .authorization_bearer(admin_token())
            .json(&body)
            .await
            .assert_status_bad_request();

        // Unknown users are a 404.
        let body = json!({
            "mentor_id": 999,
            "student_id": 6
        });
        server
            .post("/assignments")
            .authorization_bearer(admin_token())
            .json(&body)
            .await
            .assert_status_not_found();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_only_admin_manages_assignments(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        let body = json!({
            "mentor_id": 2,
            "student_id": 6
        });

        server
            .post("/assignments")
            .authorization_bearer(marta_token())
            .json(&body)
            .await
            .assert_status_forbidden();

        server
            .delete("/assignments/1")
            .authorization_bearer(sara_token())
            .await
            .assert_status_forbidden();

        Ok(())
    }

    #[sqlx::test(fixtures(path = "../fixtures", scripts("users", "assignments")))]
    async fn test_admin_deletes_assignment(pool: SqlitePool) -> sqlx::Result<()> {
        let state = create_test_state(pool);
        let server = create_test_server(state);

        server
            .delete("/assignments/1")
            .authorization_bearer(admin_token())
            .await
            .assert_status(axum::http::StatusCode::NO_CONTENT);

        // Marta loses access to Sara's records with the assignment gone.
        server
            .get("/students/4/activities")
            .authorization_bearer(marta_token())
            .await
            .assert_status_forbidden();

        server
            .delete("/assignments/999")
            .authorization_bearer(admin_token())
            .await
            .assert_status_not_found();

        Ok(())
    }
}
