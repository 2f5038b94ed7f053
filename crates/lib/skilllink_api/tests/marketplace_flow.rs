//! Integration tests — mentorship requests and reviews over HTTP, including
//! the role gates on each route and the cleanup after account deletion.

mod common;

use axum::Router;
use axum::http::{Method, StatusCode};
use serde_json::{Value, json};
use skilllink_core::models::auth::Role;

use common::{access, login, provision, register_and_login, send, test_state};

struct Market {
    app: Router,
    mentor: Value,
    rival: Value,
    learner: Value,
    admin: Value,
    skill_id: String,
}

async fn market() -> Market {
    let state = test_state();
    provision(&state, "Grace", "grace@x.com", Role::Mentor).await;
    provision(&state, "Linus", "linus@x.com", Role::Mentor).await;
    provision(&state, "Root", "root@x.com", Role::Admin).await;
    let app = skilllink_api::router(state);

    let mentor = login(&app, "grace@x.com").await;
    let rival = login(&app, "linus@x.com").await;
    let admin = login(&app, "root@x.com").await;
    let learner = register_and_login(&app, "Ada", "ada@x.com").await;

    let (status, skill) = send(
        &app,
        Method::POST,
        "/api/skills",
        Some(access(&mentor)),
        Some(json!({"title": "Compilers", "description": "Parsing", "price": 40})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let skill_id = skill["id"].as_str().unwrap().to_string();

    Market {
        app,
        mentor,
        rival,
        learner,
        admin,
        skill_id,
    }
}

#[tokio::test]
async fn learners_create_and_mentors_are_forbidden() {
    let m = market().await;

    let request = json!({"skillId": m.skill_id, "message": "Teach me"});
    let (status, body) = send(
        &m.app,
        Method::POST,
        "/api/mentorships",
        Some(access(&m.mentor)),
        Some(request.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "forbidden");

    let (status, created) = send(
        &m.app,
        Method::POST,
        "/api/mentorships",
        Some(access(&m.learner)),
        Some(request),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["status"], "pending");
    assert_eq!(created["skillId"], m.skill_id.as_str());
    assert_eq!(created["learnerId"], m.learner["user"]["id"]);

    let review = json!({"skillId": m.skill_id, "rating": 5, "comment": "Superb"});
    let (status, _) = send(
        &m.app,
        Method::POST,
        "/api/reviews",
        Some(access(&m.mentor)),
        Some(review.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, written) = send(
        &m.app,
        Method::POST,
        "/api/reviews",
        Some(access(&m.learner)),
        Some(review),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(written["rating"], 5);

    let (status, _) = send(
        &m.app,
        Method::POST,
        "/api/reviews",
        Some(access(&m.learner)),
        Some(json!({"skillId": m.skill_id, "rating": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &m.app,
        Method::POST,
        "/api/mentorships",
        None,
        Some(json!({"skillId": m.skill_id})),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, page) = send(&m.app, Method::GET, "/api/mentorships?search=PENDING", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);

    let (status, page) = send(&m.app, Method::GET, "/api/reviews", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 1);
}

#[tokio::test]
async fn mentorship_answers_follow_skill_ownership() {
    let m = market().await;
    let (_, created) = send(
        &m.app,
        Method::POST,
        "/api/mentorships",
        Some(access(&m.learner)),
        Some(json!({"skillId": m.skill_id})),
    )
    .await;
    let path = format!("/api/mentorships/{}", created["id"].as_str().unwrap());

    let (status, _) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&m.learner)),
        Some(json!({"status": "accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&m.rival)),
        Some(json!({"status": "accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, body) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&m.mentor)),
        Some(json!({"status": "maybe"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");

    let (status, answered) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&m.mentor)),
        Some(json!({"status": "accepted"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(answered["status"], "accepted");

    let (status, _) = send(&m.app, Method::DELETE, &path, Some(access(&m.mentor)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&m.app, Method::DELETE, &path, Some(access(&m.admin)), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&m.app, Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn reviews_are_edited_by_author_or_admin() {
    let m = market().await;
    let (_, written) = send(
        &m.app,
        Method::POST,
        "/api/reviews",
        Some(access(&m.learner)),
        Some(json!({"skillId": m.skill_id, "rating": 4})),
    )
    .await;
    let path = format!("/api/reviews/{}", written["id"].as_str().unwrap());

    let (status, _) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&m.mentor)),
        Some(json!({"rating": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let other = register_and_login(&m.app, "Bob", "bob@x.com").await;
    let (status, _) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&other)),
        Some(json!({"rating": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, edited) = send(
        &m.app,
        Method::PATCH,
        &path,
        Some(access(&m.learner)),
        Some(json!({"rating": 3, "comment": "Good pace"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(edited["rating"], 3);
    assert_eq!(edited["comment"], "Good pace");

    let (status, _) = send(&m.app, Method::DELETE, &path, Some(access(&m.learner)), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, _) = send(&m.app, Method::DELETE, &path, Some(access(&m.admin)), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&m.app, Method::GET, &path, None, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_a_mentor_removes_their_skills_requests_and_reviews() {
    let m = market().await;
    let (_, request) = send(
        &m.app,
        Method::POST,
        "/api/mentorships",
        Some(access(&m.learner)),
        Some(json!({"skillId": m.skill_id})),
    )
    .await;
    let (_, review) = send(
        &m.app,
        Method::POST,
        "/api/reviews",
        Some(access(&m.learner)),
        Some(json!({"skillId": m.skill_id, "rating": 2})),
    )
    .await;

    let mentor_id = m.mentor["user"]["id"].as_str().unwrap();
    let (status, _) = send(
        &m.app,
        Method::DELETE,
        &format!("/api/users/{mentor_id}"),
        Some(access(&m.admin)),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for path in [
        format!("/api/skills/{}", m.skill_id),
        format!("/api/mentorships/{}", request["id"].as_str().unwrap()),
        format!("/api/reviews/{}", review["id"].as_str().unwrap()),
    ] {
        let (status, _) = send(&m.app, Method::GET, &path, None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{path} survived");
    }

    let (status, page) = send(&m.app, Method::GET, "/api/skills", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 0);
}
