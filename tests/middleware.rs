use actix_web::{
    App, HttpResponse,
    http::{StatusCode, header},
    test, web,
};

use prodrev::middleware::{RedirectUnauthorized, login_redirect_url};

#[actix_web::test]
async fn browser_navigation_gets_expiry_page() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/dashboard?page=2")
        .insert_header((header::ACCEPT, "text/html,application/xhtml+xml"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let content_type = resp
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap();
    assert!(content_type.starts_with("text/html"));

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    assert!(body.contains("Сессия истекла"));
    assert!(body.contains(&login_redirect_url("/dashboard?page=2")));
}

#[actix_web::test]
async fn data_requests_get_json_401() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::get()
        .uri("/dashboard/data")
        .insert_header((header::ACCEPT, "application/json"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({"detail": "Not authenticated"}));
}

#[actix_web::test]
async fn post_is_never_treated_as_navigation() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Unauthorized().finish() })),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/product/save")
        .insert_header((header::ACCEPT, "text/html,application/xhtml+xml"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body, serde_json::json!({"detail": "Not authenticated"}));
}

#[actix_web::test]
async fn success_response_passes_through() {
    let app = test::init_service(
        App::new()
            .wrap(RedirectUnauthorized)
            .default_service(web::to(|| async { HttpResponse::Ok().finish() })),
    )
    .await;

    let req = test::TestRequest::default().to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
}

#[::core::prelude::v1::test]
fn login_url_encodes_the_return_location() {
    assert_eq!(
        login_redirect_url("/dashboard?page=2"),
        "/login?next=%2Fdashboard%3Fpage%3D2"
    );
    assert_eq!(login_redirect_url("/dashboard"), "/login?next=%2Fdashboard");
}
