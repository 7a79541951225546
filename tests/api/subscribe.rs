use blog_subscriptions::domain::SubscriptionPackage;
use serde_json::Value;
use wiremock::matchers::{any, method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::helpers::{spawn_app, valid_subscription};

#[tokio::test]
async fn subscribe_returns_a_200_for_valid_json() {
    let app = spawn_app().await;
    app.accept_emails().await;

    let response = app.post_subscription_json(&valid_subscription()).await;

    assert_eq!(200, response.status().as_u16());
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Subscription successful");
    assert_eq!(body["success"], true);
}

#[tokio::test]
async fn subscribe_persists_the_new_subscription() {
    let app = spawn_app().await;
    app.accept_emails().await;

    app.post_subscription_json(&valid_subscription()).await;

    let saved = app
        .store
        .get("ursula_le_guin@gmail.com")
        .expect("The subscription was not stored.");
    assert_eq!(saved.name.as_ref(), "Ursula Le Guin");
    assert_eq!(saved.phone.as_ref(), "5551234567");
    assert_eq!(saved.package, SubscriptionPackage::Premium);
}

#[tokio::test]
async fn subscribe_sends_a_confirmation_and_an_admin_notification() {
    let app = spawn_app().await;
    Mock::given(path("/v3/smtp/email"))
        .and(method("POST"))
        .respond_with(ResponseTemplate::new(201))
        .expect(2)
        .mount(&app.email_server)
        .await;

    app.post_subscription_json(&valid_subscription()).await;

    let emails = app.sent_emails().await;
    assert_eq!(emails[0]["to"][0]["email"], "ursula_le_guin@gmail.com");
    assert_eq!(emails[0]["subject"], "Thanks for Subscribing to Our Blog!");
    assert_eq!(
        emails[1]["to"][0]["email"],
        app.configuration.email.admin.email.as_ref()
    );
    assert_eq!(emails[1]["subject"], "New Blog Subscription");
    for email in &emails {
        assert_eq!(
            email["sender"]["email"],
            app.configuration.email.sender.email.as_ref()
        );
    }
}

#[tokio::test]
async fn a_second_subscription_with_the_same_email_replaces_the_first() {
    let app = spawn_app().await;
    app.accept_emails().await;
    let mut resubscription = valid_subscription();
    resubscription["name"] = "Ursula K. Le Guin".into();
    resubscription["package"] = "basic".into();

    app.post_subscription_json(&valid_subscription()).await;
    let response = app.post_subscription_json(&resubscription).await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(app.store.len(), 1);
    let saved = app.store.get("ursula_le_guin@gmail.com").unwrap();
    assert_eq!(saved.name.as_ref(), "Ursula K. Le Guin");
    assert_eq!(saved.package, SubscriptionPackage::Basic);
}

#[tokio::test]
async fn subscribe_returns_a_500_when_data_is_missing_or_invalid() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let mut missing_phone = valid_subscription();
    missing_phone.as_object_mut().unwrap().remove("phone");
    let mut short_phone = valid_subscription();
    short_phone["phone"] = "12345".into();
    let mut unknown_package = valid_subscription();
    unknown_package["package"] = "platinum".into();
    let mut invalid_email = valid_subscription();
    invalid_email["email"] = "definitely-not-an-email".into();
    let test_cases = vec![
        (String::new(), "an empty body"),
        ("{not json".to_string(), "a malformed body"),
        (missing_phone.to_string(), "a missing phone"),
        (short_phone.to_string(), "a short phone"),
        (unknown_package.to_string(), "an unknown package"),
        (invalid_email.to_string(), "an invalid email"),
    ];

    for (body, description) in test_cases {
        let response = app.post_subscription(body).await;

        assert_eq!(
            500,
            response.status().as_u16(),
            "The API did not fail with 500 when the payload had {description}."
        );
        let body: Value = response.json().await.unwrap();
        assert_eq!(body["message"], "Failed to process subscription");
        assert_eq!(body["success"], false);
        assert!(body["error"].is_string());
    }
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn a_failed_confirmation_email_keeps_the_record_but_reports_an_error() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&app.email_server)
        .await;

    let response = app.post_subscription_json(&valid_subscription()).await;

    assert_eq!(500, response.status().as_u16());
    assert!(app.store.get("ursula_le_guin@gmail.com").is_some());
}

#[tokio::test]
async fn every_response_carries_the_cors_headers() {
    let app = spawn_app().await;
    app.accept_emails().await;

    let success = app.post_subscription_json(&valid_subscription()).await;
    let failure = app.post_subscription("").await;

    for response in [success, failure] {
        let headers = response.headers();
        assert_eq!(
            headers["access-control-allow-origin"],
            app.configuration.application.allowed_origin.as_str()
        );
        assert_eq!(headers["access-control-allow-methods"], "OPTIONS,POST");
        assert_eq!(headers["access-control-allow-credentials"], "true");
        assert_eq!(headers["content-type"], "application/json");
    }
}

#[tokio::test]
async fn preflight_is_answered_without_side_effects() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.preflight().await;

    assert_eq!(200, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-headers"],
        "Content-Type,X-Amz-Date,Authorization,X-Api-Key,X-Amz-Security-Token"
    );
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "CORS preflight response");
    assert!(app.store.is_empty());
}

#[tokio::test]
async fn a_body_that_is_not_utf8_gets_the_failure_envelope_and_cors_headers() {
    let app = spawn_app().await;
    Mock::given(any())
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&app.email_server)
        .await;

    let response = app.post_subscription(vec![0xff, 0xfe, b'{']).await;

    assert_eq!(500, response.status().as_u16());
    assert_eq!(
        response.headers()["access-control-allow-origin"],
        app.configuration.application.allowed_origin.as_str()
    );
    assert_eq!(response.headers()["access-control-allow-credentials"], "true");
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["message"], "Failed to process subscription");
    assert_eq!(body["success"], false);
    assert!(app.store.is_empty());
}
