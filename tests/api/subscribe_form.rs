use crate::helpers::spawn_app;

#[tokio::test]
async fn the_form_posts_to_the_subscribe_endpoint() {
    let app = spawn_app().await;

    // Attribute values come back html-escaped.
    let html_page = app.get_subscribe_form().await.replace("&#x2f;", "/");

    let action = app
        .configuration
        .application
        .base_url
        .join("api/subscribe")
        .unwrap();
    assert!(html_page.contains(&format!(r#"action="{action}""#)));
}

#[tokio::test]
async fn the_form_offers_every_package() {
    let app = spawn_app().await;

    let html_page = app.get_subscribe_form().await;

    for value in ["basic", "standard", "premium"] {
        assert!(html_page.contains(&format!(r#"<option value="{value}">"#)));
    }
    assert!(html_page.contains("Premium Package"));
}
