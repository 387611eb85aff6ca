//! Test utilities and helper functions for the shopscrape test suite

use kodegen_tools_shopscrape::{ScrapeConfig, StaticPage};
use mockito::{Mock, Server};

/// Wraps `head` and `body` fragments in a minimal HTML document
#[allow(dead_code)]
pub fn create_test_html(head: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="pt-BR">
<head>
    <meta charset="UTF-8">
    {head}
</head>
<body>
    {body}
</body>
</html>"#
    )
}

/// Snapshot page served from `https://loja.example.com/p/1`
#[allow(dead_code)]
pub fn static_page(head: &str, body: &str) -> StaticPage {
    StaticPage::new(
        create_test_html(head, body),
        Some(PRODUCT_URL.to_string()),
    )
}

#[allow(dead_code)]
pub const PRODUCT_URL: &str = "https://loja.example.com/p/1";

/// One shopping result card in the layout the default selectors expect
#[allow(dead_code)]
pub fn result_card(name: Option<&str>, price: &str, image: &str, link: &str) -> String {
    let name = name.map(|n| format!("<h3>{n}</h3>")).unwrap_or_default();
    format!(
        r#"<div class="sh-dgr__content">
    {name}
    <span class="a8Pemb">{price}</span>
    <img src="{image}">
    <a href="{link}">ver</a>
</div>"#
    )
}

/// Default config with a single job slot and short timeouts
#[allow(dead_code)]
pub fn test_config() -> ScrapeConfig {
    ScrapeConfig::builder()
        .concurrency(1)
        .product_navigation_timeout(std::time::Duration::from_secs(10))
        .search_navigation_timeout(std::time::Duration::from_secs(10))
        .max_scroll_steps(10)
        .build()
}

/// Creates a mock endpoint that returns HTML content
#[allow(dead_code)]
pub async fn create_html_mock(server: &mut Server, path: &str, html: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "text/html; charset=utf-8")
        .with_body(html)
        .create_async()
        .await
}

/// Creates a mock endpoint that returns a non-HTML body
#[allow(dead_code)]
pub async fn create_json_mock(server: &mut Server, path: &str, body: &str) -> Mock {
    server
        .mock("GET", path)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body)
        .create_async()
        .await
}

/// Helper to create test URLs
#[allow(dead_code)]
pub fn test_url(server: &Server, path: &str) -> String {
    format!("{}{}", server.url(), path)
}
