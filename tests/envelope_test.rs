use kodegen_tools_shopscrape::{
    ProductRecord, ProductResponse, ScrapeError, SearchResponse, SearchResultItem,
};
use std::time::Duration;

#[test]
fn test_product_success_shape() {
    let response = ProductResponse::from_result(Ok(ProductRecord {
        success: true,
        url: "https://loja/p".into(),
        title: "Widget".into(),
        price: Some("USD 19,90".into()),
        price_value: Some("19.90".into()),
        price_currency: Some("USD".into()),
        image: None,
    }));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["title"], "Widget");
    assert_eq!(json["price_value"], "19.90");
    assert_eq!(json["price_currency"], "USD");
    assert!(json["image"].is_null());
    assert!(json.get("error").is_none());
}

#[test]
fn test_product_failure_shape() {
    let response = ProductResponse::from_result(Err(ScrapeError::NavigationTimeout {
        url: "https://lento/p".into(),
        timeout: Duration::from_secs(30),
    }));

    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Erro no scraping");
    let details = json["details"].as_str().unwrap();
    assert!(details.contains("https://lento/p"));
    assert!(details.contains("30s"));
    assert!(json.get("title").is_none());
}

#[test]
fn test_search_shapes() {
    let ok = SearchResponse::from_result(Ok(vec![SearchResultItem {
        name: "Tênis".into(),
        price: Some("R$ 199,90".into()),
        image_url: None,
        link: Some("https://www.google.com/shopping/1".into()),
    }]));
    let json = serde_json::to_value(&ok).unwrap();
    assert_eq!(json["success"], true);
    assert_eq!(json["results"][0]["name"], "Tênis");
    assert!(json["results"][0]["imageUrl"].is_null());

    let failed = SearchResponse::from_result(Err(ScrapeError::BrowserLaunch(
        "Chrome not found".into(),
    )));
    let json = serde_json::to_value(&failed).unwrap();
    assert_eq!(json["success"], false);
    assert_eq!(json["error"], "Falha na pesquisa");
    assert_eq!(json["details"], "Failed to launch browser: Chrome not found");
}

#[test]
fn test_envelopes_round_trip_through_untagged_enum() {
    let text = r#"{"success":false,"error":"Erro no scraping","details":"boom"}"#;
    let parsed: ProductResponse = serde_json::from_str(text).unwrap();
    assert!(!parsed.is_success());
}
