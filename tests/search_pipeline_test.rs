mod common;

use common::{create_test_html, result_card};
use kodegen_tools_shopscrape::{SearchResultPipeline, StaticPage};

fn page(body: &str) -> StaticPage {
    StaticPage::new(
        create_test_html("", body),
        Some("https://www.google.com/search?tbm=shop&q=x".to_string()),
    )
}

#[tokio::test]
async fn test_nameless_cards_are_dropped_in_order() {
    let body = [
        result_card(Some("Produto 1"), "R$ 10,00", "1.jpg", "/shopping/1"),
        result_card(None, "R$ 20,00", "2.jpg", "/shopping/2"),
        result_card(Some("Produto 3"), "R$ 30,00", "3.jpg", "https://loja.com/3"),
        result_card(None, "R$ 40,00", "4.jpg", "/shopping/4"),
        result_card(Some("Produto 5"), "R$ 50,00", "5.jpg", "/shopping/5"),
    ]
    .join("\n");

    let items = SearchResultPipeline::new("https://www.google.com")
        .extract(&page(&body))
        .await;

    let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, ["Produto 1", "Produto 3", "Produto 5"]);
    assert_eq!(items[0].price.as_deref(), Some("R$ 10,00"));
    assert_eq!(items[0].image_url.as_deref(), Some("1.jpg"));
    assert_eq!(
        items[0].link.as_deref(),
        Some("https://www.google.com/shopping/1")
    );
    assert_eq!(items[1].link.as_deref(), Some("https://loja.com/3"));
}

#[tokio::test]
async fn test_alternate_name_selector() {
    let body = r#"<div class="sh-dgr__content">
        <div class="tAxDx">Fone Bluetooth</div>
        <a href="/shopping/9">ver</a>
    </div>"#;

    let items = SearchResultPipeline::new("https://www.google.com")
        .extract(&page(body))
        .await;

    assert_eq!(items.len(), 1);
    assert_eq!(items[0].name, "Fone Bluetooth");
    assert_eq!(items[0].price, None);
    assert_eq!(items[0].image_url, None);
}

#[tokio::test]
async fn test_no_results() {
    let items = SearchResultPipeline::new("https://www.google.com")
        .extract(&page("<p>Nenhum resultado</p>"))
        .await;
    assert!(items.is_empty());
}

#[tokio::test]
async fn test_item_serializes_camel_case() {
    let items = SearchResultPipeline::new("https://www.google.com")
        .extract(&page(&result_card(Some("A"), "R$ 1,00", "a.jpg", "/a")))
        .await;
    let json = serde_json::to_value(&items[0]).unwrap();
    assert_eq!(json["imageUrl"], "a.jpg");
    assert_eq!(json["link"], "https://www.google.com/a");
    assert!(json.get("image_url").is_none());
}
