use catalog_core::{PriceType, ToolDetail, ToolSummary};

#[test]
fn summary_defaults_missing_optional_fields() {
    let json = r#"{
        "id": "t-1",
        "name": "ChatGPT",
        "description": "AI-powered chatbot for conversations",
        "category": "Chatbot",
        "price_type": "Freemium",
        "website_url": "https://chat.openai.com"
    }"#;
    let tool: ToolSummary = serde_json::from_str(json).unwrap();

    assert_eq!(tool.id, "t-1");
    assert_eq!(tool.price_type, PriceType::Freemium);
    assert_eq!(tool.image_url, None);
    assert!(tool.tags.is_empty());
}

#[test]
fn unknown_price_type_is_rejected() {
    let json = r#"{"id":"x","name":"n","description":"d","category":"c","price_type":"Trial"}"#;
    assert!(serde_json::from_str::<ToolSummary>(json).is_err());
}

#[test]
fn detail_carries_summary_and_extras() {
    let json = r#"{
        "id": "t-2",
        "name": "Midjourney",
        "description": "Image generation",
        "category": "Image",
        "tags": ["AI", "Art"],
        "price_type": "Paid",
        "website_url": "https://midjourney.com",
        "image_url": "https://example.com/mj.png",
        "is_featured": true,
        "featured_order": 1,
        "created_at": "2024-05-01T10:00:00"
    }"#;
    let detail: ToolDetail = serde_json::from_str(json).unwrap();

    assert_eq!(detail.summary.name, "Midjourney");
    assert_eq!(detail.summary.tags, vec!["AI".to_string(), "Art".to_string()]);
    assert_eq!(detail.website_url, "https://midjourney.com");
    assert!(detail.is_featured);
    assert!(detail.is_active);
    assert_eq!(detail.featured_order, Some(1));
    assert_eq!(detail.updated_at, None);
}
