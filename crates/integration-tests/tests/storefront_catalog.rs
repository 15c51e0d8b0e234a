//! Integration tests for catalog reads and page resolution.
//!
//! The storefront reads categories and products from the admin catalog API.

#![allow(clippy::unwrap_used)]

use piko_pearl_core::catalog::create_category_slug;
use piko_pearl_integration_tests::TestContext;
use reqwest::StatusCode;
use serde_json::Value;

#[tokio::test]
async fn test_categories_come_from_admin() {
    let ctx = TestContext::start().await;

    let categories: Value = ctx
        .client()
        .get(ctx.storefront("/api/catalog/categories"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let names: Vec<_> = categories
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["Flowers", "Bags", "Keychains", "Accessories"]);
}

#[tokio::test]
async fn test_products_carry_ratings() {
    let ctx = TestContext::start().await;

    let products: Value = ctx
        .client()
        .get(ctx.storefront("/api/catalog/flowers/products"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    let products = products.as_array().unwrap();
    assert!(products.iter().all(|p| p["category"] == "flowers"));

    let roses = products.iter().find(|p| p["id"] == "1").unwrap();
    assert_eq!(roses["reviews"], 5);
    assert_eq!(roses["reviewsData"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_reviews_for_unknown_product_are_empty() {
    let ctx = TestContext::start().await;

    let summary: Value = ctx
        .client()
        .get(ctx.storefront("/api/catalog/flowers/products/999/reviews"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert_eq!(summary["reviews"], 0);
    assert_eq!(summary["rating"].as_f64().unwrap(), 0.0);
}

#[tokio::test]
async fn test_navigate_named_category_and_product_pages() {
    let ctx = TestContext::start().await;
    let client = ctx.client();

    let page: Value = client
        .get(ctx.storefront("/api/navigate?page=cart"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["page"], "cart");

    let bags = create_category_slug("Bags");
    let page: Value = client
        .get(ctx.storefront(&format!("/api/navigate?page={bags}")))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["page"], "category");
    assert_eq!(page["category"]["name"], "Bags");
    assert!(!page["products"].as_array().unwrap().is_empty());

    let page: Value = client
        .get(ctx.storefront("/api/navigate?page=flowers/rose-bouquet"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(page["page"], "product");
    assert_eq!(page["product"]["name"], "Rose Bouquet");
    assert_eq!(page["product"]["reviews"], 5);
}

#[tokio::test]
async fn test_navigate_unknown_page() {
    let ctx = TestContext::start().await;

    let resp = ctx
        .client()
        .get(ctx.storefront("/api/navigate?page=flowers/no-such-thing"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let page: Value = resp.json().await.unwrap();
    assert_eq!(page["page"], "not-found");
}
