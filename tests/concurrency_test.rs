use std::sync::Arc;
use std::time::Duration;

use hal_navigator::transport::mock::{create_channel_transport, expect_get};
use hal_navigator::{FetchOptions, Processor, ProcessorConfig, Response};
use serde_json::json;

fn order(status: &str) -> serde_json::Value {
    json!({ "_links": { "self": { "href": "/orders/523" } }, "status": status })
}

/// Two overlapping fetches of one href: the second waits for the first and is answered
/// from the cache, so only one GET reaches the transport.
#[tokio::test]
async fn test_overlapping_fetches_share_one_get() {
    let (transport, mut requests) = create_channel_transport(8);
    let hal = Processor::new(Arc::new(transport), ProcessorConfig::default());

    let first = tokio::spawn({
        let link = hal.link("/orders/523");
        async move { link.fetch_resource().await }
    });
    let (uri, responder) = expect_get(&mut requests).await.expect("Expected GET request");
    assert_eq!(uri, "/orders/523");

    // Issued while the first GET is still pending.
    let second = tokio::spawn({
        let link = hal.link("/orders/523");
        async move { link.fetch_resource().await }
    });
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert!(requests.try_recv().is_err(), "second fetch must not reach the transport");

    responder.send(Ok(Response::ok(order("shipped")))).unwrap();

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap();
    assert!(Arc::ptr_eq(&first, &second));
    assert!(requests.try_recv().is_err());
}

/// Revalidation bypasses the cache even with a fetch in flight.
#[tokio::test]
async fn test_revalidate_while_in_flight_gets_again() {
    let (transport, mut requests) = create_channel_transport(8);
    let hal = Processor::new(Arc::new(transport), ProcessorConfig::default());

    let first = tokio::spawn({
        let link = hal.link("/orders/523");
        async move { link.fetch_resource().await }
    });
    let (_, first_responder) = expect_get(&mut requests).await.unwrap();

    let second = tokio::spawn({
        let link = hal.link("/orders/523");
        async move { link.fetch(FetchOptions::revalidate()).await }
    });

    first_responder.send(Ok(Response::ok(order("shipped")))).unwrap();
    let (_, second_responder) = expect_get(&mut requests).await.unwrap();
    second_responder.send(Ok(Response::ok(order("delivered")))).unwrap();

    let first = first.await.unwrap().unwrap();
    let second = second.await.unwrap().unwrap().into_resource().unwrap();

    assert_eq!(first.properties()["status"], "shipped");
    assert_eq!(second.properties()["status"], "delivered");
    assert!(Arc::ptr_eq(&hal.cached("/orders/523").unwrap(), &second));
}

/// Fetches of different hrefs do not wait for each other.
#[tokio::test]
async fn test_distinct_hrefs_fetch_independently() {
    let (transport, mut requests) = create_channel_transport(8);
    let hal = Processor::new(Arc::new(transport), ProcessorConfig::default());

    let a = tokio::spawn({
        let link = hal.link("/a");
        async move { link.fetch_resource().await }
    });
    let b = tokio::spawn({
        let link = hal.link("/b");
        async move { link.fetch_resource().await }
    });

    let (first_uri, first) = expect_get(&mut requests).await.unwrap();
    let (second_uri, second) = expect_get(&mut requests).await.unwrap();
    let mut uris = vec![first_uri, second_uri];
    uris.sort();
    assert_eq!(uris, vec!["/a", "/b"]);

    first.send(Ok(Response::ok(json!({})))).unwrap();
    second.send(Ok(Response::ok(json!({})))).unwrap();
    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert_eq!(hal.cache_len(), 2);
}
