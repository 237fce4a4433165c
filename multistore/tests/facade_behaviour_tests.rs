//! Behaviour of the storage facade across every built-in persistent driver
//!
//! Each test runs the same scenario against memory, filestore, jsonfile and
//! (when enabled) sled, so driver differences surface here first.

mod testutils;

use multistore::names;
use serde_json::{json, Value};
use testutils::StoreFixture;

fn persistent_drivers() -> Vec<&'static str> {
    let mut drivers = vec![names::MEMORY, names::FILE_STORE, names::JSON_FILE];
    if cfg!(feature = "sled-backend") {
        drivers.push(names::SLED);
    }
    drivers
}

#[tokio::test]
async fn test_missing_key_is_absent() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        assert_eq!(storage.get("never-set").await.unwrap(), None, "{driver}");

        storage.set("gone", json!(1)).await.unwrap();
        storage.remove("gone").await.unwrap();
        assert_eq!(storage.get("gone").await.unwrap(), None, "{driver}");
    }
}

#[tokio::test]
async fn test_set_then_get_returns_equal_value() {
    let value = json!({
        "name": "Max",
        "age": 31,
        "tags": ["admin", "beta"],
        "address": {"city": "Madison", "zip": null},
        "score": 98.5
    });

    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        let returned = storage.set("user", value.clone()).await.unwrap();
        assert_eq!(returned, value, "{driver}");
        assert_eq!(storage.get("user").await.unwrap(), Some(value.clone()), "{driver}");

        storage.set("user", json!("replaced")).await.unwrap();
        assert_eq!(storage.get("user").await.unwrap(), Some(json!("replaced")), "{driver}");
    }
}

#[tokio::test]
async fn test_remove_absent_key_keeps_length() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        storage.set("a", json!(1)).await.unwrap();
        storage.set("b", json!(2)).await.unwrap();
        let before = storage.length().await.unwrap();

        storage.remove("missing").await.unwrap();
        assert_eq!(storage.length().await.unwrap(), before, "{driver}");
        assert_eq!(before, 2, "{driver}");
    }
}

#[tokio::test]
async fn test_clear_empties_store() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        for i in 0..5 {
            storage.set(&format!("key{i}"), json!(i)).await.unwrap();
        }
        assert_eq!(storage.length().await.unwrap(), 5, "{driver}");

        storage.clear().await.unwrap();
        assert_eq!(storage.length().await.unwrap(), 0, "{driver}");
        assert!(storage.keys().await.unwrap().is_empty(), "{driver}");
    }
}

#[tokio::test]
async fn test_keys_lists_every_key() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        for key in ["zeta", "alpha", "mid"] {
            storage.set(key, json!(key)).await.unwrap();
        }

        let mut keys = storage.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["alpha", "mid", "zeta"], "{driver}");
    }
}

#[tokio::test]
async fn test_for_each_visits_all_then_stops_early() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        for (key, n) in [("a", 1), ("b", 2), ("c", 3)] {
            storage.set(key, json!(n)).await.unwrap();
        }

        let mut indexes = Vec::new();
        let mut total = 0;
        let result = storage
            .for_each(|value: &Value, _key: &str, index: usize| {
                indexes.push(index);
                total += value.as_i64().unwrap_or(0);
                None
            })
            .await
            .unwrap();
        assert_eq!(result, None, "{driver}");
        assert_eq!(indexes, vec![0, 1, 2], "{driver}");
        assert_eq!(total, 6, "{driver}");

        let mut visits = 0;
        let found = storage
            .for_each(|value: &Value, key: &str, _index: usize| {
                visits += 1;
                (value.as_i64() >= Some(2)).then(|| json!(key))
            })
            .await
            .unwrap();
        assert_eq!(found, Some(json!("b")), "{driver}");
        assert_eq!(visits, 2, "{driver}");
    }
}

#[tokio::test]
async fn test_data_survives_reopen() {
    for driver in [names::FILE_STORE, names::JSON_FILE] {
        let fixture = StoreFixture::new();
        {
            let storage = fixture.created(&[driver]).await;
            storage.set("persisted", json!([1, 2, 3])).await.unwrap();
        }

        let reopened = fixture.created(&[driver]).await;
        assert_eq!(
            reopened.get("persisted").await.unwrap(),
            Some(json!([1, 2, 3])),
            "{driver}"
        );
    }
}

#[tokio::test]
async fn test_namespaces_do_not_share_keys() {
    let fixture = StoreFixture::new();
    let make = |store_name: &str| {
        multistore::Storage::new(
            multistore::StorageConfig::new()
                .with_name(fixture.name())
                .with_store_name(store_name)
                .with_driver_order([names::FILE_STORE]),
            fixture.registry(),
        )
    };

    let settings = make("settings");
    let cache = make("cache");
    settings.create().await.unwrap();
    cache.create().await.unwrap();

    settings.set("k", json!("settings")).await.unwrap();
    assert_eq!(cache.get("k").await.unwrap(), None);

    cache.clear().await.unwrap();
    assert_eq!(settings.get("k").await.unwrap(), Some(json!("settings")));
}

#[tokio::test]
async fn test_two_facades_on_one_namespace_share_writes() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let a = fixture.created(&[driver]).await;
        let b = fixture.created(&[driver]).await;

        a.set("x", json!(1)).await.unwrap();
        b.set("y", json!(2)).await.unwrap();

        assert_eq!(b.get("x").await.unwrap(), Some(json!(1)), "{driver}");
        assert_eq!(a.get("y").await.unwrap(), Some(json!(2)), "{driver}");
        assert_eq!(a.length().await.unwrap(), 2, "{driver}");

        drop(a);
        drop(b);
        let reopened = fixture.created(&[driver]).await;
        let mut keys = reopened.keys().await.unwrap();
        keys.sort();
        assert_eq!(keys, vec!["x", "y"], "{driver}");
    }
}

#[tokio::test]
async fn test_drivers_sharing_a_root_keep_separate_files() {
    let fixture = StoreFixture::new();
    let mut drivers = vec![names::FILE_STORE, names::JSON_FILE];
    if cfg!(feature = "sled-backend") {
        drivers.push(names::SLED);
    }

    for store_name in ["db", "conf", "blobs"] {
        let stores: Vec<_> = drivers
            .iter()
            .map(|driver| {
                multistore::Storage::new(
                    multistore::StorageConfig::new()
                        .with_name(fixture.name())
                        .with_store_name(store_name)
                        .with_driver_order([*driver]),
                    fixture.registry(),
                )
            })
            .collect();

        for (storage, driver) in stores.iter().zip(&drivers) {
            storage.create().await.unwrap();
            assert_eq!(storage.driver(), Some(*driver));
            storage.set("owner", json!(driver)).await.unwrap();
        }
        for (storage, driver) in stores.iter().zip(&drivers) {
            assert_eq!(storage.get("owner").await.unwrap(), Some(json!(driver)));
            assert_eq!(storage.keys().await.unwrap(), vec!["owner"]);
        }
    }
}

#[tokio::test]
async fn test_long_keys_round_trip() {
    for driver in persistent_drivers() {
        let fixture = StoreFixture::new();
        let storage = fixture.created(&[driver]).await;

        let key = "k".repeat(200);
        storage.set(&key, json!(1)).await.unwrap();
        assert_eq!(storage.get(&key).await.unwrap(), Some(json!(1)), "{driver}");
        assert_eq!(storage.keys().await.unwrap(), vec![key.clone()], "{driver}");

        storage.remove(&key).await.unwrap();
        assert_eq!(storage.length().await.unwrap(), 0, "{driver}");
    }
}
