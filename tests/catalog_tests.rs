use anyhow::Result;
use horizon::catalog::favorites::{add_favorite, move_favorite, remove_favorite, set_label};
use horizon::catalog::{AppCatalogCache, AppId, AppSource, ResolvedApp};
use horizon::state::{LauncherState, MemoryStore, SettingsStore};
use horizon::time_source::{SimulatedTimeSource, TimeSource, parse_datetime};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Registry double with a mutable app list and a failure switch.
#[derive(Default)]
struct FakeRegistry {
    apps: Mutex<Vec<(AppId, Option<String>)>>,
    failing: AtomicBool,
    enumerations: AtomicUsize,
}

impl FakeRegistry {
    fn with_apps(apps: &[(&str, Option<&str>)]) -> Arc<Self> {
        let registry = Arc::new(Self::default());
        registry.set_apps(apps);
        registry
    }

    fn set_apps(&self, apps: &[(&str, Option<&str>)]) {
        *self.apps.lock().unwrap() = apps
            .iter()
            .map(|(id, label)| (id.parse().unwrap(), label.map(str::to_string)))
            .collect();
    }

    fn enumerations(&self) -> usize {
        self.enumerations.load(Ordering::SeqCst)
    }
}

impl AppSource for FakeRegistry {
    fn enumerate(&self) -> Result<Vec<AppId>> {
        self.enumerations.fetch_add(1, Ordering::SeqCst);
        if self.failing.load(Ordering::SeqCst) {
            anyhow::bail!("registry unavailable");
        }
        // Slow enough for concurrent callers to overlap.
        std::thread::sleep(Duration::from_millis(20));
        Ok(self.apps.lock().unwrap().iter().map(|(id, _)| id.clone()).collect())
    }

    fn resolve(&self, id: &AppId) -> Result<ResolvedApp> {
        let apps = self.apps.lock().unwrap();
        match apps.iter().find(|(app, _)| app == id) {
            Some((_, Some(label))) => Ok(ResolvedApp {
                label: label.clone(),
                icon: None,
            }),
            _ => anyhow::bail!("cannot resolve {id}"),
        }
    }
}

fn clock() -> Arc<SimulatedTimeSource> {
    Arc::new(SimulatedTimeSource::new(
        parse_datetime("2026-05-01 12:00:00").unwrap(),
        parse_datetime("2026-05-02 12:00:00").unwrap(),
        0.0,
    ))
}

fn cache(registry: &Arc<FakeRegistry>, clock: &Arc<SimulatedTimeSource>) -> AppCatalogCache {
    AppCatalogCache::new(registry.clone(), clock.clone(), Duration::from_secs(300))
}

fn labels(snapshot: &[horizon::catalog::CatalogEntry]) -> Vec<String> {
    snapshot
        .iter()
        .map(|entry| entry.display_label().to_string())
        .collect()
}

#[test]
fn test_fresh_snapshot_is_reused() {
    let registry = FakeRegistry::with_apps(&[("files/files", Some("Files"))]);
    let clock = clock();
    let cache = cache(&registry, &clock);

    let first = cache.get_all(false);
    clock.sleep(Duration::from_secs(299));
    let second = cache.get_all(false);

    assert!(Arc::ptr_eq(&first, &second));
    assert_eq!(registry.enumerations(), 1);
}

#[test]
fn test_stale_snapshot_is_rebuilt() {
    let registry = FakeRegistry::with_apps(&[("files/files", Some("Files"))]);
    let clock = clock();
    let cache = cache(&registry, &clock);

    cache.get_all(false);
    registry.set_apps(&[("files/files", Some("Files")), ("maps/maps", Some("Maps"))]);
    clock.sleep(Duration::from_secs(300));

    assert_eq!(cache.get_all(false).len(), 2);
    assert_eq!(registry.enumerations(), 2);
}

#[test]
fn test_force_reload_and_invalidate() {
    let registry = FakeRegistry::with_apps(&[("files/files", Some("Files"))]);
    let clock = clock();
    let cache = cache(&registry, &clock);

    cache.get_all(false);
    cache.get_all(true);
    assert_eq!(registry.enumerations(), 2);

    cache.invalidate();
    cache.get_all(false);
    assert_eq!(registry.enumerations(), 3);
}

#[test]
fn test_snapshot_is_sorted_deduplicated_and_skips_unresolvable() {
    let registry = FakeRegistry::with_apps(&[
        ("zed/zed", Some("zed")),
        ("alpha/alpha", Some("Alpha")),
        ("broken/broken", None),
        ("beta/beta", Some("beta")),
        ("alpha/alpha", Some("Alpha")),
    ]);
    let clock = clock();
    let snapshot = cache(&registry, &clock).get_all(false);

    assert_eq!(labels(&snapshot.entries), vec!["Alpha", "beta", "zed"]);
    assert_eq!(snapshot.captured_at, clock.now());
}

#[test]
fn test_enumeration_failure_keeps_cached_snapshot() {
    let registry = FakeRegistry::with_apps(&[("files/files", Some("Files"))]);
    let clock = clock();
    let cache = cache(&registry, &clock);

    let good = cache.get_all(false);
    registry.failing.store(true, Ordering::SeqCst);

    assert!(cache.get_all(true).is_empty());
    assert!(Arc::ptr_eq(&good, &cache.get_all(false)));
}

#[test]
fn test_failure_without_cache_returns_empty() {
    let registry = FakeRegistry::with_apps(&[]);
    registry.failing.store(true, Ordering::SeqCst);
    let clock = clock();

    assert!(cache(&registry, &clock).get_all(false).is_empty());
}

#[test]
fn test_concurrent_readers_share_one_enumeration() {
    let registry = FakeRegistry::with_apps(&[("files/files", Some("Files"))]);
    let clock = clock();
    let cache = Arc::new(cache(&registry, &clock));

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let cache = cache.clone();
            std::thread::spawn(move || cache.get_all(false))
        })
        .collect();
    let snapshots: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(registry.enumerations(), 1);
    assert!(snapshots.windows(2).all(|pair| Arc::ptr_eq(&pair[0], &pair[1])));
}

#[test]
fn test_favorites_drop_and_prune_uninstalled() {
    let registry = FakeRegistry::with_apps(&[
        ("files/files", Some("Files")),
        ("maps/maps", Some("Maps")),
    ]);
    let clock = clock();
    let cache = cache(&registry, &clock);
    let store = MemoryStore::new(LauncherState {
        favorites: vec![
            "maps/maps".into(),
            "gone/gone".into(),
            "files/files".into(),
        ],
        labels: BTreeMap::from([
            ("gone/gone".to_string(), "Old".to_string()),
            ("maps/maps".to_string(), "Navigation".to_string()),
        ]),
        ..Default::default()
    });

    let favorites = cache.favorites(&store, 5).unwrap();
    assert_eq!(labels(&favorites), vec!["Navigation", "Files"]);

    let state = store.load().unwrap();
    assert_eq!(state.favorites, vec!["maps/maps", "files/files"]);
    assert!(!state.labels.contains_key("gone/gone"));
    assert_eq!(state.labels.get("maps/maps").map(String::as_str), Some("Navigation"));
}

#[test]
fn test_repeated_favorites_are_returned_once() {
    let registry = FakeRegistry::with_apps(&[("a/a", Some("A"))]);
    let clock = clock();
    let store = MemoryStore::new(LauncherState {
        favorites: vec!["a/a".into(), "a/a".into(), "b/b".into()],
        ..Default::default()
    });

    let favorites = cache(&registry, &clock).favorites(&store, 5).unwrap();
    assert_eq!(labels(&favorites), vec!["A"]);
    assert_eq!(store.load().unwrap().favorites, vec!["a/a"]);
}

#[test]
fn test_repeated_favorites_are_collapsed_in_store() {
    let registry = FakeRegistry::with_apps(&[("a/a", Some("A")), ("b/b", Some("B"))]);
    let clock = clock();
    let store = MemoryStore::new(LauncherState {
        favorites: vec!["b/b".into(), "a/a".into(), "b/b".into()],
        ..Default::default()
    });

    let favorites = cache(&registry, &clock).favorites(&store, 5).unwrap();
    assert_eq!(labels(&favorites), vec!["B", "A"]);
    assert_eq!(store.load().unwrap().favorites, vec!["b/b", "a/a"]);
}

#[test]
fn test_favorites_are_not_pruned_when_enumeration_fails() {
    let registry = FakeRegistry::with_apps(&[]);
    registry.failing.store(true, Ordering::SeqCst);
    let clock = clock();
    let store = MemoryStore::new(LauncherState {
        favorites: vec!["files/files".into()],
        ..Default::default()
    });

    assert!(cache(&registry, &clock).favorites(&store, 5).unwrap().is_empty());
    assert_eq!(store.load().unwrap().favorites, vec!["files/files"]);
}

#[test]
fn test_favorites_respect_limit() {
    let registry = FakeRegistry::with_apps(&[
        ("a/a", Some("A")),
        ("b/b", Some("B")),
        ("c/c", Some("C")),
    ]);
    let clock = clock();
    let store = MemoryStore::new(LauncherState {
        favorites: vec!["c/c".into(), "a/a".into(), "b/b".into()],
        ..Default::default()
    });

    let favorites = cache(&registry, &clock).favorites(&store, 2).unwrap();
    assert_eq!(labels(&favorites), vec!["C", "A"]);
}

#[test]
fn test_managing_favorites_through_the_store() {
    let registry = FakeRegistry::with_apps(&[
        ("a/a", Some("A")),
        ("b/b", Some("B")),
    ]);
    let clock = clock();
    let cache = cache(&registry, &clock);
    let store = MemoryStore::default();
    let a: AppId = "a/a".parse().unwrap();
    let b: AppId = "b/b".parse().unwrap();

    add_favorite(&store, &a, 2).unwrap();
    add_favorite(&store, &b, 2).unwrap();
    assert!(add_favorite(&store, &b, 2).is_err());
    move_favorite(&store, &b, 0).unwrap();
    set_label(&store, &a, "  Alpha  ").unwrap();

    assert_eq!(labels(&cache.favorites(&store, 2).unwrap()), vec!["B", "Alpha"]);

    remove_favorite(&store, &b).unwrap();
    assert_eq!(labels(&cache.favorites(&store, 2).unwrap()), vec!["Alpha"]);
}

#[test]
fn test_labeled_apps_apply_overrides() {
    let registry = FakeRegistry::with_apps(&[
        ("a/a", Some("A")),
        ("b/b", Some("B")),
    ]);
    let clock = clock();
    let store = MemoryStore::new(LauncherState {
        labels: BTreeMap::from([("b/b".to_string(), "Bee".to_string())]),
        ..Default::default()
    });

    let apps = cache(&registry, &clock).labeled_apps(&store, false).unwrap();
    assert_eq!(labels(&apps), vec!["A", "Bee"]);
    assert_eq!(apps[1].label, "B");
}
