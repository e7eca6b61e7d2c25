use crate::cache::traits::ObjectCache;
use crate::errors::Result;
use once_cell::sync::Lazy;
use std::{
    collections::HashMap,
    future::Future,
    pin::Pin,
    sync::{Arc, RwLock},
};

pub type BoxedObjectCacheFuture =
    Pin<Box<dyn Future<Output = Result<Box<dyn ObjectCache>>> + Send>>;
pub type ObjectCacheConstructor = Arc<dyn Fn() -> BoxedObjectCacheFuture + Send + Sync>;

static OBJECT_CACHE_REGISTRY: Lazy<RwLock<HashMap<String, ObjectCacheConstructor>>> =
    Lazy::new(|| RwLock::new(HashMap::new()));

pub fn register_object_cache_plugin<S: Into<String>>(name: S, constructor: ObjectCacheConstructor) {
    let mut registry = OBJECT_CACHE_REGISTRY
        .write()
        .expect("Cache registry lock poisoned");
    registry.insert(name.into(), constructor);
}

pub fn get_object_cache_plugin(name: &str) -> Option<ObjectCacheConstructor> {
    OBJECT_CACHE_REGISTRY
        .read()
        .expect("Cache registry lock poisoned")
        .get(name)
        .cloned()
}

/// 已注册的缓存插件名称（排序后）
pub fn registered_object_cache_plugins() -> Vec<String> {
    let registry = OBJECT_CACHE_REGISTRY
        .read()
        .expect("Cache registry lock poisoned");
    let mut names: Vec<String> = registry.keys().cloned().collect();
    names.sort();
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moka_plugin_is_registered() {
        assert!(registered_object_cache_plugins().contains(&"moka".to_string()));
        assert!(get_object_cache_plugin("moka").is_some());
        assert!(get_object_cache_plugin("memcached").is_none());
    }
}
