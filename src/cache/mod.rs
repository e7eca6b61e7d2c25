//! 缓存层
//!
//! 通过插件注册表按名称选择缓存后端，目前内置 Moka 内存缓存。

pub mod object_cache;
pub mod register;
pub mod traits;

pub use traits::{CacheResult, ObjectCache};

/// 声明缓存插件，在程序加载时自动注册到插件表
#[macro_export]
macro_rules! declare_object_cache_plugin {
    ($name:expr, $ty:ty) => {
        #[ctor::ctor]
        unsafe fn __register_object_cache_plugin() {
            $crate::cache::register::register_object_cache_plugin(
                $name,
                std::sync::Arc::new(|| {
                    let fut: $crate::cache::register::BoxedObjectCacheFuture = Box::pin(async {
                        let cache = <$ty>::new()
                            .map_err($crate::errors::SchoolHubError::cache_connection)?;
                        Ok(Box::new(cache) as Box<dyn $crate::cache::ObjectCache>)
                    });
                    fut
                }),
            );
        }
    };
}
