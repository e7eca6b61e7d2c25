//! 应用状态
//!
//! `SchoolContext` 包装存储层与对象缓存，通过 `web::Data` 注入到处理程序。
//! 班级、花名册、科目分配等读多写少的数据按 获取 → 缓存 → 刷新 的生命周期管理，
//! 写操作完成后由调用方显式失效对应条目。

use std::future::Future;
use std::sync::Arc;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::cache::{CacheResult, ObjectCache};
use crate::errors::Result;
use crate::models::classes::entities::Class;
use crate::models::common::AcademicSession;
use crate::models::students::entities::Student;
use crate::models::subjects::entities::SubjectAssignment;
use crate::storage::Storage;

#[derive(Clone)]
pub struct SchoolContext {
    storage: Arc<dyn Storage>,
    cache: Arc<dyn ObjectCache>,
    ttl: u64,
}

fn class_key(class_id: i64) -> String {
    format!("class:{class_id}")
}

fn roster_key(class_id: i64) -> String {
    format!("class:{class_id}:roster")
}

fn subjects_key(class_id: i64, session: &AcademicSession) -> String {
    format!(
        "class:{class_id}:subjects:{}:{}",
        session.term, session.academic_year
    )
}

impl SchoolContext {
    pub fn new(storage: Arc<dyn Storage>, cache: Arc<dyn ObjectCache>, ttl: u64) -> Self {
        Self {
            storage,
            cache,
            ttl,
        }
    }

    pub fn storage(&self) -> &Arc<dyn Storage> {
        &self.storage
    }

    pub fn cache(&self) -> &Arc<dyn ObjectCache> {
        &self.cache
    }

    pub fn ttl(&self) -> u64 {
        self.ttl
    }

    async fn cached<T, F, Fut>(&self, key: String, fetch: F) -> Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        if let CacheResult::Found(json) = self.cache.get_raw(&key).await {
            match serde_json::from_str::<T>(&json) {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!("缓存条目 {} 反序列化失败: {}", key, e);
                    self.cache.remove(&key).await;
                }
            }
        }

        let value = fetch().await?;
        match serde_json::to_string(&value) {
            Ok(json) => self.cache.insert_raw(key, json, self.ttl).await,
            Err(e) => warn!("缓存条目 {} 序列化失败: {}", key, e),
        }
        Ok(value)
    }

    /// 班级信息，不存在时返回 None（不缓存缺失结果）
    pub async fn class(&self, class_id: i64) -> Result<Option<Class>> {
        let key = class_key(class_id);
        if let CacheResult::Found(json) = self.cache.get_raw(&key).await
            && let Ok(class) = serde_json::from_str::<Class>(&json)
        {
            return Ok(Some(class));
        }

        let class = self.storage.get_class_by_id(class_id).await?;
        if let Some(ref found) = class
            && let Ok(json) = serde_json::to_string(found)
        {
            self.cache.insert_raw(key, json, self.ttl).await;
        }
        Ok(class)
    }

    /// 班级在读学生
    pub async fn class_roster(&self, class_id: i64) -> Result<Vec<Student>> {
        let storage = self.storage.clone();
        self.cached(roster_key(class_id), || async move {
            storage.list_active_students_by_class(class_id).await
        })
        .await
    }

    /// 强制从存储层重新加载花名册
    pub async fn refresh_class_roster(&self, class_id: i64) -> Result<Vec<Student>> {
        self.cache.remove(&roster_key(class_id)).await;
        debug!("刷新班级 {} 花名册", class_id);
        self.class_roster(class_id).await
    }

    /// 班级某学期的科目分配（即登记科目）
    pub async fn class_subjects(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<SubjectAssignment>> {
        let storage = self.storage.clone();
        let owned = session.clone();
        self.cached(subjects_key(class_id, session), || async move {
            storage.list_class_subject_assignments(class_id, &owned).await
        })
        .await
    }

    pub async fn invalidate_class_subjects(&self, class_id: i64, session: &AcademicSession) {
        self.cache.remove(&subjects_key(class_id, session)).await;
    }
}
