//! SchoolHub - 学校成绩管理后端服务
//!
//! 基于 Actix Web 构建：科目教师录入成绩，班主任评定并汇总成绩单，管理员审核发布。
//!
//! # 架构
//! - `cache`: 缓存层（Moka）
//! - `config`: 配置管理
//! - `context`: 应用状态（存储 + 缓存）
//! - `entity`: SeaORM 数据库实体
//! - `errors`: 统一错误处理
//! - `middlewares`: 认证授权中间件
//! - `models`: 数据模型定义
//! - `routes`: API 路由层
//! - `runtime`: 运行时生命周期管理
//! - `services`: 业务逻辑层
//! - `storage`: 数据存储层（SeaORM）
//! - `utils`: 工具函数

pub mod cache;
pub mod config;
pub mod context;
pub mod entity;
pub mod errors;
pub mod middlewares;
pub mod models;
pub mod routes;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod utils;
