use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::auth::permissions::Permission;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    Admin,      // 管理员
    Teacher,    // 教师
    Accountant, // 财务
    Parent,     // 家长
}

impl UserRole {
    pub const ADMIN: &'static str = "admin";
    pub const TEACHER: &'static str = "teacher";
    pub const ACCOUNTANT: &'static str = "accountant";
    pub const PARENT: &'static str = "parent";

    pub fn all_roles() -> &'static [UserRole] {
        &[
            UserRole::Admin,
            UserRole::Teacher,
            UserRole::Accountant,
            UserRole::Parent,
        ]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => Self::ADMIN,
            UserRole::Teacher => Self::TEACHER,
            UserRole::Accountant => Self::ACCOUNTANT,
            UserRole::Parent => Self::PARENT,
        }
    }

    /// 角色拥有的权限（静态表）
    pub fn permissions(&self) -> &'static [Permission] {
        crate::models::auth::permissions::permissions_for(*self)
    }

    pub fn has_permission(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user role: '{s}'. Supported roles: admin, teacher, accountant, parent"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            UserRole::ADMIN => Ok(UserRole::Admin),
            UserRole::TEACHER => Ok(UserRole::Teacher),
            UserRole::ACCOUNTANT => Ok(UserRole::Accountant),
            UserRole::PARENT => Ok(UserRole::Parent),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,   // 活跃
    Inactive, // 停用
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(|_| {
            serde::de::Error::custom(format!(
                "Invalid user status: '{s}'. Supported statuses: active, inactive"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub role: UserRole,
    pub status: UserStatus,
    pub display_name: Option<String>,
    /// 家长关联的学生ID；教师可选关联的教职工编号
    pub linked_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }

    // 生成访问令牌
    pub fn generate_access_token(&self) -> Result<String, jsonwebtoken::errors::Error> {
        crate::utils::jwt::JwtUtils::generate_access_token(self.id, self.role, self.linked_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_roundtrip() {
        for role in UserRole::all_roles() {
            assert_eq!(role.to_string().parse::<UserRole>().unwrap(), *role);
        }
        assert!("student".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_message() {
        let err = serde_json::from_str::<UserRole>("\"user\"").unwrap_err();
        assert!(err.to_string().contains("Supported roles"));
    }
}
