//! 角色 → 权限静态映射
//!
//! 路由通过 `RequirePermission` 中间件声明所需权限，服务层再按资源归属做细粒度校验
//! （如科目教师、班主任、家长关联的学生）。

use serde::Serialize;
use ts_rs::TS;

use crate::models::users::entities::UserRole;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum Permission {
    ManageUsers,
    ManageClasses,
    ManageStudents,
    ViewClasses,
    ViewStudents,
    EnterScores,
    UnlockScores,
    RateDomains,
    CompileResults,
    ApproveResults,
    ViewResults,
    ViewOwnChildResults,
    ViewNotifications,
}

const ADMIN_PERMISSIONS: &[Permission] = &[
    Permission::ManageUsers,
    Permission::ManageClasses,
    Permission::ManageStudents,
    Permission::ViewClasses,
    Permission::ViewStudents,
    Permission::EnterScores,
    Permission::UnlockScores,
    Permission::RateDomains,
    Permission::CompileResults,
    Permission::ApproveResults,
    Permission::ViewResults,
    Permission::ViewNotifications,
];

const TEACHER_PERMISSIONS: &[Permission] = &[
    Permission::ViewClasses,
    Permission::ViewStudents,
    Permission::EnterScores,
    Permission::RateDomains,
    Permission::CompileResults,
    Permission::ViewResults,
    Permission::ViewNotifications,
];

const ACCOUNTANT_PERMISSIONS: &[Permission] = &[
    Permission::ViewClasses,
    Permission::ViewStudents,
    Permission::ViewNotifications,
];

const PARENT_PERMISSIONS: &[Permission] =
    &[Permission::ViewOwnChildResults, Permission::ViewNotifications];

pub fn permissions_for(role: UserRole) -> &'static [Permission] {
    match role {
        UserRole::Admin => ADMIN_PERMISSIONS,
        UserRole::Teacher => TEACHER_PERMISSIONS,
        UserRole::Accountant => ACCOUNTANT_PERMISSIONS,
        UserRole::Parent => PARENT_PERMISSIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_admin_can_approve_or_unlock() {
        for role in UserRole::all_roles() {
            let expected = *role == UserRole::Admin;
            assert_eq!(role.has_permission(Permission::ApproveResults), expected);
            assert_eq!(role.has_permission(Permission::UnlockScores), expected);
        }
    }

    #[test]
    fn test_teacher_permissions() {
        let teacher = UserRole::Teacher;
        assert!(teacher.has_permission(Permission::EnterScores));
        assert!(teacher.has_permission(Permission::CompileResults));
        assert!(!teacher.has_permission(Permission::ManageUsers));
    }

    #[test]
    fn test_parent_and_accountant_cannot_write_scores() {
        assert!(!UserRole::Parent.has_permission(Permission::EnterScores));
        assert!(!UserRole::Accountant.has_permission(Permission::EnterScores));
        assert!(UserRole::Parent.has_permission(Permission::ViewOwnChildResults));
    }

    #[test]
    fn test_every_role_sees_notifications() {
        for role in UserRole::all_roles() {
            assert!(role.has_permission(Permission::ViewNotifications));
        }
    }
}
