//! 成绩单存储操作

use std::collections::HashMap;

use super::scores::{assignment_ids_for_class, unlock_in};
use super::{SeaOrmStorage, db_error};
use crate::entity::compiled_results::{ActiveModel, Column, Entity as CompiledResults, Model};
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    common::AcademicSession,
    results::entities::{BatchState, CompiledResult, CompiledResultWrite, ResultStatus},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, QueryFilter, QueryOrder, Select, Set,
    TransactionTrait, sea_query::Expr,
};

fn batch_query(class_id: i64, session: &AcademicSession) -> Select<CompiledResults> {
    CompiledResults::find()
        .filter(Column::ClassId.eq(class_id))
        .filter(Column::Term.eq(session.term.to_string()))
        .filter(Column::AcademicYear.eq(session.academic_year.as_str()))
}

fn into_results(models: Vec<Model>) -> Result<Vec<CompiledResult>> {
    models
        .into_iter()
        .map(|m| m.into_compiled_result().map_err(SchoolHubError::from))
        .collect()
}

/// 汇总整批状态：已审核 > 已提交 > 已驳回 > 草稿
fn summarize_batch(models: &[Model]) -> Option<BatchState> {
    if models.is_empty() {
        return None;
    }

    let statuses: Vec<ResultStatus> = models
        .iter()
        .map(|m| m.status.parse().unwrap_or(ResultStatus::Draft))
        .collect();
    let status = [
        ResultStatus::Approved,
        ResultStatus::Submitted,
        ResultStatus::Rejected,
    ]
    .into_iter()
    .find(|candidate| statuses.contains(candidate))
    .unwrap_or(ResultStatus::Draft);

    let rejection_reason = if status == ResultStatus::Rejected {
        models.iter().find_map(|m| m.rejection_reason.clone())
    } else {
        None
    };

    Some(BatchState {
        status,
        rejection_reason,
        count: models.len() as i64,
    })
}

impl SeaOrmStorage {
    /// 获取成绩单批次状态
    pub async fn get_result_batch_state_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Option<BatchState>> {
        let models = batch_query(class_id, session)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩单失败: {e}")))?;

        Ok(summarize_batch(&models))
    }

    /// 写入整批成绩单；被驳回的批次原地更新为已提交
    pub async fn save_compiled_results_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
        compiled_by: i64,
        rows: Vec<CompiledResultWrite>,
    ) -> Result<usize> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = batch_query(class_id, session)
            .all(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩单失败: {e}")))?;

        if let Some(state) = summarize_batch(&existing)
            && state.status.is_locked()
        {
            return Err(SchoolHubError::results_already_submitted(format!(
                "Results for this class and term are already {}",
                state.status
            )));
        }

        let mut by_student: HashMap<i64, Model> =
            existing.into_iter().map(|m| (m.student_id, m)).collect();

        let now = chrono::Utc::now().timestamp();
        let count = rows.len();
        for row in rows {
            let subject_scores = serde_json::to_string(&row.subject_scores)?;
            let mut model = ActiveModel {
                subject_scores: Set(subject_scores),
                affective_id: Set(row.affective_id),
                psychomotor_id: Set(row.psychomotor_id),
                total_score: Set(row.total_score),
                average_score: Set(row.average_score),
                class_average: Set(row.class_average),
                position: Set(row.position),
                total_students: Set(row.total_students),
                subjects_count: Set(row.subjects_count),
                teacher_comment: Set(row.teacher_comment),
                status: Set(ResultStatus::Submitted.to_string()),
                compiled_by: Set(compiled_by),
                compiled_at: Set(now),
                approved_by: Set(None),
                approved_at: Set(None),
                rejection_reason: Set(None),
                updated_at: Set(now),
                ..Default::default()
            };

            match by_student.remove(&row.student_id) {
                Some(found) => {
                    model.id = Set(found.id);
                    model.update(&txn).await.map_err(|e| {
                        SchoolHubError::database_operation(format!("更新成绩单失败: {e}"))
                    })?;
                }
                None => {
                    model.student_id = Set(row.student_id);
                    model.class_id = Set(class_id);
                    model.term = Set(session.term.to_string());
                    model.academic_year = Set(session.academic_year.clone());
                    model.insert(&txn).await.map_err(|e| {
                        db_error(
                            "保存成绩单失败",
                            e,
                            Some(SchoolHubError::ResultsAlreadySubmitted),
                        )
                    })?;
                }
            }
        }

        // 重新汇总时已不在册的学生，旧记录一并删除
        for stale in by_student.into_values() {
            stale.delete(&txn).await.map_err(|e| {
                SchoolHubError::database_operation(format!("删除过期成绩单失败: {e}"))
            })?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(count)
    }

    /// 审核通过：已提交 → 已审核
    pub async fn approve_result_batch_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
        approved_by: i64,
    ) -> Result<u64> {
        let now = chrono::Utc::now().timestamp();
        let result = CompiledResults::update_many()
            .col_expr(Column::Status, Expr::value(ResultStatus::APPROVED))
            .col_expr(Column::ApprovedBy, Expr::value(approved_by))
            .col_expr(Column::ApprovedAt, Expr::value(now))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Term.eq(session.term.to_string()))
            .filter(Column::AcademicYear.eq(session.academic_year.as_str()))
            .filter(Column::Status.eq(ResultStatus::SUBMITTED))
            .exec(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("审核成绩单失败: {e}")))?;

        if result.rows_affected == 0 {
            return Err(SchoolHubError::invalid_transition(
                "There are no submitted results to approve for this class and term",
            ));
        }

        Ok(result.rows_affected)
    }

    /// 驳回：已提交 → 已驳回，可选同时解锁成绩表
    pub async fn reject_result_batch_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
        reason: &str,
        unlock_scores: bool,
    ) -> Result<(u64, u64)> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let now = chrono::Utc::now().timestamp();
        let rejected = CompiledResults::update_many()
            .col_expr(Column::Status, Expr::value(ResultStatus::REJECTED))
            .col_expr(Column::RejectionReason, Expr::value(reason))
            .col_expr(Column::UpdatedAt, Expr::value(now))
            .filter(Column::ClassId.eq(class_id))
            .filter(Column::Term.eq(session.term.to_string()))
            .filter(Column::AcademicYear.eq(session.academic_year.as_str()))
            .filter(Column::Status.eq(ResultStatus::SUBMITTED))
            .exec(&txn)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("驳回成绩单失败: {e}")))?
            .rows_affected;

        if rejected == 0 {
            return Err(SchoolHubError::invalid_transition(
                "There are no submitted results to reject for this class and term",
            ));
        }

        let unlocked = if unlock_scores {
            let ids = assignment_ids_for_class(&txn, class_id, session).await?;
            if ids.is_empty() {
                0
            } else {
                unlock_in(&txn, &ids).await?
            }
        } else {
            0
        };

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok((rejected, unlocked))
    }

    /// 整批成绩单，按名次排序（无名次的排最后）
    pub async fn list_compiled_results_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<CompiledResult>> {
        let models = batch_query(class_id, session)
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩单失败: {e}")))?;

        let mut results = into_results(models)?;
        results.sort_by_key(|r| (r.position.is_none(), r.position, r.student_id));
        Ok(results)
    }

    /// 某学生的全部成绩单
    pub async fn list_student_results_impl(
        &self,
        student_id: i64,
        status: Option<ResultStatus>,
    ) -> Result<Vec<CompiledResult>> {
        let mut select = CompiledResults::find().filter(Column::StudentId.eq(student_id));
        if let Some(status) = status {
            select = select.filter(Column::Status.eq(status.as_str()));
        }

        let models = select
            .order_by_desc(Column::AcademicYear)
            .order_by_desc(Column::CompiledAt)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询学生成绩单失败: {e}")))?;

        into_results(models)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn model(student_id: i64, status: ResultStatus, reason: Option<&str>) -> Model {
        Model {
            id: student_id,
            student_id,
            class_id: 1,
            term: "first".to_string(),
            academic_year: "2024/2025".to_string(),
            subject_scores: "[]".to_string(),
            affective_id: 1,
            psychomotor_id: 1,
            total_score: 0.0,
            average_score: 0.0,
            class_average: 0.0,
            position: None,
            total_students: 1,
            subjects_count: 0,
            teacher_comment: String::new(),
            status: status.to_string(),
            compiled_by: 1,
            compiled_at: 0,
            approved_by: None,
            approved_at: None,
            rejection_reason: reason.map(str::to_string),
            updated_at: 0,
        }
    }

    #[test]
    fn test_summarize_empty_batch() {
        assert!(summarize_batch(&[]).is_none());
    }

    #[test]
    fn test_summarize_prefers_locked_status() {
        let state = summarize_batch(&[
            model(1, ResultStatus::Rejected, Some("fix maths")),
            model(2, ResultStatus::Submitted, None),
        ])
        .unwrap();
        assert_eq!(state.status, ResultStatus::Submitted);
        assert_eq!(state.rejection_reason, None);
        assert_eq!(state.count, 2);
    }

    #[test]
    fn test_summarize_rejected_carries_reason() {
        let state =
            summarize_batch(&[model(1, ResultStatus::Rejected, Some("fix maths"))]).unwrap();
        assert_eq!(state.status, ResultStatus::Rejected);
        assert_eq!(state.rejection_reason.as_deref(), Some("fix maths"));
    }
}
