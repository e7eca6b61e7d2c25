//! 成绩存储操作
//!
//! 草稿保存、提交、解锁都在单个事务内完成，任何一行失败整体回滚。

use std::collections::HashMap;

use super::{SeaOrmStorage, db_error};
use crate::entity::scores::{ActiveModel, Column, Entity as Scores, Model};
use crate::entity::subject_assignments;
use crate::errors::{Result, SchoolHubError};
use crate::models::{
    common::AcademicSession,
    scores::entities::{Score, ScoreStatus, ScoreWrite, SubjectStats},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseTransaction, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait, sea_query::Expr,
};

impl SeaOrmStorage {
    /// 科目分配下的全部成绩
    pub async fn list_scores_by_assignment_impl(&self, assignment_id: i64) -> Result<Vec<Score>> {
        let scores = Scores::find()
            .filter(Column::AssignmentId.eq(assignment_id))
            .order_by_asc(Column::StudentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

        Ok(scores.into_iter().map(|m| m.into_score()).collect())
    }

    /// 保存草稿
    pub async fn save_draft_scores_impl(
        &self,
        assignment_id: i64,
        entered_by: i64,
        rows: Vec<ScoreWrite>,
    ) -> Result<usize> {
        if rows.is_empty() {
            return Ok(0);
        }

        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = load_existing(&txn, assignment_id, &rows).await?;
        if let Some(locked) = existing
            .values()
            .find(|m| m.status == ScoreStatus::SUBMITTED)
        {
            return Err(SchoolHubError::score_locked(format!(
                "Score for student {} is already submitted and cannot be changed",
                locked.student_id
            )));
        }

        let now = chrono::Utc::now().timestamp();
        let count = rows.len();
        for row in rows {
            upsert_row(
                &txn,
                assignment_id,
                entered_by,
                existing.get(&row.student_id).map(|m| m.id),
                row,
                ScoreStatus::Draft,
                None,
                now,
            )
            .await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(count)
    }

    /// 提交整张成绩表
    pub async fn submit_scores_impl(
        &self,
        assignment_id: i64,
        entered_by: i64,
        rows: Vec<ScoreWrite>,
        stats: SubjectStats,
    ) -> Result<usize> {
        let txn = self
            .db
            .begin()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("开启事务失败: {e}")))?;

        let existing = load_existing(&txn, assignment_id, &rows).await?;
        if existing
            .values()
            .any(|m| m.status == ScoreStatus::SUBMITTED)
        {
            return Err(SchoolHubError::scores_already_submitted(
                "Scores for this subject have already been submitted",
            ));
        }

        let now = chrono::Utc::now().timestamp();
        let count = rows.len();
        for row in rows {
            upsert_row(
                &txn,
                assignment_id,
                entered_by,
                existing.get(&row.student_id).map(|m| m.id),
                row,
                ScoreStatus::Submitted,
                Some(stats),
                now,
            )
            .await?;
        }

        txn.commit()
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("提交事务失败: {e}")))?;

        Ok(count)
    }

    /// 退回草稿
    pub async fn unlock_scores_impl(&self, assignment_ids: &[i64]) -> Result<u64> {
        if assignment_ids.is_empty() {
            return Ok(0);
        }
        unlock_in(&self.db, assignment_ids).await
    }

    /// 班级某学期的全部已提交成绩
    pub async fn list_submitted_scores_for_class_impl(
        &self,
        class_id: i64,
        session: &AcademicSession,
    ) -> Result<Vec<Score>> {
        let assignment_ids = assignment_ids_for_class(&self.db, class_id, session).await?;
        if assignment_ids.is_empty() {
            return Ok(Vec::new());
        }

        let scores = Scores::find()
            .filter(Column::AssignmentId.is_in(assignment_ids))
            .filter(Column::Status.eq(ScoreStatus::SUBMITTED))
            .order_by_asc(Column::StudentId)
            .order_by_asc(Column::AssignmentId)
            .all(&self.db)
            .await
            .map_err(|e| SchoolHubError::database_operation(format!("查询班级成绩失败: {e}")))?;

        Ok(scores.into_iter().map(|m| m.into_score()).collect())
    }
}

/// 班级某学期的科目分配ID
pub(super) async fn assignment_ids_for_class<C: sea_orm::ConnectionTrait>(
    conn: &C,
    class_id: i64,
    session: &AcademicSession,
) -> Result<Vec<i64>> {
    subject_assignments::Entity::find()
        .select_only()
        .column(subject_assignments::Column::Id)
        .filter(subject_assignments::Column::ClassId.eq(class_id))
        .filter(subject_assignments::Column::Term.eq(session.term.to_string()))
        .filter(subject_assignments::Column::AcademicYear.eq(session.academic_year.as_str()))
        .into_tuple::<i64>()
        .all(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询科目分配失败: {e}")))
}

/// 将指定科目分配的成绩退回草稿并清空统计
pub(super) async fn unlock_in<C: sea_orm::ConnectionTrait>(
    conn: &C,
    assignment_ids: &[i64],
) -> Result<u64> {
    let now = chrono::Utc::now().timestamp();
    let result = Scores::update_many()
        .col_expr(Column::Status, Expr::value(ScoreStatus::DRAFT))
        .col_expr(Column::ClassAverage, Expr::value(Option::<f64>::None))
        .col_expr(Column::ClassMin, Expr::value(Option::<f64>::None))
        .col_expr(Column::ClassMax, Expr::value(Option::<f64>::None))
        .col_expr(Column::SubjectPosition, Expr::value(Option::<i64>::None))
        .col_expr(Column::SubmittedAt, Expr::value(Option::<i64>::None))
        .col_expr(Column::UpdatedAt, Expr::value(now))
        .filter(Column::AssignmentId.is_in(assignment_ids.to_vec()))
        .filter(Column::Status.eq(ScoreStatus::SUBMITTED))
        .exec(conn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("解锁成绩失败: {e}")))?;

    Ok(result.rows_affected)
}

async fn load_existing(
    txn: &DatabaseTransaction,
    assignment_id: i64,
    rows: &[ScoreWrite],
) -> Result<HashMap<i64, Model>> {
    let student_ids: Vec<i64> = rows.iter().map(|r| r.student_id).collect();
    let existing = Scores::find()
        .filter(Column::AssignmentId.eq(assignment_id))
        .filter(Column::StudentId.is_in(student_ids))
        .all(txn)
        .await
        .map_err(|e| SchoolHubError::database_operation(format!("查询成绩失败: {e}")))?;

    Ok(existing.into_iter().map(|m| (m.student_id, m)).collect())
}

#[allow(clippy::too_many_arguments)]
async fn upsert_row(
    txn: &DatabaseTransaction,
    assignment_id: i64,
    entered_by: i64,
    existing_id: Option<i64>,
    row: ScoreWrite,
    status: ScoreStatus,
    stats: Option<SubjectStats>,
    now: i64,
) -> Result<()> {
    let submitted = status == ScoreStatus::Submitted;
    let mut model = ActiveModel {
        ca1: Set(row.ca1),
        ca2: Set(row.ca2),
        exam: Set(row.exam),
        total: Set(row.total),
        grade: Set(row.grade.to_string()),
        remark: Set(row.remark),
        status: Set(status.to_string()),
        class_average: Set(stats.map(|s| s.class_average)),
        class_min: Set(stats.map(|s| s.class_min)),
        class_max: Set(stats.map(|s| s.class_max)),
        subject_position: Set(row.subject_position),
        entered_by: Set(entered_by),
        submitted_at: Set(submitted.then_some(now)),
        updated_at: Set(now),
        ..Default::default()
    };

    match existing_id {
        Some(id) => {
            model.id = Set(id);
            model
                .update(txn)
                .await
                .map_err(|e| SchoolHubError::database_operation(format!("更新成绩失败: {e}")))?;
        }
        None => {
            model.student_id = Set(row.student_id);
            model.assignment_id = Set(assignment_id);
            // 并发录入同一学生成绩时由唯一索引兜底
            model
                .insert(txn)
                .await
                .map_err(|e| db_error("保存成绩失败", e, Some(SchoolHubError::ScoreLocked)))?;
        }
    }

    Ok(())
}
