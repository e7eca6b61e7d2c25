//! 成绩派生规则
//!
//! 总分、等级、评语只在这里计算，草稿保存、导入和提交都调用 `derive_score`。

use crate::errors::{Result, SchoolHubError};
use crate::models::scores::entities::{Grade, ScoreWrite};
use crate::utils::ranking::round2;

pub const CA_MAX: f64 = 20.0;
pub const EXAM_MAX: f64 = 60.0;

/// 按总分划分等级
pub fn grade_for(total: f64) -> Grade {
    if total >= 70.0 {
        Grade::A
    } else if total >= 60.0 {
        Grade::B
    } else if total >= 50.0 {
        Grade::C
    } else if total >= 45.0 {
        Grade::D
    } else if total >= 40.0 {
        Grade::E
    } else {
        Grade::F
    }
}

/// 派生结果
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedScore {
    pub total: f64,
    pub grade: Grade,
    pub remark: &'static str,
}

/// 计算总分、等级、评语；草稿缺失的分项按 0 计入展示用总分
///
/// 总分保留两位小数后再定等级，避免 16.4 + 19.7 + 3.9 这类浮点和落到档位线以下。
pub fn derive_score(ca1: Option<f64>, ca2: Option<f64>, exam: Option<f64>) -> DerivedScore {
    let total = round2(ca1.unwrap_or(0.0) + ca2.unwrap_or(0.0) + exam.unwrap_or(0.0));
    let grade = grade_for(total);
    DerivedScore {
        total,
        grade,
        remark: grade.remark(),
    }
}

/// 校验单个分项范围
pub fn validate_component(
    field: &str,
    value: Option<f64>,
    max: f64,
) -> std::result::Result<(), String> {
    match value {
        Some(v) if !v.is_finite() => Err(format!("{field} must be a number")),
        Some(v) if !(0.0..=max).contains(&v) => {
            Err(format!("{field} must be between 0 and {max}, got {v}"))
        }
        _ => Ok(()),
    }
}

/// 校验三项分数，错误信息带上学生标识
pub fn validate_components(
    student: &str,
    ca1: Option<f64>,
    ca2: Option<f64>,
    exam: Option<f64>,
) -> Result<()> {
    validate_component("ca1", ca1, CA_MAX)
        .and_then(|_| validate_component("ca2", ca2, CA_MAX))
        .and_then(|_| validate_component("exam", exam, EXAM_MAX))
        .map_err(|msg| SchoolHubError::score_out_of_range(format!("{student}: {msg}")))
}

/// 缺失的分项名称
pub fn missing_components(ca1: Option<f64>, ca2: Option<f64>, exam: Option<f64>) -> Vec<String> {
    [("ca1", ca1), ("ca2", ca2), ("exam", exam)]
        .into_iter()
        .filter(|(_, v)| v.is_none())
        .map(|(name, _)| name.to_string())
        .collect()
}

/// 构造写入存储层的成绩行
pub fn build_score_write(
    student_id: i64,
    ca1: Option<f64>,
    ca2: Option<f64>,
    exam: Option<f64>,
) -> ScoreWrite {
    let derived = derive_score(ca1, ca2, exam);
    ScoreWrite {
        student_id,
        ca1,
        ca2,
        exam,
        total: derived.total,
        grade: derived.grade,
        remark: derived.remark.to_string(),
        subject_position: None,
    }
}

/// 按平均分自动生成班主任评语
pub fn auto_comment(average: f64) -> &'static str {
    if average >= 70.0 {
        "Excellent performance. Keep up the outstanding work."
    } else if average >= 60.0 {
        "Very good performance. Keep working hard."
    } else if average >= 50.0 {
        "Good performance. There is room for improvement."
    } else if average >= 45.0 {
        "Fair performance. More effort is needed."
    } else if average >= 40.0 {
        "Poor performance. Needs to work much harder."
    } else {
        "Needs serious improvement. Extra support is recommended."
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_bands() {
        assert_eq!(grade_for(100.0), Grade::A);
        assert_eq!(grade_for(70.0), Grade::A);
        assert_eq!(grade_for(69.9), Grade::B);
        assert_eq!(grade_for(60.0), Grade::B);
        assert_eq!(grade_for(50.0), Grade::C);
        assert_eq!(grade_for(45.0), Grade::D);
        assert_eq!(grade_for(40.0), Grade::E);
        assert_eq!(grade_for(39.99), Grade::F);
        assert_eq!(grade_for(0.0), Grade::F);
    }

    #[test]
    fn test_derive_score_full() {
        let derived = derive_score(Some(15.0), Some(12.0), Some(48.0));
        assert_eq!(derived.total, 75.0);
        assert_eq!(derived.grade, Grade::A);
        assert_eq!(derived.remark, "Excellent");
    }

    #[test]
    fn test_derive_score_partial_draft() {
        let derived = derive_score(Some(10.0), None, None);
        assert_eq!(derived.total, 10.0);
        assert_eq!(derived.grade, Grade::F);
        assert_eq!(derived.remark, "Very Poor");
    }

    #[test]
    fn test_fractional_total_lands_on_band_threshold() {
        let derived = derive_score(Some(16.4), Some(19.7), Some(3.9));
        assert_eq!(derived.total, 40.0);
        assert_eq!(derived.grade, Grade::E);
        assert_eq!(derived.remark, "Poor");

        let whole = derive_score(Some(20.0), Some(20.0), Some(0.0));
        assert_eq!(
            crate::utils::ranking::competition_ranks(&[derived.total, whole.total]),
            vec![1, 1]
        );
    }

    #[test]
    fn test_derive_is_pure() {
        let a = derive_score(Some(18.5), Some(19.0), Some(33.0));
        let b = derive_score(Some(18.5), Some(19.0), Some(33.0));
        assert_eq!(a, b);
    }

    #[test]
    fn test_grade_is_monotonic_in_total() {
        let mut previous = grade_for(0.0);
        let mut total = 0.0;
        while total <= 100.0 {
            let grade = grade_for(total);
            // Grade::A 最小，总分升高等级只能变好或不变
            assert!(grade <= previous, "grade regressed at {total}");
            previous = grade;
            total += 0.5;
        }
    }

    #[test]
    fn test_component_bounds() {
        assert!(validate_components("s", Some(20.0), Some(0.0), Some(60.0)).is_ok());
        assert!(validate_components("s", None, None, None).is_ok());

        let err = validate_components("Ada Obi", Some(21.0), None, None).unwrap_err();
        assert_eq!(err.code(), "E101");
        assert!(err.message().contains("Ada Obi"));
        assert!(err.message().contains("ca1"));

        assert!(validate_components("s", None, None, Some(60.5)).is_err());
        assert!(validate_components("s", None, Some(-1.0), None).is_err());
        assert!(validate_components("s", Some(f64::NAN), None, None).is_err());
    }

    #[test]
    fn test_missing_components() {
        assert_eq!(
            missing_components(Some(1.0), None, None),
            vec!["ca2".to_string(), "exam".to_string()]
        );
        assert!(missing_components(Some(1.0), Some(2.0), Some(3.0)).is_empty());
    }

    #[test]
    fn test_auto_comment_thresholds() {
        assert!(auto_comment(70.0).starts_with("Excellent"));
        assert!(auto_comment(65.0).starts_with("Very good"));
        assert!(auto_comment(50.0).starts_with("Good"));
        assert!(auto_comment(45.0).starts_with("Fair"));
        assert!(auto_comment(40.0).starts_with("Poor"));
        assert!(auto_comment(39.0).starts_with("Needs serious improvement"));
    }
}
