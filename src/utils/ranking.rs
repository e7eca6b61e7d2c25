//! 排名与班级统计
//!
//! 并列名次共享，下一个名次跳过（1, 1, 3）。科目名次与班级总名次使用同一规则。

use crate::models::scores::entities::SubjectStats;

/// 保留两位小数
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// 竞争排名：名次 = 1 + 严格高于自己的人数
pub fn competition_ranks(values: &[f64]) -> Vec<i64> {
    values
        .iter()
        .map(|v| 1 + values.iter().filter(|other| *other > v).count() as i64)
        .collect()
}

/// 单科班级统计（平均分保留两位小数）
pub fn subject_stats(totals: &[f64]) -> Option<SubjectStats> {
    if totals.is_empty() {
        return None;
    }
    let sum: f64 = totals.iter().sum();
    let min = totals.iter().copied().fold(f64::INFINITY, f64::min);
    let max = totals.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Some(SubjectStats {
        class_average: round2(sum / totals.len() as f64),
        class_min: min,
        class_max: max,
    })
}

/// 班级名次结果
#[derive(Debug, Clone, PartialEq)]
pub struct ClassRanking {
    /// 与输入顺序一致；平均分为 0 的学生不参与排名
    pub positions: Vec<Option<i64>>,
    /// 参与排名学生平均分的均值
    pub class_average: f64,
}

/// 按平均分计算班级名次
pub fn rank_by_average(averages: &[f64]) -> ClassRanking {
    let participants: Vec<f64> = averages.iter().copied().filter(|a| *a > 0.0).collect();
    let class_average = if participants.is_empty() {
        0.0
    } else {
        round2(participants.iter().sum::<f64>() / participants.len() as f64)
    };

    let positions = averages
        .iter()
        .map(|avg| {
            (*avg > 0.0)
                .then(|| 1 + participants.iter().filter(|other| **other > *avg).count() as i64)
        })
        .collect();

    ClassRanking {
        positions,
        class_average,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ties_share_rank_with_gap() {
        assert_eq!(
            competition_ranks(&[82.0, 91.0, 91.0, 40.0]),
            vec![3, 1, 1, 4]
        );
    }

    #[test]
    fn test_ranks_without_ties() {
        assert_eq!(competition_ranks(&[75.0, 55.0]), vec![1, 2]);
        assert!(competition_ranks(&[]).is_empty());
    }

    #[test]
    fn test_class_average_of_three() {
        let ranking = rank_by_average(&[70.0, 60.0, 50.0]);
        assert_eq!(ranking.class_average, 60.0);
        assert_eq!(ranking.positions, vec![Some(1), Some(2), Some(3)]);
    }

    #[test]
    fn test_zero_average_does_not_participate() {
        let ranking = rank_by_average(&[0.0, 80.0, 80.0, 65.5]);
        assert_eq!(ranking.positions, vec![None, Some(1), Some(1), Some(3)]);
        assert_eq!(ranking.class_average, 75.17);
    }

    #[test]
    fn test_empty_class() {
        let ranking = rank_by_average(&[]);
        assert!(ranking.positions.is_empty());
        assert_eq!(ranking.class_average, 0.0);
    }

    #[test]
    fn test_subject_stats() {
        let stats = subject_stats(&[75.0, 55.0, 60.0]).unwrap();
        assert_eq!(stats.class_average, 63.33);
        assert_eq!(stats.class_min, 55.0);
        assert_eq!(stats.class_max, 75.0);
        assert!(subject_stats(&[]).is_none());
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(65.0), 65.0);
        assert_eq!(round2(63.333333), 63.33);
        assert_eq!(round2(2.675_1), 2.68);
    }
}
