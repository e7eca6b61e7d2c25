use serde::Deserialize;
use ts_rs::TS;

use crate::models::common::Term;

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/domain.ts")]
pub struct AffectiveRatingRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub punctuality: i16,
    pub neatness: i16,
    pub politeness: i16,
    pub honesty: i16,
    pub relationship_with_others: i16,
    pub remarks: Option<String>,
}

impl AffectiveRatingRequest {
    pub fn ratings(&self) -> [(&'static str, i16); 5] {
        [
            ("punctuality", self.punctuality),
            ("neatness", self.neatness),
            ("politeness", self.politeness),
            ("honesty", self.honesty),
            ("relationship_with_others", self.relationship_with_others),
        ]
    }
}

#[derive(Debug, Clone, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/domain.ts")]
pub struct PsychomotorRatingRequest {
    pub student_id: i64,
    pub class_id: i64,
    pub term: Term,
    pub academic_year: String,
    pub handwriting: i16,
    pub verbal_fluency: i16,
    pub games: i16,
    pub sports: i16,
    pub handling_tools: i16,
    pub drawing_painting: i16,
    pub remarks: Option<String>,
}

impl PsychomotorRatingRequest {
    pub fn ratings(&self) -> [(&'static str, i16); 6] {
        [
            ("handwriting", self.handwriting),
            ("verbal_fluency", self.verbal_fluency),
            ("games", self.games),
            ("sports", self.sports),
            ("handling_tools", self.handling_tools),
            ("drawing_painting", self.drawing_painting),
        ]
    }
}
