//! 预导入模块，方便使用

pub use super::affective_domains::{
    ActiveModel as AffectiveDomainActiveModel, Entity as AffectiveDomains,
    Model as AffectiveDomainModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::compiled_results::{
    ActiveModel as CompiledResultActiveModel, Entity as CompiledResults,
    Model as CompiledResultModel,
};
pub use super::notifications::{
    ActiveModel as NotificationActiveModel, Entity as Notifications, Model as NotificationModel,
};
pub use super::psychomotor_domains::{
    ActiveModel as PsychomotorDomainActiveModel, Entity as PsychomotorDomains,
    Model as PsychomotorDomainModel,
};
pub use super::scores::{ActiveModel as ScoreActiveModel, Entity as Scores, Model as ScoreModel};
pub use super::students::{
    ActiveModel as StudentActiveModel, Entity as Students, Model as StudentModel,
};
pub use super::subject_assignments::{
    ActiveModel as SubjectAssignmentActiveModel, Entity as SubjectAssignments,
    Model as SubjectAssignmentModel,
};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
