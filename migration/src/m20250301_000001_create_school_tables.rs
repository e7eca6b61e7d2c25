use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 创建用户表
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Username)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Users::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Users::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Users::Role).string().not_null())
                    .col(ColumnDef::new(Users::Status).string().not_null())
                    .col(ColumnDef::new(Users::DisplayName).string().null())
                    .col(ColumnDef::new(Users::LinkedId).big_integer().null())
                    .col(ColumnDef::new(Users::LastLogin).big_integer().null())
                    .col(ColumnDef::new(Users::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Users::UpdatedAt).big_integer().not_null())
                    .to_owned(),
            )
            .await?;

        // 创建班级表
        manager
            .create_table(
                Table::create()
                    .table(Classes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Classes::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Classes::Name)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(Classes::ClassTeacherId)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Classes::Description).text().null())
                    .col(ColumnDef::new(Classes::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Classes::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Classes::Table, Classes::ClassTeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建学生表
        manager
            .create_table(
                Table::create()
                    .table(Students::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Students::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Students::ClassId).big_integer().not_null())
                    .col(ColumnDef::new(Students::FirstName).string().not_null())
                    .col(ColumnDef::new(Students::LastName).string().not_null())
                    .col(
                        ColumnDef::new(Students::AdmissionNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Students::Status).string().not_null())
                    .col(ColumnDef::new(Students::CreatedAt).big_integer().not_null())
                    .col(ColumnDef::new(Students::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Students::Table, Students::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建科目分配表
        manager
            .create_table(
                Table::create()
                    .table(SubjectAssignments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(SubjectAssignments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(SubjectAssignments::TeacherId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectAssignments::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectAssignments::SubjectName)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(SubjectAssignments::Term).string().not_null())
                    .col(
                        ColumnDef::new(SubjectAssignments::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SubjectAssignments::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubjectAssignments::Table, SubjectAssignments::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(SubjectAssignments::Table, SubjectAssignments::TeacherId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩表
        manager
            .create_table(
                Table::create()
                    .table(Scores::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Scores::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Scores::StudentId).big_integer().not_null())
                    .col(
                        ColumnDef::new(Scores::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Scores::Ca1).double().null())
                    .col(ColumnDef::new(Scores::Ca2).double().null())
                    .col(ColumnDef::new(Scores::Exam).double().null())
                    .col(ColumnDef::new(Scores::Total).double().not_null())
                    .col(ColumnDef::new(Scores::Grade).string().not_null())
                    .col(ColumnDef::new(Scores::Remark).string().not_null())
                    .col(ColumnDef::new(Scores::Status).string().not_null())
                    .col(ColumnDef::new(Scores::ClassAverage).double().null())
                    .col(ColumnDef::new(Scores::ClassMin).double().null())
                    .col(ColumnDef::new(Scores::ClassMax).double().null())
                    .col(
                        ColumnDef::new(Scores::SubjectPosition)
                            .big_integer()
                            .null(),
                    )
                    .col(ColumnDef::new(Scores::EnteredBy).big_integer().not_null())
                    .col(ColumnDef::new(Scores::SubmittedAt).big_integer().null())
                    .col(ColumnDef::new(Scores::UpdatedAt).big_integer().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Scores::Table, Scores::AssignmentId)
                            .to(SubjectAssignments::Table, SubjectAssignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建情感领域评分表
        manager
            .create_table(
                Table::create()
                    .table(AffectiveDomains::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(AffectiveDomains::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AffectiveDomains::Term).string().not_null())
                    .col(
                        ColumnDef::new(AffectiveDomains::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::Punctuality)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::Neatness)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::Politeness)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::Honesty)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::RelationshipWithOthers)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(AffectiveDomains::Remarks).text().null())
                    .col(
                        ColumnDef::new(AffectiveDomains::RatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(AffectiveDomains::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(AffectiveDomains::Table, AffectiveDomains::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建心理运动领域评分表
        manager
            .create_table(
                Table::create()
                    .table(PsychomotorDomains::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(PsychomotorDomains::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PsychomotorDomains::Term).string().not_null())
                    .col(
                        ColumnDef::new(PsychomotorDomains::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::Handwriting)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::VerbalFluency)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::Games)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::Sports)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::HandlingTools)
                            .small_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::DrawingPainting)
                            .small_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(PsychomotorDomains::Remarks).text().null())
                    .col(
                        ColumnDef::new(PsychomotorDomains::RatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(PsychomotorDomains::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(PsychomotorDomains::Table, PsychomotorDomains::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建成绩单汇总表
        manager
            .create_table(
                Table::create()
                    .table(CompiledResults::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CompiledResults::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompiledResults::Term).string().not_null())
                    .col(
                        ColumnDef::new(CompiledResults::AcademicYear)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::SubjectScores)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::AffectiveId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::PsychomotorId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::TotalScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::AverageScore)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::ClassAverage)
                            .double()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompiledResults::Position).big_integer().null())
                    .col(
                        ColumnDef::new(CompiledResults::TotalStudents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::SubjectsCount)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::TeacherComment)
                            .text()
                            .not_null(),
                    )
                    .col(ColumnDef::new(CompiledResults::Status).string().not_null())
                    .col(
                        ColumnDef::new(CompiledResults::CompiledBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::CompiledAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::ApprovedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::ApprovedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::RejectionReason)
                            .text()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CompiledResults::UpdatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompiledResults::Table, CompiledResults::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(CompiledResults::Table, CompiledResults::ClassId)
                            .to(Classes::Table, Classes::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建通知表
        manager
            .create_table(
                Table::create()
                    .table(Notifications::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Notifications::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Notifications::Title).string().not_null())
                    .col(ColumnDef::new(Notifications::Message).text().not_null())
                    .col(
                        ColumnDef::new(Notifications::NotificationType)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::TargetAudience)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedBy)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Notifications::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // 创建索引
        // 唯一约束：每个学生每个科目分配只有一行成绩
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_scores_student_assignment")
                    .table(Scores::Table)
                    .col(Scores::StudentId)
                    .col(Scores::AssignmentId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_scores_assignment_id")
                    .table(Scores::Table)
                    .col(Scores::AssignmentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_subject_assignments_class_subject_term")
                    .table(SubjectAssignments::Table)
                    .col(SubjectAssignments::ClassId)
                    .col(SubjectAssignments::SubjectName)
                    .col(SubjectAssignments::Term)
                    .col(SubjectAssignments::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_students_class_id")
                    .table(Students::Table)
                    .col(Students::ClassId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_affective_student_term")
                    .table(AffectiveDomains::Table)
                    .col(AffectiveDomains::StudentId)
                    .col(AffectiveDomains::ClassId)
                    .col(AffectiveDomains::Term)
                    .col(AffectiveDomains::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_psychomotor_student_term")
                    .table(PsychomotorDomains::Table)
                    .col(PsychomotorDomains::StudentId)
                    .col(PsychomotorDomains::ClassId)
                    .col(PsychomotorDomains::Term)
                    .col(PsychomotorDomains::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        // 唯一约束：同一班级、学期、学年的成绩单只能汇总一次
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("uq_compiled_results_student_term")
                    .table(CompiledResults::Table)
                    .col(CompiledResults::StudentId)
                    .col(CompiledResults::ClassId)
                    .col(CompiledResults::Term)
                    .col(CompiledResults::AcademicYear)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_notifications_target_audience")
                    .table(Notifications::Table)
                    .col(Notifications::TargetAudience)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // 按照创建的相反顺序删除
        manager
            .drop_table(Table::drop().table(Notifications::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(CompiledResults::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(PsychomotorDomains::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(AffectiveDomains::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Scores::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(SubjectAssignments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Students::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Classes::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    #[sea_orm(iden = "users")]
    Table,
    Id,
    Username,
    Email,
    PasswordHash,
    Role,
    Status,
    DisplayName,
    LinkedId,
    LastLogin,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Classes {
    #[sea_orm(iden = "classes")]
    Table,
    Id,
    Name,
    ClassTeacherId,
    Description,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Students {
    #[sea_orm(iden = "students")]
    Table,
    Id,
    ClassId,
    FirstName,
    LastName,
    AdmissionNumber,
    Status,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum SubjectAssignments {
    #[sea_orm(iden = "subject_assignments")]
    Table,
    Id,
    TeacherId,
    ClassId,
    SubjectName,
    Term,
    AcademicYear,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Scores {
    #[sea_orm(iden = "scores")]
    Table,
    Id,
    StudentId,
    AssignmentId,
    Ca1,
    Ca2,
    Exam,
    Total,
    Grade,
    Remark,
    Status,
    ClassAverage,
    ClassMin,
    ClassMax,
    SubjectPosition,
    EnteredBy,
    SubmittedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum AffectiveDomains {
    #[sea_orm(iden = "affective_domains")]
    Table,
    Id,
    StudentId,
    ClassId,
    Term,
    AcademicYear,
    Punctuality,
    Neatness,
    Politeness,
    Honesty,
    RelationshipWithOthers,
    Remarks,
    RatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum PsychomotorDomains {
    #[sea_orm(iden = "psychomotor_domains")]
    Table,
    Id,
    StudentId,
    ClassId,
    Term,
    AcademicYear,
    Handwriting,
    VerbalFluency,
    Games,
    Sports,
    HandlingTools,
    DrawingPainting,
    Remarks,
    RatedBy,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum CompiledResults {
    #[sea_orm(iden = "compiled_results")]
    Table,
    Id,
    StudentId,
    ClassId,
    Term,
    AcademicYear,
    SubjectScores,
    AffectiveId,
    PsychomotorId,
    TotalScore,
    AverageScore,
    ClassAverage,
    Position,
    TotalStudents,
    SubjectsCount,
    TeacherComment,
    Status,
    CompiledBy,
    CompiledAt,
    ApprovedBy,
    ApprovedAt,
    RejectionReason,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Notifications {
    #[sea_orm(iden = "notifications")]
    Table,
    Id,
    Title,
    Message,
    NotificationType,
    TargetAudience,
    CreatedBy,
    CreatedAt,
}
