//! SeaORM Entity for questions table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize,
)]
#[sea_orm(rs_type = "String", db_type = "String(Some(16))")]
#[serde(rename_all = "UPPERCASE")]
#[derive(Default)]
pub enum QuestionType {
    #[sea_orm(string_value = "TEXT")]
    #[default]
    Text,
    #[sea_orm(string_value = "TEXTAREA")]
    Textarea,
    #[sea_orm(string_value = "RADIO")]
    Radio,
    #[sea_orm(string_value = "CHECKBOX")]
    Checkbox,
    #[sea_orm(string_value = "SELECT")]
    Select,
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub survey_id: i32,
    pub title: String,
    pub question_type: QuestionType,
    /// JSON array of option labels
    #[sea_orm(column_type = "Text", nullable)]
    pub options: Option<String>,
    pub display_order: i32,
    pub required: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::surveys::Entity",
        from = "Column::SurveyId",
        to = "super::surveys::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Survey,
    #[sea_orm(has_many = "super::answers::Entity")]
    Answers,
}

impl Related<super::surveys::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Survey.def()
    }
}

impl Related<super::answers::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Answers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
