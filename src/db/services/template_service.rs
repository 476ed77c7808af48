use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::entities::{poster_template, prelude::PosterTemplate};
use crate::db::enums::{Classification, TemplateCode};

/// Name and description of each poster template.
pub const TEMPLATE_DEFINITIONS: &[(TemplateCode, &str, &str)] = &[
    (
        TemplateCode::T1A,
        "Identified - No Restrictions",
        "Identified bathing water with no current restrictions or advisories.",
    ),
    (
        TemplateCode::T1B,
        "Identified - Temporary Restrictions",
        "Identified bathing water with a temporary restriction, advisory or prohibition in place.",
    ),
    (
        TemplateCode::T1C,
        "Identified - Season-Long Restrictions",
        "Identified bathing water with a restriction in place for the whole bathing season.",
    ),
    (
        TemplateCode::T2A,
        "Non-Identified - With Restrictions",
        "Non-identified water with a restriction or advisory in place.",
    ),
    (
        TemplateCode::T2B,
        "Non-Identified - No Restrictions",
        "Non-identified water with no current restrictions.",
    ),
];

pub async fn get_template(db: &DbConn, id: i32) -> Result<Option<poster_template::Model>, DbErr> {
    PosterTemplate::find_by_id(id).one(db).await
}

pub async fn get_by_code(
    db: &DbConn,
    code: TemplateCode,
) -> Result<Option<poster_template::Model>, DbErr> {
    PosterTemplate::find()
        .filter(poster_template::Column::Code.eq(code))
        .one(db)
        .await
}

/// Active templates usable for a location of the given classification.
pub async fn active_templates_for(
    db: &DbConn,
    classification: Classification,
) -> Result<Vec<poster_template::Model>, DbErr> {
    PosterTemplate::find()
        .filter(poster_template::Column::Classification.eq(classification))
        .filter(poster_template::Column::IsActive.eq(true))
        .order_by_asc(poster_template::Column::Code)
        .all(db)
        .await
}

/// Inserts any of the five templates that are missing. Returns how many were created.
pub async fn ensure_templates(db: &DbConn) -> Result<usize, DbErr> {
    let mut created = 0;
    for (code, name, description) in TEMPLATE_DEFINITIONS {
        if get_by_code(db, *code).await?.is_some() {
            continue;
        }
        poster_template::ActiveModel {
            code: Set(*code),
            name: Set(name.to_string()),
            description: Set(description.to_string()),
            classification: Set(code.classification()),
            is_active: Set(true),
            created_at: Set(Utc::now()),
            ..Default::default()
        }
        .insert(db)
        .await?;
        created += 1;
    }
    Ok(created)
}
