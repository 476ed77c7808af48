use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DbConn, DbErr, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

use crate::db::entities::{location, poster, poster_section, poster_template, prelude::*};
use crate::db::enums::{
    Orientation, PosterLanguage, PosterSize, PosterType, SectionType, TemplateCode,
};
use crate::db::services::{PAGE_SIZE, Page};
use crate::pdf_generation::text::sanitize_filename;

#[derive(Debug, Clone)]
pub struct NewPoster {
    pub location_id: i32,
    pub template_id: i32,
    pub size: PosterSize,
    pub orientation: Orientation,
    pub language: PosterLanguage,
    pub recommended_template_id: Option<i32>,
    pub template_was_overridden: bool,
    pub override_reason: String,
    pub custom_notification: String,
    pub water_quality_data: Value,
    pub generated_by: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewSection {
    pub poster_id: i32,
    pub section_type: SectionType,
    pub pdf_file: String,
    pub content: Value,
    pub generated_by: Option<i32>,
}

/// A poster with the names needed to list it.
#[derive(Debug, Clone, Serialize)]
pub struct PosterListItem {
    pub id: i32,
    pub location_id: i32,
    pub location_name: String,
    pub template_code: Option<TemplateCode>,
    pub poster_type: PosterType,
    pub size: PosterSize,
    pub orientation: Orientation,
    pub language: PosterLanguage,
    pub filename: String,
    pub template_was_overridden: bool,
    pub generated_by: Option<i32>,
    pub generated_at: DateTime<Utc>,
    pub published_to_ckan: bool,
}

/// Download name: `{name}_{code}_{size}_{YYYYMMDD_HHMMSS}.pdf`, sanitized.
pub fn poster_filename(
    location_name: &str,
    code: TemplateCode,
    size: PosterSize,
    generated_at: DateTime<Utc>,
) -> String {
    let raw = format!(
        "{}_{}_{}_{}.pdf",
        location_name,
        code,
        size,
        generated_at.format("%Y%m%d_%H%M%S")
    );
    sanitize_filename(&raw)
}

pub async fn create_poster(db: &DbConn, new: NewPoster) -> Result<poster::Model, DbErr> {
    poster::ActiveModel {
        location_id: Set(new.location_id),
        template_id: Set(new.template_id),
        poster_type: Set(PosterType::Full),
        size: Set(new.size),
        orientation: Set(new.orientation),
        language: Set(new.language),
        pdf_file: Set(String::new()),
        recommended_template_id: Set(new.recommended_template_id),
        template_was_overridden: Set(new.template_was_overridden),
        override_reason: Set(new.override_reason),
        custom_notification: Set(new.custom_notification),
        water_quality_data: Set(new.water_quality_data),
        supplementary_content: Set(Value::Object(Default::default())),
        generated_by: Set(new.generated_by),
        generated_at: Set(Utc::now()),
        published_to_ckan: Set(false),
        ckan_resource_id: Set(String::new()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn set_pdf_file(
    db: &DbConn,
    poster: poster::Model,
    pdf_file: String,
) -> Result<poster::Model, DbErr> {
    let mut active: poster::ActiveModel = poster.into();
    active.pdf_file = Set(pdf_file);
    active.update(db).await
}

pub async fn mark_published(
    db: &DbConn,
    poster: poster::Model,
    resource_id: String,
) -> Result<poster::Model, DbErr> {
    let mut active: poster::ActiveModel = poster.into();
    active.published_to_ckan = Set(true);
    active.ckan_resource_id = Set(resource_id);
    active.update(db).await
}

fn scoped(local_authority_id: i32) -> sea_orm::Select<Poster> {
    Poster::find()
        .join(JoinType::InnerJoin, poster::Relation::Location.def())
        .filter(location::Column::LocalAuthorityId.eq(local_authority_id))
}

pub async fn get_poster(
    db: &DbConn,
    local_authority_id: i32,
    poster_id: i32,
) -> Result<Option<poster::Model>, DbErr> {
    scoped(local_authority_id)
        .filter(poster::Column::Id.eq(poster_id))
        .one(db)
        .await
}

pub async fn poster_count(db: &DbConn, local_authority_id: i32) -> Result<u64, DbErr> {
    scoped(local_authority_id).count(db).await
}

pub async fn recent_posters(
    db: &DbConn,
    local_authority_id: i32,
    limit: u64,
) -> Result<Vec<poster::Model>, DbErr> {
    scoped(local_authority_id)
        .order_by_desc(poster::Column::GeneratedAt)
        .order_by_desc(poster::Column::Id)
        .limit(limit)
        .all(db)
        .await
}

/// Newest first.
pub async fn list_posters(
    db: &DbConn,
    local_authority_id: i32,
    page: u64,
) -> Result<Page<poster::Model>, DbErr> {
    let paginator = scoped(local_authority_id)
        .order_by_desc(poster::Column::GeneratedAt)
        .order_by_desc(poster::Column::Id)
        .paginate(db, PAGE_SIZE);
    let count = paginator.num_items().await?;
    let num_pages = count.div_ceil(PAGE_SIZE).max(1);
    let page = page.clamp(1, num_pages);
    let items = paginator.fetch_page(page - 1).await?;
    Ok(Page { items, count, page, num_pages })
}

/// Attaches location names and template codes for listing.
pub async fn with_details(
    db: &DbConn,
    posters: Vec<poster::Model>,
) -> Result<Vec<PosterListItem>, DbErr> {
    let location_ids: Vec<i32> = posters.iter().map(|p| p.location_id).collect();
    let template_ids: Vec<i32> = posters.iter().map(|p| p.template_id).collect();

    let names: HashMap<i32, String> = Location::find()
        .filter(location::Column::Id.is_in(location_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|l| (l.id, l.name_en))
        .collect();
    let codes: HashMap<i32, TemplateCode> = PosterTemplate::find()
        .filter(poster_template::Column::Id.is_in(template_ids))
        .all(db)
        .await?
        .into_iter()
        .map(|t| (t.id, t.code))
        .collect();

    Ok(posters
        .into_iter()
        .map(|p| {
            let location_name = names.get(&p.location_id).cloned().unwrap_or_default();
            let template_code = codes.get(&p.template_id).copied();
            let filename = template_code
                .map(|code| poster_filename(&location_name, code, p.size, p.generated_at))
                .unwrap_or_default();
            PosterListItem {
                id: p.id,
                location_id: p.location_id,
                location_name,
                template_code,
                poster_type: p.poster_type,
                size: p.size,
                orientation: p.orientation,
                language: p.language,
                filename,
                template_was_overridden: p.template_was_overridden,
                generated_by: p.generated_by,
                generated_at: p.generated_at,
                published_to_ckan: p.published_to_ckan,
            }
        })
        .collect())
}

pub async fn create_section(
    db: &DbConn,
    new: NewSection,
) -> Result<poster_section::Model, DbErr> {
    poster_section::ActiveModel {
        poster_id: Set(new.poster_id),
        section_type: Set(new.section_type),
        pdf_file: Set(new.pdf_file),
        content: Set(new.content),
        generated_by: Set(new.generated_by),
        generated_at: Set(Utc::now()),
        ..Default::default()
    }
    .insert(db)
    .await
}

pub async fn sections_for(
    db: &DbConn,
    poster_id: i32,
) -> Result<Vec<poster_section::Model>, DbErr> {
    PosterSection::find()
        .filter(poster_section::Column::PosterId.eq(poster_id))
        .order_by_desc(poster_section::Column::GeneratedAt)
        .all(db)
        .await
}
