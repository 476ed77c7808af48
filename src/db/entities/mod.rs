//! SeaORM entities for the poster service.
//!
//! One module per table. The prelude re-exports every entity under a short name.

pub mod alert;
pub mod audit_log;
pub mod device;
pub mod device_location;
pub mod device_token;
pub mod local_authority;
pub mod location;
pub mod poster;
pub mod poster_section;
pub mod poster_template;
pub mod user;
pub mod water_quality_data;

pub mod prelude {
    pub use super::local_authority::Entity as LocalAuthority;
    pub use super::local_authority::Model as LocalAuthorityModel;
    pub use super::local_authority::ActiveModel as LocalAuthorityActiveModel;
    pub use super::local_authority::Column as LocalAuthorityColumn;

    pub use super::user::Entity as User;
    pub use super::user::Model as UserModel;
    pub use super::user::ActiveModel as UserActiveModel;
    pub use super::user::Column as UserColumn;

    pub use super::location::Entity as Location;
    pub use super::location::Model as LocationModel;
    pub use super::location::ActiveModel as LocationActiveModel;
    pub use super::location::Column as LocationColumn;

    pub use super::water_quality_data::Entity as WaterQualityData;
    pub use super::water_quality_data::Model as WaterQualityDataModel;
    pub use super::water_quality_data::ActiveModel as WaterQualityDataActiveModel;
    pub use super::water_quality_data::Column as WaterQualityDataColumn;

    pub use super::alert::Entity as Alert;
    pub use super::alert::Model as AlertModel;
    pub use super::alert::ActiveModel as AlertActiveModel;
    pub use super::alert::Column as AlertColumn;

    pub use super::poster_template::Entity as PosterTemplate;
    pub use super::poster_template::Model as PosterTemplateModel;
    pub use super::poster_template::ActiveModel as PosterTemplateActiveModel;
    pub use super::poster_template::Column as PosterTemplateColumn;

    pub use super::poster::Entity as Poster;
    pub use super::poster::Model as PosterModel;
    pub use super::poster::ActiveModel as PosterActiveModel;
    pub use super::poster::Column as PosterColumn;

    pub use super::poster_section::Entity as PosterSection;
    pub use super::poster_section::Model as PosterSectionModel;
    pub use super::poster_section::ActiveModel as PosterSectionActiveModel;
    pub use super::poster_section::Column as PosterSectionColumn;

    pub use super::device::Entity as Device;
    pub use super::device::Model as DeviceModel;
    pub use super::device::ActiveModel as DeviceActiveModel;
    pub use super::device::Column as DeviceColumn;

    pub use super::device_location::Entity as DeviceLocation;
    pub use super::device_location::Model as DeviceLocationModel;
    pub use super::device_location::ActiveModel as DeviceLocationActiveModel;
    pub use super::device_location::Column as DeviceLocationColumn;

    pub use super::device_token::Entity as DeviceToken;
    pub use super::device_token::Model as DeviceTokenModel;
    pub use super::device_token::ActiveModel as DeviceTokenActiveModel;
    pub use super::device_token::Column as DeviceTokenColumn;

    pub use super::audit_log::Entity as AuditLog;
    pub use super::audit_log::Model as AuditLogModel;
    pub use super::audit_log::ActiveModel as AuditLogActiveModel;
    pub use super::audit_log::Column as AuditLogColumn;
}
