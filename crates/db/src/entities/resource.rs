//! Resource entity (community-submitted asset listings).

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Kind of asset a resource links to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ResourceType {
    #[sea_orm(string_value = "Figma")]
    Figma,
    #[sea_orm(string_value = "SVG")]
    #[serde(rename = "SVG")]
    Svg,
    #[sea_orm(string_value = "CSS")]
    #[serde(rename = "CSS")]
    Css,
    #[sea_orm(string_value = "GitHub")]
    GitHub,
    #[sea_orm(string_value = "CodePen")]
    CodePen,
    #[sea_orm(string_value = "Link")]
    Link,
    #[sea_orm(string_value = "PDF")]
    #[serde(rename = "PDF")]
    Pdf,
    #[sea_orm(string_value = "ZIP")]
    #[serde(rename = "ZIP")]
    Zip,
}

impl ResourceType {
    /// Badge text shown in listings and digest emails.
    #[must_use]
    pub const fn as_label(self) -> &'static str {
        match self {
            Self::Figma => "Figma",
            Self::Svg => "SVG",
            Self::Css => "CSS",
            Self::GitHub => "GitHub",
            Self::CodePen => "CodePen",
            Self::Link => "Link",
            Self::Pdf => "PDF",
            Self::Zip => "ZIP",
        }
    }
}

/// Directory section a resource is filed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ResourceCategory {
    #[sea_orm(string_value = "DESIGN SYSTEMS")]
    #[serde(rename = "DESIGN SYSTEMS")]
    DesignSystems,
    #[sea_orm(string_value = "CODE TEMPLATES")]
    #[serde(rename = "CODE TEMPLATES")]
    CodeTemplates,
    #[sea_orm(string_value = "INSPIRATION")]
    #[serde(rename = "INSPIRATION")]
    Inspiration,
    #[sea_orm(string_value = "BLOGS")]
    #[serde(rename = "BLOGS")]
    Blogs,
}

/// Moderation status.
///
/// Every submission starts `pending`; only `approved` resources are
/// publicly visible. `approved` and `rejected` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
#[serde(rename_all = "lowercase")]
pub enum ResourceStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "approved")]
    Approved,
    #[sea_orm(string_value = "rejected")]
    Rejected,
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "resource")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,

    pub name: String,

    /// Asset kind (shown as a badge in listings)
    pub r#type: ResourceType,

    #[sea_orm(indexed)]
    pub category: ResourceCategory,

    #[sea_orm(column_type = "Text")]
    pub description: String,

    pub download_url: String,

    pub author: String,

    /// Free-form size label ("2.4 MB", "12 components")
    #[sea_orm(nullable)]
    pub size: Option<String>,

    /// Submission date
    pub date: DateTimeWithTimeZone,

    #[sea_orm(indexed)]
    pub status: ResourceStatus,

    pub created_at: DateTimeWithTimeZone,

    #[sea_orm(nullable)]
    pub updated_at: Option<DateTimeWithTimeZone>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::download_event::Entity")]
    DownloadEvents,

    #[sea_orm(has_many = "super::resource_like::Entity")]
    Likes,
}

impl Related<super::download_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::DownloadEvents.def()
    }
}

impl Related<super::resource_like::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Likes.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
