//! Museum and booking models

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// 博物馆（只读）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Museum {
    #[serde(alias = "id")]
    pub museum_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

/// 用户的预约记录（只读，由后端创建与删除）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(alias = "id")]
    pub booking_id: i64,
    #[serde(default)]
    pub museum_id: Option<i64>,
    pub museum_name: String,
    #[serde(default)]
    pub museum_location: Option<String>,
    pub visit_date: NaiveDate,
    pub ticket_type: String,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}
