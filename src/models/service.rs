use serde::{Deserialize, Serialize};

use super::availability::ServiceAvailability;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Hunting,
    Fishing,
    Recreation,
    Tours,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Hunting => "hunting",
            Category::Fishing => "fishing",
            Category::Recreation => "recreation",
            Category::Tours => "tours",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "hunting" => Some(Category::Hunting),
            "fishing" => Some(Category::Fishing),
            "recreation" => Some(Category::Recreation),
            "tours" => Some(Category::Tours),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    pub id: String,
    pub category: Category,
    pub title: String,
    pub supplier: String,
    pub location: String,
    pub image: String,
    pub description: String,
    pub duration: String,
    pub duration_days: u32,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<f64>,
    pub rating: f32,
    #[serde(default)]
    pub availability: Vec<ServiceAvailability>,
}

impl Service {
    pub fn availability_on(&self, date: chrono::NaiveDate) -> Option<&ServiceAvailability> {
        self.availability.iter().find(|d| d.date == date)
    }

    pub fn discount_percent(&self) -> Option<u32> {
        let original = self.original_price?;
        if original <= self.price || original <= 0.0 {
            return None;
        }
        Some((((original - self.price) / original) * 100.0).round() as u32)
    }
}
