use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Singleton row: home page copy plus the admin password hash.
#[derive(Debug, Serialize, Deserialize, FromRow, Clone)]
pub struct Settings {
    pub id: i32,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_button_link: String,
    #[serde(skip_serializing)]
    pub admin_password_hash: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct HomeContent {
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub cta_button_link: String,
}

impl Settings {
    pub const ROW_ID: i32 = 1;

    pub fn new(content: HomeContent, admin_password_hash: String) -> Self {
        Self {
            id: Self::ROW_ID,
            title: content.title,
            subtitle: content.subtitle,
            description: content.description,
            cta_button_link: content.cta_button_link,
            admin_password_hash,
        }
    }

    pub fn content(&self) -> HomeContent {
        HomeContent {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            description: self.description.clone(),
            cta_button_link: self.cta_button_link.clone(),
        }
    }
}

impl Default for HomeContent {
    fn default() -> Self {
        Self {
            title: "Lucas Barbearia".to_string(),
            subtitle: "Estilo e Precisão em Cada Corte".to_string(),
            description: "Tradição e modernidade em um só lugar. Agende seu horário online.".to_string(),
            cta_button_link: "https://wa.me/5511999999999".to_string(),
        }
    }
}
