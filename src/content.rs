use gloo_net::http::Request;
use serde::Deserialize;
use thiserror::Error;

use crate::config::{self, HeroConfig, HeroVariant};

#[derive(Clone, Copy, Debug, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    Video,
    Image,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MediaDescriptor {
    pub kind: MediaKind,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub poster: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HeroContent {
    pub enabled: bool,
    pub hero_image: String,
    pub media: Option<MediaDescriptor>,
    pub title: String,
    pub subtitle: String,
    pub variant: HeroVariant,
    /// Full tunables; wins over `variant` when present.
    pub config: Option<HeroConfig>,
}

impl HeroContent {
    pub fn hero_config(&self) -> HeroConfig {
        self.config.clone().unwrap_or_else(|| self.variant.preset())
    }
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Section {
    pub id: String,
    pub heading: String,
    pub body: String,
    pub image: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct HomeContent {
    pub hero: HeroContent,
    pub sections: Vec<Section>,
}

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("request failed: {0}")]
    Network(#[from] gloo_net::Error),
    #[error("CMS answered with status {0}")]
    Status(u16),
}

impl HomeContent {
    /// Shown when the CMS can't be reached.
    pub fn fallback() -> Self {
        Self {
            hero: HeroContent {
                enabled: false,
                hero_image: "/assets/hero-fallback.jpg".to_string(),
                media: None,
                title: "Train Like a Pro".to_string(),
                subtitle: "Summer camps for young athletes".to_string(),
                variant: HeroVariant::Single,
                config: None,
            },
            sections: vec![Section {
                id: "programs".to_string(),
                heading: "Our Programs".to_string(),
                body: "Week-long camps led by experienced coaches, for every level.".to_string(),
                image: None,
            }],
        }
    }
}

pub async fn fetch_home_content() -> Result<HomeContent, ContentError> {
    let response = Request::get(&format!("{}/api/content/home", config::get_cms_url()))
        .send()
        .await?;
    if !response.ok() {
        return Err(ContentError::Status(response.status()));
    }
    Ok(response.json::<HomeContent>().await?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let content: HomeContent = serde_json::from_str(
            r#"{"hero": {"enabled": true, "title": "Elite Camp",
                "media": {"kind": "video", "src": "https://cdn.example.com/a.mp4"}}}"#,
        )
        .unwrap();
        assert!(content.hero.enabled);
        assert_eq!(content.hero.subtitle, "");
        assert_eq!(
            content.hero.media,
            Some(MediaDescriptor {
                kind: MediaKind::Video,
                src: "https://cdn.example.com/a.mp4".to_string(),
                poster: None,
            })
        );
        assert!(content.sections.is_empty());
    }

    #[test]
    fn hero_config_overrides_are_parsed() {
        let content: HomeContent =
            serde_json::from_str(r#"{"hero": {"config": {"collapse_on_scroll_up": true}}}"#).unwrap();
        let config = content.hero.config.unwrap();
        assert!(config.collapse_on_scroll_up);
        assert_eq!(config.auto_continue_delay_ms, 500);
    }

    #[test]
    fn variant_selects_a_preset_unless_config_is_given() {
        let content: HeroContent = serde_json::from_str(r#"{"variant": "entry_exit"}"#).unwrap();
        assert_eq!(content.hero_config(), HeroConfig::entry_exit());

        let content: HeroContent = serde_json::from_str(
            r#"{"variant": "entry_exit", "config": {"nav_top_threshold": 80.0}}"#,
        )
        .unwrap();
        let config = content.hero_config();
        assert_eq!(config.nav_top_threshold, 80.0);
        assert_eq!(config.stages, crate::config::Stages::Single);
    }
}
