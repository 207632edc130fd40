use thiserror::Error;
use url::Url;

use crate::content::MediaKind;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum MediaError {
    #[error("media source is missing")]
    MissingSource,
    #[error("media source {0:?} is not an absolute URL: {1}")]
    InvalidSource(String, String),
    #[error("media failed to load: {0}")]
    LoadFailed(String),
}

impl MediaError {
    /// Short text shown to visitors under the fallback image.
    pub fn user_message(&self, kind: Option<MediaKind>) -> String {
        let noun = match kind {
            Some(MediaKind::Video) => "video",
            Some(MediaKind::Image) => "image",
            None => "media",
        };
        match self {
            MediaError::MissingSource | MediaError::InvalidSource(..) => {
                format!("This {} isn't available right now.", noun)
            }
            MediaError::LoadFailed(_) => format!("The {} couldn't be loaded.", noun),
        }
    }
}

pub fn validate_source(src: &str) -> Result<Url, MediaError> {
    let src = src.trim();
    if src.is_empty() {
        return Err(MediaError::MissingSource);
    }
    let url = Url::parse(src).map_err(|e| MediaError::InvalidSource(src.to_string(), e.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(MediaError::InvalidSource(src.to_string(), "not a hierarchical URL".to_string()));
    }
    Ok(url)
}

#[derive(Clone, Debug, PartialEq)]
pub enum MediaStatus {
    Loading,
    Ready,
    Playing,
    Paused,
    Ended,
    /// Autoplay was refused even muted; show the play button.
    AwaitingGesture,
    Failed(MediaError),
}

#[derive(Clone, Debug, PartialEq)]
pub enum MediaEvent {
    Loaded,
    Error(String),
    Played,
    Paused,
    Ended,
    PlayRejected { muted: bool },
}

/// What the host should do with the element after an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaAction {
    None,
    RetryMuted,
    Fail,
}

#[derive(Clone, Debug, PartialEq)]
pub struct MediaPlayback {
    status: MediaStatus,
}

impl MediaPlayback {
    /// Invalid sources start out failed so the spinner is never shown for them.
    pub fn new(src: &str) -> Self {
        let status = match validate_source(src) {
            Ok(_) => MediaStatus::Loading,
            Err(e) => MediaStatus::Failed(e),
        };
        Self { status }
    }

    pub fn status(&self) -> &MediaStatus {
        &self.status
    }

    pub fn is_failed(&self) -> bool {
        matches!(self.status, MediaStatus::Failed(_))
    }

    pub fn show_spinner(&self) -> bool {
        self.status == MediaStatus::Loading
    }

    pub fn show_play_button(&self) -> bool {
        matches!(self.status, MediaStatus::AwaitingGesture | MediaStatus::Paused | MediaStatus::Ended)
    }

    pub fn on_event(&mut self, event: MediaEvent) -> MediaAction {
        if self.is_failed() {
            return MediaAction::None;
        }
        match event {
            MediaEvent::Loaded => {
                if self.status == MediaStatus::Loading {
                    self.status = MediaStatus::Ready;
                }
                MediaAction::None
            }
            MediaEvent::Error(reason) => {
                self.status = MediaStatus::Failed(MediaError::LoadFailed(reason));
                MediaAction::Fail
            }
            MediaEvent::Played => {
                self.status = MediaStatus::Playing;
                MediaAction::None
            }
            MediaEvent::Paused => {
                if self.status != MediaStatus::Ended {
                    self.status = MediaStatus::Paused;
                }
                MediaAction::None
            }
            MediaEvent::Ended => {
                self.status = MediaStatus::Ended;
                MediaAction::None
            }
            MediaEvent::PlayRejected { muted: false } => MediaAction::RetryMuted,
            MediaEvent::PlayRejected { muted: true } => {
                self.status = MediaStatus::AwaitingGesture;
                MediaAction::None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const CLIP: &str = "https://cdn.example.com/camp/hero.mp4";

    #[test]
    fn absolute_urls_validate() {
        assert_eq!(validate_source(CLIP).unwrap().host_str(), Some("cdn.example.com"));
    }

    #[test]
    fn empty_and_relative_sources_are_rejected() {
        assert_eq!(validate_source("   "), Err(MediaError::MissingSource));
        assert!(matches!(validate_source("/assets/hero.mp4"), Err(MediaError::InvalidSource(..))));
        assert!(matches!(validate_source("data:video/mp4"), Err(MediaError::InvalidSource(..))));
    }

    #[test]
    fn invalid_source_fails_without_spinner() {
        let media = MediaPlayback::new("");
        assert!(media.is_failed());
        assert!(!media.show_spinner());
    }

    #[test]
    fn valid_source_loads_then_plays() {
        let mut media = MediaPlayback::new(CLIP);
        assert!(media.show_spinner());
        media.on_event(MediaEvent::Loaded);
        assert_eq!(media.status(), &MediaStatus::Ready);
        media.on_event(MediaEvent::Played);
        assert_eq!(media.status(), &MediaStatus::Playing);
        media.on_event(MediaEvent::Ended);
        media.on_event(MediaEvent::Paused);
        assert_eq!(media.status(), &MediaStatus::Ended);
        assert!(media.show_play_button());
    }

    #[test]
    fn autoplay_rejection_retries_muted_then_waits_for_gesture() {
        let mut media = MediaPlayback::new(CLIP);
        assert_eq!(media.on_event(MediaEvent::PlayRejected { muted: false }), MediaAction::RetryMuted);
        assert_eq!(media.on_event(MediaEvent::PlayRejected { muted: true }), MediaAction::None);
        assert_eq!(media.status(), &MediaStatus::AwaitingGesture);
        assert!(media.show_play_button());
    }

    #[test]
    fn visitor_message_names_the_media_kind() {
        let err = MediaError::LoadFailed("404".into());
        assert_eq!(err.user_message(Some(MediaKind::Video)), "The video couldn't be loaded.");
        assert_eq!(err.user_message(Some(MediaKind::Image)), "The image couldn't be loaded.");
        assert_eq!(
            MediaError::MissingSource.user_message(None),
            "This media isn't available right now."
        );
    }

    #[test]
    fn load_error_is_terminal() {
        let mut media = MediaPlayback::new(CLIP);
        assert_eq!(media.on_event(MediaEvent::Error("decode".into())), MediaAction::Fail);
        assert_eq!(media.on_event(MediaEvent::Played), MediaAction::None);
        assert_eq!(
            media.status(),
            &MediaStatus::Failed(MediaError::LoadFailed("decode".into()))
        );
    }
}
