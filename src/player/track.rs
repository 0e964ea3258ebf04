//! The queued track model and its display implementation.

use std::fmt::Display;
use std::time::Duration;

use crate::serenity;

/// Whether a track was requested on its own or expanded from a playlist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackOrigin {
    Single,
    Playlist,
}

/// One entry in a player's queue.
///
/// Immutable once constructed; carries no reference back to the player that
/// owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueuedTrack {
    /// Title of the track.
    pub title: String,
    /// Canonical url of the source.
    pub url: String,
    /// Duration of the track, when the source reports one.
    pub duration: Option<Duration>,
    /// Url to the source's thumbnail.
    pub thumbnail_url: Option<String>,
    /// How this track entered the queue.
    pub origin: TrackOrigin,
    /// The user that requested it.
    pub requested_by: serenity::UserId,
    /// The text channel the request came from.
    pub channel_id: serenity::ChannelId,
}

/// Meant to be displayed in discord as a markdown link.
impl Display for QueuedTrack {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let title = &self.title;
        let duration = match self.duration {
            None => String::new(),
            Some(ref dur) => format!(" {}", format_duration(dur)),
        };
        write!(f, "[{title}{duration}]({url})", url = self.url)
    }
}

/// Helper function to format a duration.
pub fn format_duration(dur: &Duration) -> String {
    let total_secs = dur.as_secs();
    let total_mins = total_secs / 60;

    let hours = total_mins / 60;
    let mins = total_mins % 60;
    let secs = total_secs % 60;

    if hours > 0 {
        format!("[{hours:02}h:{mins:02}m:{secs:02}s]")
    } else {
        format!("[{mins:02}m:{secs:02}s]")
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn durations_format_with_and_without_hours() {
        assert_eq!(format_duration(&Duration::from_secs(62)), "[01m:02s]");
        assert_eq!(format_duration(&Duration::from_secs(3723)), "[01h:02m:03s]");
    }

    #[test]
    fn display_is_a_markdown_link() {
        let track = QueuedTrack {
            title: "Test Song".to_string(),
            url: "https://example.com/v".to_string(),
            duration: Some(Duration::from_secs(90)),
            thumbnail_url: None,
            origin: TrackOrigin::Single,
            requested_by: serenity::UserId::new(1),
            channel_id: serenity::ChannelId::new(2),
        };
        assert_eq!(
            track.to_string(),
            "[Test Song [01m:30s]](https://example.com/v)"
        );
    }
}
