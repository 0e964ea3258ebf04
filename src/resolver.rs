//! Turns a link or search query into playable track records.
//!
//! Resolution shells out to `yt-dlp` with `--flat-playlist`, so a playlist
//! link expands into all of its entries in one call. Entries yt-dlp cannot
//! resolve (deleted or region-locked videos) are counted, not fatal.

use std::time::Duration;

use itertools::Itertools;
use tracing::instrument;

use crate::player::track::QueuedTrack;
use crate::player::track::TrackOrigin;
use crate::serenity;
use crate::MynahError;

/// The value yt-dlp prints for a field it could not fill in.
const MISSING_FIELD: &str = "NA";

/// A resolved track, missing only the request provenance.
#[derive(Debug, Clone)]
pub struct ResolvedTrack {
    pub title: String,
    pub url: String,
    pub duration: Option<Duration>,
    pub thumbnail_url: Option<String>,
    pub origin: TrackOrigin,
}

impl ResolvedTrack {
    /// Attach request provenance, completing a [QueuedTrack].
    pub fn requested_by(
        self,
        user: serenity::UserId,
        channel: serenity::ChannelId,
    ) -> QueuedTrack {
        QueuedTrack {
            title: self.title,
            url: self.url,
            duration: self.duration,
            thumbnail_url: self.thumbnail_url,
            origin: self.origin,
            requested_by: user,
            channel_id: channel,
        }
    }
}

/// The outcome of resolving one query: the tracks that resolved, plus how
/// many entries could not be found.
#[derive(Debug, Default)]
pub struct Resolution {
    pub tracks: Vec<ResolvedTrack>,
    pub not_found: usize,
}

/// Resolve a link or search query.
///
/// A full url (video or playlist) is handed to yt-dlp as-is; anything else
/// becomes a best-match search.
#[instrument(err)]
pub async fn resolve(query: &str) -> Result<Resolution, MynahError> {
    let target = match url::Url::parse(query) {
        Ok(url) => url.to_string(),
        Err(_) => format!("ytsearch1:{query}"),
    };

    let ytdlp_args = [
        "--no-warnings",
        "--ignore-config",
        "--flat-playlist",
        "--print",
        "%(title)s",
        "--print",
        "%(duration)s",
        "--print",
        "%(thumbnail)s",
        "--print",
        "%(webpage_url)s",
        &target,
    ];

    let ytdlp_output = tokio::process::Command::new("yt-dlp")
        .args(ytdlp_args)
        .stdin(std::process::Stdio::null())
        .output()
        .await
        .map_err(MynahError::IoError)?;

    // Convert `Output` into a string, this should never fail
    let out_string = String::from_utf8(ytdlp_output.stdout).map_err(MynahError::Utf8Error)?;

    Ok(parse_output(&out_string))
}

/// Parse yt-dlp output: four printed lines per entry.
fn parse_output(out: &str) -> Resolution {
    let records: Vec<_> = out
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .tuples::<(_, _, _, _)>()
        .collect();

    let origin = if records.len() > 1 {
        TrackOrigin::Playlist
    } else {
        TrackOrigin::Single
    };

    let mut resolution = Resolution::default();
    for (title, duration, thumbnail, url) in records {
        if title == MISSING_FIELD || url == MISSING_FIELD {
            resolution.not_found += 1;
            continue;
        }

        resolution.tracks.push(ResolvedTrack {
            title: title.to_string(),
            url: url.to_string(),
            duration: parse_duration(duration),
            thumbnail_url: (thumbnail != MISSING_FIELD).then(|| thumbnail.to_string()),
            origin,
        });
    }

    resolution
}

/// yt-dlp prints durations as seconds, sometimes fractional, or `NA`.
fn parse_duration(field: &str) -> Option<Duration> {
    let secs: f64 = field.parse().ok()?;
    if secs.is_finite() && secs >= 0.0 {
        Some(Duration::from_secs(secs.round() as u64))
    } else {
        None
    }
}
