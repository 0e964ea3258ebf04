//! The ordered track queue and its play cursor.
//!
//! Positions are 1-based everywhere a user can see them; the cursor is a
//! 0-based index internally. Tracks before the cursor are the play history
//! and stay in the sequence so the player can rewind to them.

use std::fmt::Write;

use crate::error::UserError;

use super::track::QueuedTrack;

/// An embed description caps out at 4096 chars.
const EMBED_DESCRIPTION_LIMIT: usize = 4096;

/// Ordered queue of tracks plus the cursor of the one currently (or most
/// recently) playing.
///
/// Invariant: when the cursor is `Some(i)`, `i` is a valid index. Order is
/// insertion order apart from [push_back](Queue::push_back) and
/// [insert_next](Queue::insert_next).
#[derive(Debug, Default)]
pub struct Queue {
    tracks: Vec<QueuedTrack>,
    cursor: Option<usize>,
}

impl Queue {
    /// Number of tracks, played and unplayed.
    pub fn len(&self) -> usize {
        self.tracks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tracks.is_empty()
    }

    /// The track at the cursor, or `None` when nothing has ever played.
    pub fn current(&self) -> Option<&QueuedTrack> {
        self.cursor.and_then(|c| self.tracks.get(c))
    }

    /// 1-based position of the cursor.
    pub fn position(&self) -> Option<usize> {
        self.cursor.map(|c| c + 1)
    }

    /// All tracks in queue order.
    #[allow(dead_code)]
    pub fn tracks(&self) -> &[QueuedTrack] {
        &self.tracks
    }

    /// Append a track to the end of the queue.
    pub fn push_back(&mut self, track: QueuedTrack) {
        self.tracks.push(track);
    }

    /// Insert a track right after the cursor so it plays next.
    ///
    /// With no cursor the track goes to the front. Each call is relative to
    /// the cursor at that moment, so the most recent immediate insert plays
    /// soonest.
    pub fn insert_next(&mut self, track: QueuedTrack) {
        let at = self.cursor.map_or(0, |c| c + 1);
        self.tracks.insert(at, track);
    }

    /// Whether an unplayed track exists after the cursor.
    pub fn has_next(&self) -> bool {
        match self.cursor {
            None => !self.tracks.is_empty(),
            Some(c) => c + 1 < self.tracks.len(),
        }
    }

    /// Move the cursor to the next unplayed track and return it.
    ///
    /// Starts at the front when nothing has played yet. Returns `None`
    /// without moving when no unplayed track remains.
    pub fn advance(&mut self) -> Option<&QueuedTrack> {
        let next = match self.cursor {
            None => 0,
            Some(c) => c + 1,
        };
        if next >= self.tracks.len() {
            return None;
        }
        self.cursor = Some(next);
        self.tracks.get(next)
    }

    /// Move the cursor one position earlier and return the track there.
    ///
    /// This is a rewind, not a removal; everything after the cursor stays
    /// queued. Fails when the cursor is unset or already at the front.
    pub fn rewind(&mut self) -> Result<&QueuedTrack, UserError> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                Ok(&self.tracks[c - 1])
            }
            _ => Err(UserError::NoHistory),
        }
    }

    /// Remove `count` tracks starting at 1-based `start_pos`.
    ///
    /// Callers are expected to pass a range inside the queue; this re-checks
    /// and rejects anything else without touching the queue. A removed range
    /// that covers the cursor clamps it to the nearest remaining position,
    /// or clears it when the queue empties.
    pub fn remove_range(&mut self, start_pos: usize, count: usize) -> Result<(), UserError> {
        if count == 0 {
            return Ok(());
        }
        if start_pos == 0 {
            return Err(UserError::OutOfRange {
                position: start_pos,
                size: self.tracks.len(),
            });
        }

        let start = start_pos - 1;
        let end = start + count - 1; // inclusive
        if end >= self.tracks.len() {
            return Err(UserError::OutOfRange {
                position: end + 1,
                size: self.tracks.len(),
            });
        }

        self.tracks.drain(start..=end);

        if let Some(c) = self.cursor {
            self.cursor = if self.tracks.is_empty() {
                None
            } else if c < start {
                Some(c)
            } else if c > end {
                Some(c - count)
            } else if start > 0 {
                // Cursor was removed: fall back to the track just before the
                // removed range.
                Some(start - 1)
            } else {
                Some(0)
            };
        }

        Ok(())
    }

    /// Render the queue for a discord embed, one numbered line per track
    /// with a marker on the cursor, truncated to the embed limit.
    pub fn display_string(&self) -> String {
        if self.is_empty() {
            return "Empty queue!".to_string();
        }

        let mut buffer = String::new();
        for (index, track) in self.tracks.iter().enumerate() {
            let marker = if Some(index) == self.cursor { ">" } else { " " };
            let next_line = format!("`{pos}.`{marker} {track}", pos = index + 1);

            if buffer.len() + next_line.len() > EMBED_DESCRIPTION_LIMIT {
                break;
            }
            writeln!(buffer, "{next_line}").expect("write to string buffer can't fail");
        }
        buffer
    }

    #[cfg(test)]
    pub(super) fn set_cursor(&mut self, cursor: Option<usize>) {
        self.cursor = cursor;
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::super::track::TrackOrigin;
    use super::*;
    use crate::serenity;

    fn track(title: &str) -> QueuedTrack {
        QueuedTrack {
            title: title.to_string(),
            url: format!("https://example.com/{title}"),
            duration: None,
            thumbnail_url: None,
            origin: TrackOrigin::Single,
            requested_by: serenity::UserId::new(1),
            channel_id: serenity::ChannelId::new(2),
        }
    }

    fn titles(queue: &Queue) -> Vec<&str> {
        queue.tracks().iter().map(|t| t.title.as_str()).collect()
    }

    fn queue_of(names: &[&str]) -> Queue {
        let mut queue = Queue::default();
        for name in names {
            queue.push_back(track(name));
        }
        queue
    }

    #[test]
    fn push_back_appends_at_the_end() {
        let mut queue = queue_of(&["a", "b"]);
        queue.push_back(track("c"));
        assert_eq!(queue.len(), 3);
        assert_eq!(titles(&queue), vec!["a", "b", "c"]);
    }

    #[test]
    fn insert_next_lands_after_the_cursor() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_cursor(Some(0));
        queue.insert_next(track("x"));
        assert_eq!(titles(&queue), vec!["a", "x", "b", "c"]);
    }

    #[test]
    fn later_immediate_inserts_play_sooner() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_cursor(Some(0));
        queue.insert_next(track("x"));
        queue.insert_next(track("y"));
        assert_eq!(titles(&queue), vec!["a", "y", "x", "b"]);
    }

    #[test]
    fn insert_next_without_cursor_goes_to_the_front() {
        let mut queue = queue_of(&["a"]);
        queue.insert_next(track("x"));
        assert_eq!(titles(&queue), vec!["x", "a"]);
    }

    #[test]
    fn advance_walks_the_queue_in_order() {
        let mut queue = queue_of(&["a", "b"]);
        assert_eq!(queue.advance().map(|t| t.title.as_str()), Some("a"));
        assert_eq!(queue.advance().map(|t| t.title.as_str()), Some("b"));
        assert_eq!(queue.advance().map(|t| t.title.as_str()), None);
        // A failed advance leaves the cursor where it was.
        assert_eq!(queue.position(), Some(2));
    }

    #[test]
    fn rewind_moves_one_back_and_keeps_forward_tracks() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_cursor(Some(1));
        let track = queue.rewind().expect("history exists");
        assert_eq!(track.title, "a");
        assert_eq!(queue.position(), Some(1));
        assert_eq!(queue.len(), 3);
    }

    #[test]
    fn rewind_fails_at_the_front_or_without_cursor() {
        let mut queue = queue_of(&["a", "b"]);
        assert!(matches!(queue.rewind(), Err(UserError::NoHistory)));
        queue.set_cursor(Some(0));
        assert!(matches!(queue.rewind(), Err(UserError::NoHistory)));
        assert_eq!(queue.position(), Some(1));
    }

    #[test]
    fn remove_range_removes_exactly_the_named_positions() {
        let mut queue = queue_of(&["a", "b", "c", "d", "e"]);
        queue.remove_range(2, 3).expect("valid range");
        assert_eq!(titles(&queue), vec!["a", "e"]);
    }

    #[test]
    fn remove_range_past_the_end_is_rejected_unchanged() {
        let mut queue = queue_of(&["a", "b"]);
        let err = queue.remove_range(2, 2).expect_err("range runs past the end");
        assert!(matches!(err, UserError::OutOfRange { .. }));
        assert_eq!(titles(&queue), vec!["a", "b"]);

        let err = queue.remove_range(3, 1).expect_err("start past the end");
        assert!(matches!(err, UserError::OutOfRange { .. }));
        assert_eq!(queue.len(), 2);
    }

    #[test]
    fn removing_before_the_cursor_shifts_it() {
        let mut queue = queue_of(&["a", "b", "c"]);
        queue.set_cursor(Some(2));
        queue.remove_range(1, 1).expect("valid");
        assert_eq!(queue.position(), Some(2));
        assert_eq!(queue.current().map(|t| t.title.as_str()), Some("c"));
    }

    #[test]
    fn removing_the_cursor_clamps_to_the_previous_track() {
        let mut queue = queue_of(&["a", "b", "c", "d"]);
        queue.set_cursor(Some(2));
        queue.remove_range(3, 2).expect("valid");
        assert_eq!(titles(&queue), vec!["a", "b"]);
        assert_eq!(queue.current().map(|t| t.title.as_str()), Some("b"));
    }

    #[test]
    fn emptying_the_queue_clears_the_cursor() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_cursor(Some(1));
        queue.remove_range(1, 2).expect("valid");
        assert_eq!(queue.len(), 0);
        assert_eq!(queue.current(), None);
        assert_eq!(queue.position(), None);
    }

    #[test]
    fn display_marks_the_cursor_line() {
        let mut queue = queue_of(&["a", "b"]);
        queue.set_cursor(Some(1));
        let rendered = queue.display_string();
        assert!(rendered.contains("`2.`>"));
        assert!(rendered.contains("`1.` "));
    }
}
