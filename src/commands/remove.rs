//! Implements the `/remove` command.
//!
//! Accepts a single 1-based position (`2`) or an inclusive range (`5-7`).
//! The player re-validates against the live queue size under its own lock,
//! so a rejected removal never changes the queue.

use tracing::instrument;

use crate::data::GetData;
use crate::error::UserError;
use crate::Context;
use crate::MynahError;

/// Remove a track or range of tracks from the queue.
#[instrument(skip(ctx))]
#[poise::command(slash_command, guild_only)]
pub async fn remove(
    ctx: Context<'_>,
    #[description = "A position like `2`, or an inclusive range like `5-7`."] target: String,
) -> Result<(), MynahError> {
    let (start, count) = parse_target(&target)?;

    let player = ctx.player().await?;
    player.lock().await.remove_range(start, count)?;

    let noun = if count == 1 { "track" } else { "tracks" };
    ctx.reply(format!(":wastebasket: Removed {count} {noun}."))
        .await?;
    Ok(())
}

/// Parse `2` or `5-7` into a 1-based start and a count.
fn parse_target(target: &str) -> Result<(usize, usize), UserError> {
    let bad_position = || UserError::BadPosition {
        input: target.to_string(),
    };

    match target.split_once('-') {
        Some((start, end)) => {
            let start: usize = start.trim().parse().map_err(|_| bad_position())?;
            let end: usize = end.trim().parse().map_err(|_| bad_position())?;

            if start == 0 {
                return Err(bad_position());
            }
            if end < start {
                return Err(UserError::BackwardsRange { start, end });
            }

            Ok((start, end - start + 1))
        }
        None => {
            let position: usize = target.trim().parse().map_err(|_| bad_position())?;
            if position == 0 {
                return Err(bad_position());
            }
            Ok((position, 1))
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn single_positions_remove_one_track() {
        assert_eq!(parse_target("2").unwrap(), (2, 1));
        assert_eq!(parse_target(" 7 ").unwrap(), (7, 1));
    }

    #[test]
    fn ranges_are_inclusive() {
        assert_eq!(parse_target("5-7").unwrap(), (5, 3));
        assert_eq!(parse_target("3-3").unwrap(), (3, 1));
    }

    #[test]
    fn backwards_ranges_are_rejected() {
        assert!(matches!(
            parse_target("7-5"),
            Err(UserError::BackwardsRange { start: 7, end: 5 })
        ));
    }

    #[test]
    fn garbage_and_zero_positions_are_rejected() {
        for input in ["abc", "", "0", "1-x", "0-3", "-2"] {
            assert!(
                matches!(parse_target(input), Err(UserError::BadPosition { .. })),
                "expected {input:?} to be rejected"
            );
        }
    }
}
