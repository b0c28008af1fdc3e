//! Pure updates applying a toggle answer to denormalized like/favorite state.
//!
//! The count only moves when the flag actually flips, so it stays in lockstep
//! with the user's record and applying the same answer twice changes nothing.

use crate::api::{Event, EventCount, Favorite, Like, LikeState, UserId};

pub fn apply_like_toggle(state: &mut LikeState, user: UserId, liked: bool) {
    let was_liked = state.is_liked;
    state.is_liked = liked;
    if liked {
        if !was_liked {
            state.like_count += 1;
        }
        if !state.liked_by(&user) {
            state.likes.push(Like { user_id: user });
        }
    } else {
        if was_liked {
            if state.like_count <= 0 {
                tracing::warn!(
                    like_count = state.like_count,
                    "unlike on a non-positive like count, clamping to zero"
                );
                state.like_count = 0;
            } else {
                state.like_count -= 1;
            }
        }
        state.likes.retain(|l| l.user_id != user);
    }
}

pub fn apply_favorite_toggle(event: &mut Event, user: UserId, favorited: bool) {
    let was_favorited = event.is_favorited_by(&user);
    let count = event.count.get_or_insert_with(EventCount::default);
    if favorited && !was_favorited {
        event.favorites.push(Favorite { user_id: user });
        count.favorites += 1;
    } else if !favorited && was_favorited {
        event.favorites.retain(|f| f.user_id != user);
        count.favorites = count.favorites.checked_sub(1).unwrap_or_else(|| {
            tracing::warn!("unfavorite on a zero favorite count, clamping to zero");
            0
        });
    }
}
