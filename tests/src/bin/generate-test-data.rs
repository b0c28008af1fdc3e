use anyhow::Context;
use chrono::{Duration, Utc};
use evently_client::api::{
    AuthToken, Comment, CommentId, Decimal, Event, EventCount, EventId, Favorite, Like, LikeState,
    Reply, ReplyId, Time, UserId, UserSummary, Uuid,
};
use evently_mock_server::{Seed, SeedUser};
use rand::{seq::SliceRandom, Rng};

const NUM_USERS: usize = 5;

const NUM_EVENTS: usize = 10;
const EVENT_TITLE_WORDS: usize = 4;
const EVENT_DESCRIPTION_WORDS: usize = 60;

const MAX_COMMENTS_PER_EVENT: usize = 15;
const MAX_REPLIES_PER_COMMENT: usize = 4;
const MAX_CONTENT_WORDS: usize = 25;

fn gen_content(rng: &mut impl Rng) -> String {
    lipsum::lipsum_words(rng.gen_range(1..=MAX_CONTENT_WORDS))
}

fn gen_date(rng: &mut impl Rng) -> Time {
    Utc::now() - Duration::minutes(rng.gen_range(0..60 * 24 * 90))
}

/// Each user in `users` independently likes with probability 1/3
fn gen_likes(rng: &mut impl Rng, users: &[UserSummary], viewer: UserId) -> LikeState {
    let likes: Vec<Like> = users
        .iter()
        .filter(|_| rng.gen_ratio(1, 3))
        .map(|u| Like { user_id: u.id })
        .collect();
    LikeState {
        is_liked: likes.iter().any(|l| l.user_id == viewer),
        like_count: likes.len() as i64,
        likes,
    }
}

fn gen_reply(rng: &mut impl Rng, users: &[UserSummary], comment: &Comment) -> anyhow::Result<Reply> {
    let author = users.choose(rng).context("no users to author replies")?;
    let date = comment.created_at + Duration::minutes(rng.gen_range(1..600));
    Ok(Reply {
        id: ReplyId(Uuid::new_v4()),
        content: gen_content(rng),
        created_at: date,
        updated_at: date,
        author: author.clone(),
        comment_id: comment.id,
        like_state: gen_likes(rng, users, users[0].id),
    })
}

fn gen_comment(rng: &mut impl Rng, users: &[UserSummary], event: EventId) -> anyhow::Result<Comment> {
    let author = users.choose(rng).context("no users to author comments")?;
    let date = gen_date(rng);
    let mut comment = Comment {
        id: CommentId(Uuid::new_v4()),
        content: gen_content(rng),
        created_at: date,
        updated_at: date,
        author: author.clone(),
        event_id: event,
        like_state: gen_likes(rng, users, users[0].id),
        replies: Vec::new(),
    };
    for _ in 0..rng.gen_range(0..=MAX_REPLIES_PER_COMMENT) {
        let reply = gen_reply(rng, users, &comment)?;
        comment.replies.push(reply);
    }
    comment.replies.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    Ok(comment)
}

fn gen_event(rng: &mut impl Rng, users: &[UserSummary]) -> anyhow::Result<Event> {
    let id = EventId(Uuid::new_v4());
    let date = gen_date(rng) + Duration::days(120);
    let mut event = Event::new(id, lipsum::lipsum_words(EVENT_TITLE_WORDS), date);
    let capacity = rng.gen_range(10..5000);
    event.description = Some(lipsum::lipsum_words(EVENT_DESCRIPTION_WORDS));
    event.capacity = Some(capacity);
    event.location = Some(lipsum::lipsum_words(2));
    event.price = Some(Decimal::new(rng.gen_range(0..20_000), 2));
    event.organizer = users.choose(rng).cloned();
    event.is_approved = rng.gen_bool(0.8);
    event.favorites = users
        .iter()
        .filter(|_| rng.gen_bool(0.5))
        .map(|u| Favorite { user_id: u.id })
        .collect();
    for _ in 0..rng.gen_range(0..=MAX_COMMENTS_PER_EVENT) {
        let comment = gen_comment(rng, users, id)?;
        event.comments.push(comment);
    }
    event.comments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    event.count = Some(EventCount {
        comments: event.comments.len() as u32,
        favorites: event.favorites.len() as u32,
        ticket_payments: rng.gen_range(0..capacity),
    });
    Ok(event)
}

fn main() -> anyhow::Result<()> {
    let mut rng = rand::thread_rng();

    let users = (0..NUM_USERS)
        .map(|_| SeedUser {
            user: UserSummary {
                id: UserId(Uuid::new_v4()),
                name: lipsum::lipsum_words(2),
                profile_picture: None,
            },
            token: AuthToken(Uuid::new_v4().to_string()),
        })
        .collect::<Vec<_>>();
    let summaries = users.iter().map(|u| u.user.clone()).collect::<Vec<_>>();

    let events = (0..NUM_EVENTS)
        .map(|_| gen_event(&mut rng, &summaries))
        .collect::<anyhow::Result<Vec<_>>>()?;

    // the first user's token is the one to log in with
    let seed = Seed { users, events };
    println!(
        "{}",
        serde_json::to_string_pretty(&seed).context("serializing seed")?
    );
    Ok(())
}
