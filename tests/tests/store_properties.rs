use std::{panic::AssertUnwindSafe, sync::Arc};

use chrono::Utc;
use evently_client::{
    api::{AuthToken, Comment, Event, EventId, Uuid},
    Session, Store,
};
use evently_mock_server::{MockBackend, MockServer};
use tokio::sync::Mutex;

macro_rules! do_tokio_test {
    ( $name:ident, $gen:expr, $fn:expr ) => {
        #[test]
        fn $name() {
            let runtime = AssertUnwindSafe(
                tokio::runtime::Builder::new_current_thread()
                    .enable_all()
                    .build()
                    .expect("failed initializing tokio runtime"),
            );
            bolero::check!()
                .with_generator($gen)
                .cloned()
                .for_each(move |v| {
                    let () = runtime.block_on($fn(v));
                })
        }
    };
}

#[derive(Clone, Debug, bolero::generator::TypeGenerator)]
enum Op {
    SubmitComment {
        #[generator(bolero::generator::gen_with::<String>().len(0..20usize))]
        content: String,
    },
    SubmitReply {
        comment: usize,
        #[generator(bolero::generator::gen_with::<String>().len(0..20usize))]
        content: String,
    },
    ToggleCommentLike {
        comment: usize,
    },
    ToggleReplyLike {
        comment: usize,
        reply: usize,
    },
    ToggleFavorite,
    FetchEvent,
    FetchComments,
}

/// Orders like and favorite records, which carry no meaningful order
fn normalized(mut event: Event) -> Event {
    fn sort_comment(c: &mut Comment) {
        c.like_state.likes.sort_by_key(|l| l.user_id);
        for r in &mut c.replies {
            r.like_state.likes.sort_by_key(|l| l.user_id);
        }
    }
    event.favorites.sort_by_key(|f| f.user_id);
    event.comments.iter_mut().for_each(sort_comment);
    event
}

fn assert_views_agree(store: &Store) {
    let (Some(event), Some((listed_for, listed))) = (store.selected_event(), store.event_comments())
    else {
        return;
    };
    if listed_for != event.id {
        return;
    }
    for c in listed {
        let twin = event.comments.iter().find(|e| e.id == c.id);
        assert_eq!(twin, Some(&c), "comment {:?} differs between views", c.id);
    }
}

struct Fuzzer {
    session: Session<MockBackend>,
    server: Arc<Mutex<MockServer>>,
    token: AuthToken,
    event: EventId,
}

impl Fuzzer {
    async fn new() -> Fuzzer {
        let mut server = MockServer::new();
        let (_, token) = server.create_user("fuzzer");
        let event = EventId(Uuid::new_v4());
        server.add_event(Event::new(event, String::from("Fuzz fest"), Utc::now()));
        let server = Arc::new(Mutex::new(server));
        let session = Session::connect(MockBackend::new(server.clone(), Some(token.clone())))
            .await
            .expect("connecting to mock server");
        session
            .fetch_event_detail(event)
            .await
            .expect("fetching fuzzed event");
        session
            .fetch_comments_for_event(event)
            .await
            .expect("fetching fuzzed comments");
        Fuzzer {
            session,
            server,
            token,
            event,
        }
    }

    fn comment_ids(&self) -> Vec<evently_client::api::CommentId> {
        self.session.read(|s| {
            s.selected_event()
                .map(|e| e.comments.iter().map(|c| c.id).collect())
                .unwrap_or_default()
        })
    }

    async fn execute(&self, op: Op) {
        let ids = self.comment_ids();
        let pick = |i: usize| (!ids.is_empty()).then(|| ids[i % ids.len()]);
        // failures are part of the game, their effect is checked below
        match op {
            Op::SubmitComment { content } => {
                let _ = self.session.submit_comment(self.event, &content).await;
            }
            Op::SubmitReply { comment, content } => {
                if let Some(c) = pick(comment) {
                    let _ = self.session.submit_reply(c, &content).await;
                }
            }
            Op::ToggleCommentLike { comment } => {
                if let Some(c) = pick(comment) {
                    let _ = self.session.toggle_comment_like(c).await;
                }
            }
            Op::ToggleReplyLike { comment, reply } => {
                let replies = pick(comment)
                    .and_then(|c| self.session.read(|s| s.comment(&c)))
                    .map(|c| c.replies)
                    .unwrap_or_default();
                if !replies.is_empty() {
                    let r = replies[reply % replies.len()].id;
                    let _ = self.session.toggle_reply_like(r).await;
                }
            }
            Op::ToggleFavorite => {
                let _ = self.session.toggle_event_favorite(self.event).await;
            }
            Op::FetchEvent => {
                let _ = self.session.fetch_event_detail(self.event).await;
            }
            Op::FetchComments => {
                let _ = self.session.fetch_comments_for_event(self.event).await;
            }
        }
    }

    async fn check(&self) {
        let store = self.session.snapshot();
        assert_views_agree(&store);

        let local = store.selected_event().map(normalized);
        let remote = self
            .server
            .lock()
            .await
            .event(Some(&self.token), self.event)
            .map(normalized)
            .ok();
        assert_eq!(local, remote, "client state drifted from the server");
    }
}

do_tokio_test!(
    client_tracks_server,
    bolero::generator::gen_with::<Vec<Op>>().len(1..50usize),
    |ops: Vec<Op>| async move {
        let fuzzer = Fuzzer::new().await;
        for op in ops {
            fuzzer.execute(op).await;
            fuzzer.check().await;
        }
    }
);
