use std::{path::PathBuf, sync::Arc};

use anyhow::Context;
use evently_client::{
    api::{AuthToken, CommentId, EventId, ReplyId, UserId, Uuid},
    Backend, FileTokenStore, HttpBackend, MemoryTokenStore, Session, TokenStore,
};

#[derive(structopt::StructOpt)]
struct Opt {
    /// Base URL of the backend, without the `/api` suffix
    #[structopt(short, long, env = "EVENTLY_HOST")]
    host: String,

    /// File holding the bearer token, ignored if `EVENTLY_TOKEN` is set
    #[structopt(long, env = "EVENTLY_TOKEN_FILE", parse(from_os_str))]
    token_file: Option<PathBuf>,

    #[structopt(subcommand)]
    cmd: Command,
}

#[derive(structopt::StructOpt)]
enum Command {
    /// Store a token in the token file for later runs
    SaveToken { token: String },

    /// Forget the token stored in the token file
    Logout,

    /// Print the id of the logged-in user
    Whoami,

    /// Print an event along with its comments
    Event { id: Uuid },

    /// Print the comments of an event
    Comments { event: Uuid },

    /// Comment on an event
    Comment { event: Uuid, content: String },

    /// Reply to a comment
    Reply { comment: Uuid, content: String },

    /// Like or unlike a comment
    LikeComment { comment: Uuid },

    /// Like or unlike a reply
    LikeReply { reply: Uuid },

    /// Add or remove an event from favorites
    Favorite { event: Uuid },
}

fn token_store(opt: &Opt) -> anyhow::Result<Arc<dyn TokenStore>> {
    if let Ok(tok) = std::env::var("EVENTLY_TOKEN") {
        let tok = AuthToken::from_stored(&tok).context("EVENTLY_TOKEN is set but empty")?;
        return Ok(Arc::new(MemoryTokenStore::new(Some(tok))));
    }
    Ok(match &opt.token_file {
        Some(path) => Arc::new(FileTokenStore::new(path.clone())),
        None => Arc::new(MemoryTokenStore::default()),
    })
}

fn print_json(v: &impl serde::Serialize) -> anyhow::Result<()> {
    println!(
        "{}",
        serde_json::to_string_pretty(v).context("serializing response")?
    );
    Ok(())
}

async fn session(backend: HttpBackend, logged_in: bool) -> anyhow::Result<Session<HttpBackend>> {
    match logged_in {
        true => Session::connect(backend)
            .await
            .context("checking who the token belongs to"),
        // anonymous reads never look at the owner
        false => Ok(Session::new(backend, UserId::stub())),
    }
}

async fn run(opt: Opt) -> anyhow::Result<()> {
    let tokens = token_store(&opt)?;
    let logged_in = tokens.token().is_some();
    let backend = HttpBackend::new(&opt.host, tokens);

    match opt.cmd {
        Command::SaveToken { token } => {
            let path = opt
                .token_file
                .context("--token-file or EVENTLY_TOKEN_FILE is required to save a token")?;
            let token = AuthToken::from_stored(&token).context("refusing to save an empty token")?;
            FileTokenStore::new(path)
                .save(&token)
                .context("writing token file")?;
        }
        Command::Logout => {
            if let Some(path) = opt.token_file {
                FileTokenStore::new(path)
                    .clear()
                    .context("removing token file")?;
            }
        }
        Command::Whoami => {
            let user = backend.whoami().await.context("asking the backend who we are")?;
            println!("{}", user.0);
        }
        Command::Event { id } => {
            let session = session(backend, logged_in).await?;
            let event = session
                .fetch_event_detail(EventId(id))
                .await
                .context("fetching event")?;
            print_json(&event)?;
        }
        Command::Comments { event } => {
            let session = session(backend, logged_in).await?;
            let comments = session
                .fetch_comments_for_event(EventId(event))
                .await
                .context("fetching comments")?;
            print_json(&comments)?;
        }
        Command::Comment { event, content } => {
            let session = session(backend, logged_in).await?;
            let comment = session
                .submit_comment(EventId(event), &content)
                .await
                .context("submitting comment")?;
            print_json(&comment)?;
        }
        Command::Reply { comment, content } => {
            let session = session(backend, logged_in).await?;
            let reply = session
                .submit_reply(CommentId(comment), &content)
                .await
                .context("submitting reply")?;
            print_json(&reply)?;
        }
        Command::LikeComment { comment } => {
            let session = session(backend, logged_in).await?;
            let liked = session
                .toggle_comment_like(CommentId(comment))
                .await
                .context("toggling comment like")?;
            println!("{}", if liked { "liked" } else { "unliked" });
        }
        Command::LikeReply { reply } => {
            let session = session(backend, logged_in).await?;
            let liked = session
                .toggle_reply_like(ReplyId(reply))
                .await
                .context("toggling reply like")?;
            println!("{}", if liked { "liked" } else { "unliked" });
        }
        Command::Favorite { event } => {
            let session = session(backend, logged_in).await?;
            let favorited = session
                .toggle_event_favorite(EventId(event))
                .await
                .context("toggling favorite")?;
            println!("{}", if favorited { "favorited" } else { "unfavorited" });
        }
    }

    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let opt = <Opt as structopt::StructOpt>::from_args();
    let res = run(opt).await;
    if let Err(err) = &res {
        tracing::error!(?err, "command failed");
    }
    res
}
