use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};

use crate::{
    api::{
        Comment, CommentId, Data, Error, Event, EventId, FavoriteToggled, LikeToggled, NewContent,
        ReplyCreated, ReplyId, UserId,
    },
    Backend, TokenStore,
};

/// Talks to the REST backend at `host`
#[derive(Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    host: String,
    tokens: Arc<dyn TokenStore>,
}

impl HttpBackend {
    pub fn new(host: &str, tokens: Arc<dyn TokenStore>) -> HttpBackend {
        HttpBackend {
            client: reqwest::Client::new(),
            host: String::from(host.trim_end_matches('/')),
            tokens,
        }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/api/{}", self.host, path)
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let req = self.client.request(method, self.url(path));
        match self.tokens.token() {
            Some(tok) => req.bearer_auth(tok.0),
            None => req,
        }
    }

    async fn send<R>(&self, req: RequestBuilder) -> Result<R, Error>
    where
        R: for<'de> serde::Deserialize<'de>,
    {
        let resp = req
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            let body = resp.bytes().await.map(|b| b.to_vec()).unwrap_or_default();
            let err = Error::parse(status, &body);
            tracing::debug!(%status, %err, "backend returned an error");
            return Err(err);
        }
        resp.json()
            .await
            .map_err(|e| Error::Server(format!("failed to parse data from server: {e}")))
    }
}

#[async_trait]
impl Backend for HttpBackend {
    async fn whoami(&self) -> Result<UserId, Error> {
        self.send(self.request(Method::GET, "whoami")).await
    }

    async fn fetch_event(&self, id: EventId) -> Result<Event, Error> {
        let res: Data<Event> = self
            .send(self.request(Method::GET, &format!("events/{}", id.0)))
            .await?;
        Ok(res.data)
    }

    async fn fetch_comments(&self, event: EventId) -> Result<Vec<Comment>, Error> {
        let res: Data<Vec<Comment>> = self
            .send(self.request(Method::GET, &format!("events/{}/comments", event.0)))
            .await?;
        Ok(res.data)
    }

    async fn create_comment(&self, event: EventId, body: NewContent) -> Result<Comment, Error> {
        let req = self
            .request(Method::POST, &format!("events/{}/comments", event.0))
            .json(&body);
        let res: Data<Comment> = self.send(req).await?;
        Ok(res.data)
    }

    async fn create_reply(
        &self,
        comment: CommentId,
        body: NewContent,
    ) -> Result<ReplyCreated, Error> {
        let req = self
            .request(Method::POST, &format!("comments/{}/replies", comment.0))
            .json(&body);
        self.send(req).await
    }

    async fn toggle_comment_like(&self, comment: CommentId) -> Result<bool, Error> {
        let res: LikeToggled = self
            .send(self.request(Method::POST, &format!("comments/{}/like", comment.0)))
            .await?;
        Ok(res.liked)
    }

    async fn toggle_reply_like(&self, reply: ReplyId) -> Result<bool, Error> {
        let res: LikeToggled = self
            .send(self.request(Method::POST, &format!("replies/{}/like", reply.0)))
            .await?;
        Ok(res.liked)
    }

    async fn toggle_favorite(&self, event: EventId) -> Result<bool, Error> {
        let res: FavoriteToggled = self
            .send(self.request(Method::POST, &format!("events/{}/favorite", event.0)))
            .await?;
        Ok(res.favorited)
    }
}
