use crate::{
    error::{Error, Result},
    Backend, Question, QuestionAction, Quiz, QuizQuery, SectionAction,
};
use http_body_util::{BodyExt, Full};
use hyper::{
    body::Bytes,
    header::{HeaderValue, ACCEPT, CONTENT_TYPE, COOKIE},
    Method, Request, Uri,
};
use hyper_util::{
    client::legacy::{connect::HttpConnector, Client as Pool},
    rt::TokioExecutor,
};
use serde::de::{DeserializeOwned, IgnoredAny};

pub const APPLICATION_JSON: &str = "application/json";

/// Name of the cookie carrying the server-side session.
const SESSION_COOKIE: &str = "session";

/// HTTP client for the quiz server's JSON API.
#[derive(Clone)]
pub struct Client {
    http: Pool<HttpConnector, Full<Bytes>>,
    /// Scheme and authority prepended to every endpoint path.
    base: Box<str>,
    cookie: Option<HeaderValue>,
}

impl Client {
    /// Connects to `authority` (e.g. `127.0.0.1:5000`) over plain HTTP.
    pub fn new(authority: &str, session: Option<&str>) -> Result<Self> {
        let base = format!("http://{authority}").into_boxed_str();
        base.parse::<Uri>()?;

        let cookie = match session {
            Some(session) => Some(HeaderValue::try_from(format!("{SESSION_COOKIE}={session}"))?),
            None => None,
        };

        let http = Pool::builder(TokioExecutor::new()).build_http();
        Ok(Self { http, base, cookie })
    }

    async fn send<T>(&self, method: Method, path: &str, body: Option<Vec<u8>>) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        log::debug!("{method} {path}");
        let uri: Uri = [self.base.as_ref(), path].concat().parse()?;
        let mut builder =
            Request::builder().method(method).uri(uri).header(ACCEPT, HeaderValue::from_static(APPLICATION_JSON));
        if let Some(cookie) = &self.cookie {
            builder = builder.header(COOKIE, cookie.clone());
        }

        let body = match body {
            Some(bytes) => {
                builder = builder.header(CONTENT_TYPE, HeaderValue::from_static(APPLICATION_JSON));
                Full::new(Bytes::from(bytes))
            }
            None => Full::new(Bytes::new()),
        };
        let request = builder.body(body)?;

        let response = self.http.request(request).await?;
        let status = response.status();
        if !status.is_success() {
            return Err(Error::Status(status.as_u16()));
        }

        let bytes = response.into_body().collect().await?.to_bytes();
        decode(&bytes)
    }
}

/// Decodes a JSON payload where both an empty body and `null` mean "nothing".
pub fn decode<T>(bytes: &[u8]) -> Result<Option<T>>
where
    T: DeserializeOwned,
{
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(None);
    }
    Ok(serde_json::from_slice(bytes)?)
}

impl Backend for Client {
    async fn quiz(&self, quiz: u64, query: &QuizQuery) -> Result<Option<Quiz>> {
        let path = format!("/api/quiz/{quiz}/?{}", query.to_query());
        self.send(Method::GET, &path, None).await
    }

    async fn question(&self, question: u64) -> Result<Option<Question>> {
        self.send(Method::GET, &format!("/api/questions/{question}"), None).await
    }

    async fn question_action(&self, question: u64, action: QuestionAction) -> Result<Option<Question>> {
        let path = format!("/api/questions/{question}/{}", action.path());
        self.send(Method::POST, &path, None).await
    }

    async fn answer(&self, question: u64, value: &str) -> Result<Option<Question>> {
        let body = serde_json::to_vec(&serde_json::json!({ "value": value }))?;
        self.send(Method::POST, &format!("/api/questions/{question}/answer"), Some(body)).await
    }

    async fn section_action(&self, section: u64, action: SectionAction) -> Result<()> {
        let path = format!("/api/sections/{section}/{}", action.path());
        self.send::<IgnoredAny>(Method::POST, &path, None).await?;
        Ok(())
    }
}
