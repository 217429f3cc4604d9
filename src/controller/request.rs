//! Request parameter access for controllers

use crate::error::{Error, Result};
use async_trait::async_trait;
use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
    http::header,
};
use std::collections::HashMap;

/// Query string and form fields of one request
///
/// When a name is repeated, the last occurrence wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestParams {
    query: HashMap<String, String>,
    body: HashMap<String, String>,
}

impl RequestParams {
    /// Build from a raw query string and a urlencoded form body
    pub fn new(query: Option<&str>, form: Option<&[u8]>) -> Self {
        Self {
            query: query.map(|q| parse_pairs(q.as_bytes())).unwrap_or_default(),
            body: form.map(parse_pairs).unwrap_or_default(),
        }
    }

    /// Build from already decoded pairs
    pub fn from_pairs<K, V>(
        query: impl IntoIterator<Item = (K, V)>,
        body: impl IntoIterator<Item = (K, V)>,
    ) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            query: query.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
            body: body.into_iter().map(|(k, v)| (k.into(), v.into())).collect(),
        }
    }

    /// Query string parameter; `Some("")` for `?name=` and `?name`
    pub fn query(&self, name: &str) -> Option<&str> {
        self.query.get(name).map(String::as_str)
    }

    /// Form body field
    pub fn body(&self, name: &str) -> Option<&str> {
        self.body.get(name).map(String::as_str)
    }
}

fn parse_pairs(input: &[u8]) -> HashMap<String, String> {
    url::form_urlencoded::parse(input).into_owned().collect()
}

fn is_form(request: &Request) -> bool {
    request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| ct.split(';').next())
        .is_some_and(|mime| {
            mime.trim()
                .eq_ignore_ascii_case("application/x-www-form-urlencoded")
        })
}

#[async_trait]
impl<S> FromRequest<S> for RequestParams
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request(request: Request, state: &S) -> Result<Self> {
        let query = request.uri().query().map(str::to_owned);

        if !is_form(&request) {
            return Ok(Self::new(query.as_deref(), None));
        }

        let body = Bytes::from_request(request, state)
            .await
            .map_err(|e| Error::InvalidRequest(e.body_text()))?;

        Ok(Self::new(query.as_deref(), Some(&body)))
    }
}
