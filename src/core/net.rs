// src/core/net.rs
//
// Blocking HTTP helpers around a shared reqwest client.
// One request per tick, so there is no need for an async runtime.

use std::error::Error;
use std::time::Duration;

use reqwest::blocking::{Client, Response};
use serde::{de::DeserializeOwned, Serialize};

use crate::config::consts::{HTTP_TIMEOUT_SECS, USER_AGENT};

pub type NetResult<T> = Result<T, Box<dyn Error + Send + Sync>>;

/// Credentials attached to a request.
#[derive(Clone, Copy, Debug)]
pub enum Auth<'a> {
    Basic { user: &'a str, password: &'a str },
    Bearer(&'a str),
}

pub fn client() -> NetResult<Client> {
    let c = Client::builder()
        .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
        .user_agent(USER_AGENT)
        .build()?;
    Ok(c)
}

/// GET `url` and decode the JSON body.
pub fn get_json<T: DeserializeOwned>(client: &Client, url: &str, auth: Auth<'_>) -> NetResult<T> {
    let req = with_auth(client.get(url), auth).header("Accept", "application/json");
    let resp = check_status(req.send()?, url)?;
    Ok(resp.json::<T>()?)
}

/// POST `body` as JSON to `url` and decode the JSON reply.
pub fn post_json<B: Serialize, T: DeserializeOwned>(
    client: &Client,
    url: &str,
    auth: Auth<'_>,
    body: &B,
) -> NetResult<T> {
    let req = with_auth(client.post(url), auth).json(body);
    let resp = check_status(req.send()?, url)?;
    Ok(resp.json::<T>()?)
}

fn with_auth(
    req: reqwest::blocking::RequestBuilder,
    auth: Auth<'_>,
) -> reqwest::blocking::RequestBuilder {
    match auth {
        Auth::Basic { user, password } => req.basic_auth(user, Some(password)),
        Auth::Bearer(token) => req.bearer_auth(token),
    }
}

fn check_status(resp: Response, url: &str) -> NetResult<Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    // query string left out of the message
    let shown = url.split('?').next().unwrap_or(url);
    Err(format!("HTTP error: {status} {shown}").into())
}
