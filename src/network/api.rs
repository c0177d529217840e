use reqwest::{Client, StatusCode};
use url::Url;

use crate::common::Room;
use crate::common::types::{LoginRequest, RegisterRequest, RoomList, TokenResponse};
use crate::error::{ClientError, ClientResult};

/// REST side of the backend: auth and room directory.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
}

impl ApiClient {
    pub fn new(server_url: &str) -> ClientResult<Self> {
        let mut base = Url::parse(server_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            http: Client::new(),
            base,
        })
    }

    fn endpoint(&self, path: &str) -> ClientResult<Url> {
        Ok(self.base.join(path)?)
    }

    /// `POST /login`; returns the issued token.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let body = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        self.request_token("login", &body).await
    }

    /// `POST /register`; returns the issued token.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> ClientResult<String> {
        let body = RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        self.request_token("register", &body).await
    }

    async fn request_token<B: serde::Serialize>(&self, path: &str, body: &B) -> ClientResult<String> {
        let response = self
            .http
            .post(self.endpoint(path)?)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ClientError::AuthFailure {
                status: status.as_u16(),
            });
        }

        let token = response.json::<TokenResponse>().await?;
        Ok(token.token)
    }

    /// `GET /rooms`. Every failure mode collapses into `DirectoryFetch`.
    pub async fn fetch_rooms(&self) -> ClientResult<Vec<Room>> {
        let response = self
            .http
            .get(self.endpoint("rooms")?)
            .send()
            .await
            .map_err(|err| ClientError::DirectoryFetch(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ClientError::DirectoryFetch(describe_status(status, &text)));
        }

        let rooms = response
            .json::<RoomList>()
            .await
            .map_err(|err| ClientError::DirectoryFetch(err.to_string()))?;
        Ok(rooms.into_rooms())
    }
}

fn describe_status(status: StatusCode, body: &str) -> String {
    let body = body.trim();
    if body.is_empty() {
        status.to_string()
    } else {
        format!("{status}: {body}")
    }
}
