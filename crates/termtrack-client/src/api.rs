//! HTTP interface to the termtrack server
//!
//! Every call goes through a bounded retry loop: transport failures
//! are retried five times with a fixed five-second delay before the
//! call gives up as [`ClientError::Offline`]. HTTP-level rejections
//! are never retried; the server's `detail` string is carried in
//! [`ClientError::Api`] for the prompt loop to render.

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::thread;
use std::time::Duration;

use termtrack_core::models::project::Project;
use termtrack_core::models::task::Task;
use termtrack_core::models::user::User;

use crate::error::{ClientError, Result};
use crate::output;

/// Header carrying the session token.
pub const TOKEN_HEADER: &str = "token-uuid";

const CONNECT_ATTEMPTS: u32 = 5;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(5);

/// Fields of the `GET /` greeting.
#[derive(Debug, Deserialize)]
pub struct Hello {
    pub response: String,
    pub username: String,
    pub admin: bool,
}

#[derive(Deserialize)]
struct TokenResponse {
    token: String,
}

#[derive(Deserialize)]
struct DetailResponse {
    detail: String,
}

/// A handle to the server. Cheap to clone; the update poller runs on
/// its own copy.
#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    http: Client,
    attempts: u32,
}

impl ApiClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            base_url: format!("http://{host}:{port}"),
            http: Client::new(),
            attempts: CONNECT_ATTEMPTS,
        }
    }

    /// A copy that fails fast instead of retrying. The update poller
    /// uses this so a down server costs it one attempt per tick and no
    /// printed noise.
    pub fn without_retries(&self) -> Self {
        Self {
            attempts: 1,
            ..self.clone()
        }
    }

    // ----
    // Users
    // ----

    pub fn hello(&self, token: &str) -> Result<Hello> {
        let response =
            self.execute(|| self.http.get(self.url("/")).header(TOKEN_HEADER, token))?;
        Self::parse(response)
    }

    /// Whether a stored token still opens the door. Transport problems
    /// surface as errors; any HTTP rejection just means "no".
    pub fn check_token(&self, token: &str) -> Result<bool> {
        let response =
            self.execute(|| self.http.get(self.url("/")).header(TOKEN_HEADER, token))?;
        Ok(response.status().is_success())
    }

    pub fn register(&self, profile: &User, password: &str) -> Result<String> {
        let body = json!({ "user": profile, "password": digest(password) });
        let response = self.execute(|| self.http.post(self.url("/users/")).json(&body))?;
        Ok(Self::parse::<TokenResponse>(response)?.token)
    }

    pub fn login(&self, username: &str, password: &str) -> Result<String> {
        let body = json!({ "username": username, "password": digest(password) });
        let response = self.execute(|| self.http.post(self.url("/login/")).json(&body))?;
        Ok(Self::parse::<TokenResponse>(response)?.token)
    }

    pub fn get_user(&self, token: &str, username: &str) -> Result<User> {
        let response = self.execute(|| {
            self.http
                .get(self.url(&format!("/users/{username}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::parse(response)
    }

    pub fn search_users(&self, token: &str, fragment: &str) -> Result<Vec<String>> {
        let response = self.execute(|| {
            self.http
                .get(self.url("/users/"))
                .query(&[("search", fragment)])
                .header(TOKEN_HEADER, token)
        })?;
        Self::parse(response)
    }

    pub fn update_user(&self, token: &str, profile: &User) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .put(self.url(&format!("/users/{}", profile.username)))
                .header(TOKEN_HEADER, token)
                .json(profile)
        })?;
        Self::detail(response)
    }

    /// The password digest rides in the body as a bare JSON string, as
    /// a deletion confirmation.
    pub fn delete_user(&self, token: &str, username: &str, password: &str) -> Result<String> {
        let password = digest(password);
        let response = self.execute(|| {
            self.http
                .delete(self.url(&format!("/users/{username}")))
                .header(TOKEN_HEADER, token)
                .json(&password)
        })?;
        Self::detail(response)
    }

    pub fn promote(&self, token: &str, username: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .post(self.url(&format!("/admin/{username}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    // ----
    // Projects
    // ----

    pub fn create_project(
        &self,
        token: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<String> {
        let body = json!({ "name": name, "description": description });
        let response = self.execute(|| {
            self.http
                .post(self.url("/projects/"))
                .header(TOKEN_HEADER, token)
                .json(&body)
        })?;
        Self::detail(response)
    }

    pub fn get_project(&self, token: &str, name: &str) -> Result<Project> {
        let response = self.execute(|| {
            self.http
                .get(self.url(&format!("/projects/{name}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::parse(response)
    }

    /// Progress overview: project name to completion percentage.
    pub fn all_projects(&self, token: &str) -> Result<BTreeMap<String, u32>> {
        let response = self.execute(|| {
            self.http
                .get(self.url("/projects/all/"))
                .header(TOKEN_HEADER, token)
        })?;
        Self::parse(response)
    }

    pub fn update_project(
        &self,
        token: &str,
        name: &str,
        description: Option<&str>,
    ) -> Result<String> {
        let body = json!({ "name": name, "description": description });
        let response = self.execute(|| {
            self.http
                .put(self.url(&format!("/projects/{name}")))
                .header(TOKEN_HEADER, token)
                .json(&body)
        })?;
        Self::detail(response)
    }

    pub fn delete_project(&self, token: &str, name: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .delete(self.url(&format!("/projects/{name}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    pub fn add_member(&self, token: &str, project: &str, username: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .post(self.url(&format!("/projects/{project}/members/{username}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    pub fn remove_member(&self, token: &str, project: &str, username: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .delete(self.url(&format!("/projects/{project}/members/{username}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    pub fn add_moderator(&self, token: &str, project: &str, username: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .post(self.url(&format!("/projects/{project}/moderators/{username}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    pub fn remove_moderator(&self, token: &str, project: &str, username: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .delete(self.url(&format!("/projects/{project}/moderators/{username}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    // ----
    // Tasks
    // ----

    pub fn add_task(&self, token: &str, project: &str, task: &Task) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .post(self.url(&format!("/projects/{project}/tasks/")))
                .header(TOKEN_HEADER, token)
                .json(task)
        })?;
        Self::detail(response)
    }

    pub fn update_task(
        &self,
        token: &str,
        project: &str,
        task_name: &str,
        task: &Task,
    ) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .put(self.url(&format!("/projects/{project}/tasks/{task_name}")))
                .header(TOKEN_HEADER, token)
                .json(task)
        })?;
        Self::detail(response)
    }

    pub fn delete_task(&self, token: &str, project: &str, task_name: &str) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .delete(self.url(&format!("/projects/{project}/tasks/{task_name}")))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    pub fn assign_task_member(
        &self,
        token: &str,
        project: &str,
        task_name: &str,
        username: &str,
    ) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .post(self.url(&format!(
                    "/projects/{project}/tasks/{task_name}/members/{username}"
                )))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    pub fn unassign_task_member(
        &self,
        token: &str,
        project: &str,
        task_name: &str,
        username: &str,
    ) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .delete(self.url(&format!(
                    "/projects/{project}/tasks/{task_name}/members/{username}"
                )))
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    /// `completion` is sent verbatim as a query value; the server
    /// decides whether it fits the task's kind.
    pub fn set_completion(
        &self,
        token: &str,
        project: &str,
        task_name: &str,
        completion: &str,
    ) -> Result<String> {
        let response = self.execute(|| {
            self.http
                .put(self.url(&format!(
                    "/projects/{project}/tasks/{task_name}/completion"
                )))
                .query(&[("completion", completion)])
                .header(TOKEN_HEADER, token)
        })?;
        Self::detail(response)
    }

    /// Names of projects that changed since the last poll. Reading
    /// clears the pending set on the server.
    pub fn project_updates(&self, token: &str) -> Result<Vec<String>> {
        let response = self.execute(|| {
            self.http
                .get(self.url("/update/projects"))
                .header(TOKEN_HEADER, token)
        })?;
        Self::parse(response)
    }

    // ----
    // Plumbing
    // ----

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn execute(&self, build: impl Fn() -> RequestBuilder) -> Result<Response> {
        let mut attempt = 1;
        loop {
            match build().send() {
                Ok(response) => return Ok(response),
                Err(err) => {
                    tracing::debug!(error = %err, attempt, "could not reach the server");
                    if attempt >= self.attempts {
                        return Err(ClientError::Offline);
                    }
                    output::error("Could not connect to server");
                    println!("Retrying...");
                    thread::sleep(CONNECT_RETRY_DELAY);
                    attempt += 1;
                }
            }
        }
    }

    fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            Ok(response.json()?)
        } else {
            Err(Self::api_error(status, response))
        }
    }

    fn detail(response: Response) -> Result<String> {
        Ok(Self::parse::<DetailResponse>(response)?.detail)
    }

    fn api_error(status: StatusCode, response: Response) -> ClientError {
        let detail = response
            .json::<Value>()
            .ok()
            .and_then(|body| body.get("detail").and_then(Value::as_str).map(str::to_string))
            .unwrap_or_else(|| format!("Request failed with status {status}"));
        ClientError::Api { status, detail }
    }
}

/// Passwords never travel in the clear: the client sends the SHA-256
/// hex digest and the server treats that as the password material.
pub fn digest(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn password_digest_is_sha256_hex() {
        assert_eq!(
            digest("password"),
            "5e884898da28047151d0e56f8dc6292773603d0d6aabbdd62a11ef721d1542d8"
        );
        assert_eq!(
            digest(""),
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn urls_join_base_and_path() {
        let api = ApiClient::new("tracker.local", 8080);
        assert_eq!(api.url("/projects/all/"), "http://tracker.local:8080/projects/all/");
    }
}
