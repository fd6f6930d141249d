use reqwest::{Client, RequestBuilder};

use super::error::AdminError;
use super::types::{AdminUser, UserFilter};

/// Client for the site's admin user-management endpoints.
///
/// Every mutating call is a form-encoded POST whose plain-text response
/// body is the message to show the operator.
pub struct AdminClient {
    base_url: String,
    session_cookie: Option<String>,
    http: Client,
}

impl AdminClient {
    pub fn new(base_url: impl Into<String>, session_cookie: Option<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session_cookie,
            http: Client::new(),
        }
    }

    fn with_cookie(&self, req: RequestBuilder) -> RequestBuilder {
        match &self.session_cookie {
            Some(cookie) => req.header(reqwest::header::COOKIE, cookie),
            None => req,
        }
    }

    /// Return the body text on success, or reject with it.
    async fn into_message(resp: reqwest::Response) -> Result<String, AdminError> {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        if status.is_success() {
            Ok(body)
        } else {
            tracing::warn!(status = status.as_u16(), "admin request rejected");
            Err(AdminError::Rejected {
                status: status.as_u16(),
                message: body,
            })
        }
    }

    async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> Result<String, AdminError> {
        tracing::debug!(path, "admin request");
        let req = self.http.post(format!("{}{path}", self.base_url)).form(form);
        let resp = self.with_cookie(req).send().await?;
        Self::into_message(resp).await
    }

    pub async fn list_users(&self, filter: &UserFilter) -> Result<Vec<AdminUser>, AdminError> {
        let req = self
            .http
            .get(format!("{}/admin/users", self.base_url))
            .query(&filter.query());
        let resp = self.with_cookie(req).send().await?;
        if !resp.status().is_success() {
            let status = resp.status().as_u16();
            let message = resp.text().await.unwrap_or_default();
            tracing::warn!(status, "admin user listing rejected");
            return Err(AdminError::Rejected { status, message });
        }
        resp.json()
            .await
            .map_err(|e| AdminError::Parse(e.to_string()))
    }

    pub async fn toggle_suspension(&self, username: &str) -> Result<String, AdminError> {
        self.post_form("/admin/users/toggle_suspension", &[("username", username)])
            .await
    }

    pub async fn delete_user(&self, username: &str) -> Result<String, AdminError> {
        self.post_form("/admin/users/delete", &[("username", username)])
            .await
    }

    /// Empty passwords never reach the backend.
    pub async fn reset_password(
        &self,
        username: &str,
        new_password: &str,
    ) -> Result<String, AdminError> {
        if new_password.is_empty() {
            return Err(AdminError::InvalidInput(
                "Password reset cancelled or new password was empty.".into(),
            ));
        }
        self.post_form(
            "/admin/users/reset_password",
            &[("username", username), ("new_password", new_password)],
        )
        .await
    }

    pub async fn toggle_admin(&self, username: &str, make_admin: bool) -> Result<String, AdminError> {
        let flag = if make_admin { "true" } else { "false" };
        self.post_form(
            "/admin/users/toggle_admin",
            &[("username", username), ("make_admin", flag)],
        )
        .await
    }
}
