//! GoTrue-backed implementation of the `AuthProvider` port.

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;

use super::client::{Reply, SupabaseClient};
use super::dto::{CredentialsBody, PasswordBody, RecoverBody, SignUpReplyDto, TokenReplyDto};
use crate::domain::ports::{AuthProvider, AuthProviderError};
use crate::domain::{
    AccessToken, AuthSession, EmailAddress, LoginCredentials, NewPassword, UserId,
};

pub struct SupabaseAuthProvider {
    client: Arc<SupabaseClient>,
}

impl SupabaseAuthProvider {
    pub fn new(client: Arc<SupabaseClient>) -> Self {
        Self { client }
    }

    async fn call(
        &self,
        request: reqwest::RequestBuilder,
    ) -> Result<Reply, AuthProviderError> {
        let reply = self
            .client
            .send(request)
            .await
            .map_err(|err| AuthProviderError::connection(err.to_string()))?;
        if reply.status.is_success() {
            Ok(reply)
        } else {
            Err(map_status_error(&reply))
        }
    }
}

fn map_status_error(reply: &Reply) -> AuthProviderError {
    let message = reply.error_message();
    match reply.status {
        StatusCode::BAD_REQUEST
        | StatusCode::UNAUTHORIZED
        | StatusCode::FORBIDDEN
        | StatusCode::UNPROCESSABLE_ENTITY => AuthProviderError::rejected(message),
        _ => AuthProviderError::connection(message),
    }
}

fn decode<T: DeserializeOwned>(reply: &Reply) -> Result<T, AuthProviderError> {
    serde_json::from_slice(&reply.body)
        .map_err(|err| AuthProviderError::decode(format!("invalid auth payload: {err}")))
}

fn token(raw: String) -> Result<AccessToken, AuthProviderError> {
    AccessToken::new(raw).map_err(|err| AuthProviderError::decode(err.to_string()))
}

#[async_trait]
impl AuthProvider for SupabaseAuthProvider {
    async fn sign_up(
        &self,
        email: &EmailAddress,
        password: &NewPassword,
    ) -> Result<Option<UserId>, AuthProviderError> {
        let url = self.client.endpoint(&["auth", "v1", "signup"]);
        let request = self.client.request(Method::POST, url, None).json(&CredentialsBody {
            email: email.as_ref(),
            password: password.expose(),
        });
        let reply: SignUpReplyDto = decode(&self.call(request).await?)?;
        Ok(reply.user_id().map(UserId::from_uuid))
    }

    async fn sign_in(
        &self,
        credentials: &LoginCredentials,
    ) -> Result<AuthSession, AuthProviderError> {
        let mut url = self.client.endpoint(&["auth", "v1", "token"]);
        url.query_pairs_mut().append_pair("grant_type", "password");
        let request = self.client.request(Method::POST, url, None).json(&CredentialsBody {
            email: credentials.email().as_ref(),
            password: credentials.password(),
        });
        let reply: TokenReplyDto = decode(&self.call(request).await?)?;
        let user_id = reply
            .user
            .id
            .map(UserId::from_uuid)
            .ok_or_else(|| AuthProviderError::decode("token reply carried no user id"))?;
        Ok(AuthSession {
            user_id,
            access_token: token(reply.access_token)?,
            refresh_token: reply.refresh_token.map(token).transpose()?,
            expires_in: reply.expires_in,
        })
    }

    async fn send_password_reset(
        &self,
        email: &EmailAddress,
        redirect_to: Option<String>,
    ) -> Result<(), AuthProviderError> {
        let mut url = self.client.endpoint(&["auth", "v1", "recover"]);
        if let Some(redirect) = redirect_to.as_deref() {
            url.query_pairs_mut().append_pair("redirect_to", redirect);
        }
        let request = self
            .client
            .request(Method::POST, url, None)
            .json(&RecoverBody {
                email: email.as_ref(),
            });
        self.call(request).await.map(|_| ())
    }

    async fn update_password(
        &self,
        access_token: &AccessToken,
        password: &NewPassword,
    ) -> Result<(), AuthProviderError> {
        let url = self.client.endpoint(&["auth", "v1", "user"]);
        let request = self
            .client
            .request(Method::PUT, url, Some(access_token.expose()))
            .json(&PasswordBody {
                password: password.expose(),
            });
        self.call(request).await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use actix_web::{HttpRequest, HttpResponse, web};
    use reqwest::Url;
    use rstest::rstest;
    use serde_json::{Value, json};

    use super::*;
    use crate::outbound::http_support::stub;
    use crate::outbound::supabase::SupabaseConfig;

    const USER_ID: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    fn has_anon_key(req: &HttpRequest) -> bool {
        req.headers().get("apikey").and_then(|v| v.to_str().ok()) == Some("anon-key")
    }

    fn bearer(req: &HttpRequest) -> Option<&str> {
        req.headers()
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "))
    }

    async fn signup(req: HttpRequest, body: web::Json<Value>) -> HttpResponse {
        if !has_anon_key(&req) {
            return HttpResponse::Unauthorized().finish();
        }
        match body["email"].as_str() {
            Some("taken@example.org") => HttpResponse::UnprocessableEntity()
                .json(json!({ "code": 422, "msg": "User already registered" })),
            Some("pending@example.org") => HttpResponse::Ok().json(json!({ "id": USER_ID })),
            Some("ghost@example.org") => HttpResponse::Ok().json(json!({ "user": null })),
            _ => HttpResponse::Ok().json(json!({ "access_token": "t", "user": { "id": USER_ID } })),
        }
    }

    async fn token_grant(
        req: HttpRequest,
        query: web::Query<std::collections::HashMap<String, String>>,
        body: web::Json<Value>,
    ) -> HttpResponse {
        if query.get("grant_type").map(String::as_str) != Some("password") || !has_anon_key(&req) {
            return HttpResponse::BadRequest().finish();
        }
        if body["password"].as_str() != Some("Sp4rk!ng") {
            return HttpResponse::BadRequest().json(json!({
                "error": "invalid_grant",
                "error_description": "Invalid login credentials",
            }));
        }
        HttpResponse::Ok().json(json!({
            "access_token": "access-123",
            "refresh_token": "refresh-456",
            "expires_in": 3600,
            "token_type": "bearer",
            "user": { "id": USER_ID },
        }))
    }

    async fn recover(query: web::Query<std::collections::HashMap<String, String>>) -> HttpResponse {
        match query.get("redirect_to").map(String::as_str) {
            Some("spark://reset-password") => HttpResponse::Ok().json(json!({})),
            _ => HttpResponse::BadRequest().json(json!({ "msg": "missing redirect" })),
        }
    }

    async fn update_user(req: HttpRequest) -> HttpResponse {
        match bearer(&req) {
            Some("access-123") => HttpResponse::Ok().json(json!({ "id": USER_ID })),
            _ => HttpResponse::Unauthorized().json(json!({ "msg": "JWT expired" })),
        }
    }

    async fn unavailable() -> HttpResponse {
        HttpResponse::ServiceUnavailable().body("upstream connect error")
    }

    fn routes(cfg: &mut web::ServiceConfig) {
        cfg.route("/auth/v1/signup", web::post().to(signup))
            .route("/auth/v1/token", web::post().to(token_grant))
            .route("/auth/v1/recover", web::post().to(recover))
            .route("/auth/v1/user", web::put().to(update_user))
            .route("/down/auth/v1/signup", web::post().to(unavailable));
    }

    fn provider(base_url: &str) -> SupabaseAuthProvider {
        let client = SupabaseClient::new(SupabaseConfig {
            url: Url::parse(base_url).expect("url"),
            anon_key: "anon-key".to_owned(),
            timeout: Duration::from_secs(5),
        })
        .expect("client");
        SupabaseAuthProvider::new(Arc::new(client))
    }

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::parse(raw).expect("email")
    }

    fn password() -> NewPassword {
        NewPassword::parse("Sp4rk!ng", "Sp4rk!ng").expect("password")
    }

    #[rstest]
    #[case("maria@example.org", Some(USER_ID))]
    #[case("pending@example.org", Some(USER_ID))]
    #[case("ghost@example.org", None)]
    #[actix_web::test]
    async fn sign_up_reads_user_id_from_either_shape(
        #[case] address: &str,
        #[case] expected: Option<&str>,
    ) {
        let server = stub::spawn(routes);
        let result = provider(&server.base_url)
            .sign_up(&email(address), &password())
            .await
            .expect("sign up succeeds");
        server.stop().await;
        assert_eq!(result.map(|id| id.to_string()).as_deref(), expected);
    }

    #[actix_web::test]
    async fn sign_up_conflict_is_rejected_with_provider_message() {
        let server = stub::spawn(routes);
        let error = provider(&server.base_url)
            .sign_up(&email("taken@example.org"), &password())
            .await
            .expect_err("duplicate");
        server.stop().await;
        assert_eq!(error, AuthProviderError::rejected("User already registered"));
    }

    #[actix_web::test]
    async fn server_errors_are_connection_failures() {
        let server = stub::spawn(routes);
        let error = provider(&format!("{}/down", server.base_url))
            .sign_up(&email("maria@example.org"), &password())
            .await
            .expect_err("unavailable");
        server.stop().await;
        assert!(matches!(error, AuthProviderError::Connection { .. }));
    }

    #[actix_web::test]
    async fn sign_in_returns_session() {
        let server = stub::spawn(routes);
        let creds = LoginCredentials::try_from_parts("maria@example.org", "Sp4rk!ng")
            .expect("credentials");
        let session = provider(&server.base_url)
            .sign_in(&creds)
            .await
            .expect("sign in");
        server.stop().await;

        assert_eq!(session.user_id.to_string(), USER_ID);
        assert_eq!(session.access_token.expose(), "access-123");
        assert_eq!(
            session.refresh_token.as_ref().map(AccessToken::expose),
            Some("refresh-456")
        );
        assert_eq!(session.expires_in, Some(3600));
    }

    #[actix_web::test]
    async fn sign_in_with_wrong_password_is_rejected() {
        let server = stub::spawn(routes);
        let creds = LoginCredentials::try_from_parts("maria@example.org", "nope")
            .expect("credentials");
        let error = provider(&server.base_url)
            .sign_in(&creds)
            .await
            .expect_err("rejected");
        server.stop().await;
        assert_eq!(error, AuthProviderError::rejected("Invalid login credentials"));
    }

    #[actix_web::test]
    async fn password_reset_forwards_redirect() {
        let server = stub::spawn(routes);
        provider(&server.base_url)
            .send_password_reset(
                &email("maria@example.org"),
                Some("spark://reset-password".to_owned()),
            )
            .await
            .expect("reset requested");
        server.stop().await;
    }

    #[actix_web::test]
    async fn password_update_uses_user_token() {
        let server = stub::spawn(routes);
        let provider = provider(&server.base_url);
        let valid = AccessToken::new("access-123").expect("token");
        let expired = AccessToken::new("stale").expect("token");

        let ok = provider.update_password(&valid, &password()).await;
        let err = provider.update_password(&expired, &password()).await;
        server.stop().await;

        assert!(ok.is_ok());
        assert_eq!(err, Err(AuthProviderError::rejected("JWT expired")));
    }
}
