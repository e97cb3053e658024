//! 认证服务：登录、注册、登出、令牌刷新

use tracing::info;

use crate::{
    client::MuseumClient,
    error::{ApiError, Result},
    models::{Registration, TokenPair},
    session::{Session, TokenStore},
};

/// 注册结果
#[derive(Debug)]
pub enum SignUp {
    /// 后端直接返回了令牌，已自动登录
    SignedIn(Session),
    /// 注册成功，需要再登录
    LoginRequired,
}

pub struct AuthService {
    client: MuseumClient,
}

impl AuthService {
    pub fn new(client: MuseumClient) -> Self {
        Self { client }
    }

    /// 用户登录，通过令牌接口换取令牌对
    pub async fn sign_in(&self, username: &str, password: &str) -> Result<Session> {
        let tokens = self.client.obtain_token(username, password).await?;

        info!(username = %username, "User signed in");
        Ok(Session::from_tokens(username, tokens))
    }

    /// 用户注册
    pub async fn sign_up(&self, registration: &Registration) -> Result<SignUp> {
        let payload = self.client.register(registration).await?;

        match TokenPair::from_payload(&payload) {
            Some(tokens) => {
                info!(username = %registration.username, "User registered and signed in");
                Ok(SignUp::SignedIn(Session::from_tokens(
                    registration.username.as_str(),
                    tokens,
                )))
            }
            None => {
                info!(username = %registration.username, "User registered");
                Ok(SignUp::LoginRequired)
            }
        }
    }

    /// 用刷新令牌换取新的令牌对
    pub async fn renew(&self, session: &Session) -> Result<Session> {
        let refresh = session
            .refresh_token()
            .ok_or_else(|| ApiError::validation("Not logged in"))?;

        let tokens = self.client.refresh_token(refresh).await?;

        let mut renewed = session.clone();
        renewed.replace_tokens(tokens);
        Ok(renewed)
    }

    /// 用户登出
    pub fn sign_out(&self, session: &mut Session, store: &dyn TokenStore) {
        if let Some(username) = session.username() {
            info!(username = %username, "User signed out");
        } else {
            info!("User signed out");
        }
        session.clear(store);
    }
}
