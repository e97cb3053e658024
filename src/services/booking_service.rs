//! 预约服务：预约或取消后重新拉取完整的预约列表

use std::fmt::Display;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::{
    client::MuseumClient,
    error::{ApiError, Result},
    models::Booking,
    session::Session,
};

/// 预约变更结果
#[derive(Debug)]
pub struct BookingUpdate {
    /// 后端返回的原始响应
    pub receipt: Value,
    /// 变更后重新拉取的预约列表；拉取失败不影响已提交的变更
    pub bookings: Result<Vec<Booking>>,
}

pub struct BookingService {
    client: MuseumClient,
}

impl BookingService {
    pub fn new(client: MuseumClient) -> Self {
        Self { client }
    }

    /// 当前用户的预约；未登录时直接返回空列表
    pub async fn bookings(&self, session: &Session) -> Result<Vec<Booking>> {
        match session.access_token() {
            Some(token) if !token.is_empty() => self.client.my_bookings(token).await,
            _ => {
                debug!("No access token, skipping bookings request");
                Ok(Vec::new())
            }
        }
    }

    /// 预约博物馆
    pub async fn book(&self, museum_id: impl Display, session: &Session) -> Result<BookingUpdate> {
        let token = require_token(session)?;
        let museum_id = museum_id.to_string();

        let receipt = self.client.book_museum(&museum_id, token).await?;
        info!(museum_id = %museum_id, "Museum booked");

        let bookings = self.reload(token).await;
        Ok(BookingUpdate { receipt, bookings })
    }

    /// 取消预约
    pub async fn cancel(
        &self,
        booking_id: impl Display,
        session: &Session,
    ) -> Result<BookingUpdate> {
        let token = require_token(session)?;
        let booking_id = booking_id.to_string();

        let receipt = self.client.cancel_booking(&booking_id, token).await?;
        info!(booking_id = %booking_id, "Booking cancelled");

        let bookings = self.reload(token).await;
        Ok(BookingUpdate { receipt, bookings })
    }

    async fn reload(&self, token: &str) -> Result<Vec<Booking>> {
        let result = self.client.my_bookings(token).await;
        if let Err(ref err) = result {
            warn!(error = %err, "Booking listing is stale after update");
        }
        result
    }
}

fn require_token(session: &Session) -> Result<&str> {
    session
        .access_token()
        .filter(|token| !token.is_empty())
        .ok_or_else(|| ApiError::validation("Not logged in"))
}
