use crate::error::Result;
use crate::models::Hotel;
use async_trait::async_trait;
use time::Date;

/// Best-effort hotel lookup. Implementations may return an empty list and
/// callers must treat failures as "no candidates", never as a hard error.
#[async_trait]
pub trait HotelSource: Send + Sync {
    async fn search(
        &self,
        city: &str,
        check_in: Date,
        check_out: Date,
        adults: u32,
        rooms: u32,
    ) -> Result<Vec<Hotel>>;
}

/// Hotel source for deployments without a booking API configured.
pub struct NoHotelSource;

#[async_trait]
impl HotelSource for NoHotelSource {
    async fn search(
        &self,
        _city: &str,
        _check_in: Date,
        _check_out: Date,
        _adults: u32,
        _rooms: u32,
    ) -> Result<Vec<Hotel>> {
        Ok(Vec::new())
    }
}
