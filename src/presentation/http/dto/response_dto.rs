use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub struct HealthResponseDto {
    pub status: String,
    pub version: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct LimitQueryDto {
    pub limit: Option<i64>,
}
