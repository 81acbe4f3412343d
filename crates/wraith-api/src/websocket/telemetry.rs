//! 텔레메트리 프레임.
//!
//! ```json
//! {"cpu": [{"time": "14:05", "usage": 42}, ...], "memory": [{"time": "14:05", "usage": 71}, ...]}
//! ```

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// CPU 사용률 범위 (%)
pub const CPU_USAGE_RANGE: RangeInclusive<u8> = 10..=90;

/// 메모리 사용률 범위 (%)
pub const MEMORY_USAGE_RANGE: RangeInclusive<u8> = 30..=95;

/// 시계열 한 점.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsagePoint {
    /// "HH:MM" 라벨
    pub time: String,
    /// 사용률 (%)
    pub usage: u8,
}

/// 한 번에 전송되는 텔레메트리 프레임.
///
/// i번째 점의 시각은 `now - i분`입니다.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub cpu: Vec<UsagePoint>,
    pub memory: Vec<UsagePoint>,
}

impl TelemetryFrame {
    /// 주어진 난수 생성기로 프레임 생성.
    pub fn sample<R: Rng>(now: DateTime<Utc>, points: usize, rng: &mut R) -> Self {
        let mut series = |range: &RangeInclusive<u8>| -> Vec<UsagePoint> {
            (0..points)
                .map(|i| UsagePoint {
                    time: (now - Duration::minutes(i as i64))
                        .format("%H:%M")
                        .to_string(),
                    usage: rng.gen_range(range.clone()),
                })
                .collect()
        };

        let cpu = series(&CPU_USAGE_RANGE);
        let memory = series(&MEMORY_USAGE_RANGE);
        Self { cpu, memory }
    }

    /// 현재 시각 기준 프레임 생성.
    pub fn generate(points: usize) -> Self {
        Self::sample(Utc::now(), points, &mut rand::thread_rng())
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}
