//! ID 생성기
//! ID Generator
//!
//! 역할:
//! - 메모리 원장의 계정 ID / 거래 ID 생성
//! - Atomic counter를 사용하여 스레드 안전하게 ID 생성
//!
//! PostgreSQL 원장은 BIGSERIAL 을 사용하므로 이 생성기를 쓰지 않습니다.
//! 전역 static 대신 인스턴스마다 카운터를 가집니다 (원장마다 독립적인 ID 공간).
//!
//! 사용 방법:
//! ```rust
//! use cryptozen_api::shared::utils::IdGenerator;
//!
//! let ids = IdGenerator::new(1);
//! assert_eq!(ids.next(), 1);
//! assert_eq!(ids.next(), 2);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

#[derive(Debug)]
pub struct IdGenerator {
    counter: AtomicU64,
}

impl IdGenerator {
    /// 생성기 생성 (`start` 부터 발급)
    /// Create a generator whose first id is `start`
    pub fn new(start: u64) -> Self {
        Self {
            counter: AtomicU64::new(start),
        }
    }

    /// 다음 ID 생성
    /// Generate next ID
    ///
    /// # Thread Safety
    /// AtomicU64를 사용하여 스레드 안전하게 동작
    pub fn next(&self) -> u64 {
        self.counter.fetch_add(1, Ordering::SeqCst)
    }

    /// 현재 ID 값 조회 (디버깅용)
    /// Get current ID value (for debugging)
    pub fn current(&self) -> u64 {
        self.counter.load(Ordering::SeqCst)
    }
}

impl Default for IdGenerator {
    fn default() -> Self {
        Self::new(1)
    }
}
