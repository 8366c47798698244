/// 공유 유틸리티 모듈
/// Shared Utilities Module
///
/// 역할:
/// - ID 생성기 (메모리 원장의 Account, Trade)
pub mod id_generator;

pub use id_generator::*;
