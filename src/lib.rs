// cryptozen_api: 거래 정산 API 서버
pub mod config;
pub mod domains;
pub mod routes;
pub mod shared;
