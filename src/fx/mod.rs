//! Fx module - exchange-rate models, conversion and lookup.
//!
//! Rates are written by an ingestion collaborator; this crate only reads
//! them.

mod currency_converter;
mod fx_errors;
mod fx_model;
mod fx_repository;
mod fx_service;
mod fx_traits;

pub use currency_converter::CurrencyConverter;
pub use fx_errors::FxError;
pub use fx_model::{Currency, ExchangeRate, ExchangeRateDB};
pub use fx_repository::FxRepository;
pub use fx_service::FxService;
pub use fx_traits::{FxRepositoryTrait, FxServiceTrait};
