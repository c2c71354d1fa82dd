pub mod market_data_errors;
pub mod market_data_model;
pub mod market_data_service;
pub mod market_data_traits;
pub mod providers;

pub use market_data_errors::MarketDataError;
pub use market_data_model::{PriceFetchResult, PriceQuote, StockProfile};
pub use market_data_service::MarketDataService;
pub use market_data_traits::{MarketDataProviderTrait, MarketDataServiceTrait};
pub use providers::HttpQuoteProvider;
