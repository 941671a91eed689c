//! Network constants for the CoinGecko REST API.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.coingecko.com/api/v3";

/// Quote currency used for prices and summary figures.
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Number of assets requested per markets page.
pub const DEFAULT_PER_PAGE: u32 = 250;

/// Header carrying a CoinGecko demo API key.
pub const API_KEY_HEADER: &str = "x-cg-demo-api-key";
