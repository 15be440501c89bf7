//! Classification of Kraken's error strings
//!
//! Kraken reports failures as strings of the form `"ECATEGORY:Message"`,
//! e.g. `"EAPI:Invalid nonce"` or `"EOrder:Insufficient funds"`. The client
//! never retries on them; this module only lets callers branch on what went
//! wrong without string matching.

/// Kraken API error categories
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// EAPI:* errors - API-level issues (key, signature, nonce, rate limit)
    Api,
    /// EGeneral:* errors - General errors
    General,
    /// EService:* errors - Service availability
    Service,
    /// EOrder:* errors - Trading/order errors
    Order,
    /// EFunding:* errors - Deposit/withdrawal errors
    Funding,
    /// EQuery:* errors - Query/search errors
    Query,
    /// ETrade:* errors - Trade execution errors
    Trade,
    /// Unknown error category
    Unknown,
}

impl ErrorCategory {
    fn from_prefix(prefix: &str) -> Self {
        match prefix {
            "EAPI" => Self::Api,
            "EGeneral" => Self::General,
            "EService" => Self::Service,
            "EOrder" => Self::Order,
            "EFunding" => Self::Funding,
            "EQuery" => Self::Query,
            "ETrade" => Self::Trade,
            _ => Self::Unknown,
        }
    }
}

/// One parsed Kraken error string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeError {
    /// The original error string from Kraken
    pub raw: String,
    /// Error category
    pub category: ErrorCategory,
    /// Message after the category prefix
    pub message: String,
}

impl ExchangeError {
    /// Parse a Kraken error string into a structured error
    pub fn parse(error: &str) -> Self {
        let (category, message) = match error.split_once(':') {
            Some((prefix, message)) => (ErrorCategory::from_prefix(prefix), message.trim()),
            None => (ErrorCategory::Unknown, error),
        };

        Self {
            raw: error.to_string(),
            category,
            message: message.to_string(),
        }
    }

    /// The nonce was not greater than the last one Kraken accepted
    pub fn is_invalid_nonce(&self) -> bool {
        self.category == ErrorCategory::Api && self.message.starts_with("Invalid nonce")
    }

    /// Rate limit hit on the API or order counters
    pub fn is_rate_limit(&self) -> bool {
        matches!(
            (self.category, self.message.as_str()),
            (ErrorCategory::Api, "Rate limit exceeded")
                | (ErrorCategory::General, "Too many requests")
                | (ErrorCategory::Order, "Rate limit exceeded")
        )
    }

    /// Key, signature or permission problem
    pub fn is_auth_error(&self) -> bool {
        match self.category {
            ErrorCategory::Api => matches!(
                self.message.as_str(),
                "Invalid key" | "Invalid signature" | "Invalid session"
            ),
            ErrorCategory::General => self.message == "Permission denied",
            _ => false,
        }
    }

    /// Order or withdrawal refused for lack of balance
    pub fn is_insufficient_funds(&self) -> bool {
        matches!(self.category, ErrorCategory::Order | ErrorCategory::Funding)
            && self.message.starts_with("Insufficient funds")
    }
}

impl std::fmt::Display for ExchangeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.raw)
    }
}
