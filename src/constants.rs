/// Default lifetime of a magic-link token in seconds (24 hours)
pub const DEFAULT_MAGIC_LINK_TTL_SECS: u64 = 86_400;

/// Domain-separation tag mixed into the token signing key
/// Tokens signed for another purpose never verify as magic links
pub const MAGIC_LINK_SALT: &str = "magic-link";

/// Fixed price of a holiday hours page, in major currency units
pub const PAYMENT_AMOUNT: u64 = 14_000;

/// Gateway amounts are expressed in the lowest currency unit
pub const CURRENCY_SUBUNITS: u64 = 100;

/// Default timeout for calls to the payment gateway and email provider
pub const DEFAULT_GATEWAY_TIMEOUT_SECS: u64 = 15;

/// Source label recorded when a view does not name one
pub const DEFAULT_VIEW_SOURCE: &str = "direct";

/// Webhook event that marks a charge as paid
pub const CHARGE_SUCCESS_EVENT: &str = "charge.success";

/// Header carrying the gateway's webhook signature
pub const PAYSTACK_SIGNATURE_HEADER: &str = "x-paystack-signature";

// =============================================================================
// Error Messages
// =============================================================================

pub const ERR_INVALID_TOKEN: &str = "Invalid token";

pub const ERR_TOKEN_EXPIRED: &str = "Token has expired";

/// Holiday and regular-hours times must look like "09:00"
pub const ERR_INVALID_TIME: &str = "Times must use the HH:MM format";
