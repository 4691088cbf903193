use redb::TableDefinition;

/// Businesses table: business_id (UUID string) -> BusinessRecord (serialized)
pub const BUSINESSES: TableDefinition<&str, &[u8]> = TableDefinition::new("businesses");

/// Pages table: page_id (== business_id) -> PageRecord (serialized)
pub const PAGES: TableDefinition<&str, &[u8]> = TableDefinition::new("pages");

/// Analytics table: analytics_id (== page_id) -> AnalyticsRecord (serialized)
pub const ANALYTICS: TableDefinition<&str, &[u8]> = TableDefinition::new("analytics");
