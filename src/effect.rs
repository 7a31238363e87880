//! Effects - side effects declared by the reducer

/// Side effects that can be triggered by actions
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    /// Fetch every entity in the inclusive ID range, one request per ID
    FetchPage { first: u32, last: u32 },
    /// Fetch a single entity by numeric ID or name
    Lookup { query: String },
    /// Resolve species -> evolution chain for the open details view
    FetchEvolution { species_url: String },
}
