/// A remote resource whose size and range capability have been established.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The URL every shard request targets.
    pub url: String,

    /// Total length in bytes. Always positive for a probed resource.
    pub length: u64,

    /// Whether the server advertised `Accept-Ranges: bytes`.
    pub accepts_ranges: bool,
}

impl Resource {
    pub fn new(url: impl Into<String>, length: u64) -> Self {
        Self {
            url: url.into(),
            length,
            accepts_ranges: true,
        }
    }
}
