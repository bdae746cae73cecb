/// A request received by a mock.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Request {
    /// Zero-based order in which the mock received this request.
    pub number: u32,
    pub method: String,
    pub url: String,
    pub headers: Vec<(String, String)>,
}

impl Request {
    /// Get the target index if this is a request for `/data/{index}`.
    pub fn data_index(&self) -> Option<usize> {
        crate::mock::data_index(&self.url)
    }
}
