use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize)]
pub(crate) struct SummarizeRequest<'a> {
    pub texts: &'a [String],
}

#[derive(Debug, Deserialize)]
pub(crate) struct SummarizeResponse {
    pub summary: String,
}
