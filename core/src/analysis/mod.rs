pub mod prompt;
pub mod response;
pub mod result;

pub use prompt::{build_prompt, response_schema, EXAMPLE_TEXT};
pub use response::parse_results;
pub use result::{AnalysisResult, ResultSet, Sentiment};
