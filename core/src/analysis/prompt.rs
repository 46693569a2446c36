use serde_json::{json, Value};

/// Sample paragraph offered by the "Load Example" action.
pub const EXAMPLE_TEXT: &str = "The new phone's battery life is amazing and the camera quality is superb.
I had a terrible experience with their customer service; they were not helpful at all.
The movie was okay, not great but not bad either.
I'm absolutely thrilled with the results of the project!
Unfortunately, the package arrived damaged and two days late.
The user interface is intuitive and easy to navigate.";

/// Builds the instruction sent alongside the user's text.
pub fn build_prompt(text: &str) -> String {
    format!(
        "Analyze the sentiment of the following text. Split the text into individual sentences. \
For each sentence, provide its sentiment (must be one of 'POSITIVE', 'NEGATIVE', or 'NEUTRAL') \
and a confidence score from 0.0 to 1.0.\n\nHere is the text:\n---\n{}\n---\n",
        text
    )
}

/// Structural schema describing the expected response shape.
///
/// `sentiment` is described rather than enumerated; the prompt carries the constraint.
pub fn response_schema() -> Value {
    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": {
                "text": {
                    "type": "STRING",
                    "description": "The original sentence being analyzed."
                },
                "sentiment": {
                    "type": "STRING",
                    "description": "The sentiment of the sentence. Must be one of 'POSITIVE', 'NEGATIVE', or 'NEUTRAL'."
                },
                "confidence": {
                    "type": "NUMBER",
                    "description": "A confidence score between 0.0 and 1.0 for the sentiment analysis."
                }
            },
            "required": ["text", "sentiment", "confidence"]
        }
    })
}
