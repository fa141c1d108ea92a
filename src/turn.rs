//! Turn adapter: one user query in, one displayable string out.

use futures::StreamExt;

use crate::runner::Runner;
use crate::session::SessionId;
use crate::types::Content;

/// Shown when a turn completes without a final response.
pub const NO_RESPONSE: &str = "[No response]";

/// Prefix of replies produced from a failed turn.
pub const ERROR_PREFIX: &str = "Error: ";

/// Send `query` through `runner` and return the reply text.
///
/// Never fails: runner faults are logged and rendered as `"Error: <fault>"`,
/// and a stream without a usable final response yields [`NO_RESPONSE`].
pub async fn ask(runner: &Runner, user_id: &str, session_id: &SessionId, query: &str) -> String {
    let mut events = runner.run_async(user_id, session_id, Content::user(query));

    while let Some(event) = events.next().await {
        match event {
            Ok(event) if event.is_final_response() => {
                if let Some(text) = event.first_text() {
                    return text.to_string();
                }
            }
            Ok(_) => {}
            Err(err) => {
                tracing::error!(error = %err, session_id = %session_id, "turn failed");
                return format!("{ERROR_PREFIX}{err}");
            }
        }
    }

    NO_RESPONSE.to_string()
}
