//! Workflow-runner integration.

/// Set by the runner for every step.
const ACTIONS_ENV: &str = "GITHUB_ACTIONS";

fn in_workflow() -> bool {
    std::env::var(ACTIONS_ENV).is_ok_and(|v| v == "true")
}

/// Mark the step failed with an `::error::` workflow command carrying the
/// full error chain. No-op outside a workflow run.
pub fn set_failed(err: &anyhow::Error) {
    if in_workflow() {
        println!("::error::{}", escape_data(&format!("{err:#}")));
    }
}

/// Escape a message for a workflow command payload.
fn escape_data(message: &str) -> String {
    message
        .replace('%', "%25")
        .replace('\r', "%0D")
        .replace('\n', "%0A")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_newlines_and_percent() {
        assert_eq!(escape_data("50% done\nnext"), "50%25 done%0Anext");
        assert_eq!(escape_data("a\r\nb"), "a%0D%0Ab");
    }
}
