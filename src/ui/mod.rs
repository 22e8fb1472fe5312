use anyhow::Result;
use inquire::InquireError;

mod spinner;
mod style;
mod table;

pub use spinner::Spinner;
pub use style::Style;
pub use table::render_incidents;

const fn is_prompt_cancelled(err: &InquireError) -> bool {
    matches!(
        err,
        InquireError::OperationCanceled | InquireError::OperationInterrupted
    )
}

/// Runs an interactive flow, turning Ctrl+C or Escape into `Ok(None)`.
///
/// A newline is printed on cancellation so the shell prompt starts clean.
pub fn handle_prompt_cancellation<T, F>(f: F) -> Result<Option<T>>
where
    F: FnOnce() -> Result<T>,
{
    match f() {
        Ok(value) => Ok(Some(value)),
        Err(e)
            if e.downcast_ref::<InquireError>()
                .is_some_and(is_prompt_cancelled) =>
        {
            println!();
            Ok(None)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_completed_flow_returns_value() {
        let result = handle_prompt_cancellation(|| Ok("fr"));
        assert!(matches!(result, Ok(Some("fr"))));
    }

    #[test]
    fn test_escape_and_ctrl_c_are_not_errors() {
        for err in [
            InquireError::OperationCanceled,
            InquireError::OperationInterrupted,
        ] {
            let result = handle_prompt_cancellation::<(), _>(|| Err(err.into()));
            assert!(matches!(result, Ok(None)));
        }
    }

    #[test]
    fn test_other_errors_propagate() {
        let result = handle_prompt_cancellation::<(), _>(|| {
            Err(InquireError::Custom("terminal too small".into()).into())
        });
        let Err(err) = result else {
            panic!("expected an error");
        };
        assert!(err.to_string().contains("terminal too small"));
    }
}
