//! Analysis dispatch: backend selection and isolated process invocation.
//!
//! Backend arguments are derived from model output and user text, so they
//! are passed as separate argv entries only — never interpolated into a
//! shell string. The backend runs at most once per turn; a non-zero exit
//! is a hard failure, not a partial result.

use std::path::{Path, PathBuf};
use std::time::Duration;

use statchat_core::config::BackendsConfig;
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::ChatError;
use crate::types::{IndependentSpec, VariableSet};

/// Which regression executable handles a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    SingleVariable,
    MultiVariable,
}

/// Backend choice is a pure function of the independent spec's shape.
pub fn backend_for(spec: &IndependentSpec) -> Backend {
    if spec.is_multi() {
        Backend::MultiVariable
    } else {
        Backend::SingleVariable
    }
}

/// Invokes the external regression backends.
pub struct AnalysisDispatcher {
    single_path: PathBuf,
    multi_path: PathBuf,
    timeout: Duration,
}

impl AnalysisDispatcher {
    pub fn new(
        single_path: impl Into<PathBuf>,
        multi_path: impl Into<PathBuf>,
        timeout: Duration,
    ) -> Self {
        Self {
            single_path: single_path.into(),
            multi_path: multi_path.into(),
            timeout,
        }
    }

    pub fn from_config(config: &BackendsConfig) -> Self {
        Self::new(
            &config.single_path,
            &config.multi_path,
            Duration::from_secs(config.timeout_secs),
        )
    }

    /// Run the matching backend once and capture its stdout.
    ///
    /// Positional argument order is fixed: dataset path, independent spec
    /// (comma-joined for the multi-variable backend), dependent variable.
    pub async fn dispatch(
        &self,
        vars: &VariableSet,
        dataset_path: &Path,
    ) -> Result<String, ChatError> {
        let backend = backend_for(&vars.independent);
        let program = match backend {
            Backend::SingleVariable => &self.single_path,
            Backend::MultiVariable => &self.multi_path,
        };
        let independent_spec = vars.independent.as_argument();

        debug!(
            backend = ?backend,
            program = %program.display(),
            dataset = %dataset_path.display(),
            "Dispatching analysis"
        );

        let mut command = Command::new(program);
        command
            .arg(dataset_path)
            .arg(&independent_spec)
            .arg(&vars.dependent)
            .kill_on_drop(true);

        let output = tokio::time::timeout(self.timeout, command.output())
            .await
            .map_err(|_| ChatError::BackendTimeout(self.timeout.as_secs()))?
            .map_err(|e| {
                ChatError::BackendFailure(format!(
                    "failed to launch {}: {}",
                    program.display(),
                    e
                ))
            })?;

        if !output.status.success() {
            // Diagnostics for operators only; the user sees a generic reply.
            error!(
                program = %program.display(),
                status = %output.status,
                stderr = %String::from_utf8_lossy(&output.stderr),
                "Regression backend failed"
            );
            return Err(ChatError::BackendFailure(format!(
                "backend {} exited with {}",
                program.display(),
                output.status
            )));
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn single_vars() -> VariableSet {
        VariableSet {
            independent: IndependentSpec::Single("SqFt".to_string()),
            dependent: "Price".to_string(),
        }
    }

    fn multi_vars() -> VariableSet {
        VariableSet {
            independent: IndependentSpec::Many(vec![
                "SqFt".to_string(),
                "YearBuilt".to_string(),
            ]),
            dependent: "Price".to_string(),
        }
    }

    // ---- Backend selection ----

    #[test]
    fn test_single_name_selects_single_backend() {
        assert_eq!(
            backend_for(&IndependentSpec::Single("SqFt".to_string())),
            Backend::SingleVariable
        );
    }

    #[test]
    fn test_name_list_selects_multi_backend() {
        assert_eq!(
            backend_for(&IndependentSpec::Many(vec![
                "SqFt".to_string(),
                "YearBuilt".to_string()
            ])),
            Backend::MultiVariable
        );
    }

    // ---- Process invocation (unix stand-in binaries) ----

    #[cfg(unix)]
    fn echo_dispatcher() -> AnalysisDispatcher {
        // Both backends are /bin/echo, so stdout reflects the argv exactly.
        AnalysisDispatcher::new("/bin/echo", "/bin/echo", Duration::from_secs(5))
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_single_dispatch_argument_order() {
        let output = echo_dispatcher()
            .dispatch(&single_vars(), Path::new("/data/housing.csv"))
            .await
            .unwrap();
        assert_eq!(output, "/data/housing.csv SqFt Price");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_multi_dispatch_joins_names_with_comma() {
        let output = echo_dispatcher()
            .dispatch(&multi_vars(), Path::new("/data/housing.csv"))
            .await
            .unwrap();
        // Two names arrive as one comma-joined positional argument.
        assert_eq!(output, "/data/housing.csv SqFt,YearBuilt Price");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_nonzero_exit_is_hard_failure() {
        let dispatcher =
            AnalysisDispatcher::new("/bin/false", "/bin/false", Duration::from_secs(5));
        let err = dispatcher
            .dispatch(&single_vars(), Path::new("/data/housing.csv"))
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::BackendFailure(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_launch_failure_is_hard_failure() {
        let dispatcher = AnalysisDispatcher::new(
            "/definitely/not/a/backend",
            "/definitely/not/a/backend",
            Duration::from_secs(5),
        );
        let err = dispatcher
            .dispatch(&single_vars(), Path::new("/data/housing.csv"))
            .await
            .unwrap_err();
        match err {
            ChatError::BackendFailure(msg) => assert!(msg.contains("failed to launch")),
            other => panic!("expected BackendFailure, got {:?}", other),
        }
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_slow_backend_times_out() {
        let dispatcher =
            AnalysisDispatcher::new("/bin/sleep", "/bin/sleep", Duration::from_millis(100));
        // argv becomes: sleep 1 1 1 — all valid durations, well past the
        // 100ms dispatcher timeout.
        let vars = VariableSet {
            independent: IndependentSpec::Single("1".to_string()),
            dependent: "1".to_string(),
        };
        let err = dispatcher.dispatch(&vars, Path::new("1")).await.unwrap_err();
        assert!(matches!(err, ChatError::BackendTimeout(_)));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_arguments_are_not_shell_interpreted() {
        // A hostile "column name" must arrive as a literal argument.
        let vars = VariableSet {
            independent: IndependentSpec::Single("SqFt; rm -rf /".to_string()),
            dependent: "$(whoami)".to_string(),
        };
        let output = echo_dispatcher()
            .dispatch(&vars, Path::new("/data/h.csv"))
            .await
            .unwrap();
        assert_eq!(output, "/data/h.csv SqFt; rm -rf / $(whoami)");
    }

    #[test]
    fn test_from_config_paths() {
        let config = BackendsConfig {
            single_path: "/opt/ols".to_string(),
            multi_path: "/opt/ols_multi".to_string(),
            timeout_secs: 30,
        };
        let dispatcher = AnalysisDispatcher::from_config(&config);
        assert_eq!(dispatcher.single_path, PathBuf::from("/opt/ols"));
        assert_eq!(dispatcher.multi_path, PathBuf::from("/opt/ols_multi"));
        assert_eq!(dispatcher.timeout, Duration::from_secs(30));
    }
}
